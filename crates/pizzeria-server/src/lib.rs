//! HTTP/JSON API server for the pizza catalog.
//!
//! Exposes list/create on `/pizzas/` and retrieve/update/delete on
//! `/pizzas/{id}/`. This crate contains the handlers, API schema types, error
//! handling, configuration, and route definitions.

pub mod config;
pub mod error;
pub mod handlers;
pub mod router;
pub mod schema;
pub mod state;

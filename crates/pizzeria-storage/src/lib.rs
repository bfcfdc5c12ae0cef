//! Storage layer for the pizza catalog.
//!
//! Provides the [`PizzaStore`] trait defining the storage contract and the
//! [`SqliteStore`] backend that implements it.
//!
//! # Modules
//!
//! - [`error`]: StorageError enum with all failure modes
//! - [`types`]: ids, entities, and the create/patch inputs
//! - [`traits`]: PizzaStore trait definition
//! - [`schema`]: SQL migrations and connection setup
//! - [`sqlite`]: SqliteStore implementation

pub mod error;
pub mod schema;
pub mod sqlite;
pub mod traits;
pub mod types;

// Re-export key types for ergonomic use.
pub use error::StorageError;
pub use sqlite::SqliteStore;
pub use traits::PizzaStore;
pub use types::{
    InvalidPrice, NewPizza, NewTopping, Pizza, PizzaDetail, PizzaId, PizzaPatch, PizzaStatus,
    Price, Topping, ToppingId, UnknownStatus,
};

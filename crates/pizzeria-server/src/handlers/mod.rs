//! HTTP handler modules for the pizza API.
//!
//! Handlers are thin: they decode the request, run one storage call on a
//! request-scoped connection, and return JSON.

pub mod pizzas;

use crate::error::ApiError;

/// Fallback for any method a route does not serve (405).
pub async fn method_not_allowed() -> ApiError {
    ApiError::MethodNotAllowed
}

/// Fallback for paths no route matches (404).
pub async fn not_found() -> ApiError {
    ApiError::NotFound("no route for this path".to_string())
}

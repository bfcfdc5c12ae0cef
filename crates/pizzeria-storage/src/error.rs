//! Storage error types for pizzeria-storage.
//!
//! [`StorageError`] covers the failure modes of the storage layer: SQLite and
//! migration failures, missing entities, and rows that no longer decode.

use thiserror::Error;

/// Errors produced by storage operations.
#[derive(Debug, Error)]
pub enum StorageError {
    /// The underlying SQLite call failed.
    #[error("sqlite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    /// Applying schema migrations failed.
    #[error("migration error: {0}")]
    Migration(String),

    /// A pizza with the given ID was not found.
    #[error("pizza not found: {0}")]
    PizzaNotFound(i64),

    /// A topping referenced by a pizza does not exist.
    #[error("topping not found: {0}")]
    ToppingNotFound(i64),

    /// A topping with the same name already exists.
    #[error("duplicate topping: {0}")]
    DuplicateTopping(String),

    /// A stored row could not be decoded into its domain type.
    #[error("corrupt row: {reason}")]
    Corrupt { reason: String },
}

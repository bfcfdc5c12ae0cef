//! API error types with HTTP status code mapping.
//!
//! [`ApiError`] is the unified error type for all API endpoints. It implements
//! `axum::response::IntoResponse` to produce structured JSON error responses
//! with appropriate HTTP status codes.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;

use pizzeria_storage::StorageError;

/// Structured error detail in API responses.
#[derive(Debug, Clone, Serialize)]
pub struct ApiErrorDetail {
    /// Machine-readable error code (e.g., "NOT_FOUND", "BAD_REQUEST").
    pub code: String,
    /// Human-readable error message.
    pub message: String,
}

/// API errors with HTTP status code mapping.
///
/// None of these are retried; each one ends the request that raised it.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// Entity or route not found (404).
    #[error("not found: {0}")]
    NotFound(String),

    /// Missing or invalid input (400).
    #[error("bad request: {0}")]
    BadRequest(String),

    /// The route exists but not for this HTTP method (405).
    #[error("method not allowed")]
    MethodNotAllowed,

    /// Internal server error (500).
    #[error("internal error: {0}")]
    InternalError(String),
}

impl ApiError {
    fn status_and_code(&self) -> (StatusCode, &'static str) {
        match self {
            ApiError::NotFound(_) => (StatusCode::NOT_FOUND, "NOT_FOUND"),
            ApiError::BadRequest(_) => (StatusCode::BAD_REQUEST, "BAD_REQUEST"),
            ApiError::MethodNotAllowed => (StatusCode::METHOD_NOT_ALLOWED, "METHOD_NOT_ALLOWED"),
            ApiError::InternalError(_) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR")
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code) = self.status_and_code();
        let message = match self {
            ApiError::NotFound(msg) | ApiError::BadRequest(msg) => msg,
            ApiError::MethodNotAllowed => "Método no soportado".to_string(),
            ApiError::InternalError(msg) => {
                tracing::error!(error = %msg, "request failed");
                msg
            }
        };

        let body = serde_json::json!({
            "success": false,
            "error": ApiErrorDetail {
                code: code.to_string(),
                message,
            },
        });

        (status, axum::Json(body)).into_response()
    }
}

impl From<StorageError> for ApiError {
    fn from(err: StorageError) -> Self {
        match &err {
            StorageError::PizzaNotFound(_) => ApiError::NotFound(err.to_string()),
            StorageError::ToppingNotFound(_) | StorageError::DuplicateTopping(_) => {
                ApiError::BadRequest(err.to_string())
            }
            StorageError::Sqlite(_)
            | StorageError::Migration(_)
            | StorageError::Corrupt { .. } => ApiError::InternalError(err.to_string()),
        }
    }
}

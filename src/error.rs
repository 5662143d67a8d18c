//! Error types for the key-value store
//!
//! Provides unified error handling using thiserror.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

use crate::models::ErrorResponse;

// == Store Error Enum ==
/// Unified error type for the store, the snapshot codec and the HTTP layer.
#[derive(Error, Debug)]
pub enum StoreError {
    /// Empty or blank key/value, or a non-positive TTL
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Key absent or cleared, empty listing, or empty snapshot
    #[error("No data found: {0}")]
    NotFound(String),

    /// An entry could not be encoded or decoded
    #[error("Serialization failure: {0}")]
    Serialization(#[from] serde_json::Error),

    /// A snapshot record decoded but does not describe a valid entry
    #[error("Malformed snapshot record on line {line}: {reason}")]
    MalformedRecord { line: usize, reason: String },

    /// Snapshot file could not be opened, read or written
    #[error("File processing error: {0}")]
    Io(#[from] std::io::Error),
}

impl StoreError {
    /// Returns true for failures of the dump/load path.
    pub fn is_processing_error(&self) -> bool {
        matches!(
            self,
            StoreError::Serialization(_) | StoreError::MalformedRecord { .. } | StoreError::Io(_)
        )
    }
}

// == IntoResponse Implementation ==
impl IntoResponse for StoreError {
    fn into_response(self) -> Response {
        // Invalid input and processing errors both surface as 409 Conflict
        let status = match &self {
            StoreError::NotFound(_) => StatusCode::NOT_FOUND,
            _ => StatusCode::CONFLICT,
        };

        let body = Json(ErrorResponse::new(self.to_string()));

        (status, body).into_response()
    }
}

// == Result Type Alias ==
/// Convenience Result type for the store.
pub type Result<T> = std::result::Result<T, StoreError>;

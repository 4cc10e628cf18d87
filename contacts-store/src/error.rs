//! Error types for record stores

use contacts_fields::RecordId;
use thiserror::Error;

/// Result type for store operations
pub type Result<T> = std::result::Result<T, StoreError>;

/// Errors that can occur talking to a record store
#[derive(Debug, Error)]
pub enum StoreError {
    /// No record with this id
    #[error("record not found: {id}")]
    NotFound { id: RecordId },

    /// Operation needs a persisted record but the record has no id
    #[error("record has no id; save it before {operation}")]
    MissingId { operation: &'static str },

    /// Store rejected the request
    #[error("store rejected request ({status}): {message}")]
    Rejected { status: u16, message: String },

    /// Transport failure
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl StoreError {
    /// Create a missing id error
    pub fn missing_id(operation: &'static str) -> Self {
        Self::MissingId { operation }
    }

    /// Create a rejected request error
    pub fn rejected(status: u16, message: impl Into<String>) -> Self {
        Self::Rejected {
            status,
            message: message.into(),
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}

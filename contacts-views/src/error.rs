//! Error types for the contact views

use contacts_forms::FormError;
use contacts_store::StoreError;
use thiserror::Error;

/// Result type for view operations
pub type Result<T> = std::result::Result<T, ViewError>;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ViewError {
    #[error(transparent)]
    Form(#[from] FormError),

    /// Path matches none of the app's routes
    #[error("no route for path: {path}")]
    UnknownRoute { path: String },
}

impl ViewError {
    pub fn unknown_route(path: impl Into<String>) -> Self {
        Self::UnknownRoute { path: path.into() }
    }

    pub fn is_not_found(&self) -> bool {
        match self {
            Self::Form(err) => err.is_not_found(),
            Self::UnknownRoute { .. } => true,
        }
    }

    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Form(err) if err.is_validation())
    }

    pub fn is_persistence(&self) -> bool {
        matches!(self, Self::Form(err) if err.is_persistence())
    }
}

impl From<StoreError> for ViewError {
    fn from(err: StoreError) -> Self {
        Self::Form(err.into())
    }
}

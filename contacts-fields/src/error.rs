//! Error types for the field type registry and records

use std::path::PathBuf;
use thiserror::Error;

/// Result type for fields operations
pub type Result<T> = std::result::Result<T, FieldsError>;

/// Errors that can occur in registry and record operations
#[derive(Debug, Error)]
pub enum FieldsError {
    /// Field type not found by key
    #[error("field type not found: {key}")]
    FieldTypeNotFound { key: String },

    /// Two field types share a key
    #[error("duplicate field type key: {key}")]
    DuplicateFieldType { key: String },

    /// Record has no field with this name
    #[error("field not found: {name}")]
    FieldNotFound { name: String },

    /// Registry file not found
    #[error("field type registry not found: {path}")]
    NotInitialized { path: PathBuf },

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// YAML serialization error
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml_ng::Error),
}

impl FieldsError {
    /// Create a field type not found error
    pub fn field_type_not_found(key: impl Into<String>) -> Self {
        Self::FieldTypeNotFound { key: key.into() }
    }

    /// Create a field not found error
    pub fn field_not_found(name: impl Into<String>) -> Self {
        Self::FieldNotFound { name: name.into() }
    }

    /// Whether this error means something was looked up and not there
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            Self::FieldTypeNotFound { .. } | Self::FieldNotFound { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = FieldsError::field_type_not_found("geo");
        assert_eq!(err.to_string(), "field type not found: geo");
    }

    #[test]
    fn test_not_found_classification() {
        assert!(FieldsError::field_not_found("email").is_not_found());
        assert!(!FieldsError::DuplicateFieldType { key: "tel".into() }.is_not_found());
    }
}

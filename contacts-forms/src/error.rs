//! Error types for form operations

use contacts_fields::{FieldsError, RecordId};
use contacts_store::StoreError;
use thiserror::Error;

/// Result type for form operations
pub type Result<T> = std::result::Result<T, FormError>;

/// Errors surfaced to whoever drives a form.
///
/// Cloneable so the same failure can be returned and published as a
/// [`SaveEvent`](crate::SaveEvent).
#[derive(Debug, Clone, PartialEq, Error)]
pub enum FormError {
    /// Field type key not in the registry
    #[error("field type not found: {key}")]
    UnknownFieldType { key: String },

    /// Record has no such field
    #[error("field not found: {field}")]
    FieldNotFound { field: String },

    /// Store has no record with this id
    #[error("record not found: {id}")]
    RecordNotFound { id: RecordId },

    /// Form is invalid; the action was blocked
    #[error("validation failed: {}", fields.join(", "))]
    ValidationFailed { fields: Vec<String> },

    /// Store rejected a save, update or delete
    #[error("persistence failed: {message}")]
    PersistenceFailed { message: String },

    /// Registry could not be used
    #[error("schema error: {message}")]
    Schema { message: String },
}

impl FormError {
    /// Create a validation error
    pub fn validation<I, S>(fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::ValidationFailed {
            fields: fields.into_iter().map(Into::into).collect(),
        }
    }

    pub fn field_not_found(field: impl Into<String>) -> Self {
        Self::FieldNotFound {
            field: field.into(),
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            Self::UnknownFieldType { .. } | Self::FieldNotFound { .. } | Self::RecordNotFound { .. }
        )
    }

    pub fn is_validation(&self) -> bool {
        matches!(self, Self::ValidationFailed { .. })
    }

    pub fn is_persistence(&self) -> bool {
        matches!(self, Self::PersistenceFailed { .. })
    }
}

impl From<FieldsError> for FormError {
    fn from(err: FieldsError) -> Self {
        match err {
            FieldsError::FieldTypeNotFound { key } => Self::UnknownFieldType { key },
            FieldsError::FieldNotFound { name } => Self::FieldNotFound { field: name },
            other => Self::Schema {
                message: other.to_string(),
            },
        }
    }
}

impl From<StoreError> for FormError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound { id } => Self::RecordNotFound { id },
            other => Self::PersistenceFailed {
                message: other.to_string(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = FormError::validation(["firstName", "email"]);
        assert_eq!(err.to_string(), "validation failed: firstName, email");
    }

    #[test]
    fn store_errors_map_to_taxonomy() {
        let err = FormError::from(StoreError::NotFound { id: RecordId(2) });
        assert!(err.is_not_found());

        let err = FormError::from(StoreError::rejected(500, "boom"));
        assert!(err.is_persistence());
        assert!(err.to_string().contains("boom"));
    }

    #[test]
    fn fields_errors_map_to_taxonomy() {
        let err = FormError::from(FieldsError::field_type_not_found("geo"));
        assert_eq!(
            err,
            FormError::UnknownFieldType {
                key: "geo".to_string()
            }
        );
    }
}

//! The catalogue of field types a form can edit.
//!
//! Populated once, either from the built-in table or from a YAML file, and
//! read-only afterwards. Lookup is by key; iteration follows declaration order
//! so a type picker renders the same way every time.

use std::path::Path;

use indexmap::IndexMap;
use tokio::fs;
use tracing::debug;

use crate::error::{FieldsError, Result};
use crate::types::FieldType;

/// Built-in field types as `(key, label, hint)`.
const BUILTIN_TYPES: &[(&str, &str, &str)] = &[
    ("text", "Text", "should be text"),
    ("email", "Email", "should be an email address"),
    ("number", "Number", "should be a number"),
    ("date", "Date", "should be a date"),
    ("datetime", "Datetime", "should be a datetime"),
    ("time", "Time", "should be a time"),
    ("month", "Month", "should be a month"),
    ("week", "Week", "should be a week"),
    ("url", "URL", "should be a url"),
    ("tel", "Phone Number", "should be a tel"),
    ("color", "Color", "should be a color"),
];

/// Immutable registry of field types keyed by type key, in declaration order.
#[derive(Debug, Clone)]
pub struct FieldTypeRegistry {
    types: IndexMap<String, FieldType>,
}

impl FieldTypeRegistry {
    /// The registry every contacts form uses unless configured otherwise.
    pub fn builtin() -> Self {
        Self::from_types(
            BUILTIN_TYPES
                .iter()
                .map(|(key, label, hint)| FieldType::new(*key, *label, *hint)),
        )
        .expect("duplicate built-in field type")
    }

    /// Build a registry from arbitrary field types. Keys must be unique.
    pub fn from_types(types: impl IntoIterator<Item = FieldType>) -> Result<Self> {
        let mut index = IndexMap::new();
        for ft in types {
            if index.contains_key(&ft.key) {
                return Err(FieldsError::DuplicateFieldType { key: ft.key });
            }
            index.insert(ft.key.clone(), ft);
        }
        Ok(Self { types: index })
    }

    /// Parse a YAML list of `{key, label, hint}` entries.
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        let types: Vec<FieldType> = serde_yaml_ng::from_str(yaml)?;
        Self::from_types(types)
    }

    /// Load a registry from a YAML file on disk.
    pub async fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(FieldsError::NotInitialized {
                path: path.to_path_buf(),
            });
        }
        let content = fs::read_to_string(path).await?;
        let registry = Self::from_yaml(&content)?;
        debug!(path = %path.display(), types = registry.len(), "field type registry loaded");
        Ok(registry)
    }

    /// Serialize the registry back to the YAML shape `from_yaml` reads.
    pub fn to_yaml(&self) -> Result<String> {
        let types: Vec<&FieldType> = self.types.values().collect();
        Ok(serde_yaml_ng::to_string(&types)?)
    }

    /// Look up a field type by key.
    pub fn lookup(&self, key: &str) -> Result<&FieldType> {
        self.get(key)
            .ok_or_else(|| FieldsError::field_type_not_found(key))
    }

    pub fn get(&self, key: &str) -> Option<&FieldType> {
        self.types.get(key)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.types.contains_key(key)
    }

    /// All field types, in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = &FieldType> {
        self.types.values()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.types.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }
}

impl Default for FieldTypeRegistry {
    fn default() -> Self {
        Self::builtin()
    }
}

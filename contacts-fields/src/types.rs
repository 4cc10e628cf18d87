//! Core field and record types.
//!
//! A `FieldType` describes one kind of value a form can edit. A `Record` is a
//! schema-less, ordered mapping from field names to `FieldValue`s, each value
//! tagged with the key of its field type.

use std::fmt;
use std::str::FromStr;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::error::{FieldsError, Result};
use crate::validation;

/// Display label and validation hint for one kind of value.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct FieldType {
    pub key: String,
    pub label: String,
    pub hint: String,
}

impl FieldType {
    pub fn new(key: impl Into<String>, label: impl Into<String>, hint: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            label: label.into(),
            hint: hint.into(),
        }
    }

    /// Whether `value` is acceptable input for this type.
    ///
    /// Empty input is always acceptable; required-ness is the form's concern.
    pub fn accepts(&self, value: &str) -> bool {
        validation::accepts(&self.key, value)
    }
}

/// Identifier assigned to a record by the store.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct RecordId(pub u64);

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for RecordId {
    fn from(id: u64) -> Self {
        Self(id)
    }
}

impl FromStr for RecordId {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        s.trim().parse().map(Self)
    }
}

/// A value tagged with the key of its field type.
///
/// Serializes as the ordered pair `[value, typeKey]`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "(String, String)", into = "(String, String)")]
pub struct FieldValue {
    pub value: String,
    pub type_key: String,
}

impl FieldValue {
    pub fn new(value: impl Into<String>, type_key: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            type_key: type_key.into(),
        }
    }
}

impl From<(String, String)> for FieldValue {
    fn from((value, type_key): (String, String)) -> Self {
        Self { value, type_key }
    }
}

impl From<FieldValue> for (String, String) {
    fn from(field: FieldValue) -> Self {
        (field.value, field.type_key)
    }
}

/// A schema-less record: field name → tagged value, in insertion order.
///
/// A record without an id is new; one with an id is backed by a store.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Record {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    id: Option<RecordId>,
    #[serde(flatten)]
    fields: IndexMap<String, FieldValue>,
}

impl Record {
    /// Field name reserved for the record id on the wire.
    pub const ID_KEY: &'static str = "id";

    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style field insertion.
    pub fn with_field(
        mut self,
        name: impl Into<String>,
        value: impl Into<String>,
        type_key: impl Into<String>,
    ) -> Self {
        self.fields
            .insert(name.into(), FieldValue::new(value, type_key));
        self
    }

    pub fn with_id(mut self, id: impl Into<RecordId>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn id(&self) -> Option<RecordId> {
        self.id
    }

    pub fn set_id(&mut self, id: Option<RecordId>) {
        self.id = id;
    }

    /// True until the record has been saved and assigned an id.
    pub fn is_new(&self) -> bool {
        self.id.is_none()
    }

    pub fn get(&self, name: &str) -> Option<&FieldValue> {
        self.fields.get(name)
    }

    /// The raw value of a field, if present.
    pub fn value_of(&self, name: &str) -> Option<&str> {
        self.fields.get(name).map(|f| f.value.as_str())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.fields.contains_key(name)
    }

    /// Insert or replace a field. Returns the previous value.
    pub fn insert(&mut self, name: impl Into<String>, field: FieldValue) -> Option<FieldValue> {
        self.fields.insert(name.into(), field)
    }

    /// Replace the value of an existing field, keeping its type.
    pub fn set_value(&mut self, name: &str, value: impl Into<String>) -> Result<()> {
        let field = self
            .fields
            .get_mut(name)
            .ok_or_else(|| FieldsError::field_not_found(name))?;
        field.value = value.into();
        Ok(())
    }

    /// Remove a field, preserving the order of the rest.
    pub fn remove(&mut self, name: &str) -> Option<FieldValue> {
        self.fields.shift_remove(name)
    }

    /// Position of a field in insertion order.
    pub fn position(&self, name: &str) -> Option<usize> {
        self.fields.get_index_of(name)
    }

    /// Put a field back at a given position (used to undo a removal).
    pub fn restore(&mut self, index: usize, name: impl Into<String>, field: FieldValue) {
        let index = index.min(self.fields.len());
        self.fields.shift_insert(index, name.into(), field);
    }

    pub fn fields(&self) -> impl Iterator<Item = (&str, &FieldValue)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(String::as_str)
    }

    pub fn field_map(&self) -> &IndexMap<String, FieldValue> {
        &self.fields
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

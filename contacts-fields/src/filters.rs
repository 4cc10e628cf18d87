//! String and record filters used by the views.

use convert_case::{Boundary, Case, Casing};
use indexmap::IndexMap;

use crate::types::{FieldValue, Record};

/// `"First Name"` → `"firstName"`.
///
/// Words are split on spaces only; the first is lowercased and every later
/// word is capitalized.
pub fn camel_case(label: &str) -> String {
    label.from_case(Case::Title).to_case(Case::Camel)
}

/// `"firstName"` → `"First Name"`.
///
/// Only a lowercase letter followed by an uppercase one starts a new word, so
/// digits stay attached: `"address2"` → `"Address2"`.
pub fn label_case(key: &str) -> String {
    key.with_boundaries(&[Boundary::LowerUpper])
        .to_case(Case::Title)
}

/// The record's fields without `key`, in their original order.
pub fn key_filter(record: &Record, key: &str) -> IndexMap<String, FieldValue> {
    record
        .fields()
        .filter(|(name, _)| *name != key)
        .map(|(name, value)| (name.to_string(), value.clone()))
        .collect()
}

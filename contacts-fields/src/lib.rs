//! Field type registry and record model
//!
//! `contacts-fields` is the schema-and-data crate shared by every other contacts
//! crate. It owns the catalogue of field types a form can edit, the tagged
//! values records are made of, and the small string filters the views use to
//! turn labels into keys and back.
//!
//! # Architecture
//!
//! - **Registry**: `FieldTypeRegistry` is populated once (built-ins or a YAML file)
//!   and read-only afterwards
//! - **Wire-compatible records**: a `Record` serializes as `{"id": 1, "name": [value, typeKey]}`
//! - **Browser-style validity**: `FieldType::accepts` mirrors the checks an HTML
//!   input of the same type performs

pub mod error;
pub mod filters;
pub mod registry;
pub mod types;
pub mod validation;

pub use error::{FieldsError, Result};
pub use filters::{camel_case, key_filter, label_case};
pub use registry::FieldTypeRegistry;
pub use types::{FieldType, FieldValue, Record, RecordId};

//! Field-editing bindings
//!
//! A [`FieldBinding`] ties one field of a shared record to an editable control:
//! it renders the field through the [`FieldTypeRegistry`], applies edits to the
//! in-memory record, and persists them through a [`RecordStore`] after a
//! debounce interval. A [`NewField`] creator adds fields to the same record.
//!
//! ## Overview
//!
//! - **One record, many bindings** - every binding of a record shares one [`RecordHandle`]
//! - **Coalesced saves** - rapid edits produce a single `update` carrying the last value
//! - **Ordered persistence** - calls for one record go through a commit lane; responses
//!   overtaken by newer local edits are dropped
//! - **Failures surface** - immediate operations return [`FormError::PersistenceFailed`],
//!   debounced ones publish [`SaveEvent::Failed`]
//!
//! ## Basic Usage
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use contacts_fields::{FieldTypeRegistry, Record};
//! use contacts_forms::{FieldBinding, FormContext, RecordHandle};
//! use contacts_store::InMemoryStore;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let ctx = FormContext::new(Arc::new(InMemoryStore::new()), FieldTypeRegistry::builtin());
//! let record = RecordHandle::new(Record::new().with_id(1).with_field("firstName", "Ann", "text"));
//! let mut binding = FieldBinding::new(&ctx, record, "firstName");
//! binding.edit("Anna").await?;
//! # Ok(())
//! # }
//! ```
//!
//! [`FieldTypeRegistry`]: contacts_fields::FieldTypeRegistry
//! [`RecordStore`]: contacts_store::RecordStore

mod autosave;
mod binding;
mod context;
mod error;
mod form;
mod new_field;
mod record;
mod signal;

pub use autosave::{Debouncer, DEFAULT_AUTOSAVE_DELAY};
pub use binding::{ControlState, FieldBinding, FieldView};
pub use context::FormContext;
pub use error::{FormError, Result};
pub use form::invalid_fields;
pub use new_field::{FieldDraft, NewField};
pub use record::{RecordHandle, SaveEvent};
pub use signal::{FormSignal, ValidationSignal};

//! Record store collaborator
//!
//! The forms never talk to a transport directly; they go through the
//! [`RecordStore`] trait, which mirrors the verbs of the contact REST resource:
//! `query`, `get`, `save`, `update` (the added `PUT` verb) and `delete`.
//!
//! Two implementations ship with the crate:
//!
//! - [`InMemoryStore`] - a map guarded by a lock; backs the shell server and tests
//! - [`RestStore`] - a `reqwest` client for `/api/contact/:id`

mod error;
mod memory;
mod rest;
mod store;

pub use error::{Result, StoreError};
pub use memory::InMemoryStore;
pub use rest::{RestStore, DEFAULT_RESOURCE_URL};
pub use store::RecordStore;

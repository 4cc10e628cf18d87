//! The record store trait

use async_trait::async_trait;
use contacts_fields::{Record, RecordId};

use crate::error::Result;

/// Persistence collaborator for records.
///
/// Every call returns the store's view of the record so callers can adopt
/// server-assigned ids and normalized values.
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// All records.
    async fn query(&self) -> Result<Vec<Record>>;

    /// One record by id.
    async fn get(&self, id: RecordId) -> Result<Record>;

    /// Create a new record. The returned record carries its assigned id.
    async fn save(&self, record: &Record) -> Result<Record>;

    /// Replace an existing record.
    async fn update(&self, record: &Record) -> Result<Record>;

    /// Delete an existing record.
    async fn delete(&self, record: &Record) -> Result<()>;
}

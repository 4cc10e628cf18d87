//! In-memory record store

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;
use contacts_fields::{Record, RecordId};
use tokio::sync::RwLock;
use tracing::debug;

use crate::error::{Result, StoreError};
use crate::store::RecordStore;

/// Records kept in a map, ids assigned from a counter.
#[derive(Debug)]
pub struct InMemoryStore {
    records: RwLock<BTreeMap<RecordId, Record>>,
    next_id: AtomicU64,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self {
            records: RwLock::new(BTreeMap::new()),
            next_id: AtomicU64::new(1),
        }
    }

    /// Seed the store. Records without an id are assigned one.
    pub fn with_records(records: impl IntoIterator<Item = Record>) -> Self {
        let mut map = BTreeMap::new();
        let mut next = 1;
        let mut pending = Vec::new();
        for record in records {
            match record.id() {
                Some(id) => {
                    next = next.max(id.0 + 1);
                    map.insert(id, record);
                }
                None => pending.push(record),
            }
        }
        for mut record in pending {
            let id = RecordId(next);
            next += 1;
            record.set_id(Some(id));
            map.insert(id, record);
        }
        Self {
            records: RwLock::new(map),
            next_id: AtomicU64::new(next),
        }
    }

    pub async fn len(&self) -> usize {
        self.records.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.records.read().await.is_empty()
    }

    fn require_id(record: &Record, operation: &'static str) -> Result<RecordId> {
        record.id().ok_or_else(|| StoreError::missing_id(operation))
    }
}

impl Default for InMemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl RecordStore for InMemoryStore {
    async fn query(&self) -> Result<Vec<Record>> {
        Ok(self.records.read().await.values().cloned().collect())
    }

    async fn get(&self, id: RecordId) -> Result<Record> {
        self.records
            .read()
            .await
            .get(&id)
            .cloned()
            .ok_or(StoreError::NotFound { id })
    }

    async fn save(&self, record: &Record) -> Result<Record> {
        let id = RecordId(self.next_id.fetch_add(1, Ordering::SeqCst));
        let mut saved = record.clone();
        saved.set_id(Some(id));
        self.records.write().await.insert(id, saved.clone());
        debug!(%id, fields = saved.len(), "record saved");
        Ok(saved)
    }

    async fn update(&self, record: &Record) -> Result<Record> {
        let id = Self::require_id(record, "update")?;
        let mut records = self.records.write().await;
        let slot = records.get_mut(&id).ok_or(StoreError::NotFound { id })?;
        *slot = record.clone();
        debug!(%id, fields = record.len(), "record updated");
        Ok(record.clone())
    }

    async fn delete(&self, record: &Record) -> Result<()> {
        let id = Self::require_id(record, "delete")?;
        match self.records.write().await.remove(&id) {
            Some(_) => {
                debug!(%id, "record deleted");
                Ok(())
            }
            None => Err(StoreError::NotFound { id }),
        }
    }
}

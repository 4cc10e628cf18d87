//! Test utilities for the contacts crates
//!
//! This crate provides a store double that records every call it receives and
//! can be told to fail or to respond slowly, so binding and view tests can
//! assert exactly which persistence calls happened.
//!
//! ## Usage
//!
//! ```no_run
//! use contacts_test_utils::RecordingStore;
//! use contacts_fields::Record;
//!
//! # async fn example() {
//! let store = RecordingStore::seeded(vec![Record::new().with_id(1)]);
//! store.fail_next_updates(1);
//! // hand `store` to a binding, then:
//! assert_eq!(store.update_count(), 0);
//! # }
//! ```

use std::collections::VecDeque;
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use async_trait::async_trait;
use contacts_fields::{Record, RecordId};
use contacts_store::{InMemoryStore, RecordStore, Result, StoreError};

/// One call observed by a [`RecordingStore`].
#[derive(Debug, Clone, PartialEq)]
pub enum StoreCall {
    Query,
    Get(RecordId),
    Save(Record),
    Update(Record),
    Delete(Option<RecordId>),
}

#[derive(Debug, Default)]
struct Script {
    calls: Vec<StoreCall>,
    failing_updates: usize,
    failing_saves: usize,
    failing_deletes: usize,
    update_latency: VecDeque<Duration>,
}

/// An [`InMemoryStore`] that logs calls and fails or stalls on demand.
#[derive(Debug)]
pub struct RecordingStore {
    inner: InMemoryStore,
    script: Mutex<Script>,
}

impl RecordingStore {
    pub fn new() -> Self {
        Self::seeded(Vec::new())
    }

    /// Start with the given records already stored.
    pub fn seeded(records: Vec<Record>) -> Self {
        Self {
            inner: InMemoryStore::with_records(records),
            script: Mutex::new(Script::default()),
        }
    }

    fn script(&self) -> MutexGuard<'_, Script> {
        self.script.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Reject the next `n` update calls.
    pub fn fail_next_updates(&self, n: usize) {
        self.script().failing_updates = n;
    }

    /// Reject the next `n` save calls.
    pub fn fail_next_saves(&self, n: usize) {
        self.script().failing_saves = n;
    }

    /// Reject the next `n` delete calls.
    pub fn fail_next_deletes(&self, n: usize) {
        self.script().failing_deletes = n;
    }

    /// Delay the next update call by `delay` (queued, one per call).
    pub fn delay_next_update(&self, delay: Duration) {
        self.script().update_latency.push_back(delay);
    }

    /// Every call so far, oldest first.
    pub fn calls(&self) -> Vec<StoreCall> {
        self.script().calls.clone()
    }

    /// Records passed to `update`, oldest first.
    pub fn updates(&self) -> Vec<Record> {
        self.script()
            .calls
            .iter()
            .filter_map(|call| match call {
                StoreCall::Update(record) => Some(record.clone()),
                _ => None,
            })
            .collect()
    }

    pub fn update_count(&self) -> usize {
        self.updates().len()
    }

    /// The stored state, bypassing the call log.
    pub async fn stored(&self, id: RecordId) -> Option<Record> {
        self.inner.get(id).await.ok()
    }

    fn take_failure(counter: &mut usize) -> bool {
        if *counter > 0 {
            *counter -= 1;
            true
        } else {
            false
        }
    }
}

impl Default for RecordingStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl RecordStore for RecordingStore {
    async fn query(&self) -> Result<Vec<Record>> {
        self.script().calls.push(StoreCall::Query);
        self.inner.query().await
    }

    async fn get(&self, id: RecordId) -> Result<Record> {
        self.script().calls.push(StoreCall::Get(id));
        self.inner.get(id).await
    }

    async fn save(&self, record: &Record) -> Result<Record> {
        let fail = {
            let mut script = self.script();
            script.calls.push(StoreCall::Save(record.clone()));
            Self::take_failure(&mut script.failing_saves)
        };
        if fail {
            return Err(StoreError::rejected(503, "save rejected"));
        }
        self.inner.save(record).await
    }

    async fn update(&self, record: &Record) -> Result<Record> {
        let (fail, delay) = {
            let mut script = self.script();
            script.calls.push(StoreCall::Update(record.clone()));
            let fail = Self::take_failure(&mut script.failing_updates);
            (fail, script.update_latency.pop_front())
        };
        if let Some(delay) = delay {
            tracing::trace!(?delay, "stalling update");
            tokio::time::sleep(delay).await;
        }
        if fail {
            return Err(StoreError::rejected(503, "update rejected"));
        }
        self.inner.update(record).await
    }

    async fn delete(&self, record: &Record) -> Result<()> {
        let fail = {
            let mut script = self.script();
            script.calls.push(StoreCall::Delete(record.id()));
            Self::take_failure(&mut script.failing_deletes)
        };
        if fail {
            return Err(StoreError::rejected(503, "delete rejected"));
        }
        self.inner.delete(record).await
    }
}

//! Shared record container with ordered persistence

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use contacts_fields::Record;
use contacts_store::RecordStore;
use tokio::sync::{broadcast, watch, Mutex};
use tracing::{debug, warn};

use crate::error::{FormError, Result};

const EVENT_CAPACITY: usize = 32;

/// Outcome of one persistence call, tagged with the record revision it carried.
#[derive(Debug, Clone, PartialEq)]
pub enum SaveEvent {
    /// The store accepted the snapshot and the local record adopted its response.
    Saved { revision: u64 },
    /// The store accepted the snapshot, but newer local edits exist, so the
    /// response was dropped.
    Superseded { revision: u64 },
    Failed { revision: u64, error: FormError },
}

struct Shared {
    record: Mutex<Record>,
    lane: Mutex<()>,
    revision: AtomicU64,
    snapshots: watch::Sender<Record>,
    events: broadcast::Sender<SaveEvent>,
}

/// One record shared by every binding that edits it.
///
/// Local mutations bump a revision counter and publish a snapshot. All store
/// calls for the record run one at a time through a commit lane; a response
/// is applied only if the revision has not moved since its snapshot was taken.
#[derive(Clone)]
pub struct RecordHandle {
    shared: Arc<Shared>,
}

impl RecordHandle {
    pub fn new(record: Record) -> Self {
        let (snapshots, _) = watch::channel(record.clone());
        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        Self {
            shared: Arc::new(Shared {
                record: Mutex::new(record),
                lane: Mutex::new(()),
                revision: AtomicU64::new(0),
                snapshots,
                events,
            }),
        }
    }

    /// Copy of the current local state.
    pub async fn snapshot(&self) -> Record {
        self.shared.record.lock().await.clone()
    }

    /// Number of local mutations so far.
    pub fn revision(&self) -> u64 {
        self.shared.revision.load(Ordering::SeqCst)
    }

    /// Receive a snapshot after every change. Drop the receiver to unsubscribe.
    pub fn subscribe(&self) -> watch::Receiver<Record> {
        self.shared.snapshots.subscribe()
    }

    pub fn save_events(&self) -> broadcast::Receiver<SaveEvent> {
        self.shared.events.subscribe()
    }

    /// Apply a local change. A failed `change` must leave the record
    /// untouched; the revision is bumped and a snapshot published only on
    /// success.
    pub async fn mutate<R, E>(
        &self,
        change: impl FnOnce(&mut Record) -> std::result::Result<R, E>,
    ) -> std::result::Result<R, E> {
        let mut record = self.shared.record.lock().await;
        let result = change(&mut record)?;
        let revision = self.shared.revision.fetch_add(1, Ordering::SeqCst) + 1;
        self.shared.snapshots.send_replace(record.clone());
        debug!(revision, "record changed locally");
        Ok(result)
    }

    /// Send the current state to the store's `update`.
    pub async fn persist(&self, store: &dyn RecordStore) -> Result<Record> {
        let _lane = self.shared.lane.lock().await;
        let (snapshot, revision) = self.take_snapshot().await;
        let outcome = store.update(&snapshot).await;
        self.settle(outcome, revision).await
    }

    /// Send the current state to the store's `save` and adopt the assigned id.
    ///
    /// If the record changed while the call was in flight, only the id is
    /// adopted so later updates address the stored record.
    pub async fn create(&self, store: &dyn RecordStore) -> Result<Record> {
        let _lane = self.shared.lane.lock().await;
        let (snapshot, revision) = self.take_snapshot().await;
        let outcome = store.save(&snapshot).await;
        let result = self.settle(outcome, revision).await;
        if let Ok(stored) = &result {
            let mut record = self.shared.record.lock().await;
            if record.id().is_none() {
                record.set_id(stored.id());
                self.shared.snapshots.send_replace(record.clone());
            }
        }
        result
    }

    /// Delete the record from the store.
    pub async fn delete(&self, store: &dyn RecordStore) -> Result<()> {
        let _lane = self.shared.lane.lock().await;
        let (snapshot, revision) = self.take_snapshot().await;
        match store.delete(&snapshot).await {
            Ok(()) => {
                debug!(id = ?snapshot.id(), "record deleted");
                self.publish(SaveEvent::Saved { revision });
                Ok(())
            }
            Err(err) => {
                let error = FormError::from(err);
                warn!(id = ?snapshot.id(), %error, "delete failed");
                self.publish(SaveEvent::Failed {
                    revision,
                    error: error.clone(),
                });
                Err(error)
            }
        }
    }

    async fn take_snapshot(&self) -> (Record, u64) {
        let record = self.shared.record.lock().await;
        (record.clone(), self.revision())
    }

    async fn settle(
        &self,
        outcome: contacts_store::Result<Record>,
        revision: u64,
    ) -> Result<Record> {
        match outcome {
            Ok(stored) => {
                let mut record = self.shared.record.lock().await;
                if self.revision() == revision {
                    *record = stored.clone();
                    self.shared.snapshots.send_replace(record.clone());
                    debug!(revision, id = ?stored.id(), "store response applied");
                    self.publish(SaveEvent::Saved { revision });
                } else {
                    debug!(
                        revision,
                        current = self.revision(),
                        "store response superseded by local edits"
                    );
                    self.publish(SaveEvent::Superseded { revision });
                }
                Ok(stored)
            }
            Err(err) => {
                let error = FormError::from(err);
                warn!(revision, %error, "persisting record failed");
                self.publish(SaveEvent::Failed {
                    revision,
                    error: error.clone(),
                });
                Err(error)
            }
        }
    }

    fn publish(&self, event: SaveEvent) {
        // No subscribers is fine.
        let _ = self.shared.events.send(event);
    }
}

impl std::fmt::Debug for RecordHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RecordHandle")
            .field("revision", &self.revision())
            .finish_non_exhaustive()
    }
}

//! Debounced autosave timer

use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::{self, Instant};
use tracing::trace;

/// Delay between the last edit and its commit.
pub const DEFAULT_AUTOSAVE_DELAY: Duration = Duration::from_millis(1000);

/// Coalesces rapid `schedule` calls into one delayed commit.
///
/// At most one commit is armed at a time. Scheduling again cancels the armed
/// timer; it never aborts a commit that has already fired. Dropping the
/// debouncer cancels whatever is armed.
///
/// Must be used inside a tokio runtime.
#[derive(Debug)]
pub struct Debouncer {
    delay: Duration,
    pending: Option<JoinHandle<()>>,
}

impl Debouncer {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            pending: None,
        }
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Arm `commit` to run once `delay` has elapsed since this call.
    pub fn schedule<F>(&mut self, commit: F)
    where
        F: FnOnce() + Send + 'static,
    {
        let replaced = self.cancel();
        let deadline = Instant::now() + self.delay;
        trace!(
            delay_ms = self.delay.as_millis() as u64,
            replaced,
            "autosave armed"
        );
        self.pending = Some(tokio::spawn(async move {
            time::sleep_until(deadline).await;
            trace!("autosave fired");
            commit();
        }));
    }

    /// Disarm the pending commit. Returns true if one was still waiting.
    pub fn cancel(&mut self) -> bool {
        match self.pending.take() {
            Some(handle) if !handle.is_finished() => {
                handle.abort();
                trace!("autosave canceled");
                true
            }
            _ => false,
        }
    }

    pub fn is_pending(&self) -> bool {
        self.pending
            .as_ref()
            .is_some_and(|handle| !handle.is_finished())
    }

    /// Disarm the timer and run `commit` now.
    pub fn flush<F: FnOnce()>(&mut self, commit: F) {
        self.cancel();
        commit();
    }
}

impl Default for Debouncer {
    fn default() -> Self {
        Self::new(DEFAULT_AUTOSAVE_DELAY)
    }
}

impl Drop for Debouncer {
    fn drop(&mut self) {
        self.cancel();
    }
}

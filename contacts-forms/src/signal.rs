//! Form-wide signals broadcast to every bound field

use tokio::sync::broadcast;
use tracing::debug;

const SIGNAL_CAPACITY: usize = 16;

/// A signal a form sends to its fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormSignal {
    /// The form tried to save while invalid; fields should show their state.
    RecordInvalid,
}

impl FormSignal {
    pub fn name(&self) -> &'static str {
        match self {
            Self::RecordInvalid => "record:invalid",
        }
    }
}

/// Broadcast channel carrying [`FormSignal`]s from a form to its bindings.
#[derive(Debug, Clone)]
pub struct ValidationSignal {
    sender: broadcast::Sender<FormSignal>,
}

impl ValidationSignal {
    pub fn new() -> Self {
        let (sender, _) = broadcast::channel(SIGNAL_CAPACITY);
        Self { sender }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<FormSignal> {
        self.sender.subscribe()
    }

    /// Send `record:invalid`. Returns how many listeners received it.
    pub fn broadcast_invalid(&self) -> usize {
        let signal = FormSignal::RecordInvalid;
        let receivers = self.sender.send(signal).unwrap_or(0);
        debug!(signal = signal.name(), receivers, "form signal broadcast");
        receivers
    }

    pub fn listeners(&self) -> usize {
        self.sender.receiver_count()
    }
}

impl Default for ValidationSignal {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn broadcast_without_listeners_is_harmless() {
        let signal = ValidationSignal::new();
        assert_eq!(signal.broadcast_invalid(), 0);
    }

    #[test]
    fn every_subscriber_sees_the_signal() {
        let signal = ValidationSignal::new();
        let mut first = signal.subscribe();
        let mut second = signal.subscribe();
        assert_eq!(signal.broadcast_invalid(), 2);
        assert_eq!(first.try_recv().unwrap(), FormSignal::RecordInvalid);
        assert_eq!(second.try_recv().unwrap().name(), "record:invalid");
    }
}

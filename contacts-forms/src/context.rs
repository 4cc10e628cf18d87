//! Shared collaborators for every binding of a form

use std::sync::Arc;
use std::time::Duration;

use contacts_fields::FieldTypeRegistry;
use contacts_store::RecordStore;

use crate::autosave::DEFAULT_AUTOSAVE_DELAY;
use crate::signal::ValidationSignal;

/// What a form hands to its bindings: the store, the field types, the
/// autosave delay and the form's validation signal.
#[derive(Clone)]
pub struct FormContext {
    pub store: Arc<dyn RecordStore>,
    pub registry: Arc<FieldTypeRegistry>,
    pub autosave_delay: Duration,
    pub signal: ValidationSignal,
}

impl FormContext {
    pub fn new(store: Arc<dyn RecordStore>, registry: FieldTypeRegistry) -> Self {
        Self {
            store,
            registry: Arc::new(registry),
            autosave_delay: DEFAULT_AUTOSAVE_DELAY,
            signal: ValidationSignal::new(),
        }
    }

    pub fn with_autosave_delay(mut self, delay: Duration) -> Self {
        self.autosave_delay = delay;
        self
    }

    /// Same collaborators, fresh validation signal (one per form).
    pub fn for_new_form(&self) -> Self {
        Self {
            signal: ValidationSignal::new(),
            ..self.clone()
        }
    }
}

impl std::fmt::Debug for FormContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FormContext")
            .field("field_types", &self.registry.len())
            .field("autosave_delay", &self.autosave_delay)
            .finish_non_exhaustive()
    }
}

//! One record field bound to an editable control

use std::sync::Arc;

use contacts_fields::{label_case, Record};
use contacts_store::RecordStore;
use tokio::sync::broadcast::{self, error::TryRecvError};
use tracing::{debug, warn};

use crate::autosave::Debouncer;
use crate::context::FormContext;
use crate::error::{FormError, Result};
use crate::record::RecordHandle;
use crate::signal::{FormSignal, ValidationSignal};

/// Display state of the control, independent of the value.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ControlState {
    /// Set by an edit or by the form reporting itself invalid.
    pub dirty: bool,
}

/// Everything needed to draw one field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldView {
    pub field: String,
    pub label: String,
    pub value: String,
    /// Input type key, e.g. `email`.
    pub type_key: String,
    pub type_label: String,
    pub hint: String,
    pub required: bool,
    pub live: bool,
    pub dirty: bool,
    pub valid: bool,
}

/// Binds one field of a shared record to a control.
///
/// Live bindings autosave edits after the context's delay and persist
/// removals immediately. Bindings that are not live only change the local
/// record; the enclosing form saves it.
pub struct FieldBinding {
    ctx: FormContext,
    record: RecordHandle,
    field: String,
    live: bool,
    required: bool,
    autosave: Debouncer,
    control: ControlState,
    signals: Option<broadcast::Receiver<FormSignal>>,
}

impl FieldBinding {
    /// A live binding listening to the context's validation signal.
    pub fn new(ctx: &FormContext, record: RecordHandle, field: impl Into<String>) -> Self {
        Self {
            ctx: ctx.clone(),
            record,
            field: field.into(),
            live: true,
            required: false,
            autosave: Debouncer::new(ctx.autosave_delay),
            control: ControlState::default(),
            signals: Some(ctx.signal.subscribe()),
        }
    }

    pub fn with_live(mut self, live: bool) -> Self {
        self.live = live;
        self
    }

    pub fn with_required(mut self, required: bool) -> Self {
        self.required = required;
        self
    }

    /// Listen to another form's signal instead of the context's.
    pub fn listen(mut self, signal: &ValidationSignal) -> Self {
        self.signals = Some(signal.subscribe());
        self
    }

    pub fn field(&self) -> &str {
        &self.field
    }

    pub fn is_live(&self) -> bool {
        self.live
    }

    pub fn control(&self) -> ControlState {
        self.control
    }

    pub fn record(&self) -> &RecordHandle {
        &self.record
    }

    /// True while an autosave is armed but has not fired.
    pub fn has_pending_save(&self) -> bool {
        self.autosave.is_pending()
    }

    pub async fn render(&self) -> Result<FieldView> {
        let record = self.record.snapshot().await;
        self.view_of(&record)
    }

    fn view_of(&self, record: &Record) -> Result<FieldView> {
        let current = record
            .get(&self.field)
            .ok_or_else(|| FormError::field_not_found(&self.field))?;
        let field_type = self.ctx.registry.lookup(&current.type_key)?;
        let blank = current.value.trim().is_empty();
        Ok(FieldView {
            field: self.field.clone(),
            label: label_case(&self.field),
            value: current.value.clone(),
            type_key: field_type.key.clone(),
            type_label: field_type.label.clone(),
            hint: field_type.hint.clone(),
            required: self.required,
            live: self.live,
            dirty: self.control.dirty,
            valid: field_type.accepts(&current.value) && !(self.required && blank),
        })
    }

    /// Change the value locally; when live, arm an autosave.
    ///
    /// Autosave failures are published as [`SaveEvent::Failed`](crate::SaveEvent)
    /// on the record's event channel.
    pub async fn edit(&mut self, value: impl Into<String>) -> Result<()> {
        let value = value.into();
        self.record
            .mutate(|record| record.set_value(&self.field, value))
            .await?;
        self.control.dirty = true;

        if self.live {
            let record = self.record.clone();
            let store = Arc::clone(&self.ctx.store);
            let field = self.field.clone();
            self.autosave.schedule(move || {
                tokio::spawn(autosave(record, store, field));
            });
        }
        Ok(())
    }

    /// Drop the field from the record; when live, persist at once.
    ///
    /// If persisting fails the field is put back where it was and the error
    /// is returned.
    pub async fn remove(&mut self) -> Result<()> {
        self.autosave.cancel();
        let (index, removed) = self
            .record
            .mutate(|record| {
                let index = record
                    .position(&self.field)
                    .ok_or_else(|| FormError::field_not_found(&self.field))?;
                let removed = record
                    .remove(&self.field)
                    .ok_or_else(|| FormError::field_not_found(&self.field))?;
                Ok::<_, FormError>((index, removed))
            })
            .await?;
        debug!(field = %self.field, "field removed");

        if !self.live {
            return Ok(());
        }
        if let Err(err) = self.record.persist(self.ctx.store.as_ref()).await {
            warn!(field = %self.field, error = %err, "removal rejected, restoring field");
            self.record
                .mutate(|record| {
                    record.restore(index, self.field.clone(), removed);
                    Ok::<_, FormError>(())
                })
                .await?;
            return Err(err);
        }
        Ok(())
    }

    /// Persist now instead of waiting for the autosave (control blur).
    pub async fn flush(&mut self) -> Result<()> {
        let armed = self.autosave.cancel();
        if !self.live {
            return Ok(());
        }
        debug!(field = %self.field, armed, "flushing field");
        self.record.persist(self.ctx.store.as_ref()).await.map(|_| ())
    }

    /// The form reported its validity; invalid forms mark the control dirty.
    pub fn validity_changed(&mut self, invalid: bool) {
        if invalid {
            self.control.dirty = true;
        }
    }

    /// Apply every signal received since the last poll. Returns how many.
    pub fn poll_signals(&mut self) -> usize {
        let Some(receiver) = self.signals.as_mut() else {
            return 0;
        };
        let mut received = 0;
        loop {
            match receiver.try_recv() {
                Ok(FormSignal::RecordInvalid) => {
                    received += 1;
                    self.control.dirty = true;
                }
                Err(TryRecvError::Lagged(missed)) => {
                    received += missed as usize;
                    self.control.dirty = true;
                }
                Err(TryRecvError::Empty) => break,
                Err(TryRecvError::Closed) => {
                    self.signals = None;
                    break;
                }
            }
        }
        received
    }

    /// Disarm the autosave without persisting. Returns true if one was armed.
    pub fn cancel_autosave(&mut self) -> bool {
        self.autosave.cancel()
    }

    /// Cancel any armed autosave and stop listening for signals.
    pub fn teardown(&mut self) {
        if self.autosave.cancel() {
            debug!(field = %self.field, "pending autosave discarded");
        }
        self.signals = None;
    }
}

async fn autosave(record: RecordHandle, store: Arc<dyn RecordStore>, field: String) {
    // Failures are already published as save events.
    if record.persist(store.as_ref()).await.is_ok() {
        debug!(%field, "autosaved");
    }
}

impl std::fmt::Debug for FieldBinding {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FieldBinding")
            .field("field", &self.field)
            .field("live", &self.live)
            .field("required", &self.required)
            .field("control", &self.control)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use contacts_fields::FieldTypeRegistry;
    use contacts_store::InMemoryStore;

    fn context() -> FormContext {
        FormContext::new(Arc::new(InMemoryStore::new()), FieldTypeRegistry::builtin())
    }

    fn contact() -> Record {
        Record::new()
            .with_field("firstName", "Ann", "text")
            .with_field("email", "nope", "email")
            .with_field("twitter", "@ann", "twitter")
    }

    #[tokio::test]
    async fn render_resolves_type_and_label() {
        let ctx = context();
        let binding = FieldBinding::new(&ctx, RecordHandle::new(contact()), "firstName");
        let view = binding.render().await.unwrap();
        assert_eq!(view.label, "First Name");
        assert_eq!(view.type_key, "text");
        assert_eq!(view.hint, "should be text");
        assert!(view.valid);
        assert!(!view.dirty);
    }

    #[tokio::test]
    async fn render_flags_rejected_values() {
        let ctx = context();
        let binding = FieldBinding::new(&ctx, RecordHandle::new(contact()), "email");
        let view = binding.render().await.unwrap();
        assert_eq!(view.type_label, "Email");
        assert!(!view.valid);
    }

    #[tokio::test]
    async fn render_missing_field_or_unknown_type_is_not_found() {
        let ctx = context();
        let record = RecordHandle::new(contact());

        let err = FieldBinding::new(&ctx, record.clone(), "website")
            .render()
            .await
            .unwrap_err();
        assert_eq!(err, FormError::field_not_found("website"));

        let err = FieldBinding::new(&ctx, record, "twitter")
            .render()
            .await
            .unwrap_err();
        assert!(matches!(err, FormError::UnknownFieldType { ref key } if key == "twitter"));
    }

    #[tokio::test]
    async fn required_blank_field_is_invalid() {
        let ctx = context();
        let record = RecordHandle::new(Record::new().with_field("firstName", "", "text"));
        let binding = FieldBinding::new(&ctx, record, "firstName").with_required(true);
        assert!(!binding.render().await.unwrap().valid);
    }

    #[tokio::test]
    async fn validity_signal_marks_control_dirty() {
        let ctx = context();
        let mut binding = FieldBinding::new(&ctx, RecordHandle::new(contact()), "firstName");

        binding.validity_changed(false);
        assert!(!binding.control().dirty);

        ctx.signal.broadcast_invalid();
        assert_eq!(binding.poll_signals(), 1);
        assert!(binding.render().await.unwrap().dirty);
    }

    #[tokio::test]
    async fn teardown_unsubscribes() {
        let ctx = context();
        let mut binding = FieldBinding::new(&ctx, RecordHandle::new(contact()), "firstName");
        assert_eq!(ctx.signal.listeners(), 1);

        binding.teardown();
        assert_eq!(ctx.signal.listeners(), 0);
        ctx.signal.broadcast_invalid();
        assert_eq!(binding.poll_signals(), 0);
        assert!(!binding.control().dirty);
    }
}

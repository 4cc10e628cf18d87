//! One stored contact

use contacts_fields::{key_filter, Record, RecordId};
use contacts_forms::{
    FieldBinding, FieldView, FormContext, FormError, NewField, RecordHandle, ValidationSignal,
};
use tracing::{debug, info, warn};

use crate::error::Result;
use crate::nav::{Navigator, Route};

/// A stored contact whose fields are bound live: edits autosave, removals
/// and additions persist at once.
pub struct ContactDetail {
    ctx: FormContext,
    nav: Navigator,
    id: RecordId,
    record: RecordHandle,
    bindings: Vec<FieldBinding>,
    new_field: NewField,
}

impl ContactDetail {
    /// Fetch contact `id` and bind every field.
    pub async fn load(ctx: &FormContext, nav: Navigator, id: RecordId) -> Result<Self> {
        let ctx = ctx.for_new_form();
        let record = ctx.store.get(id).await.map_err(FormError::from)?;
        let fields: Vec<String> = key_filter(&record, Record::ID_KEY).into_keys().collect();
        debug!(%id, fields = fields.len(), "contact loaded");

        let record = RecordHandle::new(record);
        let bindings = fields
            .iter()
            .map(|field| FieldBinding::new(&ctx, record.clone(), field.as_str()))
            .collect();
        Ok(Self {
            new_field: NewField::new(&ctx, record.clone()),
            ctx,
            nav,
            id,
            record,
            bindings,
        })
    }

    pub fn id(&self) -> RecordId {
        self.id
    }

    pub fn record(&self) -> &RecordHandle {
        &self.record
    }

    /// The form's `record:invalid` signal.
    pub fn signal(&self) -> &ValidationSignal {
        &self.ctx.signal
    }

    pub fn bindings(&self) -> &[FieldBinding] {
        &self.bindings
    }

    pub fn binding_mut(&mut self, field: &str) -> Option<&mut FieldBinding> {
        self.bindings.iter_mut().find(|b| b.field() == field)
    }

    fn require_binding(&mut self, field: &str) -> Result<&mut FieldBinding> {
        Ok(self
            .binding_mut(field)
            .ok_or_else(|| FormError::field_not_found(field))?)
    }

    pub async fn render(&self) -> Result<Vec<FieldView>> {
        let mut views = Vec::with_capacity(self.bindings.len());
        for binding in &self.bindings {
            views.push(binding.render().await?);
        }
        Ok(views)
    }

    /// Edit a field; the change autosaves after the form's delay.
    pub async fn edit(&mut self, field: &str, value: &str) -> Result<()> {
        self.require_binding(field)?.edit(value).await?;
        Ok(())
    }

    /// Persist pending edits of a field now.
    pub async fn flush(&mut self, field: &str) -> Result<()> {
        self.require_binding(field)?.flush().await?;
        Ok(())
    }

    /// Remove a field and persist the removal. The field stays bound if the
    /// store rejects it.
    pub async fn remove_field(&mut self, field: &str) -> Result<()> {
        self.require_binding(field)?.remove().await?;
        if let Some(index) = self.bindings.iter().position(|b| b.field() == field) {
            let mut binding = self.bindings.remove(index);
            binding.teardown();
        }
        Ok(())
    }

    pub fn new_field(&mut self) -> &mut NewField {
        &mut self.new_field
    }

    /// Add the drafted field, persist it and bind it. Returns its key.
    pub async fn add_field(&mut self) -> Result<String> {
        let key = self.new_field.add(false).await?;
        if !self.bindings.iter().any(|b| b.field() == key) {
            self.bindings
                .push(FieldBinding::new(&self.ctx, self.record.clone(), key.as_str()));
        }
        Ok(key)
    }

    /// Delete the contact and return to the list.
    ///
    /// Armed autosaves are held while the delete is in flight. If the store
    /// rejects the delete, the view stays bound and held edits are persisted
    /// at once; their outcome is published as save events.
    pub async fn delete(&mut self) -> Result<()> {
        let mut held = 0;
        for binding in &mut self.bindings {
            if binding.cancel_autosave() {
                held += 1;
            }
        }

        if let Err(err) = self.record.delete(self.ctx.store.as_ref()).await {
            warn!(id = %self.id, error = %err, held, "delete rejected, keeping contact");
            if held > 0 && self.record.persist(self.ctx.store.as_ref()).await.is_err() {
                debug!(id = %self.id, "held edits not persisted");
            }
            return Err(err.into());
        }

        self.teardown();
        info!(id = %self.id, "contact deleted");
        self.nav.go(Route::Contacts);
        Ok(())
    }

    /// Stop every binding: pending autosaves are discarded.
    pub fn teardown(&mut self) {
        for binding in &mut self.bindings {
            binding.teardown();
        }
    }
}

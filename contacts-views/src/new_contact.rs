//! The new-contact form

use contacts_fields::Record;
use contacts_forms::{
    invalid_fields, FieldBinding, FieldView, FormContext, FormError, NewField, RecordHandle,
};
use tracing::{debug, info};

use crate::error::Result;
use crate::nav::{Navigator, Route};

/// Fields a new contact starts with, as `(name, type key)`.
pub const CONTACT_TEMPLATE: &[(&str, &str)] = &[
    ("firstName", "text"),
    ("lastName", "text"),
    ("email", "email"),
    ("homePhone", "tel"),
    ("cellPhone", "tel"),
    ("birthday", "date"),
    ("website", "url"),
    ("address", "text"),
];

/// A blank contact saved with an explicit [`save`](Self::save).
///
/// Field bindings are not live, so editing never reaches the store.
pub struct NewContact {
    ctx: FormContext,
    nav: Navigator,
    record: RecordHandle,
    bindings: Vec<FieldBinding>,
    new_field: NewField,
    required: Vec<String>,
}

impl NewContact {
    pub fn new(ctx: &FormContext, nav: Navigator) -> Self {
        let ctx = ctx.for_new_form();
        let template = CONTACT_TEMPLATE
            .iter()
            .fold(Record::new(), |record, (name, type_key)| {
                record.with_field(*name, "", *type_key)
            });
        let record = RecordHandle::new(template);
        let mut form = Self {
            new_field: NewField::new(&ctx, record.clone()).with_live(false),
            bindings: Vec::new(),
            required: Vec::new(),
            ctx,
            nav,
            record,
        };
        for (name, _) in CONTACT_TEMPLATE {
            form.bind(name);
        }
        form.set_required(["firstName"]);
        form
    }

    fn bind(&mut self, field: &str) {
        let required = self.required.iter().any(|r| r == field);
        self.bindings.push(
            FieldBinding::new(&self.ctx, self.record.clone(), field)
                .with_live(false)
                .with_required(required),
        );
    }

    /// Replace the set of fields that must not be blank.
    pub fn set_required<I, S>(&mut self, fields: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.required = fields.into_iter().map(Into::into).collect();
        let required = self.required.clone();
        self.bindings = std::mem::take(&mut self.bindings)
            .into_iter()
            .map(|binding| {
                let is_required = required.iter().any(|r| r == binding.field());
                binding.with_required(is_required)
            })
            .collect();
    }

    pub fn record(&self) -> &RecordHandle {
        &self.record
    }

    pub fn bindings(&self) -> &[FieldBinding] {
        &self.bindings
    }

    pub fn binding_mut(&mut self, field: &str) -> Option<&mut FieldBinding> {
        self.bindings.iter_mut().find(|b| b.field() == field)
    }

    pub async fn edit(&mut self, field: &str, value: &str) -> Result<()> {
        let binding = self
            .binding_mut(field)
            .ok_or_else(|| FormError::field_not_found(field))?;
        binding.edit(value).await?;
        Ok(())
    }

    pub async fn render(&self) -> Result<Vec<FieldView>> {
        let mut views = Vec::with_capacity(self.bindings.len());
        for binding in &self.bindings {
            views.push(binding.render().await?);
        }
        Ok(views)
    }

    pub fn new_field(&mut self) -> &mut NewField {
        &mut self.new_field
    }

    /// Add the drafted field and bind it. Returns its key.
    pub async fn add_field(&mut self) -> Result<String> {
        let key = self.new_field.add(false).await?;
        if !self.bindings.iter().any(|b| b.field() == key) {
            self.bind(&key);
        }
        Ok(key)
    }

    /// Fields that currently keep the form from being saved.
    pub async fn invalid_fields(&self) -> Vec<String> {
        let record = self.record.snapshot().await;
        invalid_fields(&record, &self.ctx.registry, &self.required)
    }

    /// Save the contact and return to the list.
    ///
    /// An invalid form broadcasts `record:invalid` to its fields and fails
    /// with [`FormError::ValidationFailed`]; nothing is sent to the store.
    pub async fn save(&mut self) -> Result<Record> {
        let invalid = self.invalid_fields().await;
        if !invalid.is_empty() {
            self.ctx.signal.broadcast_invalid();
            for binding in &mut self.bindings {
                binding.poll_signals();
            }
            debug!(?invalid, "new contact is invalid");
            return Err(FormError::ValidationFailed { fields: invalid }.into());
        }

        let stored = self.record.create(self.ctx.store.as_ref()).await?;
        info!(id = ?stored.id(), "contact created");
        self.nav.go(Route::Contacts);
        Ok(stored)
    }
}

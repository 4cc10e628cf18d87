//! Adding fields to a record

use contacts_fields::{camel_case, FieldValue, Record};
use tracing::{debug, warn};

use crate::context::FormContext;
use crate::error::{FormError, Result};
use crate::record::RecordHandle;

/// What the user has typed into the new-field creator so far.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldDraft {
    /// Human label, e.g. `Home Phone`.
    pub name: String,
    pub type_key: Option<String>,
    pub value: String,
}

/// Creator that adds a field to a record.
///
/// Hidden until [`show`](Self::show) picks a field type. [`add`](Self::add)
/// inserts `camel_case(name) -> [value, type]` and, when live, persists it.
#[derive(Debug)]
pub struct NewField {
    ctx: FormContext,
    record: RecordHandle,
    live: bool,
    draft: FieldDraft,
    displayed: bool,
}

impl NewField {
    pub fn new(ctx: &FormContext, record: RecordHandle) -> Self {
        Self {
            ctx: ctx.clone(),
            record,
            live: true,
            draft: FieldDraft::default(),
            displayed: false,
        }
    }

    pub fn with_live(mut self, live: bool) -> Self {
        self.live = live;
        self
    }

    /// Open the creator for a field type.
    pub fn show(&mut self, type_key: &str) -> Result<()> {
        self.ctx.registry.lookup(type_key)?;
        self.draft.type_key = Some(type_key.to_string());
        self.displayed = true;
        Ok(())
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.draft.name = name.into();
    }

    pub fn set_value(&mut self, value: impl Into<String>) {
        self.draft.value = value.into();
    }

    pub fn draft(&self) -> &FieldDraft {
        &self.draft
    }

    pub fn is_displayed(&self) -> bool {
        self.displayed
    }

    /// Reset the draft and hide the creator.
    pub fn clear(&mut self) {
        self.draft = FieldDraft::default();
        self.displayed = false;
    }

    /// Parts of the draft that keep it from being added.
    pub fn problems(&self) -> Vec<String> {
        let mut problems = Vec::new();
        let key = camel_case(self.draft.name.trim());
        if key.is_empty() || key == Record::ID_KEY {
            problems.push("name".to_string());
        }
        match self
            .draft
            .type_key
            .as_deref()
            .and_then(|key| self.ctx.registry.get(key))
        {
            None => problems.push("type".to_string()),
            Some(field_type) if !field_type.accepts(&self.draft.value) => {
                problems.push("value".to_string())
            }
            Some(_) => {}
        }
        problems
    }

    /// Add the drafted field to the record.
    ///
    /// Rejected with [`FormError::ValidationFailed`] when `form_invalid` is
    /// set or the draft has problems. A field with the same key is replaced.
    /// When live and the store rejects the change, the record is put back and
    /// the error returned. Returns the new field's key.
    pub async fn add(&mut self, form_invalid: bool) -> Result<String> {
        let mut problems = self.problems();
        if form_invalid {
            problems.insert(0, "form".to_string());
        }
        if !problems.is_empty() {
            debug!(?problems, "new field rejected");
            return Err(FormError::ValidationFailed { fields: problems });
        }

        let key = camel_case(self.draft.name.trim());
        let type_key = self.draft.type_key.clone().unwrap_or_default();
        let field = FieldValue::new(self.draft.value.clone(), type_key);
        let previous = self
            .record
            .mutate(|record| Ok::<_, FormError>(record.insert(key.clone(), field)))
            .await?;
        debug!(%key, replaced = previous.is_some(), "field added");

        if self.live {
            if let Err(err) = self.record.persist(self.ctx.store.as_ref()).await {
                warn!(%key, error = %err, "adding field rejected, reverting");
                self.record
                    .mutate(|record| {
                        match previous {
                            Some(old) => {
                                record.insert(key.clone(), old);
                            }
                            None => {
                                record.remove(&key);
                            }
                        }
                        Ok::<_, FormError>(())
                    })
                    .await?;
                return Err(err);
            }
        }

        self.clear();
        Ok(key)
    }
}

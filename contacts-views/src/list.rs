//! The contact list

use std::cmp::Ordering;
use std::sync::Arc;

use contacts_fields::{Record, RecordId};
use contacts_store::RecordStore;
use tracing::debug;

use crate::error::Result;
use crate::nav::{Navigator, Route};

/// Columns shown in the list.
pub const LIST_FIELDS: [&str; 2] = ["firstName", "lastName"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    Ascending,
    Descending,
}

impl SortOrder {
    pub fn toggled(self) -> Self {
        match self {
            Self::Ascending => Self::Descending,
            Self::Descending => Self::Ascending,
        }
    }
}

/// Sort column and direction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sort {
    pub field: String,
    pub order: SortOrder,
}

impl Default for Sort {
    fn default() -> Self {
        Self {
            field: LIST_FIELDS[0].to_string(),
            order: SortOrder::Ascending,
        }
    }
}

/// Every stored contact, sortable by a column.
pub struct ContactList {
    store: Arc<dyn RecordStore>,
    nav: Navigator,
    contacts: Vec<Record>,
    sort: Sort,
}

impl ContactList {
    pub fn new(store: Arc<dyn RecordStore>, nav: Navigator) -> Self {
        Self {
            store,
            nav,
            contacts: Vec::new(),
            sort: Sort::default(),
        }
    }

    /// Fetch the contacts from the store. Returns how many there are.
    pub async fn load(&mut self) -> Result<usize> {
        self.contacts = self.store.query().await?;
        debug!(count = self.contacts.len(), "contacts loaded");
        Ok(self.contacts.len())
    }

    pub fn contacts(&self) -> &[Record] {
        &self.contacts
    }

    pub fn fields(&self) -> &'static [&'static str] {
        &LIST_FIELDS
    }

    pub fn sort_state(&self) -> &Sort {
        &self.sort
    }

    /// Sort by `field`. Every call flips the direction, whichever column
    /// was sorted before.
    pub fn sort(&mut self, field: &str) {
        self.sort.field = field.to_string();
        self.sort.order = self.sort.order.toggled();
    }

    /// The contacts in display order: case-insensitive by the sort field,
    /// records lacking the field last.
    pub fn sorted(&self) -> Vec<&Record> {
        let field = self.sort.field.as_str();
        let mut rows: Vec<&Record> = self.contacts.iter().collect();
        rows.sort_by(|a, b| {
            let primary = match (sort_key(a, field), sort_key(b, field)) {
                (Some(a), Some(b)) => match self.sort.order {
                    SortOrder::Ascending => a.cmp(&b),
                    SortOrder::Descending => b.cmp(&a),
                },
                (Some(_), None) => Ordering::Less,
                (None, Some(_)) => Ordering::Greater,
                (None, None) => Ordering::Equal,
            };
            primary.then_with(|| a.id().cmp(&b.id()))
        });
        rows
    }

    /// Open a contact's detail view.
    pub fn show(&self, id: RecordId) {
        self.nav.go(Route::Contact(id));
    }
}

fn sort_key(record: &Record, field: &str) -> Option<String> {
    record.value_of(field).map(str::to_lowercase)
}

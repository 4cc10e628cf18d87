//! Contact views
//!
//! The screens of the contacts app, driving the field bindings from
//! `contacts-forms`:
//!
//! - [`ContactList`] - every contact, sortable by first or last name
//! - [`NewContact`] - a blank contact template saved explicitly
//! - [`ContactDetail`] - one stored contact whose fields autosave
//!
//! Views do not navigate through any global state; each takes a
//! [`Navigator`] and records where the user should go next. [`ContactsApp`]
//! opens the view for a route.

mod app;
mod error;
mod list;
mod nav;
mod new_contact;
mod single;

pub use app::{ContactsApp, Screen};
pub use error::{Result, ViewError};
pub use list::{ContactList, Sort, SortOrder, LIST_FIELDS};
pub use nav::{Navigator, Route};
pub use new_contact::{NewContact, CONTACT_TEMPLATE};
pub use single::ContactDetail;

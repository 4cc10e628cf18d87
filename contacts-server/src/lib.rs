//! Contacts server
//!
//! Serves the contact resource under `/api/contact` and the single-page app
//! everywhere else: files from the static root when they exist, the app shell
//! otherwise.
//!
//! | method | path | response |
//! |--------|------|----------|
//! | GET | `/api/contact` | 200, every contact |
//! | POST | `/api/contact` | 201, the created contact with its id |
//! | GET | `/api/contact/:id` | 200, or 404 |
//! | PUT | `/api/contact/:id` | 200 with the stored contact, or 404 |
//! | DELETE | `/api/contact/:id` | 204, or 404 |
//!
//! A non-numeric id is a 400.

mod api;
mod error;
mod server;

pub use api::{router, AppState};
pub use error::{ApiError, ServerError};
pub use server::start_server;

//! Routes and navigation state

use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use contacts_fields::RecordId;
use tokio::sync::watch;
use tracing::debug;

use crate::error::{Result, ViewError};

/// A screen of the app.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Route {
    /// `/contacts`
    Contacts,
    /// `/contact/new`
    NewContact,
    /// `/contact/:id`
    Contact(RecordId),
}

impl Route {
    /// Parse an app path. Query strings and trailing slashes are ignored;
    /// `/` is the contact list.
    pub fn parse(path: &str) -> Result<Self> {
        let trimmed = path.split(['?', '#']).next().unwrap_or_default();
        let trimmed = trimmed.trim_end_matches('/');
        let segments: Vec<&str> = trimmed
            .split('/')
            .filter(|segment| !segment.is_empty())
            .collect();
        match segments.as_slice() {
            [] | ["contacts"] => Ok(Self::Contacts),
            ["contact", "new"] => Ok(Self::NewContact),
            ["contact", id] => id
                .parse()
                .map(Self::Contact)
                .map_err(|_| ViewError::unknown_route(path)),
            _ => Err(ViewError::unknown_route(path)),
        }
    }

    pub fn path(&self) -> String {
        match self {
            Self::Contacts => "/contacts".to_string(),
            Self::NewContact => "/contact/new".to_string(),
            Self::Contact(id) => format!("/contact/{id}"),
        }
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.path())
    }
}

#[derive(Debug)]
struct History {
    visited: Vec<Route>,
}

/// Where the user is, shared by every view.
///
/// Cloning gives another handle to the same history.
#[derive(Debug, Clone)]
pub struct Navigator {
    history: Arc<Mutex<History>>,
    current: Arc<watch::Sender<Route>>,
}

impl Navigator {
    pub fn new(start: Route) -> Self {
        let (current, _) = watch::channel(start);
        Self {
            history: Arc::new(Mutex::new(History {
                visited: vec![start],
            })),
            current: Arc::new(current),
        }
    }

    fn history(&self) -> MutexGuard<'_, History> {
        self.history.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn current(&self) -> Route {
        *self.current.borrow()
    }

    pub fn go(&self, route: Route) {
        self.history().visited.push(route);
        self.current.send_replace(route);
        debug!(%route, "navigated");
    }

    /// Navigate to a path, e.g. one typed into the address bar.
    pub fn go_path(&self, path: &str) -> Result<Route> {
        let route = Route::parse(path)?;
        self.go(route);
        Ok(route)
    }

    /// Return to the previous route. The first route is never popped.
    pub fn back(&self) -> Option<Route> {
        let previous = {
            let mut history = self.history();
            if history.visited.len() < 2 {
                return None;
            }
            history.visited.pop();
            history.visited.last().copied()
        }?;
        self.current.send_replace(previous);
        debug!(route = %previous, "navigated back");
        Some(previous)
    }

    /// Every route visited, oldest first.
    pub fn visited(&self) -> Vec<Route> {
        self.history().visited.clone()
    }

    /// Receive the route after each navigation.
    pub fn subscribe(&self) -> watch::Receiver<Route> {
        self.current.subscribe()
    }
}

impl Default for Navigator {
    fn default() -> Self {
        Self::new(Route::Contacts)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_known_routes() {
        assert_eq!(Route::parse("/contacts").unwrap(), Route::Contacts);
        assert_eq!(Route::parse("/").unwrap(), Route::Contacts);
        assert_eq!(Route::parse("/contact/new").unwrap(), Route::NewContact);
        assert_eq!(
            Route::parse("/contact/12/?tab=1").unwrap(),
            Route::Contact(RecordId(12))
        );
    }

    #[test]
    fn parse_unknown_routes() {
        assert!(Route::parse("/contact/abc").unwrap_err().is_not_found());
        assert!(Route::parse("/settings").is_err());
        assert!(Route::parse("/contact/1/edit").is_err());
    }

    #[test]
    fn path_parses_back_to_route() {
        for route in [Route::Contacts, Route::NewContact, Route::Contact(RecordId(4))] {
            assert_eq!(Route::parse(&route.path()).unwrap(), route);
        }
    }

    #[test]
    fn go_and_back() {
        let nav = Navigator::default();
        nav.go(Route::NewContact);
        nav.go_path("/contact/3").unwrap();
        assert_eq!(nav.current(), Route::Contact(RecordId(3)));

        assert_eq!(nav.back(), Some(Route::NewContact));
        assert_eq!(nav.back(), Some(Route::Contacts));
        assert_eq!(nav.back(), None);
        assert_eq!(nav.current(), Route::Contacts);
    }

    #[test]
    fn clones_share_history() {
        let nav = Navigator::default();
        let other = nav.clone();
        let mut changes = nav.subscribe();
        other.go(Route::NewContact);
        assert_eq!(nav.current(), Route::NewContact);
        assert!(changes.has_changed().unwrap());
    }
}

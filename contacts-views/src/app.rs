//! Route to view dispatch

use std::sync::Arc;

use contacts_config::ContactsConfig;
use contacts_fields::FieldTypeRegistry;
use contacts_forms::FormContext;
use contacts_store::RestStore;
use tracing::debug;

use crate::error::Result;
use crate::list::ContactList;
use crate::nav::{Navigator, Route};
use crate::new_contact::NewContact;
use crate::single::ContactDetail;

/// The view opened for a route.
pub enum Screen {
    List(ContactList),
    New(NewContact),
    Detail(ContactDetail),
}

impl Screen {
    pub fn route(&self) -> Route {
        match self {
            Self::List(_) => Route::Contacts,
            Self::New(_) => Route::NewContact,
            Self::Detail(detail) => Route::Contact(detail.id()),
        }
    }
}

/// Opens views against one store and navigator.
#[derive(Debug, Clone)]
pub struct ContactsApp {
    ctx: FormContext,
    nav: Navigator,
}

impl ContactsApp {
    pub fn new(ctx: FormContext, nav: Navigator) -> Self {
        Self { ctx, nav }
    }

    /// Talk to the REST resource at `api.base_url`, autosaving after
    /// `autosave.delay_ms`.
    pub fn from_config(config: &ContactsConfig, registry: FieldTypeRegistry) -> Self {
        let store = Arc::new(RestStore::new(config.api.base_url.clone()));
        let ctx = FormContext::new(store, registry).with_autosave_delay(config.autosave.delay());
        Self::new(ctx, Navigator::default())
    }

    pub fn context(&self) -> &FormContext {
        &self.ctx
    }

    pub fn navigator(&self) -> &Navigator {
        &self.nav
    }

    pub async fn open(&self, route: Route) -> Result<Screen> {
        debug!(%route, "opening view");
        let screen = match route {
            Route::Contacts => {
                let mut list = ContactList::new(Arc::clone(&self.ctx.store), self.nav.clone());
                list.load().await?;
                Screen::List(list)
            }
            Route::NewContact => Screen::New(NewContact::new(&self.ctx, self.nav.clone())),
            Route::Contact(id) => {
                Screen::Detail(ContactDetail::load(&self.ctx, self.nav.clone(), id).await?)
            }
        };
        Ok(screen)
    }

    /// Open the view for wherever the navigator points.
    pub async fn open_current(&self) -> Result<Screen> {
        self.open(self.nav.current()).await
    }
}

//! Configuration for the contacts workspace
//!
//! Settings are read with figment, later sources overriding earlier ones:
//!
//! 1. Built-in defaults
//! 2. `contacts.toml`, `contacts.yaml`/`contacts.yml` or `contacts.json` in the
//!    search directory, or one explicitly named file
//! 3. Environment variables prefixed `CONTACTS_`, nested with `__`
//!    (`CONTACTS_SERVER__PORT=8080`)
//!
//! ```no_run
//! use contacts_config::ConfigProvider;
//!
//! let config = ConfigProvider::new().load()?;
//! println!("listening on {}", config.server.address());
//! # Ok::<(), contacts_config::ConfigError>(())
//! ```

mod error;
mod provider;
mod types;

pub use error::{ConfigError, ConfigResult};
pub use provider::{ConfigProvider, CONFIG_FILE_STEM, ENV_PREFIX};
pub use types::{ApiConfig, AutosaveConfig, ContactsConfig, ServerConfig};

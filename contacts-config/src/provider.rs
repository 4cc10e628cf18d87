//! Configuration provider using Figment

use std::path::{Path, PathBuf};

use figment::{
    providers::{Env, Format, Json, Serialized, Toml, Yaml},
    Figment,
};
use tracing::{debug, trace};

use crate::error::{ConfigError, ConfigResult};
use crate::types::ContactsConfig;

/// File name, without extension, looked for in the search directory.
pub const CONFIG_FILE_STEM: &str = "contacts";

/// Prefix of environment variables that override file settings.
pub const ENV_PREFIX: &str = "CONTACTS_";

/// Loads [`ContactsConfig`] from defaults, files and the environment.
///
/// Nothing is cached; every `load` reads the sources again.
#[derive(Debug, Clone)]
pub struct ConfigProvider {
    search_dir: PathBuf,
    file: Option<PathBuf>,
}

impl ConfigProvider {
    /// Look for `contacts.{toml,yaml,yml,json}` in the working directory.
    pub fn new() -> Self {
        Self::in_dir(".")
    }

    pub fn in_dir(dir: impl Into<PathBuf>) -> Self {
        Self {
            search_dir: dir.into(),
            file: None,
        }
    }

    /// Read this file instead of searching. It must exist.
    pub fn with_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.file = Some(path.into());
        self
    }

    pub fn load(&self) -> ConfigResult<ContactsConfig> {
        let config: ContactsConfig = self.figment()?.extract()?;
        config.validate()?;
        debug!(
            address = %config.server.address(),
            delay_ms = config.autosave.delay_ms,
            "configuration loaded"
        );
        Ok(config)
    }

    /// Sources in precedence order, later overriding earlier.
    pub fn figment(&self) -> ConfigResult<Figment> {
        let mut figment = Figment::from(Serialized::defaults(ContactsConfig::default()));
        for path in self.config_files()? {
            trace!(path = %path.display(), "merging config file");
            figment = figment.merge(file_provider(&path)?);
        }
        Ok(figment.merge(Env::prefixed(ENV_PREFIX).split("__")))
    }

    fn config_files(&self) -> ConfigResult<Vec<PathBuf>> {
        if let Some(file) = &self.file {
            if !file.is_file() {
                return Err(ConfigError::FileNotFound { path: file.clone() });
            }
            return Ok(vec![file.clone()]);
        }
        Ok(["toml", "yaml", "yml", "json"]
            .iter()
            .map(|ext| self.search_dir.join(format!("{CONFIG_FILE_STEM}.{ext}")))
            .filter(|path| path.is_file())
            .collect())
    }
}

impl Default for ConfigProvider {
    fn default() -> Self {
        Self::new()
    }
}

fn file_provider(path: &Path) -> ConfigResult<Figment> {
    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_ascii_lowercase);
    match extension.as_deref() {
        Some("toml") => Ok(Figment::from(Toml::file(path))),
        Some("yaml") | Some("yml") => Ok(Figment::from(Yaml::file(path))),
        Some("json") => Ok(Figment::from(Json::file(path))),
        _ => Err(ConfigError::UnsupportedFormat {
            path: path.to_path_buf(),
        }),
    }
}

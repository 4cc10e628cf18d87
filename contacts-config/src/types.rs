//! Configuration values

use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, ConfigResult};

/// Everything the contacts server and its clients can be configured with.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ContactsConfig {
    pub server: ServerConfig,
    pub autosave: AutosaveConfig,
    pub api: ApiConfig,
}

/// Where the shell server listens and what it serves.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Root of the static files.
    pub static_dir: PathBuf,
    /// App shell served for every path that is neither a file nor the API,
    /// relative to `static_dir`.
    pub shell: PathBuf,
}

impl ServerConfig {
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn shell_path(&self) -> PathBuf {
        self.static_dir.join(&self.shell)
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 3000,
            static_dir: PathBuf::from("public"),
            shell: PathBuf::from("main.html"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AutosaveConfig {
    /// Quiet period after the last edit before it is persisted.
    pub delay_ms: u64,
}

impl AutosaveConfig {
    pub fn delay(&self) -> Duration {
        Duration::from_millis(self.delay_ms)
    }
}

impl Default for AutosaveConfig {
    fn default() -> Self {
        Self { delay_ms: 1000 }
    }
}

/// Where REST clients find the contact resource.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    pub base_url: String,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:3000/api/contact".to_string(),
        }
    }
}

impl ContactsConfig {
    /// Reject values that would only fail later.
    pub fn validate(&self) -> ConfigResult<()> {
        let host = self.server.host.trim();
        if host.is_empty() || host.contains(char::is_whitespace) {
            return Err(ConfigError::invalid_value(
                "server.host",
                format!("'{}' is not a host name or address", self.server.host),
            ));
        }
        if self.server.shell.as_os_str().is_empty() {
            return Err(ConfigError::invalid_value("server.shell", "must not be empty"));
        }
        let url = url::Url::parse(&self.api.base_url)
            .map_err(|e| ConfigError::invalid_value("api.base_url", e.to_string()))?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(ConfigError::invalid_value(
                "api.base_url",
                format!("unsupported scheme '{}'", url.scheme()),
            ));
        }
        Ok(())
    }
}

//! Client configuration.
//!
//! Configuration is loaded from multiple sources with the following
//! priority:
//!
//! 1. Environment variables (`SKIFF_*`)
//! 2. Configuration file (`~/.config/skiff/config.toml`)
//! 3. Default values
//!
//! Neither the file nor the environment is required.
//!
//! ## Example configuration file
//!
//! ```toml
//! base_url = "http://127.0.0.1:7070"
//! token = "st_deadbeef"
//! timeout_ms = 30000
//! ```

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Default daemon address.
pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:7070";

/// Default per-request timeout in milliseconds.
pub const DEFAULT_TIMEOUT_MS: u64 = 30_000;

/// Client configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Daemon base address.
    pub base_url: String,
    /// Bearer credential. Optional; unauthenticated calls are sent as-is.
    pub token: Option<String>,
    /// Accepted alias for `token`. Takes precedence when both are set.
    pub api_key: Option<String>,
    /// Per-request timeout in milliseconds.
    pub timeout_ms: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            token: None,
            api_key: None,
            timeout_ms: DEFAULT_TIMEOUT_MS,
        }
    }
}

impl Config {
    /// Loads configuration from the user config file and environment.
    ///
    /// # Errors
    ///
    /// Returns an error if a present source cannot be parsed.
    pub fn load() -> Result<Self, figment::Error> {
        Self::load_from(user_config_path())
    }

    /// Loads configuration from a specific file (plus environment).
    ///
    /// # Errors
    ///
    /// Returns an error if the file or environment cannot be parsed.
    pub fn load_from(path: impl AsRef<Path>) -> Result<Self, figment::Error> {
        Figment::new()
            .merge(Serialized::defaults(Self::default()))
            .merge(Toml::file(path))
            .merge(Env::prefixed("SKIFF_"))
            .extract()
    }

    /// Saves this configuration to a file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be written.
    pub fn save_to(&self, path: impl AsRef<Path>) -> io::Result<()> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self).map_err(io::Error::other)?;
        fs::write(path, content)?;
        tracing::debug!(path = %path.display(), "saved configuration");
        Ok(())
    }

    /// Returns the effective bearer credential, if any.
    ///
    /// `api_key` is an accepted alias for `token` and takes precedence when
    /// both are configured.
    #[must_use]
    pub fn bearer_token(&self) -> Option<&str> {
        self.api_key.as_deref().or(self.token.as_deref())
    }
}

/// Returns the per-user configuration file path.
#[must_use]
pub fn user_config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("/tmp"))
        .join("skiff")
        .join("config.toml")
}

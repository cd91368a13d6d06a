//! Global configuration management for pubmail.
//!
//! The configuration file (`~/.pubmail/config.toml`) tells the CLI where the form
//! API lives so deferred `:link{form=...}` directives can be resolved. It may hold
//! an API token and should not be committed to version control.
//!
//! # Configuration File Location
//!
//! - **Unix/macOS**: `~/.pubmail/config.toml`
//! - **Windows**: `%LOCALAPPDATA%\pubmail\config.toml`
//!
//! The location can be overridden using the `PUBMAIL_CONFIG_PATH` environment
//! variable or the CLI `--config` flag.
//!
//! # File Format
//!
//! ```toml
//! [forms]
//! api_url = "https://forms.example.org/api"
//! api_token = "secret"      # optional, PUBMAIL_API_TOKEN takes precedence
//! timeout_secs = 30         # optional
//! ```
//!
//! # Examples
//!
//! ```rust,no_run
//! use pubmail::config::GlobalConfig;
//!
//! # async fn example() -> anyhow::Result<()> {
//! let config = GlobalConfig::load().await?;
//! if let Some(forms) = &config.forms {
//!     println!("Form API: {}", forms.api_url);
//! }
//! # Ok(())
//! # }
//! ```

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio::fs;

use crate::constants::{
    API_TOKEN_ENV, CONFIG_DIR_NAME, CONFIG_FILE_NAME, CONFIG_PATH_ENV, DEFAULT_FORM_API_TIMEOUT,
};

/// Connection settings for the form API (`[forms]`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormApiConfig {
    /// Base URL; endpoints are `{api_url}/forms/{form}/members` and `.../invites`.
    pub api_url: String,

    /// Bearer token sent with every request.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_token: Option<String>,

    /// Per-request timeout in seconds. Default: 30.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout_secs: Option<u64>,
}

impl FormApiConfig {
    /// The request timeout, falling back to the default.
    #[must_use]
    pub fn timeout(&self) -> Duration {
        self.timeout_secs.map_or(DEFAULT_FORM_API_TIMEOUT, Duration::from_secs)
    }

    /// The API token, with `PUBMAIL_API_TOKEN` taking precedence over the file.
    #[must_use]
    pub fn resolved_token(&self) -> Option<String> {
        std::env::var(API_TOKEN_ENV)
            .ok()
            .filter(|token| !token.is_empty())
            .or_else(|| self.api_token.clone())
    }
}

/// Global configuration structure for pubmail.
///
/// A missing file is equivalent to `GlobalConfig::default()`: documents render,
/// but form links fail because no form API is known.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GlobalConfig {
    /// Form API settings. Required only for documents with `:link{form=...}`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub forms: Option<FormApiConfig>,
}

impl GlobalConfig {
    /// Load the configuration from the default location, or defaults if the file
    /// does not exist.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The default path cannot be determined
    /// - The file exists but cannot be read
    /// - The file contains invalid TOML syntax
    pub async fn load() -> Result<Self> {
        Self::load_with_optional(None).await
    }

    /// Load from `path` if given, otherwise from the default location.
    ///
    /// An explicitly given path must exist; a missing default file yields defaults.
    pub async fn load_with_optional(path: Option<PathBuf>) -> Result<Self> {
        match path {
            Some(path) => Self::load_from(&path).await,
            None => {
                let path = Self::default_path()?;
                if path.exists() {
                    Self::load_from(&path).await
                } else {
                    Ok(Self::default())
                }
            }
        }
    }

    /// Load the configuration from a specific file path.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The file cannot be read (permissions, not found, etc.)
    /// - The file contains invalid TOML syntax
    /// - The TOML structure doesn't match the expected schema
    pub async fn load_from(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .await
            .with_context(|| format!("Failed to read config from {}", path.display()))?;

        toml::from_str(&content)
            .with_context(|| format!("Failed to parse config from {}", path.display()))
    }

    /// Save the configuration to a specific file path, creating parent directories.
    ///
    /// The CLI only reads configuration; this is for tools that provision it.
    pub async fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).await.with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }

        let content = toml::to_string_pretty(self).context("Failed to serialize config")?;
        fs::write(path, content)
            .await
            .with_context(|| format!("Failed to write config to {}", path.display()))
    }

    /// Path of the configuration file.
    ///
    /// `PUBMAIL_CONFIG_PATH` wins; otherwise `~/.pubmail/config.toml`
    /// (`%LOCALAPPDATA%\pubmail\config.toml` on Windows).
    ///
    /// # Errors
    ///
    /// Returns an error if the home (or local data) directory cannot be determined.
    pub fn default_path() -> Result<PathBuf> {
        if let Ok(path) = std::env::var(CONFIG_PATH_ENV) {
            return Ok(PathBuf::from(path));
        }

        let config_dir = if cfg!(target_os = "windows") {
            dirs::data_local_dir()
                .ok_or_else(|| anyhow::anyhow!("Unable to determine local data directory"))?
                .join("pubmail")
        } else {
            dirs::home_dir()
                .ok_or_else(|| anyhow::anyhow!("Unable to determine home directory"))?
                .join(CONFIG_DIR_NAME)
        };

        Ok(config_dir.join(CONFIG_FILE_NAME))
    }
}

//! Configuration parsing.
//!
//! `varspec.toml` holds three sections:
//!
//! ```toml
//! [kdp]
//! base_url = "https://kdp.example.com/"
//! host = "kdp.example.com"
//! variant_specification_user_key = "..."
//! product_specification_user_key = "..."
//! originating_system = "VARSPEC"
//! token = "..."
//!
//! [server]
//! host = "127.0.0.1"
//! port = 8080
//!
//! [data]
//! orders_file = "orders.json"
//! ```
//!
//! `VARSPEC_KDP_TOKEN` and `VARSPEC_ORDERS_FILE` override the file.

use reqwest::Url;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Environment variable overriding `kdp.token`.
pub const ENV_KDP_TOKEN: &str = "VARSPEC_KDP_TOKEN";

/// Environment variable overriding `data.orders_file`.
pub const ENV_ORDERS_FILE: &str = "VARSPEC_ORDERS_FILE";

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Cannot read configuration file '{path}': {reason}")]
    Io { path: PathBuf, reason: String },

    #[error("Invalid configuration: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Missing required configuration value '{0}'")]
    MissingKey(&'static str),

    #[error("Invalid configuration value '{key}': {reason}")]
    InvalidValue { key: &'static str, reason: String },
}

// =============================================================================
// TOP-LEVEL CONFIG
// =============================================================================

/// Top-level application configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct VarspecConfig {
    /// KDP connection settings.
    #[serde(default)]
    pub kdp: KdpConfig,

    /// HTTP server settings.
    #[serde(default)]
    pub server: ServerConfig,

    /// Data sources.
    #[serde(default)]
    pub data: DataConfig,
}

impl VarspecConfig {
    /// Load configuration from a TOML file.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;
        Self::from_toml(&content)
    }

    /// Parse configuration from a TOML string.
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    /// Load from `path` when given, defaults otherwise, then apply the
    /// process environment.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let config = match path {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        Ok(config.with_overrides(|key| std::env::var(key).ok()))
    }

    /// Apply overrides from `lookup`; empty values are ignored.
    #[must_use]
    pub fn with_overrides(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        let lookup = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(token) = lookup(ENV_KDP_TOKEN) {
            self.kdp.token = Some(token);
        }
        if let Some(file) = lookup(ENV_ORDERS_FILE) {
            self.data.orders_file = Some(PathBuf::from(file));
        }
        self
    }
}

// =============================================================================
// KDP
// =============================================================================

/// Raw `[kdp]` section. Every key is optional in the file; `settings()`
/// decides which ones are required.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct KdpConfig {
    pub base_url: Option<String>,
    pub host: Option<String>,
    pub variant_specification_user_key: Option<String>,
    /// Needed only for product specification requests.
    pub product_specification_user_key: Option<String>,
    pub originating_system: Option<String>,
    pub token: Option<String>,
}

/// Validated KDP connection settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KdpSettings {
    pub base_url: Url,
    pub host: String,
    pub user_key: String,
    /// `user-key` of the product specification endpoint, when configured.
    pub product_user_key: Option<String>,
    pub originating_system: String,
}

impl KdpConfig {
    /// True if any KDP key is present, i.e. the user meant to configure KDP.
    pub fn is_configured(&self) -> bool {
        self.base_url.is_some()
            || self.host.is_some()
            || self.variant_specification_user_key.is_some()
            || self.originating_system.is_some()
    }

    /// Validate the section into connection settings.
    pub fn settings(&self) -> Result<KdpSettings, ConfigError> {
        let base_url = required(self.base_url.as_deref(), "kdp.base_url")?;
        let base_url = Url::parse(base_url).map_err(|e| ConfigError::InvalidValue {
            key: "kdp.base_url",
            reason: e.to_string(),
        })?;
        if base_url.cannot_be_a_base() {
            return Err(ConfigError::InvalidValue {
                key: "kdp.base_url",
                reason: format!("'{base_url}' cannot carry a path"),
            });
        }

        Ok(KdpSettings {
            base_url,
            host: required(self.host.as_deref(), "kdp.host")?.to_string(),
            user_key: required(
                self.variant_specification_user_key.as_deref(),
                "kdp.variant_specification_user_key",
            )?
            .to_string(),
            product_user_key: self
                .product_specification_user_key
                .as_deref()
                .map(str::trim)
                .filter(|v| !v.is_empty())
                .map(str::to_string),
            originating_system: required(
                self.originating_system.as_deref(),
                "kdp.originating_system",
            )?
            .to_string(),
        })
    }

    /// The configured token.
    pub fn token(&self) -> Result<&str, ConfigError> {
        required(self.token.as_deref(), "kdp.token")
    }
}

fn required<'a>(value: Option<&'a str>, key: &'static str) -> Result<&'a str, ConfigError> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .ok_or(ConfigError::MissingKey(key))
}

// =============================================================================
// SERVER / DATA
// =============================================================================

/// `[server]` section.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    8080
}

/// `[data]` section.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DataConfig {
    /// JSON file holding the test object orders.
    pub orders_file: Option<PathBuf>,
}

// =============================================================================
// TESTS
// =============================================================================

//! # Client Configuration
//!
//! Configuration management for the storefront client.
//!
//! ## Configuration Sources
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Configuration Priority                               │
//! │                                                                         │
//! │  1. Environment Variables (highest priority)                           │
//! │     LAREK_API_URL=https://shop.example/api/weblarek                    │
//! │     LAREK_CDN_URL, LAREK_API_TIMEOUT, LAREK_LOG                        │
//! │                                                                         │
//! │  2. TOML Config File                                                   │
//! │     ~/.config/larek/client.toml (Linux)                                │
//! │     ~/Library/Application Support/larek/client.toml (macOS)            │
//! │                                                                         │
//! │  3. Default Values (lowest priority)                                   │
//! │     local development API, "synapses", info logging                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Configuration File Format
//! ```toml
//! # client.toml
//! [api]
//! base_url = "http://localhost:3000/api/weblarek"
//! cdn_url = "http://localhost:3000/content/weblarek"
//! timeout_secs = 10
//!
//! [display]
//! currency_name = "synapses"
//! priceless_label = "Priceless"
//!
//! [log]
//! filter = "info,larek=debug"
//! ```

use std::path::PathBuf;
use std::time::Duration;

use larek_core::Money;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};
use url::Url;

use crate::error::{ClientError, ClientResult};

// =============================================================================
// API Settings
// =============================================================================

/// Where the storefront API and its image CDN live.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiSettings {
    /// Root of the API; `product/` and `order/` are resolved against it.
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Root that product image paths are appended to.
    #[serde(default = "default_cdn_url")]
    pub cdn_url: String,

    /// Per-request timeout (seconds).
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
}

fn default_base_url() -> String {
    "http://localhost:3000/api/weblarek".to_string()
}

fn default_cdn_url() -> String {
    "http://localhost:3000/content/weblarek".to_string()
}

fn default_timeout() -> u64 {
    10
}

impl Default for ApiSettings {
    fn default() -> Self {
        ApiSettings {
            base_url: default_base_url(),
            cdn_url: default_cdn_url(),
            timeout_secs: default_timeout(),
        }
    }
}

// =============================================================================
// Display Settings
// =============================================================================

/// How prices are shown to the shopper.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DisplaySettings {
    #[serde(default = "default_currency_name")]
    pub currency_name: String,

    /// Shown instead of a number for products without a price.
    #[serde(default = "default_priceless_label")]
    pub priceless_label: String,
}

fn default_currency_name() -> String {
    "synapses".to_string()
}

fn default_priceless_label() -> String {
    "Priceless".to_string()
}

impl Default for DisplaySettings {
    fn default() -> Self {
        DisplaySettings {
            currency_name: default_currency_name(),
            priceless_label: default_priceless_label(),
        }
    }
}

impl DisplaySettings {
    /// Formats an amount as "N synapses".
    ///
    /// ## Example
    /// ```rust
    /// use larek_client::config::DisplaySettings;
    /// use larek_core::Money;
    ///
    /// let display = DisplaySettings::default();
    /// assert_eq!(display.format_money(Money::from_units(750)), "750 synapses");
    /// ```
    pub fn format_money(&self, amount: Money) -> String {
        format!("{} {}", amount, self.currency_name)
    }

    /// Formats a product price, falling back to the priceless label.
    pub fn format_price(&self, price: Option<Money>) -> String {
        match price {
            Some(amount) => self.format_money(amount),
            None => self.priceless_label.clone(),
        }
    }
}

// =============================================================================
// Log Settings
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogSettings {
    /// `tracing_subscriber::EnvFilter` directive string.
    #[serde(default = "default_log_filter")]
    pub filter: String,
}

fn default_log_filter() -> String {
    "info,larek=debug".to_string()
}

impl Default for LogSettings {
    fn default() -> Self {
        LogSettings {
            filter: default_log_filter(),
        }
    }
}

// =============================================================================
// Main Client Configuration
// =============================================================================

/// Complete client configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientConfig {
    #[serde(default)]
    pub api: ApiSettings,

    #[serde(default)]
    pub display: DisplaySettings,

    #[serde(default)]
    pub log: LogSettings,
}

impl ClientConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads configuration from file, environment, and defaults.
    ///
    /// ## Load Order (later overrides earlier)
    /// 1. Default values
    /// 2. Config file (client.toml)
    /// 3. Environment variables
    pub fn load(config_path: Option<PathBuf>) -> ClientResult<Self> {
        let mut config = Self::default();

        if let Some(path) = config_path.or_else(Self::default_config_path) {
            if path.exists() {
                info!(?path, "Loading client config from file");
                let contents = std::fs::read_to_string(&path)?;
                config = toml::from_str(&contents)?;
            } else {
                debug!(?path, "Config file not found, using defaults");
            }
        }

        config.apply_env_overrides();
        config.validate()?;

        Ok(config)
    }

    /// Writes the configuration as TOML, creating parent directories.
    ///
    /// Returns the path written.
    pub fn save(&self, config_path: Option<PathBuf>) -> ClientResult<PathBuf> {
        let path = config_path
            .or_else(Self::default_config_path)
            .ok_or_else(|| ClientError::ConfigSaveFailed("No config path available".into()))?;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| ClientError::ConfigSaveFailed(e.to_string()))?;
        }

        let contents = toml::to_string_pretty(self)?;
        std::fs::write(&path, contents).map_err(|e| ClientError::ConfigSaveFailed(e.to_string()))?;

        info!(?path, "Client config saved");
        Ok(path)
    }

    /// Validates the configuration.
    pub fn validate(&self) -> ClientResult<()> {
        parse_http_url("api.base_url", &self.api.base_url)?;
        parse_http_url("api.cdn_url", &self.api.cdn_url)?;

        if self.api.timeout_secs == 0 {
            return Err(ClientError::InvalidConfig(
                "timeout_secs must be greater than 0".into(),
            ));
        }

        Ok(())
    }

    /// Applies `LAREK_*` environment variable overrides.
    fn apply_env_overrides(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(url) = lookup("LAREK_API_URL") {
            debug!(url = %url, "Overriding API URL from environment");
            self.api.base_url = url;
        }

        if let Some(url) = lookup("LAREK_CDN_URL") {
            debug!(url = %url, "Overriding CDN URL from environment");
            self.api.cdn_url = url;
        }

        if let Some(timeout) = lookup("LAREK_API_TIMEOUT") {
            match timeout.parse::<u64>() {
                Ok(secs) => self.api.timeout_secs = secs,
                Err(_) => warn!(value = %timeout, "Ignoring non-numeric LAREK_API_TIMEOUT"),
            }
        }

        if let Some(filter) = lookup("LAREK_LOG") {
            self.log.filter = filter;
        }
    }

    /// Returns the default config file path.
    pub fn default_config_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("", "", "larek")
            .map(|dirs| dirs.config_dir().join("client.toml"))
    }

    // =========================================================================
    // Convenience Methods
    // =========================================================================

    /// API root as a directory URL (always ends in `/`).
    pub fn base_url(&self) -> ClientResult<Url> {
        parse_http_url("api.base_url", &self.api.base_url).map(as_directory)
    }

    /// CDN root as a directory URL (always ends in `/`).
    pub fn cdn_url(&self) -> ClientResult<Url> {
        parse_http_url("api.cdn_url", &self.api.cdn_url).map(as_directory)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.api.timeout_secs)
    }
}

fn parse_http_url(field: &str, raw: &str) -> ClientResult<Url> {
    let url = Url::parse(raw).map_err(|e| ClientError::InvalidUrl(format!("{field}: {e}")))?;
    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(ClientError::InvalidUrl(format!(
            "{field} must start with http:// or https://, got: {raw}"
        )));
    }
    Ok(url)
}

/// `Url::join` replaces the last path segment unless the base ends in `/`.
fn as_directory(mut url: Url) -> Url {
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    url
}

//! User settings for MyWallet
//!
//! Manages the remote API location, display preferences, and how the client
//! reacts when the remote rejects a session.

use serde::{Deserialize, Serialize};

use super::paths::WalletPaths;
use crate::error::WalletError;

/// Default remote endpoint, matching a locally running wallet API
pub const DEFAULT_API_URL: &str = "http://localhost:3000/api/wallet";

/// What to do when the remote answers 401/403 for a stored session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum AuthFailurePolicy {
    /// Drop the stored session; the user has to log in again
    #[default]
    Logout,
    /// Treat it like any other remote outage and keep working from the cache
    UseCache,
}

/// User settings for MyWallet
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Schema version for migration support
    #[serde(default = "default_schema_version")]
    pub schema_version: u32,

    /// Base URL of the wallet API; `None` keeps everything local
    #[serde(default = "default_api_url")]
    pub api_url: Option<String>,

    /// Timeout for a single remote request, in seconds
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,

    #[serde(default)]
    pub auth_failure: AuthFailurePolicy,

    #[serde(default = "default_currency")]
    pub currency_symbol: String,

    /// Date format preference (strftime format)
    #[serde(default = "default_date_format")]
    pub date_format: String,
}

fn default_schema_version() -> u32 {
    1
}

fn default_api_url() -> Option<String> {
    Some(DEFAULT_API_URL.to_string())
}

fn default_request_timeout() -> u64 {
    10
}

fn default_currency() -> String {
    "€".to_string()
}

fn default_date_format() -> String {
    "%d/%m/%Y".to_string()
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            schema_version: default_schema_version(),
            api_url: default_api_url(),
            request_timeout_secs: default_request_timeout(),
            auth_failure: AuthFailurePolicy::default(),
            currency_symbol: default_currency(),
            date_format: default_date_format(),
        }
    }
}

impl Settings {
    /// Load settings from disk, or create default settings if file doesn't exist
    pub fn load_or_create(paths: &WalletPaths) -> Result<Self, WalletError> {
        let settings_path = paths.settings_file();

        if !settings_path.exists() {
            // Not persisted until the caller decides to
            return Ok(Settings::default());
        }

        let contents = std::fs::read_to_string(&settings_path)
            .map_err(|e| WalletError::Io(format!("Failed to read settings file: {}", e)))?;

        serde_json::from_str(&contents)
            .map_err(|e| WalletError::Config(format!("Failed to parse settings file: {}", e)))
    }

    /// Save settings to disk
    pub fn save(&self, paths: &WalletPaths) -> Result<(), WalletError> {
        paths.ensure_directories()?;

        let contents = serde_json::to_string_pretty(self)
            .map_err(|e| WalletError::Config(format!("Failed to serialize settings: {}", e)))?;

        std::fs::write(paths.settings_file(), contents)
            .map_err(|e| WalletError::Io(format!("Failed to write settings file: {}", e)))?;

        Ok(())
    }

    /// The configured API URL with any trailing slash removed
    pub fn api_base(&self) -> Option<&str> {
        self.api_url
            .as_deref()
            .map(|url| url.trim_end_matches('/'))
            .filter(|url| !url.is_empty())
    }
}

//! Path management for MyWallet
//!
//! Provides XDG-compliant path resolution for settings, the local cache, and logs.
//!
//! ## Path Resolution Order
//!
//! 1. `MYWALLET_DATA_DIR` environment variable (if set)
//! 2. Unix (Linux/macOS): `$XDG_CONFIG_HOME/mywallet` or `~/.config/mywallet`
//! 3. Windows: `%APPDATA%\mywallet`

use std::path::PathBuf;

use crate::error::WalletError;

/// Manages all paths used by MyWallet
#[derive(Debug, Clone)]
pub struct WalletPaths {
    /// Base directory for all MyWallet data
    base_dir: PathBuf,
}

impl WalletPaths {
    /// Create a new WalletPaths instance
    ///
    /// # Errors
    ///
    /// Returns an error if the home directory cannot be determined.
    pub fn new() -> Result<Self, WalletError> {
        let base_dir = if let Ok(custom) = std::env::var("MYWALLET_DATA_DIR") {
            PathBuf::from(custom)
        } else {
            resolve_default_path()?
        };

        Ok(Self { base_dir })
    }

    /// Create WalletPaths with a custom base directory (useful for testing)
    pub fn with_base_dir(base_dir: PathBuf) -> Self {
        Self { base_dir }
    }

    pub fn base_dir(&self) -> &PathBuf {
        &self.base_dir
    }

    /// Key-value cache directory (~/.config/mywallet/cache/)
    pub fn cache_dir(&self) -> PathBuf {
        self.base_dir.join("cache")
    }

    /// Rolling log directory (~/.config/mywallet/logs/)
    pub fn log_dir(&self) -> PathBuf {
        self.base_dir.join("logs")
    }

    pub fn settings_file(&self) -> PathBuf {
        self.base_dir.join("config.json")
    }

    /// Ensure the base, cache and log directories exist
    pub fn ensure_directories(&self) -> Result<(), WalletError> {
        std::fs::create_dir_all(&self.base_dir)
            .map_err(|e| WalletError::Io(format!("Failed to create base directory: {}", e)))?;

        std::fs::create_dir_all(self.cache_dir())
            .map_err(|e| WalletError::Io(format!("Failed to create cache directory: {}", e)))?;

        std::fs::create_dir_all(self.log_dir())
            .map_err(|e| WalletError::Io(format!("Failed to create log directory: {}", e)))?;

        Ok(())
    }
}

#[cfg(not(windows))]
fn resolve_default_path() -> Result<PathBuf, WalletError> {
    let config_base = match std::env::var("XDG_CONFIG_HOME") {
        Ok(xdg) => PathBuf::from(xdg),
        Err(_) => {
            let home = std::env::var("HOME")
                .map_err(|_| WalletError::Config("HOME environment variable not set".into()))?;
            PathBuf::from(home).join(".config")
        }
    };
    Ok(config_base.join("mywallet"))
}

#[cfg(windows)]
fn resolve_default_path() -> Result<PathBuf, WalletError> {
    let appdata = std::env::var("APPDATA")
        .map_err(|_| WalletError::Config("Could not determine APPDATA directory".into()))?;
    Ok(PathBuf::from(appdata).join("mywallet"))
}

//! CLI command handlers
//!
//! This module contains the implementation of CLI commands,
//! bridging the clap argument parsing with the service layer.

pub mod movement;
pub mod session;

use std::time::Duration;

use crate::config::{Settings, WalletPaths};
use crate::error::{WalletError, WalletResult};
use crate::models::Session;
use crate::services::SessionService;
use crate::storage::{HttpWalletApi, LedgerStore, LocalCache};

pub use movement::{handle_add, handle_balance, handle_delete, handle_list, AddArgs};
pub use session::{handle_login, handle_logout};

/// Everything a command needs to reach the ledger
pub struct CliContext {
    pub paths: WalletPaths,
    pub settings: Settings,
    /// Never talk to the remote, even if one is configured
    pub offline: bool,
}

impl CliContext {
    pub fn new(paths: WalletPaths, settings: Settings, offline: bool) -> Self {
        Self {
            paths,
            settings,
            offline,
        }
    }

    pub fn cache(&self) -> LocalCache {
        LocalCache::new(self.paths.cache_dir())
    }

    /// The API base URL, or `None` when running local-only
    pub fn remote_base(&self) -> Option<&str> {
        if self.offline {
            None
        } else {
            self.settings.api_base()
        }
    }

    /// HTTP client for the configured API
    pub fn connect(&self) -> WalletResult<HttpWalletApi> {
        let base = self.remote_base().ok_or_else(|| {
            WalletError::Config("No API URL configured (or running with --offline)".into())
        })?;
        let timeout = Duration::from_secs(self.settings.request_timeout_secs);
        Ok(HttpWalletApi::new(base, timeout)?)
    }

    /// Session and store for a ledger command
    ///
    /// Remote mode needs a saved session. Local mode reuses the saved user,
    /// if any, so the same cached ledger is shown offline.
    pub fn open_ledger(&self) -> WalletResult<(Session, LedgerStore)> {
        let cache = self.cache();
        let saved = SessionService::new(&cache).restore()?;

        if self.remote_base().is_some() {
            let session = saved.ok_or_else(|| {
                WalletError::Unauthorized("not logged in; run `mywallet login`".into())
            })?;
            let api = self.connect()?;
            let store = LedgerStore::with_remote(cache, Box::new(api))
                .auth_failure_policy(self.settings.auth_failure);
            Ok((session, store))
        } else {
            let session = saved
                .map(|s| s.offline())
                .unwrap_or_else(Session::local);
            Ok((session, LedgerStore::local(cache)))
        }
    }
}

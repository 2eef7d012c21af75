//! Local key-value cache
//!
//! Each key is stored as `<key>.json` inside the cache directory. This is the
//! read-through fallback for the ledger and the place the login session lives.

use std::path::PathBuf;

use serde::{de::DeserializeOwned, Serialize};

use crate::error::{WalletError, WalletResult};

use super::file_io::{read_json, remove_file_if_exists, write_json_atomic};

/// Cache key for the logged-in user
pub const USER_KEY: &str = "mywallet_user";
/// Cache key for the bearer token
pub const TOKEN_KEY: &str = "mywallet_token";

/// JSON-file backed key-value store
#[derive(Debug, Clone)]
pub struct LocalCache {
    dir: PathBuf,
}

impl LocalCache {
    pub fn new(dir: PathBuf) -> Self {
        Self { dir }
    }

    pub fn dir(&self) -> &PathBuf {
        &self.dir
    }

    /// Keys become file names; anything outside `[A-Za-z0-9_-]` is percent-encoded
    fn path_for(&self, key: &str) -> WalletResult<PathBuf> {
        if key.is_empty() {
            return Err(WalletError::Storage("Empty cache key".into()));
        }

        let mut file_name = String::with_capacity(key.len() + 5);
        for byte in key.bytes() {
            if byte.is_ascii_alphanumeric() || byte == b'_' || byte == b'-' {
                file_name.push(byte as char);
            } else {
                file_name.push_str(&format!("%{:02X}", byte));
            }
        }
        file_name.push_str(".json");

        Ok(self.dir.join(file_name))
    }

    /// Read a value; `None` if the key was never written
    pub fn get<T: DeserializeOwned>(&self, key: &str) -> WalletResult<Option<T>> {
        read_json(self.path_for(key)?)
    }

    pub fn set<T: Serialize + ?Sized>(&self, key: &str, value: &T) -> WalletResult<()> {
        write_json_atomic(self.path_for(key)?, value)
    }

    pub fn remove(&self, key: &str) -> WalletResult<()> {
        remove_file_if_exists(self.path_for(key)?)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.path_for(key).map(|p| p.exists()).unwrap_or(false)
    }
}

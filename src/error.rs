//! Custom error types for MyWallet
//!
//! This module defines the error hierarchy for the application using thiserror
//! for ergonomic error definitions.

use thiserror::Error;

use crate::storage::remote::RemoteError;

/// The main error type for MyWallet operations
#[derive(Error, Debug)]
pub enum WalletError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// File I/O errors
    #[error("I/O error: {0}")]
    Io(String),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(String),

    /// Rejected user input (bad amount, empty concept, ...)
    #[error("Validation error: {0}")]
    Validation(String),

    /// The remote backing store could not be reached or gave an unusable answer
    #[error("Store unavailable: {0}")]
    StoreUnavailable(String),

    /// The remote rejected the credentials or the session token
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// Local cache errors
    #[error("Storage error: {0}")]
    Storage(String),
}

impl WalletError {
    /// Check if this is a validation error
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }

    /// Check if the remote refused the session
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, Self::Unauthorized(_))
    }

    /// Check if the remote is unreachable
    pub fn is_unavailable(&self) -> bool {
        matches!(self, Self::StoreUnavailable(_))
    }
}

impl From<std::io::Error> for WalletError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}

impl From<serde_json::Error> for WalletError {
    fn from(err: serde_json::Error) -> Self {
        Self::Json(err.to_string())
    }
}

impl From<RemoteError> for WalletError {
    fn from(err: RemoteError) -> Self {
        match err {
            RemoteError::Unauthorized(_) | RemoteError::MissingToken => {
                Self::Unauthorized(err.to_string())
            }
            other => Self::StoreUnavailable(other.to_string()),
        }
    }
}

/// Result type alias for MyWallet operations
pub type WalletResult<T> = Result<T, WalletError>;

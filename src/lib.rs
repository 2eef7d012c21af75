//! MyWallet - personal income and expense ledger
//!
//! This library provides the core functionality for the MyWallet ledger. It
//! keeps a list of income and expense movements, computes the running balance
//! and a summary of the current month, and stores the ledger in a local JSON
//! cache that can be backed by a remote wallet API.
//!
//! # Architecture
//!
//! The crate is organized into the following modules:
//!
//! - `config`: Configuration and path management
//! - `error`: Custom error types
//! - `models`: Core data models (movements, money, users, sessions)
//! - `storage`: Local cache, remote API client and the cache-aside ledger store
//! - `reports`: Balance and monthly summary aggregation
//! - `services`: Business logic layer
//! - `display`: Terminal rendering
//! - `cli`: Command handlers
//!
//! # Example
//!
//! ```rust,ignore
//! use mywallet::config::WalletPaths;
//! use mywallet::models::Session;
//! use mywallet::services::LedgerService;
//! use mywallet::storage::{LedgerStore, LocalCache};
//!
//! let paths = WalletPaths::new()?;
//! let mut store = LedgerStore::local(LocalCache::new(paths.cache_dir()));
//! let session = Session::local();
//! let mut service = LedgerService::new(&mut store, &session);
//! service.load()?;
//! ```

pub mod cli;
pub mod config;
pub mod display;
pub mod error;
pub mod models;
pub mod reports;
pub mod services;
pub mod storage;

pub use error::{WalletError, WalletResult};

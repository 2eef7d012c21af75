//! Storage layer for MyWallet
//!
//! A JSON-file key-value cache, the remote API client, and the cache-aside
//! ledger store that ties the two together.

pub mod cache;
pub mod file_io;
pub mod ledger;
pub mod payload;
pub mod remote;

pub use cache::LocalCache;
pub use ledger::{LedgerSource, LedgerStore};
pub use remote::{CreateMovementRequest, HttpWalletApi, RemoteError, WalletApi};

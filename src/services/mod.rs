//! Service layer for MyWallet
//!
//! The service layer provides business logic on top of the storage layer,
//! handling validation, ownership rules and computed totals.

pub mod ledger;
pub mod session;

pub use ledger::{build_movement, CreateMovementInput, LedgerOverview, LedgerService};
pub use session::SessionService;

//! Reports for MyWallet
//!
//! Aggregations computed from the full movement list after every change.

pub mod balance;

pub use balance::{monthly_summary, total_balance, BalanceStatus, MonthlySummary};

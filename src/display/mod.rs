//! Display formatting for MyWallet
//!
//! Terminal rendering of the ledger and its totals.

pub mod ledger;

pub use ledger::{
    format_balance, format_monthly_summary, format_movement_list, format_movement_row,
    format_overview, DisplayOptions,
};

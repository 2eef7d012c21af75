//! Ledger display formatting
//!
//! Renders the movement list newest first, with the balance and monthly
//! summary cards underneath.

use crate::config::Settings;
use crate::models::{Money, Movement, Session};
use crate::reports::{BalanceStatus, MonthlySummary};
use crate::services::LedgerOverview;

/// Formatting preferences taken from the settings
#[derive(Debug, Clone)]
pub struct DisplayOptions {
    pub currency_symbol: String,
    pub date_format: String,
}

impl DisplayOptions {
    pub fn from_settings(settings: &Settings) -> Self {
        Self {
            currency_symbol: settings.currency_symbol.clone(),
            date_format: settings.date_format.clone(),
        }
    }

    pub fn money(&self, amount: Money) -> String {
        amount.format_with_symbol(&self.currency_symbol)
    }
}

impl Default for DisplayOptions {
    fn default() -> Self {
        Self::from_settings(&Settings::default())
    }
}

/// Truncate a string to a maximum display width, with an ellipsis
fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_len.saturating_sub(1)).collect();
        format!("{}…", kept)
    }
}

/// Notes shown under a movement: who paid, sharing, the pre-split amount
pub fn movement_notes(mov: &Movement, viewer: &Session, options: &DisplayOptions) -> Vec<String> {
    let mut notes = Vec::new();

    if !mov.is_owned_by(viewer.user_id()) {
        notes.push(format!(
            "Paid by: {}",
            mov.paid_by_name.as_deref().unwrap_or("someone else")
        ));
    } else if mov.is_shared() {
        notes.push("Shared".to_string());
    }

    if let Some(full) = mov.split_total() {
        notes.push(format!("Total amount: {}", options.money(full)));
    }

    notes
}

/// Format one movement as a register row
pub fn format_movement_row(mov: &Movement, viewer: &Session, options: &DisplayOptions) -> String {
    let date = mov
        .date
        .map(|d| d.format(&options.date_format).to_string())
        .unwrap_or_else(|| "—".to_string());

    // Only the owner gets the delete handle
    let marker = if mov.is_owned_by(viewer.user_id()) { "✕" } else { " " };

    let amount = format!("{}{}", mov.movement_type.sign(), options.money(mov.amount));

    let mut row = format!(
        "{} {:8} {:10} {:24} {:>14}",
        marker,
        mov.id.short(),
        date,
        truncate(&mov.concept, 24),
        amount
    );

    let notes = movement_notes(mov, viewer, options);
    if !notes.is_empty() {
        row.push_str(&format!("  ({})", notes.join("; ")));
    }
    row
}

/// Format the movement list, newest first
///
/// `limit` keeps only the most recent entries.
pub fn format_movement_list(
    movements: &[Movement],
    viewer: &Session,
    options: &DisplayOptions,
    limit: Option<usize>,
) -> String {
    if movements.is_empty() {
        return "No movements yet.\n".to_string();
    }

    let mut output = String::new();
    output.push_str(&format!(
        "  {:8} {:10} {:24} {:>14}\n",
        "ID", "Date", "Concept", "Amount"
    ));
    output.push_str(&"-".repeat(62));
    output.push('\n');

    let shown = limit.unwrap_or(movements.len());
    for mov in movements.iter().rev().take(shown) {
        output.push_str(&format_movement_row(mov, viewer, options));
        output.push('\n');
    }

    if shown < movements.len() {
        output.push_str(&format!("… {} older movement(s) not shown\n", movements.len() - shown));
    }

    output
}

/// Format the total balance card
pub fn format_balance(total: Money, options: &DisplayOptions) -> String {
    let status = match BalanceStatus::of(total) {
        BalanceStatus::Positive => "positive",
        BalanceStatus::Negative => "negative",
    };
    format!("Balance: {} ({})\n", options.money(total), status)
}

/// Format the monthly summary card
pub fn format_monthly_summary(summary: &MonthlySummary, options: &DisplayOptions) -> String {
    let mut output = String::new();
    output.push_str(&format!("{}\n", summary.label()));
    output.push_str(&format!("  Income:  {:>14}\n", options.money(summary.income)));
    output.push_str(&format!("  Expense: {:>14}\n", options.money(summary.expense)));
    output.push_str(&format!("  Balance: {:>14}\n", options.money(summary.balance)));
    output
}

/// Both cards together
pub fn format_overview(overview: &LedgerOverview, options: &DisplayOptions) -> String {
    let mut output = format_balance(overview.total, options);
    output.push('\n');
    output.push_str(&format_monthly_summary(&overview.monthly, options));
    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{MovementId, MovementType, User, UserId};
    use chrono::{TimeZone, Utc};

    fn viewer() -> Session {
        Session::authenticated(User::new("me", "Ana"), "t")
    }

    fn mine(concept: &str, cents: i64, kind: MovementType) -> Movement {
        Movement::new(concept, Money::from_cents(cents), kind).with_owner(UserId::from("me"))
    }

    #[test]
    fn test_row_formatting() {
        let mut mov = mine("Salary", 120000, MovementType::Income)
            .with_date(Utc.with_ymd_and_hms(2026, 10, 1, 9, 0, 0).unwrap());
        mov.id = MovementId::from("abcdef123456");

        let row = format_movement_row(&mov, &viewer(), &DisplayOptions::default());
        assert!(row.starts_with("✕ abcdef12 01/10/2026"));
        assert!(row.contains("+€1,200.00"));
    }

    #[test]
    fn test_missing_date_shows_dash() {
        let mut mov = mine("Old", 100, MovementType::Expense);
        mov.date = None;
        let row = format_movement_row(&mov, &viewer(), &DisplayOptions::default());
        assert!(row.contains(" — "));
        assert!(row.contains("-€1.00"));
    }

    #[test]
    fn test_notes() {
        let options = DisplayOptions::default();

        let mut theirs = Movement::new("Dinner", Money::from_cents(2000), MovementType::Expense)
            .with_owner(UserId::from("friend"));
        theirs.paid_by_name = Some("Luis".into());
        theirs.full_amount = Some(Money::from_cents(4000));
        assert_eq!(
            movement_notes(&theirs, &viewer(), &options),
            vec!["Paid by: Luis".to_string(), "Total amount: €40.00".to_string()]
        );
        assert!(format_movement_row(&theirs, &viewer(), &options).starts_with("  "));

        let mut shared = mine("Taxi", 1500, MovementType::Expense);
        shared.shared_with_id = Some(UserId::from("friend"));
        assert_eq!(movement_notes(&shared, &viewer(), &options), vec!["Shared".to_string()]);
    }

    #[test]
    fn test_list_is_newest_first() {
        let movements = vec![
            mine("first", 100, MovementType::Income),
            mine("second", 200, MovementType::Income),
            mine("third", 300, MovementType::Expense),
        ];
        let output = format_movement_list(&movements, &viewer(), &DisplayOptions::default(), None);

        let third = output.find("third").unwrap();
        let second = output.find("second").unwrap();
        let first = output.find("first").unwrap();
        assert!(third < second && second < first);
    }

    #[test]
    fn test_list_limit_and_empty() {
        let movements = vec![
            mine("first", 100, MovementType::Income),
            mine("second", 200, MovementType::Income),
        ];
        let output =
            format_movement_list(&movements, &viewer(), &DisplayOptions::default(), Some(1));
        assert!(output.contains("second"));
        assert!(!output.contains("first"));
        assert!(output.contains("1 older movement(s) not shown"));

        let empty = format_movement_list(&[], &viewer(), &DisplayOptions::default(), None);
        assert_eq!(empty, "No movements yet.\n");
    }

    #[test]
    fn test_balance_card() {
        let options = DisplayOptions::default();
        assert_eq!(
            format_balance(Money::from_cents(-350), &options),
            "Balance: -€3.50 (negative)\n"
        );
        assert_eq!(
            format_balance(Money::zero(), &options),
            "Balance: €0.00 (positive)\n"
        );
    }

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("a very long concept", 6), "a ver…");
    }
}

//! Balance Report
//!
//! Pure reductions of a movement list: the all-time balance and the
//! income/expense totals of one calendar month.

use chrono::{DateTime, Datelike, NaiveDate, TimeZone};

use crate::models::{Money, Movement};

/// Sum of income minus sum of expenses
pub fn total_balance(movements: &[Movement]) -> Money {
    movements.iter().map(Movement::signed_amount).sum()
}

/// Whether a balance is in the black or in the red
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BalanceStatus {
    /// Zero counts as positive
    Positive,
    Negative,
}

impl BalanceStatus {
    pub fn of(balance: Money) -> Self {
        if balance.is_negative() {
            Self::Negative
        } else {
            Self::Positive
        }
    }
}

/// Income and expense totals for one calendar month
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MonthlySummary {
    pub year: i32,
    /// 1-12
    pub month: u32,
    pub income: Money,
    pub expense: Money,
    pub balance: Money,
}

impl MonthlySummary {
    /// e.g. "October 2026"
    pub fn label(&self) -> String {
        NaiveDate::from_ymd_opt(self.year, self.month, 1)
            .map(|d| d.format("%B %Y").to_string())
            .unwrap_or_else(|| format!("{:04}-{:02}", self.year, self.month))
    }
}

/// Totals for the calendar month containing `reference`
///
/// Movement dates are read in the reference's time zone, so a movement at
/// 23:30 UTC on the 31st belongs to the next month for a reader east of UTC.
/// Movements without a date are left out.
pub fn monthly_summary<Tz: TimeZone>(
    movements: &[Movement],
    reference: &DateTime<Tz>,
) -> MonthlySummary {
    let tz = reference.timezone();
    let (year, month) = (reference.year(), reference.month());

    let mut income = Money::zero();
    let mut expense = Money::zero();

    for movement in movements {
        let Some(date) = movement.date else {
            continue;
        };
        let local = date.with_timezone(&tz);
        if local.year() != year || local.month() != month {
            continue;
        }
        if movement.is_income() {
            income += movement.amount;
        } else {
            expense += movement.amount;
        }
    }

    MonthlySummary {
        year,
        month,
        income,
        expense,
        balance: income - expense,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::MovementType;
    use chrono::{FixedOffset, Utc};
    use proptest::prelude::*;

    fn movement(cents: i64, kind: MovementType, date: DateTime<Utc>) -> Movement {
        Movement::new("test", Money::from_cents(cents), kind).with_date(date)
    }

    fn at(y: i32, m: u32, d: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, 12, 0, 0).unwrap()
    }

    #[test]
    fn test_empty_ledger() {
        assert_eq!(total_balance(&[]), Money::zero());
        let summary = monthly_summary(&[], &at(2026, 10, 16));
        assert_eq!(summary.income, Money::zero());
        assert_eq!(summary.balance, Money::zero());
    }

    #[test]
    fn test_income_and_expense_this_month() {
        let now = at(2026, 10, 16);
        let movements = vec![
            movement(10000, MovementType::Income, at(2026, 10, 2)),
            movement(4000, MovementType::Expense, at(2026, 10, 9)),
        ];

        assert_eq!(total_balance(&movements), Money::from_cents(6000));

        let summary = monthly_summary(&movements, &now);
        assert_eq!(summary.income, Money::from_cents(10000));
        assert_eq!(summary.expense, Money::from_cents(4000));
        assert_eq!(summary.balance, Money::from_cents(6000));
        assert_eq!((summary.year, summary.month), (2026, 10));
    }

    #[test]
    fn test_other_months_and_undated_are_excluded() {
        let now = at(2026, 10, 16);
        let mut undated = movement(500, MovementType::Income, now);
        undated.date = None;
        let movements = vec![
            movement(10000, MovementType::Income, at(2026, 9, 30)),
            movement(2000, MovementType::Income, at(2025, 10, 16)),
            undated,
        ];

        let summary = monthly_summary(&movements, &now);
        assert_eq!(summary.income, Money::zero());
        // The all-time balance still counts everything
        assert_eq!(total_balance(&movements), Money::from_cents(12500));
    }

    #[test]
    fn test_month_boundary_follows_reference_time_zone() {
        let late_utc = Utc.with_ymd_and_hms(2026, 9, 30, 23, 30, 0).unwrap();
        let movements = vec![movement(100, MovementType::Expense, late_utc)];

        let madrid = FixedOffset::east_opt(2 * 3600).unwrap();
        let october_in_madrid = madrid.with_ymd_and_hms(2026, 10, 5, 10, 0, 0).unwrap();
        assert_eq!(
            monthly_summary(&movements, &october_in_madrid).expense,
            Money::from_cents(100)
        );
        assert_eq!(
            monthly_summary(&movements, &at(2026, 10, 5)).expense,
            Money::zero()
        );
    }

    #[test]
    fn test_single_coffee() {
        let movements = vec![Movement::new(
            "coffee",
            Money::from_cents(350),
            MovementType::Expense,
        )];
        assert_eq!(total_balance(&movements), Money::from_cents(-350));
        assert_eq!(BalanceStatus::of(total_balance(&movements)), BalanceStatus::Negative);
    }

    #[test]
    fn test_label() {
        assert_eq!(monthly_summary(&[], &at(2026, 10, 16)).label(), "October 2026");
    }

    #[test]
    fn test_largest_amounts_sum_without_overflow() {
        let now = at(2026, 10, 16);
        let movements = vec![
            movement(Money::MAX.cents(), MovementType::Income, now),
            movement(Money::MAX.cents(), MovementType::Income, now),
        ];

        let expected = Money::from_cents(2 * Money::MAX.cents());
        assert_eq!(total_balance(&movements), expected);
        assert_eq!(monthly_summary(&movements, &now).income, expected);

        // Even corrupt data past the limit saturates rather than wrapping
        let corrupt = vec![
            movement(i64::MAX, MovementType::Income, now),
            movement(i64::MAX, MovementType::Income, now),
        ];
        assert_eq!(total_balance(&corrupt), Money::from_cents(i64::MAX));
    }

    fn ledger_and_shuffled() -> impl Strategy<Value = (Vec<Movement>, Vec<Movement>)> {
        proptest::collection::vec((0i64..1_000_000, any::<bool>()), 0..40).prop_flat_map(
            |entries| {
                let movements: Vec<Movement> = entries
                    .into_iter()
                    .map(|(cents, income)| {
                        let kind = if income { MovementType::Income } else { MovementType::Expense };
                        Movement::new("p", Money::from_cents(cents), kind)
                    })
                    .collect();
                (Just(movements.clone()), Just(movements).prop_shuffle())
            },
        )
    }

    proptest! {
        #[test]
        fn total_balance_ignores_order((movements, shuffled) in ledger_and_shuffled()) {
            prop_assert_eq!(total_balance(&movements), total_balance(&shuffled));
        }
    }
}

//! Movement model
//!
//! A movement is a single income or expense entry in a user's ledger. Amounts
//! are always non-negative magnitudes; the direction comes from the type.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::ids::{MovementId, UserId};
use super::money::Money;

/// Direction of a movement
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MovementType {
    #[serde(alias = "ingreso")]
    Income,
    #[serde(alias = "gasto")]
    Expense,
}

impl MovementType {
    /// Sign shown in front of the amount
    pub fn sign(&self) -> char {
        match self {
            Self::Income => '+',
            Self::Expense => '-',
        }
    }
}

impl fmt::Display for MovementType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Income => write!(f, "income"),
            Self::Expense => write!(f, "expense"),
        }
    }
}

impl FromStr for MovementType {
    type Err = MovementValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "income" | "ingreso" => Ok(Self::Income),
            "expense" | "gasto" => Ok(Self::Expense),
            other => Err(MovementValidationError::UnknownType(other.to_string())),
        }
    }
}

/// A single ledger entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Movement {
    pub id: MovementId,

    /// Free-text label
    pub concept: String,

    /// Non-negative magnitude
    pub amount: Money,

    #[serde(rename = "type")]
    pub movement_type: MovementType,

    /// When the movement happened; absent for hydrated records without a usable date
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<DateTime<Utc>>,

    /// User who recorded it; absent in local-only mode
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub owner_id: Option<UserId>,

    /// Original amount before a split, kept only when it differs from `amount`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub full_amount: Option<Money>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shared_with_id: Option<UserId>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub paid_by_name: Option<String>,
}

impl Movement {
    /// Create a movement dated now with a fresh id
    pub fn new(concept: impl Into<String>, amount: Money, movement_type: MovementType) -> Self {
        Self {
            id: MovementId::new(),
            concept: concept.into(),
            amount,
            movement_type,
            date: Some(Utc::now()),
            owner_id: None,
            full_amount: None,
            shared_with_id: None,
            paid_by_name: None,
        }
    }

    pub fn with_date(mut self, date: DateTime<Utc>) -> Self {
        self.date = Some(date);
        self
    }

    pub fn with_owner(mut self, owner_id: UserId) -> Self {
        self.owner_id = Some(owner_id);
        self
    }

    pub fn is_income(&self) -> bool {
        self.movement_type == MovementType::Income
    }

    pub fn is_expense(&self) -> bool {
        self.movement_type == MovementType::Expense
    }

    /// Amount with the movement's direction applied (income positive)
    pub fn signed_amount(&self) -> Money {
        match self.movement_type {
            MovementType::Income => self.amount,
            MovementType::Expense => -self.amount,
        }
    }

    /// The pre-split amount, if it differs from what this user carries
    pub fn split_total(&self) -> Option<Money> {
        self.full_amount.filter(|full| *full != self.amount)
    }

    pub fn is_shared(&self) -> bool {
        self.shared_with_id.is_some()
    }

    /// Whether `user` recorded this movement
    ///
    /// Movements without an owner were created in local mode and belong to
    /// whoever holds the ledger.
    pub fn is_owned_by(&self, user: &UserId) -> bool {
        match &self.owner_id {
            Some(owner) => owner == user,
            None => true,
        }
    }

    /// Validate the movement
    pub fn validate(&self) -> Result<(), MovementValidationError> {
        if self.concept.trim().is_empty() {
            return Err(MovementValidationError::EmptyConcept);
        }

        for amount in std::iter::once(self.amount).chain(self.full_amount) {
            if amount.is_negative() {
                return Err(MovementValidationError::NegativeAmount(amount));
            }
            if !amount.is_within_limit() {
                return Err(MovementValidationError::AmountTooLarge(amount));
            }
        }

        Ok(())
    }
}

impl fmt::Display for Movement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {}{}",
            self.concept,
            self.movement_type.sign(),
            self.amount
        )
    }
}

/// Validation errors for movements
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MovementValidationError {
    EmptyConcept,
    InvalidAmount(String),
    NegativeAmount(Money),
    AmountTooLarge(Money),
    UnknownType(String),
    InvalidDate(String),
}

impl fmt::Display for MovementValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyConcept => write!(f, "Concept must not be empty"),
            Self::InvalidAmount(raw) => write!(f, "Amount '{}' is not a number", raw),
            Self::NegativeAmount(amount) => {
                write!(f, "Amount must not be negative (got {})", amount)
            }
            Self::AmountTooLarge(amount) => {
                write!(f, "Amount {} is above the limit of {}", amount, Money::MAX)
            }
            Self::UnknownType(raw) => {
                write!(f, "Unknown movement type '{}' (use income or expense)", raw)
            }
            Self::InvalidDate(raw) => write!(f, "Invalid date '{}' (use YYYY-MM-DD)", raw),
        }
    }
}

impl std::error::Error for MovementValidationError {}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_new_movement() {
        let mov = Movement::new("coffee", Money::from_cents(350), MovementType::Expense);
        assert!(!mov.id.is_blank());
        assert!(mov.date.is_some());
        assert!(mov.is_expense());
        assert_eq!(mov.signed_amount(), Money::from_cents(-350));
        assert!(mov.validate().is_ok());
    }

    #[test]
    fn test_validation() {
        let mov = Movement::new("  ", Money::from_cents(100), MovementType::Income);
        assert_eq!(mov.validate(), Err(MovementValidationError::EmptyConcept));

        let mov = Movement::new("refund", Money::from_cents(-100), MovementType::Income);
        assert!(matches!(
            mov.validate(),
            Err(MovementValidationError::NegativeAmount(_))
        ));

        let zero = Movement::new("free sample", Money::zero(), MovementType::Expense);
        assert!(zero.validate().is_ok());

        let at_limit = Movement::new("lottery", Money::MAX, MovementType::Income);
        assert!(at_limit.validate().is_ok());

        let mut over = Movement::new("lottery", Money::MAX + Money::from_cents(1), MovementType::Income);
        assert!(matches!(
            over.validate(),
            Err(MovementValidationError::AmountTooLarge(_))
        ));
        over.amount = Money::from_cents(100);
        over.full_amount = Some(Money::from_cents(i64::MAX));
        assert!(matches!(
            over.validate(),
            Err(MovementValidationError::AmountTooLarge(_))
        ));
    }

    #[test]
    fn test_ownership() {
        let me = UserId::from("1");
        let friend = UserId::from("2");

        let local = Movement::new("rent", Money::from_cents(50000), MovementType::Expense);
        assert!(local.is_owned_by(&me));

        let theirs = local.clone().with_owner(friend.clone());
        assert!(!theirs.is_owned_by(&me));
        assert!(theirs.is_owned_by(&friend));
    }

    #[test]
    fn test_split_total_only_when_different() {
        let mut mov = Movement::new("dinner", Money::from_cents(2000), MovementType::Expense);
        assert_eq!(mov.split_total(), None);

        mov.full_amount = Some(Money::from_cents(2000));
        assert_eq!(mov.split_total(), None);

        mov.full_amount = Some(Money::from_cents(4000));
        assert_eq!(mov.split_total(), Some(Money::from_cents(4000)));
    }

    #[test]
    fn test_type_parsing_accepts_source_spellings() {
        assert_eq!("ingreso".parse::<MovementType>().unwrap(), MovementType::Income);
        assert_eq!("GASTO".parse::<MovementType>().unwrap(), MovementType::Expense);
        assert!("transfer".parse::<MovementType>().is_err());

        let parsed: MovementType = serde_json::from_str("\"gasto\"").unwrap();
        assert_eq!(parsed, MovementType::Expense);
    }

    #[test]
    fn test_cache_shape() {
        let date = Utc.with_ymd_and_hms(2026, 10, 3, 9, 30, 0).unwrap();
        let mut mov = Movement::new("salary", Money::from_cents(120000), MovementType::Income)
            .with_date(date)
            .with_owner(UserId::from("9"));
        mov.id = MovementId::from("m-1");

        let json = serde_json::to_value(&mov).unwrap();
        assert_eq!(json["type"], "income");
        assert_eq!(json["amount"], 1200.0);
        assert_eq!(json["ownerId"], "9");
        assert!(json.get("fullAmount").is_none());

        let back: Movement = serde_json::from_value(json).unwrap();
        assert_eq!(back, mov);
    }
}

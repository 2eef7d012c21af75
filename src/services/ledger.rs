//! Ledger service
//!
//! Business rules on top of the ledger store: turning raw form input into a
//! validated movement, ownership checks on delete, and the balance overview
//! the presenter shows after every change.

use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use tracing::info;

use crate::error::{WalletError, WalletResult};
use crate::models::{Money, Movement, MovementId, MovementType, MovementValidationError, Session};
use crate::reports::{monthly_summary, total_balance, BalanceStatus, MonthlySummary};
use crate::storage::LedgerStore;

/// Input for creating a new movement, as typed by the user
#[derive(Debug, Clone)]
pub struct CreateMovementInput {
    pub concept: String,
    /// Amount text; parsed and checked here, never coerced
    pub amount: String,
    pub movement_type: MovementType,
    /// Defaults to now
    pub date: Option<NaiveDate>,
    /// Share the movement with this user (remote mode only)
    pub friend_email: Option<String>,
}

/// Totals shown next to the movement list
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LedgerOverview {
    pub total: Money,
    pub status: BalanceStatus,
    pub monthly: MonthlySummary,
}

impl LedgerOverview {
    pub fn compute<Tz: TimeZone>(movements: &[Movement], reference: &DateTime<Tz>) -> Self {
        let total = total_balance(movements);
        Self {
            total,
            status: BalanceStatus::of(total),
            monthly: monthly_summary(movements, reference),
        }
    }
}

fn invalid(err: MovementValidationError) -> WalletError {
    WalletError::Validation(err.to_string())
}

/// Validate raw input into a movement owned by the session's user
///
/// Nothing is stored if this fails.
pub fn build_movement(input: &CreateMovementInput, session: &Session) -> WalletResult<Movement> {
    let concept = input.concept.trim();
    if concept.is_empty() {
        return Err(invalid(MovementValidationError::EmptyConcept));
    }

    let amount = Money::parse(&input.amount)
        .map_err(|_| invalid(MovementValidationError::InvalidAmount(input.amount.clone())))?;

    if let Some(email) = input.friend_email.as_deref() {
        if !email.contains('@') {
            return Err(WalletError::Validation(format!(
                "'{}' is not an e-mail address",
                email
            )));
        }
    }

    let mut movement = Movement::new(concept, amount, input.movement_type);

    if let Some(date) = input.date {
        // Noon UTC keeps the calendar day stable for any reader within ±11h
        let noon = date
            .and_hms_opt(12, 0, 0)
            .ok_or_else(|| invalid(MovementValidationError::InvalidDate(date.to_string())))?;
        movement.date = Some(Utc.from_utc_datetime(&noon));
    }

    if session.is_authenticated() {
        movement.owner_id = Some(session.user_id().clone());
    }

    movement.validate().map_err(invalid)?;
    Ok(movement)
}

/// Service for ledger operations on behalf of one session
pub struct LedgerService<'a> {
    store: &'a mut LedgerStore,
    session: &'a Session,
}

impl<'a> LedgerService<'a> {
    pub fn new(store: &'a mut LedgerStore, session: &'a Session) -> Self {
        Self { store, session }
    }

    /// Load the ledger from the backing stores
    pub fn load(&mut self) -> WalletResult<&[Movement]> {
        self.store.load(self.session)
    }

    pub fn movements(&self) -> &[Movement] {
        self.store.movements()
    }

    /// Validate and append a new movement
    pub fn create(&mut self, input: CreateMovementInput) -> WalletResult<Movement> {
        let movement = build_movement(&input, self.session)?;
        let movements =
            self.store
                .append_shared(self.session, movement, input.friend_email.as_deref())?;

        let created = movements
            .last()
            .cloned()
            .ok_or_else(|| WalletError::Storage("Appended movement is missing".into()))?;

        info!(id = %created.id, kind = %created.movement_type, "Movement created");
        Ok(created)
    }

    /// Resolve a full id or a unique id prefix to a movement id
    pub fn resolve(&self, identifier: &str) -> Option<MovementId> {
        let identifier = identifier.trim();
        if identifier.is_empty() {
            return None;
        }

        let movements = self.store.movements();
        if let Some(exact) = movements.iter().find(|m| m.id.as_str() == identifier) {
            return Some(exact.id.clone());
        }

        let mut matches = movements
            .iter()
            .filter(|m| m.id.as_str().starts_with(identifier));
        match (matches.next(), matches.next()) {
            (Some(only), None) => Some(only.id.clone()),
            _ => None,
        }
    }

    /// Delete a movement
    ///
    /// Returns the removed movement, or `None` if there was nothing to remove.
    /// Movements recorded by another user (shared with this one) cannot be
    /// deleted from here.
    pub fn delete(&mut self, id: &MovementId) -> WalletResult<Option<Movement>> {
        let existing = self.store.find(id).cloned();

        if let Some(movement) = &existing {
            if !movement.is_owned_by(self.session.user_id()) {
                return Err(WalletError::Validation(format!(
                    "Movement '{}' was recorded by {} and can only be deleted by them",
                    movement.concept,
                    movement.paid_by_name.as_deref().unwrap_or("another user")
                )));
            }
        }

        self.store.remove_by_id(self.session, id)?;
        if existing.is_some() {
            info!(%id, "Movement deleted");
        }
        Ok(existing)
    }

    /// Totals as of `reference`
    pub fn overview<Tz: TimeZone>(&self, reference: &DateTime<Tz>) -> LedgerOverview {
        LedgerOverview::compute(self.store.movements(), reference)
    }
}

//! Core data models for MyWallet
//!
//! Movements, the users who own them, and the money/id value types they are
//! built from.

pub mod ids;
pub mod money;
pub mod movement;
pub mod user;

pub use ids::{MovementId, UserId};
pub use money::Money;
pub use movement::{Movement, MovementType, MovementValidationError};
pub use user::{Session, User};

//! User and session models
//!
//! The session is passed explicitly to every store and presenter call; there
//! is no process-wide "current user".

use serde::{Deserialize, Serialize};
use std::fmt;

use super::ids::UserId;

/// Id used for the ledger of a user who never logged in
pub const LOCAL_USER_ID: &str = "local";

/// An authenticated wallet user
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

impl User {
    pub fn new(id: impl Into<UserId>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            email: None,
        }
    }
}

/// The user a ledger belongs to, plus the bearer token when logged in remotely
#[derive(Clone, PartialEq, Eq)]
pub struct Session {
    pub user: User,
    pub token: Option<String>,
}

impl Session {
    pub fn authenticated(user: User, token: impl Into<String>) -> Self {
        Self {
            user,
            token: Some(token.into()),
        }
    }

    /// Session for purely local use
    pub fn local() -> Self {
        Self {
            user: User::new(LOCAL_USER_ID, "local"),
            token: None,
        }
    }

    /// A copy of this session that never talks to the remote
    pub fn offline(&self) -> Self {
        Self {
            user: self.user.clone(),
            token: None,
        }
    }

    pub fn is_authenticated(&self) -> bool {
        self.token.is_some()
    }

    pub fn user_id(&self) -> &UserId {
        &self.user.id
    }

    /// Cache key holding this user's ledger snapshot
    pub fn ledger_key(&self) -> String {
        format!("ledger_{}", self.user.id)
    }
}

// Keeps the token out of logs and panic messages.
impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("user", &self.user)
            .field("token", &self.token.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

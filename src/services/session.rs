//! Session service
//!
//! Login, logout, and restoring a saved session from the local cache. The
//! user and the token are saved under separate keys; a session is only
//! restored when both are present.

use tracing::{info, warn};

use crate::error::{WalletError, WalletResult};
use crate::models::{Session, User};
use crate::storage::cache::{LocalCache, TOKEN_KEY, USER_KEY};
use crate::storage::{RemoteError, WalletApi};

/// Service for session management
pub struct SessionService<'a> {
    cache: &'a LocalCache,
}

impl<'a> SessionService<'a> {
    pub fn new(cache: &'a LocalCache) -> Self {
        Self { cache }
    }

    /// The saved session, if both halves of it are present
    ///
    /// A half-saved session is wiped.
    pub fn restore(&self) -> WalletResult<Option<Session>> {
        let user = self.cache.get::<User>(USER_KEY);
        let token = self.cache.get::<String>(TOKEN_KEY);

        match (user, token) {
            (Ok(Some(user)), Ok(Some(token))) if !token.is_empty() => {
                Ok(Some(Session::authenticated(user, token)))
            }
            (user, token) => {
                if user.is_err() || token.is_err() {
                    warn!("Discarding unreadable saved session");
                }
                self.forget()?;
                Ok(None)
            }
        }
    }

    /// Authenticate against the remote and save the session
    pub fn login(&self, api: &dyn WalletApi, email: &str, password: &str) -> WalletResult<Session> {
        let email = email.trim();
        if email.is_empty() || password.is_empty() {
            return Err(WalletError::Validation(
                "E-mail and password are required".into(),
            ));
        }

        let session = api.login(email, password).map_err(|err| match err {
            RemoteError::Unauthorized(_) | RemoteError::NotFound => {
                WalletError::Unauthorized("invalid credentials".into())
            }
            other => WalletError::from(other),
        })?;

        self.save(&session)?;
        info!(user = %session.user_id(), "Logged in");
        Ok(session)
    }

    pub fn save(&self, session: &Session) -> WalletResult<()> {
        let token = session
            .token
            .as_deref()
            .ok_or_else(|| WalletError::Unauthorized("session has no token".into()))?;
        self.cache.set(USER_KEY, &session.user)?;
        self.cache.set(TOKEN_KEY, token)
    }

    /// Remove the saved session
    pub fn logout(&self) -> WalletResult<()> {
        self.forget()?;
        info!("Logged out");
        Ok(())
    }

    fn forget(&self) -> WalletResult<()> {
        self.cache.remove(USER_KEY)?;
        self.cache.remove(TOKEN_KEY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Movement, MovementId};
    use crate::storage::CreateMovementRequest;
    use tempfile::TempDir;

    struct StubApi {
        accept: bool,
    }

    impl WalletApi for StubApi {
        fn login(&self, email: &str, _password: &str) -> Result<Session, RemoteError> {
            if self.accept {
                let mut user = User::new(1i64, "Ana");
                user.email = Some(email.to_string());
                Ok(Session::authenticated(user, "tok-1"))
            } else {
                Err(RemoteError::Unauthorized(401))
            }
        }

        fn fetch_movements(&self, _session: &Session) -> Result<Vec<Movement>, RemoteError> {
            Ok(Vec::new())
        }

        fn create_movement(
            &self,
            _session: &Session,
            _request: &CreateMovementRequest<'_>,
        ) -> Result<Option<Movement>, RemoteError> {
            Ok(None)
        }

        fn delete_movement(&self, _session: &Session, _id: &MovementId) -> Result<(), RemoteError> {
            Ok(())
        }
    }

    fn create_test_cache() -> (TempDir, LocalCache) {
        let temp_dir = TempDir::new().unwrap();
        let cache = LocalCache::new(temp_dir.path().to_path_buf());
        (temp_dir, cache)
    }

    #[test]
    fn test_login_saves_and_restores() {
        let (_temp_dir, cache) = create_test_cache();
        let service = SessionService::new(&cache);

        let session = service
            .login(&StubApi { accept: true }, "ana@example.com", "pw")
            .unwrap();
        assert_eq!(session.token.as_deref(), Some("tok-1"));

        let restored = service.restore().unwrap().unwrap();
        assert_eq!(restored, session);
    }

    #[test]
    fn test_rejected_login() {
        let (_temp_dir, cache) = create_test_cache();
        let service = SessionService::new(&cache);

        let err = service
            .login(&StubApi { accept: false }, "ana@example.com", "wrong")
            .unwrap_err();
        assert!(err.is_unauthorized());
        assert_eq!(service.restore().unwrap(), None);

        let err = service
            .login(&StubApi { accept: true }, " ", "pw")
            .unwrap_err();
        assert!(err.is_validation());
    }

    #[test]
    fn test_half_saved_session_is_wiped() {
        let (_temp_dir, cache) = create_test_cache();
        cache.set(USER_KEY, &User::new("u1", "Ana")).unwrap();

        let service = SessionService::new(&cache);
        assert_eq!(service.restore().unwrap(), None);
        assert!(!cache.contains(USER_KEY));
    }

    #[test]
    fn test_logout_forgets_session() {
        let (_temp_dir, cache) = create_test_cache();
        let service = SessionService::new(&cache);
        service
            .login(&StubApi { accept: true }, "ana@example.com", "pw")
            .unwrap();

        service.logout().unwrap();
        assert_eq!(service.restore().unwrap(), None);
        assert!(!cache.contains(TOKEN_KEY));
    }
}

//! Ledger store
//!
//! Holds the ordered movement list of one user and keeps it in step with the
//! backing stores. The local cache (`ledger_<ownerId>`) is always written;
//! the remote is used when the session is authenticated and an API client is
//! configured. A remote that cannot be reached never fails an operation: the
//! store logs it and carries on against the cache.

use tracing::{debug, info, warn};

use crate::config::AuthFailurePolicy;
use crate::error::{WalletError, WalletResult};
use crate::models::{Movement, MovementId, Session};

use super::cache::LocalCache;
use super::remote::{CreateMovementRequest, RemoteError, WalletApi};

/// Where the last `load` got its data from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LedgerSource {
    /// Nothing loaded yet
    #[default]
    Empty,
    Remote,
    Cache,
}

/// Cache-aside store for a user's movements
pub struct LedgerStore {
    cache: LocalCache,
    remote: Option<Box<dyn WalletApi>>,
    auth_failure: AuthFailurePolicy,
    movements: Vec<Movement>,
    source: LedgerSource,
}

impl LedgerStore {
    /// A store that only ever uses the local cache
    pub fn local(cache: LocalCache) -> Self {
        Self {
            cache,
            remote: None,
            auth_failure: AuthFailurePolicy::default(),
            movements: Vec::new(),
            source: LedgerSource::Empty,
        }
    }

    /// A store backed by the cache and a remote API
    pub fn with_remote(cache: LocalCache, remote: Box<dyn WalletApi>) -> Self {
        Self {
            remote: Some(remote),
            ..Self::local(cache)
        }
    }

    pub fn auth_failure_policy(mut self, policy: AuthFailurePolicy) -> Self {
        self.auth_failure = policy;
        self
    }

    /// Current movements, oldest first
    pub fn movements(&self) -> &[Movement] {
        &self.movements
    }

    pub fn source(&self) -> LedgerSource {
        self.source
    }

    pub fn find(&self, id: &MovementId) -> Option<&Movement> {
        self.movements.iter().find(|m| &m.id == id)
    }

    fn remote_for<'a>(&'a self, session: &Session) -> Option<&'a dyn WalletApi> {
        if session.is_authenticated() {
            self.remote.as_deref()
        } else {
            None
        }
    }

    /// Decide what a failed remote call means for the caller
    ///
    /// Outages are swallowed. Auth failures propagate unless the policy says
    /// to keep going from the cache.
    fn absorb_remote_error(&self, operation: &str, err: RemoteError) -> WalletResult<()> {
        match WalletError::from(err) {
            WalletError::Unauthorized(msg) if self.auth_failure == AuthFailurePolicy::Logout => {
                warn!(operation, error = %msg, "Remote rejected the session");
                Err(WalletError::Unauthorized(msg))
            }
            other => {
                warn!(operation, error = %other, "Remote unavailable, using local cache");
                Ok(())
            }
        }
    }

    fn persist(&self, session: &Session) -> WalletResult<()> {
        self.cache.set(&session.ledger_key(), &self.movements)
    }

    fn read_snapshot(&self, session: &Session) -> WalletResult<Vec<Movement>> {
        Ok(self
            .cache
            .get::<Vec<Movement>>(&session.ledger_key())?
            .unwrap_or_default())
    }

    /// Load the user's movements
    ///
    /// A successful remote fetch replaces the cached snapshot; otherwise the
    /// snapshot is what the user sees.
    pub fn load(&mut self, session: &Session) -> WalletResult<&[Movement]> {
        if let Some(remote) = self.remote_for(session) {
            match remote.fetch_movements(session) {
                Ok(movements) => {
                    info!(count = movements.len(), "Loaded movements from remote");
                    self.replace_all(session, movements)?;
                    self.source = LedgerSource::Remote;
                    return Ok(&self.movements);
                }
                Err(err) => self.absorb_remote_error("load", err)?,
            }
        }

        self.movements = self.read_snapshot(session)?;
        self.source = LedgerSource::Cache;
        debug!(count = self.movements.len(), key = %session.ledger_key(), "Loaded movements from cache");
        Ok(&self.movements)
    }

    /// Append a movement at the end of the ledger
    ///
    /// A blank or already-used id is replaced with a fresh one.
    pub fn append(&mut self, session: &Session, movement: Movement) -> WalletResult<&[Movement]> {
        self.append_shared(session, movement, None)
    }

    /// Append a movement, asking the remote to share it with `friend_email`
    pub fn append_shared(
        &mut self,
        session: &Session,
        mut movement: Movement,
        friend_email: Option<&str>,
    ) -> WalletResult<&[Movement]> {
        if movement.id.is_blank() || self.find(&movement.id).is_some() {
            movement.id = MovementId::new();
        }

        self.movements.push(movement);
        self.persist(session)?;

        if let Some(remote) = self.remote_for(session) {
            let local = &self.movements[self.movements.len() - 1];
            let request = CreateMovementRequest {
                movement: local,
                friend_email,
            };
            match remote.create_movement(session, &request) {
                Ok(Some(created)) => self.adopt_server_copy(session, created)?,
                Ok(None) => {}
                Err(err) => {
                    if let Err(rejected) = self.absorb_remote_error("append", err) {
                        // Undo the local write so the cache matches the failed call
                        self.movements.pop();
                        self.persist(session)?;
                        return Err(rejected);
                    }
                }
            }
        }

        Ok(&self.movements)
    }

    /// Take over the id and ownership the server assigned to the last movement
    fn adopt_server_copy(&mut self, session: &Session, created: Movement) -> WalletResult<()> {
        let last = self.movements.len() - 1;
        let taken = self.movements[..last]
            .iter()
            .any(|m| m.id == created.id);
        if taken {
            warn!(id = %created.id, "Server id already present locally, keeping local id");
            return Ok(());
        }

        let local = &mut self.movements[last];
        local.id = created.id;
        if created.owner_id.is_some() {
            local.owner_id = created.owner_id;
        }
        if created.shared_with_id.is_some() {
            local.shared_with_id = created.shared_with_id;
        }
        self.persist(session)
    }

    /// Remove a movement; removing an unknown id is a no-op
    pub fn remove_by_id(&mut self, session: &Session, id: &MovementId) -> WalletResult<&[Movement]> {
        let removed = self
            .movements
            .iter()
            .position(|m| &m.id == id)
            .map(|index| (index, self.movements.remove(index)));

        if removed.is_some() {
            self.persist(session)?;
        } else {
            debug!(%id, "Nothing to remove");
        }

        if let Some(remote) = self.remote_for(session) {
            match remote.delete_movement(session, id) {
                Ok(()) | Err(RemoteError::NotFound) => {}
                Err(err) => {
                    if let Err(rejected) = self.absorb_remote_error("remove", err) {
                        if let Some((index, movement)) = removed {
                            self.movements.insert(index, movement);
                            self.persist(session)?;
                        }
                        return Err(rejected);
                    }
                }
            }
        }

        Ok(&self.movements)
    }

    /// Overwrite memory and cache with exactly `movements`
    pub fn replace_all(&mut self, session: &Session, movements: Vec<Movement>) -> WalletResult<()> {
        self.movements = movements;
        self.persist(session)
    }

    /// Forget the in-memory ledger (logout); the cached snapshot stays on disk
    pub fn clear(&mut self) {
        self.movements.clear();
        self.source = LedgerSource::Empty;
    }
}

//! Session CLI commands
//!
//! Login and logout. The password is taken from the flag or the
//! MYWALLET_PASSWORD variable when given, otherwise prompted for without echo.

use zeroize::Zeroizing;

use crate::cli::CliContext;
use crate::error::{WalletError, WalletResult};
use crate::services::{LedgerService, SessionService};
use crate::storage::LedgerStore;

fn read_password(given: Option<String>) -> WalletResult<Zeroizing<String>> {
    match given {
        Some(password) => Ok(Zeroizing::new(password)),
        None => rpassword::prompt_password("Password: ")
            .map(Zeroizing::new)
            .map_err(|e| WalletError::Io(format!("Failed to read password: {}", e))),
    }
}

/// `login`: authenticate, save the session and pull the remote ledger
pub fn handle_login(ctx: &CliContext, email: &str, password: Option<String>) -> WalletResult<()> {
    let api = ctx.connect()?;
    let password = read_password(password)?;

    let cache = ctx.cache();
    let session = SessionService::new(&cache).login(&api, email, password.as_str())?;
    println!("Logged in as {}", session.user.name);

    // Refresh the offline snapshot right away
    let mut store = LedgerStore::with_remote(cache, Box::new(api))
        .auth_failure_policy(ctx.settings.auth_failure);
    let mut service = LedgerService::new(&mut store, &session);
    let count = service.load()?.len();
    println!("{} movement(s) in your ledger.", count);
    Ok(())
}

/// `logout`: forget the saved session and drop the loaded ledger
///
/// The cached ledger stays on disk as the offline snapshot.
pub fn handle_logout(ctx: &CliContext) -> WalletResult<()> {
    let cache = ctx.cache();
    let service = SessionService::new(&cache);

    let Some(session) = service.restore()? else {
        println!("Not logged in.");
        return Ok(());
    };

    let mut store = LedgerStore::local(ctx.cache());
    let kept = store.load(&session.offline())?.len();

    service.logout()?;
    store.clear();
    println!(
        "Logged out. {} movement(s) kept in the offline snapshot.",
        kept
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{Settings, WalletPaths};
    use crate::models::{Money, Movement, MovementType, Session, User};
    use crate::storage::cache::{TOKEN_KEY, USER_KEY};
    use tempfile::TempDir;

    #[test]
    fn test_given_password_is_used() {
        let password = read_password(Some("secret".into())).unwrap();
        assert_eq!(password.as_str(), "secret");
    }

    #[test]
    fn test_logout_removes_saved_session() {
        let temp_dir = TempDir::new().unwrap();
        let paths = WalletPaths::with_base_dir(temp_dir.path().to_path_buf());
        let ctx = CliContext::new(paths, Settings::default(), true);

        let cache = ctx.cache();
        SessionService::new(&cache)
            .save(&Session::authenticated(User::new("u1", "Ana"), "tok"))
            .unwrap();

        let snapshot = vec![Movement::new("rent", Money::from_cents(70000), MovementType::Expense)];
        cache.set("ledger_u1", &snapshot).unwrap();

        handle_logout(&ctx).unwrap();
        assert!(cache.contains("ledger_u1"));
        assert!(!cache.contains(USER_KEY));
        assert!(!cache.contains(TOKEN_KEY));

        // Second logout is a no-op
        handle_logout(&ctx).unwrap();
    }
}

//! Auth service - identity store, session, and their persistence
//!
//! The only component that reads or writes the auth keys of the
//! key-value store (`users`, `isLoggedIn`, `userEmail`).

use std::sync::Arc;

use serde::de::DeserializeOwned;

use crate::domain::result::{Error, Result};
use crate::domain::{IdentityStore, Role, Session, User};
use crate::ports::{keys, KeyValueStore};

use super::access::AccessPolicy;

/// Value written under `isLoggedIn` while a session is active
const LOGGED_IN_FLAG: &str = "true";

/// Decode a JSON value stored under `key`
///
/// Malformed data is reported as a diagnostic and treated as absent.
pub(crate) fn read_json<T: DeserializeOwned>(
    store: &dyn KeyValueStore,
    key: &str,
) -> Result<Option<T>> {
    let Some(raw) = store.get(key)? else {
        return Ok(None);
    };
    match serde_json::from_str(&raw) {
        Ok(value) => Ok(Some(value)),
        Err(e) => {
            tracing::warn!(key, error = %e, "Ignoring malformed stored data");
            Ok(None)
        }
    }
}

/// Identity and session state for one process
pub struct AuthService {
    store: Arc<dyn KeyValueStore>,
    identity: IdentityStore,
    session: Session,
}

impl AuthService {
    /// Hydrate identity and session from the store
    ///
    /// This is the single read performed at process start. A stored session
    /// is restored only when its email still resolves to a registered user;
    /// there is no expiry check.
    pub fn load(store: Arc<dyn KeyValueStore>) -> Result<Self> {
        let identity = Self::read_identity(store.as_ref())?;

        let flagged = store.get(keys::IS_LOGGED_IN)?.as_deref() == Some(LOGGED_IN_FLAG);
        let stored_email = store.get(keys::USER_EMAIL)?;

        let session = match (flagged, stored_email) {
            (true, Some(email)) if identity.contains(&email) => {
                tracing::debug!(email = %email, "Restored session");
                Session::logged_in(email)
            }
            (true, Some(email)) => {
                tracing::warn!(email = %email, "Stored session refers to an unregistered user, ignoring");
                Session::logged_out()
            }
            _ => Session::logged_out(),
        };

        Ok(Self {
            store,
            identity,
            session,
        })
    }

    fn read_identity(store: &dyn KeyValueStore) -> Result<IdentityStore> {
        let users: Vec<User> = read_json(store, keys::USERS)?.unwrap_or_default();
        Ok(IdentityStore::from_users(users))
    }

    /// Write `next` to the store, then adopt it as the in-memory list
    ///
    /// On a failed write the in-memory list keeps its previous value.
    fn commit_identity(&mut self, next: IdentityStore) -> Result<()> {
        let json = serde_json::to_string(&next)?;
        self.store.set(keys::USERS, &json)?;
        self.identity = next;
        Ok(())
    }

    /// Registered users, in insertion order
    pub fn users(&self) -> &IdentityStore {
        &self.identity
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    /// The signed-in user, looked up by the session's email
    pub fn current_user(&self) -> Option<&User> {
        if !self.session.is_logged_in() {
            return None;
        }
        self.session
            .user_email()
            .and_then(|email| self.identity.find(email))
    }

    /// True when no user has been registered yet
    pub fn is_first_run(&self) -> bool {
        self.identity.is_empty()
    }

    /// Role policy for the signed-in user
    pub fn policy(&self) -> AccessPolicy<'_> {
        AccessPolicy::new(self.current_user())
    }

    /// True iff a user is signed in and has exactly `role`
    pub fn has_role(&self, role: Role) -> bool {
        self.policy().has_role(role)
    }

    /// Sign in as `email`
    ///
    /// Returns `Error::UnknownUser` without touching the session when the
    /// email is not registered. There is no credential check.
    ///
    /// Users are re-read from the store only while the in-memory list is
    /// empty, so an account added by another process after this one loaded
    /// is not visible until the next start.
    pub fn login(&mut self, email: &str) -> Result<User> {
        if self.identity.is_empty() {
            self.identity = Self::read_identity(self.store.as_ref())?;
        }

        let Some(user) = self.identity.find(email).cloned() else {
            tracing::warn!(email, "Login attempted for unknown user");
            return Err(Error::UnknownUser(email.to_string()));
        };

        self.store.set(keys::IS_LOGGED_IN, LOGGED_IN_FLAG)?;
        self.store.set(keys::USER_EMAIL, &user.email)?;
        self.session = Session::logged_in(user.email.clone());

        tracing::info!(email, role = %user.role, "Logged in");
        Ok(user)
    }

    /// Clear the session in memory and in the store; users are untouched
    pub fn logout(&mut self) -> Result<()> {
        self.store.delete(keys::IS_LOGGED_IN)?;
        self.store.delete(keys::USER_EMAIL)?;
        if let Some(email) = self.session.user_email() {
            tracing::info!(email, "Logged out");
        }
        self.session = Session::logged_out();
        Ok(())
    }

    /// Replace every registered user with a single new one
    ///
    /// Meant for the first user of a fresh installation. Calling it later
    /// deletes all existing accounts; callers gate it on [`is_first_run`].
    ///
    /// [`is_first_run`]: Self::is_first_run
    pub fn register(&mut self, email: &str, role: Role) -> Result<User> {
        let replaced = self.identity.len();
        let user = User::new(email, role);
        let mut next = self.identity.clone();
        next.replace_with(user.clone());
        self.commit_identity(next)?;

        if replaced > 0 {
            tracing::warn!(email, replaced, "Register replaced existing users");
        } else {
            tracing::info!(email, role = %role, "Registered first user");
        }
        Ok(user)
    }

    /// Add a user; returns `Ok(false)` if the email is already registered
    pub fn add_user(&mut self, email: &str, role: Role) -> Result<bool> {
        let mut next = self.identity.clone();
        if !next.insert(User::new(email, role)) {
            tracing::debug!(email, "Rejected duplicate user");
            return Ok(false);
        }
        self.commit_identity(next)?;
        tracing::info!(email, role = %role, "Added user");
        Ok(true)
    }

    /// Remove a user other than the signed-in one
    ///
    /// Returns `Error::SelfRemoval` for the session's own email and
    /// `Ok(false)` if no such user exists.
    pub fn remove_user(&mut self, email: &str) -> Result<bool> {
        if self.session.is_user(email) {
            return Err(Error::SelfRemoval(email.to_string()));
        }
        self.remove_user_unchecked(email)
    }

    /// Remove a user without the self-removal check
    ///
    /// The session is left as is even when it belonged to `email`.
    pub fn remove_user_unchecked(&mut self, email: &str) -> Result<bool> {
        let mut next = self.identity.clone();
        if !next.remove(email) {
            return Ok(false);
        }
        self.commit_identity(next)?;
        tracing::info!(email, "Removed user");
        Ok(true)
    }

    /// Wipe every stored key except the users list and session flags
    ///
    /// Returns the keys that were removed. The caller stays signed in.
    /// Only the wiped keys are deleted; the preserved ones are never
    /// rewritten, so a failure part way leaves every account intact.
    pub fn delete_all_data(&mut self) -> Result<Vec<String>> {
        let wiped: Vec<String> = self
            .store
            .list()?
            .into_iter()
            .filter(|k| !keys::PRESERVED.contains(&k.as_str()))
            .collect();

        for key in &wiped {
            self.store.delete(key)?;
        }

        tracing::info!(wiped = wiped.len(), "Deleted application data");
        Ok(wiped)
    }
}

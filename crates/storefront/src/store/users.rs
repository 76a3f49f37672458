//! User directory and logged-in pointer.
//!
//! Users live in one JSON list under [`keys::USERS`]; the logged-in pointer
//! is a plain email string under [`keys::LOGGED_IN_USER_EMAIL`]. The two keys
//! are independent: nothing keeps the pointer in sync with the list, so a
//! pointer may name a user that does not exist.

use futures::{Stream, StreamExt};
use tracing::instrument;

use tcg_store_core::Email;

use super::{Preferences, Snapshot, StoreError, decode_or_default, keys};
use crate::models::{SessionState, User};

/// Directory of registered users.
#[derive(Debug, Clone)]
pub struct UserDirectory {
    prefs: Preferences,
}

impl UserDirectory {
    /// Create a user directory.
    #[must_use]
    pub const fn new(prefs: Preferences) -> Self {
        Self { prefs }
    }

    /// The underlying preference store.
    #[must_use]
    pub const fn preferences(&self) -> &Preferences {
        &self.prefs
    }

    // =========================================================================
    // Users
    // =========================================================================

    /// Append `user` to the directory.
    ///
    /// No uniqueness check is made here; callers that need one (registration)
    /// must look the email up first.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if the directory cannot be written.
    #[instrument(skip(self, user), fields(email = %user.email))]
    pub async fn register(&self, user: &User) -> Result<(), StoreError> {
        self.prefs
            .modify_json(keys::USERS, |users: &mut Vec<User>| {
                users.push(user.clone());
                true
            })
            .await?;
        tracing::debug!("user registered");
        Ok(())
    }

    /// Append `user` unless a user with the same email is already registered.
    ///
    /// The lookup and the append happen in one edit, so two concurrent
    /// registrations of the same email cannot both succeed. Returns whether
    /// the user was added.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if the directory cannot be written.
    #[instrument(skip(self, user), fields(email = %user.email))]
    pub async fn register_if_absent(&self, user: &User) -> Result<bool, StoreError> {
        self.prefs
            .modify_json(keys::USERS, |users: &mut Vec<User>| {
                if users.iter().any(|u| u.email == user.email) {
                    return false;
                }
                users.push(user.clone());
                true
            })
            .await
    }

    /// Replace the first user whose email matches `user.email`.
    ///
    /// Returns `false` and writes nothing when no user has that email.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if the directory cannot be written.
    #[instrument(skip(self, user), fields(email = %user.email))]
    pub async fn update(&self, user: &User) -> Result<bool, StoreError> {
        let updated = self
            .prefs
            .modify_json(keys::USERS, |users: &mut Vec<User>| {
                users
                    .iter_mut()
                    .find(|u| u.email == user.email)
                    .map(|existing| *existing = user.clone())
                    .is_some()
            })
            .await?;

        if !updated {
            tracing::debug!("update target not found");
        }
        Ok(updated)
    }

    /// All registered users, in registration order.
    #[must_use]
    pub fn users(&self) -> Vec<User> {
        self.prefs.read_json(keys::USERS)
    }

    /// The first user registered with `email`.
    #[must_use]
    pub fn find(&self, email: &Email) -> Option<User> {
        self.users().into_iter().find(|u| &u.email == email)
    }

    /// Stream of the user list, starting with the current one.
    pub fn observe_users(&self) -> impl Stream<Item = Vec<User>> + Send + use<> {
        self.prefs.observe_json(keys::USERS)
    }

    // =========================================================================
    // Logged-in Pointer
    // =========================================================================

    /// Point the session at `email`.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if the pointer cannot be written.
    #[instrument(skip(self))]
    pub async fn set_logged_in(&self, email: &Email) -> Result<(), StoreError> {
        self.prefs
            .set(keys::LOGGED_IN_USER_EMAIL, email.as_str())
            .await
    }

    /// Clear the session pointer.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if the pointer cannot be removed.
    #[instrument(skip(self))]
    pub async fn clear_logged_in(&self) -> Result<(), StoreError> {
        self.prefs.remove(keys::LOGGED_IN_USER_EMAIL).await
    }

    /// Email the session points at. Blank pointers read as `None`.
    #[must_use]
    pub fn logged_in_email(&self) -> Option<Email> {
        SessionState::from_pointer(self.prefs.get(keys::LOGGED_IN_USER_EMAIL).as_deref())
            .email()
            .cloned()
    }

    /// Stream of the session pointer, starting with the current value.
    pub fn observe_logged_in_email(&self) -> impl Stream<Item = Option<Email>> + Send + use<> {
        self.prefs
            .subscribe(keys::LOGGED_IN_USER_EMAIL)
            .map(|raw| SessionState::from_pointer(raw.as_deref()).email().cloned())
    }
}

/// The user a container's session pointer names, if it exists.
pub(crate) fn resolve_current_user(snapshot: &Snapshot) -> Option<User> {
    let state = SessionState::from_pointer(
        snapshot
            .get(keys::LOGGED_IN_USER_EMAIL)
            .map(String::as_str),
    );
    let email = state.email()?;
    let users: Vec<User> =
        decode_or_default(keys::USERS, snapshot.get(keys::USERS).map(String::as_str));
    users.into_iter().find(|u| &u.email == email)
}

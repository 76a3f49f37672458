//! Append-only login attempt log.

use futures::Stream;

use super::{Preferences, StoreError, keys};
use crate::models::LoginAttempt;

/// Log of login attempts stored under [`keys::LOGIN_ATTEMPTS`].
///
/// Entries are only ever appended.
#[derive(Debug, Clone)]
pub struct LoginAttemptLog {
    prefs: Preferences,
}

impl LoginAttemptLog {
    /// Create a login attempt log.
    #[must_use]
    pub const fn new(prefs: Preferences) -> Self {
        Self { prefs }
    }

    /// Append `attempt` to the log.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if the log cannot be written.
    pub async fn record(&self, attempt: &LoginAttempt) -> Result<(), StoreError> {
        self.prefs
            .modify_json(keys::LOGIN_ATTEMPTS, |log: &mut Vec<LoginAttempt>| {
                log.push(attempt.clone());
                true
            })
            .await?;
        tracing::debug!(email = %attempt.email, success = attempt.success, "login attempt recorded");
        Ok(())
    }

    /// All recorded attempts, oldest first.
    #[must_use]
    pub fn attempts(&self) -> Vec<LoginAttempt> {
        self.prefs.read_json(keys::LOGIN_ATTEMPTS)
    }

    /// Stream of the log, starting with its current contents.
    pub fn observe(&self) -> impl Stream<Item = Vec<LoginAttempt>> + Send + use<> {
        self.prefs.observe_json(keys::LOGIN_ATTEMPTS)
    }
}

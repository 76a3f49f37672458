//! Session context.
//!
//! Holds the "who is logged in" view for components that need the current
//! user. It is passed around explicitly; there is no global session.

use async_stream::stream;
use futures::{Stream, StreamExt};

use crate::models::{SessionState, User};
use crate::store::users::resolve_current_user;
use crate::store::{Snapshot, UserDirectory, keys};

/// Explicit session handle over a user directory.
#[derive(Debug, Clone)]
pub struct SessionContext {
    directory: UserDirectory,
}

impl SessionContext {
    /// Create a session context.
    #[must_use]
    pub const fn new(directory: UserDirectory) -> Self {
        Self { directory }
    }

    /// The directory this session reads from.
    #[must_use]
    pub const fn directory(&self) -> &UserDirectory {
        &self.directory
    }

    /// Current session state.
    #[must_use]
    pub fn state(&self) -> SessionState {
        state_of(&self.directory.preferences().snapshot())
    }

    /// The logged-in user.
    ///
    /// `None` when logged out, and also when the pointer names an email that
    /// is not in the directory. Callers should treat both as "no user yet"
    /// rather than as an error.
    #[must_use]
    pub fn current_user(&self) -> Option<User> {
        resolve_current_user(&self.directory.preferences().snapshot())
    }

    /// Stream of session states, starting with the current one.
    pub fn observe_state(&self) -> impl Stream<Item = SessionState> + Send + use<> {
        dedup(self.directory.preferences().snapshots().map(|s| state_of(&s)))
    }

    /// Stream of the current user.
    ///
    /// Re-evaluated when either the pointer or the user list changes.
    pub fn observe_current_user(&self) -> impl Stream<Item = Option<User>> + Send + use<> {
        dedup(
            self.directory
                .preferences()
                .snapshots()
                .map(|s| resolve_current_user(&s)),
        )
    }
}

fn state_of(snapshot: &Snapshot) -> SessionState {
    SessionState::from_pointer(
        snapshot
            .get(keys::LOGGED_IN_USER_EMAIL)
            .map(String::as_str),
    )
}

/// Drop consecutive duplicates.
fn dedup<S, T>(items: S) -> impl Stream<Item = T> + Send + 'static
where
    S: Stream<Item = T> + Send + 'static,
    T: PartialEq + Clone + Send + 'static,
{
    stream! {
        let mut last: Option<T> = None;
        for await item in items {
            if last.as_ref() != Some(&item) {
                last = Some(item.clone());
                yield item;
            }
        }
    }
}

//! Session state derived from the logged-in pointer.

use tcg_store_core::Email;

/// Whether someone is logged in on this device.
///
/// There is no expiry: the state only changes on login and logout.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum SessionState {
    #[default]
    LoggedOut,
    LoggedIn(Email),
}

impl SessionState {
    /// Interpret the stored pointer. Absent, empty and blank values all
    /// mean nobody is logged in.
    #[must_use]
    pub fn from_pointer(pointer: Option<&str>) -> Self {
        match pointer.map(str::trim) {
            Some(email) if !email.is_empty() => Self::LoggedIn(Email::from_stored(email.to_owned())),
            _ => Self::LoggedOut,
        }
    }

    /// The logged-in email, if any.
    #[must_use]
    pub const fn email(&self) -> Option<&Email> {
        match self {
            Self::LoggedIn(email) => Some(email),
            Self::LoggedOut => None,
        }
    }

    #[must_use]
    pub const fn is_logged_in(&self) -> bool {
        matches!(self, Self::LoggedIn(_))
    }
}

//! Login attempt record.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One login attempt, successful or not.
///
/// The email is stored as typed, so malformed input is logged too.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoginAttempt {
    #[serde(rename = "correo")]
    pub email: String,
    pub success: bool,
    /// Milliseconds since the Unix epoch on the wire.
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub timestamp: DateTime<Utc>,
}

impl LoginAttempt {
    /// An attempt recorded now.
    #[must_use]
    pub fn now(email: impl Into<String>, success: bool) -> Self {
        Self {
            email: email.into(),
            success,
            timestamp: Utc::now(),
        }
    }
}

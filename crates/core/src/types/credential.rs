//! Stored password credential.

use core::fmt;

use serde::{Deserialize, Serialize};

/// The password value persisted with a user record.
///
/// Newly registered users store an Argon2 PHC string here. Records written
/// by older clients may hold the plaintext password instead; the auth
/// service tells the two apart with [`PasswordDigest::is_phc`].
///
/// `Debug` never prints the value.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PasswordDigest(String);

impl PasswordDigest {
    /// Wrap a stored credential string.
    #[must_use]
    pub const fn new(value: String) -> Self {
        Self(value)
    }

    /// Get the stored value.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether the value looks like an Argon2 PHC hash (`$argon2id$...`).
    ///
    /// A leading `$` alone is not enough: plaintext passwords may start with
    /// one.
    #[must_use]
    pub fn is_phc(&self) -> bool {
        ["$argon2id$", "$argon2i$", "$argon2d$"]
            .iter()
            .any(|prefix| self.0.starts_with(prefix))
    }
}

impl fmt::Debug for PasswordDigest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("PasswordDigest([REDACTED])")
    }
}

impl From<String> for PasswordDigest {
    fn from(value: String) -> Self {
        Self(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_debug_redacts_value() {
        let digest = PasswordDigest::new("Hunter2.secret".to_string());
        let debug = format!("{digest:?}");
        assert!(debug.contains("[REDACTED]"));
        assert!(!debug.contains("Hunter2"));
    }

    #[test]
    fn test_detects_phc_strings() {
        assert!(PasswordDigest::new("$argon2id$v=19$m=19456,t=2,p=1$abc$def".into()).is_phc());
        assert!(!PasswordDigest::new("Pikachu.2024".into()).is_phc());
        assert!(!PasswordDigest::new("$Starmie1x".into()).is_phc());
    }
}

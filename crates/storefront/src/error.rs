//! Unified error handling.
//!
//! Provides a unified `AppError` type for callers (the CLI, screens) that
//! drive several layers at once. [`AppError::user_message`] is what gets
//! shown; the `Display` form is for logs.

use thiserror::Error;

use crate::config::ConfigError;
use crate::remote::RemoteError;
use crate::services::auth::AuthError;
use crate::store::StoreError;
use crate::validation::ValidationErrors;

/// Application-level error type.
#[derive(Debug, Error)]
pub enum AppError {
    /// Preference store operation failed.
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    /// Authentication operation failed.
    #[error("Auth error: {0}")]
    Auth(#[from] AuthError),

    /// Remote service call failed.
    #[error("Remote error: {0}")]
    Remote(#[from] RemoteError),

    /// Configuration could not be loaded.
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),

    /// Form input failed validation.
    #[error("Invalid input: {0}")]
    Validation(#[from] ValidationErrors),

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Bad request from the user.
    #[error("Bad request: {0}")]
    BadRequest(String),
}

impl AppError {
    /// Message safe to show to the user.
    ///
    /// Internal details (paths, encoder errors) are not exposed.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::Store(_) => "Could not save local data".to_string(),
            Self::Config(e) => e.to_string(),
            Self::Remote(e) => e.user_message(),
            Self::Validation(e) => e.to_string(),
            Self::Auth(err) => match err {
                AuthError::InvalidCredentials => "Invalid email or password".to_string(),
                AuthError::UserAlreadyExists => {
                    "An account with this email already exists".to_string()
                }
                AuthError::NotLoggedIn => "You are not logged in".to_string(),
                AuthError::UserNotFound => "Your account could not be found".to_string(),
                AuthError::Validation(e) => e.to_string(),
                AuthError::Store(_) | AuthError::PasswordHash => {
                    "Authentication error".to_string()
                }
            },
            Self::NotFound(_) | Self::BadRequest(_) => self.to_string(),
        }
    }

    /// Whether the error comes from the environment rather than user input.
    #[must_use]
    pub const fn is_internal(&self) -> bool {
        matches!(
            self,
            Self::Store(_)
                | Self::Config(_)
                | Self::Auth(AuthError::Store(_) | AuthError::PasswordHash)
        )
    }
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;

//! Client configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! All variables are optional.
//! - `TCG_STORE_PATH` - Preference file (default: `tcg_prefs.json`)
//! - `TCG_ADMIN_EMAIL` - Administrator login (default: `admin@tcg.cl`)
//! - `TCG_ADMIN_PASSWORD` - Administrator password (default: `admin`)
//! - `TCG_AUTH_BASE_URL` - Auth service base URL (default: `http://localhost:8081/`)
//! - `TCG_MAIN_BASE_URL` - Main service base URL (default: `http://localhost:8080/`)

use std::path::PathBuf;

use secrecy::{ExposeSecret, SecretString};
use thiserror::Error;
use url::Url;

use tcg_store_core::Email;

pub const DEFAULT_STORE_PATH: &str = "tcg_prefs.json";
pub const DEFAULT_ADMIN_EMAIL: &str = "admin@tcg.cl";
const DEFAULT_ADMIN_PASSWORD: &str = "admin";
pub const DEFAULT_AUTH_BASE_URL: &str = "http://localhost:8081/";
pub const DEFAULT_MAIN_BASE_URL: &str = "http://localhost:8080/";

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Client configuration.
#[derive(Debug, Clone)]
pub struct StoreConfig {
    /// Backing file of the preference store
    pub store_path: PathBuf,
    /// Built-in administrator login
    pub admin: AdminConfig,
    /// Remote service endpoints
    pub api: ApiConfig,
}

/// Administrator credentials checked before the user directory.
///
/// Implements `Debug` manually to redact the password.
#[derive(Clone)]
pub struct AdminConfig {
    pub email: Email,
    pub password: SecretString,
}

impl std::fmt::Debug for AdminConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AdminConfig")
            .field("email", &self.email)
            .field("password", &"[REDACTED]")
            .finish()
    }
}

impl Default for AdminConfig {
    fn default() -> Self {
        Self {
            email: Email::from_stored(DEFAULT_ADMIN_EMAIL.to_string()),
            password: SecretString::from(DEFAULT_ADMIN_PASSWORD),
        }
    }
}

impl AdminConfig {
    /// Whether the well-known default password is still in use.
    #[must_use]
    pub fn uses_default_password(&self) -> bool {
        self.password.expose_secret() == DEFAULT_ADMIN_PASSWORD
    }
}

/// Base URLs of the auth and main services.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiConfig {
    pub auth_base_url: Url,
    pub main_base_url: Url,
}

impl StoreConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is set to an invalid value.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        Self::from_source(|key| std::env::var(key).ok())
    }

    /// Load configuration from an arbitrary variable source.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is set to an invalid value.
    pub fn from_source<F>(var: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let store_path = PathBuf::from(or_default(&var, "TCG_STORE_PATH", DEFAULT_STORE_PATH));

        let admin_email = or_default(&var, "TCG_ADMIN_EMAIL", DEFAULT_ADMIN_EMAIL);
        let admin = AdminConfig {
            email: Email::parse(&admin_email).map_err(|e| {
                ConfigError::InvalidEnvVar("TCG_ADMIN_EMAIL".to_string(), e.to_string())
            })?,
            password: SecretString::from(or_default(
                &var,
                "TCG_ADMIN_PASSWORD",
                DEFAULT_ADMIN_PASSWORD,
            )),
        };
        if admin.uses_default_password() {
            tracing::warn!("TCG_ADMIN_PASSWORD not set, using the default administrator password");
        }

        let api = ApiConfig {
            auth_base_url: base_url(&var, "TCG_AUTH_BASE_URL", DEFAULT_AUTH_BASE_URL)?,
            main_base_url: base_url(&var, "TCG_MAIN_BASE_URL", DEFAULT_MAIN_BASE_URL)?,
        };

        Ok(Self {
            store_path,
            admin,
            api,
        })
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Get a variable with a default value. Blank values count as unset.
fn or_default<F>(var: &F, key: &str, default: &str) -> String
where
    F: Fn(&str) -> Option<String>,
{
    var(key)
        .filter(|v| !v.trim().is_empty())
        .unwrap_or_else(|| default.to_string())
}

/// Parse a base URL, ensuring it ends with `/` so relative paths join below it.
fn base_url<F>(var: &F, key: &str, default: &str) -> Result<Url, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let mut raw = or_default(var, key, default);
    if !raw.ends_with('/') {
        raw.push('/');
    }

    let url = Url::parse(&raw)
        .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))?;
    if url.cannot_be_a_base() {
        return Err(ConfigError::InvalidEnvVar(
            key.to_string(),
            "not a base URL".to_string(),
        ));
    }
    Ok(url)
}

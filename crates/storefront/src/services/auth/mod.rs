//! Authentication service.
//!
//! Local registration and password login over the user directory. Every
//! login attempt is appended to the attempt log, whatever its outcome.

mod error;

pub use error::AuthError;

use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use secrecy::{ExposeSecret, SecretString};
use tracing::instrument;

use tcg_store_core::{Email, PasswordDigest};

use crate::config::AdminConfig;
use crate::models::{LoginAttempt, User, UserProfile};
use crate::store::{LoginAttemptLog, Preferences, UserDirectory};
use crate::validation::{self, Field, ValidationErrors};

/// Registration form input.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub first_name: String,
    pub last_name: String,
    pub national_id: String,
    pub email: String,
    pub address: String,
    pub phone: String,
    pub password: SecretString,
    pub password_confirmation: SecretString,
    pub photo: Option<String>,
}

impl NewUser {
    /// Check every field, returning the parsed email when all pass.
    ///
    /// # Errors
    ///
    /// Returns every rule that failed.
    pub fn validate(&self) -> Result<Email, ValidationErrors> {
        let mut errors = ValidationErrors::default();
        errors.check(validation::name(Field::FirstName, &self.first_name));
        errors.check(validation::name(Field::LastName, &self.last_name));
        errors.check(validation::national_id(&self.national_id));
        errors.check(validation::required(Field::Address, &self.address));
        errors.check(validation::phone(&self.phone));
        errors.check(validation::password(self.password.expose_secret()));
        errors.check(validation::confirmation(
            self.password.expose_secret(),
            self.password_confirmation.expose_secret(),
        ));

        match validation::email(&self.email) {
            Ok(email) => errors.into_result().map(|()| email),
            Err(e) => {
                errors.push(e);
                Err(errors)
            }
        }
    }
}

/// Check the editable profile fields.
///
/// # Errors
///
/// Returns every rule that failed.
pub fn validate_profile(profile: &UserProfile) -> Result<(), ValidationErrors> {
    let mut errors = ValidationErrors::default();
    errors.check(validation::name(Field::FirstName, &profile.first_name));
    errors.check(validation::name(Field::LastName, &profile.last_name));
    errors.check(validation::national_id(&profile.national_id));
    errors.check(validation::phone(&profile.phone));
    errors.into_result()
}

/// Who a successful login authenticated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoginOutcome {
    /// The configured administrator. No session pointer is set.
    Admin,
    /// A registered customer, now the logged-in user.
    Customer(User),
}

/// Authentication service.
#[derive(Debug, Clone)]
pub struct AuthService {
    directory: UserDirectory,
    attempts: LoginAttemptLog,
    admin: AdminConfig,
}

impl AuthService {
    /// Create a new authentication service.
    #[must_use]
    pub fn new(prefs: Preferences, admin: AdminConfig) -> Self {
        Self::with_stores(
            UserDirectory::new(prefs.clone()),
            LoginAttemptLog::new(prefs),
            admin,
        )
    }

    /// Create a service over an explicit directory and attempt log.
    #[must_use]
    pub const fn with_stores(
        directory: UserDirectory,
        attempts: LoginAttemptLog,
        admin: AdminConfig,
    ) -> Self {
        Self {
            directory,
            attempts,
            admin,
        }
    }

    /// The user directory this service writes to.
    #[must_use]
    pub const fn directory(&self) -> &UserDirectory {
        &self.directory
    }

    // =========================================================================
    // Registration
    // =========================================================================

    /// Register a new user.
    ///
    /// Does not log the user in.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::Validation` if any field is invalid.
    /// Returns `AuthError::UserAlreadyExists` if the email is already registered.
    #[instrument(skip(self, form), fields(email = %form.email))]
    pub async fn register(&self, form: NewUser) -> Result<User, AuthError> {
        let email = form.validate()?;
        if self.directory.find(&email).is_some() {
            return Err(AuthError::UserAlreadyExists);
        }

        let password = hash_password(form.password.expose_secret())?;
        let user = User {
            first_name: form.first_name,
            last_name: form.last_name,
            national_id: form.national_id,
            email,
            address: form.address,
            phone: form.phone,
            password,
            photo: form.photo,
        };

        if !self.directory.register_if_absent(&user).await? {
            return Err(AuthError::UserAlreadyExists);
        }

        tracing::info!("user registered");
        Ok(user)
    }

    // =========================================================================
    // Login
    // =========================================================================

    /// Log in with email and password.
    ///
    /// The administrator credentials are checked first. A customer login
    /// points the session at the user. The attempt is recorded either way,
    /// before anything else is written.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidCredentials` if the email/password is wrong.
    /// Returns `AuthError::Store` if the attempt, a credential upgrade or the
    /// session pointer cannot be written.
    #[instrument(skip(self, password))]
    pub async fn login(&self, email: &str, password: &str) -> Result<LoginOutcome, AuthError> {
        let verdict = self.authenticate(email, password);
        self.attempts
            .record(&LoginAttempt::now(email, verdict.is_some()))
            .await?;

        match verdict {
            Some(Authenticated::Admin) => {
                tracing::info!("administrator logged in");
                Ok(LoginOutcome::Admin)
            }
            Some(Authenticated::Customer { user, legacy }) => {
                let user = if legacy {
                    self.upgrade_credential(user, password).await?
                } else {
                    user
                };
                self.directory.set_logged_in(&user.email).await?;
                tracing::info!("customer logged in");
                Ok(LoginOutcome::Customer(user))
            }
            None => {
                tracing::info!("login rejected");
                Err(AuthError::InvalidCredentials)
            }
        }
    }

    /// Check credentials without writing anything.
    fn authenticate(&self, email: &str, password: &str) -> Option<Authenticated> {
        if self.admin.email == *email.trim() && self.admin.password.expose_secret() == password {
            return Some(Authenticated::Admin);
        }

        let user = self.directory.find(&Email::parse(email).ok()?)?;
        match verify_password(password, &user.password) {
            Verified::No => None,
            Verified::Yes => Some(Authenticated::Customer { user, legacy: false }),
            Verified::Legacy => Some(Authenticated::Customer { user, legacy: true }),
        }
    }

    /// Replace a plaintext credential with an Argon2 hash.
    async fn upgrade_credential(&self, user: User, password: &str) -> Result<User, AuthError> {
        let upgraded = User {
            password: hash_password(password)?,
            ..user
        };
        self.directory.update(&upgraded).await?;
        tracing::debug!("upgraded plaintext password");
        Ok(upgraded)
    }

    /// Clear the session.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::Store` if the pointer cannot be removed.
    #[instrument(skip(self))]
    pub async fn logout(&self) -> Result<(), AuthError> {
        self.directory.clear_logged_in().await?;
        tracing::info!("logged out");
        Ok(())
    }

    // =========================================================================
    // Profile
    // =========================================================================

    /// Replace the logged-in user's profile fields.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::NotLoggedIn` if there is no session.
    /// Returns `AuthError::Validation` if any field is invalid.
    /// Returns `AuthError::UserNotFound` if the session user is not registered.
    #[instrument(skip(self, profile))]
    pub async fn update_profile(&self, profile: UserProfile) -> Result<User, AuthError> {
        let email = self
            .directory
            .logged_in_email()
            .ok_or(AuthError::NotLoggedIn)?;
        validate_profile(&profile)?;

        let user = self
            .directory
            .find(&email)
            .ok_or(AuthError::UserNotFound)?
            .with_profile(profile);
        if !self.directory.update(&user).await? {
            return Err(AuthError::UserNotFound);
        }

        tracing::info!(email = %email, "profile updated");
        Ok(user)
    }
}

/// Who a credential check matched, before any session change.
enum Authenticated {
    Admin,
    /// `legacy` is set when the stored credential is still plaintext.
    Customer { user: User, legacy: bool },
}

/// Result of checking a password against a stored credential.
enum Verified {
    Yes,
    No,
    /// Matched a plaintext credential from an older client.
    Legacy,
}

/// Hash a password using Argon2id.
fn hash_password(password: &str) -> Result<PasswordDigest, AuthError> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();

    argon2
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| PasswordDigest::new(hash.to_string()))
        .map_err(|_| AuthError::PasswordHash)
}

/// Verify a password against a stored credential.
fn verify_password(password: &str, stored: &PasswordDigest) -> Verified {
    let parsed = stored
        .is_phc()
        .then(|| PasswordHash::new(stored.as_str()).ok())
        .flatten();

    // Anything that does not parse as a hash is a plaintext credential.
    let Some(parsed_hash) = parsed else {
        return if stored.as_str() == password {
            Verified::Legacy
        } else {
            Verified::No
        };
    };
    match Argon2::default().verify_password(password.as_bytes(), &parsed_hash) {
        Ok(()) => Verified::Yes,
        Err(_) => Verified::No,
    }
}

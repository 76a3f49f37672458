//! Registration and profile form validation.
//!
//! Every rule is checked and all failures are reported together, so a form
//! can flag each bad field at once.

use std::fmt;
use std::sync::LazyLock;

use regex::Regex;
use thiserror::Error;

use tcg_store_core::{Email, EmailError};

/// Chilean RUT, either `12345678-9` or `12.345.678-9`.
static RUT_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[0-9]{7,8}-[0-9kK]$|^[0-9]{1,2}\.[0-9]{3}\.[0-9]{3}-[0-9kK]$").expect("Invalid regex")
});

static PHONE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9]{9}$").expect("Invalid regex"));

/// Minimum password length.
const MIN_PASSWORD_LENGTH: usize = 8;

/// Characters that count as a password symbol.
const PASSWORD_SYMBOLS: &str = "@$!%*?&._-";

/// A form field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    FirstName,
    LastName,
    NationalId,
    Email,
    Address,
    Phone,
    Password,
    PasswordConfirmation,
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::FirstName => "first name",
            Self::LastName => "last name",
            Self::NationalId => "RUT",
            Self::Email => "email",
            Self::Address => "address",
            Self::Phone => "phone",
            Self::Password => "password",
            Self::PasswordConfirmation => "password confirmation",
        })
    }
}

/// A single failed rule.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("{0} is required")]
    Required(Field),

    #[error("{0} cannot contain numbers")]
    ContainsDigits(Field),

    #[error("invalid RUT format")]
    InvalidNationalId,

    #[error("invalid email: {0}")]
    InvalidEmail(#[from] EmailError),

    #[error("phone must be exactly nine digits")]
    InvalidPhone,

    #[error(
        "password must be at least 8 characters with an uppercase letter, \
         a lowercase letter, a number and a symbol"
    )]
    WeakPassword,

    #[error("passwords do not match")]
    PasswordMismatch,
}

impl ValidationError {
    /// The field this error is about.
    #[must_use]
    pub const fn field(&self) -> Field {
        match self {
            Self::Required(field) | Self::ContainsDigits(field) => *field,
            Self::InvalidNationalId => Field::NationalId,
            Self::InvalidEmail(_) => Field::Email,
            Self::InvalidPhone => Field::Phone,
            Self::WeakPassword => Field::Password,
            Self::PasswordMismatch => Field::PasswordConfirmation,
        }
    }
}

/// All rule failures of one form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationErrors(Vec<ValidationError>);

impl ValidationErrors {
    /// Record a failure.
    pub fn push(&mut self, error: ValidationError) {
        self.0.push(error);
    }

    /// Record the failure of `check`, if any.
    pub fn check(&mut self, check: Result<(), ValidationError>) {
        if let Err(e) = check {
            self.push(e);
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Failures in the order they were found.
    #[must_use]
    pub fn errors(&self) -> &[ValidationError] {
        &self.0
    }

    /// Whether `field` failed any rule.
    #[must_use]
    pub fn has(&self, field: Field) -> bool {
        self.0.iter().any(|e| e.field() == field)
    }

    /// `Ok(())` when nothing failed.
    ///
    /// # Errors
    ///
    /// Returns `self` if any rule failed.
    pub fn into_result(self) -> Result<(), Self> {
        if self.is_empty() { Ok(()) } else { Err(self) }
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, error) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str("; ")?;
            }
            write!(f, "{error}")?;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationErrors {}

// =============================================================================
// Rules
// =============================================================================

/// Non-blank value.
///
/// # Errors
///
/// Returns `ValidationError::Required` if `value` is blank.
pub fn required(field: Field, value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::Required(field));
    }
    Ok(())
}

/// Non-blank name without digits.
///
/// # Errors
///
/// Returns `ValidationError::Required` or `ValidationError::ContainsDigits`.
pub fn name(field: Field, value: &str) -> Result<(), ValidationError> {
    required(field, value)?;
    if value.chars().any(|c| c.is_ascii_digit()) {
        return Err(ValidationError::ContainsDigits(field));
    }
    Ok(())
}

/// Chilean RUT, with or without thousands separators.
///
/// # Errors
///
/// Returns `ValidationError::InvalidNationalId` if the format is wrong.
pub fn national_id(value: &str) -> Result<(), ValidationError> {
    if !RUT_RE.is_match(value) {
        return Err(ValidationError::InvalidNationalId);
    }
    Ok(())
}

/// Parse an email.
///
/// # Errors
///
/// Returns `ValidationError::InvalidEmail` if the address is malformed.
pub fn email(value: &str) -> Result<Email, ValidationError> {
    Ok(Email::parse(value)?)
}

/// Exactly nine digits.
///
/// # Errors
///
/// Returns `ValidationError::InvalidPhone` if the format is wrong.
pub fn phone(value: &str) -> Result<(), ValidationError> {
    if !PHONE_RE.is_match(value) {
        return Err(ValidationError::InvalidPhone);
    }
    Ok(())
}

/// At least eight characters with lowercase, uppercase, digit and symbol.
///
/// # Errors
///
/// Returns `ValidationError::WeakPassword` if any class is missing.
pub fn password(value: &str) -> Result<(), ValidationError> {
    let strong = value.chars().count() >= MIN_PASSWORD_LENGTH
        && value.chars().any(|c| c.is_ascii_lowercase())
        && value.chars().any(|c| c.is_ascii_uppercase())
        && value.chars().any(|c| c.is_ascii_digit())
        && value.chars().any(|c| PASSWORD_SYMBOLS.contains(c));
    if !strong {
        return Err(ValidationError::WeakPassword);
    }
    Ok(())
}

/// Password and confirmation are identical.
///
/// # Errors
///
/// Returns `ValidationError::PasswordMismatch` if they differ.
pub fn confirmation(password: &str, confirmation: &str) -> Result<(), ValidationError> {
    if password != confirmation {
        return Err(ValidationError::PasswordMismatch);
    }
    Ok(())
}

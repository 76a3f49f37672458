//! Account commands: registration, login, session and listings.
//!
//! # Usage
//!
//! ```bash
//! tcg login -e ash@pallet.town -p 'Pikachu.25'
//! tcg whoami
//! tcg profile --phone 987654321
//! tcg users list --json
//! tcg attempts list
//! ```

use clap::Args;
use secrecy::SecretString;
use serde::Serialize;

use tcg_storefront::AppError;
use tcg_storefront::config::StoreConfig;
use tcg_storefront::models::{SessionState, UserProfile};
use tcg_storefront::services::{AuthService, LoginOutcome, NewUser, SessionContext};
use tcg_storefront::store::{LoginAttemptLog, Preferences, UserDirectory};

use super::print_json;

#[derive(Args)]
pub struct RegisterArgs {
    #[arg(long)]
    first_name: String,

    #[arg(long)]
    last_name: String,

    /// National ID (RUT), e.g. `12345678-9` or `12.345.678-9`
    #[arg(long)]
    rut: String,

    #[arg(short, long)]
    email: String,

    #[arg(long)]
    address: String,

    /// Nine-digit phone number
    #[arg(long)]
    phone: String,

    #[arg(short, long)]
    password: String,

    /// Repeat of the password (defaults to `--password`)
    #[arg(long)]
    confirm_password: Option<String>,

    /// Profile photo reference
    #[arg(long)]
    photo: Option<String>,
}

/// Profile fields to change. Omitted fields keep their current value.
#[derive(Args)]
pub struct ProfileArgs {
    #[arg(long)]
    first_name: Option<String>,

    #[arg(long)]
    last_name: Option<String>,

    #[arg(long)]
    rut: Option<String>,

    #[arg(long)]
    address: Option<String>,

    #[arg(long)]
    phone: Option<String>,

    #[arg(long)]
    photo: Option<String>,
}

/// Register a new account. Does not log in.
pub async fn register(
    prefs: Preferences,
    config: StoreConfig,
    args: RegisterArgs,
) -> Result<(), AppError> {
    let confirmation = args
        .confirm_password
        .unwrap_or_else(|| args.password.clone());
    let form = NewUser {
        first_name: args.first_name,
        last_name: args.last_name,
        national_id: args.rut,
        email: args.email,
        address: args.address,
        phone: args.phone,
        password: SecretString::from(args.password),
        password_confirmation: SecretString::from(confirmation),
        photo: args.photo,
    };

    let user = AuthService::new(prefs, config.admin).register(form).await?;
    println!("Registered {} <{}>", user.full_name(), user.email);
    Ok(())
}

pub async fn login(
    prefs: Preferences,
    config: StoreConfig,
    email: &str,
    password: &str,
) -> Result<(), AppError> {
    match AuthService::new(prefs, config.admin)
        .login(email, password)
        .await?
    {
        LoginOutcome::Admin => println!("Logged in as administrator"),
        LoginOutcome::Customer(user) => println!("Logged in as {}", user.full_name()),
    }
    Ok(())
}

pub async fn logout(prefs: Preferences, config: StoreConfig) -> Result<(), AppError> {
    AuthService::new(prefs, config.admin).logout().await?;
    println!("Logged out");
    Ok(())
}

pub fn whoami(prefs: Preferences) {
    let session = SessionContext::new(UserDirectory::new(prefs));
    match (session.state(), session.current_user()) {
        (SessionState::LoggedOut, _) => println!("Not logged in"),
        (SessionState::LoggedIn(_), Some(user)) => {
            println!("{} <{}>", user.full_name(), user.email);
        }
        (SessionState::LoggedIn(email), None) => {
            println!("{email} (no longer registered)");
        }
    }
}

/// Apply a profile edit for the logged-in user.
pub async fn profile(
    prefs: Preferences,
    config: StoreConfig,
    args: ProfileArgs,
) -> Result<(), AppError> {
    let auth = AuthService::new(prefs, config.admin);
    let session = SessionContext::new(auth.directory().clone());
    let current = session
        .current_user()
        .map(|user| UserProfile::from(&user))
        .unwrap_or_default();

    let edited = UserProfile {
        first_name: args.first_name.unwrap_or(current.first_name),
        last_name: args.last_name.unwrap_or(current.last_name),
        national_id: args.rut.unwrap_or(current.national_id),
        address: args.address.unwrap_or(current.address),
        phone: args.phone.unwrap_or(current.phone),
        photo: args.photo.or(current.photo),
    };

    let user = auth.update_profile(edited).await?;
    println!("Updated profile of {}", user.full_name());
    Ok(())
}

/// A user as listed, without the stored credential.
#[derive(Serialize)]
struct UserRow<'a> {
    email: &'a str,
    name: String,
    rut: &'a str,
    phone: &'a str,
    address: &'a str,
}

pub fn list_users(prefs: Preferences, json: bool) -> Result<(), AppError> {
    let users = UserDirectory::new(prefs).users();
    let rows: Vec<UserRow<'_>> = users
        .iter()
        .map(|u| UserRow {
            email: u.email.as_str(),
            name: u.full_name(),
            rut: &u.national_id,
            phone: &u.phone,
            address: &u.address,
        })
        .collect();

    if json {
        return print_json(&rows);
    }
    if rows.is_empty() {
        println!("No registered users");
    }
    for row in rows {
        println!("{:<32} {:<24} {:<13} {}", row.email, row.name, row.rut, row.phone);
    }
    Ok(())
}

pub fn list_attempts(prefs: Preferences, json: bool) -> Result<(), AppError> {
    let attempts = LoginAttemptLog::new(prefs).attempts();
    if json {
        return print_json(&attempts);
    }
    if attempts.is_empty() {
        println!("No login attempts");
    }
    for attempt in attempts {
        println!(
            "{}  {:<8} {}",
            attempt.timestamp.format("%Y-%m-%d %H:%M:%S"),
            if attempt.success { "ok" } else { "rejected" },
            attempt.email
        );
    }
    Ok(())
}

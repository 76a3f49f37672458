//! Integration tests for the TCG Store client state.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p tcg-integration-tests
//! ```
//!
//! # Test Categories
//!
//! - `cart_flow` - Cart merge, decrement and clear over observed streams
//! - `directory` - User directory and session pointer
//! - `auth_flow` - Registration, login and the attempt log
//! - `persistence` - File-backed stores, reopen and concurrent writers
//!
//! This crate only holds shared fixtures.

use std::path::PathBuf;
use std::time::Duration;

use futures::{Stream, StreamExt};
use secrecy::SecretString;
use tempfile::TempDir;

use tcg_store_core::{Email, PasswordDigest, Price, ProductId};
use tcg_storefront::models::{Product, User};
use tcg_storefront::services::NewUser;

/// How long a test waits for an expected stream emission.
pub const EMIT_TIMEOUT: Duration = Duration::from_secs(2);

/// A locally added product (no server ID).
#[must_use]
pub fn local_product(name: &str, price: i64) -> Product {
    Product {
        id: None,
        name: name.to_string(),
        description: format!("{name} (sealed)"),
        price: Price::new(price),
        image: format!("content://media/{}", name.len()),
    }
}

/// A product as fetched from the main service.
#[must_use]
pub fn server_product(id: i64, name: &str, price: i64) -> Product {
    Product {
        id: Some(ProductId::new(id)),
        ..local_product(name, price)
    }
}

/// A directory record with a plaintext credential, as older clients wrote.
///
/// # Panics
///
/// Panics if `email` is not a valid address.
#[must_use]
pub fn stored_user(email: &str, first_name: &str) -> User {
    User {
        first_name: first_name.to_string(),
        last_name: "Trainer".to_string(),
        national_id: "12345678-5".to_string(),
        email: Email::parse(email).expect("fixture email"),
        address: "Route 1, Kanto".to_string(),
        phone: "912345678".to_string(),
        password: PasswordDigest::new("Pikachu.25".to_string()),
        photo: None,
    }
}

/// A registration form that passes every field rule.
#[must_use]
pub fn registration(email: &str, password: &str) -> NewUser {
    NewUser {
        first_name: "Ash".to_string(),
        last_name: "Ketchum".to_string(),
        national_id: "12.345.678-5".to_string(),
        email: email.to_string(),
        address: "Pallet Town 1".to_string(),
        phone: "912345678".to_string(),
        password: SecretString::from(password),
        password_confirmation: SecretString::from(password),
        photo: None,
    }
}

/// A temporary directory and the preference file path inside it.
///
/// # Panics
///
/// Panics if the temporary directory cannot be created.
#[must_use]
pub fn temp_store_path() -> (TempDir, PathBuf) {
    let dir = tempfile::tempdir().expect("temp dir");
    let path = dir.path().join("prefs.json");
    (dir, path)
}

/// Next item of `stream`, failing the test if none arrives in time.
///
/// # Panics
///
/// Panics on timeout or if the stream has ended.
pub async fn next_within<S>(stream: &mut S) -> S::Item
where
    S: Stream + Unpin,
{
    tokio::time::timeout(EMIT_TIMEOUT, stream.next())
        .await
        .expect("stream emitted in time")
        .expect("stream still open")
}

/// Wait until `stream` emits an item satisfying `pred`, and return it.
///
/// # Panics
///
/// Panics if no such item arrives in time.
pub async fn wait_for<S, F>(stream: &mut S, mut pred: F) -> S::Item
where
    S: Stream + Unpin,
    F: FnMut(&S::Item) -> bool,
{
    tokio::time::timeout(EMIT_TIMEOUT, async {
        loop {
            let item = stream.next().await.expect("stream still open");
            if pred(&item) {
                return item;
            }
        }
    })
    .await
    .expect("expected item emitted in time")
}

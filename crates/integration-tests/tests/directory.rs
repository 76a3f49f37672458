//! User directory and session pointer.

use tcg_integration_tests::{next_within, stored_user, wait_for};
use tcg_store_core::Email;
use tcg_storefront::models::SessionState;
use tcg_storefront::services::SessionContext;
use tcg_storefront::store::{Preferences, UserDirectory, keys};

#[tokio::test]
async fn test_register_then_observe_shows_user_once() {
    let directory = UserDirectory::new(Preferences::in_memory());
    directory
        .register(&stored_user("ash@pallet.town", "Ash"))
        .await
        .expect("register");

    let mut users = Box::pin(directory.observe_users());
    let first = next_within(&mut users).await;

    let matching = first
        .iter()
        .filter(|u| u.email.as_str() == "ash@pallet.town")
        .count();
    assert_eq!(matching, 1);
}

#[tokio::test]
async fn test_update_missing_email_leaves_directory_unchanged() {
    let prefs = Preferences::in_memory();
    let directory = UserDirectory::new(prefs.clone());
    directory
        .register(&stored_user("ash@pallet.town", "Ash"))
        .await
        .expect("register");
    directory
        .register(&stored_user("misty@cerulean.gym", "Misty"))
        .await
        .expect("register");
    let before = directory.users();
    let raw_before = prefs.get(keys::USERS);

    let changed = directory
        .update(&stored_user("brock@pewter.gym", "Brock"))
        .await
        .expect("update");

    assert!(!changed);
    assert_eq!(directory.users(), before);
    assert_eq!(prefs.get(keys::USERS), raw_before);
}

#[tokio::test]
async fn test_update_replaces_record_in_place() {
    let directory = UserDirectory::new(Preferences::in_memory());
    directory
        .register(&stored_user("ash@pallet.town", "Ash"))
        .await
        .expect("register");
    directory
        .register(&stored_user("misty@cerulean.gym", "Misty"))
        .await
        .expect("register");

    let mut edited = stored_user("ash@pallet.town", "Satoshi");
    edited.phone = "987654321".to_string();
    assert!(directory.update(&edited).await.expect("update"));

    let users = directory.users();
    assert_eq!(users.len(), 2);
    assert_eq!(users[0].first_name, "Satoshi");
    assert_eq!(users[1].first_name, "Misty");
}

#[tokio::test]
async fn test_raw_register_does_not_dedupe() {
    let directory = UserDirectory::new(Preferences::in_memory());
    let ash = stored_user("ash@pallet.town", "Ash");
    directory.register(&ash).await.expect("register");
    directory.register(&ash).await.expect("register again");

    assert_eq!(directory.users().len(), 2);
}

#[tokio::test]
async fn test_session_follows_pointer() {
    let prefs = Preferences::in_memory();
    let directory = UserDirectory::new(prefs.clone());
    directory
        .register(&stored_user("ash@pallet.town", "Ash"))
        .await
        .expect("register");
    let session = SessionContext::new(directory.clone());
    let mut states = Box::pin(session.observe_state());
    assert_eq!(next_within(&mut states).await, SessionState::LoggedOut);

    let email = Email::parse("ash@pallet.town").expect("email");
    directory.set_logged_in(&email).await.expect("login");
    assert_eq!(
        wait_for(&mut states, SessionState::is_logged_in).await,
        SessionState::LoggedIn(email)
    );
    assert_eq!(
        session.current_user().map(|u| u.first_name),
        Some("Ash".to_string())
    );

    directory.clear_logged_in().await.expect("logout");
    assert_eq!(
        wait_for(&mut states, |s| !s.is_logged_in()).await,
        SessionState::LoggedOut
    );
    assert_eq!(prefs.get(keys::LOGGED_IN_USER_EMAIL), None);
}

#[tokio::test]
async fn test_empty_pointer_is_logged_out() {
    let prefs = Preferences::in_memory();
    prefs
        .set(keys::LOGGED_IN_USER_EMAIL, "")
        .await
        .expect("set");
    let session = SessionContext::new(UserDirectory::new(prefs));

    assert_eq!(session.state(), SessionState::LoggedOut);
    assert_eq!(session.current_user(), None);
}

#[tokio::test]
async fn test_pointer_to_unregistered_email_has_no_user() {
    let directory = UserDirectory::new(Preferences::in_memory());
    let email = Email::parse("gary@pallet.town").expect("email");
    directory.set_logged_in(&email).await.expect("pointer");
    let session = SessionContext::new(directory);

    assert!(session.state().is_logged_in());
    assert_eq!(session.current_user(), None);
}

//! Registration, login and the login-attempt log, end to end.

use tcg_integration_tests::{next_within, registration, stored_user, wait_for};
use tcg_storefront::config::AdminConfig;
use tcg_storefront::models::SessionState;
use tcg_storefront::services::{AuthError, AuthService, LoginOutcome, SessionContext};
use tcg_storefront::store::{LoginAttemptLog, Preferences};

fn service() -> (Preferences, AuthService) {
    let prefs = Preferences::in_memory();
    (prefs.clone(), AuthService::new(prefs, AdminConfig::default()))
}

#[tokio::test]
async fn test_register_login_logout() {
    let (prefs, auth) = service();
    let session = SessionContext::new(auth.directory().clone());

    let user = auth
        .register(registration("ash@pallet.town", "Pikachu.25"))
        .await
        .expect("register");
    assert!(user.password.is_phc());
    assert_eq!(session.state(), SessionState::LoggedOut);

    let outcome = auth
        .login("ash@pallet.town", "Pikachu.25")
        .await
        .expect("login");
    assert_eq!(outcome, LoginOutcome::Customer(user.clone()));
    assert_eq!(session.current_user(), Some(user));

    auth.logout().await.expect("logout");
    assert_eq!(session.state(), SessionState::LoggedOut);
    assert_eq!(LoginAttemptLog::new(prefs).attempts().len(), 1);
}

#[tokio::test]
async fn test_duplicate_email_rejected_by_service_only() {
    let (_, auth) = service();
    auth.register(registration("ash@pallet.town", "Pikachu.25"))
        .await
        .expect("register");

    let err = auth
        .register(registration("ash@pallet.town", "Charizard.6"))
        .await
        .unwrap_err();
    assert!(matches!(err, AuthError::UserAlreadyExists));
    assert_eq!(auth.directory().users().len(), 1);

    // The raw directory append is unchecked.
    auth.directory()
        .register(&stored_user("ash@pallet.town", "Ash"))
        .await
        .expect("raw register");
    assert_eq!(auth.directory().users().len(), 2);
}

#[tokio::test]
async fn test_every_attempt_is_logged() {
    let (prefs, auth) = service();
    let log = LoginAttemptLog::new(prefs);
    let mut observed = Box::pin(log.observe());
    assert!(next_within(&mut observed).await.is_empty());
    auth.register(registration("ash@pallet.town", "Pikachu.25"))
        .await
        .expect("register");

    let _ = auth.login("ash@pallet.town", "wrong").await;
    let _ = auth.login("not an email", "Pikachu.25").await;
    auth.login("admin@tcg.cl", "admin").await.expect("admin");
    auth.login("ash@pallet.town", "Pikachu.25")
        .await
        .expect("customer");

    let attempts = wait_for(&mut observed, |a| a.len() == 4).await;
    let summary: Vec<(&str, bool)> = attempts
        .iter()
        .map(|a| (a.email.as_str(), a.success))
        .collect();
    assert_eq!(
        summary,
        vec![
            ("ash@pallet.town", false),
            ("not an email", false),
            ("admin@tcg.cl", true),
            ("ash@pallet.town", true),
        ]
    );
    assert!(attempts.windows(2).all(|w| w[0].timestamp <= w[1].timestamp));
}

#[tokio::test]
async fn test_invalid_registration_writes_nothing() {
    let (prefs, auth) = service();
    let mut form = registration("ash@pallet.town", "short");
    form.phone = "12345".to_string();

    let err = auth.register(form).await.unwrap_err();

    let errors = match err {
        AuthError::Validation(errors) => errors,
        other => panic!("expected validation errors, got {other:?}"),
    };
    assert!(errors.errors().len() >= 2);
    assert!(prefs.snapshot().is_empty());
}

#[tokio::test]
async fn test_legacy_user_logs_in_and_is_upgraded() {
    let (_, auth) = service();
    auth.directory()
        .register(&stored_user("misty@cerulean.gym", "Misty"))
        .await
        .expect("seed legacy record");

    auth.login("misty@cerulean.gym", "Pikachu.25")
        .await
        .expect("legacy login");

    let stored = auth.directory().users().remove(0);
    assert!(stored.password.is_phc());
    auth.logout().await.expect("logout");
    auth.login("misty@cerulean.gym", "Pikachu.25")
        .await
        .expect("login after upgrade");
}

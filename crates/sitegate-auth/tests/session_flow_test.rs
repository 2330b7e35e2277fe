//! Integration tests for the register / login / logout / session flow.

mod helpers;

use sitegate_auth::password::KdfParams;
use sitegate_auth::token::TokenClaims;
use sitegate_core::config::AppConfig;
use sitegate_core::error::ErrorKind;

use helpers::{FAST_KDF, MemoryUserStore, TestApp, cookie_header, token_service};

#[tokio::test]
async fn test_register_then_current_user() {
    let app = TestApp::new();

    let session = app
        .auth
        .register(" Alice@Example.com ", "correcthorsebattery")
        .await
        .unwrap();

    assert_eq!(session.user.email, "alice@example.com");
    assert!(session.set_cookie.starts_with("session="));
    assert!(session.set_cookie.contains("HttpOnly"));
    assert!(session.set_cookie.contains("Max-Age=3600"));

    let cookie = cookie_header(&session.set_cookie);
    let user = app.auth.current_user(Some(&cookie), None).await.unwrap();
    assert_eq!(user, session.user);
}

#[tokio::test]
async fn test_register_stores_salted_hash() {
    let app = TestApp::new();
    app.auth
        .register("bob@example.com", "correcthorsebattery")
        .await
        .unwrap();

    let stored = app.store.get_by_email("bob@example.com").unwrap();
    assert_ne!(stored.credential.derived_key, "correcthorsebattery");
    assert_eq!(stored.credential.kdf, FAST_KDF);
}

#[tokio::test]
async fn test_register_duplicate_email_is_case_insensitive() {
    let app = TestApp::new();
    app.auth
        .register("carol@example.com", "password123")
        .await
        .unwrap();

    let err = app
        .auth
        .register("CAROL@example.com", "differentpass")
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::Conflict);
    assert_eq!(app.store.len(), 1);
}

#[tokio::test]
async fn test_register_validation() {
    let app = TestApp::new();

    let err = app.auth.register("dave@example.com", "short").await.unwrap_err();
    assert_eq!(err.kind, ErrorKind::Validation);

    let err = app.auth.register("not-an-email", "longenough").await.unwrap_err();
    assert_eq!(err.kind, ErrorKind::Validation);

    assert_eq!(app.store.len(), 0);
}

#[tokio::test]
async fn test_login_success() {
    let app = TestApp::new();
    app.auth
        .register("erin@example.com", "password123")
        .await
        .unwrap();

    let session = app
        .auth
        .login("ERIN@example.com", "password123")
        .await
        .unwrap();
    assert_eq!(session.user.email, "erin@example.com");

    let claims = app.auth.tokens().verify(&session.token).unwrap();
    assert_eq!(claims.subject_id(), Some(session.user.id));
    assert_eq!(claims.email(), Some("erin@example.com"));
    assert_eq!(claims.expires_at_datetime(), Some(session.expires_at));
}

#[tokio::test]
async fn test_login_failures_are_indistinguishable() {
    let app = TestApp::new();
    app.auth
        .register("frank@example.com", "password123")
        .await
        .unwrap();

    let wrong_password = app
        .auth
        .login("frank@example.com", "wrongpassword")
        .await
        .unwrap_err();
    let unknown_user = app
        .auth
        .login("nobody@example.com", "password123")
        .await
        .unwrap_err();
    let empty_password = app
        .auth
        .login("frank@example.com", "")
        .await
        .unwrap_err();

    for err in [&wrong_password, &unknown_user, &empty_password] {
        assert_eq!(err.kind, ErrorKind::Authentication);
    }
    assert_eq!(wrong_password.message, unknown_user.message);
    assert_eq!(wrong_password.message, empty_password.message);
}

#[tokio::test]
async fn test_logout_clears_cookie() {
    let app = TestApp::new();
    let cleared = app.auth.logout();
    assert_eq!(
        cleared,
        "session=; Path=/; HttpOnly; Secure; SameSite=Lax; Max-Age=0"
    );

    let err = app
        .auth
        .current_user(Some(&cookie_header(&cleared)), None)
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::Authentication);
}

#[tokio::test]
async fn test_current_user_from_bearer_header() {
    let app = TestApp::new();
    let session = app
        .auth
        .register("gina@example.com", "password123")
        .await
        .unwrap();

    let header = format!("Bearer {}", session.token);
    let user = app.auth.current_user(None, Some(&header)).await.unwrap();
    assert_eq!(user.id, session.user.id);
}

#[tokio::test]
async fn test_current_user_rejections_are_generic() {
    let app = TestApp::new();
    let session = app
        .auth
        .register("hank@example.com", "password123")
        .await
        .unwrap();

    let missing = app.auth.current_user(None, None).await.unwrap_err();

    let mut tampered = session.token.clone();
    tampered.push('A');
    let tampered = app
        .auth
        .current_user(None, Some(&format!("Bearer {tampered}")))
        .await
        .unwrap_err();

    let expired_token = token_service(3600)
        .issue(&TokenClaims::session(session.user.id, "hank@example.com"), -1)
        .unwrap();
    let expired = app
        .auth
        .current_user(None, Some(&format!("Bearer {expired_token}")))
        .await
        .unwrap_err();

    for err in [&missing, &tampered, &expired] {
        assert_eq!(err.kind, ErrorKind::Authentication);
        assert_eq!(err.message, "Unauthorized");
    }
}

#[tokio::test]
async fn test_current_user_deleted_account() {
    let app = TestApp::new();
    let session = app
        .auth
        .register("ivy@example.com", "password123")
        .await
        .unwrap();
    app.store.remove(session.user.id);

    let err = app
        .auth
        .current_user(Some(&cookie_header(&session.set_cookie)), None)
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::NotFound);
}

#[tokio::test]
async fn test_login_rehashes_outdated_credential() {
    let legacy_kdf = KdfParams::Pbkdf2 { iterations: 1000 };
    let legacy = TestApp::with_kdf(legacy_kdf);
    legacy
        .auth
        .register("jack@example.com", "password123")
        .await
        .unwrap();

    let current = TestApp::with_store(FAST_KDF, legacy.store.clone());
    current
        .auth
        .login("jack@example.com", "password123")
        .await
        .unwrap();

    let stored = current.store.get_by_email("jack@example.com").unwrap();
    assert_eq!(stored.credential.kdf, FAST_KDF);

    current
        .auth
        .login("jack@example.com", "password123")
        .await
        .unwrap();
}

#[tokio::test]
async fn test_from_config_requires_signing_secret() {
    let store = std::sync::Arc::new(MemoryUserStore::default());
    let config = AppConfig::default();

    let err = sitegate_auth::Authenticator::from_config(&config, store).unwrap_err();
    assert_eq!(err.kind, ErrorKind::Configuration);
}

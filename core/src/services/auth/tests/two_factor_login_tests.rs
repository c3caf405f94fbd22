//! Login flows for accounts with two-factor authentication

use crate::domain::entities::user::User;
use crate::domain::value_objects::{AuthSession, LoginOutcome};
use crate::errors::{AuthError, DomainError};
use crate::services::auth::LoginRequest;

use super::mocks::{Harness, PASSWORD};

const EMAIL: &str = "ana@example.com";

async fn two_factor_user(h: &Harness) -> (User, Vec<String>) {
    let user = h.verified_user(EMAIL).await;
    let codes = h.two_factor.enable(user.id, Some(PASSWORD)).await.unwrap();
    (user, codes)
}

fn request() -> LoginRequest {
    LoginRequest {
        email: EMAIL.to_string(),
        password: PASSWORD.to_string(),
        device_label: Some("Firefox".to_string()),
        client_ip: Some("10.0.0.1".to_string()),
        ..Default::default()
    }
}

fn expect_session(outcome: LoginOutcome) -> Box<AuthSession> {
    match outcome {
        LoginOutcome::Authenticated(session) => session,
        other => panic!("expected a session, got {:?}", other),
    }
}

#[tokio::test]
async fn test_login_without_code_mails_code() {
    let h = Harness::new();
    two_factor_user(&h).await;

    let outcome = h.service.login(request()).await.unwrap();

    assert_eq!(
        outcome,
        LoginOutcome::TwoFactorRequired {
            email_hint: "a***@example.com".to_string()
        }
    );
    assert!(h.mailer.last_code(EMAIL).is_some());
}

#[tokio::test]
async fn test_login_with_mailed_code() {
    let h = Harness::new();
    two_factor_user(&h).await;
    h.service.login(request()).await.unwrap();
    let code = h.mailer.last_code(EMAIL).unwrap();

    let session = expect_session(
        h.service
            .login(LoginRequest {
                code: Some(code),
                ..request()
            })
            .await
            .unwrap(),
    );

    assert!(session.trusted_device.is_none());
    assert!(!session.used_backup_code);
}

#[tokio::test]
async fn test_wrong_code_rejected() {
    let h = Harness::new();
    two_factor_user(&h).await;
    h.service.login(request()).await.unwrap();
    let code = h.mailer.last_code(EMAIL).unwrap();
    let wrong = if code == "000000" { "111111" } else { "000000" };

    let result = h
        .service
        .login(LoginRequest {
            code: Some(wrong.to_string()),
            ..request()
        })
        .await;
    assert!(matches!(result, Err(DomainError::Auth(AuthError::InvalidTwoFactorCode))));
}

#[tokio::test]
async fn test_code_login_can_trust_device() {
    let h = Harness::new();
    let (user, _) = two_factor_user(&h).await;
    h.service.login(request()).await.unwrap();
    let code = h.mailer.last_code(EMAIL).unwrap();

    let session = expect_session(
        h.service
            .login(LoginRequest {
                code: Some(code),
                trust_device: true,
                ..request()
            })
            .await
            .unwrap(),
    );
    let device = session.trusted_device.expect("device should be trusted");

    let mails_before = h.mailer.count_to(EMAIL);
    let next = expect_session(
        h.service
            .login(LoginRequest {
                device_cookie: Some(device.cookie_value.clone()),
                ..request()
            })
            .await
            .unwrap(),
    );

    assert!(next.trusted_device.is_none());
    assert_eq!(h.mailer.count_to(EMAIL), mails_before);
    assert_eq!(h.devices.list(user.id).await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_trusted_cookie_does_not_issue_new_device() {
    let h = Harness::new();
    let (user, _) = two_factor_user(&h).await;
    let device = h.devices.trust(user.id, None, None).await.unwrap();

    let session = expect_session(
        h.service
            .login(LoginRequest {
                device_cookie: Some(device.cookie_value),
                trust_device: true,
                ..request()
            })
            .await
            .unwrap(),
    );

    assert!(session.trusted_device.is_none());
}

#[tokio::test]
async fn test_foreign_cookie_still_requires_code() {
    let h = Harness::new();
    two_factor_user(&h).await;
    let other = h.verified_user("bo@example.com").await;
    let device = h.devices.trust(other.id, None, None).await.unwrap();

    let outcome = h
        .service
        .login(LoginRequest {
            device_cookie: Some(device.cookie_value),
            ..request()
        })
        .await
        .unwrap();

    assert!(matches!(outcome, LoginOutcome::TwoFactorRequired { .. }));
}

#[tokio::test]
async fn test_backup_code_login_is_single_use() {
    let h = Harness::new();
    let (user, codes) = two_factor_user(&h).await;

    let session = expect_session(
        h.service
            .login(LoginRequest {
                backup_code: Some(codes[0].clone()),
                ..request()
            })
            .await
            .unwrap(),
    );
    assert!(session.used_backup_code);
    assert_eq!(h.two_factor.remaining_backup_codes(user.id).await.unwrap(), 9);

    let reuse = h
        .service
        .login(LoginRequest {
            backup_code: Some(codes[0].clone()),
            ..request()
        })
        .await;
    assert!(matches!(reuse, Err(DomainError::Auth(AuthError::InvalidBackupCode))));
}

#[tokio::test]
async fn test_two_factor_ignored_when_disabled() {
    let h = Harness::new();
    h.verified_user(EMAIL).await;

    let session = expect_session(
        h.service
            .login(LoginRequest {
                trust_device: true,
                ..request()
            })
            .await
            .unwrap(),
    );

    assert!(session.trusted_device.is_none());
}

#[tokio::test]
async fn test_wrong_password_never_reaches_second_factor() {
    let h = Harness::new();
    two_factor_user(&h).await;

    let result = h
        .service
        .login(LoginRequest {
            password: "wrong-pass-1".to_string(),
            ..request()
        })
        .await;

    assert!(matches!(result, Err(DomainError::Auth(AuthError::InvalidCredentials))));
    assert!(h.mailer.last_code(EMAIL).is_none());
}

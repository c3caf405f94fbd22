//! Two-factor login, backup codes and trusted devices over HTTP

mod common;

use actix_web::{cookie::Cookie, http::StatusCode, test};
use common::{bearer, login_body, TestContext, PASSWORD};
use gm_api::create_app;
use gm_core::domain::entities::user::UserRole;
use serde_json::{json, Value};

const DEVICE_COOKIE: &str = "gm_trusted_device";

/// Verified user with two-factor enabled; returns the backup codes
async fn two_factor_user(ctx: &TestContext, email: &str) -> Vec<String> {
    let user = ctx.verified_user(email, UserRole::Student).await;
    ctx.state
        .two_factor
        .enable(user.id, Some(PASSWORD))
        .await
        .unwrap()
}

#[actix_web::test]
async fn test_enable_two_factor_requires_password() {
    let ctx = TestContext::new();
    ctx.verified_user("ana@example.com", UserRole::Student).await;
    let app = test::init_service(create_app(ctx.state.clone(), &ctx.config)).await;

    let req = test::TestRequest::post()
        .uri("/api/v1/auth/login")
        .set_json(login_body("ana@example.com"))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    let access = body["access_token"].as_str().unwrap().to_string();

    let req = test::TestRequest::post()
        .uri("/api/v1/account/two-factor/enable")
        .insert_header(bearer(&access))
        .set_json(json!({ "password": "not my password 1" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

    let req = test::TestRequest::post()
        .uri("/api/v1/account/two-factor/enable")
        .insert_header(bearer(&access))
        .set_json(json!({ "password": PASSWORD }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let body: Value = test::read_body_json(resp).await;
    let codes = body["backup_codes"].as_array().unwrap();
    assert_eq!(codes.len(), ctx.config.auth.two_factor.backup_code_count);

    let req = test::TestRequest::get()
        .uri("/api/v1/account/two-factor/backup-codes")
        .insert_header(bearer(&access))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["remaining"], codes.len());
}

#[actix_web::test]
async fn test_code_login_and_trusted_device() {
    let ctx = TestContext::new();
    two_factor_user(&ctx, "bo@example.com").await;
    let app = test::init_service(create_app(ctx.state.clone(), &ctx.config)).await;

    // Password alone only gets a mailed code
    let req = test::TestRequest::post()
        .uri("/api/v1/auth/login")
        .set_json(login_body("bo@example.com"))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["status"], "two_factor_required");
    assert!(body["email_hint"].as_str().unwrap().ends_with("@example.com"));
    assert!(body.get("access_token").is_none());

    let code = ctx.last_code("bo@example.com");
    let req = test::TestRequest::post()
        .uri("/api/v1/auth/login")
        .insert_header(("User-Agent", "Firefox on Linux"))
        .set_json(json!({
            "email": "bo@example.com",
            "password": PASSWORD,
            "code": code,
            "trust_device": true
        }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let cookie = resp
        .response()
        .cookies()
        .find(|c| c.name() == DEVICE_COOKIE)
        .map(Cookie::into_owned)
        .expect("trusted device cookie set");
    assert_eq!(cookie.http_only(), Some(true));
    assert_eq!(cookie.path(), Some("/"));

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["status"], "authenticated");
    assert_eq!(body["used_backup_code"], false);
    let access = body["access_token"].as_str().unwrap().to_string();

    // The trusted cookie stands in for the second factor
    let mails_before = ctx.mailer.count_to("bo@example.com");
    let req = test::TestRequest::post()
        .uri("/api/v1/auth/login")
        .cookie(cookie.clone())
        .set_json(login_body("bo@example.com"))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["status"], "authenticated");
    assert_eq!(ctx.mailer.count_to("bo@example.com"), mails_before);

    let req = test::TestRequest::get()
        .uri("/api/v1/account/devices")
        .insert_header(bearer(&access))
        .cookie(cookie.clone())
        .to_request();
    let devices: Value = test::call_and_read_body_json(&app, req).await;
    let devices = devices.as_array().unwrap();
    assert_eq!(devices.len(), 1);
    assert_eq!(devices[0]["current"], true);
    assert_eq!(devices[0]["label"], "Firefox on Linux");

    let req = test::TestRequest::delete()
        .uri("/api/v1/account/devices")
        .insert_header(bearer(&access))
        .cookie(cookie.clone())
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["revoked"], 1);

    // A revoked device no longer skips the code
    let req = test::TestRequest::post()
        .uri("/api/v1/auth/login")
        .cookie(cookie)
        .set_json(login_body("bo@example.com"))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["status"], "two_factor_required");
}

#[actix_web::test]
async fn test_trust_device_needs_a_second_factor() {
    let ctx = TestContext::new();
    ctx.verified_user("cy@example.com", UserRole::Student).await;
    let app = test::init_service(create_app(ctx.state.clone(), &ctx.config)).await;

    let req = test::TestRequest::post()
        .uri("/api/v1/auth/login")
        .set_json(json!({
            "email": "cy@example.com",
            "password": PASSWORD,
            "trust_device": true
        }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert!(resp
        .response()
        .cookies()
        .all(|c| c.name() != DEVICE_COOKIE));
}

#[actix_web::test]
async fn test_wrong_code_is_rejected() {
    let ctx = TestContext::new();
    two_factor_user(&ctx, "di@example.com").await;
    let app = test::init_service(create_app(ctx.state.clone(), &ctx.config)).await;

    let req = test::TestRequest::post()
        .uri("/api/v1/auth/login")
        .set_json(login_body("di@example.com"))
        .to_request();
    test::call_service(&app, req).await;

    let code = ctx.last_code("di@example.com");
    let wrong = if code == "000000" { "111111" } else { "000000" };
    let req = test::TestRequest::post()
        .uri("/api/v1/auth/login")
        .set_json(json!({ "email": "di@example.com", "password": PASSWORD, "code": wrong }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "TWO_FACTOR_CODE_INVALID");
}

#[actix_web::test]
async fn test_backup_code_is_single_use() {
    let ctx = TestContext::new();
    let codes = two_factor_user(&ctx, "ed@example.com").await;
    let app = test::init_service(create_app(ctx.state.clone(), &ctx.config)).await;

    let login = json!({
        "email": "ed@example.com",
        "password": PASSWORD,
        "backup_code": codes[0]
    });

    let req = test::TestRequest::post()
        .uri("/api/v1/auth/login")
        .set_json(&login)
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["status"], "authenticated");
    assert_eq!(body["used_backup_code"], true);
    let access = body["access_token"].as_str().unwrap().to_string();

    let req = test::TestRequest::get()
        .uri("/api/v1/account/two-factor/backup-codes")
        .insert_header(bearer(&access))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["remaining"], codes.len() - 1);

    let req = test::TestRequest::post()
        .uri("/api/v1/auth/login")
        .set_json(&login)
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "BACKUP_CODE_INVALID");
}

#[actix_web::test]
async fn test_code_resend_cooldown() {
    let mut config = TestContext::new().config;
    config.auth.two_factor.resend_cooldown_seconds = 60;
    let ctx = TestContext::with_config(config);
    two_factor_user(&ctx, "fi@example.com").await;
    let app = test::init_service(create_app(ctx.state.clone(), &ctx.config)).await;

    let req = test::TestRequest::post()
        .uri("/api/v1/auth/login")
        .set_json(login_body("fi@example.com"))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let req = test::TestRequest::post()
        .uri("/api/v1/auth/login")
        .set_json(login_body("fi@example.com"))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::TOO_MANY_REQUESTS);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "RESEND_COOLDOWN");
    assert!(body["details"]["retry_after_seconds"].as_i64().unwrap() > 0);
}

//! Registration, login, token and password-reset flows over HTTP

mod common;

use actix_web::{http::StatusCode, test};
use common::{bearer, login_body, TestContext, PASSWORD};
use gm_api::create_app;
use gm_core::domain::entities::user::UserRole;
use serde_json::{json, Value};

#[actix_web::test]
async fn test_register_then_verify_email() {
    let ctx = TestContext::new();
    let app = test::init_service(create_app(ctx.state.clone(), &ctx.config)).await;

    let req = test::TestRequest::post()
        .uri("/api/v1/auth/register")
        .set_json(json!({
            "name": "Ana",
            "email": "Ana@Example.com",
            "password": PASSWORD,
            "role": "INSTRUCTOR"
        }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CREATED);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["email"], "ana@example.com");
    assert_eq!(body["role"], "INSTRUCTOR");
    assert_eq!(body["email_verified"], false);

    let token = ctx.last_link_token("ana@example.com");
    let req = test::TestRequest::post()
        .uri("/api/v1/auth/new-verification")
        .set_json(json!({ "token": token }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["email_verified"], true);

    // Verification tokens are single use
    let req = test::TestRequest::post()
        .uri("/api/v1/auth/new-verification")
        .set_json(json!({ "token": token }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert!(resp.status().is_client_error());
}

#[actix_web::test]
async fn test_register_rejections() {
    let ctx = TestContext::new();
    ctx.verified_user("taken@example.com", UserRole::Student).await;
    let app = test::init_service(create_app(ctx.state.clone(), &ctx.config)).await;

    let cases = [
        (
            json!({ "name": "A", "email": "taken@example.com", "password": PASSWORD }),
            StatusCode::CONFLICT,
        ),
        (
            json!({ "name": "A", "email": "boss@example.com", "password": PASSWORD, "role": "ADMIN" }),
            StatusCode::FORBIDDEN,
        ),
        (
            json!({ "name": "A", "email": "not-an-email", "password": PASSWORD }),
            StatusCode::BAD_REQUEST,
        ),
        (
            json!({ "name": "A", "email": "weak@example.com", "password": "short" }),
            StatusCode::BAD_REQUEST,
        ),
    ];

    for (body, expected) in cases {
        let req = test::TestRequest::post()
            .uri("/api/v1/auth/register")
            .set_json(&body)
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), expected, "body: {}", body);
    }
}

#[actix_web::test]
async fn test_login_requires_verified_email() {
    let ctx = TestContext::new();
    ctx.state
        .auth
        .register(gm_core::services::RegisterRequest {
            name: "Bo".to_string(),
            email: "bo@example.com".to_string(),
            password: PASSWORD.to_string(),
            role: UserRole::Student,
        })
        .await
        .unwrap();
    let app = test::init_service(create_app(ctx.state.clone(), &ctx.config)).await;

    let req = test::TestRequest::post()
        .uri("/api/v1/auth/login")
        .set_json(login_body("bo@example.com"))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["status"], "email_verification_required");
    assert!(body.get("access_token").is_none());
    // Registration mail plus the resend on login
    assert_eq!(ctx.mailer.count_to("bo@example.com"), 2);
}

#[actix_web::test]
async fn test_login_wrong_password() {
    let ctx = TestContext::new();
    ctx.verified_user("cy@example.com", UserRole::Student).await;
    let app = test::init_service(create_app(ctx.state.clone(), &ctx.config)).await;

    let req = test::TestRequest::post()
        .uri("/api/v1/auth/login")
        .set_json(json!({ "email": "cy@example.com", "password": "wrong password 1" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "INVALID_CREDENTIALS");
}

#[actix_web::test]
async fn test_login_logout_revokes_access_token() {
    let ctx = TestContext::new();
    ctx.verified_user("di@example.com", UserRole::Student).await;
    let app = test::init_service(create_app(ctx.state.clone(), &ctx.config)).await;

    let req = test::TestRequest::post()
        .uri("/api/v1/auth/login")
        .set_json(login_body("di@example.com"))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["status"], "authenticated");
    assert_eq!(body["token_type"], "Bearer");
    assert_eq!(body["user"]["role"], "STUDENT");
    let access = body["access_token"].as_str().unwrap().to_string();

    let req = test::TestRequest::get()
        .uri("/api/v1/account/me")
        .insert_header(bearer(&access))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let req = test::TestRequest::post()
        .uri("/api/v1/auth/logout")
        .insert_header(bearer(&access))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let req = test::TestRequest::get()
        .uri("/api/v1/account/me")
        .insert_header(bearer(&access))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[actix_web::test]
async fn test_refresh_rotates_tokens() {
    let ctx = TestContext::new();
    ctx.verified_user("ed@example.com", UserRole::Student).await;
    let app = test::init_service(create_app(ctx.state.clone(), &ctx.config)).await;

    let req = test::TestRequest::post()
        .uri("/api/v1/auth/login")
        .set_json(login_body("ed@example.com"))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    let refresh = body["refresh_token"].as_str().unwrap().to_string();

    let req = test::TestRequest::post()
        .uri("/api/v1/auth/refresh")
        .set_json(json!({ "refresh_token": refresh }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let rotated: Value = test::read_body_json(resp).await;
    assert_ne!(rotated["refresh_token"], body["refresh_token"]);

    // The old refresh token was consumed by the rotation
    let req = test::TestRequest::post()
        .uri("/api/v1/auth/refresh")
        .set_json(json!({ "refresh_token": refresh }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[actix_web::test]
async fn test_password_reset_flow() {
    let ctx = TestContext::new();
    ctx.verified_user("fi@example.com", UserRole::Student).await;
    let app = test::init_service(create_app(ctx.state.clone(), &ctx.config)).await;

    // Unknown addresses get the same answer and no mail
    let req = test::TestRequest::post()
        .uri("/api/v1/auth/reset")
        .set_json(json!({ "email": "nobody@example.com" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(ctx.mailer.count_to("nobody@example.com"), 0);

    let req = test::TestRequest::post()
        .uri("/api/v1/auth/reset")
        .set_json(json!({ "email": "fi@example.com" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let token = ctx.last_link_token("fi@example.com");
    let req = test::TestRequest::post()
        .uri("/api/v1/auth/new-password")
        .set_json(json!({ "token": token, "password": "brand new pass 7" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let req = test::TestRequest::post()
        .uri("/api/v1/auth/login")
        .set_json(login_body("fi@example.com"))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

    let req = test::TestRequest::post()
        .uri("/api/v1/auth/login")
        .set_json(json!({ "email": "fi@example.com", "password": "brand new pass 7" }))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["status"], "authenticated");
}

//! Shared fixtures for the API integration tests
//!
//! Users are set up through the services directly; the behaviour under test
//! is then exercised over HTTP.

#![allow(dead_code)]

use std::sync::Arc;

use actix_web::web;
use gm_api::AppState;
use gm_core::domain::entities::user::{User, UserRole};
use gm_core::domain::value_objects::UserProfile;
use gm_core::repositories::UserRepository;
use gm_core::services::{PasswordHasher, RegisterRequest};
use gm_infra::mail::MockMailService;
use gm_infra::Backend;
use gm_shared::AppConfig;

pub const PASSWORD: &str = "correct horse 42";

pub struct TestContext {
    pub config: AppConfig,
    pub state: web::Data<AppState>,
    pub mailer: Arc<MockMailService>,
}

impl TestContext {
    pub fn new() -> Self {
        let mut config = AppConfig::development();
        // bcrypt's minimum cost keeps the suite fast
        config.auth.password_hash_cost = 4;
        config.auth.two_factor.resend_cooldown_seconds = 0;
        Self::with_config(config)
    }

    pub fn with_config(config: AppConfig) -> Self {
        let mailer = Arc::new(MockMailService::new());
        let backend = Backend::in_memory(&config);
        let state = web::Data::new(AppState::build(&config, backend, mailer.clone()));
        Self {
            config,
            state,
            mailer,
        }
    }

    /// Register through the auth service and confirm the emailed link
    pub async fn verified_user(&self, email: &str, role: UserRole) -> UserProfile {
        self.state
            .auth
            .register(RegisterRequest {
                name: "Test User".to_string(),
                email: email.to_string(),
                password: PASSWORD.to_string(),
                role,
            })
            .await
            .unwrap();

        let token = self.last_link_token(email);
        self.state.auth.verify_email(&token).await.unwrap()
    }

    /// Admins cannot self-register, so they are inserted directly
    pub async fn admin(&self, email: &str) -> User {
        let hash = PasswordHasher::new(4).hash(PASSWORD).await.unwrap();
        let mut user = User::new("Admin", email, Some(hash), UserRole::Admin);
        user.mark_email_verified();
        self.state.backend.repositories.users.create(user).await.unwrap()
    }

    /// Token from the most recent link mailed to `email`
    pub fn last_link_token(&self, email: &str) -> String {
        let message = self.mailer.last_to(email).expect("no mail sent");
        message
            .text
            .split("token=")
            .nth(1)
            .expect("mail has no token link")
            .trim()
            .to_string()
    }

    /// Code from the most recent two-factor mail
    pub fn last_code(&self, email: &str) -> String {
        let message = self.mailer.last_to(email).expect("no mail sent");
        message
            .text
            .split_whitespace()
            .last()
            .expect("empty mail")
            .to_string()
    }
}

pub fn bearer(token: &str) -> (actix_web::http::header::HeaderName, String) {
    (
        actix_web::http::header::AUTHORIZATION,
        format!("Bearer {}", token),
    )
}

pub fn login_body(email: &str) -> serde_json::Value {
    serde_json::json!({ "email": email, "password": PASSWORD })
}

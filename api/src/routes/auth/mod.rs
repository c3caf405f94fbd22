//! Authentication route handlers
//!
//! This module contains the public authentication endpoints:
//! - Registration and login (with the two-factor and trusted-device steps)
//! - Token refresh and logout
//! - Email verification and password reset links

pub mod login;
pub mod logout;
pub mod refresh;
pub mod register;
pub mod verification;

use actix_web::web;

use crate::middleware::auth::JwtAuth;

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/auth")
            .route("/register", web::post().to(register::register))
            .route("/login", web::post().to(login::login))
            .route("/refresh", web::post().to(refresh::refresh_token))
            .route("/logout", web::post().to(logout::logout).wrap(JwtAuth::new()))
            .route("/new-verification", web::post().to(verification::verify_email))
            .route("/reset", web::post().to(verification::request_password_reset))
            .route("/new-password", web::post().to(verification::reset_password)),
    );
}

//! HTTP routes, all mounted under `/api/v1`

pub mod account;
pub mod admin;
pub mod auth;
pub mod health;
pub mod instructors;

use actix_web::web;

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1")
            .route("/health", web::get().to(health::health_check))
            .configure(auth::configure)
            .configure(account::configure)
            .configure(instructors::configure)
            .configure(admin::configure),
    );
}

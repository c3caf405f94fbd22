//! Account security endpoints for the signed-in user
//!
//! Profile, password and email changes, two-factor settings and trusted
//! device management. Every route requires a valid access token.

pub mod devices;
pub mod profile;
pub mod two_factor;

use actix_web::web;

use crate::middleware::auth::JwtAuth;

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/account")
            .wrap(JwtAuth::new())
            .route("/me", web::get().to(profile::current_user))
            .route("/password", web::post().to(profile::change_password))
            .route("/password/set-link", web::post().to(profile::request_password_set))
            .route("/email", web::post().to(profile::request_email_change))
            .service(
                web::scope("/two-factor")
                    .route("/enable", web::post().to(two_factor::enable))
                    .route("/disable", web::post().to(two_factor::disable))
                    .route(
                        "/backup-codes",
                        web::post().to(two_factor::regenerate_backup_codes),
                    )
                    .route(
                        "/backup-codes",
                        web::get().to(two_factor::remaining_backup_codes),
                    ),
            )
            .route("/devices", web::get().to(devices::list_devices))
            .route("/devices", web::delete().to(devices::revoke_all_devices))
            .route("/devices/{id}", web::delete().to(devices::revoke_device)),
    );
}

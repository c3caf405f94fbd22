//! Application state shared by all handlers
//!
//! Services are built once from the loaded configuration and the storage
//! backend, then handed to every worker through `web::Data`.

use std::sync::Arc;

use actix_web::cookie::SameSite;
use gm_core::services::auth::{AuthDependencies, AuthService, AuthServiceConfig, PasswordHasher};
use gm_core::services::mail::{MailComposer, MailServiceTrait};
use gm_core::services::token::{TokenCleanupConfig, TokenCleanupService, TokenService, TokenServiceConfig};
use gm_core::services::{
    AdminUserService, InstructorVerificationService, TrustedDeviceService, TwoFactorService,
    VerificationServiceConfig, VerificationTokenService,
};
use gm_infra::Backend;
use gm_shared::AppConfig;

/// Settings of the trusted-device cookie
#[derive(Debug, Clone)]
pub struct DeviceCookieSettings {
    pub name: String,
    pub secure: bool,
    pub http_only: bool,
    pub same_site: SameSite,
    pub max_age_seconds: i64,
}

impl DeviceCookieSettings {
    pub fn from_config(config: &AppConfig) -> Self {
        let session = &config.auth.session;
        Self {
            name: session.trusted_device_cookie.clone(),
            secure: session.secure,
            http_only: session.http_only,
            same_site: parse_same_site(&session.same_site),
            max_age_seconds: config.auth.trusted_device_max_age_seconds(),
        }
    }
}

fn parse_same_site(value: &str) -> SameSite {
    match value.to_ascii_lowercase().as_str() {
        "strict" => SameSite::Strict,
        "none" => SameSite::None,
        _ => SameSite::Lax,
    }
}

/// Services and settings available to request handlers
pub struct AppState {
    pub auth: Arc<AuthService>,
    pub tokens: Arc<TokenService>,
    pub two_factor: Arc<TwoFactorService>,
    pub devices: Arc<TrustedDeviceService>,
    pub instructors: Arc<InstructorVerificationService>,
    pub admin: Arc<AdminUserService>,
    pub cleanup: Arc<TokenCleanupService>,
    pub backend: Backend,
    pub device_cookie: DeviceCookieSettings,
}

impl AppState {
    /// Wire every service over the given backend and mail provider
    pub fn build(config: &AppConfig, backend: Backend, mailer: Arc<dyn MailServiceTrait>) -> Self {
        let repositories = backend.repositories.clone();
        let hasher = PasswordHasher::new(config.auth.password_hash_cost);

        let tokens = Arc::new(TokenService::new(
            repositories.tokens.clone(),
            TokenServiceConfig::from(&config.auth.jwt),
        ));
        let verification = Arc::new(VerificationTokenService::new(
            repositories.verification_tokens.clone(),
            VerificationServiceConfig::from(&config.auth),
        ));
        let devices = Arc::new(TrustedDeviceService::new(
            repositories.trusted_devices.clone(),
            config.auth.two_factor.trusted_device_days,
        ));
        let two_factor = Arc::new(TwoFactorService::new(
            repositories.users.clone(),
            repositories.backup_codes.clone(),
            devices.clone(),
            hasher,
            config.auth.two_factor.backup_code_count,
        ));

        let auth = Arc::new(AuthService::new(
            AuthDependencies {
                users: repositories.users.clone(),
                tokens: tokens.clone(),
                verification,
                two_factor: two_factor.clone(),
                devices: devices.clone(),
                mailer,
                composer: MailComposer::new(config.mail.app_url.clone()),
                rate_limiter: backend.rate_limiter.clone(),
                hasher,
            },
            AuthServiceConfig::from(&config.auth),
        ));

        let instructors = Arc::new(InstructorVerificationService::new(
            repositories.users.clone(),
            repositories.instructors.clone(),
        ));
        let admin = Arc::new(AdminUserService::new(
            repositories.users.clone(),
            tokens.clone(),
            devices.clone(),
        ));
        let cleanup = Arc::new(TokenCleanupService::new(
            repositories.tokens.clone(),
            repositories.verification_tokens.clone(),
            repositories.trusted_devices.clone(),
            TokenCleanupConfig {
                interval_seconds: config.server.cleanup_interval_secs,
                enabled: config.server.cleanup_interval_secs > 0,
            },
        ));

        Self {
            auth,
            tokens,
            two_factor,
            devices,
            instructors,
            admin,
            cleanup,
            backend,
            device_cookie: DeviceCookieSettings::from_config(config),
        }
    }
}

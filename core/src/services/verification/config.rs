//! Configuration for the verification service

use chrono::Duration;
use gm_shared::config::AuthConfig;

use crate::domain::entities::verification_token::{TokenPurpose, MAX_ATTEMPTS};

/// Lifetimes and limits for mailed tokens and two-factor codes
#[derive(Debug, Clone)]
pub struct VerificationServiceConfig {
    /// Minutes an email verification link stays valid
    pub email_verification_minutes: i64,
    /// Minutes a password reset link stays valid
    pub password_reset_minutes: i64,
    /// Minutes a password set link stays valid
    pub password_set_minutes: i64,
    /// Minutes a two-factor code stays valid
    pub code_expiration_minutes: i64,
    /// Wrong code attempts before the code is discarded
    pub max_attempts: u32,
    /// Minimum seconds between code resend requests
    pub resend_cooldown_seconds: i64,
}

impl Default for VerificationServiceConfig {
    fn default() -> Self {
        Self {
            email_verification_minutes: 60,
            password_reset_minutes: 60,
            password_set_minutes: 24 * 60,
            code_expiration_minutes: 5,
            max_attempts: MAX_ATTEMPTS,
            resend_cooldown_seconds: 60,
        }
    }
}

impl VerificationServiceConfig {
    /// Lifetime of a token issued for `purpose`
    pub fn lifetime(&self, purpose: TokenPurpose) -> Duration {
        let minutes = match purpose {
            TokenPurpose::EmailVerification => self.email_verification_minutes,
            TokenPurpose::PasswordReset => self.password_reset_minutes,
            TokenPurpose::PasswordSet => self.password_set_minutes,
            TokenPurpose::TwoFactor => self.code_expiration_minutes,
        };
        Duration::minutes(minutes)
    }
}

impl From<&AuthConfig> for VerificationServiceConfig {
    fn from(config: &AuthConfig) -> Self {
        Self {
            email_verification_minutes: config.tokens.email_verification_minutes,
            password_reset_minutes: config.tokens.password_reset_minutes,
            password_set_minutes: config.tokens.password_set_minutes,
            code_expiration_minutes: config.two_factor.code_expiry_minutes,
            max_attempts: config.two_factor.max_attempts,
            resend_cooldown_seconds: config.two_factor.resend_cooldown_seconds,
        }
    }
}

//! Authentication and session security configuration

use serde::{Deserialize, Serialize};

const DEFAULT_JWT_SECRET: &str = "development-secret-please-change-in-production";

/// JWT session token configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct JwtConfig {
    /// JWT secret key for signing tokens (HS256)
    pub secret: String,

    /// Access token expiry time in seconds
    pub access_token_expiry: i64,

    /// Refresh token expiry time in seconds
    pub refresh_token_expiry: i64,

    /// JWT issuer claim
    pub issuer: String,

    /// JWT audience claim
    pub audience: String,
}

impl Default for JwtConfig {
    fn default() -> Self {
        Self {
            secret: String::from(DEFAULT_JWT_SECRET),
            access_token_expiry: 900,     // 15 minutes
            refresh_token_expiry: 604800, // 7 days
            issuer: String::from("gurmania"),
            audience: String::from("gurmania-api"),
        }
    }
}

impl JwtConfig {
    /// Create a new JWT configuration with secret
    pub fn new(secret: impl Into<String>) -> Self {
        Self {
            secret: secret.into(),
            ..Default::default()
        }
    }

    /// Set access token expiry in minutes
    pub fn with_access_expiry_minutes(mut self, minutes: i64) -> Self {
        self.access_token_expiry = minutes * 60;
        self
    }

    /// Set refresh token expiry in days
    pub fn with_refresh_expiry_days(mut self, days: i64) -> Self {
        self.refresh_token_expiry = days * 86400;
        self
    }

    /// Check if using default secret (security warning)
    pub fn is_using_default_secret(&self) -> bool {
        self.secret == DEFAULT_JWT_SECRET
    }
}

/// Cookie settings for the trusted-device cookie
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SessionConfig {
    /// Trusted-device cookie name
    pub trusted_device_cookie: String,

    /// Cookie secure flag (HTTPS only)
    pub secure: bool,

    /// Cookie SameSite attribute (Strict, Lax, None)
    pub same_site: String,

    /// Cookie HttpOnly flag
    #[serde(default = "default_http_only")]
    pub http_only: bool,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            trusted_device_cookie: String::from("gm_trusted_device"),
            secure: false,
            same_site: String::from("Lax"),
            http_only: default_http_only(),
        }
    }
}

/// Two-factor authentication settings
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct TwoFactorConfig {
    /// Lifetime of a mailed two-factor code in minutes
    pub code_expiry_minutes: i64,

    /// Wrong attempts allowed before a code is discarded
    pub max_attempts: u32,

    /// Minimum seconds between two code mails to the same address
    pub resend_cooldown_seconds: i64,

    /// How long a trusted device skips the second factor
    pub trusted_device_days: i64,

    /// Number of backup codes in a generated set
    pub backup_code_count: usize,
}

impl Default for TwoFactorConfig {
    fn default() -> Self {
        Self {
            code_expiry_minutes: 5,
            max_attempts: 5,
            resend_cooldown_seconds: 60,
            trusted_device_days: 30,
            backup_code_count: 10,
        }
    }
}

/// Lifetimes of mailed link tokens, in minutes
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct VerificationTokenConfig {
    pub email_verification_minutes: i64,
    pub password_reset_minutes: i64,
    pub password_set_minutes: i64,
}

impl Default for VerificationTokenConfig {
    fn default() -> Self {
        Self {
            email_verification_minutes: 60,
            password_reset_minutes: 60,
            password_set_minutes: 24 * 60,
        }
    }
}

/// Complete authentication configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AuthConfig {
    /// JWT configuration
    pub jwt: JwtConfig,

    /// Trusted-device cookie configuration
    #[serde(default)]
    pub session: SessionConfig,

    /// Two-factor configuration
    #[serde(default)]
    pub two_factor: TwoFactorConfig,

    /// Mailed token lifetimes
    #[serde(default)]
    pub tokens: VerificationTokenConfig,

    /// bcrypt cost factor for password hashes
    #[serde(default = "default_password_hash_cost")]
    pub password_hash_cost: u32,

    /// Whether new accounts can be registered
    #[serde(default = "default_allow_registration")]
    pub allow_registration: bool,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            jwt: JwtConfig::default(),
            session: SessionConfig::default(),
            two_factor: TwoFactorConfig::default(),
            tokens: VerificationTokenConfig::default(),
            password_hash_cost: default_password_hash_cost(),
            allow_registration: default_allow_registration(),
        }
    }
}

impl AuthConfig {
    /// Trusted-device lifetime in seconds (cookie Max-Age)
    pub fn trusted_device_max_age_seconds(&self) -> i64 {
        self.two_factor.trusted_device_days * 86400
    }
}

fn default_http_only() -> bool {
    true
}

fn default_password_hash_cost() -> u32 {
    12
}

fn default_allow_registration() -> bool {
    true
}

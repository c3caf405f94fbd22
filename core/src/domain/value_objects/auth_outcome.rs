//! Results of the login flow and the public projection of a user.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::entities::token::TokenPair;
use crate::domain::entities::user::{User, UserRole};

/// Public view of a user; never carries the password hash
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub role: UserRole,
    pub email_verified: bool,
    pub is_two_factor_enabled: bool,
    pub has_password: bool,
    pub created_at: DateTime<Utc>,
    pub last_login_at: Option<DateTime<Utc>>,
}

impl From<&User> for UserProfile {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            name: user.name.clone(),
            email: user.email.clone(),
            role: user.role,
            email_verified: user.is_email_verified(),
            is_two_factor_enabled: user.is_two_factor_enabled,
            has_password: user.has_password(),
            created_at: user.created_at,
            last_login_at: user.last_login_at,
        }
    }
}

/// A device that was just marked as trusted; the cookie value is only
/// available at this point
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IssuedDevice {
    pub device_id: Uuid,
    pub cookie_value: String,
    pub expires_at: DateTime<Utc>,
}

/// A fully authenticated session
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthSession {
    /// Access and refresh tokens
    pub tokens: TokenPair,

    /// Logged-in user
    pub user: UserProfile,

    /// Present when this login trusted the current device
    pub trusted_device: Option<IssuedDevice>,

    /// Whether a backup code was redeemed for this login
    pub used_backup_code: bool,
}

/// Outcome of a login attempt that did not fail outright
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoginOutcome {
    /// Credentials and, where needed, the second factor were accepted
    Authenticated(Box<AuthSession>),

    /// A two-factor code was mailed; the client must retry with it
    TwoFactorRequired {
        /// Masked destination address
        email_hint: String,
    },

    /// The email address is unconfirmed; a fresh verification mail was sent
    EmailVerificationRequired,
}

impl LoginOutcome {
    /// Whether the caller now holds a session
    pub fn is_authenticated(&self) -> bool {
        matches!(self, LoginOutcome::Authenticated(_))
    }
}

use gm_core::domain::entities::token::TokenPair;
use gm_core::domain::entities::user::UserRole;
use gm_core::domain::value_objects::{AuthSession, LoginOutcome, UserProfile};
use serde::{Deserialize, Serialize};
use validator::Validate;

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct RegisterRequest {
    #[validate(length(min = 1, max = 100))]
    pub name: String,

    #[validate(email, length(max = 254))]
    pub email: String,

    /// Policy (length, letters and digits) is checked by the service
    #[validate(length(min = 1, max = 128))]
    pub password: String,

    /// STUDENT or INSTRUCTOR; defaults to STUDENT
    #[serde(default)]
    pub role: Option<UserRole>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(email, length(max = 254))]
    pub email: String,

    #[validate(length(min = 1, max = 128))]
    pub password: String,

    /// Code mailed after the first login step
    #[validate(length(equal = 6))]
    pub code: Option<String>,

    /// Backup code, accepted instead of the mailed code
    #[validate(length(min = 1, max = 32))]
    pub backup_code: Option<String>,

    /// Remember this browser after the second factor succeeds
    #[serde(default)]
    pub trust_device: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct RefreshTokenRequest {
    #[validate(length(min = 1))]
    pub refresh_token: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LogoutRequest {
    /// Ends only this session; without it every session of the user ends
    pub refresh_token: Option<String>,
}

/// Body of the mailed-link endpoints
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct TokenRequest {
    #[validate(length(min = 1, max = 256))]
    pub token: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct PasswordResetRequest {
    #[validate(email, length(max = 254))]
    pub email: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct NewPasswordRequest {
    #[validate(length(min = 1, max = 256))]
    pub token: String,

    #[validate(length(min = 1, max = 128))]
    pub password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub refresh_token: String,
    pub token_type: String,
    pub expires_in: i64,
    pub refresh_expires_in: i64,
}

impl From<TokenPair> for TokenResponse {
    fn from(pair: TokenPair) -> Self {
        Self {
            access_token: pair.access_token,
            refresh_token: pair.refresh_token,
            token_type: "Bearer".to_string(),
            expires_in: pair.access_expires_in,
            refresh_expires_in: pair.refresh_expires_in,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionResponse {
    #[serde(flatten)]
    pub tokens: TokenResponse,
    pub user: UserProfile,
    pub used_backup_code: bool,
}

impl From<AuthSession> for SessionResponse {
    fn from(session: AuthSession) -> Self {
        Self {
            tokens: session.tokens.into(),
            user: session.user,
            used_backup_code: session.used_backup_code,
        }
    }
}

/// Login result, discriminated by `status`
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum LoginResponse {
    Authenticated(SessionResponse),
    TwoFactorRequired { email_hint: String },
    EmailVerificationRequired { message: String },
}

impl LoginResponse {
    /// Response body for an outcome; the device cookie is handled separately
    pub fn from_outcome(outcome: LoginOutcome) -> Self {
        match outcome {
            LoginOutcome::Authenticated(session) => {
                LoginResponse::Authenticated(SessionResponse::from(*session))
            }
            LoginOutcome::TwoFactorRequired { email_hint } => {
                LoginResponse::TwoFactorRequired { email_hint }
            }
            LoginOutcome::EmailVerificationRequired => LoginResponse::EmailVerificationRequired {
                message: "Confirmation email sent".to_string(),
            },
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

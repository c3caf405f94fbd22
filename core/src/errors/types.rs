//! Error types for authentication, token management and validation.
//!
//! Messages are safe to show to end users; the HTTP layer maps each variant
//! to a status code and a stable error code.

use thiserror::Error;

/// Authentication-related errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AuthError {
    #[error("Invalid email or password")]
    InvalidCredentials,

    #[error("Email address is not verified")]
    EmailNotVerified,

    #[error("Invalid two-factor code")]
    InvalidTwoFactorCode,

    #[error("Two-factor code expired")]
    TwoFactorCodeExpired,

    #[error("Maximum attempts exceeded. Please request a new code")]
    MaxAttemptsExceeded,

    #[error("Invalid backup code")]
    InvalidBackupCode,

    #[error("Please wait {seconds} seconds before requesting another email")]
    ResendCooldown { seconds: i64 },

    #[error("Too many requests. Please try again in {minutes} minutes")]
    RateLimitExceeded { minutes: u32 },

    #[error("Mail service failure. Please try again later")]
    MailServiceFailure,

    #[error("User not found")]
    UserNotFound,

    #[error("User already exists")]
    UserAlreadyExists,

    #[error("Insufficient permissions")]
    InsufficientPermissions,

    #[error("Registration is currently disabled")]
    RegistrationDisabled,

    #[error("User account is blocked")]
    UserBlocked,
}

/// Token-related errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TokenError {
    #[error("Token expired")]
    TokenExpired,

    #[error("Invalid token")]
    InvalidToken,

    #[error("Invalid token format")]
    InvalidTokenFormat,

    #[error("Token not yet valid")]
    TokenNotYetValid,

    #[error("Token revoked")]
    TokenRevoked,

    #[error("Refresh token expired")]
    RefreshTokenExpired,

    #[error("Invalid refresh token")]
    InvalidRefreshToken,

    #[error("Token generation failed")]
    TokenGenerationFailed,
}

/// Input validation errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Field required: {field}")]
    RequiredField { field: String },

    #[error("Invalid format for field: {field}")]
    InvalidFormat { field: String },

    #[error("Invalid email format")]
    InvalidEmail,

    #[error("{message}")]
    WeakPassword { message: String },

    #[error("Invalid length for field: {field} (min: {min}, max: {max})")]
    InvalidLength { field: String, min: usize, max: usize },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_auth_error_messages() {
        assert_eq!(
            AuthError::RateLimitExceeded { minutes: 5 }.to_string(),
            "Too many requests. Please try again in 5 minutes"
        );
        assert!(AuthError::ResendCooldown { seconds: 42 }
            .to_string()
            .contains("42 seconds"));
    }

    #[test]
    fn test_validation_error_messages() {
        let error = ValidationError::RequiredField {
            field: "reason".to_string(),
        };
        assert!(error.to_string().contains("reason"));

        let error = ValidationError::WeakPassword {
            message: "Password must contain at least one digit".to_string(),
        };
        assert_eq!(error.to_string(), "Password must contain at least one digit");
    }
}

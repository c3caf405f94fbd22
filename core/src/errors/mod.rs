//! Domain-specific error types and error handling.

mod types;

pub use types::{AuthError, TokenError, ValidationError};

use thiserror::Error;

/// Core domain errors (general purpose)
#[derive(Error, Debug)]
pub enum DomainError {
    #[error("Validation error: {message}")]
    Validation { message: String },

    #[error("Business rule violation: {message}")]
    BusinessRule { message: String },

    #[error("Resource not found: {resource}")]
    NotFound { resource: String },

    #[error("Unauthorized access")]
    Unauthorized,

    #[error("Internal error: {message}")]
    Internal { message: String },

    // Bridge to specific error types
    #[error(transparent)]
    Auth(#[from] AuthError),

    #[error(transparent)]
    Token(#[from] TokenError),

    #[error(transparent)]
    ValidationErr(#[from] ValidationError),
}

impl DomainError {
    /// Shorthand for an internal error wrapping a lower-level failure
    pub fn internal(context: &str, error: impl std::fmt::Display) -> Self {
        DomainError::Internal {
            message: format!("{}: {}", context, error),
        }
    }

    /// Shorthand for a missing resource
    pub fn not_found(resource: impl Into<String>) -> Self {
        DomainError::NotFound {
            resource: resource.into(),
        }
    }
}

pub type DomainResult<T> = Result<T, DomainError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bridged_errors_are_transparent() {
        let error: DomainError = AuthError::InvalidCredentials.into();
        assert_eq!(error.to_string(), "Invalid email or password");

        let error: DomainError = TokenError::TokenRevoked.into();
        assert!(matches!(error, DomainError::Token(TokenError::TokenRevoked)));
    }

    #[test]
    fn test_helpers() {
        let error = DomainError::internal("Failed to save user", "connection reset");
        assert_eq!(
            error.to_string(),
            "Internal error: Failed to save user: connection reset"
        );
        assert!(matches!(
            DomainError::not_found("Trusted device"),
            DomainError::NotFound { resource } if resource == "Trusted device"
        ));
    }
}

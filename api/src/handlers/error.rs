//! Conversion of domain failures into HTTP responses
//!
//! Every handler returns [`ApiResult`]; the mapping from error to status
//! code and stable error code lives only here.

use std::collections::HashMap;

use actix_web::{http::StatusCode, HttpResponse, ResponseError};
use gm_core::errors::{AuthError, DomainError, TokenError, ValidationError};
use gm_shared::{error_codes, ErrorResponse};
use thiserror::Error;

pub type ApiResult<T> = Result<T, ApiError>;

/// Error returned by request handlers and middleware
#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    Domain(#[from] DomainError),

    #[error("Invalid request data")]
    InvalidRequest(#[from] validator::ValidationErrors),

    #[error("{0}")]
    BadRequest(String),

    #[error("{0}")]
    Forbidden(String),
}

impl ApiError {
    pub fn unauthorized() -> Self {
        ApiError::Domain(DomainError::Unauthorized)
    }
}

impl From<AuthError> for ApiError {
    fn from(error: AuthError) -> Self {
        ApiError::Domain(error.into())
    }
}

impl From<TokenError> for ApiError {
    fn from(error: TokenError) -> Self {
        ApiError::Domain(error.into())
    }
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Domain(error) => map_domain_error(error).0,
            ApiError::InvalidRequest(_) | ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Forbidden(_) => StatusCode::FORBIDDEN,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let (status, body) = match self {
            ApiError::Domain(error) => {
                let (status, code) = map_domain_error(error);
                if status.is_server_error() {
                    tracing::error!(error = %error, "Request failed");
                } else {
                    tracing::debug!(error = %error, code, "Request rejected");
                }
                (status, with_retry_hint(ErrorResponse::new(code, public_message(error)), error))
            }
            ApiError::InvalidRequest(errors) => (
                StatusCode::BAD_REQUEST,
                ErrorResponse::with_details(
                    error_codes::VALIDATION_ERROR,
                    "Invalid request data",
                    field_details(errors),
                ),
            ),
            ApiError::BadRequest(message) => (
                StatusCode::BAD_REQUEST,
                ErrorResponse::new(error_codes::BAD_REQUEST, message.clone()),
            ),
            ApiError::Forbidden(message) => (
                StatusCode::FORBIDDEN,
                ErrorResponse::new(error_codes::FORBIDDEN, message.clone()),
            ),
        };
        HttpResponse::build(status).json(body)
    }
}

/// Status code and stable error code for a domain error
pub fn map_domain_error(error: &DomainError) -> (StatusCode, &'static str) {
    match error {
        DomainError::Auth(auth_error) => match auth_error {
            AuthError::InvalidCredentials => {
                (StatusCode::UNAUTHORIZED, error_codes::INVALID_CREDENTIALS)
            }
            AuthError::EmailNotVerified => (StatusCode::FORBIDDEN, error_codes::EMAIL_NOT_VERIFIED),
            AuthError::InvalidTwoFactorCode => {
                (StatusCode::UNAUTHORIZED, error_codes::TWO_FACTOR_CODE_INVALID)
            }
            AuthError::TwoFactorCodeExpired => {
                (StatusCode::UNAUTHORIZED, error_codes::TWO_FACTOR_CODE_EXPIRED)
            }
            AuthError::InvalidBackupCode => {
                (StatusCode::UNAUTHORIZED, error_codes::BACKUP_CODE_INVALID)
            }
            AuthError::MaxAttemptsExceeded => {
                (StatusCode::TOO_MANY_REQUESTS, error_codes::MAX_ATTEMPTS_EXCEEDED)
            }
            AuthError::ResendCooldown { .. } => {
                (StatusCode::TOO_MANY_REQUESTS, error_codes::RESEND_COOLDOWN)
            }
            AuthError::RateLimitExceeded { .. } => {
                (StatusCode::TOO_MANY_REQUESTS, error_codes::RATE_LIMIT_EXCEEDED)
            }
            AuthError::MailServiceFailure => {
                (StatusCode::SERVICE_UNAVAILABLE, error_codes::MAIL_ERROR)
            }
            AuthError::UserNotFound => (StatusCode::NOT_FOUND, error_codes::NOT_FOUND),
            AuthError::UserAlreadyExists => (StatusCode::CONFLICT, error_codes::CONFLICT),
            AuthError::InsufficientPermissions => (StatusCode::FORBIDDEN, error_codes::FORBIDDEN),
            AuthError::RegistrationDisabled => (StatusCode::FORBIDDEN, error_codes::FORBIDDEN),
            AuthError::UserBlocked => (StatusCode::FORBIDDEN, error_codes::ACCOUNT_BLOCKED),
        },
        DomainError::Token(token_error) => match token_error {
            TokenError::TokenExpired | TokenError::RefreshTokenExpired => {
                (StatusCode::UNAUTHORIZED, error_codes::TOKEN_EXPIRED)
            }
            TokenError::TokenGenerationFailed => {
                (StatusCode::INTERNAL_SERVER_ERROR, error_codes::INTERNAL_ERROR)
            }
            _ => (StatusCode::UNAUTHORIZED, error_codes::TOKEN_INVALID),
        },
        DomainError::ValidationErr(_) | DomainError::Validation { .. } => {
            (StatusCode::BAD_REQUEST, error_codes::VALIDATION_ERROR)
        }
        DomainError::BusinessRule { .. } => (StatusCode::CONFLICT, error_codes::CONFLICT),
        DomainError::NotFound { .. } => (StatusCode::NOT_FOUND, error_codes::NOT_FOUND),
        DomainError::Unauthorized => (StatusCode::UNAUTHORIZED, error_codes::UNAUTHORIZED),
        DomainError::Internal { .. } => {
            (StatusCode::INTERNAL_SERVER_ERROR, error_codes::INTERNAL_ERROR)
        }
    }
}

/// Message safe to return to clients; internal details stay in the logs
fn public_message(error: &DomainError) -> String {
    match error {
        DomainError::Internal { .. } | DomainError::Token(TokenError::TokenGenerationFailed) => {
            "An internal error occurred".to_string()
        }
        DomainError::Unauthorized => "Authentication required".to_string(),
        DomainError::BusinessRule { message } | DomainError::Validation { message } => {
            message.clone()
        }
        DomainError::ValidationErr(ValidationError::WeakPassword { message }) => message.clone(),
        other => other.to_string(),
    }
}

fn with_retry_hint(response: ErrorResponse, error: &DomainError) -> ErrorResponse {
    match error {
        DomainError::Auth(AuthError::ResendCooldown { seconds }) => {
            response.add_detail("retry_after_seconds", seconds)
        }
        DomainError::Auth(AuthError::RateLimitExceeded { minutes }) => {
            response.add_detail("retry_after_seconds", u64::from(*minutes) * 60)
        }
        DomainError::ValidationErr(
            ValidationError::RequiredField { field }
            | ValidationError::InvalidFormat { field }
            | ValidationError::InvalidLength { field, .. },
        ) => response.add_detail("field", field),
        _ => response,
    }
}

fn field_details(errors: &validator::ValidationErrors) -> HashMap<String, serde_json::Value> {
    errors
        .field_errors()
        .into_iter()
        .map(|(field, errors)| {
            let messages: Vec<String> = errors
                .iter()
                .map(|e| {
                    e.message
                        .as_ref()
                        .map(|m| m.to_string())
                        .unwrap_or_else(|| e.code.to_string())
                })
                .collect();
            (field.to_string(), serde_json::json!(messages))
        })
        .collect()
}

/// Response for routes that do not exist
pub async fn not_found() -> HttpResponse {
    HttpResponse::NotFound().json(ErrorResponse::new(
        error_codes::NOT_FOUND,
        "The requested resource was not found",
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::body::to_bytes;

    async fn body_of(error: ApiError) -> (StatusCode, serde_json::Value) {
        let response = error.error_response();
        let status = response.status();
        let bytes = to_bytes(response.into_body()).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[test]
    fn test_status_codes() {
        let cases: Vec<(DomainError, StatusCode)> = vec![
            (AuthError::InvalidCredentials.into(), StatusCode::UNAUTHORIZED),
            (AuthError::UserBlocked.into(), StatusCode::FORBIDDEN),
            (AuthError::InsufficientPermissions.into(), StatusCode::FORBIDDEN),
            (AuthError::UserAlreadyExists.into(), StatusCode::CONFLICT),
            (AuthError::MaxAttemptsExceeded.into(), StatusCode::TOO_MANY_REQUESTS),
            (AuthError::RateLimitExceeded { minutes: 5 }.into(), StatusCode::TOO_MANY_REQUESTS),
            (AuthError::MailServiceFailure.into(), StatusCode::SERVICE_UNAVAILABLE),
            (TokenError::TokenRevoked.into(), StatusCode::UNAUTHORIZED),
            (DomainError::not_found("Trusted device"), StatusCode::NOT_FOUND),
            (DomainError::internal("db", "down"), StatusCode::INTERNAL_SERVER_ERROR),
            (
                ValidationError::InvalidEmail.into(),
                StatusCode::BAD_REQUEST,
            ),
        ];

        for (error, expected) in cases {
            assert_eq!(map_domain_error(&error).0, expected, "{:?}", error);
        }
    }

    #[actix_web::test]
    async fn test_internal_details_are_hidden() {
        let (status, body) =
            body_of(DomainError::internal("Failed to save user", "password=hunter2").into()).await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["error"], "INTERNAL_ERROR");
        assert_eq!(body["message"], "An internal error occurred");
        assert!(body["timestamp"].is_string());
        assert!(body.get("details").is_none());
    }

    #[actix_web::test]
    async fn test_cooldown_carries_retry_hint() {
        let (status, body) = body_of(AuthError::ResendCooldown { seconds: 42 }.into()).await;

        assert_eq!(status, StatusCode::TOO_MANY_REQUESTS);
        assert_eq!(body["error"], "RESEND_COOLDOWN");
        assert_eq!(body["details"]["retry_after_seconds"], 42);
    }
}

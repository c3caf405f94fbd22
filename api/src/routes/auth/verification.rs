//! Mailed-link endpoints: email confirmation and password reset

use actix_web::{web, HttpResponse};
use validator::Validate;

use crate::dto::{MessageResponse, NewPasswordRequest, PasswordResetRequest, TokenRequest};
use crate::handlers::error::ApiResult;
use crate::state::AppState;

/// Handler for POST /api/v1/auth/new-verification
///
/// Consumes an email verification link. Links sent for an email change
/// also replace the account address.
pub async fn verify_email(
    state: web::Data<AppState>,
    request: web::Json<TokenRequest>,
) -> ApiResult<HttpResponse> {
    request.validate()?;

    let profile = state.auth.verify_email(&request.token).await?;
    Ok(HttpResponse::Ok().json(profile))
}

/// Handler for POST /api/v1/auth/reset
///
/// Always answers the same way so the endpoint cannot be used to probe
/// which addresses are registered.
pub async fn request_password_reset(
    state: web::Data<AppState>,
    request: web::Json<PasswordResetRequest>,
) -> ApiResult<HttpResponse> {
    request.validate()?;

    state.auth.request_password_reset(&request.email).await?;
    Ok(HttpResponse::Ok().json(MessageResponse::new(
        "If the account exists, a reset email has been sent",
    )))
}

/// Handler for POST /api/v1/auth/new-password
///
/// Consumes a reset or set-password link. All sessions and trusted devices
/// of the account are revoked.
pub async fn reset_password(
    state: web::Data<AppState>,
    request: web::Json<NewPasswordRequest>,
) -> ApiResult<HttpResponse> {
    request.validate()?;

    state
        .auth
        .reset_password(&request.token, &request.password)
        .await?;
    Ok(HttpResponse::Ok().json(MessageResponse::new("Password updated")))
}

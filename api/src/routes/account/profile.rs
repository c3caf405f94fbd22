use actix_web::{web, HttpResponse};
use validator::Validate;

use crate::dto::{ChangePasswordRequest, EmailChangeRequest, MessageResponse};
use crate::handlers::error::ApiResult;
use crate::middleware::auth::AuthContext;
use crate::state::AppState;

/// Handler for GET /api/v1/account/me
pub async fn current_user(
    state: web::Data<AppState>,
    auth: AuthContext,
) -> ApiResult<HttpResponse> {
    let profile = state.auth.current_user(auth.user_id).await?;
    Ok(HttpResponse::Ok().json(profile))
}

/// Handler for POST /api/v1/account/password
///
/// ## Errors
/// - 401 Unauthorized: Current password is wrong
/// - 409 Conflict: The account has no password yet
pub async fn change_password(
    state: web::Data<AppState>,
    auth: AuthContext,
    request: web::Json<ChangePasswordRequest>,
) -> ApiResult<HttpResponse> {
    request.validate()?;

    state
        .auth
        .change_password(auth.user_id, &request.current_password, &request.new_password)
        .await?;
    Ok(HttpResponse::Ok().json(MessageResponse::new("Password changed")))
}

/// Handler for POST /api/v1/account/password/set-link
///
/// Mails a set-password link to accounts created without a password.
pub async fn request_password_set(
    state: web::Data<AppState>,
    auth: AuthContext,
) -> ApiResult<HttpResponse> {
    state.auth.request_password_set(auth.user_id).await?;
    Ok(HttpResponse::Ok().json(MessageResponse::new("Set-password email sent")))
}

/// Handler for POST /api/v1/account/email
///
/// The new address takes effect once the mailed link is opened.
pub async fn request_email_change(
    state: web::Data<AppState>,
    auth: AuthContext,
    request: web::Json<EmailChangeRequest>,
) -> ApiResult<HttpResponse> {
    request.validate()?;

    state
        .auth
        .request_email_change(auth.user_id, &request.email)
        .await?;
    Ok(HttpResponse::Ok().json(MessageResponse::new("Confirmation email sent")))
}

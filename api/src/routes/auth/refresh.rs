use actix_web::{web, HttpResponse};
use validator::Validate;

use crate::dto::{RefreshTokenRequest, TokenResponse};
use crate::handlers::error::ApiResult;
use crate::state::AppState;

/// Handler for POST /api/v1/auth/refresh
///
/// Rotates a refresh token for a new token pair. Presenting an already
/// rotated token revokes its whole family.
///
/// # Request Body
///
/// ```json
/// {
///     "refresh_token": "string"
/// }
/// ```
///
/// ## Errors
/// - 401 Unauthorized: Invalid, expired or revoked refresh token
/// - 403 Forbidden: User is blocked
pub async fn refresh_token(
    state: web::Data<AppState>,
    request: web::Json<RefreshTokenRequest>,
) -> ApiResult<HttpResponse> {
    request.validate()?;

    let tokens = state.auth.refresh(&request.refresh_token).await?;
    Ok(HttpResponse::Ok().json(TokenResponse::from(tokens)))
}

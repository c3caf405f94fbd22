use actix_web::{web, HttpResponse};
use gm_core::domain::entities::user::UserRole;
use gm_core::services::RegisterRequest as RegisterCommand;
use validator::Validate;

use crate::dto::RegisterRequest;
use crate::handlers::error::ApiResult;
use crate::state::AppState;

/// Handler for POST /api/v1/auth/register
///
/// Creates an unverified STUDENT or INSTRUCTOR account and mails a
/// verification link.
///
/// # Request Body
///
/// ```json
/// {
///     "name": "Ana",
///     "email": "ana@example.com",
///     "password": "secret-pass-1",
///     "role": "INSTRUCTOR"
/// }
/// ```
///
/// ## Errors
/// - 400 Bad Request: Invalid fields or weak password
/// - 403 Forbidden: ADMIN requested or registration disabled
/// - 409 Conflict: Email already registered
pub async fn register(
    state: web::Data<AppState>,
    request: web::Json<RegisterRequest>,
) -> ApiResult<HttpResponse> {
    request.validate()?;
    let request = request.into_inner();

    let profile = state
        .auth
        .register(RegisterCommand {
            name: request.name,
            email: request.email,
            password: request.password,
            role: request.role.unwrap_or(UserRole::Student),
        })
        .await?;

    Ok(HttpResponse::Created().json(profile))
}

use actix_web::{web, HttpResponse};

use crate::dto::{LogoutRequest, MessageResponse};
use crate::handlers::error::ApiResult;
use crate::middleware::auth::AuthContext;
use crate::state::AppState;

/// Handler for POST /api/v1/auth/logout
///
/// Blacklists the presented access token. With a refresh token in the body
/// only that session ends, otherwise every session of the user does.
///
/// # Headers
///
/// ```text
/// Authorization: Bearer {access_token}
/// ```
///
/// ## Errors
/// - 401 Unauthorized: Missing or invalid access token
pub async fn logout(
    state: web::Data<AppState>,
    auth: AuthContext,
    request: Option<web::Json<LogoutRequest>>,
) -> ApiResult<HttpResponse> {
    let request = request.map(web::Json::into_inner).unwrap_or_default();

    state
        .auth
        .logout(&auth.claims, request.refresh_token.as_deref())
        .await?;

    Ok(HttpResponse::Ok().json(MessageResponse::new("Logged out successfully")))
}

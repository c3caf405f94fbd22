use actix_web::{web, HttpResponse};
use validator::Validate;

use crate::dto::{
    BackupCodesResponse, MessageResponse, PasswordConfirmation, RemainingBackupCodesResponse,
};
use crate::handlers::cookies::removal_cookie;
use crate::handlers::error::ApiResult;
use crate::middleware::auth::AuthContext;
use crate::state::AppState;

fn confirmation(request: Option<web::Json<PasswordConfirmation>>) -> ApiResult<PasswordConfirmation> {
    let confirmation = request.map(web::Json::into_inner).unwrap_or_default();
    confirmation.validate()?;
    Ok(confirmation)
}

/// Handler for POST /api/v1/account/two-factor/enable
///
/// Returns the backup codes; they are not retrievable later.
pub async fn enable(
    state: web::Data<AppState>,
    auth: AuthContext,
    request: Option<web::Json<PasswordConfirmation>>,
) -> ApiResult<HttpResponse> {
    let request = confirmation(request)?;

    let backup_codes = state
        .two_factor
        .enable(auth.user_id, request.password.as_deref())
        .await?;
    Ok(HttpResponse::Ok().json(BackupCodesResponse { backup_codes }))
}

/// Handler for POST /api/v1/account/two-factor/disable
///
/// Also forgets every trusted device and clears this browser's cookie.
pub async fn disable(
    state: web::Data<AppState>,
    auth: AuthContext,
    request: Option<web::Json<PasswordConfirmation>>,
) -> ApiResult<HttpResponse> {
    let request = confirmation(request)?;

    state
        .two_factor
        .disable(auth.user_id, request.password.as_deref())
        .await?;
    Ok(HttpResponse::Ok()
        .cookie(removal_cookie(&state.device_cookie))
        .json(MessageResponse::new("Two-factor authentication disabled")))
}

/// Handler for POST /api/v1/account/two-factor/backup-codes
pub async fn regenerate_backup_codes(
    state: web::Data<AppState>,
    auth: AuthContext,
    request: Option<web::Json<PasswordConfirmation>>,
) -> ApiResult<HttpResponse> {
    let request = confirmation(request)?;

    let backup_codes = state
        .two_factor
        .regenerate_backup_codes(auth.user_id, request.password.as_deref())
        .await?;
    Ok(HttpResponse::Ok().json(BackupCodesResponse { backup_codes }))
}

/// Handler for GET /api/v1/account/two-factor/backup-codes
pub async fn remaining_backup_codes(
    state: web::Data<AppState>,
    auth: AuthContext,
) -> ApiResult<HttpResponse> {
    let remaining = state.two_factor.remaining_backup_codes(auth.user_id).await?;
    Ok(HttpResponse::Ok().json(RemainingBackupCodesResponse { remaining }))
}

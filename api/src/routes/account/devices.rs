use actix_web::{web, HttpRequest, HttpResponse};
use gm_core::domain::entities::trusted_device::TrustedDevice;
use uuid::Uuid;

use crate::dto::{DeviceResponse, RevokedDevicesResponse};
use crate::handlers::cookies::{read_device_cookie, removal_cookie};
use crate::handlers::error::ApiResult;
use crate::middleware::auth::AuthContext;
use crate::state::AppState;

fn current_device(req: &HttpRequest, state: &AppState) -> Option<Uuid> {
    read_device_cookie(req, &state.device_cookie)
        .and_then(|value| TrustedDevice::parse_cookie(&value).map(|(id, _)| id))
}

/// Handler for GET /api/v1/account/devices
///
/// Lists unexpired trusted devices, most recently used first.
pub async fn list_devices(
    req: HttpRequest,
    state: web::Data<AppState>,
    auth: AuthContext,
) -> ApiResult<HttpResponse> {
    let current = current_device(&req, &state);
    let devices: Vec<DeviceResponse> = state
        .devices
        .list(auth.user_id)
        .await?
        .into_iter()
        .map(|device| DeviceResponse::new(device, current))
        .collect();

    Ok(HttpResponse::Ok().json(devices))
}

/// Handler for DELETE /api/v1/account/devices/{id}
///
/// ## Errors
/// - 404 Not Found: Unknown device or a device of another user
pub async fn revoke_device(
    req: HttpRequest,
    state: web::Data<AppState>,
    auth: AuthContext,
    path: web::Path<Uuid>,
) -> ApiResult<HttpResponse> {
    let device_id = path.into_inner();
    state.devices.revoke(auth.user_id, device_id).await?;

    let mut response = HttpResponse::NoContent();
    if current_device(&req, &state) == Some(device_id) {
        response.cookie(removal_cookie(&state.device_cookie));
    }
    Ok(response.finish())
}

/// Handler for DELETE /api/v1/account/devices
pub async fn revoke_all_devices(
    state: web::Data<AppState>,
    auth: AuthContext,
) -> ApiResult<HttpResponse> {
    let revoked = state.devices.revoke_all(auth.user_id).await?;
    Ok(HttpResponse::Ok()
        .cookie(removal_cookie(&state.device_cookie))
        .json(RevokedDevicesResponse { revoked }))
}

use actix_web::{web, HttpRequest, HttpResponse};
use gm_core::domain::value_objects::LoginOutcome;
use gm_core::services::LoginRequest as LoginCommand;
use validator::Validate;

use crate::dto::{LoginRequest, LoginResponse};
use crate::handlers::client::{client_ip, user_agent};
use crate::handlers::cookies::{read_device_cookie, trusted_device_cookie};
use crate::handlers::error::ApiResult;
use crate::state::AppState;

/// Handler for POST /api/v1/auth/login
///
/// Runs the login state machine. Accounts with two-factor enabled answer
/// with `two_factor_required` until a mailed code, a backup code or a
/// trusted-device cookie is presented.
///
/// # Response
///
/// ## Success (200 OK)
/// ```json
/// { "status": "authenticated", "access_token": "eyJ...", "refresh_token": "...", "user": {...} }
/// { "status": "two_factor_required", "email_hint": "a***@example.com" }
/// { "status": "email_verification_required", "message": "Confirmation email sent" }
/// ```
///
/// When `trust_device` was set and a second factor was presented, the
/// response also sets the trusted-device cookie.
///
/// ## Errors
/// - 401 Unauthorized: Wrong credentials, two-factor or backup code
/// - 403 Forbidden: Account blocked
/// - 429 Too Many Requests: Login or code attempts exhausted
/// - 503 Service Unavailable: The code mail could not be sent
pub async fn login(
    req: HttpRequest,
    state: web::Data<AppState>,
    request: web::Json<LoginRequest>,
) -> ApiResult<HttpResponse> {
    request.validate()?;
    let request = request.into_inner();

    let outcome = state
        .auth
        .login(LoginCommand {
            email: request.email,
            password: request.password,
            code: request.code,
            backup_code: request.backup_code,
            trust_device: request.trust_device,
            device_cookie: read_device_cookie(&req, &state.device_cookie),
            device_label: user_agent(&req),
            client_ip: client_ip(&req),
        })
        .await?;

    let issued_device = match &outcome {
        LoginOutcome::Authenticated(session) => session.trusted_device.clone(),
        _ => None,
    };

    let mut response = HttpResponse::Ok();
    if let Some(device) = issued_device {
        response.cookie(trusted_device_cookie(&state.device_cookie, device.cookie_value));
    }
    Ok(response.json(LoginResponse::from_outcome(outcome)))
}

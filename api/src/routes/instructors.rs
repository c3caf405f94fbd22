//! Instructor self-service verification endpoints

use actix_web::{web, HttpResponse};
use gm_core::domain::entities::user::UserRole;
use uuid::Uuid;
use validator::Validate;

use crate::dto::InstructorApplicationRequest;
use crate::handlers::error::ApiResult;
use crate::middleware::auth::{AuthContext, JwtAuth};
use crate::state::AppState;

/// Handler for POST /api/v1/instructors/verification
///
/// Submits or resubmits the profile for admin review. A resubmission puts
/// the profile back to PENDING.
///
/// ## Errors
/// - 403 Forbidden: Not an instructor, or email not verified
pub async fn submit(
    state: web::Data<AppState>,
    auth: AuthContext,
    request: web::Json<InstructorApplicationRequest>,
) -> ApiResult<HttpResponse> {
    auth.require_role(&[UserRole::Instructor])?;
    request.validate()?;

    let profile = state
        .instructors
        .submit(auth.user_id, request.into_inner().into())
        .await?;
    Ok(HttpResponse::Accepted().json(profile))
}

/// Handler for GET /api/v1/instructors/verification
pub async fn status(state: web::Data<AppState>, auth: AuthContext) -> ApiResult<HttpResponse> {
    auth.require_role(&[UserRole::Instructor])?;

    let profile = state.instructors.status(auth.user_id).await?;
    Ok(HttpResponse::Ok().json(profile))
}

/// Handler for GET /api/v1/instructors/{user_id}/verified
///
/// Public badge check used by course pages.
pub async fn publicly_trusted(
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
) -> ApiResult<HttpResponse> {
    let user_id = path.into_inner();
    let verified = state.instructors.is_publicly_trusted(user_id).await?;
    Ok(HttpResponse::Ok().json(serde_json::json!({
        "user_id": user_id,
        "verified": verified,
    })))
}

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/instructors")
            .route(
                "/verification",
                web::post().to(submit).wrap(JwtAuth::new()),
            )
            .route(
                "/verification",
                web::get().to(status).wrap(JwtAuth::new()),
            )
            .route("/{user_id}/verified", web::get().to(publicly_trusted)),
    );
}

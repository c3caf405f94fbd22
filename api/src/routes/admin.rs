//! Moderation endpoints: instructor review queue and account blocking
//!
//! The role check is repeated inside the core services, so these handlers
//! only reject early.

use actix_web::{web, HttpResponse};
use gm_core::domain::entities::instructor::InstructorProfile;
use gm_core::domain::entities::user::UserRole;
use uuid::Uuid;
use validator::Validate;

use crate::dto::{ModeratedUserResponse, RejectRequest, ReviewQueueQuery};
use crate::handlers::error::ApiResult;
use crate::middleware::auth::{AuthContext, JwtAuth};
use crate::state::AppState;

/// Handler for GET /api/v1/admin/instructors?status=&page=&per_page=
///
/// Oldest submissions come first.
pub async fn list_instructors(
    state: web::Data<AppState>,
    auth: AuthContext,
    query: web::Query<ReviewQueueQuery>,
) -> ApiResult<HttpResponse> {
    auth.require_role(&[UserRole::Admin])?;

    let page = state
        .instructors
        .list_by_status(query.status, query.pagination())
        .await?;
    Ok(HttpResponse::Ok().json(page))
}

/// Handler for POST /api/v1/admin/instructors/{id}/approve
pub async fn approve_instructor(
    state: web::Data<AppState>,
    auth: AuthContext,
    path: web::Path<Uuid>,
) -> ApiResult<HttpResponse> {
    auth.require_role(&[UserRole::Admin])?;

    let profile: InstructorProfile = state
        .instructors
        .approve(auth.user_id, path.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(profile))
}

/// Handler for POST /api/v1/admin/instructors/{id}/reject
pub async fn reject_instructor(
    state: web::Data<AppState>,
    auth: AuthContext,
    path: web::Path<Uuid>,
    request: web::Json<RejectRequest>,
) -> ApiResult<HttpResponse> {
    auth.require_role(&[UserRole::Admin])?;
    request.validate()?;

    let profile = state
        .instructors
        .reject(auth.user_id, path.into_inner(), &request.reason)
        .await?;
    Ok(HttpResponse::Ok().json(profile))
}

/// Handler for POST /api/v1/admin/users/{id}/block
///
/// Ends every session and forgets every trusted device of the user.
pub async fn block_user(
    state: web::Data<AppState>,
    auth: AuthContext,
    path: web::Path<Uuid>,
) -> ApiResult<HttpResponse> {
    auth.require_role(&[UserRole::Admin])?;

    let user = state.admin.block_user(auth.user_id, path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(ModeratedUserResponse::from(&user)))
}

/// Handler for POST /api/v1/admin/users/{id}/unblock
pub async fn unblock_user(
    state: web::Data<AppState>,
    auth: AuthContext,
    path: web::Path<Uuid>,
) -> ApiResult<HttpResponse> {
    auth.require_role(&[UserRole::Admin])?;

    let user = state.admin.unblock_user(auth.user_id, path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(ModeratedUserResponse::from(&user)))
}

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/admin")
            .wrap(JwtAuth::new())
            .route("/instructors", web::get().to(list_instructors))
            .route("/instructors/{id}/approve", web::post().to(approve_instructor))
            .route("/instructors/{id}/reject", web::post().to(reject_instructor))
            .route("/users/{id}/block", web::post().to(block_user))
            .route("/users/{id}/unblock", web::post().to(unblock_user)),
    );
}

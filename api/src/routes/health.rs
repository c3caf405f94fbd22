use actix_web::{web, HttpResponse};

use crate::state::AppState;

/// Handler for GET /api/v1/health
///
/// Reports 503 when a configured dependency (database, cache) is down.
pub async fn health_check(state: web::Data<AppState>) -> HttpResponse {
    let checks = state.backend.health().await;
    let healthy = checks.iter().all(|(_, ok)| *ok);

    let dependencies: serde_json::Map<String, serde_json::Value> = checks
        .into_iter()
        .map(|(name, ok)| {
            let status = if ok { "up" } else { "down" };
            (name.to_string(), serde_json::json!(status))
        })
        .collect();

    let body = serde_json::json!({
        "status": if healthy { "healthy" } else { "degraded" },
        "service": "gurmania-api",
        "version": env!("CARGO_PKG_VERSION"),
        "storage": state.backend.storage_name(),
        "dependencies": dependencies,
        "timestamp": chrono::Utc::now().to_rfc3339(),
    });

    if healthy {
        HttpResponse::Ok().json(body)
    } else {
        HttpResponse::ServiceUnavailable().json(body)
    }
}

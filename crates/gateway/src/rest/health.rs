//! Liveness probe, mounted outside the authenticated router.

use axum::Json;
use chrono::Utc;
use serde::Serialize;
use utoipa::ToSchema;

/// Payload of `GET /health`. Identifies which build is answering so
/// probes behind a load balancer can tell instances apart.
#[derive(Debug, Serialize, ToSchema)]
pub struct HealthResponse {
    pub status: String,
    pub service: String,
    pub version: String,
    pub checked_at: String,
}

#[utoipa::path(
    get,
    path = "/health",
    tag = "Health",
    responses(
        (status = 200, description = "The service is up and answering requests", body = HealthResponse)
    )
)]
pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        service: env!("CARGO_PKG_NAME").to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        checked_at: Utc::now().to_rfc3339(),
    })
}

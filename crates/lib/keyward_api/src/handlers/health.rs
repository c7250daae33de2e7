//! Liveness endpoint.

use axum::Json;

use crate::models::HealthResponse;

/// `GET /health` — reports the running core version.
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".into(),
        version: keyward_core::version().into(),
    })
}

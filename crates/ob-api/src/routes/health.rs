//! Health check endpoints.

use axum::{http::StatusCode, routing::get, Json, Router};
use serde::Serialize;

use crate::state::AppState;

/// Health check response body.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}

/// Creates health check routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/healthz", get(health_check))
        .route("/live", get(liveness_check))
}

/// Health check endpoint.
async fn health_check() -> (StatusCode, Json<HealthResponse>) {
    (
        StatusCode::OK,
        Json(HealthResponse {
            status: "healthy".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }),
    )
}

/// Liveness probe; returns 200 as long as the process is serving.
async fn liveness_check() -> StatusCode {
    StatusCode::OK
}

//! Liveness endpoint.

use axum::{Router, routing::get};
use serde::Serialize;

use crate::{response::ApiResponse, state::AppState};

/// Health check response.
#[derive(Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}

/// Simple health check (liveness probe).
async fn health_check() -> ApiResponse<HealthResponse> {
    ApiResponse::ok(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

pub fn router() -> Router<AppState> {
    Router::new().route("/health", get(health_check))
}

//! Health check handlers

use axum::{extract::State, Json};
use serde::Serialize;

use crate::AppState;

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
}

/// Liveness check
pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse { status: "ok" })
}

/// Readiness check: verifies gateway configuration is present
pub async fn readiness_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let status = if state.gateway.is_configured() {
        "ready"
    } else {
        "degraded"
    };
    Json(HealthResponse { status })
}

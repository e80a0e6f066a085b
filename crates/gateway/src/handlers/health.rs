//! Health check handlers

use crate::AppState;
use axum::{extract::State, http::StatusCode, Json};
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}

#[derive(Debug, Serialize)]
pub struct ReadinessResponse {
    pub status: String,
    pub checks: Vec<CheckResult>,
}

#[derive(Debug, Serialize)]
pub struct CheckResult {
    pub name: String,
    pub healthy: bool,
    pub message: Option<String>,
}

/// Liveness probe; always succeeds while the process runs
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: reviewflow_common::VERSION.to_string(),
    })
}

/// Readiness probe; checks the database connection
pub async fn ready(
    State(state): State<AppState>,
) -> (StatusCode, Json<ReadinessResponse>) {
    let database = match state.db.ping().await {
        Ok(()) => CheckResult {
            name: "database".to_string(),
            healthy: true,
            message: None,
        },
        Err(e) => CheckResult {
            name: "database".to_string(),
            healthy: false,
            message: Some(e.to_string()),
        },
    };

    let all_healthy = database.healthy;
    let status = if all_healthy {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    (
        status,
        Json(ReadinessResponse {
            status: if all_healthy { "ready" } else { "not_ready" }.to_string(),
            checks: vec![database],
        }),
    )
}

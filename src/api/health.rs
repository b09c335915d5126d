//! Health check endpoints for liveness and readiness probes

use axum::{extract::State, http::StatusCode, response::IntoResponse};
use serde::Serialize;

use super::state::AppState;
use crate::api::types::Json;

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: HealthStatus,
    pub version: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub usable_credentials: Option<usize>,
}

#[derive(Serialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
    Healthy,
    Unhealthy,
}

/// Basic liveness probe, returns 200 while the process runs.
pub async fn health_check() -> impl IntoResponse {
    let response = HealthResponse {
        status: HealthStatus::Healthy,
        version: env!("CARGO_PKG_VERSION").to_string(),
        usable_credentials: None,
    };

    (StatusCode::OK, Json(response))
}

pub async fn live_check() -> StatusCode {
    StatusCode::OK
}

/// Readiness: the service can only serve generations when at least one
/// well-formed credential is configured.
pub async fn ready_check(State(state): State<AppState>) -> impl IntoResponse {
    let usable = state
        .credentials
        .iter()
        .filter(|c| c.is_well_formed())
        .count();

    let status = if usable > 0 {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let response = HealthResponse {
        status: if usable > 0 {
            HealthStatus::Healthy
        } else {
            HealthStatus::Unhealthy
        },
        version: env!("CARGO_PKG_VERSION").to_string(),
        usable_credentials: Some(usable),
    };

    (status, Json(response))
}

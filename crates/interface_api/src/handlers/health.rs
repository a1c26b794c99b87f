//! Liveness and readiness probes

use std::time::Instant;

use axum::{extract::State, Json};
use serde::Serialize;
use tracing::warn;

use crate::{error::ApiError, AppState};

const VERSION: &str = env!("CARGO_PKG_VERSION");

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub database_latency_ms: Option<u64>,
}

/// Liveness: the process is up and serving
pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        version: VERSION,
        database_latency_ms: None,
    })
}

/// Readiness: the claims store answers a ping
pub async fn readiness_check(
    State(state): State<AppState>,
) -> Result<Json<HealthResponse>, ApiError> {
    let started = Instant::now();

    if let Err(e) = state.store.ping().await {
        warn!(error = %e, "Readiness check failed");
        return Err(ApiError::Unavailable("Database unavailable".to_string()));
    }

    Ok(Json(HealthResponse {
        status: "ready",
        version: VERSION,
        database_latency_ms: Some(started.elapsed().as_millis() as u64),
    }))
}

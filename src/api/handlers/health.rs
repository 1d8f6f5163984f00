//! Health check endpoints for liveness and readiness probes

use axum::{extract::State, http::StatusCode, Json};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::api::error::ApiError;
use crate::api::routes::ApiState;
use crate::storage;

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct HealthResponse {
    /// Service status ("ok" for liveness, "ready" for readiness)
    #[schema(example = "ok")]
    pub status: String,
}

/// Liveness endpoint
///
/// Returns 200 OK whenever the process is serving requests.
#[utoipa::path(
    get,
    path = "/health",
    tag = "health",
    responses(
        (status = 200, description = "Service is alive", body = HealthResponse)
    )
)]
pub async fn health_handler() -> (StatusCode, Json<HealthResponse>) {
    (StatusCode::OK, Json(HealthResponse { status: "ok".to_string() }))
}

/// Readiness endpoint
///
/// Returns 200 once the database answers `SELECT 1`, 503 otherwise.
#[utoipa::path(
    get,
    path = "/health/ready",
    tag = "health",
    responses(
        (status = 200, description = "Service is ready", body = HealthResponse),
        (status = 503, description = "Database is unreachable")
    )
)]
pub async fn readiness_handler(
    State(state): State<ApiState>,
) -> Result<Json<HealthResponse>, ApiError> {
    storage::ping(&state.pool).await.map_err(|e| {
        tracing::warn!(error = %e, "Readiness check failed");
        ApiError::from(e)
    })?;

    Ok(Json(HealthResponse { status: "ready".to_string() }))
}

//! Health check endpoint handlers.

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use domain::models::{HealthCheckResponse, HealthStatus};
use serde::Serialize;

use crate::app::AppState;
use crate::middleware::metrics::record_health_check;
use crate::services::health::{default_probes, run_probes};

/// Simple status response for liveness/readiness probes.
#[derive(Debug, Serialize)]
pub struct StatusResponse {
    pub status: String,
}

/// Full health check endpoint.
///
/// Probes every component and aggregates the worst status. The body is
/// returned in every case; the status code is 503 only when unhealthy.
pub async fn health_check(State(state): State<AppState>) -> impl IntoResponse {
    let probes = default_probes(&state.pool, state.config.health.degraded_threshold_ms);
    let components = run_probes(&probes).await;
    persistence::metrics::record_pool_metrics(&state.pool);

    let response = HealthCheckResponse::from_components(env!("CARGO_PKG_VERSION"), components);
    record_health_check(&response.status.to_string());

    (health_status_code(response.status), Json(response))
}

fn health_status_code(status: HealthStatus) -> StatusCode {
    if status.is_serving() {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    }
}

/// Liveness probe endpoint.
///
/// Returns 200 OK if the process is running.
pub async fn live() -> Json<StatusResponse> {
    Json(StatusResponse {
        status: "alive".to_string(),
    })
}

/// Readiness probe endpoint.
///
/// Returns 200 OK if the service can accept traffic (database connected).
pub async fn ready(State(state): State<AppState>) -> Result<Json<StatusResponse>, StatusCode> {
    match persistence::db::ping(&state.pool).await {
        Ok(_) => Ok(Json(StatusResponse {
            status: "ready".to_string(),
        })),
        Err(e) => {
            tracing::warn!(error = %e, "Readiness check failed");
            Err(StatusCode::SERVICE_UNAVAILABLE)
        }
    }
}

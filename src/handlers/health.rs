use axum::{extract::State, http::StatusCode, response::Json};
use tracing::{debug, instrument};
use crate::schemas::{AppState, ErrorResponse, HealthResponse};

/// Health check endpoint
#[utoipa::path(
    get,
    path = "/health",
    tag = "health",
    responses(
        (status = 200, description = "Service is healthy", body = HealthResponse),
        (status = 500, description = "Service is unhealthy", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn health_check(State(state): State<AppState>) -> Result<Json<HealthResponse>, StatusCode> {
    // Flush pending evictions so the session count is current
    state.sessions.run_pending_tasks().await;

    let response = HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        tables: state.controller.dataset().list_tables().len(),
        sessions: state.sessions.entry_count(),
        fallback_events: state.controller.fallback_events(),
    };
    debug!(?response, "Health check");

    Ok(Json(response))
}

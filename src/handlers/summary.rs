use crate::handlers::{HandlerError, compute_error_response};
use crate::schemas::{ApiResponse, AppState, ErrorResponse};
use axum::{extract::State, http::StatusCode, response::Json};
use common::{ForecastTableRow, KeyMetrics};
use compute::{forecast_table, key_metrics};
use tracing::{info, instrument};

/// Headline figures for the final forecast period
#[utoipa::path(
    get,
    path = "/api/v1/summary",
    tag = "summary",
    responses(
        (status = 200, description = "Key metrics computed successfully", body = ApiResponse<KeyMetrics>),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn get_summary(
    State(state): State<AppState>,
) -> Result<(StatusCode, Json<ApiResponse<KeyMetrics>>), HandlerError> {
    let metrics = key_metrics(state.controller.dataset()).map_err(compute_error_response)?;
    info!(
        "Key metrics: total {} in {}, CAGR {:.2}%",
        metrics.total_revenue, metrics.target_period, metrics.cagr_percent
    );

    Ok((
        StatusCode::OK,
        Json(ApiResponse::ok(metrics, "Key metrics computed successfully")),
    ))
}

/// Combined forecast per period with year-over-year growth
#[utoipa::path(
    get,
    path = "/api/v1/forecast-table",
    tag = "summary",
    responses(
        (status = 200, description = "Forecast table computed successfully", body = ApiResponse<Vec<ForecastTableRow>>),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn get_forecast_table(
    State(state): State<AppState>,
) -> Result<(StatusCode, Json<ApiResponse<Vec<ForecastTableRow>>>), HandlerError> {
    let rows = forecast_table(state.controller.dataset()).map_err(compute_error_response)?;

    Ok((
        StatusCode::OK,
        Json(ApiResponse::ok(rows, "Forecast table computed successfully")),
    ))
}

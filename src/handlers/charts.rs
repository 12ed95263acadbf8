use crate::handlers::{HandlerError, compute_error_response, rejection_response};
use crate::schemas::{ApiResponse, AppState, ChartQuery, ErrorResponse};
use axum::{
    extract::{Path, Query, State, rejection::QueryRejection},
    http::StatusCode,
    response::Json,
};
use axum_valid::{Valid, ValidRejection};
use common::ChartSpec;
use compute::{SelectionState, parse_chart_id};
use tracing::{debug, instrument};

/// Render one chart slot for a year range without touching any session
#[utoipa::path(
    get,
    path = "/api/v1/charts/{chart_id}",
    tag = "charts",
    params(
        ("chart_id" = String, Path, description = "Chart slot, e.g. regional-distribution"),
        ChartQuery,
    ),
    responses(
        (status = 200, description = "Chart rendered successfully", body = ApiResponse<ChartSpec>),
        (status = 400, description = "Invalid year range", body = ErrorResponse),
        (status = 404, description = "Unknown chart", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn get_chart(
    Path(chart_id): Path<String>,
    query: Result<Valid<Query<ChartQuery>>, ValidRejection<QueryRejection>>,
    State(state): State<AppState>,
) -> Result<(StatusCode, Json<ApiResponse<ChartSpec>>), HandlerError> {
    let id = parse_chart_id(&chart_id).map_err(compute_error_response)?;
    let Valid(Query(query)) = query.map_err(rejection_response)?;
    let selection = SelectionState::new(query.start_or_default(), query.end_or_default())
        .map_err(compute_error_response)?;

    let spec = state
        .controller
        .render(id, &selection)
        .map_err(compute_error_response)?;

    debug!("Rendered chart {} with {} series", id, spec.series.len());
    Ok((
        StatusCode::OK,
        Json(ApiResponse::ok(spec, "Chart rendered successfully")),
    ))
}

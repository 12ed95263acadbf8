use crate::handlers::{HandlerError, compute_error_response, error_response, rejection_response};
use crate::schemas::{
    ApiResponse, AppState, ChartDependency, ErrorResponse, SelectionChangedResponse, SessionResponse,
    YearRangeChangedRequest,
};
use axum::{
    extract::{Path, State, rejection::JsonRejection},
    http::StatusCode,
    response::Json,
};
use axum_valid::{Valid, ValidRejection};
use chrono::Utc;
use common::{ChartId, ChartSpec};
use compute::{Session, YearRangeChanged, inputs_of};
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{debug, error, info, instrument, trace, warn};

fn new_session_id() -> String {
    format!("session_{}_{:016x}", Utc::now().timestamp(), rand::random::<u64>())
}

fn session_response(session_id: String, session: &Session) -> SessionResponse {
    SessionResponse {
        session_id,
        selection: session.selection().into(),
        charts: session
            .dashboard()
            .charts()
            .map(|spec| ChartSpec::clone(spec))
            .collect(),
        dependencies: ChartId::ALL
            .into_iter()
            .map(|chart| ChartDependency {
                chart,
                inputs: inputs_of(chart)
                    .iter()
                    .map(|input| input.as_str().to_string())
                    .collect(),
            })
            .collect(),
    }
}

async fn find_session(state: &AppState, session_id: &str) -> Result<Arc<Mutex<Session>>, HandlerError> {
    match state.sessions.get(session_id).await {
        Some(session) => Ok(session),
        None => {
            warn!("Session {} not found", session_id);
            Err(error_response(
                StatusCode::NOT_FOUND,
                "SESSION_NOT_FOUND",
                format!("Session {session_id} not found"),
            ))
        }
    }
}

/// Open a dashboard session at the default year range
#[utoipa::path(
    post,
    path = "/api/v1/sessions",
    tag = "sessions",
    responses(
        (status = 201, description = "Session created successfully", body = ApiResponse<SessionResponse>),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn create_session(
    State(state): State<AppState>,
) -> Result<(StatusCode, Json<ApiResponse<SessionResponse>>), HandlerError> {
    trace!("Entering create_session function");

    let session = match state.controller.new_session() {
        Ok(session) => session,
        Err(e) => {
            error!("Failed to render initial dashboard: {}", e);
            return Err(compute_error_response(e));
        }
    };

    let session_id = new_session_id();
    let response = session_response(session_id.clone(), &session);
    state
        .sessions
        .insert(session_id.clone(), Arc::new(Mutex::new(session)))
        .await;

    info!("Created session {}", session_id);
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::ok(response, "Session created successfully")),
    ))
}

/// Current selection and charts of a session
#[utoipa::path(
    get,
    path = "/api/v1/sessions/{session_id}",
    tag = "sessions",
    params(
        ("session_id" = String, Path, description = "Session identifier"),
    ),
    responses(
        (status = 200, description = "Session retrieved successfully", body = ApiResponse<SessionResponse>),
        (status = 404, description = "Session not found or expired", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn get_session(
    Path(session_id): Path<String>,
    State(state): State<AppState>,
) -> Result<(StatusCode, Json<ApiResponse<SessionResponse>>), HandlerError> {
    let handle = find_session(&state, &session_id).await?;
    let session = handle.lock().await;

    Ok((
        StatusCode::OK,
        Json(ApiResponse::ok(
            session_response(session_id, &session),
            "Session retrieved successfully",
        )),
    ))
}

/// Apply a year-range change to a session
///
/// Only the charts depending on the inputs that fired are rebuilt and
/// returned. A reversed or out-of-range selection is rejected and the
/// session is left as it was.
#[utoipa::path(
    post,
    path = "/api/v1/sessions/{session_id}/events",
    tag = "sessions",
    params(
        ("session_id" = String, Path, description = "Session identifier"),
    ),
    request_body = YearRangeChangedRequest,
    responses(
        (status = 200, description = "Selection applied", body = ApiResponse<SelectionChangedResponse>),
        (status = 400, description = "Invalid year range", body = ErrorResponse),
        (status = 404, description = "Session not found or expired", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn post_selection_event(
    Path(session_id): Path<String>,
    State(state): State<AppState>,
    request: Result<Valid<Json<YearRangeChangedRequest>>, ValidRejection<JsonRejection>>,
) -> Result<(StatusCode, Json<ApiResponse<SelectionChangedResponse>>), HandlerError> {
    let handle = find_session(&state, &session_id).await?;
    let Valid(Json(request)) = request.map_err(rejection_response)?;

    // events of one session are applied one at a time
    let mut session = handle.lock().await;
    let event = YearRangeChanged::new(request.start_year, request.end_year);
    let outcome = state
        .controller
        .on_selection_changed(&mut session, event)
        .map_err(compute_error_response)?;

    let charts = outcome
        .recomputed
        .iter()
        .filter_map(|id| session.dashboard().get(*id))
        .map(|spec| ChartSpec::clone(spec))
        .collect();
    debug!(recomputed = ?outcome.recomputed, "Selection applied to session {}", session_id);

    let response = SelectionChangedResponse {
        session_id,
        selection: outcome.selection.into(),
        fired: outcome.fired.iter().map(|input| input.as_str().to_string()).collect(),
        recomputed: outcome.recomputed,
        charts,
    };
    Ok((
        StatusCode::OK,
        Json(ApiResponse::ok(response, "Selection applied successfully")),
    ))
}

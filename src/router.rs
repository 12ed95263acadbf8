use crate::handlers::{
    charts::get_chart,
    health::health_check,
    sessions::{create_session, get_session, post_selection_event},
    summary::{get_forecast_table, get_summary},
    tables::{get_table, get_table_long, get_table_year, list_tables},
};
use crate::schemas::{ApiDoc, AppState};
use axum::{
    routing::{get, post},
    Router,
};
use std::time::Duration;
use tower::ServiceBuilder;
use tower_http::{
    compression::CompressionLayer, cors::CorsLayer, timeout::TimeoutLayer, trace::TraceLayer,
};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

/// Create application router with all routes and middleware
pub fn create_router(state: AppState) -> Router {
    Router::new()
        // Health check
        .route("/health", get(health_check))
        // Read-only tables
        .route("/api/v1/tables", get(list_tables))
        .route("/api/v1/tables/:name", get(get_table))
        .route("/api/v1/tables/:name/long", get(get_table_long))
        .route("/api/v1/tables/:name/years/:year", get(get_table_year))
        // Stateless rendering
        .route("/api/v1/charts/:chart_id", get(get_chart))
        .route("/api/v1/summary", get(get_summary))
        .route("/api/v1/forecast-table", get(get_forecast_table))
        // Interactive sessions
        .route("/api/v1/sessions", post(create_session))
        .route("/api/v1/sessions/:session_id", get(get_session))
        .route("/api/v1/sessions/:session_id/events", post(post_selection_event))
        // Swagger UI
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        // Add middleware
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CompressionLayer::new())
                .layer(TimeoutLayer::new(Duration::from_secs(30)))
                .layer(CorsLayer::permissive()),
        )
        .with_state(state)
}

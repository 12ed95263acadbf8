use common::{
    AxisLabels, CategoryValue, ChartId, ChartKind, ChartPoint, ChartSeries, ChartSpec, Fallback,
    ForecastTableRow, KeyMetrics, LongRecord, YearRange, YearSelection,
};
use compute::{Session, ViewController, YEAR_DOMAIN};
use moka::future::Cache;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::Mutex;
use utoipa::{IntoParams, OpenApi, ToSchema};
use validator::{Validate, ValidationError};

pub use common::ApiResponse;

/// Application state shared across handlers
#[derive(Clone, Debug)]
pub struct AppState {
    /// View controller over the shared, read-only dataset
    pub controller: Arc<ViewController>,
    /// Live dashboard sessions; each is locked while an event is applied
    pub sessions: Cache<String, Arc<Mutex<Session>>>,
}

/// Error response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    /// Error message
    pub error: String,
    /// Error code
    pub code: String,
    /// Success status (always false for errors)
    pub success: bool,
}

/// Health check response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct HealthResponse {
    /// Service status
    pub status: String,
    /// Service version
    pub version: String,
    /// Number of tables served
    pub tables: usize,
    /// Live sessions
    pub sessions: u64,
    /// Year substitutions made while rendering charts since start-up
    pub fallback_events: u64,
}

fn check_year_order(start: i32, end: i32) -> Result<(), ValidationError> {
    if start > end {
        let mut err = ValidationError::new("year_order");
        err.message = Some(format!("start year {start} is after end year {end}").into());
        return Err(err);
    }
    Ok(())
}

/// The year-range slider moved
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, Validate)]
#[validate(schema(function = "validate_year_range_changed"))]
pub struct YearRangeChangedRequest {
    /// First year of the range (2022-2030)
    #[validate(range(min = 2022, max = 2030))]
    pub start_year: i32,
    /// Last year of the range (2022-2030), not before `start_year`
    #[validate(range(min = 2022, max = 2030))]
    pub end_year: i32,
}

fn validate_year_range_changed(request: &YearRangeChangedRequest) -> Result<(), ValidationError> {
    check_year_order(request.start_year, request.end_year)
}

/// Query parameters for stateless chart rendering
#[derive(Debug, Deserialize, ToSchema, IntoParams, Validate)]
#[validate(schema(function = "validate_chart_query"))]
pub struct ChartQuery {
    /// First year of the range (default: 2022)
    #[validate(range(min = 2022, max = 2030))]
    pub start: Option<i32>,
    /// Last year of the range (default: 2030)
    #[validate(range(min = 2022, max = 2030))]
    pub end: Option<i32>,
}

impl ChartQuery {
    pub fn start_or_default(&self) -> i32 {
        self.start.unwrap_or(*YEAR_DOMAIN.start())
    }

    pub fn end_or_default(&self) -> i32 {
        self.end.unwrap_or(*YEAR_DOMAIN.end())
    }
}

fn validate_chart_query(query: &ChartQuery) -> Result<(), ValidationError> {
    check_year_order(query.start_or_default(), query.end_or_default())
}

/// Query parameters for the long-format view of a table
#[derive(Debug, Deserialize, ToSchema, IntoParams)]
pub struct LongQuery {
    /// Comma-separated value columns, e.g. `2023,2024`; all columns when omitted
    pub columns: Option<String>,
}

/// One row of a table
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct TableRowResponse {
    pub category: String,
    pub values: Vec<f64>,
}

/// A table with its rows in stored order
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct TableResponse {
    pub name: String,
    /// `period_series` or `snapshot`
    pub kind: String,
    /// Period a snapshot table describes, e.g. `2030E`
    pub snapshot_period: Option<String>,
    pub category_header: String,
    pub columns: Vec<String>,
    pub rows: Vec<TableRowResponse>,
}

/// Table listing entry
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct TableInfo {
    pub name: String,
    pub category_header: String,
    pub row_count: usize,
    pub columns: Vec<String>,
}

/// Inputs a chart slot is rebuilt for
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ChartDependency {
    pub chart: ChartId,
    /// Empty for charts built once per session
    pub inputs: Vec<String>,
}

/// Current state of a dashboard session
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct SessionResponse {
    pub session_id: String,
    pub selection: YearRange,
    /// Every chart slot, in dashboard order
    pub charts: Vec<ChartSpec>,
    /// Input dependencies of every chart slot, in dashboard order
    pub dependencies: Vec<ChartDependency>,
}

/// Result of applying a range event to a session
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct SelectionChangedResponse {
    pub session_id: String,
    pub selection: YearRange,
    /// Inputs the event fired, e.g. `year-range.end`
    pub fired: Vec<String>,
    /// Slots rebuilt for this event
    pub recomputed: Vec<ChartId>,
    /// Rebuilt charts; all other charts are unchanged
    pub charts: Vec<ChartSpec>,
}

/// OpenAPI documentation
#[derive(OpenApi)]
#[openapi(
    paths(
        crate::handlers::health::health_check,
        crate::handlers::tables::list_tables,
        crate::handlers::tables::get_table,
        crate::handlers::tables::get_table_long,
        crate::handlers::tables::get_table_year,
        crate::handlers::charts::get_chart,
        crate::handlers::summary::get_summary,
        crate::handlers::summary::get_forecast_table,
        crate::handlers::sessions::create_session,
        crate::handlers::sessions::get_session,
        crate::handlers::sessions::post_selection_event,
    ),
    components(
        schemas(
            ErrorResponse,
            HealthResponse,
            YearRangeChangedRequest,
            ChartQuery,
            LongQuery,
            TableInfo,
            TableResponse,
            TableRowResponse,
            SessionResponse,
            ChartDependency,
            SelectionChangedResponse,
            ChartSpec,
            ChartId,
            ChartKind,
            ChartSeries,
            ChartPoint,
            AxisLabels,
            LongRecord,
            CategoryValue,
            Fallback,
            YearSelection,
            YearRange,
            KeyMetrics,
            ForecastTableRow,
        )
    ),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "tables", description = "Read-only forecast tables"),
        (name = "charts", description = "Stateless chart rendering"),
        (name = "summary", description = "Key metrics and the forecast table"),
        (name = "sessions", description = "Interactive dashboard sessions"),
    ),
    info(
        title = "Forecastboard API",
        description = "Revenue forecast dashboard: 2022-2024 actuals, 2025-2030 estimates",
        version = "0.1.0",
        license(
            name = "MIT",
            url = "https://opensource.org/licenses/MIT"
        )
    )
)]
pub struct ApiDoc;

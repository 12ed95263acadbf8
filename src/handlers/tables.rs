use crate::handlers::{HandlerError, compute_error_response};
use crate::schemas::{ApiResponse, AppState, ErrorResponse, LongQuery, TableInfo, TableResponse, TableRowResponse};
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::Json,
};
use common::{LongRecord, YearSelection};
use compute::{ComputeError, reshape_all_columns, reshape_to_long};
use dataset::{Dataset, REGIONAL_COMPLETE, Table, TableKind};
use tracing::{debug, info, instrument, trace};

/// Resolve a table name, including the derived regional series
fn lookup_table<'a>(dataset: &'a Dataset, name: &str) -> Result<&'a Table, ComputeError> {
    if name == REGIONAL_COMPLETE {
        return Ok(dataset.regional_complete());
    }
    Ok(dataset.get_table(name)?)
}

impl From<&Table> for TableResponse {
    fn from(table: &Table) -> Self {
        let (kind, snapshot_period) = match table.kind() {
            TableKind::PeriodSeries => ("period_series", None),
            TableKind::Snapshot { period } => ("snapshot", Some(period.label())),
        };
        Self {
            name: table.name().to_string(),
            kind: kind.to_string(),
            snapshot_period,
            category_header: table.category_header().to_string(),
            columns: table.columns().to_vec(),
            rows: table
                .rows()
                .iter()
                .zip(table.values())
                .map(|(category, values)| TableRowResponse {
                    category: category.clone(),
                    values: values.clone(),
                })
                .collect(),
        }
    }
}

/// List the forecast tables
#[utoipa::path(
    get,
    path = "/api/v1/tables",
    tag = "tables",
    responses(
        (status = 200, description = "Tables listed successfully", body = ApiResponse<Vec<TableInfo>>)
    )
)]
#[instrument(skip(state))]
pub async fn list_tables(
    State(state): State<AppState>,
) -> Result<(StatusCode, Json<ApiResponse<Vec<TableInfo>>>), HandlerError> {
    trace!("Entering list_tables function");
    let dataset = state.controller.dataset();

    let mut tables = Vec::new();
    for name in dataset.list_tables() {
        let table = lookup_table(dataset, name).map_err(compute_error_response)?;
        tables.push(TableInfo {
            name: name.to_string(),
            category_header: table.category_header().to_string(),
            row_count: table.row_count(),
            columns: table.columns().to_vec(),
        });
    }

    debug!("Listed {} tables", tables.len());
    Ok((
        StatusCode::OK,
        Json(ApiResponse::ok(tables, "Tables retrieved successfully")),
    ))
}

/// Get one table by name
#[utoipa::path(
    get,
    path = "/api/v1/tables/{name}",
    tag = "tables",
    params(
        ("name" = String, Path, description = "Table name, e.g. regional_data"),
    ),
    responses(
        (status = 200, description = "Table retrieved successfully", body = ApiResponse<TableResponse>),
        (status = 404, description = "Table not found", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn get_table(
    Path(name): Path<String>,
    State(state): State<AppState>,
) -> Result<(StatusCode, Json<ApiResponse<TableResponse>>), HandlerError> {
    let table = lookup_table(state.controller.dataset(), &name).map_err(compute_error_response)?;
    debug!("Found table {} with {} rows", name, table.row_count());

    Ok((
        StatusCode::OK,
        Json(ApiResponse::ok(
            TableResponse::from(table),
            "Table retrieved successfully",
        )),
    ))
}

/// Get a table in long format, one record per (category, column)
#[utoipa::path(
    get,
    path = "/api/v1/tables/{name}/long",
    tag = "tables",
    params(
        ("name" = String, Path, description = "Table name"),
        LongQuery,
    ),
    responses(
        (status = 200, description = "Long records retrieved successfully", body = ApiResponse<Vec<LongRecord>>),
        (status = 404, description = "Table or column not found", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn get_table_long(
    Path(name): Path<String>,
    Query(query): Query<LongQuery>,
    State(state): State<AppState>,
) -> Result<(StatusCode, Json<ApiResponse<Vec<LongRecord>>>), HandlerError> {
    let table = lookup_table(state.controller.dataset(), &name).map_err(compute_error_response)?;

    let records = match query.columns.as_deref() {
        Some(raw) => {
            let columns: Vec<&str> = raw
                .split(',')
                .map(str::trim)
                .filter(|c| !c.is_empty())
                .collect();
            debug!(?columns, "Reshaping table {}", name);
            reshape_to_long(table, table.category_header(), &columns)
                .map_err(compute_error_response)?
        }
        None => reshape_all_columns(table),
    };

    info!("Reshaped table {} into {} records", name, records.len());
    Ok((
        StatusCode::OK,
        Json(ApiResponse::ok(records, "Long records retrieved successfully")),
    ))
}

/// Get the column for a year, substituting a fallback period when absent
#[utoipa::path(
    get,
    path = "/api/v1/tables/{name}/years/{year}",
    tag = "tables",
    params(
        ("name" = String, Path, description = "Table name"),
        ("year" = i32, Path, description = "Calendar year, e.g. 2027"),
    ),
    responses(
        (status = 200, description = "Year selected successfully", body = ApiResponse<YearSelection>),
        (status = 404, description = "Table not found or has no period columns", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn get_table_year(
    Path((name, year)): Path<(String, i32)>,
    State(state): State<AppState>,
) -> Result<(StatusCode, Json<ApiResponse<YearSelection>>), HandlerError> {
    let table = lookup_table(state.controller.dataset(), &name).map_err(compute_error_response)?;
    let selection = state
        .controller
        .select_year(table, year)
        .map_err(compute_error_response)?;

    let message = match &selection.fallback {
        Some(_) => format!("No column for {year}, substituted {}", selection.column),
        None => "Year selected successfully".to_string(),
    };
    Ok((StatusCode::OK, Json(ApiResponse::ok(selection, message))))
}

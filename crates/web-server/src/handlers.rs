use crate::{error::AppError, AppState};
use axum::{
    extract::{Multipart, Path, Query, State},
    http::header,
    response::IntoResponse,
    Json,
};
use chrono::NaiveDate;
use core_types::ProductId;
use dashboard::query::split_list;
use dashboard::{DashboardView, ExportTable, ProductMetrics, QueryOverrides};
use dataset::{load_upload, TableKind};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Query string of the dashboard and export endpoints.
///
/// Lists are comma-separated, e.g. `?locations=Dhaka,Sylhet`.
#[derive(Debug, Default, Deserialize)]
pub struct DashboardParams {
    pub start: Option<NaiveDate>,
    pub end: Option<NaiveDate>,
    pub locations: Option<String>,
    pub categories: Option<String>,
}

impl From<DashboardParams> for QueryOverrides {
    fn from(params: DashboardParams) -> Self {
        QueryOverrides {
            start: params.start,
            end: params.end,
            locations: params.locations.as_deref().map(split_list),
            categories: params.categories.as_deref().map(split_list),
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct TableStatus {
    pub table: TableKind,
    /// `None` until the table has been loaded.
    pub rows: Option<usize>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct DatasetStatus {
    pub tables: Vec<TableStatus>,
    /// True once all three tables are present.
    pub ready: bool,
    /// Sale locations outside the configured options. They are kept but only
    /// reachable by a query that names them.
    pub unknown_locations: Vec<String>,
}

async fn dataset_status(state: &AppState) -> DatasetStatus {
    let workspace = state.workspace.read().await;
    let snapshot = workspace.snapshot().ok();
    DatasetStatus {
        tables: workspace
            .row_counts()
            .into_iter()
            .map(|(table, rows)| TableStatus { table, rows })
            .collect(),
        ready: snapshot.is_some(),
        unknown_locations: snapshot
            .map(|dataset| state.dashboard.unknown_locations(&dataset))
            .unwrap_or_default(),
    }
}

/// # GET /api/datasets
/// Reports which tables are loaded and how many rows each holds.
pub async fn get_datasets(State(state): State<Arc<AppState>>) -> Json<DatasetStatus> {
    Json(dataset_status(&state).await)
}

/// # POST /api/datasets
/// Accepts one or more of `products.csv`, `sales.csv` and `purchases.csv` as multipart
/// fields. Each file replaces the table of the same name.
///
/// The request is all or nothing: every file is parsed before any table is replaced.
pub async fn upload_datasets(
    State(state): State<Arc<AppState>>,
    mut multipart: Multipart,
) -> Result<Json<DatasetStatus>, AppError> {
    let mut tables = Vec::new();
    while let Some(field) = multipart.next_field().await? {
        let file_name = field
            .file_name()
            .or(field.name())
            .map(str::to_string)
            .ok_or_else(|| AppError::BadRequest("upload field has no file name".to_string()))?;
        let bytes = field.bytes().await?;

        let table = load_upload(&file_name, bytes.as_ref())?;
        tracing::info!(table = %table.kind(), rows = table.len(), %file_name, "Upload parsed.");
        tables.push(table);
    }

    if tables.is_empty() {
        return Err(AppError::BadRequest("no files were uploaded".to_string()));
    }

    let snapshot = {
        let mut workspace = state.workspace.write().await;
        workspace.replace_tables(tables);
        workspace.snapshot()
    };
    if let Ok(snapshot) = snapshot {
        state.dashboard.warn_unknown_locations(&snapshot);
    }
    Ok(Json(dataset_status(&state).await))
}

/// Resolves the query and runs the pipeline off the async runtime, bounded by the
/// configured request timeout.
///
/// The timeout bounds the response only. A blocking task cannot be cancelled, so an
/// overrunning computation keeps its thread until it finishes and its result is dropped.
async fn compute_view(state: &AppState, params: DashboardParams) -> Result<DashboardView, AppError> {
    let query = state.dashboard.resolve_query(params.into())?;
    let snapshot = state.workspace.read().await.snapshot()?;
    let dashboard = state.dashboard.clone();

    let task = tokio::task::spawn_blocking(move || dashboard.build_view(&snapshot, &query));
    match tokio::time::timeout(state.request_timeout, task).await {
        Ok(Ok(view)) => Ok(view?),
        Ok(Err(join_err)) => Err(AppError::Internal(join_err.to_string())),
        Err(_) => Err(AppError::Timeout(state.request_timeout.as_secs())),
    }
}

/// # GET /api/dashboard
/// The KPIs, chart series, tables and recommendations for the selected filters.
pub async fn get_dashboard(
    State(state): State<Arc<AppState>>,
    Query(params): Query<DashboardParams>,
) -> Result<Json<DashboardView>, AppError> {
    Ok(Json(compute_view(&state, params).await?))
}

/// # GET /api/export/:file_name
/// One of the dashboard tables as a CSV download.
pub async fn export_table(
    State(state): State<Arc<AppState>>,
    Path(file_name): Path<String>,
    Query(params): Query<DashboardParams>,
) -> Result<impl IntoResponse, AppError> {
    let table = ExportTable::from_file_name(&file_name)
        .ok_or_else(|| AppError::NotFound(format!("no export named '{file_name}'")))?;
    let view = compute_view(&state, params).await?;
    let body = view.export_csv(table)?;

    Ok((
        [
            (header::CONTENT_TYPE, "text/csv".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}\"", table.file_name()),
            ),
        ],
        body,
    ))
}

/// # GET /api/products/:product_id
/// Stock, revenue, profit and movement of a single product.
pub async fn get_product(
    State(state): State<Arc<AppState>>,
    Path(product_id): Path<String>,
) -> Result<Json<ProductMetrics>, AppError> {
    let snapshot = state.workspace.read().await.snapshot()?;
    let metrics = state
        .dashboard
        .product_metrics(&snapshot, &ProductId::new(product_id))?;
    Ok(Json(metrics))
}

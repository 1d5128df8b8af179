use axum::{
    extract::DefaultBodyLimit,
    routing::get,
    Router,
};
use configuration::{Config, DatasetPaths};
use dashboard::{Dashboard, Workspace};
use dataset::loader::load_table_file;
use dataset::TableKind;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;
use tower_http::{
    cors::{AllowHeaders, AllowOrigin, Any, CorsLayer, ExposeHeaders},
    trace::TraceLayer,
};

pub mod error;
pub mod handlers;

/// The shared application state that all handlers can access.
pub struct AppState {
    /// Uploads take the write lock only while swapping in a parsed table.
    pub workspace: RwLock<Workspace>,
    pub dashboard: Dashboard,
    pub request_timeout: Duration,
}

impl AppState {
    pub fn new(workspace: Workspace, dashboard: Dashboard, request_timeout: Duration) -> Self {
        Self {
            workspace: RwLock::new(workspace),
            dashboard,
            request_timeout,
        }
    }

    pub fn from_config(config: &Config) -> anyhow::Result<Self> {
        let dashboard = Dashboard::from_config(config)?;
        let workspace = preload_workspace(&config.datasets)?;
        if let Ok(snapshot) = workspace.snapshot() {
            dashboard.warn_unknown_locations(&snapshot);
        }
        Ok(Self::new(
            workspace,
            dashboard,
            Duration::from_secs(config.server.request_timeout_secs),
        ))
    }
}

/// Loads every table that has a configured path. Tables without one wait for an upload.
pub fn preload_workspace(paths: &DatasetPaths) -> anyhow::Result<Workspace> {
    let mut tables = Vec::new();
    for (kind, path) in [
        (TableKind::Products, &paths.products),
        (TableKind::Sales, &paths.sales),
        (TableKind::Purchases, &paths.purchases),
    ] {
        let Some(path) = path else {
            tracing::info!(table = %kind, "No file configured; waiting for an upload.");
            continue;
        };
        let table = load_table_file(kind, path)?;
        if table.is_empty() {
            tracing::warn!(table = %kind, path = %path.display(), "Preloaded table has no rows.");
        }
        tracing::info!(table = %kind, rows = table.len(), path = %path.display(), "Table preloaded.");
        tables.push(table);
    }

    let mut workspace = Workspace::new();
    workspace.replace_tables(tables);
    Ok(workspace)
}

/// Builds the application router with its middleware stack.
pub fn build_router(state: Arc<AppState>, body_limit_bytes: usize) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(AllowOrigin::any())
        .allow_methods(Any)
        .allow_headers(AllowHeaders::any())
        .expose_headers(ExposeHeaders::any());

    Router::new()
        .route("/api/health", get(|| async { "OK" }))
        .route("/api/datasets", get(handlers::get_datasets).post(handlers::upload_datasets))
        .route("/api/dashboard", get(handlers::get_dashboard))
        .route("/api/export/:file_name", get(handlers::export_table))
        .route("/api/products/:product_id", get(handlers::get_product))
        .with_state(state)
        .layer(cors)
        // Logs information about every incoming request.
        .layer(TraceLayer::new_for_http())
        .layer(DefaultBodyLimit::max(body_limit_bytes))
}

/// The main function to configure and run the web server.
pub async fn run_server(config: Config) -> anyhow::Result<()> {
    // Tracing is initialized by the binary.
    let state = Arc::new(AppState::from_config(&config)?);
    let app = build_router(state, config.server.body_limit_bytes);

    let addr = config.server.addr;
    tracing::info!("Web server started and listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}


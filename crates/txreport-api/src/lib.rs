//! HTTP API server with HTMX support
//!
//! Routes are organized into modules:
//! - routes::report: Transaction report snapshot, user intents, page and fragments
//! - routes::settings: Configuration display

pub mod error;
pub mod routes;

use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tokio::sync::{mpsc, RwLock};
use tower_http::cors::CorsLayer;
use txreport_config::Config;
use txreport_core::pipeline::normalize_term;
use txreport_core::{Debouncer, ReportSnapshot, ReportView};

pub use error::ApiError;

/// Application state
#[derive(Clone)]
pub struct AppState {
    pub view: Arc<RwLock<ReportView>>,
    pub config: Config,
    pub search: Debouncer,
}

impl AppState {
    /// Wrap `view` and start the search debouncer. Must be called inside a tokio runtime.
    pub fn new(view: ReportView, config: Config) -> Self {
        let view = Arc::new(RwLock::new(view));
        let window = Duration::from_millis(config.search.debounce_ms);
        let (search, settled) = Debouncer::new(window);
        tokio::spawn(apply_search_terms(view.clone(), settled));
        Self { view, config, search }
    }
}

/// Apply settled search terms to the view as they arrive
async fn apply_search_terms(view: Arc<RwLock<ReportView>>, mut settled: mpsc::UnboundedReceiver<String>) {
    while let Some(term) = settled.recv().await {
        let mut view = view.write().await;
        if view.search_term() != normalize_term(&term) {
            log::debug!("Applying search term {:?}", term);
            view.set_search_term(&term);
        }
    }
}

/// Run one load against the view's source.
///
/// The lock is released while fetching so the view stays readable, and a
/// newer load started meanwhile wins over this one.
pub async fn reload(state: &AppState) -> ReportSnapshot {
    let (ticket, source) = {
        let mut view = state.view.write().await;
        (view.begin_load(), view.source())
    };

    let result = source.fetch_all().await;

    let mut view = state.view.write().await;
    if !view.finish_load(ticket, result) {
        log::debug!("Discarded superseded load from {}", source.location());
    }
    view.snapshot()
}

/// Create the application router
pub fn create_router(state: AppState) -> Router {
    use routes::report::{
        api_load, api_page, api_report, api_search, api_sort, api_sort_options, api_type,
        htmx_report_reload, htmx_report_table, page_report,
    };
    use routes::settings::api_settings;

    Router::new()
        // API endpoints
        .route("/api/health", get(health_check))
        .route("/api/report", get(api_report))
        .route("/api/sort-options", get(api_sort_options))
        .route("/api/load", post(api_load))
        .route("/api/search", post(api_search))
        .route("/api/type", post(api_type))
        .route("/api/sort", post(api_sort))
        .route("/api/page", post(api_page))
        .route("/api/settings", get(api_settings))
        // HTMX page routes
        .route("/", get(page_report))
        .route("/report/table", get(htmx_report_table))
        .route("/report/reload", post(htmx_report_reload))
        .fallback(not_found)
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Health check endpoint
async fn health_check() -> &'static str {
    "OK"
}

/// Fallback for unknown routes
async fn not_found(uri: axum::http::Uri) -> ApiError {
    ApiError::NotFound { resource: uri.path().to_string() }
}

// ==================== Template Functions ====================

/// Base HTML template
pub fn base_html(title: &str, content: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>{} - Transaction Report</title>
    <script src="https://unpkg.com/htmx.org@1.9.10"></script>
    <script src="https://cdn.tailwindcss.com"></script>
    <style>
        .htmx-indicator {{ opacity: 0; transition: opacity 0.3s; }}
        .htmx-request .htmx-indicator {{ opacity: 1; }}
        .htmx-request.htmx-indicator {{ opacity: 1; }}
    </style>
</head>
<body class="bg-gray-50 text-gray-900">
    <main class="max-w-7xl mx-auto p-6">
    {}
    </main>
</body>
</html>"#,
        txreport_utils::sanitize_html(title),
        content
    )
}

/// Start the server
pub async fn start_server(state: AppState) -> std::io::Result<()> {
    let addr = format!("{}:{}", state.config.server.host, state.config.server.port);
    let app = create_router(state);

    let listener = TcpListener::bind(&addr).await?;
    log::info!("Server running on http://{}", addr);

    axum::serve(listener, app).await
}

//! Settings API endpoint - JSON API

use crate::AppState;

pub async fn api_settings(state: axum::extract::State<AppState>) -> axum::Json<txreport_config::Config> {
    axum::Json(state.config.clone())
}

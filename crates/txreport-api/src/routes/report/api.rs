//! Report API endpoints - JSON API
//!
//! Endpoints:
//! - api_report: Current report snapshot
//! - api_sort_options: Sort options menu
//! - api_load: Reload from the source
//! - api_search: Push a raw search term through the debouncer
//! - api_type: Set the type filter
//! - api_sort: Set the sort key
//! - api_page: Set or navigate the page index

use crate::{ApiError, AppState};
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use txreport_core::{
    PageNav, ReportSnapshot, SortDirection, SortField, SortKey, SortOption, TypeFilter, SORT_OPTIONS,
};

#[derive(Debug, Deserialize)]
pub struct SearchRequest {
    #[serde(default)]
    pub term: String,
}

#[derive(Debug, Deserialize)]
pub struct TypeRequest {
    #[serde(rename = "type")]
    pub type_filter: String,
}

/// Either `sort` ("amount-desc") or `field` plus `direction`
#[derive(Debug, Deserialize)]
pub struct SortRequest {
    pub sort: Option<String>,
    pub field: Option<String>,
    pub direction: Option<String>,
}

/// Either an absolute `index` or a `nav` action
#[derive(Debug, Deserialize)]
pub struct PageRequest {
    pub index: Option<usize>,
    pub nav: Option<String>,
}

pub(crate) fn parse_type_filter(value: &str) -> Result<TypeFilter, ApiError> {
    value.parse().map_err(ApiError::bad_request)
}

pub(crate) fn parse_sort_key(value: &str) -> Result<SortKey, ApiError> {
    value.parse().map_err(ApiError::bad_request)
}

pub(crate) fn parse_page_nav(value: &str) -> Result<PageNav, ApiError> {
    value.parse().map_err(ApiError::bad_request)
}

impl SortRequest {
    fn key(&self) -> Result<SortKey, ApiError> {
        match (&self.sort, &self.field, &self.direction) {
            (Some(sort), _, _) => parse_sort_key(sort),
            (None, Some(field), Some(direction)) => {
                let field: SortField = field.parse().map_err(ApiError::bad_request)?;
                let direction: SortDirection = direction.parse().map_err(ApiError::bad_request)?;
                Ok(SortKey::new(field, direction))
            }
            _ => Err(ApiError::bad_request("Expected sort, or field and direction")),
        }
    }
}

/// Get the current report (JSON API)
pub async fn api_report(state: axum::extract::State<AppState>) -> Json<ReportSnapshot> {
    let view = state.view.read().await;
    Json(view.snapshot())
}

/// Get the sort options menu (JSON API)
pub async fn api_sort_options() -> Json<&'static [SortOption]> {
    Json(&SORT_OPTIONS[..])
}

/// Reload transactions from the source (JSON API)
pub async fn api_load(state: axum::extract::State<AppState>) -> Json<ReportSnapshot> {
    Json(crate::reload(&state).await)
}

/// Accept a raw search term; it is applied once input settles
pub async fn api_search(
    state: axum::extract::State<AppState>,
    Json(request): Json<SearchRequest>,
) -> Result<StatusCode, ApiError> {
    if state.search.push(request.term) {
        Ok(StatusCode::ACCEPTED)
    } else {
        Err(ApiError::InternalError)
    }
}

/// Set the type filter (JSON API)
pub async fn api_type(
    state: axum::extract::State<AppState>,
    Json(request): Json<TypeRequest>,
) -> Result<Json<ReportSnapshot>, ApiError> {
    let type_filter = parse_type_filter(&request.type_filter)?;
    let mut view = state.view.write().await;
    view.set_type_filter(type_filter);
    Ok(Json(view.snapshot()))
}

/// Set the active sort (JSON API)
pub async fn api_sort(
    state: axum::extract::State<AppState>,
    Json(request): Json<SortRequest>,
) -> Result<Json<ReportSnapshot>, ApiError> {
    let key = request.key()?;
    let mut view = state.view.write().await;
    view.set_sort_key(key);
    Ok(Json(view.snapshot()))
}

/// Set the page index or navigate (JSON API)
pub async fn api_page(
    state: axum::extract::State<AppState>,
    Json(request): Json<PageRequest>,
) -> Result<Json<ReportSnapshot>, ApiError> {
    let mut view = state.view.write().await;
    match (request.index, request.nav.as_deref()) {
        (Some(index), _) => view.set_page(index),
        (None, Some(nav)) => {
            view.navigate(parse_page_nav(nav)?);
        }
        (None, None) => return Err(ApiError::bad_request("Expected index or nav")),
    }
    Ok(Json(view.snapshot()))
}

//! Report routes - transaction list, search, type filter, sort, pagination
//!
//! Structure:
//! - api.rs: JSON API endpoints (snapshot and user intents)
//! - page.rs: Full page and HTMX fragment rendering

pub mod api;
pub mod page;

pub use api::{
    api_report,
    api_sort_options,
    api_load,
    api_search,
    api_type,
    api_sort,
    api_page,
};

pub use page::{
    page_report,
    htmx_report_table,
    htmx_report_reload,
};

//! Route modules for the API server
//!
//! - report: transaction report (JSON intents and HTMX page)
//! - settings: active configuration
//!
//! The report module follows the usual split:
//! - mod.rs: Module declaration and exports
//! - api.rs: JSON API endpoints
//! - page.rs: HTMX page rendering

pub mod report;
pub mod settings;

//! Transaction report core
//!
//! - `source`: data source adapter (file or HTTP JSON) with type coercion
//! - `view`: report view-model (load state, filter/sort/page state, derived outputs)
//! - `pipeline`: the pure filter/sort/paginate/summarize functions behind the view
//! - `pagination`: page arithmetic and first/prev/next/last navigation
//! - `debounce`: quiescence-window debouncing for search input

pub mod debounce;
pub mod error;
pub mod models;
pub mod pagination;
pub mod pipeline;
pub mod source;
pub mod types;
pub mod view;

pub use debounce::Debouncer;
pub use error::{CoreError, CoreResult, ErrorCode, ErrorLogger, LOAD_FAILURE_MESSAGE};
pub use models::{Transaction, TransactionType, TypeFilter};
pub use pagination::{PageControls, PageNav};
pub use pipeline::Totals;
pub use source::{source_from_config, FileSource, HttpSource, SourceRef, TransactionSource};
pub use types::{SortDirection, SortField, SortKey, SortOption, SORT_OPTIONS};
pub use view::{LoadState, LoadTicket, ReportSnapshot, ReportView};

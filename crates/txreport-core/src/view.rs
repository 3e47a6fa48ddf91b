//! Report view-model
//!
//! Owns the full transaction set and the user's view state (search term,
//! type filter, sort, page) and keeps the derived outputs in step with them.
//! Derived state is always rebuilt from its inputs, never patched.
//!
//! Loading is a small state machine:
//!
//! ```text
//! Idle -> Loading -> Ready
//!                 \-> Failed
//! Ready | Failed -> Loading   (explicit reload only)
//! ```
//!
//! Every `begin_load` hands out a ticket and supersedes all earlier ones, so
//! a slow response that arrives after a newer load started is discarded.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::{CoreResult, DefaultErrorLogger, ErrorContext, ErrorLogger};
use crate::models::{Transaction, TypeFilter};
use crate::pagination::{PageControls, PageNav};
use crate::pipeline::{self, FilterCriteria, Totals};
use crate::source::SourceRef;
use crate::types::{SortDirection, SortField, SortKey};

/// Default number of rows per page
pub const DEFAULT_PAGE_SIZE: usize = 10;

/// Load lifecycle of the view
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LoadState {
    #[default]
    Idle,
    Loading,
    Ready,
    Failed,
}

/// Identifies one load attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadTicket(u64);

/// Everything the rendering surface reads
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportSnapshot {
    pub state: LoadState,
    pub loading: bool,
    pub error: Option<String>,
    pub page_items: Vec<Transaction>,
    #[serde(with = "rust_decimal::serde::float")]
    pub total_credit: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub total_debit: Decimal,
    pub total_pages: usize,
    pub page_index: usize,
    pub page_size: usize,
    pub filtered_count: usize,
    pub active_sort: SortKey,
    pub active_sort_label: &'static str,
    pub search_term: String,
    pub type_filter: TypeFilter,
}

/// Report view-model
pub struct ReportView {
    source: SourceRef,
    logger: Box<dyn ErrorLogger>,

    state: LoadState,
    error: Option<String>,
    generation: u64,

    all: Vec<Transaction>,

    criteria: FilterCriteria,
    sort: SortKey,
    page_index: usize,
    page_size: usize,

    // derived
    filtered: Vec<Transaction>,
    totals: Totals,
}

impl ReportView {
    /// Create a view over `source` with default view state
    pub fn new(source: SourceRef) -> Self {
        Self {
            source,
            logger: Box::new(DefaultErrorLogger),
            state: LoadState::Idle,
            error: None,
            generation: 0,
            all: Vec::new(),
            criteria: FilterCriteria::default(),
            sort: SortKey::default(),
            page_index: 0,
            page_size: DEFAULT_PAGE_SIZE,
            filtered: Vec::new(),
            totals: Totals::default(),
        }
    }

    /// Use a fixed page size. Zero is treated as one.
    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size.max(1);
        self
    }

    /// Report load failures through `logger`
    pub fn with_logger(mut self, logger: Box<dyn ErrorLogger>) -> Self {
        self.logger = logger;
        self
    }

    // ==================== Loading ====================

    /// Load the full set from the source, replacing any previous set
    pub async fn load(&mut self) -> LoadState {
        let ticket = self.begin_load();
        let result = self.source.fetch_all().await;
        self.finish_load(ticket, result);
        self.state
    }

    /// Enter `Loading` and supersede any load already in flight
    pub fn begin_load(&mut self) -> LoadTicket {
        self.generation += 1;
        self.state = LoadState::Loading;
        self.error = None;
        log::info!("Loading transactions from {} (load #{})", self.source.location(), self.generation);
        LoadTicket(self.generation)
    }

    /// Apply the result of the load identified by `ticket`.
    ///
    /// Returns `false` and leaves the view untouched when a newer load has
    /// started since `ticket` was issued.
    pub fn finish_load(&mut self, ticket: LoadTicket, result: CoreResult<Vec<Transaction>>) -> bool {
        if ticket.0 != self.generation {
            log::debug!(
                "Discarding result of load #{} superseded by load #{}",
                ticket.0,
                self.generation
            );
            return false;
        }

        match result {
            Ok(transactions) => {
                log::info!("Loaded {} transactions", transactions.len());
                self.all = transactions;
                self.state = LoadState::Ready;
                self.error = None;
            }
            Err(e) => {
                let context = ErrorContext::new("load_transactions")
                    .with_data("load", serde_json::json!(ticket.0));
                self.logger.log_error(&e, &context);
                self.all.clear();
                self.state = LoadState::Failed;
                self.error = Some(e.user_message().to_string());
            }
        }

        self.recompute();
        true
    }

    /// Source the view loads from
    pub fn source(&self) -> SourceRef {
        self.source.clone()
    }

    // ==================== User intents ====================

    /// Set the search term (trimmed, case-folded) and return to the first page
    pub fn set_search_term(&mut self, term: &str) {
        self.criteria.term = pipeline::normalize_term(term);
        self.page_index = 0;
        self.recompute();
    }

    /// Set the type filter and return to the first page
    pub fn set_type_filter(&mut self, type_filter: TypeFilter) {
        self.criteria.type_filter = type_filter;
        self.page_index = 0;
        self.recompute();
    }

    /// Sort by `field` in `direction`; the page index is kept
    pub fn set_sort(&mut self, field: SortField, direction: SortDirection) {
        self.set_sort_key(SortKey::new(field, direction));
    }

    pub fn set_sort_key(&mut self, key: SortKey) {
        self.sort = key;
        self.recompute();
    }

    /// Move to `index`. Out-of-range pages render empty.
    pub fn set_page(&mut self, index: usize) {
        self.page_index = index;
    }

    /// Apply a pagination control action; returns whether the page changed
    pub fn navigate(&mut self, nav: PageNav) -> bool {
        match self.page_controls().target(nav) {
            Some(index) => {
                self.set_page(index);
                true
            }
            None => false,
        }
    }

    // ==================== Derived outputs ====================

    fn recompute(&mut self) {
        let mut filtered = pipeline::filter_transactions(&self.all, &self.criteria);
        pipeline::sort_transactions(&mut filtered, self.sort);
        self.totals = pipeline::summarize(&filtered);
        self.filtered = filtered;
    }

    pub fn state(&self) -> LoadState {
        self.state
    }

    pub fn loading(&self) -> bool {
        self.state == LoadState::Loading
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Full set as last loaded
    pub fn all(&self) -> &[Transaction] {
        &self.all
    }

    /// Filtered and sorted set, before pagination
    pub fn filtered(&self) -> &[Transaction] {
        &self.filtered
    }

    /// Rows of the current page
    pub fn page_items(&self) -> &[Transaction] {
        pipeline::page_slice(&self.filtered, self.page_size, self.page_index)
    }

    pub fn total_credit(&self) -> Decimal {
        self.totals.total_credit
    }

    pub fn total_debit(&self) -> Decimal {
        self.totals.total_debit
    }

    pub fn totals(&self) -> Totals {
        self.totals
    }

    pub fn total_pages(&self) -> usize {
        self.page_controls().total_pages()
    }

    pub fn page_index(&self) -> usize {
        self.page_index
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    pub fn active_sort(&self) -> SortKey {
        self.sort
    }

    /// Normalized search term
    pub fn search_term(&self) -> &str {
        &self.criteria.term
    }

    pub fn type_filter(&self) -> TypeFilter {
        self.criteria.type_filter
    }

    pub fn page_controls(&self) -> PageControls {
        PageControls::new(self.filtered.len(), self.page_size, self.page_index)
    }

    /// Copy of everything the rendering surface needs
    pub fn snapshot(&self) -> ReportSnapshot {
        ReportSnapshot {
            state: self.state,
            loading: self.loading(),
            error: self.error.clone(),
            page_items: self.page_items().to_vec(),
            total_credit: self.totals.total_credit,
            total_debit: self.totals.total_debit,
            total_pages: self.total_pages(),
            page_index: self.page_index,
            page_size: self.page_size,
            filtered_count: self.filtered.len(),
            active_sort: self.sort,
            active_sort_label: self.sort.label(),
            search_term: self.criteria.term.clone(),
            type_filter: self.criteria.type_filter,
        }
    }
}

// ==================== Tests ====================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{CoreError, ErrorCode};
    use crate::models::TransactionType;
    use crate::source::{decode_transactions, TransactionSource};
    use async_trait::async_trait;
    use std::sync::{Arc, Mutex};

    const SCENARIO: &str = r#"[
        {"id": 1, "date": "2024-01-01", "voucherNo": "V-1", "accountId": "A-1",
         "accountName": "Alpha", "branch": "North", "type": "Credit", "amount": 100},
        {"id": 2, "date": "2024-02-01", "voucherNo": "V-2", "accountId": "A-2",
         "accountName": "Beta", "branch": "South", "type": "Debit", "amount": "50"}
    ]"#;

    struct StaticSource {
        result: Mutex<Option<CoreResult<Vec<Transaction>>>>,
    }

    impl StaticSource {
        fn ok(payload: &str) -> Arc<Self> {
            Arc::new(Self {
                result: Mutex::new(Some(decode_transactions(payload, "memory"))),
            })
        }

        fn failing() -> Arc<Self> {
            Arc::new(Self {
                result: Mutex::new(Some(Err(CoreError::fetch("memory", "connection reset")))),
            })
        }
    }

    #[async_trait]
    impl TransactionSource for StaticSource {
        async fn fetch_all(&self) -> CoreResult<Vec<Transaction>> {
            self.result
                .lock()
                .unwrap()
                .take()
                .unwrap_or_else(|| Err(CoreError::fetch("memory", "exhausted")))
        }

        fn location(&self) -> String {
            "memory".to_string()
        }
    }

    #[derive(Default)]
    struct RecordingLogger {
        errors: Arc<Mutex<Vec<ErrorCode>>>,
    }

    impl ErrorLogger for RecordingLogger {
        fn log_error(&self, error: &CoreError, _context: &ErrorContext) {
            self.errors.lock().unwrap().push(error.code());
        }
    }

    fn many(count: i64) -> Vec<Transaction> {
        (1..=count)
            .map(|id| Transaction {
                id,
                date: crate::source::parse_date("2024-01-01").unwrap() + chrono::Duration::days(id),
                voucher_no: format!("V-{id}"),
                account_id: format!("A-{id}"),
                account_name: if id % 2 == 0 { "Even".to_string() } else { "Odd".to_string() },
                branch: "Main".to_string(),
                transaction_type: if id % 3 == 0 { TransactionType::Debit } else { TransactionType::Credit },
                amount: Decimal::from(id),
            })
            .collect()
    }

    async fn ready_view() -> ReportView {
        let mut view = ReportView::new(StaticSource::ok(SCENARIO));
        assert_eq!(view.load().await, LoadState::Ready);
        view
    }

    fn page_ids(view: &ReportView) -> Vec<i64> {
        view.page_items().iter().map(|t| t.id).collect()
    }

    #[test]
    fn test_initial_state() {
        let view = ReportView::new(StaticSource::ok("[]"));
        assert_eq!(view.state(), LoadState::Idle);
        assert!(!view.loading());
        assert!(view.error().is_none());
        assert_eq!(view.active_sort().to_string(), "date-desc");
        assert_eq!(view.type_filter(), TypeFilter::All);
        assert_eq!(view.page_index(), 0);
        assert_eq!(view.page_size(), DEFAULT_PAGE_SIZE);
        assert_eq!(view.total_pages(), 1);
        assert!(view.page_items().is_empty());
    }

    #[tokio::test]
    async fn test_default_scenario() {
        let view = ready_view().await;
        assert_eq!(page_ids(&view), vec![2, 1]);
        assert_eq!(view.total_credit(), Decimal::from(100));
        assert_eq!(view.total_debit(), Decimal::from(50));
        assert_eq!(view.total_pages(), 1);
    }

    #[tokio::test]
    async fn test_credit_filter_scenario() {
        let mut view = ready_view().await;
        view.set_type_filter(TypeFilter::Credit);
        assert_eq!(page_ids(&view), vec![1]);
        assert_eq!(view.total_debit(), Decimal::ZERO);
        assert_eq!(view.total_credit(), Decimal::from(100));
    }

    #[tokio::test]
    async fn test_no_match_scenario() {
        let mut view = ready_view().await;
        view.set_search_term("zzz");
        assert!(view.page_items().is_empty());
        assert_eq!(view.total_credit(), Decimal::ZERO);
        assert_eq!(view.total_debit(), Decimal::ZERO);
        assert_eq!(view.total_pages(), 1);
    }

    #[tokio::test]
    async fn test_out_of_range_page_is_empty() {
        let mut view = ready_view().await;
        view.set_page(5);
        assert!(view.page_items().is_empty());
        assert_eq!(view.page_index(), 5);
        assert_eq!(view.total_credit(), Decimal::from(100));
    }

    #[tokio::test]
    async fn test_failed_load_scenario() {
        let errors = Arc::new(Mutex::new(Vec::new()));
        let logger = RecordingLogger { errors: errors.clone() };
        let mut view = ReportView::new(StaticSource::failing()).with_logger(Box::new(logger));

        assert_eq!(view.load().await, LoadState::Failed);
        assert!(!view.loading());
        let message = view.error().unwrap();
        assert!(!message.is_empty());
        assert!(!message.contains("connection reset"));
        assert!(view.page_items().is_empty());
        assert_eq!(*errors.lock().unwrap(), vec![ErrorCode::FetchFailed]);
    }

    #[tokio::test]
    async fn test_failed_reload_clears_previous_data() {
        let mut view = ready_view().await;
        assert_eq!(view.all().len(), 2);

        // the static source yields once, so a second load fails
        assert_eq!(view.load().await, LoadState::Failed);
        assert!(view.all().is_empty());
        assert!(view.filtered().is_empty());
        assert_eq!(view.total_credit(), Decimal::ZERO);
    }

    #[tokio::test]
    async fn test_search_matches_account_name_case_insensitively() {
        let mut view = ready_view().await;
        view.set_search_term("  ALP ");
        assert_eq!(view.search_term(), "alp");
        assert_eq!(page_ids(&view), vec![1]);
    }

    #[test]
    fn test_intents_reset_page() {
        let mut view = ReportView::new(StaticSource::ok("[]")).with_page_size(5);
        let ticket = view.begin_load();
        assert!(view.finish_load(ticket, Ok(many(23))));
        assert_eq!(view.total_pages(), 5);

        view.set_page(3);
        view.set_search_term("even");
        assert_eq!(view.page_index(), 0);

        view.set_page(2);
        view.set_type_filter(TypeFilter::Debit);
        assert_eq!(view.page_index(), 0);

        view.set_page(1);
        view.set_sort(SortField::Amount, SortDirection::Asc);
        assert_eq!(view.page_index(), 1);
    }

    #[test]
    fn test_sort_does_not_change_totals_or_membership() {
        let mut view = ReportView::new(StaticSource::ok("[]")).with_page_size(4);
        let ticket = view.begin_load();
        view.finish_load(ticket, Ok(many(10)));
        let totals = view.totals();
        let mut before: Vec<i64> = view.filtered().iter().map(|t| t.id).collect();

        view.set_sort(SortField::Amount, SortDirection::Asc);
        assert_eq!(page_ids(&view), vec![1, 2, 3, 4]);
        assert_eq!(view.totals(), totals);

        let mut after: Vec<i64> = view.filtered().iter().map(|t| t.id).collect();
        before.sort();
        after.sort();
        assert_eq!(before, after);
    }

    #[test]
    fn test_sort_is_stable_for_equal_names() {
        let mut view = ReportView::new(StaticSource::ok("[]"));
        let ticket = view.begin_load();
        view.finish_load(ticket, Ok(many(6)));

        view.set_sort(SortField::AccountName, SortDirection::Asc);
        let ids: Vec<i64> = view.filtered().iter().map(|t| t.id).collect();
        // ties keep load order, not the order of the previous sort
        assert_eq!(ids, vec![2, 4, 6, 1, 3, 5]);
    }

    #[test]
    fn test_pagination_slices() {
        let mut view = ReportView::new(StaticSource::ok("[]")).with_page_size(10);
        let ticket = view.begin_load();
        view.finish_load(ticket, Ok(many(25)));
        view.set_sort(SortField::Id, SortDirection::Asc);

        assert_eq!(view.total_pages(), 3);
        assert_eq!(view.page_items().len(), 10);
        view.set_page(2);
        assert_eq!(page_ids(&view), vec![21, 22, 23, 24, 25]);
        view.set_page(3);
        assert!(view.page_items().is_empty());
    }

    #[test]
    fn test_navigate() {
        let mut view = ReportView::new(StaticSource::ok("[]")).with_page_size(10);
        let ticket = view.begin_load();
        view.finish_load(ticket, Ok(many(25)));

        assert!(!view.navigate(PageNav::Prev));
        assert!(view.navigate(PageNav::Next));
        assert_eq!(view.page_index(), 1);
        assert!(view.navigate(PageNav::Last));
        assert_eq!(view.page_index(), 2);
        assert!(!view.navigate(PageNav::Next));
        assert!(view.navigate(PageNav::First));
        assert_eq!(view.page_index(), 0);
    }

    #[test]
    fn test_superseded_load_is_discarded() {
        let mut view = ReportView::new(StaticSource::ok("[]"));

        let first = view.begin_load();
        let second = view.begin_load();
        assert!(view.loading());

        assert!(view.finish_load(second, Ok(many(3))));
        assert_eq!(view.state(), LoadState::Ready);

        // the older response arrives late and must not win
        assert!(!view.finish_load(first, Err(CoreError::fetch("memory", "timeout"))));
        assert_eq!(view.state(), LoadState::Ready);
        assert_eq!(view.all().len(), 3);
        assert!(view.error().is_none());
    }

    #[test]
    fn test_begin_load_clears_error() {
        let mut view = ReportView::new(StaticSource::ok("[]"))
            .with_logger(Box::new(RecordingLogger::default()));
        let ticket = view.begin_load();
        view.finish_load(ticket, Err(CoreError::decode("memory", "bad")));
        assert_eq!(view.state(), LoadState::Failed);

        view.begin_load();
        assert_eq!(view.state(), LoadState::Loading);
        assert!(view.error().is_none());
    }

    #[test]
    fn test_summary_covers_filtered_set_not_page() {
        let mut view = ReportView::new(StaticSource::ok("[]")).with_page_size(2);
        let ticket = view.begin_load();
        view.finish_load(ticket, Ok(many(9)));

        let sum: Decimal = view.filtered().iter().map(|t| t.amount).sum();
        assert_eq!(view.total_credit() + view.total_debit(), sum);
        assert_eq!(sum, Decimal::from(45));
        // debits are ids 3, 6, 9
        assert_eq!(view.total_debit(), Decimal::from(18));
    }

    #[tokio::test]
    async fn test_snapshot() {
        let mut view = ready_view().await;
        view.set_sort(SortField::Amount, SortDirection::Desc);
        let snapshot = view.snapshot();

        assert_eq!(snapshot.state, LoadState::Ready);
        assert!(!snapshot.loading);
        assert_eq!(snapshot.filtered_count, 2);
        assert_eq!(snapshot.active_sort_label, "Amount: High to Low");

        let json = serde_json::to_value(&snapshot).unwrap();
        assert_eq!(json["activeSort"], "amount-desc");
        assert_eq!(json["pageItems"][0]["id"], 1);
        assert_eq!(json["typeFilter"], "All");
        assert_eq!(json["totalPages"], 1);
    }

    #[tokio::test]
    async fn test_snapshot_amounts_are_numbers() {
        let payload = r#"[{"id": 7, "date": "2024-03-01", "voucherNo": "V-7", "accountId": "A-7",
            "accountName": "Gamma", "branch": "East", "type": "Credit", "amount": "100.5"}]"#;
        let mut view = ReportView::new(StaticSource::ok(payload));
        view.load().await;

        let json = serde_json::to_value(view.snapshot()).unwrap();
        assert!(json["totalCredit"].is_number());
        assert_eq!(json["totalCredit"], 100.5);
        assert_eq!(json["totalDebit"], 0.0);
        assert_eq!(json["pageItems"][0]["amount"], 100.5);
    }
}

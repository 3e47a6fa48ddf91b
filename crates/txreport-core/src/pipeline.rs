//! Filter, sort, paginate and summarize
//!
//! Pure functions over an in-memory transaction list. None of them can fail:
//! empty inputs, empty terms and out-of-range pages degrade to empty results.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::models::{Transaction, TransactionType, TypeFilter};
use crate::pagination::page_bounds;
use crate::types::SortKey;

/// Criteria a transaction must meet to appear in the report
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterCriteria {
    /// Trimmed, lower-cased search term; empty matches everything
    pub term: String,
    pub type_filter: TypeFilter,
}

impl FilterCriteria {
    pub fn new(term: &str, type_filter: TypeFilter) -> Self {
        Self {
            term: normalize_term(term),
            type_filter,
        }
    }

    /// Check if a transaction passes both the term and the type filter
    pub fn matches(&self, tx: &Transaction) -> bool {
        let matches_term = self.term.is_empty()
            || tx.account_name.to_lowercase().contains(&self.term);
        matches_term && self.type_filter.matches(tx.transaction_type)
    }
}

/// Trim and case-fold a search term
pub fn normalize_term(term: &str) -> String {
    term.trim().to_lowercase()
}

/// Transactions passing `criteria`, in their original order
pub fn filter_transactions(all: &[Transaction], criteria: &FilterCriteria) -> Vec<Transaction> {
    all.iter().filter(|tx| criteria.matches(tx)).cloned().collect()
}

/// Stable sort by `key`; equal keys keep their relative order
pub fn sort_transactions(transactions: &mut [Transaction], key: SortKey) {
    transactions.sort_by(|a, b| key.compare(a, b));
}

/// The page of `transactions` at `page_index`, empty when out of range
pub fn page_slice(transactions: &[Transaction], page_size: usize, page_index: usize) -> &[Transaction] {
    &transactions[page_bounds(transactions.len(), page_size, page_index)]
}

/// Credit and debit totals over a filtered set
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Totals {
    #[serde(with = "rust_decimal::serde::float")]
    pub total_credit: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub total_debit: Decimal,
}

impl Totals {
    /// Sum of both categories
    pub fn net(&self) -> Decimal {
        self.total_credit + self.total_debit
    }
}

/// Sum amounts per transaction type
pub fn summarize(transactions: &[Transaction]) -> Totals {
    transactions.iter().fold(Totals::default(), |mut totals, tx| {
        match tx.transaction_type {
            TransactionType::Credit => totals.total_credit += tx.amount,
            TransactionType::Debit => totals.total_debit += tx.amount,
        }
        totals
    })
}

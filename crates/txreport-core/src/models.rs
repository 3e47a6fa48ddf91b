//! Core data models for the transaction report

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Transaction direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TransactionType {
    Debit,
    Credit,
}

impl TransactionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionType::Debit => "Debit",
            TransactionType::Credit => "Credit",
        }
    }
}

impl std::str::FromStr for TransactionType {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Debit" => Ok(TransactionType::Debit),
            "Credit" => Ok(TransactionType::Credit),
            _ => Err(format!("Invalid transaction type: {}", s)),
        }
    }
}

impl std::fmt::Display for TransactionType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Transaction information
///
/// Immutable once loaded; a reload replaces the whole set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    /// Unique transaction identifier
    pub id: i64,
    /// Posting instant
    pub date: DateTime<Utc>,
    /// Voucher number
    pub voucher_no: String,
    /// Account identifier
    pub account_id: String,
    /// Account display name
    pub account_name: String,
    /// Branch the transaction was booked at
    pub branch: String,
    /// Debit or credit
    #[serde(rename = "type")]
    pub transaction_type: TransactionType,
    /// Signed amount, may be zero or negative
    #[serde(with = "rust_decimal::serde::float")]
    pub amount: Decimal,
}

impl Transaction {
    pub fn is_credit(&self) -> bool {
        self.transaction_type == TransactionType::Credit
    }

    pub fn is_debit(&self) -> bool {
        self.transaction_type == TransactionType::Debit
    }

    /// Calendar date in `YYYY-MM-DD` form
    pub fn date_label(&self) -> String {
        self.date.format("%Y-%m-%d").to_string()
    }
}

/// Type filter applied to the report
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum TypeFilter {
    #[default]
    All,
    Debit,
    Credit,
}

impl TypeFilter {
    /// Check if a transaction passes this filter
    pub fn matches(&self, transaction_type: TransactionType) -> bool {
        match self {
            TypeFilter::All => true,
            TypeFilter::Debit => transaction_type == TransactionType::Debit,
            TypeFilter::Credit => transaction_type == TransactionType::Credit,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            TypeFilter::All => "All",
            TypeFilter::Debit => "Debit",
            TypeFilter::Credit => "Credit",
        }
    }
}

impl std::str::FromStr for TypeFilter {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "All" | "all" => Ok(TypeFilter::All),
            "Debit" | "debit" => Ok(TypeFilter::Debit),
            "Credit" | "credit" => Ok(TypeFilter::Credit),
            _ => Err(format!("Invalid type filter: {}", s)),
        }
    }
}

impl std::fmt::Display for TypeFilter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn sample() -> Transaction {
        Transaction {
            id: 7,
            date: Utc.with_ymd_and_hms(2024, 3, 9, 14, 30, 0).unwrap(),
            voucher_no: "JV-0007".to_string(),
            account_id: "AC-100".to_string(),
            account_name: "Office Supplies".to_string(),
            branch: "Riyadh".to_string(),
            transaction_type: TransactionType::Debit,
            amount: Decimal::new(-1250, 2),
        }
    }

    #[test]
    fn test_transaction_type_from_str() {
        assert_eq!("Debit".parse::<TransactionType>().unwrap(), TransactionType::Debit);
        assert_eq!("Credit".parse::<TransactionType>().unwrap(), TransactionType::Credit);
        assert!("debit".parse::<TransactionType>().is_err());
    }

    #[test]
    fn test_type_filter_matches() {
        assert!(TypeFilter::All.matches(TransactionType::Debit));
        assert!(TypeFilter::All.matches(TransactionType::Credit));
        assert!(TypeFilter::Credit.matches(TransactionType::Credit));
        assert!(!TypeFilter::Credit.matches(TransactionType::Debit));
        assert_eq!(TypeFilter::default(), TypeFilter::All);
    }

    #[test]
    fn test_type_filter_from_str() {
        assert_eq!("All".parse::<TypeFilter>().unwrap(), TypeFilter::All);
        assert_eq!("credit".parse::<TypeFilter>().unwrap(), TypeFilter::Credit);
        assert!("Transfer".parse::<TypeFilter>().is_err());
    }

    #[test]
    fn test_transaction_methods() {
        let tx = sample();
        assert!(tx.is_debit());
        assert!(!tx.is_credit());
        assert_eq!(tx.date_label(), "2024-03-09");
    }

    #[test]
    fn test_transaction_serializes_camel_case() {
        let value = serde_json::to_value(sample()).unwrap();
        assert_eq!(value["voucherNo"], "JV-0007");
        assert_eq!(value["accountName"], "Office Supplies");
        assert_eq!(value["type"], "Debit");
    }
}

//! Data source adapter
//!
//! A source yields the full list of transactions in source order. The raw
//! payload is a JSON array of camelCase objects; `amount` and `id` may arrive
//! as strings and are coerced, dates accept several common layouts.

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use rust_decimal::Decimal;
use serde::Deserialize;
use std::path::PathBuf;
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;
use txreport_config::{Config, SourceConfig};

use crate::error::{CoreError, CoreResult};
use crate::models::{Transaction, TransactionType};

/// Source reference type
pub type SourceRef = Arc<dyn TransactionSource>;

/// Anything that can produce the full transaction list
#[async_trait]
pub trait TransactionSource: Send + Sync {
    /// Fetch every transaction, in source order
    async fn fetch_all(&self) -> CoreResult<Vec<Transaction>>;

    /// Human-readable location, used in logs
    fn location(&self) -> String;
}

// ==================== Raw payload ====================

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RawScalar {
    Number(serde_json::Number),
    Text(String),
}

impl RawScalar {
    fn as_text(&self) -> String {
        match self {
            RawScalar::Number(n) => n.to_string(),
            RawScalar::Text(s) => s.trim().to_string(),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawTransaction {
    id: RawScalar,
    date: String,
    voucher_no: String,
    account_id: String,
    account_name: String,
    branch: String,
    #[serde(rename = "type")]
    transaction_type: String,
    amount: RawScalar,
}

impl RawTransaction {
    fn into_transaction(self) -> Result<Transaction, String> {
        let id = parse_id(&self.id)?;
        Ok(Transaction {
            id,
            date: parse_date(&self.date).ok_or_else(|| format!("record {}: invalid date '{}'", id, self.date))?,
            voucher_no: self.voucher_no,
            account_id: self.account_id,
            account_name: self.account_name,
            branch: self.branch,
            transaction_type: TransactionType::from_str(self.transaction_type.trim())
                .map_err(|e| format!("record {}: {}", id, e))?,
            amount: parse_amount(&self.amount).map_err(|e| format!("record {}: {}", id, e))?,
        })
    }
}

fn parse_id(raw: &RawScalar) -> Result<i64, String> {
    let text = raw.as_text();
    text.parse::<i64>()
        .map_err(|_| format!("invalid id '{}'", text))
}

/// Coerce a JSON number or numeric string into a decimal. Blank is zero.
fn parse_amount(raw: &RawScalar) -> Result<Decimal, String> {
    let text = raw.as_text();
    if text.is_empty() {
        return Ok(Decimal::ZERO);
    }
    Decimal::from_str(&text)
        .or_else(|_| Decimal::from_scientific(&text))
        .map_err(|_| format!("invalid amount '{}'", text))
}

/// Parse the date layouts found in transaction exports. Offset-less values are UTC.
pub fn parse_date(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    for layout in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(raw, layout) {
            return Some(naive.and_utc());
        }
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

/// Decode a raw JSON payload into transactions
pub fn decode_transactions(payload: &str, location: &str) -> CoreResult<Vec<Transaction>> {
    let raw: Vec<RawTransaction> = serde_json::from_str(payload)
        .map_err(|e| CoreError::decode(location, e))?;

    raw.into_iter()
        .map(|record| record.into_transaction().map_err(|e| CoreError::decode(location, e)))
        .collect()
}

// ==================== Sources ====================

/// JSON file on the local filesystem
#[derive(Debug, Clone)]
pub struct FileSource {
    path: PathBuf,
}

impl FileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl TransactionSource for FileSource {
    async fn fetch_all(&self) -> CoreResult<Vec<Transaction>> {
        let location = self.location();
        let payload = tokio::fs::read_to_string(&self.path)
            .await
            .map_err(|e| CoreError::fetch(location.clone(), e))?;

        let transactions = decode_transactions(&payload, &location)?;
        log::debug!("Read {} transactions from {}", transactions.len(), location);
        Ok(transactions)
    }

    fn location(&self) -> String {
        self.path.to_string_lossy().to_string()
    }
}

/// JSON document served over HTTP
#[derive(Debug, Clone)]
pub struct HttpSource {
    client: reqwest::Client,
    url: String,
}

impl HttpSource {
    pub fn new(url: impl Into<String>, timeout: Duration) -> CoreResult<Self> {
        let url = url.into();
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| CoreError::fetch(url.clone(), e))?;
        Ok(Self { client, url })
    }
}

#[async_trait]
impl TransactionSource for HttpSource {
    async fn fetch_all(&self) -> CoreResult<Vec<Transaction>> {
        log::debug!("Fetching transactions from URL: {}", self.url);

        let response = self
            .client
            .get(&self.url)
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .map_err(|e| CoreError::fetch(self.url.clone(), e))?;

        let payload = response
            .text()
            .await
            .map_err(|e| CoreError::fetch(self.url.clone(), e))?;

        decode_transactions(&payload, &self.url)
    }

    fn location(&self) -> String {
        self.url.clone()
    }
}

/// Build the source described by the configuration
pub fn source_from_config(config: &Config, base: &std::path::Path) -> CoreResult<SourceRef> {
    let source: &SourceConfig = &config.source;
    if source.is_remote() {
        let http = HttpSource::new(source.location.trim(), Duration::from_secs(source.timeout_secs))?;
        Ok(Arc::new(http))
    } else {
        Ok(Arc::new(FileSource::new(config.source_path(base))))
    }
}

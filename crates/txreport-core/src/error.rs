//! Error types for txreport-core
//!
//! Loading is the only fallible operation in the core. Filtering, sorting
//! and pagination are total over in-memory data, so everything here revolves
//! around `CoreError::LoadFailure`: a code for programmatic handling,
//! details for diagnostics and a static message for users.

use thiserror::Error;
use serde::{Deserialize, Serialize};

/// Message shown to users when a load fails. Causes are only logged.
pub const LOAD_FAILURE_MESSAGE: &str = "Failed to load transactions.";

/// Error codes for programmatic error handling
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// The source could not be read
    FetchFailed,
    /// The payload did not have the expected shape
    DecodeFailed,
}

impl std::fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorCode::FetchFailed => write!(f, "FETCH_FAILED"),
            ErrorCode::DecodeFailed => write!(f, "DECODE_FAILED"),
        }
    }
}

/// Where in the load a failure happened
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LoadStage {
    /// Reading the file or performing the HTTP request
    Fetch,
    /// Turning the raw payload into transactions
    Decode,
}

impl std::fmt::Display for LoadStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LoadStage::Fetch => write!(f, "fetch"),
            LoadStage::Decode => write!(f, "decode"),
        }
    }
}

/// Detailed error information for API responses and logs
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorDetails {
    /// Error code
    pub code: ErrorCode,
    /// Human-readable message
    pub message: String,
    /// Additional details
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
    /// Suggestions for resolution
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub suggestions: Vec<String>,
}

impl ErrorDetails {
    /// Create a new error detail
    pub fn new(code: ErrorCode, message: String) -> Self {
        Self {
            code,
            message,
            details: None,
            suggestions: vec![],
        }
    }

    /// Add detail information
    pub fn with_detail(mut self, detail: serde_json::Value) -> Self {
        self.details = Some(detail);
        self
    }

    /// Add a suggestion
    pub fn with_suggestion(mut self, suggestion: String) -> Self {
        self.suggestions.push(suggestion);
        self
    }
}

impl std::fmt::Display for ErrorDetails {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] {}", self.code, self.message)?;
        if let Some(ref details) = self.details {
            write!(f, "\nDetails: {}", details)?;
        }
        if !self.suggestions.is_empty() {
            write!(f, "\nSuggestions:")?;
            for suggestion in &self.suggestions {
                write!(f, "\n  - {}", suggestion)?;
            }
        }
        Ok(())
    }
}

/// Main error type for txreport-core
#[derive(Error, Debug)]
pub enum CoreError {
    #[error("Failed to load transactions from {location} ({stage}): {message}")]
    LoadFailure {
        location: String,
        stage: LoadStage,
        message: String,
    },
}

impl CoreError {
    /// Build a fetch-stage load failure
    pub fn fetch(location: impl Into<String>, message: impl ToString) -> Self {
        CoreError::LoadFailure {
            location: location.into(),
            stage: LoadStage::Fetch,
            message: message.to_string(),
        }
    }

    /// Build a decode-stage load failure
    pub fn decode(location: impl Into<String>, message: impl ToString) -> Self {
        CoreError::LoadFailure {
            location: location.into(),
            stage: LoadStage::Decode,
            message: message.to_string(),
        }
    }

    /// Get the error code
    pub fn code(&self) -> ErrorCode {
        match self {
            CoreError::LoadFailure { stage: LoadStage::Fetch, .. } => ErrorCode::FetchFailed,
            CoreError::LoadFailure { stage: LoadStage::Decode, .. } => ErrorCode::DecodeFailed,
        }
    }

    /// The static message safe to show to users
    pub fn user_message(&self) -> &'static str {
        LOAD_FAILURE_MESSAGE
    }

    /// Convert to detailed error info
    pub fn to_details(&self) -> ErrorDetails {
        let mut details = ErrorDetails::new(self.code(), self.to_string());

        match self {
            CoreError::LoadFailure { location, stage: LoadStage::Fetch, .. } => {
                details = details.with_detail(serde_json::json!({ "location": location }));
                details = details.with_suggestion(
                    "Check that the source file exists or the URL is reachable.".to_string()
                );
                details = details.with_suggestion(
                    "Trigger a reload once the source is available again.".to_string()
                );
            }
            CoreError::LoadFailure { location, stage: LoadStage::Decode, .. } => {
                details = details.with_detail(serde_json::json!({ "location": location }));
                details = details.with_suggestion(
                    "The source must be a JSON array of transaction objects.".to_string()
                );
            }
        }

        details
    }
}

/// Result type with CoreError
pub type CoreResult<T> = Result<T, CoreError>;

/// Error context for reporting
#[derive(Debug, Clone, Default)]
pub struct ErrorContext {
    /// Operation being performed
    pub operation: String,
    /// Additional context data
    pub data: serde_json::Value,
}

impl ErrorContext {
    /// Create a new error context
    pub fn new(operation: impl Into<String>) -> Self {
        Self {
            operation: operation.into(),
            data: serde_json::json!({}),
        }
    }

    /// Add context data
    pub fn with_data(mut self, key: &str, value: serde_json::Value) -> Self {
        self.data[key] = value;
        self
    }
}

/// Error logger trait
pub trait ErrorLogger: Send + Sync {
    /// Log an error
    fn log_error(&self, error: &CoreError, context: &ErrorContext);
}

/// Default error logger using log crate
#[derive(Default)]
pub struct DefaultErrorLogger;

impl ErrorLogger for DefaultErrorLogger {
    fn log_error(&self, error: &CoreError, context: &ErrorContext) {
        log::error!(
            target: "txreport::error",
            "ERROR [{}] {} - Operation: {} - Context: {}",
            error.code(),
            error.to_details(),
            context.operation,
            context.data
        );
    }
}

// ==================== Tests ====================

//! Error types for trialbal-core
//!
//! Error codes, severities and user-facing details for everything that can
//! stop a trial balance run: bad filters, unknown references, and snapshot
//! or configuration problems surfaced from the outer crates.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::io;
use thiserror::Error;
use trialbal_config::ConfigError;
use trialbal_loader::LoadError;

/// Error codes for programmatic error handling
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    NotLoaded,
    CompanyNotFound,
    FiscalYearRequired,
    FiscalYearNotFound,
    InvalidDateRange,
    AccountNotFound,
    CostCenterNotFound,
    InvalidFormat,
    LoadError,
    ConfigError,
    IoError,
}

impl std::fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorCode::NotLoaded => write!(f, "NOT_LOADED"),
            ErrorCode::CompanyNotFound => write!(f, "COMPANY_NOT_FOUND"),
            ErrorCode::FiscalYearRequired => write!(f, "FISCAL_YEAR_REQUIRED"),
            ErrorCode::FiscalYearNotFound => write!(f, "FISCAL_YEAR_NOT_FOUND"),
            ErrorCode::InvalidDateRange => write!(f, "INVALID_DATE_RANGE"),
            ErrorCode::AccountNotFound => write!(f, "ACCOUNT_NOT_FOUND"),
            ErrorCode::CostCenterNotFound => write!(f, "COST_CENTER_NOT_FOUND"),
            ErrorCode::InvalidFormat => write!(f, "INVALID_FORMAT"),
            ErrorCode::LoadError => write!(f, "LOAD_ERROR"),
            ErrorCode::ConfigError => write!(f, "CONFIG_ERROR"),
            ErrorCode::IoError => write!(f, "IO_ERROR"),
        }
    }
}

/// Detailed error information for printing or JSON output
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

/// Error severity levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ErrorSeverity {
    Info,
    Warning,
    Error,
    Critical,
}

impl std::fmt::Display for ErrorSeverity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorSeverity::Info => write!(f, "info"),
            ErrorSeverity::Warning => write!(f, "warning"),
            ErrorSeverity::Error => write!(f, "error"),
            ErrorSeverity::Critical => write!(f, "critical"),
        }
    }
}

/// Main error type for trialbal-core
#[derive(Error, Debug)]
pub enum CoreError {
    #[error("Ledger not loaded")]
    NotLoaded,

    #[error("Company not found: {name}")]
    CompanyNotFound { name: String },

    #[error("Fiscal Year is required")]
    FiscalYearRequired,

    #[error("Fiscal Year {name} does not exist")]
    FiscalYearNotFound { name: String },

    #[error("From Date {from} cannot be greater than To Date {to}")]
    InvalidDateRange { from: NaiveDate, to: NaiveDate },

    #[error("Account not found: {name}")]
    AccountNotFound { name: String },

    #[error("Cost Center not found: {name}")]
    CostCenterNotFound { name: String },

    #[error("Invalid format: {message}")]
    InvalidFormat { message: String },

    #[error("Snapshot load error: {message}")]
    LoadError { message: String },

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("IO error occurred")]
    IoError,
}

impl CoreError {
    /// Get the error code
    pub fn code(&self) -> ErrorCode {
        match self {
            CoreError::NotLoaded => ErrorCode::NotLoaded,
            CoreError::CompanyNotFound { .. } => ErrorCode::CompanyNotFound,
            CoreError::FiscalYearRequired => ErrorCode::FiscalYearRequired,
            CoreError::FiscalYearNotFound { .. } => ErrorCode::FiscalYearNotFound,
            CoreError::InvalidDateRange { .. } => ErrorCode::InvalidDateRange,
            CoreError::AccountNotFound { .. } => ErrorCode::AccountNotFound,
            CoreError::CostCenterNotFound { .. } => ErrorCode::CostCenterNotFound,
            CoreError::InvalidFormat { .. } => ErrorCode::InvalidFormat,
            CoreError::LoadError { .. } => ErrorCode::LoadError,
            CoreError::ConfigError { .. } => ErrorCode::ConfigError,
            CoreError::IoError => ErrorCode::IoError,
        }
    }

    /// Get the severity level
    pub fn severity(&self) -> ErrorSeverity {
        match self {
            CoreError::NotLoaded => ErrorSeverity::Warning,
            CoreError::CompanyNotFound { .. }
            | CoreError::FiscalYearRequired
            | CoreError::FiscalYearNotFound { .. }
            | CoreError::InvalidDateRange { .. }
            | CoreError::AccountNotFound { .. }
            | CoreError::CostCenterNotFound { .. } => ErrorSeverity::Warning,
            CoreError::InvalidFormat { .. } => ErrorSeverity::Error,
            CoreError::LoadError { .. } => ErrorSeverity::Error,
            CoreError::IoError => ErrorSeverity::Error,
            CoreError::ConfigError { .. } => ErrorSeverity::Critical,
        }
    }

    /// Whether the error comes from the filters the user supplied
    pub fn is_user_input(&self) -> bool {
        self.severity() == ErrorSeverity::Warning && !matches!(self, CoreError::NotLoaded)
    }

    /// Convert to detailed error info
    pub fn to_details(&self) -> ErrorDetails {
        let mut details = ErrorDetails::new(self.code(), self.to_string());

        match self {
            CoreError::FiscalYearRequired => {
                details = details.with_suggestion(
                    "Pass --fiscal-year with one of the fiscal years in the snapshot.".to_string(),
                );
            }
            CoreError::FiscalYearNotFound { name } => {
                details = details.with_detail(serde_json::json!({ "fiscal_year": name }));
                details = details.with_suggestion(
                    "Check the fiscal_years section of the ledger snapshot.".to_string(),
                );
            }
            CoreError::InvalidDateRange { from, to } => {
                details = details.with_detail(serde_json::json!({
                    "from_date": from.to_string(),
                    "to_date": to.to_string(),
                }));
                details = details.with_suggestion("Swap --from and --to.".to_string());
            }
            CoreError::AccountNotFound { name } => {
                details = details.with_suggestion(format!(
                    "Check if the account '{}' exists in the chart of accounts.",
                    name
                ));
            }
            CoreError::CostCenterNotFound { name } => {
                details = details.with_suggestion(format!(
                    "Check if the cost center '{}' exists in the snapshot.",
                    name
                ));
            }
            CoreError::InvalidFormat { message } | CoreError::LoadError { message } => {
                details = details.with_detail(serde_json::json!({ "load_message": message }));
                details = details
                    .with_suggestion("Check the syntax of your ledger snapshot.".to_string());
            }
            _ => {}
        }

        details
    }
}

/// Result type with CoreError
pub type CoreResult<T> = Result<T, CoreError>;

impl From<io::Error> for CoreError {
    fn from(_error: io::Error) -> Self {
        CoreError::IoError
    }
}

impl From<LoadError> for CoreError {
    fn from(error: LoadError) -> Self {
        match error {
            LoadError::IoError(_) => CoreError::IoError,
            other => CoreError::LoadError {
                message: other.to_string(),
            },
        }
    }
}

impl From<ConfigError> for CoreError {
    fn from(error: ConfigError) -> Self {
        CoreError::ConfigError {
            message: error.to_string(),
        }
    }
}

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
    pub fn new(operation: String) -> Self {
        Self {
            operation,
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
pub trait ErrorLogger {
    /// Log an error
    fn log_error(&self, error: &CoreError, context: &ErrorContext);
    /// Log a warning
    fn log_warning(&self, message: &str, context: &ErrorContext);
}

/// Default error logger using log crate
#[derive(Default)]
pub struct DefaultErrorLogger;

impl ErrorLogger for DefaultErrorLogger {
    fn log_error(&self, error: &CoreError, context: &ErrorContext) {
        log::error!(
            target: "trialbal::error",
            "ERROR [{}] {} - Operation: {} - Context: {}",
            error.code(),
            error.to_details(),
            context.operation,
            context.data
        );
    }

    fn log_warning(&self, message: &str, context: &ErrorContext) {
        log::warn!(
            target: "trialbal::error",
            "WARNING: {} - Operation: {}",
            message,
            context.operation
        );
    }
}

// ==================== Tests ====================

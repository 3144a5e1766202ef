//! Error types for cashbook-core
//!
//! This module provides error handling for posting, classification and
//! statement building, including error codes, detailed messages, and
//! suggestions.

use cashbook_store::{CompanyId, JournalEntryId, PayableId, StoreError};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::types::{ReportType, TransactionType};

/// Error codes for programmatic error handling
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// Request rejected before any write
    ValidationError,
    /// Account name not in the chart of accounts
    UnresolvedAccount,
    /// Category could not be mapped to an account
    UnmappableCategory,
    /// Derived lines do not balance
    ImbalancedEntry,
    /// Report totals do not balance
    AggregationInconsistency,
    /// Account name already taken
    DuplicateAccount,
    JournalEntryNotFound,
    PayableNotFound,
    /// Stored row could not be decoded
    InvalidRecord,
    /// Storage backend failure
    StorageError,
}

impl std::fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorCode::ValidationError => write!(f, "VALIDATION_ERROR"),
            ErrorCode::UnresolvedAccount => write!(f, "UNRESOLVED_ACCOUNT"),
            ErrorCode::UnmappableCategory => write!(f, "UNMAPPABLE_CATEGORY"),
            ErrorCode::ImbalancedEntry => write!(f, "IMBALANCED_ENTRY"),
            ErrorCode::AggregationInconsistency => write!(f, "AGGREGATION_INCONSISTENCY"),
            ErrorCode::DuplicateAccount => write!(f, "DUPLICATE_ACCOUNT"),
            ErrorCode::JournalEntryNotFound => write!(f, "JOURNAL_ENTRY_NOT_FOUND"),
            ErrorCode::PayableNotFound => write!(f, "PAYABLE_NOT_FOUND"),
            ErrorCode::InvalidRecord => write!(f, "INVALID_RECORD"),
            ErrorCode::StorageError => write!(f, "STORAGE_ERROR"),
        }
    }
}

/// Detailed error information for API responses
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
    pub fn new(code: ErrorCode, message: String) -> Self {
        Self {
            code,
            message,
            details: None,
            suggestions: vec![],
        }
    }

    pub fn with_detail(mut self, detail: serde_json::Value) -> Self {
        self.details = Some(detail);
        self
    }

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
    /// Operation rejected, caller can fix the input
    Warning,
    /// Operation failed
    Error,
    /// Ledger invariant broken
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

/// Main error type for cashbook-core
#[derive(Error, Debug)]
pub enum CoreError {
    #[error("Validation error: {message}")]
    ValidationError { message: String },

    #[error("Account '{name}' not found for company {company_id}")]
    UnresolvedAccount { company_id: CompanyId, name: String },

    #[error("Category '{category}' ({transaction_type}) cannot be mapped to an account for company {company_id}")]
    UnmappableCategory {
        company_id: CompanyId,
        category: String,
        transaction_type: TransactionType,
    },

    #[error("Entry '{description}' does not balance: debits {debits}, credits {credits}")]
    ImbalancedEntry {
        debits: Decimal,
        credits: Decimal,
        description: String,
    },

    #[error("{report} for company {company_id} is out of balance by {discrepancy}")]
    AggregationInconsistency {
        company_id: CompanyId,
        report: ReportType,
        discrepancy: Decimal,
    },

    #[error("Account '{name}' already exists for company {company_id}")]
    DuplicateAccount { company_id: CompanyId, name: String },

    #[error("Journal entry {id} not found for company {company_id}")]
    JournalEntryNotFound { company_id: CompanyId, id: JournalEntryId },

    #[error("Payable/receivable {id} not found for company {company_id}")]
    PayableNotFound { company_id: CompanyId, id: PayableId },

    #[error("Invalid stored record: {message}")]
    InvalidRecord { message: String },

    #[error("Storage error: {0}")]
    Storage(#[from] StoreError),
}

impl CoreError {
    pub fn validation(message: impl Into<String>) -> Self {
        CoreError::ValidationError { message: message.into() }
    }

    /// Get the error code
    pub fn code(&self) -> ErrorCode {
        match self {
            CoreError::ValidationError { .. } => ErrorCode::ValidationError,
            CoreError::UnresolvedAccount { .. } => ErrorCode::UnresolvedAccount,
            CoreError::UnmappableCategory { .. } => ErrorCode::UnmappableCategory,
            CoreError::ImbalancedEntry { .. } => ErrorCode::ImbalancedEntry,
            CoreError::AggregationInconsistency { .. } => ErrorCode::AggregationInconsistency,
            CoreError::DuplicateAccount { .. } => ErrorCode::DuplicateAccount,
            CoreError::JournalEntryNotFound { .. } => ErrorCode::JournalEntryNotFound,
            CoreError::PayableNotFound { .. } => ErrorCode::PayableNotFound,
            CoreError::InvalidRecord { .. } => ErrorCode::InvalidRecord,
            CoreError::Storage(_) => ErrorCode::StorageError,
        }
    }

    /// Get the severity level
    pub fn severity(&self) -> ErrorSeverity {
        match self {
            CoreError::ValidationError { .. } => ErrorSeverity::Warning,
            CoreError::UnresolvedAccount { .. } => ErrorSeverity::Warning,
            CoreError::UnmappableCategory { .. } => ErrorSeverity::Warning,
            CoreError::ImbalancedEntry { .. } => ErrorSeverity::Critical,
            CoreError::AggregationInconsistency { .. } => ErrorSeverity::Error,
            CoreError::DuplicateAccount { .. } => ErrorSeverity::Warning,
            CoreError::JournalEntryNotFound { .. } => ErrorSeverity::Info,
            CoreError::PayableNotFound { .. } => ErrorSeverity::Info,
            CoreError::InvalidRecord { .. } => ErrorSeverity::Error,
            CoreError::Storage(_) => ErrorSeverity::Error,
        }
    }

    /// Convert to detailed error info
    pub fn to_details(&self) -> ErrorDetails {
        let mut details = ErrorDetails::new(self.code(), self.to_string());

        match self {
            CoreError::ValidationError { message } => {
                details = details.with_detail(serde_json::json!({ "validation_message": message }));
                details = details.with_suggestion(
                    "Review the validation message for specific requirements.".to_string()
                );
            }
            CoreError::UnresolvedAccount { company_id, name } => {
                details = details.with_detail(serde_json::json!({ "company_id": company_id, "account": name }));
                details = details.with_suggestion(format!(
                    "Check that '{}' exists and is active in the chart of accounts.", name
                ));
                details = details.with_suggestion(format!(
                    "Use /api/companies/{}/accounts to list the active accounts.", company_id
                ));
            }
            CoreError::UnmappableCategory { company_id, category, transaction_type } => {
                details = details.with_detail(serde_json::json!({
                    "company_id": company_id,
                    "category": category,
                    "type": transaction_type,
                }));
                details = details.with_suggestion(
                    "Use an account name from the chart of accounts as the category.".to_string()
                );
                details = details.with_suggestion(format!(
                    "Onboard company {} to seed the default chart of accounts.", company_id
                ));
            }
            CoreError::ImbalancedEntry { debits, credits, .. } => {
                details = details.with_detail(serde_json::json!({
                    "debits": debits.to_string(),
                    "credits": credits.to_string(),
                }));
                details = details.with_suggestion(
                    "Nothing was written. This indicates a posting rule defect; please report it.".to_string()
                );
            }
            CoreError::AggregationInconsistency { discrepancy, .. } => {
                details = details.with_detail(serde_json::json!({ "discrepancy": discrepancy.to_string() }));
                details = details.with_suggestion(
                    "Open payables and receivables are not ledger-backed; settle or post them.".to_string()
                );
            }
            CoreError::DuplicateAccount { name, .. } => {
                details = details.with_suggestion(format!(
                    "Choose a different name than '{}' or reactivate the existing account.", name
                ));
            }
            CoreError::JournalEntryNotFound { .. } | CoreError::PayableNotFound { .. } => {
                details = details.with_suggestion("Check if the ID is correct.".to_string());
            }
            _ => {}
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
    pub company_id: Option<CompanyId>,
    /// Additional context data
    pub data: serde_json::Value,
}

impl ErrorContext {
    pub fn new(operation: impl Into<String>) -> Self {
        Self {
            operation: operation.into(),
            company_id: None,
            data: serde_json::json!({}),
        }
    }

    pub fn with_company(mut self, company_id: CompanyId) -> Self {
        self.company_id = Some(company_id);
        self
    }

    pub fn with_data(mut self, key: &str, value: serde_json::Value) -> Self {
        self.data[key] = value;
        self
    }
}

/// Error logger trait
pub trait ErrorLogger {
    fn log_error(&self, error: &CoreError, context: &ErrorContext);
    fn log_warning(&self, message: &str, context: &ErrorContext);
}

/// Default error logger using log crate
#[derive(Default)]
pub struct DefaultErrorLogger;

impl ErrorLogger for DefaultErrorLogger {
    fn log_error(&self, error: &CoreError, context: &ErrorContext) {
        let message = format!(
            "[{}] {} - Operation: {} - Company: {:?} - Data: {}",
            error.code(),
            error,
            context.operation,
            context.company_id,
            context.data
        );
        match error.severity() {
            ErrorSeverity::Critical | ErrorSeverity::Error => {
                log::error!(target: "cashbook::error", "{}", message)
            }
            ErrorSeverity::Warning => log::warn!(target: "cashbook::error", "{}", message),
            ErrorSeverity::Info => log::info!(target: "cashbook::error", "{}", message),
        }
    }

    fn log_warning(&self, message: &str, context: &ErrorContext) {
        log::warn!(
            target: "cashbook::error",
            "WARNING: {} - Operation: {} - Company: {:?}",
            message,
            context.operation,
            context.company_id
        );
    }
}

// ==================== Tests ====================

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_error_code_display() {
        assert_eq!(ErrorCode::UnresolvedAccount.to_string(), "UNRESOLVED_ACCOUNT");
        assert_eq!(ErrorCode::ImbalancedEntry.to_string(), "IMBALANCED_ENTRY");
        assert_eq!(
            serde_json::to_string(&ErrorCode::UnmappableCategory).unwrap(),
            "\"UNMAPPABLE_CATEGORY\""
        );
    }

    #[test]
    fn test_imbalanced_entry_is_critical() {
        let error = CoreError::ImbalancedEntry {
            debits: dec!(100),
            credits: dec!(99),
            description: "Rent".to_string(),
        };
        assert_eq!(error.code(), ErrorCode::ImbalancedEntry);
        assert_eq!(error.severity(), ErrorSeverity::Critical);
        assert!(error.to_details().details.is_some());
    }

    #[test]
    fn test_unresolved_account_details_name_the_account() {
        let error = CoreError::UnresolvedAccount {
            company_id: 3,
            name: "Petty Cash".to_string(),
        };
        let details = error.to_details();

        assert_eq!(details.code, ErrorCode::UnresolvedAccount);
        assert!(details.message.contains("Petty Cash"));
        assert!(details.message.contains('3'));
        assert_eq!(details.suggestions.len(), 2);
    }

    #[test]
    fn test_store_error_converts() {
        let error: CoreError = StoreError::LockPoisoned.into();
        assert_eq!(error.code(), ErrorCode::StorageError);
        assert_eq!(error.severity(), ErrorSeverity::Error);
    }

    #[test]
    fn test_error_context() {
        let context = ErrorContext::new("post")
            .with_company(9)
            .with_data("amount", serde_json::json!("12.50"));

        assert_eq!(context.operation, "post");
        assert_eq!(context.company_id, Some(9));
        assert_eq!(context.data["amount"], "12.50");
    }

    #[test]
    fn test_details_display_lists_suggestions() {
        let details = ErrorDetails::new(ErrorCode::ValidationError, "Amount must be positive".to_string())
            .with_suggestion("Use a value greater than zero".to_string());
        let text = details.to_string();
        assert!(text.starts_with("[VALIDATION_ERROR]"));
        assert!(text.contains("  - Use a value greater than zero"));
    }
}

//! Error types for the envelope ledger
//!
//! Defines the error hierarchy shared by the models, storage, ledger and
//! service layers using thiserror.

use thiserror::Error;

use crate::models::money::MoneyParseError;
use crate::models::month::MonthParseError;

/// The main error type for ledger operations
#[derive(Error, Debug)]
pub enum EnvelopeError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// File I/O errors
    #[error("I/O error: {0}")]
    Io(String),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(String),

    /// Structurally invalid input (unknown class, negative budget, bad id)
    #[error("Validation error: {0}")]
    Validation(String),

    /// Entity not found errors
    #[error("{entity_type} not found: {identifier}")]
    NotFound {
        entity_type: &'static str,
        identifier: String,
    },

    /// Envelope catalog is inconsistent
    #[error("Catalog error: {0}")]
    Catalog(String),

    /// Storage collaborator errors
    #[error("Storage error: {0}")]
    Storage(String),
}

impl EnvelopeError {
    /// Create a "not found" error for expenses
    pub fn expense_not_found(identifier: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type: "Expense",
            identifier: identifier.into(),
        }
    }

    pub fn project_not_found(identifier: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type: "Project",
            identifier: identifier.into(),
        }
    }

    /// Create a "not found" error for months
    pub fn month_not_found(identifier: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type: "Month",
            identifier: identifier.into(),
        }
    }

    /// Create a "not found" error for envelope classes
    pub fn class_not_found(identifier: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type: "Envelope class",
            identifier: identifier.into(),
        }
    }

    /// Check if this is a "not found" error
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// Check if this is a validation error
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }
}

impl From<std::io::Error> for EnvelopeError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}

impl From<serde_json::Error> for EnvelopeError {
    fn from(err: serde_json::Error) -> Self {
        Self::Json(err.to_string())
    }
}

impl From<MonthParseError> for EnvelopeError {
    fn from(err: MonthParseError) -> Self {
        Self::Validation(err.to_string())
    }
}

impl From<MoneyParseError> for EnvelopeError {
    fn from(err: MoneyParseError) -> Self {
        Self::Validation(err.to_string())
    }
}

/// Result type alias for ledger operations
pub type EnvelopeResult<T> = Result<T, EnvelopeError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = EnvelopeError::Config("missing catalog".into());
        assert_eq!(err.to_string(), "Configuration error: missing catalog");
    }

    #[test]
    fn test_not_found_error() {
        let err = EnvelopeError::expense_not_found("exp-1234abcd");
        assert_eq!(err.to_string(), "Expense not found: exp-1234abcd");
        assert!(err.is_not_found());
        assert!(!err.is_validation());
    }

    #[test]
    fn test_month_parse_error_is_validation() {
        let err: EnvelopeError = MonthParseError::InvalidFormat("2024/01".into()).into();
        assert!(err.is_validation());
        assert!(err.to_string().contains("2024/01"));
    }

    #[test]
    fn test_from_io_error() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: EnvelopeError = io_err.into();
        assert!(matches!(err, EnvelopeError::Io(_)));
    }
}

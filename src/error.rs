//! Error types for the finance tracker.
//!
//! Every failure is tagged with its kind where it happens, so callers can match
//! on the variant instead of inspecting messages.

use thiserror::Error;

/// The main error type for finance tracker operations
#[derive(Error, Debug)]
pub enum FinanceError {
    /// The store could not be opened or a query against it failed
    #[error("Data access error: {0}")]
    DataAccess(String),

    /// A date that is not a valid `YYYY-MM-DD` calendar date
    #[error("Malformed date '{value}'. Expected YYYY-MM-DD")]
    MalformedDate { value: String },

    /// An amount that is not a decimal number
    #[error("Malformed amount '{value}'. Must be a valid number")]
    MalformedAmount { value: String },

    /// A period token outside the known set
    #[error("Unknown period '{0}'. Use month, prev_month, year, all or YYYY-MM")]
    InvalidPeriodToken(String),

    /// Rejected user input
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("{entity_type} not found: {identifier}")]
    NotFound {
        entity_type: &'static str,
        identifier: String,
    },

    /// CSV import failures that abort the whole file
    #[error("Import error: {0}")]
    Import(String),

    /// Terminal and stdin failures
    #[error("I/O error: {0}")]
    Io(String),
}

impl FinanceError {
    pub fn transaction_not_found(identifier: impl ToString) -> Self {
        Self::NotFound {
            entity_type: "Transaction",
            identifier: identifier.to_string(),
        }
    }

    pub fn category_not_found(identifier: impl ToString) -> Self {
        Self::NotFound {
            entity_type: "Category",
            identifier: identifier.to_string(),
        }
    }

    /// Builds a mapper that wraps a rusqlite failure with some context.
    pub fn db(context: &'static str) -> impl Fn(rusqlite::Error) -> Self {
        move |err| Self::DataAccess(format!("{}: {}", context, err))
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }
}

impl From<std::io::Error> for FinanceError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}

/// Result type alias for finance tracker operations
pub type FinanceResult<T> = Result<T, FinanceError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_display() {
        let err = FinanceError::transaction_not_found(42);
        assert_eq!(err.to_string(), "Transaction not found: 42");
        assert!(err.is_not_found());
    }

    #[test]
    fn test_db_mapper_keeps_context() {
        let err = FinanceError::db("Failed to prepare statement")(rusqlite::Error::InvalidQuery);
        assert!(matches!(err, FinanceError::DataAccess(_)));
        assert!(err.to_string().starts_with("Data access error: Failed to prepare statement"));
    }

    #[test]
    fn test_malformed_date_display() {
        let err = FinanceError::MalformedDate {
            value: "2025-02-30".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Malformed date '2025-02-30'. Expected YYYY-MM-DD"
        );
    }
}

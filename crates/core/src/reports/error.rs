//! Report generation error types.

use chrono::NaiveDate;
use thiserror::Error;

use numera_shared::types::AccountId;

use crate::consistency::ConsistencyViolation;

/// Errors that can occur during report generation.
#[derive(Debug, Error)]
pub enum ReportError {
    /// The requested range has from after to.
    #[error("Invalid report range: {from} to {to}")]
    InvalidDateRange {
        /// Requested range start.
        from: NaiveDate,
        /// Requested range end.
        to: NaiveDate,
    },

    /// The requested account filter does not exist.
    #[error("Account not found: {0}")]
    AccountNotFound(AccountId),

    /// A ledger invariant was violated; indicates a bug, not caller error.
    #[error(transparent)]
    Consistency(#[from] ConsistencyViolation),
}

impl ReportError {
    /// Returns the error code for API responses.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::InvalidDateRange { .. } => "INVALID_DATE_RANGE",
            Self::AccountNotFound(_) => "ACCOUNT_NOT_FOUND",
            Self::Consistency(_) => "INTERNAL_CONSISTENCY",
        }
    }

    /// Returns the HTTP status code for this error.
    #[must_use]
    pub const fn http_status_code(&self) -> u16 {
        match self {
            Self::InvalidDateRange { .. } => 400,
            Self::AccountNotFound(_) => 404,
            Self::Consistency(_) => 500,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;

    #[test]
    fn test_error_codes() {
        let range = ReportError::InvalidDateRange {
            from: NaiveDate::from_ymd_opt(2024, 2, 1).unwrap(),
            to: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
        };
        assert_eq!(range.error_code(), "INVALID_DATE_RANGE");
        assert_eq!(range.http_status_code(), 400);

        let consistency = ReportError::Consistency(ConsistencyViolation::TrialBalanceMismatch {
            as_of: NaiveDate::from_ymd_opt(2024, 1, 31).unwrap(),
            debits: Decimal::ONE,
            credits: Decimal::ZERO,
        });
        assert_eq!(consistency.error_code(), "INTERNAL_CONSISTENCY");
        assert_eq!(consistency.http_status_code(), 500);
    }
}

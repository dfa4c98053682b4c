//! Journal engine error types.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use thiserror::Error;

use numera_shared::types::{AccountId, EntryId};

use crate::consistency::ConsistencyViolation;

/// Errors that can occur during journal operations.
#[derive(Debug, Error)]
pub enum JournalError {
    // ========== Validation Errors ==========
    /// Entry must have at least 2 lines.
    #[error("Journal entry must have at least 2 lines")]
    InsufficientLines,

    /// Entry is not balanced (debits != credits).
    #[error("Journal entry is not balanced. Debit: {debits}, Credit: {credits}")]
    UnbalancedEntry {
        /// Total debit amount.
        debits: Decimal,
        /// Total credit amount.
        credits: Decimal,
    },

    /// Line amount cannot be zero.
    #[error("Line amount cannot be zero")]
    ZeroAmount,

    /// Line amount cannot be negative.
    #[error("Line amount cannot be negative")]
    NegativeAmount,

    /// Account is missing or inactive.
    #[error("Account cannot be posted to: {0}")]
    InvalidAccount(AccountId),

    // ========== Lifecycle Errors ==========
    /// Operation requires a draft entry.
    #[error("Journal entry is not a draft: {0}")]
    EntryNotDraft(EntryId),

    /// Operation requires a posted entry.
    #[error("Journal entry is not posted: {0}")]
    EntryNotPosted(EntryId),

    /// No open accounting period covers the date.
    #[error("No open accounting period for date {0}")]
    PeriodClosed(NaiveDate),

    /// Entry not found.
    #[error("Journal entry not found: {0}")]
    EntryNotFound(EntryId),

    // ========== Internal Errors ==========
    /// A ledger invariant was violated; indicates a bug, not caller error.
    #[error(transparent)]
    Consistency(#[from] ConsistencyViolation),
}

impl JournalError {
    /// Returns the error code for API responses.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::InsufficientLines => "INSUFFICIENT_LINES",
            Self::UnbalancedEntry { .. } => "UNBALANCED_ENTRY",
            Self::ZeroAmount => "ZERO_AMOUNT",
            Self::NegativeAmount => "NEGATIVE_AMOUNT",
            Self::InvalidAccount(_) => "INVALID_ACCOUNT",
            Self::EntryNotDraft(_) => "ENTRY_NOT_DRAFT",
            Self::EntryNotPosted(_) => "ENTRY_NOT_POSTED",
            Self::PeriodClosed(_) => "PERIOD_CLOSED",
            Self::EntryNotFound(_) => "ENTRY_NOT_FOUND",
            Self::Consistency(_) => "INTERNAL_CONSISTENCY",
        }
    }

    /// Returns the HTTP status code for this error.
    #[must_use]
    pub const fn http_status_code(&self) -> u16 {
        match self {
            // 400 Bad Request - validation errors
            Self::InsufficientLines
            | Self::UnbalancedEntry { .. }
            | Self::ZeroAmount
            | Self::NegativeAmount
            | Self::InvalidAccount(_) => 400,

            // 404 Not Found
            Self::EntryNotFound(_) => 404,

            // 409 Conflict - lifecycle errors
            Self::EntryNotDraft(_) | Self::EntryNotPosted(_) | Self::PeriodClosed(_) => 409,

            // 500 Internal Server Error - invariant violations
            Self::Consistency(_) => 500,
        }
    }
}

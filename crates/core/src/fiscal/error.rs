//! Accounting period error types.

use chrono::NaiveDate;
use thiserror::Error;

use numera_shared::types::PeriodId;

/// Errors that can occur during period calendar operations.
#[derive(Debug, Error)]
pub enum PeriodError {
    /// Start date must be before end date.
    #[error("Start date must be before end date")]
    InvalidDateRange,

    /// Period overlaps an existing period.
    #[error("Period overlaps existing period {0}")]
    PeriodOverlap(PeriodId),

    /// Period does not abut the most recent period's end.
    #[error("Period leaves a calendar gap; next period must start on {expected_start}")]
    PeriodGap {
        /// The only start date that continues the calendar without a gap.
        expected_start: NaiveDate,
    },

    /// Period is not open.
    #[error("Period is not open: {0}")]
    PeriodNotOpen(PeriodId),

    /// Period is not closed.
    #[error("Period is not closed: {0}")]
    PeriodNotClosed(PeriodId),

    /// An earlier period is still open; periods close in chronological order.
    #[error("Cannot close period: earlier periods must be closed first")]
    EarlierPeriodOpen,

    /// A later period is already closed; only the most recently closed
    /// period can be reopened.
    #[error("Cannot reopen period: later periods are already closed")]
    LaterPeriodClosed,

    /// Period not found.
    #[error("Accounting period not found: {0}")]
    PeriodNotFound(PeriodId),
}

impl PeriodError {
    /// Returns the error code for API responses.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::InvalidDateRange => "INVALID_DATE_RANGE",
            Self::PeriodOverlap(_) => "PERIOD_OVERLAP",
            Self::PeriodGap { .. } => "PERIOD_GAP",
            Self::PeriodNotOpen(_) => "PERIOD_NOT_OPEN",
            Self::PeriodNotClosed(_) => "PERIOD_NOT_CLOSED",
            Self::EarlierPeriodOpen => "EARLIER_PERIOD_OPEN",
            Self::LaterPeriodClosed => "LATER_PERIOD_CLOSED",
            Self::PeriodNotFound(_) => "PERIOD_NOT_FOUND",
        }
    }

    /// Returns the HTTP status code for this error.
    #[must_use]
    pub const fn http_status_code(&self) -> u16 {
        match self {
            Self::InvalidDateRange | Self::PeriodGap { .. } => 400,
            Self::PeriodOverlap(_)
            | Self::PeriodNotOpen(_)
            | Self::PeriodNotClosed(_)
            | Self::EarlierPeriodOpen
            | Self::LaterPeriodClosed => 409,
            Self::PeriodNotFound(_) => 404,
        }
    }
}

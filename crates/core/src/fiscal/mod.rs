//! Accounting period calendar and lifecycle.
//!
//! Periods tile the calendar with no gaps and no overlaps, close in
//! chronological order only, and every close/reopen is recorded in a
//! per-tenant audit trail.

pub mod calendar;
pub mod error;
pub mod period;

pub use calendar::{PeriodAuditAction, PeriodAuditRecord, PeriodCalendar};
pub use error::PeriodError;
pub use period::{AccountingPeriod, PeriodStatus};

//! Per-tenant period calendar.
//!
//! Once more than one period exists, periods must tile the calendar: each
//! new period starts exactly one day after the latest existing end. Closing
//! walks forward in time only; reopening walks backward and is audited.

use chrono::{DateTime, Duration, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use numera_shared::types::{PeriodId, TenantId};

use super::error::PeriodError;
use super::period::{AccountingPeriod, PeriodStatus};

/// Checks if two inclusive date ranges overlap.
///
/// Two ranges [a_start, a_end] and [b_start, b_end] overlap if:
/// a_start <= b_end AND a_end >= b_start
#[must_use]
pub fn date_ranges_overlap(
    a_start: NaiveDate,
    a_end: NaiveDate,
    b_start: NaiveDate,
    b_end: NaiveDate,
) -> bool {
    a_start <= b_end && a_end >= b_start
}

/// An administrative action recorded in the period audit trail.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PeriodAuditAction {
    /// The period was closed.
    Closed,
    /// The period was reopened.
    Reopened,
}

/// An audit record for a period close or reopen.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PeriodAuditRecord {
    /// The period acted upon.
    pub period_id: PeriodId,
    /// What happened.
    pub action: PeriodAuditAction,
    /// Operator-supplied reason, required for reopens.
    pub reason: Option<String>,
    /// When the action happened.
    pub at: DateTime<Utc>,
}

/// The accounting period calendar for a single tenant.
///
/// Periods are held sorted by start date; because creation only appends at
/// the end of the calendar, insertion order and chronological order agree.
#[derive(Debug, Clone)]
pub struct PeriodCalendar {
    tenant_id: TenantId,
    periods: Vec<AccountingPeriod>,
    audit: Vec<PeriodAuditRecord>,
}

impl PeriodCalendar {
    /// Creates an empty calendar for the given tenant.
    #[must_use]
    pub fn new(tenant_id: TenantId) -> Self {
        Self {
            tenant_id,
            periods: Vec::new(),
            audit: Vec::new(),
        }
    }

    /// Creates a new period at the end of the calendar.
    ///
    /// # Errors
    ///
    /// Returns `InvalidDateRange` if start >= end, `PeriodOverlap` if the
    /// range intersects an existing period, or `PeriodGap` if the start is
    /// not exactly one day after the latest existing end.
    pub fn create_period(
        &mut self,
        name: String,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Result<AccountingPeriod, PeriodError> {
        if start_date >= end_date {
            return Err(PeriodError::InvalidDateRange);
        }

        for existing in &self.periods {
            if date_ranges_overlap(start_date, end_date, existing.start_date, existing.end_date) {
                return Err(PeriodError::PeriodOverlap(existing.id));
            }
        }

        if let Some(latest) = self.periods.last() {
            let expected_start = latest.end_date + Duration::days(1);
            if start_date != expected_start {
                return Err(PeriodError::PeriodGap { expected_start });
            }
        }

        let period = AccountingPeriod {
            id: PeriodId::new(),
            tenant_id: self.tenant_id,
            name,
            start_date,
            end_date,
            status: PeriodStatus::Open,
            closed_at: None,
        };
        self.periods.push(period.clone());
        Ok(period)
    }

    /// Closes a period.
    ///
    /// # Errors
    ///
    /// Returns `PeriodNotFound` if the period does not exist,
    /// `PeriodNotOpen` if it is already closed, or `EarlierPeriodOpen` if
    /// any earlier period is still open.
    pub fn close_period(
        &mut self,
        id: PeriodId,
        now: DateTime<Utc>,
    ) -> Result<AccountingPeriod, PeriodError> {
        let index = self.index_of(id)?;

        if self.periods[index].status != PeriodStatus::Open {
            return Err(PeriodError::PeriodNotOpen(id));
        }
        if self.periods[..index]
            .iter()
            .any(|p| p.status == PeriodStatus::Open)
        {
            return Err(PeriodError::EarlierPeriodOpen);
        }

        let period = &mut self.periods[index];
        period.status = PeriodStatus::Closed;
        period.closed_at = Some(now);
        let period = period.clone();

        self.audit.push(PeriodAuditRecord {
            period_id: id,
            action: PeriodAuditAction::Closed,
            reason: None,
            at: now,
        });
        Ok(period)
    }

    /// Reopens a closed period.
    ///
    /// Closing walks forward through the calendar, so the closed periods
    /// always form a prefix; only the last period of that prefix can be
    /// reopened. The action is recorded in the audit trail with the
    /// operator's reason.
    ///
    /// # Errors
    ///
    /// Returns `PeriodNotFound` if the period does not exist,
    /// `PeriodNotClosed` if it is open, or `LaterPeriodClosed` if a later
    /// period is also closed.
    pub fn reopen_period(
        &mut self,
        id: PeriodId,
        reason: String,
        now: DateTime<Utc>,
    ) -> Result<AccountingPeriod, PeriodError> {
        let index = self.index_of(id)?;

        if self.periods[index].status != PeriodStatus::Closed {
            return Err(PeriodError::PeriodNotClosed(id));
        }
        if self.periods[index + 1..]
            .iter()
            .any(|p| p.status == PeriodStatus::Closed)
        {
            return Err(PeriodError::LaterPeriodClosed);
        }

        let period = &mut self.periods[index];
        period.status = PeriodStatus::Open;
        let period = period.clone();

        self.audit.push(PeriodAuditRecord {
            period_id: id,
            action: PeriodAuditAction::Reopened,
            reason: Some(reason),
            at: now,
        });
        Ok(period)
    }

    /// Returns the period containing the given date.
    #[must_use]
    pub fn period_for_date(&self, date: NaiveDate) -> Option<&AccountingPeriod> {
        self.periods.iter().find(|p| p.contains_date(date))
    }

    /// Returns true if the date falls within an open period.
    ///
    /// This is the single query the journal engine relies on: a date with
    /// no period at all is not open.
    #[must_use]
    pub fn is_open_for_date(&self, date: NaiveDate) -> bool {
        self.period_for_date(date).is_some_and(AccountingPeriod::is_open)
    }

    /// Returns the period with the given id.
    #[must_use]
    pub fn get(&self, id: PeriodId) -> Option<&AccountingPeriod> {
        self.periods.iter().find(|p| p.id == id)
    }

    /// Returns all periods in chronological order.
    #[must_use]
    pub fn periods(&self) -> &[AccountingPeriod] {
        &self.periods
    }

    /// Returns the close/reopen audit trail in action order.
    #[must_use]
    pub fn audit_trail(&self) -> &[PeriodAuditRecord] {
        &self.audit
    }

    fn index_of(&self, id: PeriodId) -> Result<usize, PeriodError> {
        self.periods
            .iter()
            .position(|p| p.id == id)
            .ok_or(PeriodError::PeriodNotFound(id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn calendar_with_jan_feb() -> (PeriodCalendar, PeriodId, PeriodId) {
        let mut calendar = PeriodCalendar::new(TenantId::new());
        let jan = calendar
            .create_period("January 2024".to_string(), date(2024, 1, 1), date(2024, 1, 31))
            .unwrap();
        let feb = calendar
            .create_period("February 2024".to_string(), date(2024, 2, 1), date(2024, 2, 29))
            .unwrap();
        (calendar, jan.id, feb.id)
    }

    #[test]
    fn test_first_period_starts_anywhere() {
        let mut calendar = PeriodCalendar::new(TenantId::new());
        let period = calendar
            .create_period("FY start".to_string(), date(2024, 4, 1), date(2024, 4, 30))
            .unwrap();
        assert!(period.is_open());
    }

    #[test]
    fn test_invalid_date_range_rejected() {
        let mut calendar = PeriodCalendar::new(TenantId::new());
        let result =
            calendar.create_period("Bad".to_string(), date(2024, 1, 31), date(2024, 1, 1));
        assert!(matches!(result, Err(PeriodError::InvalidDateRange)));
    }

    #[test]
    fn test_overlapping_period_rejected() {
        let (mut calendar, _, _) = calendar_with_jan_feb();
        let result =
            calendar.create_period("Overlap".to_string(), date(2024, 2, 15), date(2024, 3, 15));
        assert!(matches!(result, Err(PeriodError::PeriodOverlap(_))));
    }

    #[test]
    fn test_gap_rejected_with_expected_start() {
        let (mut calendar, _, _) = calendar_with_jan_feb();
        let result =
            calendar.create_period("March 2024".to_string(), date(2024, 3, 2), date(2024, 3, 31));
        match result {
            Err(PeriodError::PeriodGap { expected_start }) => {
                assert_eq!(expected_start, date(2024, 3, 1));
            }
            other => panic!("expected PeriodGap, got {other:?}"),
        }
    }

    #[test]
    fn test_abutting_period_accepted() {
        let (mut calendar, _, _) = calendar_with_jan_feb();
        let march = calendar
            .create_period("March 2024".to_string(), date(2024, 3, 1), date(2024, 3, 31))
            .unwrap();
        assert_eq!(march.start_date, date(2024, 3, 1));
    }

    #[test]
    fn test_close_out_of_order_rejected() {
        let (mut calendar, _, feb) = calendar_with_jan_feb();
        let result = calendar.close_period(feb, Utc::now());
        assert!(matches!(result, Err(PeriodError::EarlierPeriodOpen)));
    }

    #[test]
    fn test_close_in_order() {
        let (mut calendar, jan, feb) = calendar_with_jan_feb();
        let closed = calendar.close_period(jan, Utc::now()).unwrap();
        assert_eq!(closed.status, PeriodStatus::Closed);
        assert!(closed.closed_at.is_some());

        calendar.close_period(feb, Utc::now()).unwrap();
        assert_eq!(calendar.audit_trail().len(), 2);
    }

    #[test]
    fn test_close_twice_rejected() {
        let (mut calendar, jan, _) = calendar_with_jan_feb();
        calendar.close_period(jan, Utc::now()).unwrap();
        let result = calendar.close_period(jan, Utc::now());
        assert!(matches!(result, Err(PeriodError::PeriodNotOpen(_))));
    }

    #[test]
    fn test_is_open_for_date() {
        let (mut calendar, jan, _) = calendar_with_jan_feb();
        assert!(calendar.is_open_for_date(date(2024, 1, 15)));
        assert!(!calendar.is_open_for_date(date(2024, 6, 1)));

        calendar.close_period(jan, Utc::now()).unwrap();
        assert!(!calendar.is_open_for_date(date(2024, 1, 15)));
        assert!(calendar.is_open_for_date(date(2024, 2, 15)));
    }

    #[test]
    fn test_reopen_last_closed_only() {
        let (mut calendar, jan, feb) = calendar_with_jan_feb();
        calendar.close_period(jan, Utc::now()).unwrap();
        calendar.close_period(feb, Utc::now()).unwrap();

        let result = calendar.reopen_period(jan, "correction".to_string(), Utc::now());
        assert!(matches!(result, Err(PeriodError::LaterPeriodClosed)));

        let reopened = calendar
            .reopen_period(feb, "late invoice".to_string(), Utc::now())
            .unwrap();
        assert_eq!(reopened.status, PeriodStatus::Open);

        let trail = calendar.audit_trail();
        assert_eq!(trail.len(), 3);
        assert_eq!(trail[2].action, PeriodAuditAction::Reopened);
        assert_eq!(trail[2].reason.as_deref(), Some("late invoice"));
    }

    #[test]
    fn test_reopen_open_period_rejected() {
        let (mut calendar, jan, _) = calendar_with_jan_feb();
        let result = calendar.reopen_period(jan, "oops".to_string(), Utc::now());
        assert!(matches!(result, Err(PeriodError::PeriodNotClosed(_))));
    }

    mod props {
        use super::*;
        use proptest::prelude::*;

        fn month_lengths() -> impl Strategy<Value = Vec<u32>> {
            prop::collection::vec(1u32..=60, 1..=12)
        }

        proptest! {
            /// Any sequence of abutting periods tiles the calendar:
            /// consecutive periods never overlap and never leave a gap.
            #[test]
            fn prop_created_periods_tile_the_calendar(lengths in month_lengths()) {
                let mut calendar = PeriodCalendar::new(TenantId::new());
                let mut start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();

                for (i, len) in lengths.iter().enumerate() {
                    let end = start + Duration::days(i64::from(*len));
                    calendar
                        .create_period(format!("P{i}"), start, end)
                        .unwrap();
                    start = end + Duration::days(1);
                }

                let periods = calendar.periods();
                for pair in periods.windows(2) {
                    prop_assert_eq!(
                        pair[1].start_date,
                        pair[0].end_date + Duration::days(1)
                    );
                    prop_assert!(!date_ranges_overlap(
                        pair[0].start_date,
                        pair[0].end_date,
                        pair[1].start_date,
                        pair[1].end_date
                    ));
                }
            }

            /// A start date other than latest end + 1 day is always rejected
            /// once a period exists.
            #[test]
            fn prop_non_abutting_start_rejected(offset in 2i64..400) {
                let mut calendar = PeriodCalendar::new(TenantId::new());
                let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
                let end = NaiveDate::from_ymd_opt(2024, 1, 31).unwrap();
                calendar.create_period("Jan".to_string(), start, end).unwrap();

                let late_start = end + Duration::days(offset);
                let result = calendar.create_period(
                    "Late".to_string(),
                    late_start,
                    late_start + Duration::days(27),
                );
                prop_assert!(matches!(result, Err(PeriodError::PeriodGap { .. })), "expected PeriodGap error");
            }
        }
    }
}

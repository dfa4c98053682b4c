//! Accounting period service.

use std::sync::Arc;

use chrono::{NaiveDate, Utc};
use tracing::info;

use numera_core::fiscal::{AccountingPeriod, PeriodAuditRecord, PeriodError};
use numera_shared::types::{PeriodId, TenantId};

use crate::{LedgerStore, read_guard, write_guard};

/// Input for creating an accounting period.
#[derive(Debug, Clone)]
pub struct CreatePeriodInput {
    /// Period name (e.g., "January 2026").
    pub name: String,
    /// Start date.
    pub start_date: NaiveDate,
    /// End date (inclusive).
    pub end_date: NaiveDate,
}

/// Service for accounting period operations.
#[derive(Debug, Clone)]
pub struct PeriodService {
    store: Arc<LedgerStore>,
}

impl PeriodService {
    /// Creates a new period service.
    #[must_use]
    pub fn new(store: Arc<LedgerStore>) -> Self {
        Self { store }
    }

    /// Creates a period at the end of the tenant's calendar.
    ///
    /// # Errors
    ///
    /// Returns `InvalidDateRange`, `PeriodOverlap`, or `PeriodGap`.
    pub fn create_period(
        &self,
        tenant_id: TenantId,
        input: CreatePeriodInput,
    ) -> Result<AccountingPeriod, PeriodError> {
        let handle = self.store.tenant(tenant_id);
        let mut ledger = write_guard(&handle);
        let period =
            ledger
                .calendar
                .create_period(input.name, input.start_date, input.end_date)?;

        info!(
            tenant_id = %tenant_id,
            period_id = %period.id,
            start = %period.start_date,
            end = %period.end_date,
            "Accounting period created"
        );
        Ok(period)
    }

    /// Closes a period.
    ///
    /// Runs under the tenant write guard so no post can interleave with
    /// the status change.
    ///
    /// # Errors
    ///
    /// Returns `PeriodNotFound`, `PeriodNotOpen`, or `EarlierPeriodOpen`.
    pub fn close_period(
        &self,
        tenant_id: TenantId,
        period_id: PeriodId,
    ) -> Result<AccountingPeriod, PeriodError> {
        let handle = self.store.tenant(tenant_id);
        let mut ledger = write_guard(&handle);
        let period = ledger.calendar.close_period(period_id, Utc::now())?;

        info!(
            tenant_id = %tenant_id,
            period_id = %period_id,
            "Accounting period closed"
        );
        Ok(period)
    }

    /// Reopens the most recently closed period; audited.
    ///
    /// # Errors
    ///
    /// Returns `PeriodNotFound`, `PeriodNotClosed`, or `LaterPeriodClosed`.
    pub fn reopen_period(
        &self,
        tenant_id: TenantId,
        period_id: PeriodId,
        reason: String,
    ) -> Result<AccountingPeriod, PeriodError> {
        let handle = self.store.tenant(tenant_id);
        let mut ledger = write_guard(&handle);
        let period = ledger
            .calendar
            .reopen_period(period_id, reason.clone(), Utc::now())?;

        info!(
            tenant_id = %tenant_id,
            period_id = %period_id,
            reason = %reason,
            "Accounting period reopened"
        );
        Ok(period)
    }

    /// Lists all periods in chronological order.
    #[must_use]
    pub fn list_periods(&self, tenant_id: TenantId) -> Vec<AccountingPeriod> {
        let handle = self.store.tenant(tenant_id);
        let ledger = read_guard(&handle);
        ledger.calendar.periods().to_vec()
    }

    /// Returns the close/reopen audit trail.
    #[must_use]
    pub fn audit_trail(&self, tenant_id: TenantId) -> Vec<PeriodAuditRecord> {
        let handle = self.store.tenant(tenant_id);
        let ledger = read_guard(&handle);
        ledger.calendar.audit_trail().to_vec()
    }
}

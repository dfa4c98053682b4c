//! Report service.
//!
//! Gathers report inputs under a tenant read guard and delegates the
//! computation to the pure report builders.

use std::sync::Arc;

use chrono::NaiveDate;
use tracing::error;

use numera_core::accounts::Account;
use numera_core::reports::{
    BalanceSheetReport, CashFlowReport, GeneralJournalReport, GeneralLedgerReport,
    IncomeStatementReport, ReportBuilder, ReportError, TrialBalanceReport,
};
use numera_shared::types::{AccountId, TenantId};

use crate::{LedgerStore, read_guard};

/// Service for read-only report queries.
#[derive(Debug, Clone)]
pub struct ReportService {
    store: Arc<LedgerStore>,
}

impl ReportService {
    /// Creates a new report service.
    #[must_use]
    pub fn new(store: Arc<LedgerStore>) -> Self {
        Self { store }
    }

    /// Trial balance as of a cut-off date.
    ///
    /// # Errors
    ///
    /// Returns a consistency failure if the columns do not balance.
    pub fn trial_balance(
        &self,
        tenant_id: TenantId,
        as_of: NaiveDate,
    ) -> Result<TrialBalanceReport, ReportError> {
        let handle = self.store.tenant(tenant_id);
        let ledger = read_guard(&handle);
        let accounts = ledger.chart.accounts_by_code();
        Self::checked(
            tenant_id,
            ReportBuilder::trial_balance(as_of, ledger.currency(), &accounts, |a, d| {
                ledger.balance_of(a, d)
            }),
        )
    }

    /// General journal over a date range.
    ///
    /// # Errors
    ///
    /// Returns `InvalidDateRange` if from is after to.
    pub fn general_journal(
        &self,
        tenant_id: TenantId,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<GeneralJournalReport, ReportError> {
        let handle = self.store.tenant(tenant_id);
        let ledger = read_guard(&handle);
        let accounts = ledger.chart.accounts_by_code();
        let entries = ledger.posted_entries();
        ReportBuilder::general_journal(from, to, ledger.currency(), &entries, &accounts)
    }

    /// General ledger over a date range, optionally for a single account.
    ///
    /// # Errors
    ///
    /// Returns `InvalidDateRange` or `AccountNotFound`.
    pub fn general_ledger(
        &self,
        tenant_id: TenantId,
        from: NaiveDate,
        to: NaiveDate,
        account_id: Option<AccountId>,
    ) -> Result<GeneralLedgerReport, ReportError> {
        let handle = self.store.tenant(tenant_id);
        let ledger = read_guard(&handle);

        let accounts: Vec<&Account> = match account_id {
            Some(id) => vec![
                ledger
                    .chart
                    .get(id)
                    .ok_or(ReportError::AccountNotFound(id))?,
            ],
            None => ledger.chart.accounts_by_code(),
        };

        ReportBuilder::general_ledger(
            from,
            to,
            ledger.currency(),
            &accounts,
            |account| {
                ReportBuilder::day_before(from)
                    .map_or(rust_decimal::Decimal::ZERO, |d| ledger.balance_of(account, d))
            },
            |account| ledger.ledger_lines_for(account.id),
        )
    }

    /// Balance sheet as of a cut-off date.
    ///
    /// # Errors
    ///
    /// Returns a consistency failure if assets do not equal liabilities
    /// plus equity.
    pub fn balance_sheet(
        &self,
        tenant_id: TenantId,
        as_of: NaiveDate,
    ) -> Result<BalanceSheetReport, ReportError> {
        let handle = self.store.tenant(tenant_id);
        let ledger = read_guard(&handle);
        let accounts = ledger.chart.accounts_by_code();
        Self::checked(
            tenant_id,
            ReportBuilder::balance_sheet(as_of, ledger.currency(), &accounts, |a, d| {
                ledger.balance_of(a, d)
            }),
        )
    }

    /// Income statement over a date range.
    ///
    /// # Errors
    ///
    /// Returns `InvalidDateRange` if from is after to.
    pub fn income_statement(
        &self,
        tenant_id: TenantId,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<IncomeStatementReport, ReportError> {
        let handle = self.store.tenant(tenant_id);
        let ledger = read_guard(&handle);
        let accounts = ledger.chart.accounts_by_code();
        ReportBuilder::income_statement(from, to, ledger.currency(), &accounts, |a, d| {
            ledger.balance_of(a, d)
        })
    }

    /// Cash flow statement over a date range (indirect method).
    ///
    /// # Errors
    ///
    /// Returns `InvalidDateRange` or a consistency failure if the
    /// derivation does not reconcile to cash balances.
    pub fn cash_flow(
        &self,
        tenant_id: TenantId,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<CashFlowReport, ReportError> {
        let handle = self.store.tenant(tenant_id);
        let ledger = read_guard(&handle);
        let accounts = ledger.chart.accounts_by_code();
        Self::checked(
            tenant_id,
            ReportBuilder::cash_flow(from, to, ledger.currency(), &accounts, |a, d| {
                ledger.balance_of(a, d)
            }),
        )
    }

    /// Rebuilds the projector from the posted log and compares balances.
    ///
    /// # Errors
    ///
    /// Returns a consistency failure on divergence.
    pub fn verify_projector(&self, tenant_id: TenantId) -> Result<(), ReportError> {
        let handle = self.store.tenant(tenant_id);
        let ledger = read_guard(&handle);
        Self::checked(tenant_id, ledger.verify_projector().map_err(Into::into))
    }

    /// Passes results through, raising consistency failures at alarm level.
    ///
    /// These signal a bug in the engine or projector; they must never be
    /// silently swallowed or retried.
    fn checked<T>(tenant_id: TenantId, result: Result<T, ReportError>) -> Result<T, ReportError> {
        if let Err(ReportError::Consistency(violation)) = &result {
            error!(
                tenant_id = %tenant_id,
                violation = %violation,
                "LEDGER CONSISTENCY VIOLATION"
            );
        }
        result
    }
}

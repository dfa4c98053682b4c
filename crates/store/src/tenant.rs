//! A single tenant's ledger state.
//!
//! The posted-entry log is append-only and is the source of truth; entry
//! numbers are assigned from a gapless per-tenant sequence only when an
//! entry is posted, inside the tenant's write guard.

use std::collections::HashMap;

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use tracing::info;

use numera_core::accounts::{Account, AccountError, ChartOfAccounts};
use numera_core::consistency::ConsistencyViolation;
use numera_core::fiscal::PeriodCalendar;
use numera_core::journal::{
    self, DraftInput, EntryStatus, JournalEntry, JournalError, JournalLine,
};
use numera_core::projector::BalanceProjector;
use numera_core::reports::GeneralLedgerLineInput;
use numera_shared::types::{AccountId, Currency, EntryId, LineId, TenantId};

/// The complete ledger state for one tenant.
#[derive(Debug)]
pub struct TenantLedger {
    tenant_id: TenantId,
    currency: Currency,
    /// Chart of accounts.
    pub chart: ChartOfAccounts,
    /// Accounting period calendar.
    pub calendar: PeriodCalendar,
    entries: HashMap<EntryId, JournalEntry>,
    posted_log: Vec<EntryId>,
    projector: BalanceProjector,
    next_entry_number: i64,
}

impl TenantLedger {
    /// Creates an empty ledger for the given tenant.
    #[must_use]
    pub fn new(tenant_id: TenantId, currency: Currency) -> Self {
        Self {
            tenant_id,
            currency,
            chart: ChartOfAccounts::new(tenant_id),
            calendar: PeriodCalendar::new(tenant_id),
            entries: HashMap::new(),
            posted_log: Vec::new(),
            projector: BalanceProjector::new(),
            next_entry_number: 1,
        }
    }

    /// The tenant this ledger belongs to.
    #[must_use]
    pub fn tenant_id(&self) -> TenantId {
        self.tenant_id
    }

    /// The ledger's functional currency.
    #[must_use]
    pub fn currency(&self) -> Currency {
        self.currency
    }

    /// An account's balance as of a cut-off date, in its normal convention.
    #[must_use]
    pub fn balance_of(&self, account: &Account, as_of: NaiveDate) -> Decimal {
        self.projector
            .balance_as_of(account.id, account.normal_side(), as_of)
    }

    /// Returns true if any posted line references the account within an
    /// open period. Governs whether the account can be deactivated.
    #[must_use]
    pub fn account_has_open_period_postings(&self, account_id: AccountId) -> bool {
        self.projector
            .lines(account_id)
            .iter()
            .any(|line| self.calendar.is_open_for_date(line.date))
    }

    /// Deactivates an account unless it has postings in an open period.
    ///
    /// # Errors
    ///
    /// Returns `AccountNotFound` or `AccountInUse`.
    pub fn deactivate_account(&mut self, account_id: AccountId) -> Result<Account, AccountError> {
        let in_use = self.account_has_open_period_postings(account_id);
        self.chart.deactivate_account(account_id, |_| in_use)
    }

    /// Returns the entry with the given id.
    #[must_use]
    pub fn entry(&self, entry_id: EntryId) -> Option<&JournalEntry> {
        self.entries.get(&entry_id)
    }

    /// Returns all entries in the posted log, in entry-number order.
    ///
    /// Voided entries stay in the log; their effect is cancelled by their
    /// reversal's lines, never by removal.
    #[must_use]
    pub fn posted_entries(&self) -> Vec<&JournalEntry> {
        self.posted_log
            .iter()
            .filter_map(|id| self.entries.get(id))
            .collect()
    }

    /// Read access to the projector.
    #[must_use]
    pub fn projector(&self) -> &BalanceProjector {
        &self.projector
    }

    /// Creates a draft entry after validating lines, accounts, and the
    /// balance rule. The projector is not touched.
    ///
    /// # Errors
    ///
    /// Returns any of the draft validation errors.
    pub fn create_draft(
        &mut self,
        input: DraftInput,
        now: DateTime<Utc>,
    ) -> Result<JournalEntry, JournalError> {
        journal::validate_lines(&input.lines, |id| self.chart.is_postable(id))?;

        let id = EntryId::new();
        let lines: Vec<JournalLine> = input
            .lines
            .into_iter()
            .map(|line| JournalLine {
                id: LineId::new(),
                entry_id: id,
                account_id: line.account_id,
                direction: line.direction,
                amount: line.amount,
                cost_center_id: line.cost_center_id,
                memo: line.memo,
            })
            .collect();

        let entry = JournalEntry {
            id,
            tenant_id: self.tenant_id,
            entry_number: None,
            entry_date: input.entry_date,
            description: input.description,
            status: EntryStatus::Draft,
            source_ref: input.source_ref,
            lines,
            reversal_of: None,
            reversed_by: None,
            void_reason: None,
            created_at: now,
            posted_at: None,
            voided_at: None,
        };
        self.entries.insert(id, entry.clone());
        Ok(entry)
    }

    /// Replaces a draft's content after re-validating it.
    ///
    /// # Errors
    ///
    /// Returns `EntryNotFound`, `EntryNotDraft`, or a validation error.
    pub fn update_draft(
        &mut self,
        entry_id: EntryId,
        input: DraftInput,
    ) -> Result<JournalEntry, JournalError> {
        let status = self
            .entries
            .get(&entry_id)
            .ok_or(JournalError::EntryNotFound(entry_id))?
            .status;
        if status != EntryStatus::Draft {
            return Err(JournalError::EntryNotDraft(entry_id));
        }

        journal::validate_lines(&input.lines, |id| self.chart.is_postable(id))?;

        let lines: Vec<JournalLine> = input
            .lines
            .into_iter()
            .map(|line| JournalLine {
                id: LineId::new(),
                entry_id,
                account_id: line.account_id,
                direction: line.direction,
                amount: line.amount,
                cost_center_id: line.cost_center_id,
                memo: line.memo,
            })
            .collect();

        let entry = self
            .entries
            .get_mut(&entry_id)
            .ok_or(JournalError::EntryNotFound(entry_id))?;
        entry.entry_date = input.entry_date;
        entry.description = input.description;
        entry.source_ref = input.source_ref;
        entry.lines = lines;
        Ok(entry.clone())
    }

    /// Deletes a draft entry.
    ///
    /// # Errors
    ///
    /// Returns `EntryNotFound` or `EntryNotDraft`.
    pub fn delete_draft(&mut self, entry_id: EntryId) -> Result<(), JournalError> {
        let status = self
            .entries
            .get(&entry_id)
            .ok_or(JournalError::EntryNotFound(entry_id))?
            .status;
        if status != EntryStatus::Draft {
            return Err(JournalError::EntryNotDraft(entry_id));
        }
        self.entries.remove(&entry_id);
        Ok(())
    }

    /// Posts a draft entry.
    ///
    /// Runs inside the tenant write guard: the balance re-check, the
    /// period-open check, and the number assignment happen at one
    /// consistency point, so concurrent posts can neither share a number
    /// nor leave a gap.
    ///
    /// # Errors
    ///
    /// Returns `EntryNotFound`, `EntryNotDraft`, `PeriodClosed`, or
    /// `UnbalancedEntry`. On error the entry stays a draft and no number
    /// is consumed.
    pub fn post_entry(
        &mut self,
        entry_id: EntryId,
        now: DateTime<Utc>,
    ) -> Result<JournalEntry, JournalError> {
        {
            let entry = self
                .entries
                .get(&entry_id)
                .ok_or(JournalError::EntryNotFound(entry_id))?;
            if entry.status != EntryStatus::Draft {
                return Err(JournalError::EntryNotDraft(entry_id));
            }
            if !self.calendar.is_open_for_date(entry.entry_date) {
                return Err(JournalError::PeriodClosed(entry.entry_date));
            }
            journal::validate_entry_balance(entry)?;
        }

        let entry_number = self.next_entry_number;
        let entry = self
            .entries
            .get_mut(&entry_id)
            .ok_or(JournalError::EntryNotFound(entry_id))?;
        entry.entry_number = Some(entry_number);
        entry.status = EntryStatus::Posted;
        entry.posted_at = Some(now);
        let posted = entry.clone();

        self.next_entry_number += 1;
        self.posted_log.push(entry_id);
        self.projector.apply_entry(&posted);

        info!(
            tenant_id = %self.tenant_id,
            entry_id = %entry_id,
            entry_number,
            "Journal entry posted"
        );
        Ok(posted)
    }

    /// Voids a posted entry by posting its exact debit/credit mirror.
    ///
    /// The reversal is dated on the void date, which must fall in an open
    /// period; the original's lines are never altered. Returns the voided
    /// original and the posted reversal.
    ///
    /// # Errors
    ///
    /// Returns `EntryNotFound`, `EntryNotPosted`, or `PeriodClosed`.
    pub fn void_entry(
        &mut self,
        entry_id: EntryId,
        reason: &str,
        void_date: NaiveDate,
        now: DateTime<Utc>,
    ) -> Result<(JournalEntry, JournalEntry), JournalError> {
        let original = self
            .entries
            .get(&entry_id)
            .ok_or(JournalError::EntryNotFound(entry_id))?;
        if original.status != EntryStatus::Posted {
            return Err(JournalError::EntryNotPosted(entry_id));
        }
        if !self.calendar.is_open_for_date(void_date) {
            return Err(JournalError::PeriodClosed(void_date));
        }

        let reversal = journal::build_reversal(original, void_date, reason, now)?;
        let reversal_id = reversal.id;
        self.entries.insert(reversal_id, reversal);

        let posted_reversal = match self.post_entry(reversal_id, now) {
            Ok(posted) => posted,
            Err(e) => {
                self.entries.remove(&reversal_id);
                return Err(e);
            }
        };

        let original = self
            .entries
            .get_mut(&entry_id)
            .ok_or(JournalError::EntryNotFound(entry_id))?;
        original.status = EntryStatus::Voided;
        original.voided_at = Some(now);
        original.reversed_by = Some(reversal_id);
        original.void_reason = Some(reason.to_string());
        let voided = original.clone();

        info!(
            tenant_id = %self.tenant_id,
            entry_id = %entry_id,
            reversal_id = %reversal_id,
            "Journal entry voided"
        );
        Ok((voided, posted_reversal))
    }

    /// Records a producer transaction: draft and post in one step.
    ///
    /// There is no partial success: a failed record leaves no draft behind.
    ///
    /// # Errors
    ///
    /// Returns any draft validation or posting error.
    pub fn record(
        &mut self,
        input: DraftInput,
        now: DateTime<Utc>,
    ) -> Result<JournalEntry, JournalError> {
        let draft = self.create_draft(input, now)?;
        match self.post_entry(draft.id, now) {
            Ok(posted) => Ok(posted),
            Err(e) => {
                self.entries.remove(&draft.id);
                Err(e)
            }
        }
    }

    /// Rebuilds the projector from the posted log and compares every
    /// balance against the live projector.
    ///
    /// # Errors
    ///
    /// Returns `ReplayMismatch` on divergence; this signals a bug and is
    /// never retried.
    pub fn verify_projector(&self) -> Result<(), ConsistencyViolation> {
        self.projector
            .verify_replay(self.posted_entries().into_iter())
    }

    /// Assembles general ledger line inputs for an account, in
    /// entry-number order, with entry descriptions attached.
    #[must_use]
    pub fn ledger_lines_for(&self, account_id: AccountId) -> Vec<GeneralLedgerLineInput> {
        self.projector
            .lines(account_id)
            .iter()
            .map(|line| {
                let description = self
                    .entries
                    .get(&line.entry_id)
                    .map(|e| e.description.clone())
                    .unwrap_or_default();
                GeneralLedgerLineInput {
                    entry_id: line.entry_id,
                    entry_number: line.entry_number,
                    date: line.date,
                    description,
                    direction: line.direction,
                    amount: line.amount,
                }
            })
            .collect()
    }
}

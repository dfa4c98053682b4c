//! Journal entry service.
//!
//! `record_transaction` is the single surface producers call; the other
//! methods are the operator surfaces for manual journal work.

use std::sync::Arc;

use chrono::{NaiveDate, Utc};
use tracing::info;

use numera_core::journal::{DraftInput, JournalEntry, JournalError};
use numera_shared::types::{EntryId, TenantId};

use crate::{LedgerStore, read_guard, write_guard};

/// Service for journal entry operations.
#[derive(Debug, Clone)]
pub struct JournalService {
    store: Arc<LedgerStore>,
}

impl JournalService {
    /// Creates a new journal service.
    #[must_use]
    pub fn new(store: Arc<LedgerStore>) -> Self {
        Self { store }
    }

    /// Records a producer transaction: validates, drafts, and posts in one
    /// critical section, returning the posted entry. There is no partial
    /// success; a failed record leaves nothing behind.
    ///
    /// # Errors
    ///
    /// Returns any draft validation or posting error.
    pub fn record_transaction(
        &self,
        tenant_id: TenantId,
        input: DraftInput,
    ) -> Result<JournalEntry, JournalError> {
        let handle = self.store.tenant(tenant_id);
        let mut ledger = write_guard(&handle);
        let posted = ledger.record(input, Utc::now())?;

        info!(
            tenant_id = %tenant_id,
            entry_id = %posted.id,
            entry_number = posted.entry_number,
            source_ref = posted.source_ref.as_deref().unwrap_or(""),
            "Transaction recorded"
        );
        Ok(posted)
    }

    /// Creates a draft entry without posting it.
    ///
    /// # Errors
    ///
    /// Returns any draft validation error.
    pub fn create_draft(
        &self,
        tenant_id: TenantId,
        input: DraftInput,
    ) -> Result<JournalEntry, JournalError> {
        let handle = self.store.tenant(tenant_id);
        let mut ledger = write_guard(&handle);
        ledger.create_draft(input, Utc::now())
    }

    /// Replaces a draft's content.
    ///
    /// # Errors
    ///
    /// Returns `EntryNotFound`, `EntryNotDraft`, or a validation error.
    pub fn update_draft(
        &self,
        tenant_id: TenantId,
        entry_id: EntryId,
        input: DraftInput,
    ) -> Result<JournalEntry, JournalError> {
        let handle = self.store.tenant(tenant_id);
        let mut ledger = write_guard(&handle);
        ledger.update_draft(entry_id, input)
    }

    /// Deletes a draft entry.
    ///
    /// # Errors
    ///
    /// Returns `EntryNotFound` or `EntryNotDraft`.
    pub fn delete_draft(&self, tenant_id: TenantId, entry_id: EntryId) -> Result<(), JournalError> {
        let handle = self.store.tenant(tenant_id);
        let mut ledger = write_guard(&handle);
        ledger.delete_draft(entry_id)
    }

    /// Posts a draft entry, assigning the next sequential entry number.
    ///
    /// # Errors
    ///
    /// Returns `EntryNotFound`, `EntryNotDraft`, `PeriodClosed`, or
    /// `UnbalancedEntry`.
    pub fn post_entry(
        &self,
        tenant_id: TenantId,
        entry_id: EntryId,
    ) -> Result<JournalEntry, JournalError> {
        let handle = self.store.tenant(tenant_id);
        let mut ledger = write_guard(&handle);
        ledger.post_entry(entry_id, Utc::now())
    }

    /// Voids a posted entry via a reversal dated on the void date.
    ///
    /// Returns the voided original and the posted reversal.
    ///
    /// # Errors
    ///
    /// Returns `EntryNotFound`, `EntryNotPosted`, or `PeriodClosed`.
    pub fn void_entry(
        &self,
        tenant_id: TenantId,
        entry_id: EntryId,
        reason: &str,
        void_date: NaiveDate,
    ) -> Result<(JournalEntry, JournalEntry), JournalError> {
        let handle = self.store.tenant(tenant_id);
        let mut ledger = write_guard(&handle);
        ledger.void_entry(entry_id, reason, void_date, Utc::now())
    }

    /// Returns the entry with the given id.
    ///
    /// # Errors
    ///
    /// Returns `EntryNotFound`.
    pub fn get_entry(
        &self,
        tenant_id: TenantId,
        entry_id: EntryId,
    ) -> Result<JournalEntry, JournalError> {
        let handle = self.store.tenant(tenant_id);
        let ledger = read_guard(&handle);
        ledger
            .entry(entry_id)
            .cloned()
            .ok_or(JournalError::EntryNotFound(entry_id))
    }
}

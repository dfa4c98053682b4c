//! Reversal construction for voiding posted entries.
//!
//! Voiding never mutates the original entry: it creates a new entry whose
//! lines are the exact debit/credit mirror of the original, dated on the
//! void date. Both entries are retained permanently.

use chrono::{DateTime, NaiveDate, Utc};

use numera_shared::types::{EntryId, LineId};

use crate::consistency::ConsistencyViolation;

use super::types::{EntryStatus, JournalEntry, JournalLine};

/// Builds the reversing entry for a posted entry.
///
/// Each original line reappears with its direction swapped and every other
/// field preserved; memos are prefixed with "Reversal: ". The result is a
/// draft carrying a back-reference to the original, ready to be posted in
/// the same critical section that marks the original voided.
///
/// # Errors
///
/// Returns `UnbalancedReversal` if the mirror does not balance, which can
/// only happen when the original was posted unbalanced. That is a bug, not
/// a caller error.
pub fn build_reversal(
    original: &JournalEntry,
    void_date: NaiveDate,
    reason: &str,
    now: DateTime<Utc>,
) -> Result<JournalEntry, ConsistencyViolation> {
    let id = EntryId::new();

    let lines: Vec<JournalLine> = original
        .lines
        .iter()
        .map(|line| JournalLine {
            id: LineId::new(),
            entry_id: id,
            account_id: line.account_id,
            direction: line.direction.opposite(),
            amount: line.amount,
            cost_center_id: line.cost_center_id,
            memo: Some(format!(
                "Reversal: {}",
                line.memo.clone().unwrap_or_default()
            )),
        })
        .collect();

    let entry = JournalEntry {
        id,
        tenant_id: original.tenant_id,
        entry_number: None,
        entry_date: void_date,
        description: format!("Reversal of entry {}. Reason: {reason}", original.id),
        status: EntryStatus::Draft,
        source_ref: original.source_ref.clone(),
        lines,
        reversal_of: Some(original.id),
        reversed_by: None,
        void_reason: None,
        created_at: now,
        posted_at: None,
        voided_at: None,
    };

    let debits = entry.total_debits();
    let credits = entry.total_credits();
    if debits != credits {
        return Err(ConsistencyViolation::UnbalancedReversal {
            entry_id: original.id,
            debits,
            credits,
        });
    }

    Ok(entry)
}

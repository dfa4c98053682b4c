//! Internal-consistency failure signals.
//!
//! A `ConsistencyViolation` means the engine or projector itself is wrong:
//! retrying cannot fix it, and it must never be folded into the
//! caller-recoverable validation errors. Callers log it at alarm level and
//! surface it as an internal failure.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use thiserror::Error;

use numera_shared::types::{AccountId, EntryId};

/// A detected violation of a ledger invariant that posted data must satisfy.
#[derive(Debug, Clone, Error)]
pub enum ConsistencyViolation {
    /// The trial balance columns diverge.
    #[error("Trial balance columns diverge as of {as_of}: debit {debits}, credit {credits}")]
    TrialBalanceMismatch {
        /// Report cut-off date.
        as_of: NaiveDate,
        /// Total of the debit column.
        debits: Decimal,
        /// Total of the credit column.
        credits: Decimal,
    },

    /// The accounting equation does not hold.
    #[error(
        "Balance sheet equation violated as of {as_of}: assets {assets}, liabilities {liabilities}, equity {equity}"
    )]
    BalanceSheetMismatch {
        /// Report cut-off date.
        as_of: NaiveDate,
        /// Total assets.
        assets: Decimal,
        /// Total liabilities.
        liabilities: Decimal,
        /// Total equity including current earnings.
        equity: Decimal,
    },

    /// The indirect-method cash flow does not reconcile to the literal
    /// change in cash balances.
    #[error("Cash flow does not reconcile: derived change {derived}, actual change {actual}")]
    CashFlowMismatch {
        /// Net change derived from net income and adjustments.
        derived: Decimal,
        /// Literal change in cash-account balances.
        actual: Decimal,
    },

    /// Replaying the posted-entry log produced a different balance than the
    /// live projector holds.
    #[error("Projector replay diverged for account {account_id}: live {live}, replayed {replayed}")]
    ReplayMismatch {
        /// The diverging account.
        account_id: AccountId,
        /// Signed balance held by the live projector.
        live: Decimal,
        /// Signed balance produced by replay.
        replayed: Decimal,
    },

    /// A reversal built from a posted entry is not balanced, meaning the
    /// original was posted unbalanced.
    #[error("Reversal of entry {entry_id} is not balanced: debit {debits}, credit {credits}")]
    UnbalancedReversal {
        /// The entry being voided.
        entry_id: EntryId,
        /// Total debits of the mirror.
        debits: Decimal,
        /// Total credits of the mirror.
        credits: Decimal,
    },
}

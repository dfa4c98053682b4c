//! Journal entry and line types.
//!
//! In double-entry bookkeeping every entry consists of at least two lines
//! whose debit and credit totals match exactly.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use numera_shared::types::{AccountId, CostCenterId, EntryId, LineId, TenantId};

/// Side of a journal line: either debit or credit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    /// Debit line.
    Debit,
    /// Credit line.
    Credit,
}

impl Direction {
    /// Returns the opposite side.
    #[must_use]
    pub const fn opposite(self) -> Self {
        match self {
            Self::Debit => Self::Credit,
            Self::Credit => Self::Debit,
        }
    }
}

/// Journal entry status in the posting lifecycle.
///
/// Entries progress DRAFT -> POSTED -> VOIDED; posted and voided entries
/// are immutable, and voiding happens through a reversal entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryStatus {
    /// Entry is being drafted and can be modified.
    Draft,
    /// Entry has been posted to the ledger (immutable).
    Posted,
    /// Entry has been voided via a reversal (immutable).
    Voided,
}

impl EntryStatus {
    /// Returns true if the entry can be modified.
    #[must_use]
    pub fn is_editable(&self) -> bool {
        matches!(self, Self::Draft)
    }

    /// Returns true if the entry is immutable.
    #[must_use]
    pub fn is_immutable(&self) -> bool {
        matches!(self, Self::Posted | Self::Voided)
    }
}

/// A single line in a journal entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JournalLine {
    /// Unique identifier for this line.
    pub id: LineId,
    /// The entry this line belongs to.
    pub entry_id: EntryId,
    /// The account affected by this line.
    pub account_id: AccountId,
    /// Whether this is a debit or credit line.
    pub direction: Direction,
    /// Amount; always positive.
    pub amount: Decimal,
    /// Optional cost center tag.
    pub cost_center_id: Option<CostCenterId>,
    /// Optional memo for this line.
    pub memo: Option<String>,
}

impl JournalLine {
    /// Returns the signed amount (positive for debit, negative for credit).
    #[must_use]
    pub fn signed_amount(&self) -> Decimal {
        match self.direction {
            Direction::Debit => self.amount,
            Direction::Credit => -self.amount,
        }
    }
}

/// A journal entry.
///
/// The entry number is assigned only when the entry is posted, so drafts
/// never consume numbers; numbers are sequential, unique, and never reused
/// even after voiding.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JournalEntry {
    /// Unique identifier.
    pub id: EntryId,
    /// Tenant this entry belongs to.
    pub tenant_id: TenantId,
    /// Sequential entry number; None until posted.
    pub entry_number: Option<i64>,
    /// The accounting date of the entry.
    pub entry_date: NaiveDate,
    /// A description of the business event.
    pub description: String,
    /// Current lifecycle status.
    pub status: EntryStatus,
    /// Opaque reference to the producing transaction (e.g., an invoice id).
    pub source_ref: Option<String>,
    /// The entry's lines; at least two once valid.
    pub lines: Vec<JournalLine>,
    /// For a reversal entry, the entry it reverses.
    pub reversal_of: Option<EntryId>,
    /// For a voided entry, the reversal that undid it.
    pub reversed_by: Option<EntryId>,
    /// Operator-supplied reason the entry was voided.
    pub void_reason: Option<String>,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// When the entry was posted.
    pub posted_at: Option<DateTime<Utc>>,
    /// When the entry was voided.
    pub voided_at: Option<DateTime<Utc>>,
}

impl JournalEntry {
    /// Sum of all debit line amounts.
    #[must_use]
    pub fn total_debits(&self) -> Decimal {
        self.lines
            .iter()
            .filter(|l| l.direction == Direction::Debit)
            .map(|l| l.amount)
            .sum()
    }

    /// Sum of all credit line amounts.
    #[must_use]
    pub fn total_credits(&self) -> Decimal {
        self.lines
            .iter()
            .filter(|l| l.direction == Direction::Credit)
            .map(|l| l.amount)
            .sum()
    }
}

/// Input for a single line of a new entry.
#[derive(Debug, Clone)]
pub struct LineInput {
    /// The account to post to.
    pub account_id: AccountId,
    /// Whether this is a debit or credit line.
    pub direction: Direction,
    /// The amount (must be positive).
    pub amount: Decimal,
    /// Optional cost center tag.
    pub cost_center_id: Option<CostCenterId>,
    /// Optional memo for this line.
    pub memo: Option<String>,
}

/// Input for creating a draft entry.
#[derive(Debug, Clone)]
pub struct DraftInput {
    /// The accounting date of the entry.
    pub entry_date: NaiveDate,
    /// A description of the business event.
    pub description: String,
    /// Opaque reference to the producing transaction.
    pub source_ref: Option<String>,
    /// The lines (must have at least 2).
    pub lines: Vec<LineInput>,
}

/// Debit and credit totals of an entry's lines.
#[derive(Debug, Clone, Copy)]
pub struct EntryTotals {
    /// Total debit amount.
    pub debits: Decimal,
    /// Total credit amount.
    pub credits: Decimal,
}

impl EntryTotals {
    /// Returns true when debits equal credits at full precision.
    #[must_use]
    pub fn is_balanced(&self) -> bool {
        self.debits == self.credits
    }

    /// Returns the difference between debits and credits.
    #[must_use]
    pub fn difference(&self) -> Decimal {
        self.debits - self.credits
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_status_editable() {
        assert!(EntryStatus::Draft.is_editable());
        assert!(!EntryStatus::Posted.is_editable());
        assert!(!EntryStatus::Voided.is_editable());
    }

    #[test]
    fn test_status_immutable() {
        assert!(!EntryStatus::Draft.is_immutable());
        assert!(EntryStatus::Posted.is_immutable());
        assert!(EntryStatus::Voided.is_immutable());
    }

    #[test]
    fn test_direction_opposite() {
        assert_eq!(Direction::Debit.opposite(), Direction::Credit);
        assert_eq!(Direction::Credit.opposite(), Direction::Debit);
    }

    #[test]
    fn test_signed_amount() {
        let entry_id = EntryId::new();
        let line = JournalLine {
            id: LineId::new(),
            entry_id,
            account_id: AccountId::new(),
            direction: Direction::Debit,
            amount: dec!(100),
            cost_center_id: None,
            memo: None,
        };
        assert_eq!(line.signed_amount(), dec!(100));

        let credit = JournalLine {
            direction: Direction::Credit,
            ..line
        };
        assert_eq!(credit.signed_amount(), dec!(-100));
    }

    #[test]
    fn test_entry_totals() {
        let totals = EntryTotals {
            debits: dec!(100.00),
            credits: dec!(100.00),
        };
        assert!(totals.is_balanced());
        assert_eq!(totals.difference(), Decimal::ZERO);

        let off = EntryTotals {
            debits: dec!(100.00),
            credits: dec!(50.00),
        };
        assert!(!off.is_balanced());
        assert_eq!(off.difference(), dec!(50.00));
    }
}

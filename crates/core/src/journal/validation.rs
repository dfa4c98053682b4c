//! Draft validation rules.
//!
//! The balance rule compares debit and credit totals at full decimal
//! precision with zero tolerance.

use rust_decimal::Decimal;

use numera_shared::types::AccountId;

use super::error::JournalError;
use super::types::{Direction, EntryTotals, JournalEntry, LineInput};

/// Validates the lines of a prospective entry.
///
/// Checks, in order: at least 2 lines, every amount positive, every account
/// postable (exists and active), and debits equal to credits at full
/// precision.
///
/// `is_postable_account` reports whether the account exists and is active.
///
/// # Errors
///
/// Returns `InsufficientLines`, `ZeroAmount`, `NegativeAmount`,
/// `InvalidAccount`, or `UnbalancedEntry`.
pub fn validate_lines<A>(lines: &[LineInput], is_postable_account: A) -> Result<EntryTotals, JournalError>
where
    A: Fn(AccountId) -> bool,
{
    if lines.len() < 2 {
        return Err(JournalError::InsufficientLines);
    }

    let mut debits = Decimal::ZERO;
    let mut credits = Decimal::ZERO;

    for line in lines {
        if line.amount == Decimal::ZERO {
            return Err(JournalError::ZeroAmount);
        }
        if line.amount < Decimal::ZERO {
            return Err(JournalError::NegativeAmount);
        }
        if !is_postable_account(line.account_id) {
            return Err(JournalError::InvalidAccount(line.account_id));
        }

        match line.direction {
            Direction::Debit => debits += line.amount,
            Direction::Credit => credits += line.amount,
        }
    }

    let totals = EntryTotals { debits, credits };
    if !totals.is_balanced() {
        return Err(JournalError::UnbalancedEntry {
            debits: totals.debits,
            credits: totals.credits,
        });
    }

    Ok(totals)
}

/// Re-checks the balance rule on an existing entry.
///
/// Posting re-validates inside the tenant's serialization point so an entry
/// can never reach the posted log unbalanced.
///
/// # Errors
///
/// Returns `UnbalancedEntry` if debits do not equal credits.
pub fn validate_entry_balance(entry: &JournalEntry) -> Result<EntryTotals, JournalError> {
    let totals = EntryTotals {
        debits: entry.total_debits(),
        credits: entry.total_credits(),
    };
    if !totals.is_balanced() {
        return Err(JournalError::UnbalancedEntry {
            debits: totals.debits,
            credits: totals.credits,
        });
    }
    Ok(totals)
}

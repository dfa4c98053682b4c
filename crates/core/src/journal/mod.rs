//! Journal entry domain logic.
//!
//! This module implements the journal engine's pure parts:
//! - Entry and line types with the draft/posted/voided lifecycle
//! - Draft validation (line count, amounts, accounts, balance rule)
//! - Reversal construction for voiding posted entries
//! - Error types for journal operations

pub mod error;
pub mod reversal;
pub mod types;
pub mod validation;

#[cfg(test)]
mod validation_props;

pub use error::JournalError;
pub use reversal::build_reversal;
pub use types::{Direction, DraftInput, EntryStatus, EntryTotals, JournalEntry, JournalLine, LineInput};
pub use validation::{validate_entry_balance, validate_lines};

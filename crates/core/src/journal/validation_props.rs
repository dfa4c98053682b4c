//! Property-based tests for journal entry validation rules.

use proptest::prelude::*;
use rust_decimal::Decimal;

use numera_shared::types::AccountId;

use super::error::JournalError;
use super::types::{Direction, LineInput};
use super::validation::validate_lines;

/// Strategy to generate a valid positive amount (> 0).
fn positive_amount() -> impl Strategy<Value = Decimal> {
    // Generate amounts from 0.01 to 1,000,000.00
    (1i64..100_000_000i64).prop_map(|cents| Decimal::new(cents, 2))
}

/// Strategy to generate a direction.
fn direction_strategy() -> impl Strategy<Value = Direction> {
    prop_oneof![Just(Direction::Debit), Just(Direction::Credit)]
}

/// Helper to create a line input for testing.
fn make_line(direction: Direction, amount: Decimal) -> LineInput {
    LineInput {
        account_id: AccountId::new(),
        direction,
        amount,
        cost_center_id: None,
        memo: None,
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// *For any* pair of equal debit and credit amounts, validation SHALL
    /// accept the entry and report matching totals.
    #[test]
    fn prop_mirrored_amounts_always_balance(amount in positive_amount()) {
        let lines = vec![
            make_line(Direction::Debit, amount),
            make_line(Direction::Credit, amount),
        ];

        let totals = validate_lines(&lines, |_| true);
        prop_assert!(totals.is_ok());
        let totals = totals.unwrap();
        prop_assert_eq!(totals.debits, totals.credits);
    }

    /// *For any* split of an amount across multiple debit lines against a
    /// single credit line, validation SHALL accept the entry: balance is
    /// checked on totals, not on line counts.
    #[test]
    fn prop_split_debits_balance(
        parts in prop::collection::vec(1i64..1_000_000i64, 2..8),
    ) {
        let total: i64 = parts.iter().sum();
        let mut lines: Vec<LineInput> = parts
            .iter()
            .map(|cents| make_line(Direction::Debit, Decimal::new(*cents, 2)))
            .collect();
        lines.push(make_line(Direction::Credit, Decimal::new(total, 2)));

        prop_assert!(validate_lines(&lines, |_| true).is_ok());
    }

    /// *For any* unequal debit and credit amounts, validation SHALL reject
    /// the entry with `UnbalancedEntry` carrying both totals.
    #[test]
    fn prop_unequal_amounts_rejected(
        debit in positive_amount(),
        credit in positive_amount(),
    ) {
        prop_assume!(debit != credit);
        let lines = vec![
            make_line(Direction::Debit, debit),
            make_line(Direction::Credit, credit),
        ];

        let result = validate_lines(&lines, |_| true);
        match result {
            Err(JournalError::UnbalancedEntry { debits, credits }) => {
                prop_assert_eq!(debits, debit);
                prop_assert_eq!(credits, credit);
            }
            other => prop_assert!(false, "expected UnbalancedEntry, got {:?}", other),
        }
    }

    /// *For any* single line, validation SHALL reject the entry regardless
    /// of direction or amount.
    #[test]
    fn prop_single_line_rejected(
        direction in direction_strategy(),
        amount in positive_amount(),
    ) {
        let lines = vec![make_line(direction, amount)];
        let result = validate_lines(&lines, |_| true);
        prop_assert!(matches!(result, Err(JournalError::InsufficientLines)));
    }

    /// *For any* balanced entry containing one unknown account, validation
    /// SHALL reject with `InvalidAccount` naming that account.
    #[test]
    fn prop_unknown_account_named(amount in positive_amount()) {
        let lines = vec![
            make_line(Direction::Debit, amount),
            make_line(Direction::Credit, amount),
        ];
        let unknown = lines[0].account_id;

        let result = validate_lines(&lines, |id| id != unknown);
        match result {
            Err(JournalError::InvalidAccount(id)) => prop_assert_eq!(id, unknown),
            other => prop_assert!(false, "expected InvalidAccount, got {:?}", other),
        }
    }
}

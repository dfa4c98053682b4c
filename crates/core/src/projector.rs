//! Balance projection from the posted-entry log.
//!
//! Balances are never stored as mutable "current balance" fields; the
//! projector is a pure function of the append-only posted-entry sequence and
//! can be rebuilt from scratch by replay. Every balance query takes a
//! cut-off date so historical reports stay reproducible after later
//! postings.

use std::collections::{HashMap, HashSet};

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Serialize;

use numera_shared::types::{AccountId, EntryId};

use crate::accounts::NormalSide;
use crate::consistency::ConsistencyViolation;
use crate::journal::{Direction, JournalEntry};

/// A posted journal line as the projector indexes it.
#[derive(Debug, Clone, Serialize)]
pub struct PostedLine {
    /// The entry this line came from.
    pub entry_id: EntryId,
    /// The entry's sequential number.
    pub entry_number: i64,
    /// The entry's accounting date.
    pub date: NaiveDate,
    /// Whether this is a debit or credit line.
    pub direction: Direction,
    /// Line amount; always positive.
    pub amount: Decimal,
}

impl PostedLine {
    /// Returns the (debit, credit) pair for this line.
    #[must_use]
    pub fn debit_credit(&self) -> (Decimal, Decimal) {
        match self.direction {
            Direction::Debit => (self.amount, Decimal::ZERO),
            Direction::Credit => (Decimal::ZERO, self.amount),
        }
    }
}

/// Per-account running balances derived from posted entries.
///
/// Entries are consumed in entry-number order and application is idempotent
/// keyed on entry id, so replay after a crash cannot double-apply.
#[derive(Debug, Default, Clone)]
pub struct BalanceProjector {
    applied: HashSet<EntryId>,
    by_account: HashMap<AccountId, Vec<PostedLine>>,
}

impl BalanceProjector {
    /// Creates an empty projector.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns true if the entry has already been applied.
    #[must_use]
    pub fn is_applied(&self, entry_id: EntryId) -> bool {
        self.applied.contains(&entry_id)
    }

    /// Applies a posted entry's lines to the per-account index.
    ///
    /// Returns false without touching state if the entry was already applied
    /// or carries no entry number (i.e., was never posted).
    pub fn apply_entry(&mut self, entry: &JournalEntry) -> bool {
        let Some(entry_number) = entry.entry_number else {
            return false;
        };
        if !self.applied.insert(entry.id) {
            return false;
        }

        for line in &entry.lines {
            self.by_account
                .entry(line.account_id)
                .or_default()
                .push(PostedLine {
                    entry_id: entry.id,
                    entry_number,
                    date: entry.entry_date,
                    direction: line.direction,
                    amount: line.amount,
                });
        }
        true
    }

    /// Returns the account's balance as of the cut-off date, expressed in
    /// the given normal-side convention.
    #[must_use]
    pub fn balance_as_of(
        &self,
        account_id: AccountId,
        side: NormalSide,
        as_of: NaiveDate,
    ) -> Decimal {
        let (debits, credits) = self.debit_credit_totals_as_of(account_id, as_of);
        side.balance_change(debits, credits)
    }

    /// Returns the account's (total debit, total credit) as of the cut-off.
    #[must_use]
    pub fn debit_credit_totals_as_of(
        &self,
        account_id: AccountId,
        as_of: NaiveDate,
    ) -> (Decimal, Decimal) {
        let mut debits = Decimal::ZERO;
        let mut credits = Decimal::ZERO;
        for line in self.lines(account_id).iter().filter(|l| l.date <= as_of) {
            match line.direction {
                Direction::Debit => debits += line.amount,
                Direction::Credit => credits += line.amount,
            }
        }
        (debits, credits)
    }

    /// Returns all posted lines for an account in entry-number order.
    #[must_use]
    pub fn lines(&self, account_id: AccountId) -> &[PostedLine] {
        self.by_account
            .get(&account_id)
            .map_or(&[], Vec::as_slice)
    }

    /// Returns the account's signed balance over all dates, debit-positive.
    ///
    /// Sign-convention independent; used for replay verification.
    #[must_use]
    pub fn signed_balance(&self, account_id: AccountId) -> Decimal {
        self.lines(account_id)
            .iter()
            .map(|l| match l.direction {
                Direction::Debit => l.amount,
                Direction::Credit => -l.amount,
            })
            .sum()
    }

    /// Rebuilds a projector from the posted-entry log.
    ///
    /// The iterator must yield entries in entry-number order, the order the
    /// log itself maintains.
    pub fn replay<'a, I>(entries: I) -> Self
    where
        I: IntoIterator<Item = &'a JournalEntry>,
    {
        let mut projector = Self::new();
        for entry in entries {
            projector.apply_entry(entry);
        }
        projector
    }

    /// Replays the posted-entry log and compares every account balance
    /// against this projector.
    ///
    /// # Errors
    ///
    /// Returns `ReplayMismatch` for the first diverging account. A mismatch
    /// means the projector or engine has a bug; it is never retried.
    pub fn verify_replay<'a, I>(&self, entries: I) -> Result<(), ConsistencyViolation>
    where
        I: IntoIterator<Item = &'a JournalEntry>,
    {
        let replayed = Self::replay(entries);

        let account_ids: HashSet<AccountId> = self
            .by_account
            .keys()
            .chain(replayed.by_account.keys())
            .copied()
            .collect();

        for account_id in account_ids {
            let live = self.signed_balance(account_id);
            let from_log = replayed.signed_balance(account_id);
            if live != from_log {
                return Err(ConsistencyViolation::ReplayMismatch {
                    account_id,
                    live,
                    replayed: from_log,
                });
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::journal::{EntryStatus, JournalLine};
    use chrono::Utc;
    use numera_shared::types::{LineId, TenantId};
    use proptest::prelude::*;
    use rust_decimal_macros::dec;

    fn entry(
        number: i64,
        date: NaiveDate,
        lines: Vec<(AccountId, Direction, Decimal)>,
    ) -> JournalEntry {
        let id = EntryId::new();
        let lines = lines
            .into_iter()
            .map(|(account_id, direction, amount)| JournalLine {
                id: LineId::new(),
                entry_id: id,
                account_id,
                direction,
                amount,
                cost_center_id: None,
                memo: None,
            })
            .collect();

        JournalEntry {
            id,
            tenant_id: TenantId::new(),
            entry_number: Some(number),
            entry_date: date,
            description: format!("Entry {number}"),
            status: EntryStatus::Posted,
            source_ref: None,
            lines,
            reversal_of: None,
            reversed_by: None,
            void_reason: None,
            created_at: Utc::now(),
            posted_at: Some(Utc::now()),
            voided_at: None,
        }
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_apply_is_idempotent() {
        let cash = AccountId::new();
        let sales = AccountId::new();
        let e = entry(
            1,
            date(2024, 1, 15),
            vec![
                (cash, Direction::Debit, dec!(100.00)),
                (sales, Direction::Credit, dec!(100.00)),
            ],
        );

        let mut projector = BalanceProjector::new();
        assert!(projector.apply_entry(&e));
        assert!(!projector.apply_entry(&e));

        assert_eq!(
            projector.balance_as_of(cash, NormalSide::Debit, date(2024, 1, 31)),
            dec!(100.00)
        );
    }

    #[test]
    fn test_unposted_entry_not_applied() {
        let mut e = entry(1, date(2024, 1, 15), vec![]);
        e.entry_number = None;

        let mut projector = BalanceProjector::new();
        assert!(!projector.apply_entry(&e));
        assert!(!projector.is_applied(e.id));
    }

    #[test]
    fn test_balance_respects_cutoff_date() {
        let cash = AccountId::new();
        let sales = AccountId::new();
        let mut projector = BalanceProjector::new();

        projector.apply_entry(&entry(
            1,
            date(2024, 1, 15),
            vec![
                (cash, Direction::Debit, dec!(100.00)),
                (sales, Direction::Credit, dec!(100.00)),
            ],
        ));
        projector.apply_entry(&entry(
            2,
            date(2024, 2, 10),
            vec![
                (cash, Direction::Debit, dec!(50.00)),
                (sales, Direction::Credit, dec!(50.00)),
            ],
        ));

        assert_eq!(
            projector.balance_as_of(cash, NormalSide::Debit, date(2024, 1, 31)),
            dec!(100.00)
        );
        assert_eq!(
            projector.balance_as_of(cash, NormalSide::Debit, date(2024, 2, 28)),
            dec!(150.00)
        );
        assert_eq!(
            projector.balance_as_of(cash, NormalSide::Debit, date(2023, 12, 31)),
            Decimal::ZERO
        );
        assert_eq!(
            projector.balance_as_of(sales, NormalSide::Credit, date(2024, 2, 28)),
            dec!(150.00)
        );
    }

    #[test]
    fn test_replay_matches_live() {
        let cash = AccountId::new();
        let sales = AccountId::new();
        let entries = vec![
            entry(
                1,
                date(2024, 1, 15),
                vec![
                    (cash, Direction::Debit, dec!(100.00)),
                    (sales, Direction::Credit, dec!(100.00)),
                ],
            ),
            entry(
                2,
                date(2024, 1, 20),
                vec![
                    (sales, Direction::Debit, dec!(100.00)),
                    (cash, Direction::Credit, dec!(100.00)),
                ],
            ),
        ];

        let mut live = BalanceProjector::new();
        for e in &entries {
            live.apply_entry(e);
        }

        assert!(live.verify_replay(entries.iter()).is_ok());
    }

    #[test]
    fn test_replay_divergence_detected() {
        let cash = AccountId::new();
        let sales = AccountId::new();
        let e = entry(
            1,
            date(2024, 1, 15),
            vec![
                (cash, Direction::Debit, dec!(100.00)),
                (sales, Direction::Credit, dec!(100.00)),
            ],
        );

        let mut live = BalanceProjector::new();
        live.apply_entry(&e);

        // Verifying against an empty log must flag the divergence.
        let result = live.verify_replay(std::iter::empty());
        assert!(matches!(
            result,
            Err(ConsistencyViolation::ReplayMismatch { .. })
        ));
    }

    #[test]
    fn test_lines_kept_in_entry_number_order() {
        let cash = AccountId::new();
        let other = AccountId::new();
        let mut projector = BalanceProjector::new();

        for n in 1..=5 {
            projector.apply_entry(&entry(
                n,
                date(2024, 1, u32::try_from(n).unwrap()),
                vec![
                    (cash, Direction::Debit, dec!(10)),
                    (other, Direction::Credit, dec!(10)),
                ],
            ));
        }

        let numbers: Vec<i64> = projector.lines(cash).iter().map(|l| l.entry_number).collect();
        assert_eq!(numbers, vec![1, 2, 3, 4, 5]);
    }

    fn amounts_strategy() -> impl Strategy<Value = Vec<i64>> {
        prop::collection::vec(1i64..1_000_000, 1..20)
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(100))]

        /// *For any* sequence of balanced postings, the sum of every
        /// account's signed balance SHALL be zero.
        #[test]
        fn prop_signed_balances_sum_to_zero(amounts in amounts_strategy()) {
            let a = AccountId::new();
            let b = AccountId::new();
            let mut projector = BalanceProjector::new();

            for (i, cents) in amounts.iter().enumerate() {
                let n = i64::try_from(i).unwrap() + 1;
                projector.apply_entry(&entry(
                    n,
                    date(2024, 1, 1),
                    vec![
                        (a, Direction::Debit, Decimal::new(*cents, 2)),
                        (b, Direction::Credit, Decimal::new(*cents, 2)),
                    ],
                ));
            }

            prop_assert_eq!(
                projector.signed_balance(a) + projector.signed_balance(b),
                Decimal::ZERO
            );
        }

        /// *For any* sequence of postings, replaying the same entries SHALL
        /// reproduce every balance exactly.
        #[test]
        fn prop_replay_is_deterministic(amounts in amounts_strategy()) {
            let a = AccountId::new();
            let b = AccountId::new();
            let entries: Vec<JournalEntry> = amounts
                .iter()
                .enumerate()
                .map(|(i, cents)| {
                    entry(
                        i64::try_from(i).unwrap() + 1,
                        date(2024, 1, 1),
                        vec![
                            (a, Direction::Debit, Decimal::new(*cents, 2)),
                            (b, Direction::Credit, Decimal::new(*cents, 2)),
                        ],
                    )
                })
                .collect();

            let mut live = BalanceProjector::new();
            for e in &entries {
                live.apply_entry(e);
            }

            prop_assert!(live.verify_replay(entries.iter()).is_ok());
        }
    }
}

//! Report builders.
//!
//! Builders are pure: they take account snapshots, balance closures, and
//! posted-log slices, and never touch storage. Reports that carry a ledger
//! invariant verify it before returning.

use chrono::NaiveDate;
use rust_decimal::Decimal;

use numera_shared::types::Currency;

use crate::accounts::{Account, AccountType, CashFlowClass, NormalSide};
use crate::consistency::ConsistencyViolation;
use crate::journal::{Direction, EntryStatus, JournalEntry};

use super::error::ReportError;
use super::types::{
    BalanceSheetReport, BalanceSheetRow, BalanceSheetSection, CashFlowReport, CashFlowRow,
    CashFlowSection, GeneralJournalEntry, GeneralJournalLine, GeneralJournalReport,
    GeneralLedgerAccount, GeneralLedgerLine, GeneralLedgerLineInput, GeneralLedgerReport,
    IncomeStatementReport, IncomeStatementRow, IncomeStatementSection, TrialBalanceReport,
    TrialBalanceRow, TrialBalanceTotals,
};

/// Stateless report builder.
pub struct ReportBuilder;

impl ReportBuilder {
    /// Builds the trial balance as of a cut-off date.
    ///
    /// Every account's balance lands in the column of its normal side, so a
    /// contra balance shows as negative in its natural column. Inactive
    /// accounts still appear while they carry a balance; omitting them
    /// would break the footer.
    ///
    /// # Errors
    ///
    /// Returns a `ConsistencyViolation` if the debit and credit columns do
    /// not total to the same amount.
    pub fn trial_balance<F>(
        as_of: NaiveDate,
        currency: Currency,
        accounts: &[&Account],
        balance_of: F,
    ) -> Result<TrialBalanceReport, ReportError>
    where
        F: Fn(&Account, NaiveDate) -> Decimal,
    {
        let mut rows = Vec::new();
        for account in Self::sorted_by_code(accounts) {
            let balance = balance_of(account, as_of);
            if !Self::reportable(account, balance) {
                continue;
            }
            let (debit, credit) = match account.normal_side() {
                NormalSide::Debit => (balance, Decimal::ZERO),
                NormalSide::Credit => (Decimal::ZERO, balance),
            };
            rows.push(TrialBalanceRow {
                account_id: account.id,
                code: account.code.clone(),
                name: account.name.clone(),
                account_type: account.account_type,
                debit,
                credit,
            });
        }

        let total_debit: Decimal = rows.iter().map(|r| r.debit).sum();
        let total_credit: Decimal = rows.iter().map(|r| r.credit).sum();
        if total_debit != total_credit {
            return Err(ConsistencyViolation::TrialBalanceMismatch {
                as_of,
                debits: total_debit,
                credits: total_credit,
            }
            .into());
        }

        Ok(TrialBalanceReport {
            as_of,
            currency,
            rows,
            totals: TrialBalanceTotals {
                total_debit,
                total_credit,
            },
        })
    }

    /// Builds the general journal over a date range.
    ///
    /// Includes posted and voided entries, ordered by entry number.
    ///
    /// # Errors
    ///
    /// Returns `InvalidDateRange` if from is after to.
    pub fn general_journal(
        from: NaiveDate,
        to: NaiveDate,
        currency: Currency,
        entries: &[&JournalEntry],
        accounts: &[&Account],
    ) -> Result<GeneralJournalReport, ReportError> {
        Self::check_range(from, to)?;

        let mut report_entries: Vec<GeneralJournalEntry> = entries
            .iter()
            .filter(|e| {
                matches!(e.status, EntryStatus::Posted | EntryStatus::Voided)
                    && e.entry_date >= from
                    && e.entry_date <= to
            })
            .filter_map(|e| {
                let entry_number = e.entry_number?;
                let lines = e
                    .lines
                    .iter()
                    .map(|line| {
                        let account = Self::find_account(accounts, line.account_id);
                        GeneralJournalLine {
                            account_id: line.account_id,
                            code: account.map(|a| a.code.clone()).unwrap_or_default(),
                            name: account.map(|a| a.name.clone()).unwrap_or_default(),
                            direction: line.direction,
                            amount: line.amount,
                            memo: line.memo.clone(),
                        }
                    })
                    .collect();
                Some(GeneralJournalEntry {
                    entry_id: e.id,
                    entry_number,
                    entry_date: e.entry_date,
                    description: e.description.clone(),
                    status: e.status,
                    source_ref: e.source_ref.clone(),
                    lines,
                })
            })
            .collect();
        report_entries.sort_by_key(|e| e.entry_number);

        Ok(GeneralJournalReport {
            from,
            to,
            currency,
            entries: report_entries,
        })
    }

    /// Builds the general ledger over a date range.
    ///
    /// Each account section carries the lines affecting it in range plus a
    /// running balance seeded from the balance the day before the range
    /// starts.
    ///
    /// # Errors
    ///
    /// Returns `InvalidDateRange` if from is after to.
    pub fn general_ledger<O, L>(
        from: NaiveDate,
        to: NaiveDate,
        currency: Currency,
        accounts: &[&Account],
        opening_of: O,
        lines_of: L,
    ) -> Result<GeneralLedgerReport, ReportError>
    where
        O: Fn(&Account) -> Decimal,
        L: Fn(&Account) -> Vec<GeneralLedgerLineInput>,
    {
        Self::check_range(from, to)?;

        let mut sections = Vec::new();
        for account in Self::sorted_by_code(accounts) {
            let opening_balance = opening_of(account);
            let mut inputs: Vec<GeneralLedgerLineInput> = lines_of(account)
                .into_iter()
                .filter(|l| l.date >= from && l.date <= to)
                .collect();
            inputs.sort_by_key(|l| l.entry_number);

            if inputs.is_empty() && !Self::reportable(account, opening_balance) {
                continue;
            }

            let side = account.normal_side();
            let mut running = opening_balance;
            let lines: Vec<GeneralLedgerLine> = inputs
                .into_iter()
                .map(|input| {
                    let (debit, credit) = match input.direction {
                        Direction::Debit => (input.amount, Decimal::ZERO),
                        Direction::Credit => (Decimal::ZERO, input.amount),
                    };
                    running += side.balance_change(debit, credit);
                    GeneralLedgerLine {
                        entry_id: input.entry_id,
                        entry_number: input.entry_number,
                        date: input.date,
                        description: input.description,
                        debit,
                        credit,
                        running_balance: running,
                    }
                })
                .collect();

            sections.push(GeneralLedgerAccount {
                account_id: account.id,
                code: account.code.clone(),
                name: account.name.clone(),
                opening_balance,
                closing_balance: running,
                lines,
            });
        }

        Ok(GeneralLedgerReport {
            from,
            to,
            currency,
            accounts: sections,
        })
    }

    /// Builds the balance sheet as of a cut-off date.
    ///
    /// Revenue and expense accounts are never closed into equity, so the
    /// equity section carries a computed current-earnings row (revenue
    /// minus expense as of the date); without it the accounting equation
    /// cannot hold.
    ///
    /// # Errors
    ///
    /// Returns a `ConsistencyViolation` if assets do not equal liabilities
    /// plus equity.
    pub fn balance_sheet<F>(
        as_of: NaiveDate,
        currency: Currency,
        accounts: &[&Account],
        balance_of: F,
    ) -> Result<BalanceSheetReport, ReportError>
    where
        F: Fn(&Account, NaiveDate) -> Decimal,
    {
        let mut assets = BalanceSheetSection::default();
        let mut liabilities = BalanceSheetSection::default();
        let mut equity = BalanceSheetSection::default();
        let mut revenue_total = Decimal::ZERO;
        let mut expense_total = Decimal::ZERO;

        for account in Self::sorted_by_code(accounts) {
            let balance = balance_of(account, as_of);
            match account.account_type {
                AccountType::Asset => Self::push_balance_row(&mut assets, account, balance),
                AccountType::Liability => {
                    Self::push_balance_row(&mut liabilities, account, balance);
                }
                AccountType::Equity => Self::push_balance_row(&mut equity, account, balance),
                AccountType::Revenue => revenue_total += balance,
                AccountType::Expense => expense_total += balance,
            }
        }

        let current_earnings = revenue_total - expense_total;
        equity.total += current_earnings;
        equity.rows.push(BalanceSheetRow {
            account_id: None,
            code: None,
            name: "Current earnings".to_string(),
            balance: current_earnings,
        });

        let total_assets = assets.total;
        let total_liabilities = liabilities.total;
        let total_equity = equity.total;
        let liabilities_and_equity = total_liabilities + total_equity;

        if total_assets != liabilities_and_equity {
            return Err(ConsistencyViolation::BalanceSheetMismatch {
                as_of,
                assets: total_assets,
                liabilities: total_liabilities,
                equity: total_equity,
            }
            .into());
        }

        Ok(BalanceSheetReport {
            as_of,
            currency,
            assets,
            liabilities,
            equity,
            total_assets,
            total_liabilities,
            total_equity,
            liabilities_and_equity,
        })
    }

    /// Builds the income statement over a date range.
    ///
    /// Each row is the movement over the range: balance at the range end
    /// minus balance the day before the range starts.
    ///
    /// # Errors
    ///
    /// Returns `InvalidDateRange` if from is after to.
    pub fn income_statement<F>(
        from: NaiveDate,
        to: NaiveDate,
        currency: Currency,
        accounts: &[&Account],
        balance_of: F,
    ) -> Result<IncomeStatementReport, ReportError>
    where
        F: Fn(&Account, NaiveDate) -> Decimal,
    {
        Self::check_range(from, to)?;

        let mut revenue = IncomeStatementSection::default();
        let mut expenses = IncomeStatementSection::default();

        for account in Self::sorted_by_code(accounts) {
            let section = match account.account_type {
                AccountType::Revenue => &mut revenue,
                AccountType::Expense => &mut expenses,
                _ => continue,
            };
            let amount = Self::delta_over(account, from, to, &balance_of);
            if !Self::reportable(account, amount) {
                continue;
            }
            section.total += amount;
            section.rows.push(IncomeStatementRow {
                account_id: account.id,
                code: account.code.clone(),
                name: account.name.clone(),
                amount,
            });
        }

        let net_income = revenue.total - expenses.total;
        Ok(IncomeStatementReport {
            from,
            to,
            currency,
            revenue,
            expenses,
            net_income,
        })
    }

    /// Builds the cash flow statement over a date range (indirect method).
    ///
    /// Starts from net income and adjusts by the cash effect of every
    /// non-cash balance-sheet account's movement, bucketed by the account's
    /// cash-flow class. The derived net change must equal the literal
    /// change in cash-account balances.
    ///
    /// # Errors
    ///
    /// Returns `InvalidDateRange` if from is after to, or a
    /// `ConsistencyViolation` if the derivation does not reconcile.
    pub fn cash_flow<F>(
        from: NaiveDate,
        to: NaiveDate,
        currency: Currency,
        accounts: &[&Account],
        balance_of: F,
    ) -> Result<CashFlowReport, ReportError>
    where
        F: Fn(&Account, NaiveDate) -> Decimal,
    {
        Self::check_range(from, to)?;

        let mut net_income = Decimal::ZERO;
        let mut operating = CashFlowSection::default();
        let mut investing = CashFlowSection::default();
        let mut financing = CashFlowSection::default();
        let mut opening_cash = Decimal::ZERO;
        let mut closing_cash = Decimal::ZERO;

        for account in Self::sorted_by_code(accounts) {
            match account.account_type {
                AccountType::Revenue => {
                    net_income += Self::delta_over(account, from, to, &balance_of);
                    continue;
                }
                AccountType::Expense => {
                    net_income -= Self::delta_over(account, from, to, &balance_of);
                    continue;
                }
                AccountType::Asset | AccountType::Liability | AccountType::Equity => {}
            }

            // Movements expressed in debit terms so cash arithmetic has one
            // sign convention regardless of the account's normal side.
            let side = account.normal_side();
            let in_debit_terms = |amount: Decimal| match side {
                NormalSide::Debit => amount,
                NormalSide::Credit => -amount,
            };

            if account.cash_flow == CashFlowClass::Cash {
                let opening = Self::day_before(from)
                    .map_or(Decimal::ZERO, |d| balance_of(account, d));
                opening_cash += in_debit_terms(opening);
                closing_cash += in_debit_terms(balance_of(account, to));
                continue;
            }

            let delta = Self::delta_over(account, from, to, &balance_of);
            let effect = -in_debit_terms(delta);
            if effect == Decimal::ZERO {
                continue;
            }
            let section = match account.cash_flow {
                // Cash was consumed above; a row here cannot be reached.
                CashFlowClass::Operating | CashFlowClass::Cash => &mut operating,
                CashFlowClass::Investing => &mut investing,
                CashFlowClass::Financing => &mut financing,
            };
            section.total += effect;
            section.rows.push(CashFlowRow {
                account_id: account.id,
                code: account.code.clone(),
                name: account.name.clone(),
                amount: effect,
            });
        }

        operating.total += net_income;
        let net_change = operating.total + investing.total + financing.total;
        let actual_change = closing_cash - opening_cash;
        if net_change != actual_change {
            return Err(ConsistencyViolation::CashFlowMismatch {
                derived: net_change,
                actual: actual_change,
            }
            .into());
        }

        Ok(CashFlowReport {
            from,
            to,
            currency,
            net_income,
            operating,
            investing,
            financing,
            net_change,
            opening_cash,
            closing_cash,
        })
    }

    /// Returns the day before a date, or None at the calendar's edge.
    #[must_use]
    pub fn day_before(date: NaiveDate) -> Option<NaiveDate> {
        date.pred_opt()
    }

    fn delta_over<F>(account: &Account, from: NaiveDate, to: NaiveDate, balance_of: &F) -> Decimal
    where
        F: Fn(&Account, NaiveDate) -> Decimal,
    {
        let opening = Self::day_before(from).map_or(Decimal::ZERO, |d| balance_of(account, d));
        balance_of(account, to) - opening
    }

    fn check_range(from: NaiveDate, to: NaiveDate) -> Result<(), ReportError> {
        if from > to {
            return Err(ReportError::InvalidDateRange { from, to });
        }
        Ok(())
    }

    fn reportable(account: &Account, amount: Decimal) -> bool {
        account.is_active || amount != Decimal::ZERO
    }

    fn sorted_by_code<'a>(accounts: &[&'a Account]) -> Vec<&'a Account> {
        let mut sorted: Vec<&Account> = accounts.to_vec();
        sorted.sort_by(|a, b| a.code.cmp(&b.code));
        sorted
    }

    fn find_account<'a>(accounts: &[&'a Account], id: numera_shared::types::AccountId) -> Option<&'a Account> {
        accounts.iter().find(|a| a.id == id).copied()
    }

    fn push_balance_row(section: &mut BalanceSheetSection, account: &Account, balance: Decimal) {
        if !Self::reportable(account, balance) {
            return;
        }
        section.total += balance;
        section.rows.push(BalanceSheetRow {
            account_id: Some(account.id),
            code: Some(account.code.clone()),
            name: account.name.clone(),
            balance,
        });
    }
}

//! Report data types.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Serialize;

use numera_shared::types::{AccountId, Currency, EntryId};

use crate::accounts::AccountType;
use crate::journal::{Direction, EntryStatus};

/// One account row of the trial balance.
#[derive(Debug, Clone, Serialize)]
pub struct TrialBalanceRow {
    /// Account ID.
    pub account_id: AccountId,
    /// Account code.
    pub code: String,
    /// Account name.
    pub name: String,
    /// Account type.
    pub account_type: AccountType,
    /// Balance shown in the debit column (debit-normal accounts).
    pub debit: Decimal,
    /// Balance shown in the credit column (credit-normal accounts).
    pub credit: Decimal,
}

/// Trial balance footer totals.
#[derive(Debug, Clone, Serialize)]
pub struct TrialBalanceTotals {
    /// Total of the debit column.
    pub total_debit: Decimal,
    /// Total of the credit column.
    pub total_credit: Decimal,
}

/// Trial balance report.
#[derive(Debug, Clone, Serialize)]
pub struct TrialBalanceReport {
    /// As of date.
    pub as_of: NaiveDate,
    /// Currency code.
    pub currency: Currency,
    /// Account rows ordered by code.
    pub rows: Vec<TrialBalanceRow>,
    /// Footer totals; always equal once the report is produced.
    pub totals: TrialBalanceTotals,
}

/// One line of a general journal entry.
#[derive(Debug, Clone, Serialize)]
pub struct GeneralJournalLine {
    /// Account posted to.
    pub account_id: AccountId,
    /// Account code.
    pub code: String,
    /// Account name.
    pub name: String,
    /// Debit or credit.
    pub direction: Direction,
    /// Line amount.
    pub amount: Decimal,
    /// Line memo.
    pub memo: Option<String>,
}

/// One entry of the general journal.
#[derive(Debug, Clone, Serialize)]
pub struct GeneralJournalEntry {
    /// Entry ID.
    pub entry_id: EntryId,
    /// Sequential entry number.
    pub entry_number: i64,
    /// Accounting date.
    pub entry_date: NaiveDate,
    /// Entry description.
    pub description: String,
    /// Posted or voided.
    pub status: EntryStatus,
    /// Opaque producer reference.
    pub source_ref: Option<String>,
    /// The entry's lines.
    pub lines: Vec<GeneralJournalLine>,
}

/// General journal report: the chronological book of entries.
///
/// Entry number order is the canonical chronological order, since entry
/// dates may tie.
#[derive(Debug, Clone, Serialize)]
pub struct GeneralJournalReport {
    /// Range start.
    pub from: NaiveDate,
    /// Range end.
    pub to: NaiveDate,
    /// Currency code.
    pub currency: Currency,
    /// Entries in entry-number order.
    pub entries: Vec<GeneralJournalEntry>,
}

/// Input line for building a general ledger section.
#[derive(Debug, Clone)]
pub struct GeneralLedgerLineInput {
    /// The entry this line came from.
    pub entry_id: EntryId,
    /// The entry's sequential number.
    pub entry_number: i64,
    /// The entry's accounting date.
    pub date: NaiveDate,
    /// The entry's description.
    pub description: String,
    /// Debit or credit.
    pub direction: Direction,
    /// Line amount.
    pub amount: Decimal,
}

/// One line of a general ledger account section, with running balance.
#[derive(Debug, Clone, Serialize)]
pub struct GeneralLedgerLine {
    /// The entry this line came from.
    pub entry_id: EntryId,
    /// The entry's sequential number.
    pub entry_number: i64,
    /// The entry's accounting date.
    pub date: NaiveDate,
    /// The entry's description.
    pub description: String,
    /// Debit amount (zero if credit).
    pub debit: Decimal,
    /// Credit amount (zero if debit).
    pub credit: Decimal,
    /// Balance after this line, in the account's normal convention.
    pub running_balance: Decimal,
}

/// General ledger section for one account.
#[derive(Debug, Clone, Serialize)]
pub struct GeneralLedgerAccount {
    /// Account ID.
    pub account_id: AccountId,
    /// Account code.
    pub code: String,
    /// Account name.
    pub name: String,
    /// Balance the day before the range starts.
    pub opening_balance: Decimal,
    /// Balance after the last line in range.
    pub closing_balance: Decimal,
    /// Lines in entry-number order.
    pub lines: Vec<GeneralLedgerLine>,
}

/// General ledger report.
#[derive(Debug, Clone, Serialize)]
pub struct GeneralLedgerReport {
    /// Range start.
    pub from: NaiveDate,
    /// Range end.
    pub to: NaiveDate,
    /// Currency code.
    pub currency: Currency,
    /// Per-account sections ordered by account code.
    pub accounts: Vec<GeneralLedgerAccount>,
}

/// One row of a balance sheet section.
///
/// The computed current-earnings row carries no account id.
#[derive(Debug, Clone, Serialize)]
pub struct BalanceSheetRow {
    /// Account ID; None for computed rows.
    pub account_id: Option<AccountId>,
    /// Account code; None for computed rows.
    pub code: Option<String>,
    /// Row name.
    pub name: String,
    /// Balance in the account's normal convention.
    pub balance: Decimal,
}

/// Balance sheet section (assets, liabilities, equity).
#[derive(Debug, Clone, Default, Serialize)]
pub struct BalanceSheetSection {
    /// Section total.
    pub total: Decimal,
    /// Rows ordered by code.
    pub rows: Vec<BalanceSheetRow>,
}

/// Balance sheet report.
#[derive(Debug, Clone, Serialize)]
pub struct BalanceSheetReport {
    /// As of date.
    pub as_of: NaiveDate,
    /// Currency code.
    pub currency: Currency,
    /// Assets section.
    pub assets: BalanceSheetSection,
    /// Liabilities section.
    pub liabilities: BalanceSheetSection,
    /// Equity section, including the computed current-earnings row.
    pub equity: BalanceSheetSection,
    /// Total assets.
    pub total_assets: Decimal,
    /// Total liabilities.
    pub total_liabilities: Decimal,
    /// Total equity.
    pub total_equity: Decimal,
    /// Liabilities plus equity; equals total assets once produced.
    pub liabilities_and_equity: Decimal,
}

/// One account row of an income statement section.
#[derive(Debug, Clone, Serialize)]
pub struct IncomeStatementRow {
    /// Account ID.
    pub account_id: AccountId,
    /// Account code.
    pub code: String,
    /// Account name.
    pub name: String,
    /// Movement over the period, in the account's normal convention.
    pub amount: Decimal,
}

/// Income statement section.
#[derive(Debug, Clone, Default, Serialize)]
pub struct IncomeStatementSection {
    /// Section total.
    pub total: Decimal,
    /// Rows ordered by code.
    pub rows: Vec<IncomeStatementRow>,
}

/// Income statement report over a period delta.
///
/// Revenue and expense accounts are stored as running balances, so each
/// row is the balance at the range end minus the balance the day before
/// the range starts.
#[derive(Debug, Clone, Serialize)]
pub struct IncomeStatementReport {
    /// Range start.
    pub from: NaiveDate,
    /// Range end.
    pub to: NaiveDate,
    /// Currency code.
    pub currency: Currency,
    /// Revenue section.
    pub revenue: IncomeStatementSection,
    /// Expense section.
    pub expenses: IncomeStatementSection,
    /// Revenue total minus expense total.
    pub net_income: Decimal,
}

/// One adjustment row of a cash flow section.
#[derive(Debug, Clone, Serialize)]
pub struct CashFlowRow {
    /// Account driving the adjustment.
    pub account_id: AccountId,
    /// Account code.
    pub code: String,
    /// Account name.
    pub name: String,
    /// Cash effect of the account's movement over the range.
    pub amount: Decimal,
}

/// Cash flow activity section.
#[derive(Debug, Clone, Default, Serialize)]
pub struct CashFlowSection {
    /// Section total. The operating section's total includes net income.
    pub total: Decimal,
    /// Adjustment rows ordered by code.
    pub rows: Vec<CashFlowRow>,
}

/// Cash flow report (indirect method).
#[derive(Debug, Clone, Serialize)]
pub struct CashFlowReport {
    /// Range start.
    pub from: NaiveDate,
    /// Range end.
    pub to: NaiveDate,
    /// Currency code.
    pub currency: Currency,
    /// Net income over the range, the starting point of the derivation.
    pub net_income: Decimal,
    /// Operating activities (net income plus working-capital movements).
    pub operating: CashFlowSection,
    /// Investing activities.
    pub investing: CashFlowSection,
    /// Financing activities.
    pub financing: CashFlowSection,
    /// Sum of the three activity totals.
    pub net_change: Decimal,
    /// Cash balance the day before the range starts.
    pub opening_cash: Decimal,
    /// Cash balance at the range end; equals opening plus net change once
    /// the report is produced.
    pub closing_cash: Decimal,
}

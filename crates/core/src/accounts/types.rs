//! Account domain types.
//!
//! The normal balance side of an account is a pure function of its type and
//! is never stored independently, so an account can never drift out of sync
//! with its type.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use numera_shared::types::{AccountId, TenantId};

/// Account classification in the chart of accounts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AccountType {
    /// Resources owned by the business.
    Asset,
    /// Obligations owed to others.
    Liability,
    /// Owner claims on the business.
    Equity,
    /// Income earned from operations.
    Revenue,
    /// Costs incurred in operations.
    Expense,
}

impl AccountType {
    /// Returns the side on which this account type's balance increases.
    #[must_use]
    pub const fn normal_side(self) -> NormalSide {
        match self {
            Self::Asset | Self::Expense => NormalSide::Debit,
            Self::Liability | Self::Equity | Self::Revenue => NormalSide::Credit,
        }
    }

    /// Returns true for account types that appear on the balance sheet.
    #[must_use]
    pub const fn is_balance_sheet(self) -> bool {
        matches!(self, Self::Asset | Self::Liability | Self::Equity)
    }

    /// Returns the lowercase name used in report rows.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Asset => "asset",
            Self::Liability => "liability",
            Self::Equity => "equity",
            Self::Revenue => "revenue",
            Self::Expense => "expense",
        }
    }
}

impl std::fmt::Display for AccountType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// The direction in which an account's balance conventionally increases.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NormalSide {
    /// Balance increases on debit lines (assets, expenses).
    Debit,
    /// Balance increases on credit lines (liabilities, equity, revenue).
    Credit,
}

impl NormalSide {
    /// Calculates the signed balance change of a (debit, credit) pair in
    /// this side's convention.
    #[must_use]
    pub fn balance_change(self, debit: Decimal, credit: Decimal) -> Decimal {
        match self {
            Self::Debit => debit - credit,
            Self::Credit => credit - debit,
        }
    }
}

/// Cash-flow statement classification for an account.
///
/// Used by the indirect-method cash flow report to bucket balance-sheet
/// movements into activities.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CashFlowClass {
    /// Cash and cash equivalents; the report reconciles to these accounts.
    Cash,
    /// Working-capital movements (receivables, payables, inventory).
    Operating,
    /// Long-lived asset movements.
    Investing,
    /// Debt and owner-capital movements.
    Financing,
}

impl CashFlowClass {
    /// Returns the default classification for an account type.
    #[must_use]
    pub const fn default_for(account_type: AccountType) -> Self {
        match account_type {
            AccountType::Equity => Self::Financing,
            AccountType::Asset
            | AccountType::Liability
            | AccountType::Revenue
            | AccountType::Expense => Self::Operating,
        }
    }
}

/// An account in the chart of accounts.
///
/// Accounts form a tree through `parent_id`; the tree is stored as a flat
/// map with a materialized ancestor `path` (root first, ending with the
/// account's own id) for ancestor/descendant queries of arbitrary depth.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Account {
    /// Unique identifier.
    pub id: AccountId,
    /// Tenant this account belongs to.
    pub tenant_id: TenantId,
    /// Account code, unique per tenant, used for ordering and display.
    pub code: String,
    /// Human-readable name.
    pub name: String,
    /// Account classification.
    pub account_type: AccountType,
    /// Parent account, if this is not a root account.
    pub parent_id: Option<AccountId>,
    /// Materialized ancestor path, root first, including this account.
    pub path: Vec<AccountId>,
    /// Cash-flow statement classification.
    pub cash_flow: CashFlowClass,
    /// Whether the account accepts new postings.
    pub is_active: bool,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
}

impl Account {
    /// Returns the side on which this account's balance increases.
    #[must_use]
    pub fn normal_side(&self) -> NormalSide {
        self.account_type.normal_side()
    }

    /// Returns the depth of this account in the tree (roots are 0).
    #[must_use]
    pub fn depth(&self) -> usize {
        self.path.len().saturating_sub(1)
    }

    /// Returns true if this account is a descendant of `ancestor`.
    #[must_use]
    pub fn is_descendant_of(&self, ancestor: AccountId) -> bool {
        self.id != ancestor && self.path.contains(&ancestor)
    }
}

/// Input for creating a new account.
#[derive(Debug, Clone)]
pub struct CreateAccountInput {
    /// Account code, unique per tenant.
    pub code: String,
    /// Human-readable name.
    pub name: String,
    /// Account classification.
    pub account_type: AccountType,
    /// Optional parent account.
    pub parent_id: Option<AccountId>,
    /// Cash-flow classification; defaults from the account type when absent.
    pub cash_flow: Option<CashFlowClass>,
}

/// A node in the account tree report.
///
/// Nodes are emitted parent-first, depth-first; `aggregated_balance` is the
/// node's own balance plus the aggregated balances of all descendants.
#[derive(Debug, Clone, Serialize)]
pub struct AccountTreeNode {
    /// Account identifier.
    pub id: AccountId,
    /// Account code.
    pub code: String,
    /// Account name.
    pub name: String,
    /// Account classification.
    pub account_type: AccountType,
    /// Whether the account accepts new postings.
    pub is_active: bool,
    /// Depth in the tree (roots are 0).
    pub depth: usize,
    /// Balance of this account alone.
    pub own_balance: Decimal,
    /// Balance of this account plus all descendants.
    pub aggregated_balance: Decimal,
    /// Child nodes, ordered by code.
    pub children: Vec<AccountTreeNode>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use rust_decimal_macros::dec;

    #[rstest]
    #[case(AccountType::Asset, NormalSide::Debit)]
    #[case(AccountType::Expense, NormalSide::Debit)]
    #[case(AccountType::Liability, NormalSide::Credit)]
    #[case(AccountType::Equity, NormalSide::Credit)]
    #[case(AccountType::Revenue, NormalSide::Credit)]
    fn test_normal_side_derived_from_type(
        #[case] account_type: AccountType,
        #[case] side: NormalSide,
    ) {
        assert_eq!(account_type.normal_side(), side);
    }

    #[test]
    fn test_debit_normal_balance_change() {
        let side = NormalSide::Debit;
        assert_eq!(side.balance_change(dec!(100), dec!(0)), dec!(100));
        assert_eq!(side.balance_change(dec!(0), dec!(50)), dec!(-50));
        assert_eq!(side.balance_change(dec!(100), dec!(30)), dec!(70));
    }

    #[test]
    fn test_credit_normal_balance_change() {
        let side = NormalSide::Credit;
        assert_eq!(side.balance_change(dec!(0), dec!(100)), dec!(100));
        assert_eq!(side.balance_change(dec!(50), dec!(0)), dec!(-50));
        assert_eq!(side.balance_change(dec!(30), dec!(100)), dec!(70));
    }

    #[test]
    fn test_balance_sheet_types() {
        assert!(AccountType::Asset.is_balance_sheet());
        assert!(AccountType::Liability.is_balance_sheet());
        assert!(AccountType::Equity.is_balance_sheet());
        assert!(!AccountType::Revenue.is_balance_sheet());
        assert!(!AccountType::Expense.is_balance_sheet());
    }

    #[test]
    fn test_cash_flow_defaults() {
        assert_eq!(
            CashFlowClass::default_for(AccountType::Equity),
            CashFlowClass::Financing
        );
        assert_eq!(
            CashFlowClass::default_for(AccountType::Asset),
            CashFlowClass::Operating
        );
        assert_eq!(
            CashFlowClass::default_for(AccountType::Liability),
            CashFlowClass::Operating
        );
    }
}

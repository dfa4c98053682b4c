//! Per-tenant chart of accounts.
//!
//! The chart is a flat map keyed by account id; tree structure lives in each
//! account's parent id and materialized ancestor path. Accounts referenced by
//! posted lines are never deleted, only deactivated.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;

use numera_shared::types::{AccountId, TenantId};

use super::error::AccountError;
use super::types::{Account, AccountTreeNode, CashFlowClass, CreateAccountInput};

/// The chart of accounts for a single tenant.
#[derive(Debug, Clone)]
pub struct ChartOfAccounts {
    tenant_id: TenantId,
    accounts: HashMap<AccountId, Account>,
    by_code: HashMap<String, AccountId>,
}

impl ChartOfAccounts {
    /// Creates an empty chart for the given tenant.
    #[must_use]
    pub fn new(tenant_id: TenantId) -> Self {
        Self {
            tenant_id,
            accounts: HashMap::new(),
            by_code: HashMap::new(),
        }
    }

    /// Creates a new account.
    ///
    /// A child account must share its parent's type, and the parent must be
    /// active; root accounts have no parent.
    ///
    /// # Errors
    ///
    /// Returns `DuplicateCode` if the code exists in this tenant, or
    /// `InvalidParent` if the parent is missing, inactive, or of a
    /// different type.
    pub fn create_account(
        &mut self,
        input: CreateAccountInput,
        now: DateTime<Utc>,
    ) -> Result<Account, AccountError> {
        if self.by_code.contains_key(&input.code) {
            return Err(AccountError::DuplicateCode(input.code));
        }

        let parent_path = match input.parent_id {
            Some(parent_id) => {
                let parent = self
                    .accounts
                    .get(&parent_id)
                    .ok_or(AccountError::InvalidParent(parent_id))?;
                if !parent.is_active || parent.account_type != input.account_type {
                    return Err(AccountError::InvalidParent(parent_id));
                }
                parent.path.clone()
            }
            None => Vec::new(),
        };

        let id = AccountId::new();
        let mut path = parent_path;
        path.push(id);

        let account = Account {
            id,
            tenant_id: self.tenant_id,
            code: input.code.clone(),
            name: input.name,
            account_type: input.account_type,
            parent_id: input.parent_id,
            path,
            cash_flow: input
                .cash_flow
                .unwrap_or_else(|| CashFlowClass::default_for(input.account_type)),
            is_active: true,
            created_at: now,
        };

        self.by_code.insert(input.code, id);
        self.accounts.insert(id, account.clone());
        Ok(account)
    }

    /// Deactivates an account so it accepts no new postings.
    ///
    /// Historical postings remain valid; `has_open_period_postings` reports
    /// whether any posted line references the account within an open period.
    ///
    /// # Errors
    ///
    /// Returns `AccountNotFound` if the account does not exist, or
    /// `AccountInUse` if it has posted lines in an open period.
    pub fn deactivate_account<F>(
        &mut self,
        id: AccountId,
        has_open_period_postings: F,
    ) -> Result<Account, AccountError>
    where
        F: Fn(AccountId) -> bool,
    {
        if !self.accounts.contains_key(&id) {
            return Err(AccountError::AccountNotFound(id));
        }
        if has_open_period_postings(id) {
            return Err(AccountError::AccountInUse(id));
        }

        let account = self
            .accounts
            .get_mut(&id)
            .ok_or(AccountError::AccountNotFound(id))?;
        account.is_active = false;
        Ok(account.clone())
    }

    /// Returns the account with the given id.
    #[must_use]
    pub fn get(&self, id: AccountId) -> Option<&Account> {
        self.accounts.get(&id)
    }

    /// Returns the account with the given code.
    #[must_use]
    pub fn get_by_code(&self, code: &str) -> Option<&Account> {
        self.by_code.get(code).and_then(|id| self.accounts.get(id))
    }

    /// Returns true if the account exists and is active.
    #[must_use]
    pub fn is_postable(&self, id: AccountId) -> bool {
        self.accounts.get(&id).is_some_and(|a| a.is_active)
    }

    /// Iterates over all accounts in no particular order.
    pub fn accounts(&self) -> impl Iterator<Item = &Account> {
        self.accounts.values()
    }

    /// Returns all accounts sorted by code.
    #[must_use]
    pub fn accounts_by_code(&self) -> Vec<&Account> {
        let mut accounts: Vec<&Account> = self.accounts.values().collect();
        accounts.sort_by(|a, b| a.code.cmp(&b.code));
        accounts
    }

    /// Builds the account tree grouped by root account.
    ///
    /// Nodes are emitted parent-first, depth-first, siblings ordered by
    /// code; each node's aggregated balance is its own balance plus the
    /// aggregated balances of its children.
    #[must_use]
    pub fn account_tree<F>(&self, balance_of: F) -> Vec<AccountTreeNode>
    where
        F: Fn(&Account) -> Decimal,
    {
        let mut children: HashMap<Option<AccountId>, Vec<AccountId>> = HashMap::new();
        for account in self.accounts_by_code() {
            children.entry(account.parent_id).or_default().push(account.id);
        }

        children
            .get(&None)
            .map(|roots| {
                roots
                    .iter()
                    .map(|id| self.build_node(*id, 0, &children, &balance_of))
                    .collect()
            })
            .unwrap_or_default()
    }

    fn build_node<F>(
        &self,
        id: AccountId,
        depth: usize,
        children: &HashMap<Option<AccountId>, Vec<AccountId>>,
        balance_of: &F,
    ) -> AccountTreeNode
    where
        F: Fn(&Account) -> Decimal,
    {
        let account = &self.accounts[&id];
        let own_balance = balance_of(account);

        let child_nodes: Vec<AccountTreeNode> = children
            .get(&Some(id))
            .map(|ids| {
                ids.iter()
                    .map(|child| self.build_node(*child, depth + 1, children, balance_of))
                    .collect()
            })
            .unwrap_or_default();

        let aggregated_balance = own_balance
            + child_nodes
                .iter()
                .map(|c| c.aggregated_balance)
                .sum::<Decimal>();

        AccountTreeNode {
            id,
            code: account.code.clone(),
            name: account.name.clone(),
            account_type: account.account_type,
            is_active: account.is_active,
            depth,
            own_balance,
            aggregated_balance,
            children: child_nodes,
        }
    }
}

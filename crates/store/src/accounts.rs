//! Account registry service.

use std::sync::Arc;

use chrono::{NaiveDate, Utc};
use tracing::info;

use numera_core::accounts::{Account, AccountError, AccountTreeNode, CreateAccountInput};
use numera_shared::types::{AccountId, TenantId};

use crate::{LedgerStore, read_guard, write_guard};

/// Service for chart-of-accounts operations.
#[derive(Debug, Clone)]
pub struct AccountService {
    store: Arc<LedgerStore>,
}

impl AccountService {
    /// Creates a new account service.
    #[must_use]
    pub fn new(store: Arc<LedgerStore>) -> Self {
        Self { store }
    }

    /// Creates an account in the tenant's chart.
    ///
    /// # Errors
    ///
    /// Returns `DuplicateCode` or `InvalidParent`.
    pub fn create_account(
        &self,
        tenant_id: TenantId,
        input: CreateAccountInput,
    ) -> Result<Account, AccountError> {
        let handle = self.store.tenant(tenant_id);
        let mut ledger = write_guard(&handle);
        let account = ledger.chart.create_account(input, Utc::now())?;

        info!(
            tenant_id = %tenant_id,
            account_id = %account.id,
            code = %account.code,
            "Account created"
        );
        Ok(account)
    }

    /// Deactivates an account so it accepts no new postings.
    ///
    /// # Errors
    ///
    /// Returns `AccountNotFound` or `AccountInUse`.
    pub fn deactivate_account(
        &self,
        tenant_id: TenantId,
        account_id: AccountId,
    ) -> Result<Account, AccountError> {
        let handle = self.store.tenant(tenant_id);
        let mut ledger = write_guard(&handle);
        let account = ledger.deactivate_account(account_id)?;

        info!(
            tenant_id = %tenant_id,
            account_id = %account_id,
            "Account deactivated"
        );
        Ok(account)
    }

    /// Returns the account with the given id.
    ///
    /// # Errors
    ///
    /// Returns `AccountNotFound`.
    pub fn get_account(
        &self,
        tenant_id: TenantId,
        account_id: AccountId,
    ) -> Result<Account, AccountError> {
        let handle = self.store.tenant(tenant_id);
        let ledger = read_guard(&handle);
        ledger
            .chart
            .get(account_id)
            .cloned()
            .ok_or(AccountError::AccountNotFound(account_id))
    }

    /// Lists all accounts ordered by code.
    #[must_use]
    pub fn list_accounts(&self, tenant_id: TenantId) -> Vec<Account> {
        let handle = self.store.tenant(tenant_id);
        let ledger = read_guard(&handle);
        ledger
            .chart
            .accounts_by_code()
            .into_iter()
            .cloned()
            .collect()
    }

    /// Builds the account tree with balances aggregated bottom-up as of
    /// the given date.
    #[must_use]
    pub fn account_tree(&self, tenant_id: TenantId, as_of: NaiveDate) -> Vec<AccountTreeNode> {
        let handle = self.store.tenant(tenant_id);
        let ledger = read_guard(&handle);
        ledger
            .chart
            .account_tree(|account| ledger.balance_of(account, as_of))
    }
}

//! Chart of accounts registry.
//!
//! This module implements the account registry:
//! - Account types and their normal balance side
//! - Account records with a materialized ancestor path
//! - Per-tenant chart of accounts with create/deactivate rules
//! - Account tree construction with aggregated balances

pub mod error;
pub mod registry;
pub mod types;

pub use error::AccountError;
pub use registry::ChartOfAccounts;
pub use types::{
    Account, AccountTreeNode, AccountType, CashFlowClass, CreateAccountInput, NormalSide,
};

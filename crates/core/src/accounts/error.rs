//! Account registry error types.

use thiserror::Error;

use numera_shared::types::AccountId;

/// Errors that can occur during account registry operations.
#[derive(Debug, Error)]
pub enum AccountError {
    /// Account code already exists within the tenant.
    #[error("Account code already exists: {0}")]
    DuplicateCode(String),

    /// Parent account is missing, inactive, or of a different type.
    #[error("Invalid parent account: {0}")]
    InvalidParent(AccountId),

    /// Account has posted lines in an open period and cannot be deactivated.
    #[error("Account {0} is referenced by postings in an open period")]
    AccountInUse(AccountId),

    /// Account not found.
    #[error("Account not found: {0}")]
    AccountNotFound(AccountId),
}

impl AccountError {
    /// Returns the error code for API responses.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::DuplicateCode(_) => "DUPLICATE_CODE",
            Self::InvalidParent(_) => "INVALID_PARENT",
            Self::AccountInUse(_) => "ACCOUNT_IN_USE",
            Self::AccountNotFound(_) => "ACCOUNT_NOT_FOUND",
        }
    }

    /// Returns the HTTP status code for this error.
    #[must_use]
    pub const fn http_status_code(&self) -> u16 {
        match self {
            Self::DuplicateCode(_) => 409,
            Self::InvalidParent(_) | Self::AccountInUse(_) => 400,
            Self::AccountNotFound(_) => 404,
        }
    }
}

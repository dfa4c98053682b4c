//! Chart of accounts routes.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::info;

use numera_core::accounts::{AccountError, AccountType, CashFlowClass, CreateAccountInput};
use numera_shared::types::{AccountId, TenantId};
use numera_store::AccountService;

use crate::AppState;

use super::error_response;

/// Creates the account routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/tenants/{tenant_id}/accounts", get(list_accounts))
        .route("/tenants/{tenant_id}/accounts", post(create_account))
        .route("/tenants/{tenant_id}/accounts/tree", get(account_tree))
        .route(
            "/tenants/{tenant_id}/accounts/{account_id}/deactivate",
            post(deactivate_account),
        )
}

/// Request body for creating an account.
#[derive(Debug, Deserialize)]
pub struct CreateAccountRequest {
    /// Account code, unique per tenant.
    pub code: String,
    /// Account name.
    pub name: String,
    /// Account type: asset, liability, equity, revenue, or expense.
    pub account_type: AccountType,
    /// Optional parent account.
    pub parent_id: Option<AccountId>,
    /// Optional cash-flow classification override.
    pub cash_flow: Option<CashFlowClass>,
}

/// Response for an account.
#[derive(Debug, Serialize)]
pub struct AccountResponse {
    /// Account ID.
    pub id: AccountId,
    /// Account code.
    pub code: String,
    /// Account name.
    pub name: String,
    /// Account type.
    pub account_type: AccountType,
    /// Normal balance side derived from the type.
    pub normal_side: String,
    /// Parent account, if any.
    pub parent_id: Option<AccountId>,
    /// Cash-flow classification.
    pub cash_flow: CashFlowClass,
    /// Whether the account accepts new postings.
    pub is_active: bool,
}

impl From<numera_core::accounts::Account> for AccountResponse {
    fn from(account: numera_core::accounts::Account) -> Self {
        let normal_side = match account.normal_side() {
            numera_core::accounts::NormalSide::Debit => "debit".to_string(),
            numera_core::accounts::NormalSide::Credit => "credit".to_string(),
        };
        Self {
            id: account.id,
            code: account.code,
            name: account.name,
            account_type: account.account_type,
            normal_side,
            parent_id: account.parent_id,
            cash_flow: account.cash_flow,
            is_active: account.is_active,
        }
    }
}

/// Query for the account tree cut-off date.
#[derive(Debug, Deserialize)]
pub struct TreeQuery {
    /// Balances are aggregated as of this date; defaults to today.
    pub as_of: Option<NaiveDate>,
}

fn account_error_response(e: &AccountError) -> axum::response::Response {
    error_response(e.http_status_code(), e.error_code(), e.to_string())
}

/// POST `/tenants/{tenant_id}/accounts` - Create an account.
async fn create_account(
    State(state): State<AppState>,
    Path(tenant_id): Path<TenantId>,
    Json(payload): Json<CreateAccountRequest>,
) -> impl IntoResponse {
    let service = AccountService::new(state.store.clone());

    let input = CreateAccountInput {
        code: payload.code,
        name: payload.name,
        account_type: payload.account_type,
        parent_id: payload.parent_id,
        cash_flow: payload.cash_flow,
    };

    match service.create_account(tenant_id, input) {
        Ok(account) => {
            info!(tenant_id = %tenant_id, account_id = %account.id, "Account created via API");
            (StatusCode::CREATED, Json(AccountResponse::from(account))).into_response()
        }
        Err(e) => account_error_response(&e),
    }
}

/// GET `/tenants/{tenant_id}/accounts` - List accounts ordered by code.
async fn list_accounts(
    State(state): State<AppState>,
    Path(tenant_id): Path<TenantId>,
) -> impl IntoResponse {
    let service = AccountService::new(state.store.clone());
    let accounts: Vec<AccountResponse> = service
        .list_accounts(tenant_id)
        .into_iter()
        .map(AccountResponse::from)
        .collect();

    (StatusCode::OK, Json(json!({ "accounts": accounts }))).into_response()
}

/// GET `/tenants/{tenant_id}/accounts/tree` - Account tree with aggregated
/// balances.
async fn account_tree(
    State(state): State<AppState>,
    Path(tenant_id): Path<TenantId>,
    Query(query): Query<TreeQuery>,
) -> impl IntoResponse {
    let service = AccountService::new(state.store.clone());
    let as_of = query
        .as_of
        .unwrap_or_else(|| chrono::Utc::now().date_naive());
    let tree = service.account_tree(tenant_id, as_of);

    (StatusCode::OK, Json(json!({ "as_of": as_of, "tree": tree }))).into_response()
}

/// POST `/tenants/{tenant_id}/accounts/{account_id}/deactivate` -
/// Deactivate an account.
async fn deactivate_account(
    State(state): State<AppState>,
    Path((tenant_id, account_id)): Path<(TenantId, AccountId)>,
) -> impl IntoResponse {
    let service = AccountService::new(state.store.clone());

    match service.deactivate_account(tenant_id, account_id) {
        Ok(account) => {
            info!(tenant_id = %tenant_id, account_id = %account_id, "Account deactivated via API");
            (StatusCode::OK, Json(AccountResponse::from(account))).into_response()
        }
        Err(e) => account_error_response(&e),
    }
}

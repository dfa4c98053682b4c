//! Read-only report routes.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
};
use chrono::NaiveDate;
use serde::Deserialize;
use serde_json::json;

use numera_core::reports::ReportError;
use numera_shared::types::{AccountId, TenantId};
use numera_store::ReportService;

use crate::AppState;

use super::error_response;

/// Creates the report routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route(
            "/tenants/{tenant_id}/reports/trial-balance",
            get(trial_balance),
        )
        .route(
            "/tenants/{tenant_id}/reports/general-journal",
            get(general_journal),
        )
        .route(
            "/tenants/{tenant_id}/reports/general-ledger",
            get(general_ledger),
        )
        .route(
            "/tenants/{tenant_id}/reports/balance-sheet",
            get(balance_sheet),
        )
        .route(
            "/tenants/{tenant_id}/reports/income-statement",
            get(income_statement),
        )
        .route("/tenants/{tenant_id}/reports/cash-flow", get(cash_flow))
        .route(
            "/tenants/{tenant_id}/projector/verify",
            post(verify_projector),
        )
}

/// Query for as-of reports.
#[derive(Debug, Deserialize)]
pub struct AsOfQuery {
    /// Report cut-off date.
    pub as_of: NaiveDate,
}

/// Query for ranged reports.
#[derive(Debug, Deserialize)]
pub struct RangeQuery {
    /// Range start.
    pub from: NaiveDate,
    /// Range end.
    pub to: NaiveDate,
}

/// Query for the general ledger.
#[derive(Debug, Deserialize)]
pub struct LedgerQuery {
    /// Range start.
    pub from: NaiveDate,
    /// Range end.
    pub to: NaiveDate,
    /// Optional single-account filter.
    pub account_id: Option<AccountId>,
}

fn report_error_response(e: &ReportError) -> axum::response::Response {
    error_response(e.http_status_code(), e.error_code(), e.to_string())
}

/// GET `/tenants/{tenant_id}/reports/trial-balance` - Trial balance as of
/// a date.
async fn trial_balance(
    State(state): State<AppState>,
    Path(tenant_id): Path<TenantId>,
    Query(query): Query<AsOfQuery>,
) -> impl IntoResponse {
    let service = ReportService::new(state.store.clone());

    match service.trial_balance(tenant_id, query.as_of) {
        Ok(report) => (StatusCode::OK, Json(report)).into_response(),
        Err(e) => report_error_response(&e),
    }
}

/// GET `/tenants/{tenant_id}/reports/general-journal` - Posted and voided
/// entries over a range.
async fn general_journal(
    State(state): State<AppState>,
    Path(tenant_id): Path<TenantId>,
    Query(query): Query<RangeQuery>,
) -> impl IntoResponse {
    let service = ReportService::new(state.store.clone());

    match service.general_journal(tenant_id, query.from, query.to) {
        Ok(report) => (StatusCode::OK, Json(report)).into_response(),
        Err(e) => report_error_response(&e),
    }
}

/// GET `/tenants/{tenant_id}/reports/general-ledger` - Per-account line
/// history over a range.
async fn general_ledger(
    State(state): State<AppState>,
    Path(tenant_id): Path<TenantId>,
    Query(query): Query<LedgerQuery>,
) -> impl IntoResponse {
    let service = ReportService::new(state.store.clone());

    match service.general_ledger(tenant_id, query.from, query.to, query.account_id) {
        Ok(report) => (StatusCode::OK, Json(report)).into_response(),
        Err(e) => report_error_response(&e),
    }
}

/// GET `/tenants/{tenant_id}/reports/balance-sheet` - Balance sheet as of
/// a date.
async fn balance_sheet(
    State(state): State<AppState>,
    Path(tenant_id): Path<TenantId>,
    Query(query): Query<AsOfQuery>,
) -> impl IntoResponse {
    let service = ReportService::new(state.store.clone());

    match service.balance_sheet(tenant_id, query.as_of) {
        Ok(report) => (StatusCode::OK, Json(report)).into_response(),
        Err(e) => report_error_response(&e),
    }
}

/// GET `/tenants/{tenant_id}/reports/income-statement` - Income statement
/// over a range.
async fn income_statement(
    State(state): State<AppState>,
    Path(tenant_id): Path<TenantId>,
    Query(query): Query<RangeQuery>,
) -> impl IntoResponse {
    let service = ReportService::new(state.store.clone());

    match service.income_statement(tenant_id, query.from, query.to) {
        Ok(report) => (StatusCode::OK, Json(report)).into_response(),
        Err(e) => report_error_response(&e),
    }
}

/// GET `/tenants/{tenant_id}/reports/cash-flow` - Cash flow statement over
/// a range.
async fn cash_flow(
    State(state): State<AppState>,
    Path(tenant_id): Path<TenantId>,
    Query(query): Query<RangeQuery>,
) -> impl IntoResponse {
    let service = ReportService::new(state.store.clone());

    match service.cash_flow(tenant_id, query.from, query.to) {
        Ok(report) => (StatusCode::OK, Json(report)).into_response(),
        Err(e) => report_error_response(&e),
    }
}

/// POST `/tenants/{tenant_id}/projector/verify` - Rebuild the projector
/// from the posted log and compare balances.
async fn verify_projector(
    State(state): State<AppState>,
    Path(tenant_id): Path<TenantId>,
) -> impl IntoResponse {
    let service = ReportService::new(state.store.clone());

    match service.verify_projector(tenant_id) {
        Ok(()) => (StatusCode::OK, Json(json!({ "status": "consistent" }))).into_response(),
        Err(e) => report_error_response(&e),
    }
}

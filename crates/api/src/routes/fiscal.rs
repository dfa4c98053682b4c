//! Accounting period management routes.

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::info;

use numera_core::fiscal::{AccountingPeriod, PeriodError, PeriodStatus};
use numera_shared::types::{PeriodId, TenantId};
use numera_store::PeriodService;
use numera_store::fiscal::CreatePeriodInput;

use crate::AppState;

use super::error_response;

/// Creates the period routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/tenants/{tenant_id}/periods", get(list_periods))
        .route("/tenants/{tenant_id}/periods", post(create_period))
        .route("/tenants/{tenant_id}/periods/audit", get(audit_trail))
        .route(
            "/tenants/{tenant_id}/periods/{period_id}/close",
            post(close_period),
        )
        .route(
            "/tenants/{tenant_id}/periods/{period_id}/reopen",
            post(reopen_period),
        )
}

/// Request body for creating a period.
#[derive(Debug, Deserialize)]
pub struct CreatePeriodRequest {
    /// Period name (e.g., "January 2026").
    pub name: String,
    /// Start date (YYYY-MM-DD).
    pub start_date: NaiveDate,
    /// End date (YYYY-MM-DD, inclusive).
    pub end_date: NaiveDate,
}

/// Request body for reopening a period.
#[derive(Debug, Deserialize)]
pub struct ReopenPeriodRequest {
    /// Why the period is being reopened; recorded in the audit trail.
    pub reason: String,
}

/// Response for an accounting period.
#[derive(Debug, Serialize)]
pub struct PeriodResponse {
    /// Period ID.
    pub id: PeriodId,
    /// Period name.
    pub name: String,
    /// Start date.
    pub start_date: NaiveDate,
    /// End date.
    pub end_date: NaiveDate,
    /// Status: open or closed.
    pub status: PeriodStatus,
}

impl From<AccountingPeriod> for PeriodResponse {
    fn from(period: AccountingPeriod) -> Self {
        Self {
            id: period.id,
            name: period.name,
            start_date: period.start_date,
            end_date: period.end_date,
            status: period.status,
        }
    }
}

fn period_error_response(e: &PeriodError) -> axum::response::Response {
    error_response(e.http_status_code(), e.error_code(), e.to_string())
}

/// GET `/tenants/{tenant_id}/periods` - List periods chronologically.
async fn list_periods(
    State(state): State<AppState>,
    Path(tenant_id): Path<TenantId>,
) -> impl IntoResponse {
    let service = PeriodService::new(state.store.clone());
    let periods: Vec<PeriodResponse> = service
        .list_periods(tenant_id)
        .into_iter()
        .map(PeriodResponse::from)
        .collect();

    (StatusCode::OK, Json(json!({ "periods": periods }))).into_response()
}

/// POST `/tenants/{tenant_id}/periods` - Create a period.
async fn create_period(
    State(state): State<AppState>,
    Path(tenant_id): Path<TenantId>,
    Json(payload): Json<CreatePeriodRequest>,
) -> impl IntoResponse {
    let service = PeriodService::new(state.store.clone());

    let input = CreatePeriodInput {
        name: payload.name,
        start_date: payload.start_date,
        end_date: payload.end_date,
    };

    match service.create_period(tenant_id, input) {
        Ok(period) => {
            info!(tenant_id = %tenant_id, period_id = %period.id, "Period created via API");
            (StatusCode::CREATED, Json(PeriodResponse::from(period))).into_response()
        }
        Err(e) => period_error_response(&e),
    }
}

/// POST `/tenants/{tenant_id}/periods/{period_id}/close` - Close a period.
async fn close_period(
    State(state): State<AppState>,
    Path((tenant_id, period_id)): Path<(TenantId, PeriodId)>,
) -> impl IntoResponse {
    let service = PeriodService::new(state.store.clone());

    match service.close_period(tenant_id, period_id) {
        Ok(period) => {
            info!(tenant_id = %tenant_id, period_id = %period_id, "Period closed via API");
            (StatusCode::OK, Json(PeriodResponse::from(period))).into_response()
        }
        Err(e) => period_error_response(&e),
    }
}

/// POST `/tenants/{tenant_id}/periods/{period_id}/reopen` - Reopen the most
/// recently closed period; recorded in the audit trail.
async fn reopen_period(
    State(state): State<AppState>,
    Path((tenant_id, period_id)): Path<(TenantId, PeriodId)>,
    Json(payload): Json<ReopenPeriodRequest>,
) -> impl IntoResponse {
    let service = PeriodService::new(state.store.clone());

    match service.reopen_period(tenant_id, period_id, payload.reason) {
        Ok(period) => {
            info!(tenant_id = %tenant_id, period_id = %period_id, "Period reopened via API");
            (StatusCode::OK, Json(PeriodResponse::from(period))).into_response()
        }
        Err(e) => period_error_response(&e),
    }
}

/// GET `/tenants/{tenant_id}/periods/audit` - Close/reopen audit trail.
async fn audit_trail(
    State(state): State<AppState>,
    Path(tenant_id): Path<TenantId>,
) -> impl IntoResponse {
    let service = PeriodService::new(state.store.clone());
    let trail = service.audit_trail(tenant_id);

    (StatusCode::OK, Json(json!({ "audit": trail }))).into_response()
}

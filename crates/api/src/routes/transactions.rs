//! Transaction recording and journal entry routes.
//!
//! `POST /tenants/{tenant_id}/transactions` is the single surface external
//! producers call; the journal-entry routes are operator surfaces for
//! manual journal work and voids.

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
};
use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::{error, info};

use numera_core::journal::{
    Direction, DraftInput, EntryStatus, JournalEntry, JournalError, LineInput,
};
use numera_shared::types::{AccountId, CostCenterId, EntryId, TenantId};
use numera_store::JournalService;

use crate::AppState;

use super::error_response;

/// Creates the transaction and journal entry routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/tenants/{tenant_id}/transactions", post(record_transaction))
        .route("/tenants/{tenant_id}/journal-entries", post(create_draft))
        .route(
            "/tenants/{tenant_id}/journal-entries/{entry_id}",
            get(get_entry).put(update_draft).delete(delete_draft),
        )
        .route(
            "/tenants/{tenant_id}/journal-entries/{entry_id}/post",
            post(post_entry),
        )
        .route(
            "/tenants/{tenant_id}/journal-entries/{entry_id}/void",
            post(void_entry),
        )
}

/// Request body for a single journal line.
#[derive(Debug, Deserialize)]
pub struct LineRequest {
    /// The account to post to.
    pub account_id: AccountId,
    /// debit or credit.
    pub direction: Direction,
    /// The amount (must be positive).
    pub amount: Decimal,
    /// Optional cost center tag.
    pub cost_center_id: Option<CostCenterId>,
    /// Optional memo.
    pub memo: Option<String>,
}

/// Request body for recording a transaction or creating a draft.
#[derive(Debug, Deserialize)]
pub struct EntryRequest {
    /// The accounting date of the entry.
    pub entry_date: NaiveDate,
    /// A description of the business event.
    pub description: String,
    /// Opaque reference to the producing transaction.
    pub source_ref: Option<String>,
    /// The lines (must have at least 2).
    pub lines: Vec<LineRequest>,
}

impl EntryRequest {
    fn into_input(self) -> DraftInput {
        DraftInput {
            entry_date: self.entry_date,
            description: self.description,
            source_ref: self.source_ref,
            lines: self
                .lines
                .into_iter()
                .map(|line| LineInput {
                    account_id: line.account_id,
                    direction: line.direction,
                    amount: line.amount,
                    cost_center_id: line.cost_center_id,
                    memo: line.memo,
                })
                .collect(),
        }
    }
}

/// Request body for voiding a posted entry.
#[derive(Debug, Deserialize)]
pub struct VoidRequest {
    /// Why the entry is being voided.
    pub reason: String,
    /// The accounting date of the reversal; its period must be open.
    pub void_date: NaiveDate,
}

/// Response for a journal line.
#[derive(Debug, Serialize)]
pub struct LineResponse {
    /// Account posted to.
    pub account_id: AccountId,
    /// debit or credit.
    pub direction: Direction,
    /// Line amount.
    pub amount: Decimal,
    /// Cost center tag.
    pub cost_center_id: Option<CostCenterId>,
    /// Line memo.
    pub memo: Option<String>,
}

/// Response for a journal entry.
#[derive(Debug, Serialize)]
pub struct EntryResponse {
    /// Entry ID.
    pub id: EntryId,
    /// Sequential entry number; absent until posted.
    pub entry_number: Option<i64>,
    /// Accounting date.
    pub entry_date: NaiveDate,
    /// Description.
    pub description: String,
    /// draft, posted, or voided.
    pub status: EntryStatus,
    /// Opaque producer reference.
    pub source_ref: Option<String>,
    /// The entry's lines.
    pub lines: Vec<LineResponse>,
    /// For a reversal, the entry it reverses.
    pub reversal_of: Option<EntryId>,
    /// For a voided entry, the reversal that undid it.
    pub reversed_by: Option<EntryId>,
    /// Operator-supplied void reason.
    pub void_reason: Option<String>,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Posting timestamp.
    pub posted_at: Option<DateTime<Utc>>,
    /// Voiding timestamp.
    pub voided_at: Option<DateTime<Utc>>,
}

impl From<JournalEntry> for EntryResponse {
    fn from(entry: JournalEntry) -> Self {
        Self {
            id: entry.id,
            entry_number: entry.entry_number,
            entry_date: entry.entry_date,
            description: entry.description,
            status: entry.status,
            source_ref: entry.source_ref,
            lines: entry
                .lines
                .into_iter()
                .map(|line| LineResponse {
                    account_id: line.account_id,
                    direction: line.direction,
                    amount: line.amount,
                    cost_center_id: line.cost_center_id,
                    memo: line.memo,
                })
                .collect(),
            reversal_of: entry.reversal_of,
            reversed_by: entry.reversed_by,
            void_reason: entry.void_reason,
            created_at: entry.created_at,
            posted_at: entry.posted_at,
            voided_at: entry.voided_at,
        }
    }
}

/// Response for a void: the voided original and its posted reversal.
#[derive(Debug, Serialize)]
pub struct VoidResponse {
    /// The original entry, now voided.
    pub original: EntryResponse,
    /// The reversal entry, posted.
    pub reversal: EntryResponse,
}

fn journal_error_response(e: &JournalError) -> axum::response::Response {
    if matches!(e, JournalError::Consistency(_)) {
        error!(violation = %e, "LEDGER CONSISTENCY VIOLATION");
    }
    error_response(e.http_status_code(), e.error_code(), e.to_string())
}

/// POST `/tenants/{tenant_id}/transactions` - Record a producer
/// transaction: draft and post in one step.
async fn record_transaction(
    State(state): State<AppState>,
    Path(tenant_id): Path<TenantId>,
    Json(payload): Json<EntryRequest>,
) -> impl IntoResponse {
    let service = JournalService::new(state.store.clone());

    match service.record_transaction(tenant_id, payload.into_input()) {
        Ok(entry) => {
            info!(tenant_id = %tenant_id, entry_id = %entry.id, "Transaction recorded via API");
            (StatusCode::CREATED, Json(EntryResponse::from(entry))).into_response()
        }
        Err(e) => journal_error_response(&e),
    }
}

/// POST `/tenants/{tenant_id}/journal-entries` - Create a draft entry.
async fn create_draft(
    State(state): State<AppState>,
    Path(tenant_id): Path<TenantId>,
    Json(payload): Json<EntryRequest>,
) -> impl IntoResponse {
    let service = JournalService::new(state.store.clone());

    match service.create_draft(tenant_id, payload.into_input()) {
        Ok(entry) => (StatusCode::CREATED, Json(EntryResponse::from(entry))).into_response(),
        Err(e) => journal_error_response(&e),
    }
}

/// GET `/tenants/{tenant_id}/journal-entries/{entry_id}` - Fetch an entry.
async fn get_entry(
    State(state): State<AppState>,
    Path((tenant_id, entry_id)): Path<(TenantId, EntryId)>,
) -> impl IntoResponse {
    let service = JournalService::new(state.store.clone());

    match service.get_entry(tenant_id, entry_id) {
        Ok(entry) => (StatusCode::OK, Json(EntryResponse::from(entry))).into_response(),
        Err(e) => journal_error_response(&e),
    }
}

/// PUT `/tenants/{tenant_id}/journal-entries/{entry_id}` - Replace a
/// draft's content.
async fn update_draft(
    State(state): State<AppState>,
    Path((tenant_id, entry_id)): Path<(TenantId, EntryId)>,
    Json(payload): Json<EntryRequest>,
) -> impl IntoResponse {
    let service = JournalService::new(state.store.clone());

    match service.update_draft(tenant_id, entry_id, payload.into_input()) {
        Ok(entry) => (StatusCode::OK, Json(EntryResponse::from(entry))).into_response(),
        Err(e) => journal_error_response(&e),
    }
}

/// DELETE `/tenants/{tenant_id}/journal-entries/{entry_id}` - Delete a
/// draft entry.
async fn delete_draft(
    State(state): State<AppState>,
    Path((tenant_id, entry_id)): Path<(TenantId, EntryId)>,
) -> impl IntoResponse {
    let service = JournalService::new(state.store.clone());

    match service.delete_draft(tenant_id, entry_id) {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => journal_error_response(&e),
    }
}

/// POST `/tenants/{tenant_id}/journal-entries/{entry_id}/post` - Post a
/// draft entry.
async fn post_entry(
    State(state): State<AppState>,
    Path((tenant_id, entry_id)): Path<(TenantId, EntryId)>,
) -> impl IntoResponse {
    let service = JournalService::new(state.store.clone());

    match service.post_entry(tenant_id, entry_id) {
        Ok(entry) => {
            info!(
                tenant_id = %tenant_id,
                entry_id = %entry_id,
                entry_number = entry.entry_number,
                "Entry posted via API"
            );
            (StatusCode::OK, Json(EntryResponse::from(entry))).into_response()
        }
        Err(e) => journal_error_response(&e),
    }
}

/// POST `/tenants/{tenant_id}/journal-entries/{entry_id}/void` - Void a
/// posted entry via a reversal.
async fn void_entry(
    State(state): State<AppState>,
    Path((tenant_id, entry_id)): Path<(TenantId, EntryId)>,
    Json(payload): Json<VoidRequest>,
) -> impl IntoResponse {
    let service = JournalService::new(state.store.clone());

    match service.void_entry(tenant_id, entry_id, &payload.reason, payload.void_date) {
        Ok((original, reversal)) => {
            info!(
                tenant_id = %tenant_id,
                entry_id = %entry_id,
                reversal_id = %reversal.id,
                "Entry voided via API"
            );
            (
                StatusCode::OK,
                Json(VoidResponse {
                    original: EntryResponse::from(original),
                    reversal: EntryResponse::from(reversal),
                }),
            )
                .into_response()
        }
        Err(e) => journal_error_response(&e),
    }
}

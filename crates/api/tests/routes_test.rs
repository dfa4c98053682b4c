//! HTTP-level tests driving the router with in-process requests.

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use http_body_util::BodyExt;
use serde_json::{Value, json};
use tower::ServiceExt;

use numera_api::{AppState, create_router};
use numera_shared::types::{Currency, TenantId};
use numera_store::LedgerStore;

fn app() -> axum::Router {
    let state = AppState {
        store: Arc::new(LedgerStore::new(Currency::Usd)),
    };
    create_router(state)
}

async fn send(
    app: &axum::Router,
    method: &str,
    uri: &str,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let request = match body {
        Some(json_body) => Request::builder()
            .method(method)
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(json_body.to_string()))
            .unwrap(),
        None => Request::builder()
            .method(method)
            .uri(uri)
            .body(Body::empty())
            .unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, value)
}

#[tokio::test]
async fn health_check_works() {
    let app = app();
    let (status, body) = send(&app, "GET", "/api/v1/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
}

#[tokio::test]
async fn record_and_report_flow() {
    let app = app();
    let tenant = TenantId::new();
    let base = format!("/api/v1/tenants/{tenant}");

    // Chart of accounts.
    let (status, cash) = send(
        &app,
        "POST",
        &format!("{base}/accounts"),
        Some(json!({ "code": "1000", "name": "Cash", "account_type": "asset" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(cash["normal_side"], "debit");

    let (status, sales) = send(
        &app,
        "POST",
        &format!("{base}/accounts"),
        Some(json!({ "code": "4000", "name": "Sales", "account_type": "revenue" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    // Open January 2024.
    let (status, _) = send(
        &app,
        "POST",
        &format!("{base}/periods"),
        Some(json!({
            "name": "January 2024",
            "start_date": "2024-01-01",
            "end_date": "2024-01-31"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    // Producer records a cash sale.
    let (status, entry) = send(
        &app,
        "POST",
        &format!("{base}/transactions"),
        Some(json!({
            "entry_date": "2024-01-15",
            "description": "Cash sale",
            "source_ref": "invoice-42",
            "lines": [
                { "account_id": cash["id"], "direction": "debit", "amount": "100.00" },
                { "account_id": sales["id"], "direction": "credit", "amount": "100.00" }
            ]
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(entry["status"], "posted");
    assert_eq!(entry["entry_number"], 1);

    // Trial balance shows both sides.
    let (status, report) = send(
        &app,
        "GET",
        &format!("{base}/reports/trial-balance?as_of=2024-01-31"),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(report["totals"]["total_debit"], report["totals"]["total_credit"]);

    // Balance sheet balances.
    let (status, sheet) = send(
        &app,
        "GET",
        &format!("{base}/reports/balance-sheet?as_of=2024-01-31"),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(sheet["total_assets"], sheet["liabilities_and_equity"]);

    // Projector verifies.
    let (status, verdict) = send(&app, "POST", &format!("{base}/projector/verify"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(verdict["status"], "consistent");
}

#[tokio::test]
async fn validation_errors_surface_verbatim() {
    let app = app();
    let tenant = TenantId::new();
    let base = format!("/api/v1/tenants/{tenant}");

    let (_, cash) = send(
        &app,
        "POST",
        &format!("{base}/accounts"),
        Some(json!({ "code": "1000", "name": "Cash", "account_type": "asset" })),
    )
    .await;
    let (_, sales) = send(
        &app,
        "POST",
        &format!("{base}/accounts"),
        Some(json!({ "code": "4000", "name": "Sales", "account_type": "revenue" })),
    )
    .await;

    // Duplicate code.
    let (status, body) = send(
        &app,
        "POST",
        &format!("{base}/accounts"),
        Some(json!({ "code": "1000", "name": "Other", "account_type": "asset" })),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"], "DUPLICATE_CODE");

    // Unbalanced entry.
    let (status, body) = send(
        &app,
        "POST",
        &format!("{base}/transactions"),
        Some(json!({
            "entry_date": "2024-01-15",
            "description": "Broken",
            "lines": [
                { "account_id": cash["id"], "direction": "debit", "amount": "100.00" },
                { "account_id": sales["id"], "direction": "credit", "amount": "90.00" }
            ]
        })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "UNBALANCED_ENTRY");

    // No open period covers the date.
    let (status, body) = send(
        &app,
        "POST",
        &format!("{base}/transactions"),
        Some(json!({
            "entry_date": "2024-01-15",
            "description": "No period",
            "lines": [
                { "account_id": cash["id"], "direction": "debit", "amount": "50.00" },
                { "account_id": sales["id"], "direction": "credit", "amount": "50.00" }
            ]
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"], "PERIOD_CLOSED");
}

#[tokio::test]
async fn void_through_the_api() {
    let app = app();
    let tenant = TenantId::new();
    let base = format!("/api/v1/tenants/{tenant}");

    let (_, cash) = send(
        &app,
        "POST",
        &format!("{base}/accounts"),
        Some(json!({ "code": "1000", "name": "Cash", "account_type": "asset" })),
    )
    .await;
    let (_, sales) = send(
        &app,
        "POST",
        &format!("{base}/accounts"),
        Some(json!({ "code": "4000", "name": "Sales", "account_type": "revenue" })),
    )
    .await;
    send(
        &app,
        "POST",
        &format!("{base}/periods"),
        Some(json!({
            "name": "January 2024",
            "start_date": "2024-01-01",
            "end_date": "2024-01-31"
        })),
    )
    .await;

    let (_, entry) = send(
        &app,
        "POST",
        &format!("{base}/transactions"),
        Some(json!({
            "entry_date": "2024-01-15",
            "description": "Cash sale",
            "lines": [
                { "account_id": cash["id"], "direction": "debit", "amount": "100.00" },
                { "account_id": sales["id"], "direction": "credit", "amount": "100.00" }
            ]
        })),
    )
    .await;

    let (status, voided) = send(
        &app,
        "POST",
        &format!("{base}/journal-entries/{}/void", entry["id"].as_str().unwrap()),
        Some(json!({ "reason": "duplicate", "void_date": "2024-01-20" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(voided["original"]["status"], "voided");
    assert_eq!(voided["reversal"]["status"], "posted");
    assert_eq!(voided["reversal"]["entry_number"], 2);

    // Both legs now cancel on the trial balance.
    let (_, report) = send(
        &app,
        "GET",
        &format!("{base}/reports/trial-balance?as_of=2024-01-31"),
        None,
    )
    .await;
    assert_eq!(report["totals"]["total_debit"], "0.00");
}

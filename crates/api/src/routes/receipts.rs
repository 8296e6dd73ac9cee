//! Receipt scanning route.

use axum::{
    Json, Router,
    body::Bytes,
    extract::{DefaultBodyLimit, Query, State},
    response::IntoResponse,
    routing::post,
};
use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::{AppState, middleware::AuthSession};
use expensa_core::currency::rates::normalize_code;
use expensa_core::expense::ExpenseDraft;
use expensa_core::receipt::ReceiptDraft;

/// Largest accepted upload.
const MAX_RECEIPT_BYTES: usize = 10 * 1024 * 1024;

/// Creates the receipt routes (requires auth middleware to be applied externally).
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/receipts/scan", post(scan_receipt))
        .layer(DefaultBodyLimit::max(MAX_RECEIPT_BYTES))
}

/// Query parameters for a scan.
#[derive(Debug, Deserialize)]
pub struct ScanQuery {
    /// Currency the receipt is in; defaults to the account's base currency.
    pub currency: Option<String>,
}

/// Extracted receipt and the expense form it pre-fills.
#[derive(Debug, Serialize)]
pub struct ScanResponse {
    /// What was read (or simulated).
    pub receipt: ReceiptDraft,
    /// Submission draft built from the receipt.
    pub draft: ExpenseDraft,
}

/// POST `/receipts/scan` - Extract an expense draft from an uploaded receipt.
///
/// Never fails on content: unreadable uploads produce a simulated receipt.
async fn scan_receipt(
    State(state): State<AppState>,
    AuthSession(session): AuthSession,
    Query(query): Query<ScanQuery>,
    body: Bytes,
) -> impl IntoResponse {
    let receipt = state.scanner.scan(&body, Utc::now().date_naive()).await;
    let currency = query
        .currency
        .map_or_else(|| session.base_currency().to_string(), |c| normalize_code(&c));
    let draft = receipt.to_expense_draft(&currency);
    Json(ScanResponse { receipt, draft })
}

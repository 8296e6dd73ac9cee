//! Expense submission, decision and listing routes.

use axum::{
    Json, Router,
    extract::{Path, Query, State, rejection::JsonRejection},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::{AppState, error::ApiError, middleware::AuthSession};
use expensa_core::directory::Session;
use expensa_core::expense::{Expense, ExpenseDraft};
use expensa_core::ledger::{ExpenseFilter, ExpenseLedger};
use expensa_shared::types::ExpenseId;

/// Creates the expense routes (requires auth middleware to be applied externally).
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/expenses", get(list_expenses).post(submit_expense))
        .route("/expenses/summary", get(summary))
        .route("/expenses/{expense_id}", get(get_expense))
        .route("/expenses/{expense_id}/approve", post(approve_expense))
        .route("/expenses/{expense_id}/reject", post(reject_expense))
}

// ============================================================================
// Request/Response Types
// ============================================================================

/// Request body for approving an expense.
#[derive(Debug, Default, Deserialize)]
pub struct ApproveRequest {
    /// Optional comments.
    #[serde(default)]
    pub comments: Option<String>,
}

/// Request body for rejecting an expense.
#[derive(Debug, Default, Deserialize)]
pub struct RejectRequest {
    /// Why the expense is rejected. Required.
    #[serde(default)]
    pub reason: String,
}

/// An expense plus whether the caller may decide on it.
#[derive(Debug, Serialize)]
pub struct ExpenseResponse {
    /// The expense.
    #[serde(flatten)]
    pub expense: Expense,
    /// True if the caller may approve or reject it now.
    pub can_act: bool,
}

impl ExpenseResponse {
    fn for_session(session: &Session, expense: Expense) -> Self {
        let can_act = !expense.status.is_terminal()
            && ExpenseLedger::can_act(session.user(), &expense);
        Self { expense, can_act }
    }
}

// ============================================================================
// Handlers
// ============================================================================

/// POST `/expenses` - Submit an expense.
async fn submit_expense(
    State(state): State<AppState>,
    AuthSession(session): AuthSession,
    payload: Result<Json<ExpenseDraft>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Json(draft) = payload?;
    let rates = state.rates.current().await;
    let expense = state.ledger.submit(&session, &draft, &rates).await?;
    Ok((
        StatusCode::CREATED,
        Json(ExpenseResponse::for_session(&session, expense)),
    ))
}

/// GET `/expenses` - Visible expenses, most recent first.
async fn list_expenses(
    State(state): State<AppState>,
    AuthSession(session): AuthSession,
    Query(filter): Query<ExpenseFilter>,
) -> Result<impl IntoResponse, ApiError> {
    let expenses: Vec<_> = state
        .ledger
        .filter(&session, &filter)
        .await?
        .into_iter()
        .map(|e| ExpenseResponse::for_session(&session, e))
        .collect();
    Ok(Json(serde_json::json!({ "expenses": expenses })))
}

/// GET `/expenses/summary` - Totals per status and category.
async fn summary(
    State(state): State<AppState>,
    AuthSession(session): AuthSession,
) -> Result<impl IntoResponse, ApiError> {
    Ok(Json(state.ledger.summary(&session).await?))
}

/// GET `/expenses/{expense_id}` - A single visible expense.
async fn get_expense(
    State(state): State<AppState>,
    AuthSession(session): AuthSession,
    Path(expense_id): Path<ExpenseId>,
) -> Result<impl IntoResponse, ApiError> {
    let expense = state.ledger.get(&session, expense_id).await?;
    Ok(Json(ExpenseResponse::for_session(&session, expense)))
}

/// POST `/expenses/{expense_id}/approve` - Approve a pending expense.
async fn approve_expense(
    State(state): State<AppState>,
    AuthSession(session): AuthSession,
    Path(expense_id): Path<ExpenseId>,
    payload: Result<Json<ApproveRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Json(request) = payload?;
    let expense = state
        .ledger
        .approve(&session, expense_id, request.comments)
        .await?;
    info!(expense_id = %expense.id, approver = %session.user_id(), "Expense approved via API");
    Ok(Json(ExpenseResponse::for_session(&session, expense)))
}

/// POST `/expenses/{expense_id}/reject` - Reject a pending expense.
async fn reject_expense(
    State(state): State<AppState>,
    AuthSession(session): AuthSession,
    Path(expense_id): Path<ExpenseId>,
    payload: Result<Json<RejectRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Json(request) = payload?;
    let expense = state
        .ledger
        .reject(&session, expense_id, request.reason)
        .await?;
    info!(expense_id = %expense.id, rejecter = %session.user_id(), "Expense rejected via API");
    Ok(Json(ExpenseResponse::for_session(&session, expense)))
}

//! Health check endpoint.

use axum::{Json, Router, extract::State, routing::get};
use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::AppState;

/// Health check response.
#[derive(Serialize)]
pub struct HealthResponse {
    /// Service status.
    pub status: &'static str,
    /// Service version.
    pub version: &'static str,
    /// Active expense store.
    pub store: &'static str,
    /// When rates were last fetched from the provider, if ever.
    pub rates_fetched_at: Option<DateTime<Utc>>,
}

/// Health check handler. Does not trigger a rate fetch.
async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        version: env!("CARGO_PKG_VERSION"),
        store: state.ledger.store_name(),
        rates_fetched_at: state.rates.last_known().fetched_at(),
    })
}

/// Creates health check routes.
pub fn routes() -> Router<AppState> {
    Router::new().route("/health", get(health_check))
}

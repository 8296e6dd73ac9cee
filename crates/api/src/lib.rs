//! HTTP API layer with Axum routes and middleware.
//!
//! This crate provides:
//! - REST API routes
//! - Authentication middleware and the session extractor
//! - Error-to-response mapping
//! - The HTTP exchange-rate provider

pub mod error;
pub mod middleware;
pub mod providers;
pub mod routes;

use axum::Router;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use expensa_core::directory::Directory;
use expensa_core::ledger::{ExpenseLedger, ExpenseStore};
use expensa_core::providers::{CountrySource, RateSource, ReceiptScanner};
use expensa_shared::JwtService;

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    /// Expense submission, decisions and projections.
    pub ledger: ExpenseLedger,
    /// Accounts, users and categories.
    pub directory: Directory,
    /// JWT service for token operations.
    pub jwt_service: Arc<JwtService>,
    /// Cached exchange rates.
    pub rates: Arc<RateSource>,
    /// Cached country and currency list.
    pub countries: Arc<CountrySource>,
    /// Receipt OCR and extraction.
    pub scanner: Arc<ReceiptScanner>,
}

impl AppState {
    /// Builds the state around one store shared by ledger and directory.
    #[must_use]
    pub fn new(
        store: Arc<dyn ExpenseStore>,
        jwt_service: JwtService,
        rates: RateSource,
        countries: CountrySource,
        scanner: ReceiptScanner,
    ) -> Self {
        Self {
            ledger: ExpenseLedger::new(store.clone()),
            directory: Directory::new(store),
            jwt_service: Arc::new(jwt_service),
            rates: Arc::new(rates),
            countries: Arc::new(countries),
            scanner: Arc::new(scanner),
        }
    }
}

/// Creates the main application router.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .nest("/api/v1", routes::api_routes_with_state(state.clone()))
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state)
}

//! API route definitions.

use axum::{Router, middleware};

use crate::{AppState, middleware::auth_middleware};

pub mod accounts;
pub mod currencies;
pub mod exchange_rates;
pub mod expenses;
pub mod health;
pub mod receipts;

#[cfg(test)]
mod tests;

/// Creates the API router with protected routes that need state for middleware.
pub fn api_routes_with_state(state: AppState) -> Router<AppState> {
    // Protected routes that require authentication
    let protected_routes = Router::new()
        .merge(accounts::protected_routes())
        .merge(expenses::routes())
        .merge(receipts::routes())
        .layer(middleware::from_fn_with_state(state, auth_middleware));

    // Combine public and protected routes
    Router::new()
        .merge(health::routes())
        .merge(accounts::public_routes())
        .merge(currencies::routes())
        .merge(exchange_rates::routes())
        .merge(protected_routes)
}

//! Country and currency listing routes.

use std::collections::BTreeMap;

use axum::{Json, Router, extract::State, response::IntoResponse, routing::get};
use serde::Serialize;

use crate::AppState;

/// Creates the currency routes.
pub fn routes() -> Router<AppState> {
    Router::new().route("/currencies", get(list_currencies))
}

/// Response for a currency.
#[derive(Debug, Serialize)]
pub struct CurrencyResponse {
    /// Currency code (ISO 4217).
    pub code: String,
    /// Currency name.
    pub name: String,
    /// Currency symbol.
    pub symbol: String,
}

/// GET `/currencies` - Countries and the distinct currencies they use.
async fn list_currencies(State(state): State<AppState>) -> impl IntoResponse {
    let countries = state.countries.current().await;

    let currencies: Vec<CurrencyResponse> = countries
        .iter()
        .map(|c| {
            (
                c.currency_code.clone(),
                CurrencyResponse {
                    code: c.currency_code.clone(),
                    name: c.currency_name.clone(),
                    symbol: c.currency_symbol.clone(),
                },
            )
        })
        .collect::<BTreeMap<_, _>>()
        .into_values()
        .collect();

    Json(serde_json::json!({
        "countries": countries.as_slice(),
        "currencies": currencies,
    }))
}

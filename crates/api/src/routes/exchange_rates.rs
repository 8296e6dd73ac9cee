//! Exchange rate routes.

use std::collections::BTreeMap;

use axum::{
    Json, Router,
    extract::{Query, State},
    response::IntoResponse,
    routing::get,
};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::AppState;
use expensa_core::currency::CurrencyNormalizer;
use expensa_core::currency::rates::normalize_code;

/// Creates the exchange rate routes.
pub fn routes() -> Router<AppState> {
    Router::new().route("/exchange-rates", get(get_rates))
}

/// Query parameters: both set to get a display rate for one pair.
#[derive(Debug, Deserialize)]
pub struct RateQuery {
    /// Source currency.
    pub from: Option<String>,
    /// Target currency.
    pub to: Option<String>,
}

/// Display rate for one currency pair.
#[derive(Debug, Serialize)]
pub struct PairRate {
    /// Source currency.
    pub from: String,
    /// Target currency.
    pub to: String,
    /// Units of `to` per unit of `from`, 4 dp. Null when the pair overflows.
    pub rate: Option<Decimal>,
}

/// Response for the current rate table.
#[derive(Debug, Serialize)]
pub struct RatesResponse {
    /// Currency every rate is relative to.
    pub pivot: String,
    /// When the table was fetched; absent for the built-in table.
    pub fetched_at: Option<DateTime<Utc>>,
    /// Code to rate.
    pub rates: BTreeMap<String, Decimal>,
    /// The requested pair, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pair: Option<PairRate>,
}

/// GET `/exchange-rates` - The current rate table.
async fn get_rates(
    State(state): State<AppState>,
    Query(query): Query<RateQuery>,
) -> impl IntoResponse {
    let table = state.rates.current().await;

    let pair = match (query.from, query.to) {
        (Some(from), Some(to)) => {
            let (from, to) = (normalize_code(&from), normalize_code(&to));
            Some(PairRate {
                rate: CurrencyNormalizer::exchange_rate(&from, &to, &table),
                from,
                to,
            })
        }
        _ => None,
    };

    Json(RatesResponse {
        pivot: table.pivot().to_string(),
        fetched_at: table.fetched_at(),
        rates: table
            .codes()
            .into_iter()
            .filter_map(|code| Some((code.to_string(), table.rate(code)?)))
            .collect(),
        pair,
    })
}

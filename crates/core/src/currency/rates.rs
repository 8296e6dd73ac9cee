//! Exchange rate tables expressed against a pivot currency.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::warn;

/// Rates for the built-in fallback table, 1 USD = rate units of the currency.
///
/// Stored as (code, mantissa, scale) so the table stays in exact decimals.
const FALLBACK_USD_RATES: [(&str, i64, u32); 12] = [
    ("USD", 1, 0),
    ("EUR", 92, 2),
    ("GBP", 79, 2),
    ("JPY", 14950, 2),
    ("CAD", 136, 2),
    ("AUD", 152, 2),
    ("INR", 8312, 2),
    ("CNY", 724, 2),
    ("CHF", 88, 2),
    ("SEK", 1045, 2),
    ("NOK", 1068, 2),
    ("DKK", 686, 2),
];

/// Smallest rate accepted from a provider.
const MIN_RATE: Decimal = Decimal::from_parts(1, 0, 0, false, 6);

/// Largest rate accepted from a provider.
const MAX_RATE: Decimal = Decimal::from_parts(1_000_000_000, 0, 0, false, 0);

/// A currency rate table.
///
/// Maps currency code to the number of units of that currency worth one
/// unit of the pivot currency. Codes are stored upper-cased; only rates
/// between 0.000001 and 1,000,000,000 are kept.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RateTable {
    pivot: String,
    rates: HashMap<String, Decimal>,
    fetched_at: Option<DateTime<Utc>>,
}

impl RateTable {
    /// Builds a table from raw provider rates.
    ///
    /// Rates outside the accepted band are dropped. The pivot itself is
    /// always present with rate 1.
    #[must_use]
    pub fn new(pivot: &str, rates: HashMap<String, Decimal>) -> Self {
        let pivot = normalize_code(pivot);
        let mut table: HashMap<String, Decimal> = rates
            .into_iter()
            .filter_map(|(code, rate)| {
                if (MIN_RATE..=MAX_RATE).contains(&rate) {
                    Some((normalize_code(&code), rate))
                } else {
                    warn!(currency = %code, %rate, "Dropping out-of-range exchange rate");
                    None
                }
            })
            .collect();
        table.insert(pivot.clone(), Decimal::ONE);

        Self {
            pivot,
            rates: table,
            fetched_at: None,
        }
    }

    /// The built-in USD-pivot table used before any provider fetch succeeds.
    #[must_use]
    pub fn fallback() -> Self {
        let rates = FALLBACK_USD_RATES
            .iter()
            .map(|(code, mantissa, scale)| ((*code).to_string(), Decimal::new(*mantissa, *scale)))
            .collect();
        Self::new("USD", rates)
    }

    /// Marks the table with the time it was fetched.
    #[must_use]
    pub fn with_fetched_at(mut self, fetched_at: DateTime<Utc>) -> Self {
        self.fetched_at = Some(fetched_at);
        self
    }

    /// Pivot currency code.
    #[must_use]
    pub fn pivot(&self) -> &str {
        &self.pivot
    }

    /// When the table was fetched from a provider, `None` for built-in tables.
    #[must_use]
    pub const fn fetched_at(&self) -> Option<DateTime<Utc>> {
        self.fetched_at
    }

    /// Rate for a currency code, if the table has one.
    #[must_use]
    pub fn rate(&self, code: &str) -> Option<Decimal> {
        self.rates.get(&normalize_code(code)).copied()
    }

    /// Returns true if the table carries a rate for the code.
    #[must_use]
    pub fn contains(&self, code: &str) -> bool {
        self.rates.contains_key(&normalize_code(code))
    }

    /// All currency codes in the table, sorted.
    #[must_use]
    pub fn codes(&self) -> Vec<&str> {
        let mut codes: Vec<&str> = self.rates.keys().map(String::as_str).collect();
        codes.sort_unstable();
        codes
    }

    /// Number of currencies in the table.
    #[must_use]
    pub fn len(&self) -> usize {
        self.rates.len()
    }

    /// Returns true if the table holds no rates.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rates.is_empty()
    }
}

impl Default for RateTable {
    fn default() -> Self {
        Self::fallback()
    }
}

/// Upper-cases and trims a currency code.
#[must_use]
pub fn normalize_code(code: &str) -> String {
    code.trim().to_ascii_uppercase()
}

//! Exchange-rate provider and its cache.

use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};
use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use moka::future::Cache;
use rust_decimal::Decimal;
use tracing::{debug, warn};

use crate::currency::RateTable;
use crate::currency::rates::normalize_code;
use crate::providers::error::{ProviderError, bounded};

/// Default time a fetched table stays fresh.
pub const DEFAULT_RATES_TTL: Duration = Duration::from_secs(60 * 60);

/// Source of exchange rates relative to a pivot currency.
#[async_trait]
pub trait RateProvider: Send + Sync {
    /// Fetches code → rate, where the pivot has rate 1.
    async fn fetch_rates(&self, pivot: &str) -> Result<HashMap<String, Decimal>, ProviderError>;
}

/// Provider that always returns the same rates.
#[derive(Debug, Clone)]
pub struct FixedRates(HashMap<String, Decimal>);

impl FixedRates {
    /// Serves `rates` unchanged.
    #[must_use]
    pub fn new(rates: HashMap<String, Decimal>) -> Self {
        Self(rates)
    }

    /// Serves the built-in fallback table.
    #[must_use]
    pub fn fallback() -> Self {
        let table = RateTable::fallback();
        Self(
            table
                .codes()
                .into_iter()
                .filter_map(|code| Some((code.to_string(), table.rate(code)?)))
                .collect(),
        )
    }
}

#[async_trait]
impl RateProvider for FixedRates {
    async fn fetch_rates(&self, _pivot: &str) -> Result<HashMap<String, Decimal>, ProviderError> {
        Ok(self.0.clone())
    }
}

/// Rate tables fetched at most once per TTL, with a last-known-good
/// fallback.
///
/// The first successful fetch replaces the built-in table; later failures
/// keep serving the most recent good table. A failed fetch is cached for
/// the TTL as well, so a broken provider is not retried on every request.
pub struct RateSource {
    provider: Arc<dyn RateProvider>,
    pivot: String,
    timeout: Duration,
    cache: Cache<String, Arc<RateTable>>,
    last_good: RwLock<Arc<RateTable>>,
}

impl RateSource {
    /// Creates a source over `provider`.
    #[must_use]
    pub fn new(provider: Arc<dyn RateProvider>, pivot: &str, ttl: Duration, timeout: Duration) -> Self {
        Self {
            provider,
            pivot: normalize_code(pivot),
            timeout,
            cache: Cache::builder().max_capacity(1).time_to_live(ttl).build(),
            last_good: RwLock::new(Arc::new(RateTable::fallback())),
        }
    }

    /// A source that never leaves the process: serves the built-in table.
    #[must_use]
    pub fn offline() -> Self {
        Self::new(
            Arc::new(FixedRates::fallback()),
            "USD",
            DEFAULT_RATES_TTL,
            Duration::from_secs(1),
        )
    }

    /// The current table, fetching if the cached one has expired.
    ///
    /// Never fails: on timeout or provider error the last good table is
    /// returned.
    pub async fn current(&self) -> Arc<RateTable> {
        let fetched = self
            .cache
            .try_get_with(self.pivot.clone(), self.fetch())
            .await;
        match fetched {
            Ok(table) => table,
            Err(err) => {
                warn!(error = %err, pivot = %self.pivot, "Rate fetch failed, using last known rates");
                let table = self.last_known();
                self.cache.insert(self.pivot.clone(), table.clone()).await;
                table
            }
        }
    }

    /// The most recent good table without fetching.
    #[must_use]
    pub fn last_known(&self) -> Arc<RateTable> {
        self.last_good
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    async fn fetch(&self) -> Result<Arc<RateTable>, ProviderError> {
        let rates = bounded(self.timeout, self.provider.fetch_rates(&self.pivot)).await?;
        let table = RateTable::new(&self.pivot, rates);
        if table.len() < 2 {
            return Err(ProviderError::Unavailable("no usable rates".to_string()));
        }
        let table = Arc::new(table.with_fetched_at(Utc::now()));
        debug!(pivot = %self.pivot, currencies = table.len(), "Rates refreshed");

        *self
            .last_good
            .write()
            .unwrap_or_else(PoisonError::into_inner) = table.clone();
        Ok(table)
    }
}

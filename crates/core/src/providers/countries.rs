//! Country and currency list provider.

use std::sync::{Arc, PoisonError, RwLock};
use std::time::Duration;

use async_trait::async_trait;
use moka::future::Cache;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::providers::error::{ProviderError, bounded};

/// Default time a fetched list stays fresh.
pub const DEFAULT_COUNTRIES_TTL: Duration = Duration::from_secs(24 * 60 * 60);

/// A country and the currency it uses.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Country {
    /// Common name.
    pub name: String,
    /// ISO 4217 code.
    pub currency_code: String,
    /// Currency display name.
    pub currency_name: String,
    /// Currency symbol.
    pub currency_symbol: String,
}

impl Country {
    fn new(name: &str, code: &str, currency: &str, symbol: &str) -> Self {
        Self {
            name: name.to_string(),
            currency_code: code.to_string(),
            currency_name: currency.to_string(),
            currency_symbol: symbol.to_string(),
        }
    }
}

/// Built-in list served when no provider answers.
#[must_use]
pub fn fallback_countries() -> Vec<Country> {
    vec![
        Country::new("United States", "USD", "US Dollar", "$"),
        Country::new("Germany", "EUR", "Euro", "€"),
        Country::new("United Kingdom", "GBP", "British Pound", "£"),
        Country::new("Japan", "JPY", "Japanese Yen", "¥"),
        Country::new("Canada", "CAD", "Canadian Dollar", "$"),
        Country::new("Australia", "AUD", "Australian Dollar", "$"),
        Country::new("India", "INR", "Indian Rupee", "₹"),
        Country::new("China", "CNY", "Chinese Yuan", "¥"),
        Country::new("Switzerland", "CHF", "Swiss Franc", "Fr"),
        Country::new("Sweden", "SEK", "Swedish Krona", "kr"),
    ]
}

/// Source of the country list.
#[async_trait]
pub trait CountryProvider: Send + Sync {
    /// Fetches every known country.
    async fn fetch_countries(&self) -> Result<Vec<Country>, ProviderError>;
}

/// Provider serving the built-in list.
#[derive(Debug, Clone, Copy, Default)]
pub struct StaticCountries;

#[async_trait]
impl CountryProvider for StaticCountries {
    async fn fetch_countries(&self) -> Result<Vec<Country>, ProviderError> {
        Ok(fallback_countries())
    }
}

/// Country list fetched at most once per TTL.
///
/// Same contract as the rate source: never fails, serves the last good
/// list (initially the built-in one) when the provider misbehaves.
pub struct CountrySource {
    provider: Arc<dyn CountryProvider>,
    timeout: Duration,
    cache: Cache<(), Arc<Vec<Country>>>,
    last_good: RwLock<Arc<Vec<Country>>>,
}

impl CountrySource {
    /// Creates a source over `provider`.
    #[must_use]
    pub fn new(provider: Arc<dyn CountryProvider>, ttl: Duration, timeout: Duration) -> Self {
        Self {
            provider,
            timeout,
            cache: Cache::builder().max_capacity(1).time_to_live(ttl).build(),
            last_good: RwLock::new(Arc::new(fallback_countries())),
        }
    }

    /// A source over the built-in list.
    #[must_use]
    pub fn offline() -> Self {
        Self::new(
            Arc::new(StaticCountries),
            DEFAULT_COUNTRIES_TTL,
            Duration::from_secs(1),
        )
    }

    /// The current list, sorted by name.
    pub async fn current(&self) -> Arc<Vec<Country>> {
        match self.cache.try_get_with((), self.fetch()).await {
            Ok(countries) => countries,
            Err(err) => {
                warn!(error = %err, "Country fetch failed, using last known list");
                let countries = self
                    .last_good
                    .read()
                    .unwrap_or_else(PoisonError::into_inner)
                    .clone();
                self.cache.insert((), countries.clone()).await;
                countries
            }
        }
    }

    async fn fetch(&self) -> Result<Arc<Vec<Country>>, ProviderError> {
        let mut countries = bounded(self.timeout, self.provider.fetch_countries()).await?;
        countries.retain(|c| !c.name.trim().is_empty() && c.currency_code.len() == 3);
        if countries.is_empty() {
            return Err(ProviderError::Unavailable("empty country list".to_string()));
        }
        countries.sort_by(|a, b| a.name.cmp(&b.name));
        debug!(count = countries.len(), "Country list refreshed");

        let countries = Arc::new(countries);
        *self
            .last_good
            .write()
            .unwrap_or_else(PoisonError::into_inner) = countries.clone();
        Ok(countries)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct Counting {
        calls: AtomicUsize,
        result: Result<Vec<Country>, ProviderError>,
    }

    #[async_trait]
    impl CountryProvider for Counting {
        async fn fetch_countries(&self) -> Result<Vec<Country>, ProviderError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.result.clone()
        }
    }

    fn source(result: Result<Vec<Country>, ProviderError>) -> (Arc<Counting>, CountrySource) {
        let provider = Arc::new(Counting {
            calls: AtomicUsize::new(0),
            result,
        });
        let source = CountrySource::new(
            provider.clone(),
            DEFAULT_COUNTRIES_TTL,
            Duration::from_secs(1),
        );
        (provider, source)
    }

    #[test]
    fn test_fallback_has_enough_countries() {
        let countries = fallback_countries();
        assert!(countries.len() >= 8);
        assert!(countries.iter().any(|c| c.currency_code == "USD"));
    }

    #[tokio::test]
    async fn test_fetched_list_sorted_and_cached() {
        let (provider, source) = source(Ok(vec![
            Country::new("Norway", "NOK", "Norwegian Krone", "kr"),
            Country::new("Denmark", "DKK", "Danish Krone", "kr"),
        ]));

        let countries = source.current().await;
        source.current().await;

        assert_eq!(provider.calls.load(Ordering::SeqCst), 1);
        let names: Vec<_> = countries.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, ["Denmark", "Norway"]);
    }

    #[tokio::test]
    async fn test_empty_list_falls_back() {
        let (_, source) = source(Ok(vec![]));
        assert_eq!(source.current().await.len(), fallback_countries().len());
    }

    #[tokio::test]
    async fn test_error_falls_back_once() {
        let (provider, source) = source(Err(ProviderError::Decode("not json".into())));
        assert!(!source.current().await.is_empty());
        source.current().await;
        assert_eq!(provider.calls.load(Ordering::SeqCst), 1);
    }
}

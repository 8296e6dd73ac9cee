//! Exchange-rate provider over HTTP.

use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use rust_decimal::Decimal;
use serde::Deserialize;
use tracing::debug;

use expensa_core::providers::{ProviderError, RateProvider};

/// Expected response: `{ "rates": { "EUR": 0.92, ... } }`. Other fields
/// are ignored.
#[derive(Debug, Deserialize)]
struct RatesBody {
    rates: HashMap<String, Decimal>,
}

/// Fetches `{endpoint}/{pivot}` and reads its `rates` object.
#[derive(Debug, Clone)]
pub struct HttpRateProvider {
    client: reqwest::Client,
    endpoint: String,
}

impl HttpRateProvider {
    /// Creates a provider for `endpoint`.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(endpoint: &str, timeout: Duration) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(concat!("expensa/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self {
            client,
            endpoint: endpoint.trim_end_matches('/').to_string(),
        })
    }

    fn url(&self, pivot: &str) -> String {
        format!("{}/{pivot}", self.endpoint)
    }
}

fn parse_rates(body: &str) -> Result<HashMap<String, Decimal>, ProviderError> {
    let parsed: RatesBody =
        serde_json::from_str(body).map_err(|e| ProviderError::Decode(e.to_string()))?;
    if parsed.rates.is_empty() {
        return Err(ProviderError::Unavailable("response has no rates".to_string()));
    }
    Ok(parsed.rates)
}

#[async_trait]
impl RateProvider for HttpRateProvider {
    async fn fetch_rates(&self, pivot: &str) -> Result<HashMap<String, Decimal>, ProviderError> {
        let url = self.url(pivot);
        debug!(%url, "Fetching exchange rates");

        let body = self
            .client
            .get(&url)
            .send()
            .await
            .and_then(reqwest::Response::error_for_status)
            .map_err(|e| ProviderError::Transport(e.to_string()))?
            .text()
            .await
            .map_err(|e| ProviderError::Transport(e.to_string()))?;

        parse_rates(&body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_parse_rates_object() {
        let rates = parse_rates(
            r#"{"base":"USD","date":"2024-11-20","rates":{"EUR":0.92,"GBP":"0.79","JPY":149.5}}"#,
        )
        .unwrap();
        assert_eq!(rates.len(), 3);
        assert_eq!(rates["GBP"], dec!(0.79));
        assert_eq!(rates["JPY"], dec!(149.5));
    }

    #[test]
    fn test_parse_rejects_bad_bodies() {
        assert!(matches!(parse_rates("<html>"), Err(ProviderError::Decode(_))));
        assert!(matches!(parse_rates(r#"{"result":"error"}"#), Err(ProviderError::Decode(_))));
        assert!(matches!(
            parse_rates(r#"{"rates":{}}"#),
            Err(ProviderError::Unavailable(_))
        ));
    }

    #[test]
    fn test_url_joins_pivot() {
        let provider =
            HttpRateProvider::new("https://rates.example/latest/", Duration::from_secs(1)).unwrap();
        assert_eq!(provider.url("USD"), "https://rates.example/latest/USD");
    }
}

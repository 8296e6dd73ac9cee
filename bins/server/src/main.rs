//! Expensa API Server
//!
//! Main entry point for the expense approval service.

use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use tokio::net::TcpListener;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use expensa_api::providers::HttpRateProvider;
use expensa_api::{AppState, create_router};
use expensa_core::ledger::{ExpenseStore, InMemoryStore};
use expensa_core::providers::{
    CountrySource, FixedRates, RateProvider, RateSource, ReceiptScanner, StaticCountries,
    Utf8TextOcr,
};
use expensa_db::{DbExpenseStore, connect_and_migrate};
use expensa_shared::{AppConfig, DataSourceKind, JwtConfig, JwtService};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "expensa=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = AppConfig::load().context("Failed to load configuration")?;
    let jwt_service = JwtService::new(JwtConfig::from(&config.jwt));

    let store: Arc<dyn ExpenseStore> = match config.data_source {
        DataSourceKind::Memory => {
            let store = InMemoryStore::demo()?;
            log_demo_tokens(&store, &jwt_service).await?;
            Arc::new(store)
        }
        DataSourceKind::Database => {
            let url = config
                .database
                .as_ref()
                .map(|db| db.url.as_str())
                .context("data_source = \"database\" requires database.url")?;
            let db = connect_and_migrate(url).await?;
            info!("Connected to database and applied migrations");
            Arc::new(DbExpenseStore::new(db))
        }
    };

    let rate_timeout = Duration::from_millis(config.rates.timeout_ms);
    let rate_provider: Arc<dyn RateProvider> = match config.rates.endpoint.as_deref() {
        Some(endpoint) => {
            info!(endpoint, "Using HTTP exchange rate provider");
            Arc::new(HttpRateProvider::new(endpoint, rate_timeout)?)
        }
        None => {
            warn!("No rates endpoint configured, using built-in rates");
            Arc::new(FixedRates::fallback())
        }
    };
    if Duration::from_secs(config.rates.ttl_secs) < config.rates.ttl() {
        warn!(
            ttl_secs = config.rates.ttl_secs,
            "Rates TTL below one hour, using one hour"
        );
    }
    let rates = RateSource::new(
        rate_provider,
        &config.rates.pivot,
        config.rates.ttl(),
        rate_timeout,
    );
    let countries = CountrySource::new(
        Arc::new(StaticCountries),
        Duration::from_secs(config.countries.ttl_secs),
        Duration::from_millis(config.countries.timeout_ms),
    );
    let scanner = ReceiptScanner::new(
        Arc::new(Utf8TextOcr),
        Duration::from_millis(config.ocr.timeout_ms),
    );

    let state = AppState::new(store, jwt_service, rates, countries, scanner);
    info!(store = state.ledger.store_name(), "Expense store ready");

    let app = create_router(state);

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = TcpListener::bind(&addr).await?;
    info!("Server listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}

/// Logs a bearer token per demo user so the API can be tried right away.
async fn log_demo_tokens(store: &InMemoryStore, jwt: &JwtService) -> anyhow::Result<()> {
    for account in store.accounts() {
        for user in store.list_users(account.id).await? {
            let token = jwt.generate_access_token(
                user.id.into_inner(),
                account.id.into_inner(),
                user.role.as_str(),
            )?;
            info!(
                account = %account.company_name,
                email = %user.email,
                role = user.role.as_str(),
                %token,
                "Demo user"
            );
        }
    }
    Ok(())
}

//! Application configuration management.

use std::time::Duration;

use serde::Deserialize;

/// Application configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// Server configuration.
    #[serde(default)]
    pub server: ServerConfig,
    /// Which expense store backs the running process.
    #[serde(default)]
    pub data_source: DataSourceKind,
    /// Database configuration (required when `data_source = "database"`).
    #[serde(default)]
    pub database: Option<DatabaseConfig>,
    /// JWT configuration.
    pub jwt: JwtSettings,
    /// Exchange rate provider configuration.
    #[serde(default)]
    pub rates: RatesConfig,
    /// Country/currency list provider configuration.
    #[serde(default)]
    pub countries: CountriesConfig,
    /// Receipt OCR configuration.
    #[serde(default)]
    pub ocr: OcrConfig,
}

/// Server configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Host to bind to.
    #[serde(default = "default_host")]
    pub host: String,
    /// Port to listen on.
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

/// Backing store selected once at start-up.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DataSourceKind {
    /// In-memory fixture store seeded with demo data.
    #[default]
    Memory,
    /// SeaORM-backed persistent store.
    Database,
}

/// Database configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    /// Database connection URL.
    pub url: String,
}

/// JWT configuration as read from config sources.
#[derive(Debug, Clone, Deserialize)]
pub struct JwtSettings {
    /// Secret key for signing tokens.
    pub secret: String,
    /// Access token expiration in seconds.
    #[serde(default = "default_access_token_expiry")]
    pub access_token_expiry_secs: u64,
}

fn default_access_token_expiry() -> u64 {
    3600 // 1 hour
}

/// Exchange rate provider configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct RatesConfig {
    /// Pivot currency the rate table is expressed against.
    #[serde(default = "default_pivot")]
    pub pivot: String,
    /// HTTP endpoint; `{pivot}` is appended as the last path segment.
    /// When unset only the built-in fallback table is used.
    #[serde(default)]
    pub endpoint: Option<String>,
    /// How long a fetched table stays fresh. Read through [`Self::ttl`].
    #[serde(default = "default_rates_ttl")]
    pub ttl_secs: u64,
    /// Per-request timeout.
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
}

impl RatesConfig {
    /// Shortest allowed freshness window: at most one fetch per hour.
    pub const MIN_TTL: Duration = Duration::from_secs(3600);

    /// Effective freshness window, never below [`Self::MIN_TTL`].
    #[must_use]
    pub fn ttl(&self) -> Duration {
        Duration::from_secs(self.ttl_secs).max(Self::MIN_TTL)
    }
}

impl Default for RatesConfig {
    fn default() -> Self {
        Self {
            pivot: default_pivot(),
            endpoint: None,
            ttl_secs: default_rates_ttl(),
            timeout_ms: default_timeout_ms(),
        }
    }
}

fn default_pivot() -> String {
    "USD".to_string()
}

fn default_rates_ttl() -> u64 {
    3600
}

fn default_timeout_ms() -> u64 {
    5000
}

/// Country/currency list provider configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct CountriesConfig {
    /// How long a fetched list stays fresh.
    #[serde(default = "default_countries_ttl")]
    pub ttl_secs: u64,
    /// Per-request timeout.
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
}

impl Default for CountriesConfig {
    fn default() -> Self {
        Self {
            ttl_secs: default_countries_ttl(),
            timeout_ms: default_timeout_ms(),
        }
    }
}

fn default_countries_ttl() -> u64 {
    86400 // 24 hours
}

/// Receipt OCR configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct OcrConfig {
    /// Per-request timeout.
    #[serde(default = "default_ocr_timeout_ms")]
    pub timeout_ms: u64,
}

impl Default for OcrConfig {
    fn default() -> Self {
        Self {
            timeout_ms: default_ocr_timeout_ms(),
        }
    }
}

fn default_ocr_timeout_ms() -> u64 {
    15000
}

impl AppConfig {
    /// Loads configuration from environment and config files.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration cannot be loaded.
    pub fn load() -> Result<Self, config::ConfigError> {
        let run_mode = std::env::var("RUN_MODE").unwrap_or_else(|_| "development".to_string());

        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name(&format!("config/{run_mode}")).required(false))
            .add_source(config::Environment::with_prefix("EXPENSA").separator("__"))
            .build()?;

        config.try_deserialize()
    }
}

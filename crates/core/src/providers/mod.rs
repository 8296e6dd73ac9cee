//! Cached, time-bounded access to external data sources.
//!
//! Exchange rates, the country list and OCR are the only suspension points
//! in the system. Every call is wrapped in a timeout and every failure is
//! absorbed here: callers always get a usable value.
//!
//! # Modules
//!
//! - `error` - Provider failure taxonomy
//! - `rates` - Exchange-rate provider and its hourly cache
//! - `countries` - Country/currency provider and its daily cache
//! - `ocr` - OCR provider and the receipt scanner

pub mod countries;
pub mod error;
pub mod ocr;
pub mod rates;

pub use countries::{Country, CountryProvider, CountrySource, StaticCountries, fallback_countries};
pub use error::ProviderError;
pub use ocr::{OcrProvider, ReceiptScanner, Utf8TextOcr};
pub use rates::{FixedRates, RateProvider, RateSource};

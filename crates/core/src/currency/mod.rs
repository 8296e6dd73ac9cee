//! Multi-currency handling: rate tables and base-currency normalization.

pub mod conversion;
pub mod rates;

#[cfg(test)]
mod props;

pub use conversion::CurrencyNormalizer;
pub use rates::RateTable;

//! Currency conversion logic.
//!
//! CRITICAL: Rounding strategy for base-currency normalization:
//! - Conversions pivot through the table's pivot currency
//! - Round once, on the final result, to 2 decimal places
//! - Use round half away from zero
//! - Same-currency conversions are returned untouched

use rust_decimal::Decimal;
use rust_decimal::RoundingStrategy;

use super::rates::{RateTable, normalize_code};

/// Decimal places for converted money amounts.
pub const MONEY_DECIMAL_PLACES: u32 = 2;

/// Decimal places for display-only exchange rates.
pub const RATE_DECIMAL_PLACES: u32 = 4;

/// Stateless currency normalizer over an injected rate table.
pub struct CurrencyNormalizer;

impl CurrencyNormalizer {
    /// Converts `amount` from one currency to another.
    ///
    /// A code missing from the table is treated as having rate 1, i.e. as if
    /// it were the pivot. This keeps submissions in an unlisted currency
    /// flowing instead of failing. Returns `None` if the result does not fit
    /// in a `Decimal`.
    ///
    /// # Example
    ///
    /// ```
    /// use rust_decimal_macros::dec;
    /// use expensa_core::currency::{CurrencyNormalizer, RateTable};
    ///
    /// let table = RateTable::fallback();
    /// assert_eq!(CurrencyNormalizer::convert(dec!(100), "USD", "EUR", &table), Some(dec!(92.00)));
    /// assert_eq!(CurrencyNormalizer::convert(dec!(10.005), "EUR", "EUR", &table), Some(dec!(10.005)));
    /// ```
    #[must_use]
    pub fn convert(amount: Decimal, from: &str, to: &str, table: &RateTable) -> Option<Decimal> {
        let from = normalize_code(from);
        let to = normalize_code(to);
        if from == to {
            return Some(amount);
        }

        let pivot_amount = amount.checked_div(Self::rate_or_one(table, &from))?;
        let converted = pivot_amount.checked_mul(Self::rate_or_one(table, &to))?;
        Some(Self::round_money(converted))
    }

    /// Display exchange rate: units of `to` per unit of `from`, 4 decimals.
    #[must_use]
    pub fn exchange_rate(from: &str, to: &str, table: &RateTable) -> Option<Decimal> {
        let rate = Self::rate_or_one(table, to).checked_div(Self::rate_or_one(table, from))?;
        Some(rate.round_dp_with_strategy(RATE_DECIMAL_PLACES, RoundingStrategy::MidpointAwayFromZero))
    }

    /// Rounds a money amount to 2 decimals, half away from zero.
    #[must_use]
    pub fn round_money(value: Decimal) -> Decimal {
        value.round_dp_with_strategy(MONEY_DECIMAL_PLACES, RoundingStrategy::MidpointAwayFromZero)
    }

    fn rate_or_one(table: &RateTable, code: &str) -> Decimal {
        table.rate(code).unwrap_or(Decimal::ONE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use std::collections::HashMap;

    fn table() -> RateTable {
        let mut rates = HashMap::new();
        rates.insert("EUR".to_string(), dec!(0.85));
        rates.insert("JPY".to_string(), dec!(110));
        rates.insert("GBP".to_string(), dec!(0.73));
        RateTable::new("USD", rates)
    }

    #[test]
    fn test_same_currency_is_exact() {
        assert_eq!(
            CurrencyNormalizer::convert(dec!(125.505), "USD", "USD", &table()),
            Some(dec!(125.505))
        );
        assert_eq!(
            CurrencyNormalizer::convert(dec!(1.23456), "eur", "EUR", &table()),
            Some(dec!(1.23456))
        );
    }

    #[test]
    fn test_convert_from_pivot() {
        // 100 USD * 0.85 = 85 EUR
        assert_eq!(
            CurrencyNormalizer::convert(dec!(100), "USD", "EUR", &table()),
            Some(dec!(85.00))
        );
    }

    #[test]
    fn test_convert_to_pivot() {
        // 110 JPY / 110 = 1 USD
        assert_eq!(
            CurrencyNormalizer::convert(dec!(110), "JPY", "USD", &table()),
            Some(dec!(1.00))
        );
    }

    #[test]
    fn test_convert_cross_rate() {
        // 100 EUR -> 117.647... USD -> 85.882... GBP
        assert_eq!(
            CurrencyNormalizer::convert(dec!(100), "EUR", "GBP", &table()),
            Some(dec!(85.88))
        );
    }

    #[test]
    fn test_convert_rounds_only_the_final_result() {
        // 3 JPY -> 0.02727... USD -> 0.02318... EUR
        // Rounding the pivot amount first would give 0.03 * 0.85 = 0.0255 -> 0.03.
        assert_eq!(
            CurrencyNormalizer::convert(dec!(3), "JPY", "EUR", &table()),
            Some(dec!(0.02))
        );
    }

    #[test]
    fn test_round_half_away_from_zero() {
        assert_eq!(CurrencyNormalizer::round_money(dec!(2.345)), dec!(2.35));
        assert_eq!(CurrencyNormalizer::round_money(dec!(2.355)), dec!(2.36));
        assert_eq!(CurrencyNormalizer::round_money(dec!(-2.345)), dec!(-2.35));
    }

    #[test]
    fn test_unknown_source_currency_defaults_to_rate_one() {
        // XYZ is not in the table, so 50 XYZ is treated as 50 USD.
        assert_eq!(
            CurrencyNormalizer::convert(dec!(50), "XYZ", "EUR", &table()),
            Some(dec!(42.50))
        );
    }

    #[test]
    fn test_unknown_target_currency_defaults_to_rate_one() {
        assert_eq!(
            CurrencyNormalizer::convert(dec!(85), "EUR", "XYZ", &table()),
            Some(dec!(100.00))
        );
    }

    #[test]
    fn test_exchange_rate_display() {
        assert_eq!(
            CurrencyNormalizer::exchange_rate("USD", "EUR", &table()),
            Some(dec!(0.8500))
        );
        // 0.73 / 0.85 = 0.858823... -> 0.8588
        assert_eq!(
            CurrencyNormalizer::exchange_rate("EUR", "GBP", &table()),
            Some(dec!(0.8588))
        );
        assert_eq!(
            CurrencyNormalizer::exchange_rate("GBP", "GBP", &table()),
            Some(Decimal::ONE)
        );
    }

    #[test]
    fn test_extreme_rates_do_not_panic() {
        let mut rates = HashMap::new();
        rates.insert("XTN".to_string(), Decimal::new(1, 25));
        rates.insert("BIG".to_string(), Decimal::MAX);
        rates.insert("LOW".to_string(), dec!(0.000001));
        rates.insert("HIGH".to_string(), dec!(1000000000));
        let table = RateTable::new("USD", rates);

        assert_eq!(
            CurrencyNormalizer::convert(dec!(100000), "XTN", "USD", &table),
            Some(dec!(100000.00))
        );
        assert_eq!(
            CurrencyNormalizer::convert(dec!(100000), "LOW", "HIGH", &table),
            Some(dec!(100000000000000000000))
        );
        assert_eq!(
            CurrencyNormalizer::exchange_rate("XTN", "BIG", &table),
            Some(Decimal::ONE)
        );
    }

    #[test]
    fn test_overflow_is_none() {
        assert_eq!(
            CurrencyNormalizer::convert(Decimal::MAX, "USD", "JPY", &table()),
            None
        );
    }
}

//! Property-based tests for currency normalization.
//!
//! - Identity: converting into the same currency is exact
//! - Round trip: A -> B -> A recovers the amount within rounding tolerance

use proptest::prelude::*;
use rust_decimal::Decimal;

use super::conversion::CurrencyNormalizer;
use super::rates::RateTable;

const CODES: [&str; 12] = [
    "USD", "EUR", "GBP", "JPY", "CAD", "AUD", "INR", "CNY", "CHF", "SEK", "NOK", "DKK",
];

/// Strategy to generate amounts from 0.01 to 100,000.00.
fn money_amount() -> impl Strategy<Value = Decimal> {
    (1i64..=10_000_000i64).prop_map(|cents| Decimal::new(cents, 2))
}

/// Strategy to generate arbitrary-precision amounts, including negatives.
fn any_amount() -> impl Strategy<Value = Decimal> {
    (-1_000_000_000i64..1_000_000_000i64, 0u32..8).prop_map(|(n, scale)| Decimal::new(n, scale))
}

fn currency_code() -> impl Strategy<Value = &'static str> {
    prop::sample::select(CODES.to_vec())
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    /// convert(x, A, A) == x exactly.
    #[test]
    fn prop_same_currency_identity(amount in any_amount(), code in currency_code()) {
        let table = RateTable::fallback();
        prop_assert_eq!(CurrencyNormalizer::convert(amount, code, code, &table), Some(amount));
    }

    /// convert(convert(x, A, B), B, A) ~= x.
    ///
    /// The first leg is off by at most half a cent; scaled back through the
    /// B->A rate that becomes half a cent times rate(A)/rate(B). The second
    /// leg adds at most another half cent.
    #[test]
    fn prop_round_trip_within_rounding_tolerance(
        amount in money_amount(),
        from in currency_code(),
        to in currency_code(),
    ) {
        let table = RateTable::fallback();
        let there = CurrencyNormalizer::convert(amount, from, to, &table).unwrap();
        let back = CurrencyNormalizer::convert(there, to, from, &table).unwrap();

        let rate_from = table.rate(from).unwrap();
        let rate_to = table.rate(to).unwrap();
        let half_cent = Decimal::new(5, 3);
        let tolerance = half_cent + half_cent * rate_from / rate_to + Decimal::new(1, 6);

        prop_assert!(
            (back - amount).abs() <= tolerance,
            "{} {} -> {} {} -> {} {} (tolerance {})",
            amount, from, there, to, back, from, tolerance
        );
    }

    /// Converted amounts of non-negative inputs are never negative.
    #[test]
    fn prop_conversion_preserves_sign(
        amount in money_amount(),
        from in currency_code(),
        to in currency_code(),
    ) {
        let table = RateTable::fallback();
        prop_assert!(CurrencyNormalizer::convert(amount, from, to, &table).unwrap() >= Decimal::ZERO);
    }
}

//! Line-by-line receipt parsing.

use std::str::FromStr;

use chrono::NaiveDate;
use rand::Rng;
use rust_decimal::Decimal;
use tracing::warn;

use crate::receipt::patterns::{
    CATEGORY_KEYWORDS, FALLBACK_MERCHANT, MAX_RECEIPT_AMOUNT, OTHER_CATEGORY, PATTERNS, Patterns,
};
use crate::receipt::simulation::{SIMULATED_CONFIDENCE, simulate};
use crate::receipt::types::{OcrOutput, ReceiptDraft};

/// Highest confidence ever reported for parsed text.
const MAX_CONFIDENCE: u8 = 99;

/// Fallback amount range in cents when no amount is found.
const FALLBACK_AMOUNT_CENTS: std::ops::RangeInclusive<i64> = 1_500..=31_500;

/// Stateless receipt extractor.
pub struct ReceiptExtractor;

impl ReceiptExtractor {
    /// Extracts a candidate expense from OCR output.
    ///
    /// With usable text, each field is parsed from the text and falls back
    /// individually. Without usable text the whole receipt is simulated.
    /// Randomness comes only from `rng`.
    pub fn extract<R: Rng>(output: Option<&OcrOutput>, rng: &mut R, today: NaiveDate) -> ReceiptDraft {
        let Some(output) = output.filter(|o| o.is_usable()) else {
            return simulate(rng, today);
        };
        match PATTERNS.as_ref() {
            Ok(patterns) => Self::parse(patterns, output, rng, today),
            Err(err) => {
                warn!(error = %err, "Receipt patterns unavailable, simulating");
                simulate(rng, today)
            }
        }
    }

    fn parse<R: Rng>(
        patterns: &Patterns,
        output: &OcrOutput,
        rng: &mut R,
        today: NaiveDate,
    ) -> ReceiptDraft {
        let lines: Vec<&str> = output
            .text
            .lines()
            .map(str::trim)
            .filter(|l| !l.is_empty())
            .collect();

        let merchant = Self::merchant(patterns, &lines);
        let amount = Self::amount(patterns, &lines)
            .unwrap_or_else(|| Decimal::new(rng.random_range(FALLBACK_AMOUNT_CENTS), 2));
        let date = Self::date(patterns, &output.text, today).unwrap_or(today);
        let category = Self::category(&output.text);
        let confidence = output.quality.map_or_else(
            || rng.random_range(SIMULATED_CONFIDENCE),
            |q| q.min(MAX_CONFIDENCE),
        );

        ReceiptDraft {
            merchant,
            amount,
            date,
            category: category.to_string(),
            confidence,
            simulated: false,
        }
    }

    /// First qualifying header line, cut to three words.
    fn merchant(patterns: &Patterns, lines: &[&str]) -> String {
        lines
            .iter()
            .take(3)
            .find(|line| {
                let lower = line.to_lowercase();
                line.chars().count() > 3
                    && !patterns.any_date.is_match(line)
                    && !patterns.amounts[2].is_match(line)
                    && !patterns.amounts[3].is_match(line)
                    && !lower.contains("receipt")
                    && !lower.contains("total")
            })
            .map_or_else(
                || FALLBACK_MERCHANT.to_string(),
                |line| line.split_whitespace().take(3).collect::<Vec<_>>().join(" "),
            )
    }

    /// First in-range amount, trying each pattern over every line before
    /// moving to the next pattern.
    fn amount(patterns: &Patterns, lines: &[&str]) -> Option<Decimal> {
        let max = Decimal::from(MAX_RECEIPT_AMOUNT);
        patterns.amounts.iter().find_map(|pattern| {
            lines.iter().find_map(|line| {
                pattern.captures_iter(line).find_map(|caps| {
                    let raw = caps.get(1)?.as_str().replace(',', "");
                    Decimal::from_str(&raw)
                        .ok()
                        .filter(|v| *v > Decimal::ZERO && *v < max)
                })
            })
        })
    }

    /// First real date not after `today`.
    fn date(patterns: &Patterns, text: &str, today: NaiveDate) -> Option<NaiveDate> {
        patterns.dates.iter().find_map(|(pattern, y, m, d)| {
            pattern.captures_iter(text).find_map(|caps| {
                let year = caps.get(*y)?.as_str().parse().ok()?;
                let month = caps.get(*m)?.as_str().parse().ok()?;
                let day = caps.get(*d)?.as_str().parse().ok()?;
                NaiveDate::from_ymd_opt(year, month, day).filter(|date| *date <= today)
            })
        })
    }

    fn category(text: &str) -> &'static str {
        let lower = text.to_lowercase();
        CATEGORY_KEYWORDS
            .iter()
            .find(|(_, keywords)| keywords.iter().any(|k| lower.contains(k)))
            .map_or(OTHER_CATEGORY, |(category, _)| *category)
    }
}

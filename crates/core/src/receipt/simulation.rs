//! Randomized receipts used when OCR produced nothing usable.

use chrono::NaiveDate;
use rand::Rng;
use rust_decimal::Decimal;

use crate::receipt::types::ReceiptDraft;

/// Per-category amount range in cents (inclusive) and typical merchants.
const PROFILES: [(&str, i64, i64, &[&str]); 7] = [
    (
        "Meals & Entertainment",
        1_200,
        15_000,
        &["Olive Garden", "Starbucks", "Chipotle", "The Capital Grille"],
    ),
    (
        "Travel & Transportation",
        2_500,
        80_000,
        &["Uber", "Delta Air Lines", "Marriott", "Hertz"],
    ),
    (
        "Office Supplies",
        1_000,
        25_000,
        &["Staples", "Office Depot", "Amazon Business"],
    ),
    (
        "Software & Subscriptions",
        999,
        50_000,
        &["Adobe", "GitHub", "Atlassian", "Slack"],
    ),
    (
        "Training & Education",
        5_000,
        150_000,
        &["Udemy", "Coursera", "O'Reilly Media"],
    ),
    (
        "Communication",
        2_000,
        20_000,
        &["Verizon", "AT&T", "Comcast Business"],
    ),
    (
        "Marketing",
        5_000,
        200_000,
        &["Vistaprint", "Google Ads", "Meta Ads"],
    ),
];

/// Confidence range for simulated and signal-less receipts.
pub const SIMULATED_CONFIDENCE: std::ops::RangeInclusive<u8> = 85..=99;

/// Produces a plausible receipt dated `today`.
pub fn simulate<R: Rng>(rng: &mut R, today: NaiveDate) -> ReceiptDraft {
    let (category, min_cents, max_cents, merchants) = PROFILES[rng.random_range(0..PROFILES.len())];
    let merchant = merchants[rng.random_range(0..merchants.len())];

    ReceiptDraft {
        merchant: merchant.to_string(),
        amount: Decimal::new(rng.random_range(min_cents..=max_cents), 2),
        date: today,
        category: category.to_string(),
        confidence: rng.random_range(SIMULATED_CONFIDENCE),
        simulated: true,
    }
}

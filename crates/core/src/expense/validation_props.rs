//! Property-based tests for expense validation.

use chrono::{Days, NaiveDate};
use expensa_shared::types::AccountId;
use proptest::prelude::*;
use rust_decimal::Decimal;

use crate::directory::Category;
use crate::expense::types::ExpenseDraft;
use crate::expense::validation::{ExpenseValidator, Violation};

fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 3, 1).unwrap()
}

fn draft(amount: String, description: String, days_ago: u64) -> ExpenseDraft {
    ExpenseDraft {
        amount: Some(amount),
        currency_code: "EUR".to_string(),
        category: Some("Meals & Entertainment".to_string()),
        description: Some(description),
        expense_date: Some(
            (today() - Days::new(days_ago))
                .format("%Y-%m-%d")
                .to_string(),
        ),
        ocr_confidence: None,
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    /// Any in-range amount, long description and recent date is accepted.
    #[test]
    fn prop_in_range_drafts_are_valid(
        cents in 1i64..=10_000_000i64,
        description in "[a-zA-Z ]{10,40}",
        days_ago in 0u64..=365,
    ) {
        prop_assume!(description.trim().chars().count() >= 10);
        let categories = Category::defaults_for(AccountId::new());
        let d = draft(Decimal::new(cents, 2).to_string(), description, days_ago);

        let validated = ExpenseValidator::validate(&d, &categories, today());
        prop_assert!(validated.is_ok(), "{:?}", validated);
        prop_assert_eq!(validated.unwrap().amount, Decimal::new(cents, 2));
    }

    /// Amounts above the ceiling always produce exactly one amount violation.
    #[test]
    fn prop_large_amounts_rejected(cents in 10_000_001i64..1_000_000_000i64) {
        let categories = Category::defaults_for(AccountId::new());
        let d = draft(Decimal::new(cents, 2).to_string(), "Team dinner downtown".to_string(), 1);

        let violations = ExpenseValidator::check(&d, &categories, today());
        prop_assert_eq!(violations.len(), 1);
        let is_too_large = matches!(violations[0], Violation::AmountTooLarge { .. });
        prop_assert!(is_too_large);
    }

    /// Dates older than the window are always rejected.
    #[test]
    fn prop_old_dates_rejected(days_ago in 366u64..5000) {
        let categories = Category::defaults_for(AccountId::new());
        let d = draft("42.00".to_string(), "Team dinner downtown".to_string(), days_ago);

        let codes: Vec<_> = ExpenseValidator::check(&d, &categories, today())
            .iter()
            .map(Violation::code)
            .collect();
        prop_assert_eq!(codes, vec!["DATE_TOO_OLD"]);
    }
}

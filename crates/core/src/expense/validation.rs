//! Business rule validation for expense submission.
//!
//! Every rule is evaluated independently so callers can report all
//! violations in one round trip.

use std::str::FromStr;

use chrono::{Days, NaiveDate};
use rust_decimal::Decimal;
use thiserror::Error;

use crate::currency::rates::normalize_code;
use crate::directory::Category;
use crate::expense::types::{ExpenseDraft, ValidatedExpense};

/// A single failed rule, with a message fit for display.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum Violation {
    /// No amount given.
    #[error("Amount is required")]
    AmountMissing,

    /// Amount is not a decimal number.
    #[error("Amount must be a number, got '{0}'")]
    AmountNotNumeric(String),

    /// Amount is zero or negative.
    #[error("Amount must be greater than zero")]
    AmountNotPositive,

    /// Amount cannot be expressed in the base currency with the current rates.
    #[error("Amount in {0} cannot be converted to the base currency")]
    AmountNotConvertible(String),

    /// Amount is above the per-expense ceiling.
    #[error("Amount cannot exceed {max}")]
    AmountTooLarge {
        /// The ceiling.
        max: Decimal,
    },

    /// No date given.
    #[error("Expense date is required")]
    DateMissing,

    /// Date is not `YYYY-MM-DD`.
    #[error("Expense date must be a valid date (YYYY-MM-DD), got '{0}'")]
    DateUnparseable(String),

    /// Date is after today.
    #[error("Expense date cannot be in the future")]
    DateInFuture,

    /// Date is more than a year before today.
    #[error("Expense date cannot be more than {max_age_days} days ago")]
    DateTooOld {
        /// The age limit in calendar days.
        max_age_days: u64,
    },

    /// No description given.
    #[error("Description is required")]
    DescriptionMissing,

    /// Description is too short once trimmed.
    #[error("Description must be at least {min} characters")]
    DescriptionTooShort {
        /// Minimum trimmed length.
        min: usize,
    },

    /// No category selected.
    #[error("Category is required")]
    CategoryMissing,

    /// Category is not defined for the account.
    #[error("Unknown category: {0}")]
    UnknownCategory(String),

    /// No currency code given.
    #[error("Currency code is required")]
    CurrencyMissing,

    /// Currency code is not three letters.
    #[error("Currency code must be three letters, got '{0}'")]
    InvalidCurrencyCode(String),

    /// Confidence is outside 0-100.
    #[error("OCR confidence must be between 0 and 100, got {0}")]
    ConfidenceOutOfRange(i64),

    /// A required name is blank.
    #[error("{0} is required")]
    NameMissing(&'static str),

    /// Email address is malformed.
    #[error("Invalid email address: {0}")]
    InvalidEmail(String),
}

impl Violation {
    /// The input field the violation refers to.
    #[must_use]
    pub fn field(&self) -> &'static str {
        match self {
            Self::AmountMissing
            | Self::AmountNotNumeric(_)
            | Self::AmountNotPositive
            | Self::AmountNotConvertible(_)
            | Self::AmountTooLarge { .. } => "amount",
            Self::DateMissing
            | Self::DateUnparseable(_)
            | Self::DateInFuture
            | Self::DateTooOld { .. } => "expense_date",
            Self::DescriptionMissing | Self::DescriptionTooShort { .. } => "description",
            Self::CategoryMissing | Self::UnknownCategory(_) => "category",
            Self::CurrencyMissing | Self::InvalidCurrencyCode(_) => "currency_code",
            Self::ConfidenceOutOfRange(_) => "ocr_confidence",
            Self::NameMissing(field) => *field,
            Self::InvalidEmail(_) => "email",
        }
    }

    /// Stable machine-readable code.
    #[must_use]
    pub fn code(&self) -> &'static str {
        match self {
            Self::AmountMissing => "AMOUNT_REQUIRED",
            Self::AmountNotNumeric(_) => "AMOUNT_NOT_NUMERIC",
            Self::AmountNotPositive => "AMOUNT_NOT_POSITIVE",
            Self::AmountNotConvertible(_) => "AMOUNT_NOT_CONVERTIBLE",
            Self::AmountTooLarge { .. } => "AMOUNT_TOO_LARGE",
            Self::DateMissing => "DATE_REQUIRED",
            Self::DateUnparseable(_) => "DATE_UNPARSEABLE",
            Self::DateInFuture => "DATE_IN_FUTURE",
            Self::DateTooOld { .. } => "DATE_TOO_OLD",
            Self::DescriptionMissing => "DESCRIPTION_REQUIRED",
            Self::DescriptionTooShort { .. } => "DESCRIPTION_TOO_SHORT",
            Self::CategoryMissing => "CATEGORY_REQUIRED",
            Self::UnknownCategory(_) => "UNKNOWN_CATEGORY",
            Self::CurrencyMissing => "CURRENCY_REQUIRED",
            Self::InvalidCurrencyCode(_) => "INVALID_CURRENCY_CODE",
            Self::ConfidenceOutOfRange(_) => "CONFIDENCE_OUT_OF_RANGE",
            Self::NameMissing(_) => "NAME_REQUIRED",
            Self::InvalidEmail(_) => "INVALID_EMAIL",
        }
    }
}

/// Keeps the value of a parse, or records its violation.
fn collect<T>(violations: &mut Vec<Violation>, result: Result<T, Violation>) -> Option<T> {
    match result {
        Ok(value) => Some(value),
        Err(violation) => {
            violations.push(violation);
            None
        }
    }
}

/// Stateless validator for expense drafts.
pub struct ExpenseValidator;

impl ExpenseValidator {
    /// Largest accepted original amount.
    pub const MAX_AMOUNT: Decimal = Decimal::from_parts(100_000, 0, 0, false, 0);

    /// Minimum trimmed description length, in characters.
    pub const MIN_DESCRIPTION_LEN: usize = 10;

    /// Oldest accepted expense date, in calendar days before today.
    pub const MAX_AGE_DAYS: u64 = 365;

    /// Checks every rule and returns all violations. Empty means valid.
    #[must_use]
    pub fn check(draft: &ExpenseDraft, categories: &[Category], today: NaiveDate) -> Vec<Violation> {
        Self::validate(draft, categories, today)
            .err()
            .unwrap_or_default()
    }

    /// Validates a draft and returns the parsed values.
    ///
    /// # Errors
    ///
    /// Returns every violation found if any rule fails.
    pub fn validate(
        draft: &ExpenseDraft,
        categories: &[Category],
        today: NaiveDate,
    ) -> Result<ValidatedExpense, Vec<Violation>> {
        let mut violations = Vec::new();
        let v = &mut violations;

        let amount = collect(v, Self::parse_amount(draft.amount.as_deref()));
        let expense_date = collect(v, Self::parse_date(draft.expense_date.as_deref(), today));
        let description = collect(v, Self::parse_description(draft.description.as_deref()));
        let category = collect(v, Self::parse_category(draft.category.as_deref(), categories));
        let currency_code = collect(v, Self::parse_currency(&draft.currency_code));

        let ocr_confidence = draft
            .ocr_confidence
            .and_then(|raw| collect(v, Self::parse_confidence(raw)));

        match (amount, expense_date, description, category, currency_code) {
            (Some(amount), Some(expense_date), Some(description), Some(category), Some(currency_code))
                if violations.is_empty() =>
            {
                Ok(ValidatedExpense {
                    amount,
                    currency_code,
                    category,
                    description,
                    expense_date,
                    ocr_confidence,
                })
            }
            _ => Err(violations),
        }
    }

    fn parse_amount(raw: Option<&str>) -> Result<Decimal, Violation> {
        let raw = raw.map(str::trim).filter(|s| !s.is_empty());
        let Some(raw) = raw else {
            return Err(Violation::AmountMissing);
        };
        let amount =
            Decimal::from_str(raw).map_err(|_| Violation::AmountNotNumeric(raw.to_string()))?;
        if amount <= Decimal::ZERO {
            return Err(Violation::AmountNotPositive);
        }
        if amount > Self::MAX_AMOUNT {
            return Err(Violation::AmountTooLarge {
                max: Self::MAX_AMOUNT,
            });
        }
        Ok(amount)
    }

    fn parse_date(raw: Option<&str>, today: NaiveDate) -> Result<NaiveDate, Violation> {
        let raw = raw.map(str::trim).filter(|s| !s.is_empty());
        let Some(raw) = raw else {
            return Err(Violation::DateMissing);
        };
        let date = NaiveDate::parse_from_str(raw, "%Y-%m-%d")
            .map_err(|_| Violation::DateUnparseable(raw.to_string()))?;
        if date > today {
            return Err(Violation::DateInFuture);
        }
        let earliest = today
            .checked_sub_days(Days::new(Self::MAX_AGE_DAYS))
            .unwrap_or(NaiveDate::MIN);
        if date < earliest {
            return Err(Violation::DateTooOld {
                max_age_days: Self::MAX_AGE_DAYS,
            });
        }
        Ok(date)
    }

    fn parse_description(raw: Option<&str>) -> Result<String, Violation> {
        let trimmed = raw.map(str::trim).unwrap_or_default();
        if trimmed.is_empty() {
            return Err(Violation::DescriptionMissing);
        }
        if trimmed.chars().count() < Self::MIN_DESCRIPTION_LEN {
            return Err(Violation::DescriptionTooShort {
                min: Self::MIN_DESCRIPTION_LEN,
            });
        }
        Ok(trimmed.to_string())
    }

    fn parse_category(raw: Option<&str>, categories: &[Category]) -> Result<String, Violation> {
        let raw = raw.map(str::trim).filter(|s| !s.is_empty());
        let Some(name) = raw else {
            return Err(Violation::CategoryMissing);
        };
        if categories.iter().any(|c| c.name == name) {
            Ok(name.to_string())
        } else {
            Err(Violation::UnknownCategory(name.to_string()))
        }
    }

    fn parse_confidence(raw: i64) -> Result<u8, Violation> {
        u8::try_from(raw)
            .ok()
            .filter(|c| *c <= 100)
            .ok_or(Violation::ConfidenceOutOfRange(raw))
    }

    fn parse_currency(raw: &str) -> Result<String, Violation> {
        let code = normalize_code(raw);
        if code.is_empty() {
            return Err(Violation::CurrencyMissing);
        }
        if code.len() == 3 && code.chars().all(|c| c.is_ascii_alphabetic()) {
            Ok(code)
        } else {
            Err(Violation::InvalidCurrencyCode(raw.to_string()))
        }
    }

    /// Checks a display name for signup and user creation.
    pub(crate) fn check_name(field: &'static str, value: &str) -> Option<Violation> {
        value
            .trim()
            .is_empty()
            .then_some(Violation::NameMissing(field))
    }

    /// Checks an email address has a local part and a dotted domain.
    pub(crate) fn check_email(value: &str) -> Option<Violation> {
        let value = value.trim();
        let valid = match value.split_once('@') {
            Some((local, domain)) => {
                !local.is_empty()
                    && !domain.contains('@')
                    && domain
                        .split_once('.')
                        .is_some_and(|(host, tld)| !host.is_empty() && !tld.is_empty())
            }
            None => false,
        };
        (!valid).then(|| Violation::InvalidEmail(value.to_string()))
    }

    /// Checks a currency code for signup.
    pub(crate) fn check_currency(value: &str) -> Option<Violation> {
        Self::parse_currency(value).err()
    }
}

//! Receipt data types.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::expense::ExpenseDraft;

/// Raw output of an OCR provider.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OcrOutput {
    /// Recognized text, line breaks preserved.
    pub text: String,
    /// Provider-reported quality signal, 0-100, if any.
    pub quality: Option<u8>,
}

impl OcrOutput {
    /// Creates output with text only.
    #[must_use]
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            quality: None,
        }
    }

    /// Returns true if there is any non-whitespace text.
    #[must_use]
    pub fn is_usable(&self) -> bool {
        !self.text.trim().is_empty()
    }
}

/// A candidate expense extracted from a receipt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReceiptDraft {
    /// Merchant name, at most three words.
    pub merchant: String,
    /// Total amount.
    pub amount: Decimal,
    /// Receipt date, never after the extraction date.
    pub date: NaiveDate,
    /// Category name.
    pub category: String,
    /// Confidence, 0-99.
    pub confidence: u8,
    /// True when produced by simulation rather than parsed text.
    pub simulated: bool,
}

impl ReceiptDraft {
    /// Pre-fills an expense draft in `currency_code`.
    #[must_use]
    pub fn to_expense_draft(&self, currency_code: &str) -> ExpenseDraft {
        ExpenseDraft {
            amount: Some(self.amount.to_string()),
            currency_code: currency_code.to_string(),
            category: Some(self.category.clone()),
            description: Some(format!("Receipt from {}", self.merchant)),
            expense_date: Some(self.date.format("%Y-%m-%d").to_string()),
            ocr_confidence: Some(i64::from(self.confidence)),
        }
    }
}

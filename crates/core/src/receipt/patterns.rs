//! Compiled receipt patterns and the category keyword table.

use std::sync::LazyLock;

use regex::Regex;

/// Largest amount accepted from receipt text (exclusive).
pub const MAX_RECEIPT_AMOUNT: i64 = 50_000;

/// Category fallback when no keyword matches.
pub const OTHER_CATEGORY: &str = "Other";

/// Merchant fallback when no header line qualifies.
pub const FALLBACK_MERCHANT: &str = "Business Expense";

/// Ordered category keyword table. The first category with a keyword
/// contained in the lowercased text wins.
pub const CATEGORY_KEYWORDS: [(&str, &[&str]); 7] = [
    (
        "Meals & Entertainment",
        &[
            "restaurant", "cafe", "coffee", "starbucks", "pizza", "burger", "lunch", "dinner",
            "breakfast", "bistro", "grill", "diner", "catering", "bakery",
        ],
    ),
    (
        "Travel & Transportation",
        &[
            "uber", "lyft", "taxi", "airline", "airways", "flight", "hotel", "airbnb", "parking",
            "gasoline", "gas station", "train", "railway", "car rental",
        ],
    ),
    (
        "Office Supplies",
        &[
            "staples", "office depot", "officemax", "paper", "toner", "stationery", "printer",
            "notebook", "stapler",
        ],
    ),
    (
        "Software & Subscriptions",
        &[
            "software", "subscription", "license", "saas", "adobe", "microsoft", "github",
            "slack", "zoom", "dropbox", "atlassian",
        ],
    ),
    (
        "Training & Education",
        &[
            "training", "course", "seminar", "workshop", "conference", "udemy", "coursera",
            "tuition", "certification",
        ],
    ),
    (
        "Communication",
        &[
            "verizon", "at&t", "t-mobile", "comcast", "internet", "telephone", "mobile plan",
            "telecom", "wireless",
        ],
    ),
    (
        "Marketing",
        &[
            "advertising", "marketing", "promotion", "google ads", "facebook ads", "print shop",
            "banner", "flyer", "sponsorship",
        ],
    ),
];

const NUMBER: &str = r"(\d+(?:,\d{3})*(?:\.\d{1,2})?)";

/// Amount and date patterns, compiled once.
#[derive(Debug)]
pub struct Patterns {
    /// Amount patterns in priority order.
    pub amounts: [Regex; 5],
    /// Date patterns as (regex, year group, month group, day group).
    pub dates: [(Regex, usize, usize, usize); 4],
    /// Any of the date shapes, for merchant filtering.
    pub any_date: Regex,
}

impl Patterns {
    fn compile() -> Result<Self, regex::Error> {
        let labelled = |label: &str| Regex::new(&format!(r"(?i)\b{label}\s*:?\s*[$€£¥]?\s*{NUMBER}"));
        Ok(Self {
            amounts: [
                labelled("total")?,
                labelled("amount")?,
                Regex::new(&format!(r"[$€£¥]\s*{NUMBER}"))?,
                Regex::new(r"(?:^|[^\d.,])(\d+(?:,\d{3})*\.\d{2})(?:$|[^\d.])")?,
                labelled("subtotal")?,
            ],
            dates: [
                (Regex::new(r"\b(\d{1,2})/(\d{1,2})/(\d{4})\b")?, 3, 1, 2),
                (Regex::new(r"\b(\d{4})-(\d{1,2})-(\d{1,2})\b")?, 1, 2, 3),
                (Regex::new(r"\b(\d{1,2})-(\d{1,2})-(\d{4})\b")?, 3, 1, 2),
                (Regex::new(r"\b(\d{1,2})\.(\d{1,2})\.(\d{4})\b")?, 3, 1, 2),
            ],
            any_date: Regex::new(
                r"\b\d{1,2}[/.-]\d{1,2}[/.-]\d{4}\b|\b\d{4}-\d{1,2}-\d{1,2}\b",
            )?,
        })
    }
}

/// The compiled patterns, or the compile error if they are malformed.
pub static PATTERNS: LazyLock<Result<Patterns, regex::Error>> = LazyLock::new(Patterns::compile);

//! Directory data types.

use chrono::{DateTime, Utc};
use expensa_shared::types::{AccountId, CategoryId, UserId};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::workflow::UserRole;

/// Category names and monthly budgets created for every new account.
///
/// The order matches the receipt keyword table, with "Other" last.
pub const DEFAULT_CATEGORIES: [(&str, i64); 8] = [
    ("Meals & Entertainment", 2000),
    ("Travel & Transportation", 5000),
    ("Office Supplies", 1000),
    ("Software & Subscriptions", 3000),
    ("Training & Education", 2500),
    ("Communication", 800),
    ("Marketing", 4000),
    ("Other", 1000),
];

/// A company account. Owns one ledger and one user set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    /// Account ID.
    pub id: AccountId,
    /// Company display name.
    pub company_name: String,
    /// Currency all totals are reported in. Set once at signup.
    pub base_currency_code: String,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
}

/// A user belonging to exactly one account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// User ID.
    pub id: UserId,
    /// Owning account.
    pub account_id: AccountId,
    /// Display name.
    pub name: String,
    /// Login email, unique across the store.
    pub email: String,
    /// Role, fixed for the lifetime of a session.
    pub role: UserRole,
}

/// An expense category with its monthly budget.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    /// Category ID.
    pub id: CategoryId,
    /// Owning account.
    pub account_id: AccountId,
    /// Name, unique within the account.
    pub name: String,
    /// Monthly budget in the account's base currency.
    pub monthly_budget: Decimal,
    /// Sum of base-currency amounts of every expense filed here.
    pub spent_to_date: Decimal,
}

impl Category {
    /// Creates an empty category.
    #[must_use]
    pub fn new(account_id: AccountId, name: impl Into<String>, monthly_budget: Decimal) -> Self {
        Self {
            id: CategoryId::new(),
            account_id,
            name: name.into(),
            monthly_budget,
            spent_to_date: Decimal::ZERO,
        }
    }

    /// Builds the default category set for a new account.
    #[must_use]
    pub fn defaults_for(account_id: AccountId) -> Vec<Self> {
        DEFAULT_CATEGORIES
            .iter()
            .map(|(name, budget)| Self::new(account_id, *name, Decimal::new(*budget, 0)))
            .collect()
    }

    /// Budget left this month. Negative when overspent.
    #[must_use]
    pub fn remaining_budget(&self) -> Decimal {
        self.monthly_budget - self.spent_to_date
    }

    /// Returns true when spending has exceeded the budget.
    #[must_use]
    pub fn is_over_budget(&self) -> bool {
        self.spent_to_date > self.monthly_budget
    }
}

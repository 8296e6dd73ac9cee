//! Read-projection types for the ledger.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::expense::Expense;
use crate::workflow::ExpenseStatus;

/// Predicate over status, category and expense date. Unset fields match
/// everything; date bounds are inclusive.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExpenseFilter {
    /// Only expenses in this status.
    pub status: Option<ExpenseStatus>,
    /// Only expenses in this category.
    pub category: Option<String>,
    /// Earliest expense date.
    pub date_from: Option<NaiveDate>,
    /// Latest expense date.
    pub date_to: Option<NaiveDate>,
}

impl ExpenseFilter {
    /// Returns true if `expense` satisfies every set field.
    #[must_use]
    pub fn matches(&self, expense: &Expense) -> bool {
        self.status.is_none_or(|s| expense.status == s)
            && self
                .category
                .as_deref()
                .is_none_or(|c| expense.category == c)
            && self.date_from.is_none_or(|d| expense.expense_date >= d)
            && self.date_to.is_none_or(|d| expense.expense_date <= d)
    }
}

/// Count and base-currency total for one status.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatusTotal {
    /// The status.
    pub status: ExpenseStatus,
    /// Number of expenses.
    pub count: usize,
    /// Sum of base-currency amounts.
    pub total: Decimal,
}

/// Count and base-currency total for one category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategoryTotal {
    /// Category name.
    pub category: String,
    /// Number of expenses.
    pub count: usize,
    /// Sum of base-currency amounts.
    pub total: Decimal,
}

/// Aggregates over the expenses visible to a session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExpenseSummary {
    /// Currency all totals are expressed in.
    pub base_currency_code: String,
    /// Number of expenses.
    pub count: usize,
    /// Sum of base-currency amounts.
    pub total: Decimal,
    /// One entry per status, always all three.
    pub by_status: Vec<StatusTotal>,
    /// One entry per category with at least one expense, by name.
    pub by_category: Vec<CategoryTotal>,
}

impl ExpenseSummary {
    /// Aggregates `expenses`.
    #[must_use]
    pub fn from_expenses(base_currency_code: &str, expenses: &[Expense]) -> Self {
        let by_status = [
            ExpenseStatus::PendingApproval,
            ExpenseStatus::Approved,
            ExpenseStatus::Rejected,
        ]
        .into_iter()
        .map(|status| {
            let (count, total) = tally(expenses.iter().filter(|e| e.status == status));
            StatusTotal {
                status,
                count,
                total,
            }
        })
        .collect();

        let mut categories: BTreeMap<&str, (usize, Decimal)> = BTreeMap::new();
        for expense in expenses {
            let slot = categories
                .entry(expense.category.as_str())
                .or_insert((0, Decimal::ZERO));
            slot.0 += 1;
            slot.1 += expense.base_currency_amount;
        }
        let by_category = categories
            .into_iter()
            .map(|(category, (count, total))| CategoryTotal {
                category: category.to_string(),
                count,
                total,
            })
            .collect();

        let (count, total) = tally(expenses.iter());
        Self {
            base_currency_code: base_currency_code.to_string(),
            count,
            total,
            by_status,
            by_category,
        }
    }
}

fn tally<'a>(expenses: impl Iterator<Item = &'a Expense>) -> (usize, Decimal) {
    expenses.fold((0, Decimal::ZERO), |(count, total), e| {
        (count + 1, total + e.base_currency_amount)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::expense::test_support::pending_expense;
    use expensa_shared::types::{AccountId, UserId};
    use rust_decimal_macros::dec;

    #[test]
    fn test_filter_matches() {
        let mut expense = pending_expense(AccountId::new(), UserId::new(), dec!(42));
        expense.expense_date = NaiveDate::from_ymd_opt(2024, 5, 2).unwrap();

        assert!(ExpenseFilter::default().matches(&expense));
        assert!(ExpenseFilter {
            status: Some(ExpenseStatus::PendingApproval),
            category: Some("Office Supplies".to_string()),
            date_from: NaiveDate::from_ymd_opt(2024, 5, 2),
            date_to: NaiveDate::from_ymd_opt(2024, 5, 2),
        }
        .matches(&expense));
        assert!(!ExpenseFilter {
            status: Some(ExpenseStatus::Approved),
            ..Default::default()
        }
        .matches(&expense));
        assert!(!ExpenseFilter {
            date_from: NaiveDate::from_ymd_opt(2024, 5, 3),
            ..Default::default()
        }
        .matches(&expense));
    }

    #[test]
    fn test_summary_totals() {
        let account = AccountId::new();
        let mut approved = pending_expense(account, UserId::new(), dec!(100.25));
        approved.status = ExpenseStatus::Approved;
        approved.category = "Marketing".to_string();
        let pending = pending_expense(account, UserId::new(), dec!(50));
        let other = pending_expense(account, UserId::new(), dec!(9.75));

        let summary = ExpenseSummary::from_expenses("USD", &[approved, pending, other]);

        assert_eq!(summary.count, 3);
        assert_eq!(summary.total, dec!(160.00));
        assert_eq!(summary.by_status.len(), 3);
        assert_eq!(summary.by_status[0].count, 2);
        assert_eq!(summary.by_status[0].total, dec!(59.75));
        assert_eq!(summary.by_status[1].total, dec!(100.25));
        assert_eq!(summary.by_status[2].count, 0);
        assert_eq!(
            summary
                .by_category
                .iter()
                .map(|c| c.category.as_str())
                .collect::<Vec<_>>(),
            vec!["Marketing", "Office Supplies"]
        );
    }
}

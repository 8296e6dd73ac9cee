//! Demo fixture for the in-memory store.
//!
//! Seeds one USD account with a user per role and a handful of expenses in
//! every status, so the API is usable without a database.

use chrono::{DateTime, Days, NaiveDate, Utc};
use expensa_shared::types::{AccountId, UserId};

use crate::currency::{CurrencyNormalizer, RateTable};
use crate::directory::{Account, Category, User};
use crate::expense::{Expense, ExpenseDraft, ExpenseValidator};
use crate::ledger::memory::InMemoryStore;
use crate::ledger::store::StoreResult;
use crate::workflow::{UserRole, WorkflowService};

/// Users seeded into the demo account: name, email, role.
pub const DEMO_USERS: [(&str, &str, UserRole); 5] = [
    ("Sarah Chen", "sarah.chen@acme.example", UserRole::Employee),
    ("Michael Rodriguez", "michael.rodriguez@acme.example", UserRole::Manager),
    ("Emily Johnson", "emily.johnson@acme.example", UserRole::Finance),
    ("David Kim", "david.kim@acme.example", UserRole::Director),
    ("Admin User", "admin@acme.example", UserRole::Admin),
];

enum Outcome {
    Pending,
    Approved(usize, Option<&'static str>),
    Rejected(usize, &'static str),
}

/// owner index, amount, currency, category, description, days ago, outcome
const DEMO_EXPENSES: [(usize, &str, &str, &str, &str, u64, Outcome); 6] = [
    (
        2,
        "310.00",
        "USD",
        "Office Supplies",
        "Ergonomic chair for home office",
        40,
        Outcome::Rejected(4, "Please use the equipment request process"),
    ),
    (
        0,
        "6200.00",
        "GBP",
        "Travel & Transportation",
        "Flights and hotel for London customer summit",
        30,
        Outcome::Pending,
    ),
    (
        0,
        "89.99",
        "USD",
        "Software & Subscriptions",
        "Annual subscription for diagramming tool",
        20,
        Outcome::Approved(1, Some("Approved for the whole team")),
    ),
    (
        1,
        "2400.00",
        "USD",
        "Training & Education",
        "Cloud certification bootcamp registration",
        12,
        Outcome::Pending,
    ),
    (
        0,
        "45.80",
        "EUR",
        "Meals & Entertainment",
        "Team lunch with new hires at the bistro",
        5,
        Outcome::Approved(1, None),
    ),
    (
        0,
        "125.50",
        "USD",
        "Travel & Transportation",
        "Uber to client meeting for Q4 planning",
        2,
        Outcome::Pending,
    ),
];

impl InMemoryStore {
    /// Builds a store seeded with the demo account "Acme Corporation".
    ///
    /// # Errors
    ///
    /// Returns an error only if the fixture collides with itself.
    pub fn demo() -> StoreResult<Self> {
        let store = Self::new();
        seed(&store, Utc::now())?;
        Ok(store)
    }
}

fn seed(store: &InMemoryStore, now: DateTime<Utc>) -> StoreResult<()> {
    let account = Account {
        id: AccountId::new(),
        company_name: "Acme Corporation".to_string(),
        base_currency_code: "USD".to_string(),
        created_at: now,
    };
    let categories = Category::defaults_for(account.id);
    let users: Vec<User> = DEMO_USERS
        .iter()
        .map(|(name, email, role)| User {
            id: UserId::new(),
            account_id: account.id,
            name: (*name).to_string(),
            email: (*email).to_string(),
            role: *role,
        })
        .collect();

    let today = now.date_naive();
    let rates = RateTable::fallback();
    let expenses: Vec<Expense> = DEMO_EXPENSES
        .iter()
        .filter_map(|entry| demo_expense(entry, &users, &account, &categories, &rates, today, now))
        .collect();

    store.put_account(account, categories, users)?;
    for expense in expenses {
        store.put_expense(expense)?;
    }
    Ok(())
}

fn demo_expense(
    (owner, amount, currency, category, description, days_ago, outcome): &(
        usize,
        &str,
        &str,
        &str,
        &str,
        u64,
        Outcome,
    ),
    users: &[User],
    account: &Account,
    categories: &[Category],
    rates: &RateTable,
    today: NaiveDate,
    now: DateTime<Utc>,
) -> Option<Expense> {
    let owner = users.get(*owner)?;
    let date = today.checked_sub_days(Days::new(*days_ago))?;
    let draft = ExpenseDraft {
        amount: Some((*amount).to_string()),
        currency_code: (*currency).to_string(),
        category: Some((*category).to_string()),
        description: Some((*description).to_string()),
        expense_date: Some(date.format("%Y-%m-%d").to_string()),
        ocr_confidence: None,
    };
    let input = ExpenseValidator::validate(&draft, categories, today).ok()?;
    let base = CurrencyNormalizer::convert(
        input.amount,
        &input.currency_code,
        &account.base_currency_code,
        rates,
    )?;
    let mut expense = Expense::pending(owner, input, base, &account.base_currency_code, now);

    let action = match outcome {
        Outcome::Pending => None,
        Outcome::Approved(actor, comments) => Some(WorkflowService::approve(
            expense.status,
            users.get(*actor)?.id,
            comments.map(str::to_string),
        )),
        Outcome::Rejected(actor, reason) => Some(WorkflowService::reject(
            expense.status,
            users.get(*actor)?.id,
            (*reason).to_string(),
        )),
    };
    if let Some(action) = action {
        expense.apply(&action.ok()?);
    }
    Some(expense)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ledger::store::ExpenseStore;
    use crate::workflow::ExpenseStatus;
    use rust_decimal_macros::dec;

    #[tokio::test]
    async fn test_demo_fixture_is_complete() {
        let store = InMemoryStore::demo().unwrap();
        let accounts = store.accounts();
        assert_eq!(accounts.len(), 1);
        let account = &accounts[0];
        assert_eq!(account.company_name, "Acme Corporation");

        let users = store.list_users(account.id).await.unwrap();
        assert_eq!(users.len(), DEMO_USERS.len());

        let expenses = store.list_expenses(account.id).await.unwrap();
        assert_eq!(expenses.len(), DEMO_EXPENSES.len());
        assert_eq!(expenses[0].description, "Uber to client meeting for Q4 planning");
        assert_eq!(expenses[0].base_currency_amount, dec!(125.50));

        let count = |status| expenses.iter().filter(|e| e.status == status).count();
        assert_eq!(count(ExpenseStatus::PendingApproval), 3);
        assert_eq!(count(ExpenseStatus::Approved), 2);
        assert_eq!(count(ExpenseStatus::Rejected), 1);
    }

    #[tokio::test]
    async fn test_demo_foreign_currency_is_normalized() {
        let store = InMemoryStore::demo().unwrap();
        let account = store.accounts().remove(0);
        let expenses = store.list_expenses(account.id).await.unwrap();

        let summit = expenses
            .iter()
            .find(|e| e.original_currency_code == "GBP")
            .unwrap();
        // 6200 / 0.79 = 7848.101..., rounded once.
        assert_eq!(summit.base_currency_amount, dec!(7848.10));
        assert_eq!(summit.approval_chain.len(), 3);
    }
}

//! In-memory expense store.
//!
//! Each account owns a [`Book`]: its categories, its expenses keyed by id
//! and the insertion order of those ids. Books live in a sharded map, so a
//! write to one account never blocks another.

use std::collections::HashMap;

use async_trait::async_trait;
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use expensa_shared::types::{AccountId, ExpenseId, UserId};

use crate::directory::{Account, Category, User};
use crate::expense::Expense;
use crate::ledger::store::{ExpenseStore, StoreError, StoreResult, TransitionOutcome};
use crate::workflow::{ExpenseStatus, WorkflowAction};

/// Everything one account owns.
#[derive(Debug)]
struct Book {
    account: Account,
    categories: Vec<Category>,
    expenses: HashMap<ExpenseId, Expense>,
    order: Vec<ExpenseId>,
}

impl Book {
    fn new(account: Account, categories: Vec<Category>) -> Self {
        Self {
            account,
            categories,
            expenses: HashMap::new(),
            order: Vec::new(),
        }
    }

    fn insert(&mut self, expense: Expense) {
        if let Some(category) = self
            .categories
            .iter_mut()
            .find(|c| c.name == expense.category)
        {
            category.spent_to_date += expense.base_currency_amount;
        }
        self.order.push(expense.id);
        self.expenses.insert(expense.id, expense);
    }
}

/// Store that keeps everything in process memory.
#[derive(Debug, Default)]
pub struct InMemoryStore {
    books: DashMap<AccountId, Book>,
    users: DashMap<UserId, User>,
    emails: DashMap<String, UserId>,
}

impl InMemoryStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// All accounts in the store.
    #[must_use]
    pub fn accounts(&self) -> Vec<Account> {
        let mut accounts: Vec<_> = self.books.iter().map(|b| b.account.clone()).collect();
        accounts.sort_by_key(|a| a.id);
        accounts
    }

    fn reserve_email(&self, user: &User) -> StoreResult<()> {
        match self.emails.entry(user.email.to_lowercase()) {
            Entry::Occupied(_) => Err(StoreError::Conflict(format!(
                "email {} is already registered",
                user.email
            ))),
            Entry::Vacant(slot) => {
                slot.insert(user.id);
                Ok(())
            }
        }
    }

    fn release_emails(&self, users: &[User]) {
        for user in users {
            self.emails
                .remove_if(&user.email.to_lowercase(), |_, owner| *owner == user.id);
        }
    }

    /// Inserts an account with its users; on any conflict nothing is kept.
    pub(crate) fn put_account(
        &self,
        account: Account,
        categories: Vec<Category>,
        users: Vec<User>,
    ) -> StoreResult<()> {
        for (reserved, user) in users.iter().enumerate() {
            if let Err(err) = self.reserve_email(user) {
                self.release_emails(&users[..reserved]);
                return Err(err);
            }
        }
        match self.books.entry(account.id) {
            Entry::Occupied(_) => {
                self.release_emails(&users);
                return Err(StoreError::Conflict(format!(
                    "account {} already exists",
                    account.id
                )));
            }
            Entry::Vacant(slot) => {
                slot.insert(Book::new(account, categories));
            }
        }
        for user in users {
            self.users.insert(user.id, user);
        }
        Ok(())
    }

    /// Synchronous expense insert used by the fixture builder.
    pub(crate) fn put_expense(&self, expense: Expense) -> StoreResult<()> {
        let mut book = self
            .books
            .get_mut(&expense.account_id)
            .ok_or_else(|| unknown_account(expense.account_id))?;
        book.insert(expense);
        Ok(())
    }
}

fn unknown_account(id: AccountId) -> StoreError {
    StoreError::Backend(format!("unknown account {id}"))
}

#[async_trait]
impl ExpenseStore for InMemoryStore {
    fn name(&self) -> &'static str {
        "memory"
    }

    async fn create_account(
        &self,
        account: &Account,
        categories: &[Category],
        admin: &User,
    ) -> StoreResult<()> {
        self.put_account(account.clone(), categories.to_vec(), vec![admin.clone()])
    }

    async fn find_account(&self, id: AccountId) -> StoreResult<Option<Account>> {
        Ok(self.books.get(&id).map(|b| b.account.clone()))
    }

    async fn insert_user(&self, user: &User) -> StoreResult<()> {
        if !self.books.contains_key(&user.account_id) {
            return Err(unknown_account(user.account_id));
        }
        self.reserve_email(user)?;
        self.users.insert(user.id, user.clone());
        Ok(())
    }

    async fn find_user(&self, id: UserId) -> StoreResult<Option<User>> {
        Ok(self.users.get(&id).map(|u| u.clone()))
    }

    async fn list_users(&self, account_id: AccountId) -> StoreResult<Vec<User>> {
        let mut users: Vec<_> = self
            .users
            .iter()
            .filter(|u| u.account_id == account_id)
            .map(|u| u.clone())
            .collect();
        users.sort_by_key(|u| u.id);
        Ok(users)
    }

    async fn list_categories(&self, account_id: AccountId) -> StoreResult<Vec<Category>> {
        Ok(self
            .books
            .get(&account_id)
            .map(|b| b.categories.clone())
            .unwrap_or_default())
    }

    async fn insert_expense(&self, expense: &Expense) -> StoreResult<()> {
        self.put_expense(expense.clone())
    }

    async fn find_expense(
        &self,
        account_id: AccountId,
        id: ExpenseId,
    ) -> StoreResult<Option<Expense>> {
        Ok(self
            .books
            .get(&account_id)
            .and_then(|b| b.expenses.get(&id).cloned()))
    }

    async fn list_expenses(&self, account_id: AccountId) -> StoreResult<Vec<Expense>> {
        Ok(self
            .books
            .get(&account_id)
            .map(|b| {
                b.order
                    .iter()
                    .rev()
                    .filter_map(|id| b.expenses.get(id).cloned())
                    .collect()
            })
            .unwrap_or_default())
    }

    async fn apply_transition(
        &self,
        account_id: AccountId,
        id: ExpenseId,
        action: &WorkflowAction,
    ) -> StoreResult<TransitionOutcome> {
        // The shard write lock makes the status check and the write atomic.
        let Some(mut book) = self.books.get_mut(&account_id) else {
            return Ok(TransitionOutcome::NotFound);
        };
        let Some(expense) = book.expenses.get_mut(&id) else {
            return Ok(TransitionOutcome::NotFound);
        };
        if expense.status != ExpenseStatus::PendingApproval {
            return Ok(TransitionOutcome::AlreadyClosed(expense.status));
        }
        expense.apply(action);
        Ok(TransitionOutcome::Applied(expense.clone()))
    }
}

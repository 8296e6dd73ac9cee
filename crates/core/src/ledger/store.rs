//! The storage abstraction behind the ledger and directory.
//!
//! Two implementations exist: [`crate::ledger::InMemoryStore`] in this crate
//! and a sea-orm backed store in `expensa-db`. The application picks one
//! at start-up and shares it behind an `Arc<dyn ExpenseStore>`.

use async_trait::async_trait;
use expensa_shared::types::{AccountId, ExpenseId, UserId};
use thiserror::Error;

use crate::directory::{Account, Category, User};
use crate::expense::Expense;
use crate::workflow::{ExpenseStatus, WorkflowAction};

/// Errors raised by a storage backend.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum StoreError {
    /// A uniqueness constraint was violated.
    #[error("{0}")]
    Conflict(String),

    /// The backend itself failed.
    #[error("{0}")]
    Backend(String),
}

/// Result alias for store operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// Outcome of a compare-and-set status transition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransitionOutcome {
    /// The expense was pending and now carries the new status.
    Applied(Expense),
    /// No such expense in the account.
    NotFound,
    /// The expense had already left `PendingApproval`.
    AlreadyClosed(ExpenseStatus),
}

/// Durable home of accounts, users, categories and expenses.
///
/// Every expense query is keyed by account, so no call can reach another
/// account's ledger.
#[async_trait]
pub trait ExpenseStore: Send + Sync {
    /// Short backend name for logs.
    fn name(&self) -> &'static str;

    /// Creates an account with its categories and first user.
    async fn create_account(
        &self,
        account: &Account,
        categories: &[Category],
        admin: &User,
    ) -> StoreResult<()>;

    /// Looks up an account.
    async fn find_account(&self, id: AccountId) -> StoreResult<Option<Account>>;

    /// Adds a user to an existing account. Emails are unique.
    async fn insert_user(&self, user: &User) -> StoreResult<()>;

    /// Looks up a user.
    async fn find_user(&self, id: UserId) -> StoreResult<Option<User>>;

    /// Users of an account, oldest first.
    async fn list_users(&self, account_id: AccountId) -> StoreResult<Vec<User>>;

    /// Categories of an account, in creation order.
    async fn list_categories(&self, account_id: AccountId) -> StoreResult<Vec<Category>>;

    /// Stores a new expense and adds its base amount to the category's
    /// `spent_to_date`.
    async fn insert_expense(&self, expense: &Expense) -> StoreResult<()>;

    /// Looks up an expense within an account.
    async fn find_expense(
        &self,
        account_id: AccountId,
        id: ExpenseId,
    ) -> StoreResult<Option<Expense>>;

    /// Expenses of an account, most recent first.
    async fn list_expenses(&self, account_id: AccountId) -> StoreResult<Vec<Expense>>;

    /// Applies `action` only if the expense is still pending.
    ///
    /// Implementations must make the status check and the write atomic so
    /// that of two concurrent transitions exactly one is applied.
    async fn apply_transition(
        &self,
        account_id: AccountId,
        id: ExpenseId,
        action: &WorkflowAction,
    ) -> StoreResult<TransitionOutcome>;
}

//! Expense ledger service.
//!
//! Validates submissions, normalizes amounts, assigns approval chains and
//! drives status transitions through the configured [`ExpenseStore`].

use std::sync::Arc;

use chrono::{DateTime, Utc};
use expensa_shared::types::ExpenseId;
use tracing::{debug, info};

use crate::currency::{CurrencyNormalizer, RateTable};
use crate::directory::{Session, User};
use crate::expense::{Expense, ExpenseDraft, ExpenseValidator, Violation};
use crate::ledger::error::LedgerError;
use crate::ledger::store::{ExpenseStore, TransitionOutcome};
use crate::ledger::types::{ExpenseFilter, ExpenseSummary};
use crate::workflow::{ApprovalPolicy, WorkflowAction, WorkflowError, WorkflowService};

/// Ledger operations, always scoped to a [`Session`].
#[derive(Clone)]
pub struct ExpenseLedger {
    store: Arc<dyn ExpenseStore>,
}

impl ExpenseLedger {
    /// Creates a ledger over `store`.
    #[must_use]
    pub fn new(store: Arc<dyn ExpenseStore>) -> Self {
        Self { store }
    }

    /// Name of the backing store.
    #[must_use]
    pub fn store_name(&self) -> &'static str {
        self.store.name()
    }

    /// Submits a new expense for the session user.
    ///
    /// The draft is validated against the account's categories; the amount
    /// is converted to the base currency with `rates` and the approval chain
    /// is derived from that converted amount.
    ///
    /// # Errors
    ///
    /// * `LedgerError::Validation` with every violation found
    /// * `LedgerError::Store` if the backend fails
    pub async fn submit(
        &self,
        session: &Session,
        draft: &ExpenseDraft,
        rates: &RateTable,
    ) -> Result<Expense, LedgerError> {
        self.submit_at(session, draft, rates, Utc::now()).await
    }

    /// [`ExpenseLedger::submit`] with an explicit clock.
    ///
    /// # Errors
    ///
    /// See [`ExpenseLedger::submit`].
    pub async fn submit_at(
        &self,
        session: &Session,
        draft: &ExpenseDraft,
        rates: &RateTable,
        now: DateTime<Utc>,
    ) -> Result<Expense, LedgerError> {
        let categories = self.store.list_categories(session.account_id()).await?;
        let input = ExpenseValidator::validate(draft, &categories, now.date_naive())
            .map_err(LedgerError::Validation)?;

        let base_currency_amount = CurrencyNormalizer::convert(
            input.amount,
            &input.currency_code,
            session.base_currency(),
            rates,
        )
        .ok_or_else(|| {
            LedgerError::Validation(vec![Violation::AmountNotConvertible(
                input.currency_code.clone(),
            )])
        })?;
        let expense = Expense::pending(
            session.user(),
            input,
            base_currency_amount,
            session.base_currency(),
            now,
        );
        self.store.insert_expense(&expense).await?;

        info!(
            expense_id = %expense.id,
            user_id = %session.user_id(),
            account_id = %session.account_id(),
            base_amount = %expense.base_currency_amount,
            chain_len = expense.approval_chain.len(),
            "Expense submitted"
        );
        Ok(expense)
    }

    /// Approves a pending expense.
    ///
    /// # Errors
    ///
    /// * `LedgerError::ExpenseNotFound` if the expense is not visible to the caller
    /// * `LedgerError::Workflow` if the caller may not act, or the expense is closed
    pub async fn approve(
        &self,
        session: &Session,
        id: ExpenseId,
        comments: Option<String>,
    ) -> Result<Expense, LedgerError> {
        let expense = self.get(session, id).await?;
        ApprovalPolicy::authorize(session.user(), &expense)?;
        let action = WorkflowService::approve(expense.status, session.user_id(), comments)?;
        self.commit(session, id, &action).await
    }

    /// Rejects a pending expense. A non-blank reason is required.
    ///
    /// # Errors
    ///
    /// * `LedgerError::ExpenseNotFound` if the expense is not visible to the caller
    /// * `LedgerError::Workflow` if the caller may not act, the expense is
    ///   closed, or the reason is blank
    pub async fn reject(
        &self,
        session: &Session,
        id: ExpenseId,
        reason: String,
    ) -> Result<Expense, LedgerError> {
        let expense = self.get(session, id).await?;
        ApprovalPolicy::authorize(session.user(), &expense)?;
        let action = WorkflowService::reject(expense.status, session.user_id(), reason)?;
        self.commit(session, id, &action).await
    }

    /// Returns true if `user` may approve or reject `expense`.
    #[must_use]
    pub fn can_act(user: &User, expense: &Expense) -> bool {
        ApprovalPolicy::can_act(user, expense)
    }

    /// Expenses visible to the session user, most recent first.
    ///
    /// # Errors
    ///
    /// Returns `LedgerError::Store` if the backend fails.
    pub async fn list_for(&self, session: &Session) -> Result<Vec<Expense>, LedgerError> {
        let mut expenses = self.store.list_expenses(session.account_id()).await?;
        expenses.retain(|e| e.is_visible_to(session.user()));
        Ok(expenses)
    }

    /// Visible expenses matching `filter`, most recent first.
    ///
    /// # Errors
    ///
    /// Returns `LedgerError::Store` if the backend fails.
    pub async fn filter(
        &self,
        session: &Session,
        filter: &ExpenseFilter,
    ) -> Result<Vec<Expense>, LedgerError> {
        let mut expenses = self.list_for(session).await?;
        expenses.retain(|e| filter.matches(e));
        Ok(expenses)
    }

    /// A single visible expense.
    ///
    /// # Errors
    ///
    /// Returns `LedgerError::ExpenseNotFound` if the expense does not exist
    /// in the session's account or the session user may not see it.
    pub async fn get(&self, session: &Session, id: ExpenseId) -> Result<Expense, LedgerError> {
        self.store
            .find_expense(session.account_id(), id)
            .await?
            .filter(|e| e.is_visible_to(session.user()))
            .ok_or(LedgerError::ExpenseNotFound(id))
    }

    /// Counts and base-currency totals over the visible expenses.
    ///
    /// # Errors
    ///
    /// Returns `LedgerError::Store` if the backend fails.
    pub async fn summary(&self, session: &Session) -> Result<ExpenseSummary, LedgerError> {
        let expenses = self.list_for(session).await?;
        Ok(ExpenseSummary::from_expenses(
            session.base_currency(),
            &expenses,
        ))
    }

    async fn commit(
        &self,
        session: &Session,
        id: ExpenseId,
        action: &WorkflowAction,
    ) -> Result<Expense, LedgerError> {
        match self
            .store
            .apply_transition(session.account_id(), id, action)
            .await?
        {
            TransitionOutcome::Applied(expense) => {
                info!(
                    expense_id = %id,
                    actor = %action.actor(),
                    status = %expense.status,
                    "Expense closed"
                );
                Ok(expense)
            }
            TransitionOutcome::NotFound => Err(LedgerError::ExpenseNotFound(id)),
            TransitionOutcome::AlreadyClosed(status) => {
                debug!(expense_id = %id, %status, "Lost transition race");
                Err(WorkflowError::InvalidTransition {
                    from: status,
                    to: action.new_status(),
                }
                .into())
            }
        }
    }
}

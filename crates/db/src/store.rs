//! Persistent expense store over a `SeaORM` connection.
//!
//! Amounts live in `NUMERIC(19, 4)` columns and the approval chain in a
//! JSON column. Category spend is summed by the database on read rather
//! than kept as a mutable counter.

use std::collections::HashMap;

use async_trait::async_trait;
use rust_decimal::Decimal;
use sea_orm::{
    ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter, QueryOrder, QuerySelect,
    Set, SqlErr, TransactionTrait,
};
use tracing::debug;

use expensa_core::directory::{Account, Category, User};
use expensa_core::expense::Expense;
use expensa_core::ledger::{ExpenseStore, StoreError, StoreResult, TransitionOutcome};
use expensa_core::workflow::WorkflowAction;
use expensa_shared::types::{AccountId, CategoryId, ExpenseId, UserId};

use crate::entities::sea_orm_active_enums::ExpenseStatus;
use crate::entities::{accounts, categories, expenses, users};

/// [`ExpenseStore`] backed by a relational database.
#[derive(Debug, Clone)]
pub struct DbExpenseStore {
    db: DatabaseConnection,
}

impl DbExpenseStore {
    /// Creates a store over an open, migrated connection.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// The underlying connection.
    #[must_use]
    pub const fn connection(&self) -> &DatabaseConnection {
        &self.db
    }
}

#[async_trait]
impl ExpenseStore for DbExpenseStore {
    fn name(&self) -> &'static str {
        "database"
    }

    async fn create_account(
        &self,
        account: &Account,
        categories: &[Category],
        admin: &User,
    ) -> StoreResult<()> {
        let txn = self.db.begin().await.map_err(store_err)?;

        accounts::Entity::insert(accounts::ActiveModel {
            id: Set(account.id.into_inner()),
            company_name: Set(account.company_name.clone()),
            base_currency_code: Set(account.base_currency_code.clone()),
            created_at: Set(account.created_at),
        })
        .exec_without_returning(&txn)
        .await
        .map_err(store_err)?;

        if !categories.is_empty() {
            categories::Entity::insert_many(categories.iter().map(category_model))
                .exec_without_returning(&txn)
                .await
                .map_err(store_err)?;
        }

        users::Entity::insert(user_model(admin))
            .exec_without_returning(&txn)
            .await
            .map_err(|e| email_conflict(e, admin))?;

        txn.commit().await.map_err(store_err)?;
        debug!(account_id = %account.id, "Account stored");
        Ok(())
    }

    async fn find_account(&self, id: AccountId) -> StoreResult<Option<Account>> {
        let model = accounts::Entity::find_by_id(id.into_inner())
            .one(&self.db)
            .await
            .map_err(store_err)?;

        Ok(model.map(|m| Account {
            id: AccountId::from_uuid(m.id),
            company_name: m.company_name,
            base_currency_code: m.base_currency_code,
            created_at: m.created_at,
        }))
    }

    async fn insert_user(&self, user: &User) -> StoreResult<()> {
        users::Entity::insert(user_model(user))
            .exec_without_returning(&self.db)
            .await
            .map_err(|e| email_conflict(e, user))?;
        Ok(())
    }

    async fn find_user(&self, id: UserId) -> StoreResult<Option<User>> {
        let model = users::Entity::find_by_id(id.into_inner())
            .one(&self.db)
            .await
            .map_err(store_err)?;
        Ok(model.map(user_from_model))
    }

    async fn list_users(&self, account_id: AccountId) -> StoreResult<Vec<User>> {
        let models = users::Entity::find()
            .filter(users::Column::AccountId.eq(account_id.into_inner()))
            .order_by_asc(users::Column::Id)
            .all(&self.db)
            .await
            .map_err(store_err)?;
        Ok(models.into_iter().map(user_from_model).collect())
    }

    async fn list_categories(&self, account_id: AccountId) -> StoreResult<Vec<Category>> {
        let models = categories::Entity::find()
            .filter(categories::Column::AccountId.eq(account_id.into_inner()))
            .order_by_asc(categories::Column::Id)
            .all(&self.db)
            .await
            .map_err(store_err)?;

        let totals: Vec<(String, Decimal)> = expenses::Entity::find()
            .select_only()
            .column(expenses::Column::Category)
            .column_as(expenses::Column::BaseCurrencyAmount.sum(), "spent")
            .filter(expenses::Column::AccountId.eq(account_id.into_inner()))
            .group_by(expenses::Column::Category)
            .into_tuple()
            .all(&self.db)
            .await
            .map_err(store_err)?;
        let spent: HashMap<String, Decimal> = totals
            .into_iter()
            .map(|(category, total)| (category, money(total)))
            .collect();

        Ok(models
            .into_iter()
            .map(|m| Category {
                id: CategoryId::from_uuid(m.id),
                account_id: AccountId::from_uuid(m.account_id),
                monthly_budget: money(m.monthly_budget),
                spent_to_date: spent.get(&m.name).copied().unwrap_or_default(),
                name: m.name,
            })
            .collect())
    }

    async fn insert_expense(&self, expense: &Expense) -> StoreResult<()> {
        expenses::Entity::insert(expense_model(expense)?)
            .exec_without_returning(&self.db)
            .await
            .map_err(store_err)?;
        Ok(())
    }

    async fn find_expense(
        &self,
        account_id: AccountId,
        id: ExpenseId,
    ) -> StoreResult<Option<Expense>> {
        expenses::Entity::find_by_id(id.into_inner())
            .filter(expenses::Column::AccountId.eq(account_id.into_inner()))
            .one(&self.db)
            .await
            .map_err(store_err)?
            .map(expense_from_model)
            .transpose()
    }

    async fn list_expenses(&self, account_id: AccountId) -> StoreResult<Vec<Expense>> {
        expenses::Entity::find()
            .filter(expenses::Column::AccountId.eq(account_id.into_inner()))
            .order_by_desc(expenses::Column::Id)
            .all(&self.db)
            .await
            .map_err(store_err)?
            .into_iter()
            .map(expense_from_model)
            .collect()
    }

    async fn apply_transition(
        &self,
        account_id: AccountId,
        id: ExpenseId,
        action: &WorkflowAction,
    ) -> StoreResult<TransitionOutcome> {
        let mut changes = expenses::ActiveModel {
            status: Set(action.new_status().into()),
            ..Default::default()
        };
        match action {
            WorkflowAction::Approve {
                approved_by,
                approved_at,
                comments,
            } => {
                changes.approved_by = Set(Some(approved_by.into_inner()));
                changes.approved_at = Set(Some(*approved_at));
                changes.approval_comments = Set(comments.clone());
            }
            WorkflowAction::Reject {
                rejected_by,
                rejected_at,
                reason,
            } => {
                changes.rejected_by = Set(Some(rejected_by.into_inner()));
                changes.rejected_at = Set(Some(*rejected_at));
                changes.rejection_reason = Set(Some(reason.clone()));
            }
        }

        // Compare-and-set: only a row still pending is updated.
        let result = expenses::Entity::update_many()
            .set(changes)
            .filter(expenses::Column::Id.eq(id.into_inner()))
            .filter(expenses::Column::AccountId.eq(account_id.into_inner()))
            .filter(expenses::Column::Status.eq(ExpenseStatus::PendingApproval))
            .exec(&self.db)
            .await
            .map_err(store_err)?;

        Ok(match self.find_expense(account_id, id).await? {
            None => TransitionOutcome::NotFound,
            Some(expense) if result.rows_affected == 1 => TransitionOutcome::Applied(expense),
            Some(expense) => TransitionOutcome::AlreadyClosed(expense.status),
        })
    }
}

fn store_err(err: DbErr) -> StoreError {
    match err.sql_err() {
        Some(SqlErr::UniqueConstraintViolation(detail)) => StoreError::Conflict(detail),
        _ => StoreError::Backend(err.to_string()),
    }
}

fn email_conflict(err: DbErr, user: &User) -> StoreError {
    match store_err(err) {
        StoreError::Conflict(_) => {
            StoreError::Conflict(format!("email {} is already registered", user.email))
        }
        other => other,
    }
}

/// Scale of the `NUMERIC` money columns.
const MONEY_SCALE: u32 = 4;

/// SQLite hands `NUMERIC` back through a float; round to the column scale.
fn money(value: Decimal) -> Decimal {
    value.round_dp(MONEY_SCALE)
}

fn user_model(user: &User) -> users::ActiveModel {
    users::ActiveModel {
        id: Set(user.id.into_inner()),
        account_id: Set(user.account_id.into_inner()),
        name: Set(user.name.clone()),
        email: Set(user.email.clone()),
        role: Set(user.role.into()),
    }
}

fn user_from_model(m: users::Model) -> User {
    User {
        id: UserId::from_uuid(m.id),
        account_id: AccountId::from_uuid(m.account_id),
        name: m.name,
        email: m.email,
        role: m.role.into(),
    }
}

fn category_model(category: &Category) -> categories::ActiveModel {
    categories::ActiveModel {
        id: Set(category.id.into_inner()),
        account_id: Set(category.account_id.into_inner()),
        name: Set(category.name.clone()),
        monthly_budget: Set(category.monthly_budget),
    }
}

fn expense_model(expense: &Expense) -> StoreResult<expenses::ActiveModel> {
    let approval_chain = serde_json::to_value(&expense.approval_chain)
        .map_err(|e| StoreError::Backend(format!("approval_chain: {e}")))?;

    Ok(expenses::ActiveModel {
        id: Set(expense.id.into_inner()),
        account_id: Set(expense.account_id.into_inner()),
        owner_user_id: Set(expense.owner_user_id.into_inner()),
        original_amount: Set(expense.original_amount),
        original_currency_code: Set(expense.original_currency_code.clone()),
        base_currency_amount: Set(expense.base_currency_amount),
        base_currency_code: Set(expense.base_currency_code.clone()),
        category: Set(expense.category.clone()),
        description: Set(expense.description.clone()),
        expense_date: Set(expense.expense_date),
        ocr_confidence: Set(expense.ocr_confidence.map(i16::from)),
        approval_chain: Set(approval_chain),
        status: Set(expense.status.into()),
        submitted_at: Set(expense.submitted_at),
        approved_by: Set(expense.approved_by.map(UserId::into_inner)),
        approved_at: Set(expense.approved_at),
        approval_comments: Set(expense.approval_comments.clone()),
        rejected_by: Set(expense.rejected_by.map(UserId::into_inner)),
        rejected_at: Set(expense.rejected_at),
        rejection_reason: Set(expense.rejection_reason.clone()),
    })
}

fn expense_from_model(m: expenses::Model) -> StoreResult<Expense> {
    Ok(Expense {
        id: ExpenseId::from_uuid(m.id),
        account_id: AccountId::from_uuid(m.account_id),
        owner_user_id: UserId::from_uuid(m.owner_user_id),
        original_amount: money(m.original_amount),
        original_currency_code: m.original_currency_code,
        base_currency_amount: money(m.base_currency_amount),
        base_currency_code: m.base_currency_code,
        category: m.category,
        description: m.description,
        expense_date: m.expense_date,
        ocr_confidence: m
            .ocr_confidence
            .map(u8::try_from)
            .transpose()
            .map_err(|e| StoreError::Backend(format!("ocr_confidence: {e}")))?,
        approval_chain: serde_json::from_value(m.approval_chain)
            .map_err(|e| StoreError::Backend(format!("approval_chain: {e}")))?,
        status: m.status.into(),
        submitted_at: m.submitted_at,
        approved_by: m.approved_by.map(UserId::from_uuid),
        approved_at: m.approved_at,
        approval_comments: m.approval_comments,
        rejected_by: m.rejected_by.map(UserId::from_uuid),
        rejected_at: m.rejected_at,
        rejection_reason: m.rejection_reason,
    })
}

//! Account signup, user management and session lookup.

use std::sync::Arc;

use chrono::Utc;
use expensa_shared::types::{AccountId, UserId};
use serde::Deserialize;
use tracing::info;

use crate::currency::rates::normalize_code;
use crate::directory::session::Session;
use crate::directory::types::{Account, Category, User};
use crate::expense::ExpenseValidator;
use crate::ledger::{ExpenseStore, LedgerError};
use crate::workflow::UserRole;

/// Signup request: a new company and its first administrator.
#[derive(Debug, Clone, Deserialize)]
pub struct SignUp {
    /// Company display name.
    pub company_name: String,
    /// Currency all totals will be reported in.
    pub base_currency_code: String,
    /// Administrator's name.
    pub admin_name: String,
    /// Administrator's email.
    pub admin_email: String,
}

/// Request to add a user to the caller's account.
#[derive(Debug, Clone, Deserialize)]
pub struct NewUser {
    /// Display name.
    pub name: String,
    /// Login email.
    pub email: String,
    /// Role.
    pub role: UserRole,
}

/// Directory operations over the configured store.
#[derive(Clone)]
pub struct Directory {
    store: Arc<dyn ExpenseStore>,
}

impl Directory {
    /// Creates a directory over `store`.
    #[must_use]
    pub fn new(store: Arc<dyn ExpenseStore>) -> Self {
        Self { store }
    }

    /// Creates an account with the default categories and an Admin user.
    ///
    /// # Errors
    ///
    /// * `LedgerError::Validation` if a field is blank or malformed
    /// * `LedgerError::Conflict` if the email is already registered
    pub async fn sign_up(&self, request: SignUp) -> Result<(Account, User), LedgerError> {
        let violations: Vec<_> = [
            ExpenseValidator::check_name("company_name", &request.company_name),
            ExpenseValidator::check_currency(&request.base_currency_code),
            ExpenseValidator::check_name("admin_name", &request.admin_name),
            ExpenseValidator::check_email(&request.admin_email),
        ]
        .into_iter()
        .flatten()
        .collect();
        if !violations.is_empty() {
            return Err(LedgerError::Validation(violations));
        }

        let account = Account {
            id: AccountId::new(),
            company_name: request.company_name.trim().to_string(),
            base_currency_code: normalize_code(&request.base_currency_code),
            created_at: Utc::now(),
        };
        let admin = User {
            id: UserId::new(),
            account_id: account.id,
            name: request.admin_name.trim().to_string(),
            email: request.admin_email.trim().to_string(),
            role: UserRole::Admin,
        };
        let categories = Category::defaults_for(account.id);

        self.store
            .create_account(&account, &categories, &admin)
            .await?;

        info!(
            account_id = %account.id,
            base_currency = %account.base_currency_code,
            "Account created"
        );
        Ok((account, admin))
    }

    /// Adds a user to the session's account. Admin only.
    ///
    /// # Errors
    ///
    /// * `LedgerError::Forbidden` unless the caller is an Admin
    /// * `LedgerError::Validation` if the name or email is invalid
    /// * `LedgerError::Conflict` if the email is already registered
    pub async fn add_user(&self, session: &Session, request: NewUser) -> Result<User, LedgerError> {
        if session.role() != UserRole::Admin {
            return Err(LedgerError::Forbidden(format!(
                "role {} cannot add users",
                session.role()
            )));
        }

        let violations: Vec<_> = [
            ExpenseValidator::check_name("name", &request.name),
            ExpenseValidator::check_email(&request.email),
        ]
        .into_iter()
        .flatten()
        .collect();
        if !violations.is_empty() {
            return Err(LedgerError::Validation(violations));
        }

        let user = User {
            id: UserId::new(),
            account_id: session.account_id(),
            name: request.name.trim().to_string(),
            email: request.email.trim().to_string(),
            role: request.role,
        };
        self.store.insert_user(&user).await?;

        info!(user_id = %user.id, account_id = %user.account_id, role = %user.role, "User added");
        Ok(user)
    }

    /// Users of the session's account.
    ///
    /// # Errors
    ///
    /// Returns `LedgerError::Store` if the backend fails.
    pub async fn users(&self, session: &Session) -> Result<Vec<User>, LedgerError> {
        Ok(self.store.list_users(session.account_id()).await?)
    }

    /// Resolves a user id to a session.
    ///
    /// # Errors
    ///
    /// * `LedgerError::UserNotFound` if the user does not exist
    /// * `LedgerError::AccountNotFound` if the user's account is gone
    pub async fn open_session(&self, user_id: UserId) -> Result<Session, LedgerError> {
        let user = self
            .store
            .find_user(user_id)
            .await?
            .ok_or(LedgerError::UserNotFound(user_id))?;
        let account = self
            .store
            .find_account(user.account_id)
            .await?
            .ok_or(LedgerError::AccountNotFound(user.account_id))?;
        Session::new(user, account)
    }

    /// Categories of the session's account with their budget usage.
    ///
    /// # Errors
    ///
    /// Returns `LedgerError::Store` if the backend fails.
    pub async fn categories(&self, session: &Session) -> Result<Vec<Category>, LedgerError> {
        Ok(self.store.list_categories(session.account_id()).await?)
    }
}

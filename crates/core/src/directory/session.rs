//! The explicit context passed to every ledger operation.

use expensa_shared::types::{AccountId, UserId};

use crate::directory::types::{Account, User};
use crate::ledger::LedgerError;
use crate::workflow::{UserRole, WorkflowError};

/// The acting user together with the account they belong to.
///
/// A session can only be built for a user of the given account, so every
/// operation that receives one is already scoped to a single ledger.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    user: User,
    account: Account,
}

impl Session {
    /// Creates a session.
    ///
    /// # Errors
    ///
    /// Returns `WorkflowError::AccountMismatch` if the user is not a member
    /// of `account`.
    pub fn new(user: User, account: Account) -> Result<Self, LedgerError> {
        if user.account_id != account.id {
            return Err(WorkflowError::AccountMismatch { user_id: user.id }.into());
        }
        Ok(Self { user, account })
    }

    /// The acting user.
    #[must_use]
    pub fn user(&self) -> &User {
        &self.user
    }

    /// The user's account.
    #[must_use]
    pub fn account(&self) -> &Account {
        &self.account
    }

    /// Shortcut for `self.user().id`.
    #[must_use]
    pub fn user_id(&self) -> UserId {
        self.user.id
    }

    /// Shortcut for `self.account().id`.
    #[must_use]
    pub fn account_id(&self) -> AccountId {
        self.account.id
    }

    /// The acting user's role.
    #[must_use]
    pub fn role(&self) -> UserRole {
        self.user.role
    }

    /// The account's base currency code.
    #[must_use]
    pub fn base_currency(&self) -> &str {
        &self.account.base_currency_code
    }
}

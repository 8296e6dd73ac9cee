//! Ledger error types.
//!
//! This module defines all errors returned by ledger and directory
//! operations. Provider failures never appear here; they are absorbed
//! by the provider layer.

use expensa_shared::types::{AccountId, ExpenseId, UserId};
use thiserror::Error;

use crate::expense::Violation;
use crate::ledger::store::StoreError;
use crate::workflow::WorkflowError;

/// Errors that can occur during ledger operations.
#[derive(Debug, Error)]
pub enum LedgerError {
    /// Input failed one or more rules.
    #[error("Validation failed: {}", join_violations(.0))]
    Validation(Vec<Violation>),

    /// Expense does not exist or is not visible to the caller.
    #[error("Expense not found: {0}")]
    ExpenseNotFound(ExpenseId),

    /// User does not exist.
    #[error("User not found: {0}")]
    UserNotFound(UserId),

    /// Account does not exist.
    #[error("Account not found: {0}")]
    AccountNotFound(AccountId),

    /// The caller's role does not allow the operation.
    #[error("Forbidden: {0}")]
    Forbidden(String),

    /// A uniqueness constraint was violated.
    #[error("Conflict: {0}")]
    Conflict(String),

    /// Authorization or state-machine failure.
    #[error(transparent)]
    Workflow(#[from] WorkflowError),

    /// The storage backend failed.
    #[error("Storage error: {0}")]
    Store(String),
}

fn join_violations(violations: &[Violation]) -> String {
    violations
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

impl From<StoreError> for LedgerError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Conflict(msg) => Self::Conflict(msg),
            StoreError::Backend(msg) => Self::Store(msg),
        }
    }
}

impl LedgerError {
    /// Returns the HTTP status code for this error.
    #[must_use]
    pub fn status_code(&self) -> u16 {
        match self {
            Self::Validation(_) => 422,
            Self::ExpenseNotFound(_) | Self::UserNotFound(_) | Self::AccountNotFound(_) => 404,
            Self::Forbidden(_) => 403,
            Self::Conflict(_) => 409,
            Self::Workflow(e) => e.status_code(),
            Self::Store(_) => 500,
        }
    }

    /// Returns the error code for API responses.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::Validation(_) => "VALIDATION_ERROR",
            Self::ExpenseNotFound(_) => "EXPENSE_NOT_FOUND",
            Self::UserNotFound(_) => "USER_NOT_FOUND",
            Self::AccountNotFound(_) => "ACCOUNT_NOT_FOUND",
            Self::Forbidden(_) => "FORBIDDEN",
            Self::Conflict(_) => "CONFLICT",
            Self::Workflow(e) => e.error_code(),
            Self::Store(_) => "STORAGE_ERROR",
        }
    }

    /// The violations carried by a validation error.
    #[must_use]
    pub fn violations(&self) -> &[Violation] {
        match self {
            Self::Validation(v) => v,
            _ => &[],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::workflow::ExpenseStatus;

    #[test]
    fn test_validation_error_lists_every_violation() {
        let err = LedgerError::Validation(vec![
            Violation::AmountMissing,
            Violation::DescriptionTooShort { min: 10 },
        ]);
        assert_eq!(err.status_code(), 422);
        assert_eq!(err.error_code(), "VALIDATION_ERROR");
        assert_eq!(err.violations().len(), 2);
        assert_eq!(
            err.to_string(),
            "Validation failed: Amount is required; Description must be at least 10 characters"
        );
    }

    #[test]
    fn test_workflow_errors_keep_their_codes() {
        let err: LedgerError = WorkflowError::InvalidTransition {
            from: ExpenseStatus::Approved,
            to: ExpenseStatus::Approved,
        }
        .into();
        assert_eq!(err.status_code(), 403);
        assert_eq!(err.error_code(), "INVALID_TRANSITION");
        assert!(err.violations().is_empty());
    }

    #[test]
    fn test_store_errors_convert() {
        let conflict: LedgerError = StoreError::Conflict("email taken".into()).into();
        assert_eq!(conflict.status_code(), 409);

        let backend: LedgerError = StoreError::Backend("connection reset".into()).into();
        assert_eq!(backend.status_code(), 500);
        assert_eq!(backend.error_code(), "STORAGE_ERROR");
    }

    #[test]
    fn test_not_found_codes() {
        assert_eq!(LedgerError::ExpenseNotFound(ExpenseId::new()).status_code(), 404);
        assert_eq!(LedgerError::UserNotFound(UserId::new()).error_code(), "USER_NOT_FOUND");
        assert_eq!(
            LedgerError::AccountNotFound(AccountId::new()).error_code(),
            "ACCOUNT_NOT_FOUND"
        );
    }
}

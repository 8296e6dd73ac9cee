//! Workflow error types for expense lifecycle management.

use expensa_shared::types::UserId;
use thiserror::Error;

use crate::workflow::approval::UserRole;
use crate::workflow::types::ExpenseStatus;

/// Errors that can occur during workflow operations.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum WorkflowError {
    /// Attempted an invalid status transition.
    #[error("Invalid status transition from {from} to {to}")]
    InvalidTransition {
        /// The current status.
        from: ExpenseStatus,
        /// The attempted target status.
        to: ExpenseStatus,
    },

    /// The user's role may never approve or reject expenses.
    #[error("User {user_id} with role {role} is not authorized to approve or reject expenses")]
    NotAuthorizedToApprove {
        /// The user who attempted the action.
        user_id: UserId,
        /// The user's role.
        role: UserRole,
    },

    /// Managers may not close their own expenses.
    #[error("User {user_id} cannot approve or reject their own expense")]
    CannotActOnOwnExpense {
        /// The user who attempted the action.
        user_id: UserId,
    },

    /// The acting user belongs to a different account than the expense.
    #[error("User {user_id} does not belong to the expense's account")]
    AccountMismatch {
        /// The user who attempted the action.
        user_id: UserId,
    },

    /// Rejection reason is required but not provided.
    #[error("Rejection reason is required")]
    RejectionReasonRequired,
}

impl WorkflowError {
    /// Returns the HTTP status code for this error.
    #[must_use]
    pub fn status_code(&self) -> u16 {
        match self {
            Self::InvalidTransition { .. }
            | Self::NotAuthorizedToApprove { .. }
            | Self::CannotActOnOwnExpense { .. }
            | Self::AccountMismatch { .. } => 403,
            Self::RejectionReasonRequired => 400,
        }
    }

    /// Returns the error code for API responses.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::InvalidTransition { .. } => "INVALID_TRANSITION",
            Self::NotAuthorizedToApprove { .. } => "NOT_AUTHORIZED_TO_APPROVE",
            Self::CannotActOnOwnExpense { .. } => "CANNOT_ACT_ON_OWN_EXPENSE",
            Self::AccountMismatch { .. } => "ACCOUNT_MISMATCH",
            Self::RejectionReasonRequired => "REJECTION_REASON_REQUIRED",
        }
    }

    /// Returns true for authorization failures (as opposed to state errors).
    #[must_use]
    pub fn is_forbidden(&self) -> bool {
        matches!(
            self,
            Self::NotAuthorizedToApprove { .. }
                | Self::CannotActOnOwnExpense { .. }
                | Self::AccountMismatch { .. }
        )
    }
}

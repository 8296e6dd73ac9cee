//! Workflow service for expense state transitions.
//!
//! This module implements the core state machine logic for
//! closing expenses through the approval workflow.

use chrono::Utc;
use expensa_shared::types::UserId;

use crate::workflow::error::WorkflowError;
use crate::workflow::types::{ExpenseStatus, WorkflowAction};

/// Stateless service for managing expense workflow transitions.
///
/// All methods are associated functions that validate a transition and
/// return the `WorkflowAction` carrying the audit trail to apply.
pub struct WorkflowService;

impl WorkflowService {
    /// Approve a pending expense.
    ///
    /// # Arguments
    /// * `current_status` - The current status of the expense
    /// * `approved_by` - The user approving the expense
    /// * `comments` - Optional comments from the approver
    ///
    /// # Returns
    /// * `Ok(WorkflowAction::Approve)` if the transition is valid
    /// * `Err(WorkflowError::InvalidTransition)` if not pending
    pub fn approve(
        current_status: ExpenseStatus,
        approved_by: UserId,
        comments: Option<String>,
    ) -> Result<WorkflowAction, WorkflowError> {
        Self::ensure_transition(current_status, ExpenseStatus::Approved)?;
        Ok(WorkflowAction::Approve {
            approved_by,
            approved_at: Utc::now(),
            comments: comments.filter(|c| !c.trim().is_empty()),
        })
    }

    /// Reject a pending expense.
    ///
    /// # Arguments
    /// * `current_status` - The current status of the expense
    /// * `rejected_by` - The user rejecting the expense
    /// * `reason` - The reason for rejection (required)
    ///
    /// # Returns
    /// * `Ok(WorkflowAction::Reject)` if the transition is valid
    /// * `Err(WorkflowError::InvalidTransition)` if not pending
    /// * `Err(WorkflowError::RejectionReasonRequired)` if reason is empty
    pub fn reject(
        current_status: ExpenseStatus,
        rejected_by: UserId,
        reason: String,
    ) -> Result<WorkflowAction, WorkflowError> {
        Self::ensure_transition(current_status, ExpenseStatus::Rejected)?;

        let reason = reason.trim().to_string();
        if reason.is_empty() {
            return Err(WorkflowError::RejectionReasonRequired);
        }

        Ok(WorkflowAction::Reject {
            rejected_by,
            rejected_at: Utc::now(),
            reason,
        })
    }

    /// Check if a status transition is valid.
    ///
    /// Valid transitions:
    /// - PendingApproval → Approved (approve)
    /// - PendingApproval → Rejected (reject)
    #[must_use]
    pub fn is_valid_transition(from: ExpenseStatus, to: ExpenseStatus) -> bool {
        matches!(
            (from, to),
            (
                ExpenseStatus::PendingApproval,
                ExpenseStatus::Approved | ExpenseStatus::Rejected
            )
        )
    }

    fn ensure_transition(from: ExpenseStatus, to: ExpenseStatus) -> Result<(), WorkflowError> {
        if Self::is_valid_transition(from, to) {
            Ok(())
        } else {
            Err(WorkflowError::InvalidTransition { from, to })
        }
    }
}

//! Workflow domain types for expense lifecycle management.
//!
//! This module defines the core types used for managing expense
//! status transitions and workflow actions.

use chrono::{DateTime, Utc};
use expensa_shared::types::UserId;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Expense status in the approval workflow.
///
/// The valid transitions are:
/// - PendingApproval → Approved (approve)
/// - PendingApproval → Rejected (reject)
///
/// Approved and Rejected are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExpenseStatus {
    /// Submitted and waiting for an authorized approver.
    PendingApproval,
    /// Approved (terminal).
    Approved,
    /// Rejected (terminal).
    Rejected,
}

impl ExpenseStatus {
    /// Returns the string representation of the status.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::PendingApproval => "pending_approval",
            Self::Approved => "approved",
            Self::Rejected => "rejected",
        }
    }

    /// Parses a status from a string.
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "pending_approval" | "pending" => Some(Self::PendingApproval),
            "approved" => Some(Self::Approved),
            "rejected" => Some(Self::Rejected),
            _ => None,
        }
    }

    /// Returns true if no further transition is possible.
    #[must_use]
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Approved | Self::Rejected)
    }
}

impl fmt::Display for ExpenseStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Workflow action representing a state transition with audit data.
///
/// Each variant captures the action performed, the resulting status,
/// and the audit trail information (who, when, why).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WorkflowAction {
    /// Approve a pending expense.
    Approve {
        /// The user who approved the expense.
        approved_by: UserId,
        /// When the expense was approved.
        approved_at: DateTime<Utc>,
        /// Optional comments from the approver.
        comments: Option<String>,
    },
    /// Reject a pending expense.
    Reject {
        /// The user who rejected the expense.
        rejected_by: UserId,
        /// When the expense was rejected.
        rejected_at: DateTime<Utc>,
        /// The reason for rejection.
        reason: String,
    },
}

impl WorkflowAction {
    /// Returns the new status resulting from this action.
    #[must_use]
    pub fn new_status(&self) -> ExpenseStatus {
        match self {
            Self::Approve { .. } => ExpenseStatus::Approved,
            Self::Reject { .. } => ExpenseStatus::Rejected,
        }
    }

    /// The user performing the action.
    #[must_use]
    pub fn actor(&self) -> UserId {
        match self {
            Self::Approve { approved_by, .. } => *approved_by,
            Self::Reject { rejected_by, .. } => *rejected_by,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_roundtrip() {
        for status in [
            ExpenseStatus::PendingApproval,
            ExpenseStatus::Approved,
            ExpenseStatus::Rejected,
        ] {
            assert_eq!(ExpenseStatus::parse(status.as_str()), Some(status));
        }
        assert_eq!(
            ExpenseStatus::parse("PENDING"),
            Some(ExpenseStatus::PendingApproval)
        );
        assert_eq!(ExpenseStatus::parse("draft"), None);
    }

    #[test]
    fn test_status_display() {
        assert_eq!(
            format!("{}", ExpenseStatus::PendingApproval),
            "pending_approval"
        );
        assert_eq!(format!("{}", ExpenseStatus::Rejected), "rejected");
    }

    #[test]
    fn test_terminal_states() {
        assert!(!ExpenseStatus::PendingApproval.is_terminal());
        assert!(ExpenseStatus::Approved.is_terminal());
        assert!(ExpenseStatus::Rejected.is_terminal());
    }

    #[test]
    fn test_action_status_and_actor() {
        let user = UserId::new();
        let action = WorkflowAction::Reject {
            rejected_by: user,
            rejected_at: Utc::now(),
            reason: "Duplicate".to_string(),
        };
        assert_eq!(action.new_status(), ExpenseStatus::Rejected);
        assert_eq!(action.actor(), user);
    }
}

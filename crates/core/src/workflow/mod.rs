//! Expense approval workflow for Expensa.
//!
//! This module implements the approval-chain resolver, the authorization
//! rule for closing an expense, and the expense status state machine.
//!
//! # Modules
//!
//! - `types` - Workflow domain types (ExpenseStatus, WorkflowAction)
//! - `error` - Workflow-specific error types
//! - `approval` - Roles, approval chains and the `can_act` rule
//! - `service` - State transition logic

pub mod approval;
pub mod error;
pub mod service;
pub mod types;

#[cfg(test)]
mod approval_props;

pub use approval::{ApprovalChainResolver, ApprovalPolicy, UserRole};
pub use error::WorkflowError;
pub use service::WorkflowService;
pub use types::{ExpenseStatus, WorkflowAction};

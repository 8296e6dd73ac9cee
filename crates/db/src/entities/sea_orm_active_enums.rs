//! Enums stored as short strings.

use expensa_core::workflow;
use sea_orm::entity::prelude::*;

/// Stored user role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
pub enum UserRole {
    /// Employee.
    #[sea_orm(string_value = "employee")]
    Employee,
    /// Manager.
    #[sea_orm(string_value = "manager")]
    Manager,
    /// Finance.
    #[sea_orm(string_value = "finance")]
    Finance,
    /// Director.
    #[sea_orm(string_value = "director")]
    Director,
    /// Admin.
    #[sea_orm(string_value = "admin")]
    Admin,
}

/// Stored expense status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(24))")]
pub enum ExpenseStatus {
    /// Pending approval.
    #[sea_orm(string_value = "pending_approval")]
    PendingApproval,
    /// Approved.
    #[sea_orm(string_value = "approved")]
    Approved,
    /// Rejected.
    #[sea_orm(string_value = "rejected")]
    Rejected,
}

impl From<workflow::UserRole> for UserRole {
    fn from(role: workflow::UserRole) -> Self {
        match role {
            workflow::UserRole::Employee => Self::Employee,
            workflow::UserRole::Manager => Self::Manager,
            workflow::UserRole::Finance => Self::Finance,
            workflow::UserRole::Director => Self::Director,
            workflow::UserRole::Admin => Self::Admin,
        }
    }
}

impl From<UserRole> for workflow::UserRole {
    fn from(role: UserRole) -> Self {
        match role {
            UserRole::Employee => Self::Employee,
            UserRole::Manager => Self::Manager,
            UserRole::Finance => Self::Finance,
            UserRole::Director => Self::Director,
            UserRole::Admin => Self::Admin,
        }
    }
}

impl From<workflow::ExpenseStatus> for ExpenseStatus {
    fn from(status: workflow::ExpenseStatus) -> Self {
        match status {
            workflow::ExpenseStatus::PendingApproval => Self::PendingApproval,
            workflow::ExpenseStatus::Approved => Self::Approved,
            workflow::ExpenseStatus::Rejected => Self::Rejected,
        }
    }
}

impl From<ExpenseStatus> for workflow::ExpenseStatus {
    fn from(status: ExpenseStatus) -> Self {
        match status {
            ExpenseStatus::PendingApproval => Self::PendingApproval,
            ExpenseStatus::Approved => Self::Approved,
            ExpenseStatus::Rejected => Self::Rejected,
        }
    }
}

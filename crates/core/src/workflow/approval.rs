//! Approval chains and authorization for closing expenses.
//!
//! The chain resolver maps a base-currency amount to the roles that are
//! required, in principle, to sign off on an expense. The chain is stored
//! on the expense as metadata; closing an expense is gated by
//! [`ApprovalPolicy`], which checks the actor's role and ownership only.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::directory::User;
use crate::expense::Expense;
use crate::workflow::error::WorkflowError;

/// User role within an account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    /// Submits expenses.
    Employee,
    /// First approval tier.
    Manager,
    /// Second approval tier.
    Finance,
    /// Third approval tier.
    Director,
    /// Account administrator.
    Admin,
}

impl UserRole {
    /// Parse a role from a string.
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "employee" => Some(Self::Employee),
            "manager" => Some(Self::Manager),
            "finance" => Some(Self::Finance),
            "director" => Some(Self::Director),
            "admin" => Some(Self::Admin),
            _ => None,
        }
    }

    /// Returns the string representation of the role.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Employee => "employee",
            Self::Manager => "manager",
            Self::Finance => "finance",
            Self::Director => "director",
            Self::Admin => "admin",
        }
    }

    /// Returns true if the role sees every expense of its account.
    #[must_use]
    pub fn sees_whole_account(&self) -> bool {
        !matches!(self, Self::Employee)
    }
}

impl fmt::Display for UserRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Stateless resolver for approval chains.
pub struct ApprovalChainResolver;

impl ApprovalChainResolver {
    /// Amounts strictly above this need Finance sign-off.
    pub const FINANCE_THRESHOLD: Decimal = Decimal::from_parts(1000, 0, 0, false, 0);

    /// Amounts strictly above this need Director sign-off.
    pub const DIRECTOR_THRESHOLD: Decimal = Decimal::from_parts(5000, 0, 0, false, 0);

    /// Compute the ordered list of roles required for a base-currency amount.
    ///
    /// - amount ≤ 1000 → [Manager]
    /// - 1000 < amount ≤ 5000 → [Manager, Finance]
    /// - amount > 5000 → [Manager, Finance, Director]
    #[must_use]
    pub fn resolve(base_currency_amount: Decimal) -> Vec<UserRole> {
        if base_currency_amount > Self::DIRECTOR_THRESHOLD {
            vec![UserRole::Manager, UserRole::Finance, UserRole::Director]
        } else if base_currency_amount > Self::FINANCE_THRESHOLD {
            vec![UserRole::Manager, UserRole::Finance]
        } else {
            vec![UserRole::Manager]
        }
    }
}

/// Authorization rule for approving or rejecting an expense.
pub struct ApprovalPolicy;

impl ApprovalPolicy {
    /// Check whether `user` may approve or reject `expense`.
    ///
    /// - Admin may act on any expense in its account.
    /// - Manager may act on any expense in its account it does not own.
    /// - Every other role may never act.
    ///
    /// # Errors
    /// * `WorkflowError::AccountMismatch` if the expense lives in another account
    /// * `WorkflowError::NotAuthorizedToApprove` if the role may not act
    /// * `WorkflowError::CannotActOnOwnExpense` if a manager targets their own expense
    pub fn authorize(user: &User, expense: &Expense) -> Result<(), WorkflowError> {
        if user.account_id != expense.account_id {
            return Err(WorkflowError::AccountMismatch { user_id: user.id });
        }

        match user.role {
            UserRole::Admin => Ok(()),
            UserRole::Manager if expense.owner_user_id == user.id => {
                Err(WorkflowError::CannotActOnOwnExpense { user_id: user.id })
            }
            UserRole::Manager => Ok(()),
            role => Err(WorkflowError::NotAuthorizedToApprove {
                user_id: user.id,
                role,
            }),
        }
    }

    /// Boolean form of [`ApprovalPolicy::authorize`].
    #[must_use]
    pub fn can_act(user: &User, expense: &Expense) -> bool {
        Self::authorize(user, expense).is_ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::expense::test_support::pending_expense;
    use expensa_shared::types::{AccountId, UserId};
    use rstest::rstest;
    use rust_decimal_macros::dec;

    fn user(account_id: AccountId, role: UserRole) -> User {
        User {
            id: UserId::new(),
            account_id,
            name: "Test User".to_string(),
            email: "test@example.com".to_string(),
            role,
        }
    }

    #[test]
    fn test_user_role_parse() {
        assert_eq!(UserRole::parse("employee"), Some(UserRole::Employee));
        assert_eq!(UserRole::parse("MANAGER"), Some(UserRole::Manager));
        assert_eq!(UserRole::parse("Finance"), Some(UserRole::Finance));
        assert_eq!(UserRole::parse("director"), Some(UserRole::Director));
        assert_eq!(UserRole::parse("admin"), Some(UserRole::Admin));
        assert_eq!(UserRole::parse("owner"), None);
    }

    #[rstest]
    #[case(dec!(0), 1)]
    #[case(dec!(125.50), 1)]
    #[case(dec!(1000.00), 1)]
    #[case(dec!(1000.01), 2)]
    #[case(dec!(5000.00), 2)]
    #[case(dec!(5000.01), 3)]
    #[case(dec!(99999.99), 3)]
    fn test_resolve_chain_length(#[case] amount: Decimal, #[case] expected: usize) {
        assert_eq!(ApprovalChainResolver::resolve(amount).len(), expected);
    }

    #[test]
    fn test_resolve_boundaries() {
        assert_eq!(
            ApprovalChainResolver::resolve(dec!(1000.00)),
            vec![UserRole::Manager]
        );
        assert_eq!(
            ApprovalChainResolver::resolve(dec!(1000.01)),
            vec![UserRole::Manager, UserRole::Finance]
        );
        assert_eq!(
            ApprovalChainResolver::resolve(dec!(5000.00)),
            vec![UserRole::Manager, UserRole::Finance]
        );
        assert_eq!(
            ApprovalChainResolver::resolve(dec!(5000.01)),
            vec![UserRole::Manager, UserRole::Finance, UserRole::Director]
        );
    }

    #[test]
    fn test_manager_cannot_act_on_own_expense() {
        let account = AccountId::new();
        let manager = user(account, UserRole::Manager);
        let expense = pending_expense(account, manager.id, dec!(50));

        assert!(!ApprovalPolicy::can_act(&manager, &expense));
        assert!(matches!(
            ApprovalPolicy::authorize(&manager, &expense),
            Err(WorkflowError::CannotActOnOwnExpense { .. })
        ));
    }

    #[test]
    fn test_manager_can_act_on_others_expense() {
        let account = AccountId::new();
        let manager = user(account, UserRole::Manager);
        let expense = pending_expense(account, UserId::new(), dec!(9000));
        assert!(ApprovalPolicy::can_act(&manager, &expense));
    }

    #[test]
    fn test_admin_can_act_on_any_expense_including_own() {
        let account = AccountId::new();
        let admin = user(account, UserRole::Admin);
        let own = pending_expense(account, admin.id, dec!(50));
        let other = pending_expense(account, UserId::new(), dec!(50));
        assert!(ApprovalPolicy::can_act(&admin, &own));
        assert!(ApprovalPolicy::can_act(&admin, &other));
    }

    #[rstest]
    #[case(UserRole::Employee)]
    #[case(UserRole::Finance)]
    #[case(UserRole::Director)]
    fn test_other_roles_never_act(#[case] role: UserRole) {
        let account = AccountId::new();
        let actor = user(account, role);
        let expense = pending_expense(account, UserId::new(), dec!(6000));
        assert!(matches!(
            ApprovalPolicy::authorize(&actor, &expense),
            Err(WorkflowError::NotAuthorizedToApprove { .. })
        ));
    }

    #[test]
    fn test_admin_of_other_account_cannot_act() {
        let admin = user(AccountId::new(), UserRole::Admin);
        let expense = pending_expense(AccountId::new(), UserId::new(), dec!(50));
        assert!(matches!(
            ApprovalPolicy::authorize(&admin, &expense),
            Err(WorkflowError::AccountMismatch { .. })
        ));
    }
}

//! Builders shared by unit tests across the crate.

use chrono::{NaiveDate, Utc};
use expensa_shared::types::{AccountId, ExpenseId, UserId};
use rust_decimal::Decimal;

use crate::expense::Expense;
use crate::workflow::{ApprovalChainResolver, ExpenseStatus};

/// A pending USD expense with the given owner and base amount.
pub(crate) fn pending_expense(account_id: AccountId, owner: UserId, amount: Decimal) -> Expense {
    Expense {
        id: ExpenseId::new(),
        account_id,
        owner_user_id: owner,
        original_amount: amount,
        original_currency_code: "USD".to_string(),
        base_currency_amount: amount,
        base_currency_code: "USD".to_string(),
        category: "Office Supplies".to_string(),
        description: "Printer paper and toner".to_string(),
        expense_date: NaiveDate::from_ymd_opt(2024, 5, 2).unwrap(),
        ocr_confidence: None,
        approval_chain: ApprovalChainResolver::resolve(amount),
        status: ExpenseStatus::PendingApproval,
        submitted_at: Utc::now(),
        approved_by: None,
        approved_at: None,
        approval_comments: None,
        rejected_by: None,
        rejected_at: None,
        rejection_reason: None,
    }
}

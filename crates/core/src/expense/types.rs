//! Expense data types.

use chrono::{DateTime, NaiveDate, Utc};
use expensa_shared::types::{AccountId, ExpenseId, UserId};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::directory::User;
use crate::workflow::{ApprovalChainResolver, ExpenseStatus, UserRole, WorkflowAction};

/// Raw expense input as collected from a form or a receipt scan.
///
/// Every field is kept as entered so the validator can report all
/// problems at once.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExpenseDraft {
    /// Amount in the original currency, as typed. JSON numbers are taken
    /// as their decimal text.
    #[serde(default, deserialize_with = "amount_text")]
    pub amount: Option<String>,
    /// Original currency code.
    #[serde(default)]
    pub currency_code: String,
    /// Category name.
    pub category: Option<String>,
    /// Free-text description.
    pub description: Option<String>,
    /// Expense date as `YYYY-MM-DD`.
    pub expense_date: Option<String>,
    /// Confidence reported by receipt extraction, 0-100.
    #[serde(default)]
    pub ocr_confidence: Option<i64>,
}

/// An amount as it arrives over the wire.
#[derive(Deserialize)]
#[serde(untagged)]
enum RawAmount {
    Text(String),
    Number(Decimal),
}

fn amount_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Ok(
        Option::<RawAmount>::deserialize(deserializer)?.map(|raw| match raw {
            RawAmount::Text(text) => text,
            RawAmount::Number(number) => number.to_string(),
        }),
    )
}

/// A draft that passed validation, with every field parsed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedExpense {
    /// Amount in the original currency.
    pub amount: Decimal,
    /// Normalized (uppercase) original currency code.
    pub currency_code: String,
    /// Known category name.
    pub category: String,
    /// Trimmed description.
    pub description: String,
    /// Date the expense was incurred.
    pub expense_date: NaiveDate,
    /// Receipt extraction confidence.
    pub ocr_confidence: Option<u8>,
}

/// A submitted expense.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Expense {
    /// Expense ID, time-ordered.
    pub id: ExpenseId,
    /// Owning account.
    pub account_id: AccountId,
    /// User who submitted the expense.
    pub owner_user_id: UserId,
    /// Amount as submitted.
    pub original_amount: Decimal,
    /// Currency of `original_amount`.
    pub original_currency_code: String,
    /// Amount in the account's base currency at submission time.
    pub base_currency_amount: Decimal,
    /// The account's base currency code.
    pub base_currency_code: String,
    /// Category name.
    pub category: String,
    /// Description.
    pub description: String,
    /// Date the expense was incurred.
    pub expense_date: NaiveDate,
    /// Receipt extraction confidence, if the draft came from a scan.
    pub ocr_confidence: Option<u8>,
    /// Roles required to sign off, derived from `base_currency_amount`.
    pub approval_chain: Vec<UserRole>,
    /// Lifecycle status.
    pub status: ExpenseStatus,
    /// Submission timestamp.
    pub submitted_at: DateTime<Utc>,
    /// Approver, once approved.
    pub approved_by: Option<UserId>,
    /// Approval timestamp.
    pub approved_at: Option<DateTime<Utc>>,
    /// Approver comments.
    pub approval_comments: Option<String>,
    /// Rejecter, once rejected.
    pub rejected_by: Option<UserId>,
    /// Rejection timestamp.
    pub rejected_at: Option<DateTime<Utc>>,
    /// Rejection reason.
    pub rejection_reason: Option<String>,
}

impl Expense {
    /// Builds a new pending expense for `owner`.
    ///
    /// The approval chain is resolved from `base_currency_amount` here and
    /// never changes afterwards.
    #[must_use]
    pub fn pending(
        owner: &User,
        input: ValidatedExpense,
        base_currency_amount: Decimal,
        base_currency_code: &str,
        submitted_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: ExpenseId::new(),
            account_id: owner.account_id,
            owner_user_id: owner.id,
            original_amount: input.amount,
            original_currency_code: input.currency_code,
            base_currency_amount,
            base_currency_code: base_currency_code.to_string(),
            category: input.category,
            description: input.description,
            expense_date: input.expense_date,
            ocr_confidence: input.ocr_confidence,
            approval_chain: ApprovalChainResolver::resolve(base_currency_amount),
            status: ExpenseStatus::PendingApproval,
            submitted_at,
            approved_by: None,
            approved_at: None,
            approval_comments: None,
            rejected_by: None,
            rejected_at: None,
            rejection_reason: None,
        }
    }

    /// Returns true if `user` may see this expense.
    ///
    /// Employees see their own expenses; every other role sees the whole
    /// account.
    #[must_use]
    pub fn is_visible_to(&self, user: &User) -> bool {
        self.account_id == user.account_id
            && (user.role.sees_whole_account() || self.owner_user_id == user.id)
    }

    /// Writes the status and audit fields of `action`.
    ///
    /// Callers must have checked the transition first.
    pub fn apply(&mut self, action: &WorkflowAction) {
        self.status = action.new_status();
        match action {
            WorkflowAction::Approve {
                approved_by,
                approved_at,
                comments,
            } => {
                self.approved_by = Some(*approved_by);
                self.approved_at = Some(*approved_at);
                self.approval_comments.clone_from(comments);
            }
            WorkflowAction::Reject {
                rejected_by,
                rejected_at,
                reason,
            } => {
                self.rejected_by = Some(*rejected_by);
                self.rejected_at = Some(*rejected_at);
                self.rejection_reason = Some(reason.clone());
            }
        }
    }
}

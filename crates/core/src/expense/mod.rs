//! Expense records and submission validation.
//!
//! # Modules
//!
//! - `types` - Expense, drafts and validated input
//! - `validation` - Field and business-rule checks collecting every violation

pub mod types;
pub mod validation;

#[cfg(test)]
pub(crate) mod test_support;

#[cfg(test)]
mod validation_props;

pub use types::{Expense, ExpenseDraft, ValidatedExpense};
pub use validation::{ExpenseValidator, Violation};

//! Entity re-exports.

pub use super::accounts::Entity as Accounts;
pub use super::categories::Entity as Categories;
pub use super::expenses::Entity as Expenses;
pub use super::users::Entity as Users;

//! Accounts, users, categories and sessions.
//!
//! Every ledger operation runs inside an explicit [`Session`] naming the
//! acting user and the account they belong to.

pub mod service;
pub mod session;
pub mod types;

pub use service::{Directory, NewUser, SignUp};
pub use session::Session;
pub use types::{Account, Category, User, DEFAULT_CATEGORIES};

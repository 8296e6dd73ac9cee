//! Per-account expense storage and the operations that mutate it.
//!
//! This module implements:
//! - The `ExpenseStore` abstraction selected once at start-up
//! - An in-memory store with a demo fixture
//! - The `ExpenseLedger` service: submit, approve, reject and read projections
//! - Error types for ledger operations

pub mod demo;
pub mod error;
pub mod memory;
pub mod service;
pub mod store;
pub mod types;


pub use error::LedgerError;
pub use memory::InMemoryStore;
pub use service::ExpenseLedger;
pub use store::{ExpenseStore, StoreError, StoreResult, TransitionOutcome};
pub use types::{CategoryTotal, ExpenseFilter, ExpenseSummary, StatusTotal};

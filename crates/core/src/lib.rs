//! Core business logic for Expensa.
//!
//! This crate contains pure business logic with ZERO web or database dependencies.
//! All domain types, validation rules, and calculations live here.
//!
//! # Modules
//!
//! - `currency` - Rate tables and base-currency normalization
//! - `receipt` - Receipt text extraction with a simulated fallback
//! - `expense` - Expense records and submission validation
//! - `workflow` - Approval chains, authorization and status transitions
//! - `directory` - Accounts, users, categories and sessions
//! - `ledger` - Per-account expense storage and read projections
//! - `providers` - Cached, time-bounded access to external data sources

pub mod currency;
pub mod directory;
pub mod expense;
pub mod ledger;
pub mod providers;
pub mod receipt;
pub mod workflow;

//! Database layer with `SeaORM` entities, migrations and the persistent
//! expense store.
//!
//! This crate provides:
//! - `SeaORM` entity definitions
//! - Database migrations
//! - [`DbExpenseStore`], the database-backed `ExpenseStore`

pub mod entities;
pub mod migration;
pub mod store;


pub use store::DbExpenseStore;

use sea_orm::{Database, DatabaseConnection, DbErr};
use sea_orm_migration::MigratorTrait;

/// Establishes a connection to the database.
///
/// # Errors
///
/// Returns an error if the connection cannot be established.
pub async fn connect(database_url: &str) -> Result<DatabaseConnection, DbErr> {
    Database::connect(database_url).await
}

/// Connects and applies pending migrations.
///
/// # Errors
///
/// Returns an error if the connection or a migration fails.
pub async fn connect_and_migrate(database_url: &str) -> Result<DatabaseConnection, DbErr> {
    let db = connect(database_url).await?;
    migration::Migrator::up(&db, None).await?;
    Ok(db)
}

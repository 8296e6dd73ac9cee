//! Initial database migration.
//!
//! Creates the account, user, category and expense tables. The SQL sticks
//! to types both PostgreSQL and SQLite accept, so the same migration backs
//! production and the in-memory test database.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();
        for statement in UP_SQL {
            db.execute_unprepared(statement).await?;
        }
        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();
        for table in ["expenses", "categories", "users", "accounts"] {
            db.execute_unprepared(&format!("DROP TABLE IF EXISTS {table};"))
                .await?;
        }
        Ok(())
    }
}

// ============================================================
// SQL CONSTANTS
// ============================================================

const UP_SQL: [&str; 9] = [
    ACCOUNTS_SQL,
    USERS_SQL,
    USERS_EMAIL_INDEX_SQL,
    USERS_ACCOUNT_INDEX_SQL,
    CATEGORIES_SQL,
    CATEGORIES_NAME_INDEX_SQL,
    EXPENSES_SQL,
    EXPENSES_ACCOUNT_INDEX_SQL,
    EXPENSES_OWNER_INDEX_SQL,
];

const ACCOUNTS_SQL: &str = r"
CREATE TABLE accounts (
    id UUID PRIMARY KEY,
    company_name VARCHAR(200) NOT NULL,
    base_currency_code VARCHAR(3) NOT NULL,
    created_at TIMESTAMPTZ NOT NULL
);
";

const USERS_SQL: &str = r"
CREATE TABLE users (
    id UUID PRIMARY KEY,
    account_id UUID NOT NULL REFERENCES accounts(id) ON DELETE CASCADE,
    name VARCHAR(200) NOT NULL,
    email VARCHAR(320) NOT NULL,
    role VARCHAR(16) NOT NULL
        CHECK (role IN ('employee', 'manager', 'finance', 'director', 'admin'))
);
";

// Emails are unique across all accounts, ignoring case.
const USERS_EMAIL_INDEX_SQL: &str =
    "CREATE UNIQUE INDEX idx_users_email ON users (lower(email));";

const USERS_ACCOUNT_INDEX_SQL: &str = "CREATE INDEX idx_users_account ON users (account_id);";

const CATEGORIES_SQL: &str = r"
CREATE TABLE categories (
    id UUID PRIMARY KEY,
    account_id UUID NOT NULL REFERENCES accounts(id) ON DELETE CASCADE,
    name VARCHAR(100) NOT NULL,
    monthly_budget NUMERIC(19, 4) NOT NULL
);
";

const CATEGORIES_NAME_INDEX_SQL: &str =
    "CREATE UNIQUE INDEX idx_categories_account_name ON categories (account_id, name);";

const EXPENSES_SQL: &str = r"
CREATE TABLE expenses (
    id UUID PRIMARY KEY,
    account_id UUID NOT NULL REFERENCES accounts(id) ON DELETE CASCADE,
    owner_user_id UUID NOT NULL REFERENCES users(id),
    original_amount NUMERIC(19, 4) NOT NULL,
    original_currency_code VARCHAR(3) NOT NULL,
    base_currency_amount NUMERIC(19, 4) NOT NULL,
    base_currency_code VARCHAR(3) NOT NULL,
    category VARCHAR(100) NOT NULL,
    description TEXT NOT NULL,
    expense_date DATE NOT NULL,
    ocr_confidence SMALLINT CHECK (ocr_confidence BETWEEN 0 AND 100),
    approval_chain JSONB NOT NULL,
    status VARCHAR(24) NOT NULL DEFAULT 'pending_approval'
        CHECK (status IN ('pending_approval', 'approved', 'rejected')),
    submitted_at TIMESTAMPTZ NOT NULL,
    approved_by UUID REFERENCES users(id),
    approved_at TIMESTAMPTZ,
    approval_comments TEXT,
    rejected_by UUID REFERENCES users(id),
    rejected_at TIMESTAMPTZ,
    rejection_reason TEXT
);
";

const EXPENSES_ACCOUNT_INDEX_SQL: &str =
    "CREATE INDEX idx_expenses_account ON expenses (account_id, id);";

const EXPENSES_OWNER_INDEX_SQL: &str =
    "CREATE INDEX idx_expenses_owner ON expenses (owner_user_id);";

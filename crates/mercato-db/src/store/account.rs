//! # Account Repository
//!
//! Database operations for customer accounts.
//!
//! ## Duplicate Detection
//! Registration must report `DuplicateIdentity` BEFORE any write, so the
//! repository exposes explicit existence checks (`username_exists`,
//! `customer_id_exists`) that the service calls ahead of `insert`. The
//! UNIQUE constraints on the table remain the backstop for two
//! registrations racing between the check and the insert.

use chrono::{DateTime, Utc};
use sqlx::PgPool;
use tracing::debug;

use crate::error::DbResult;
use mercato_core::Account;

/// Row type for the accounts table.
#[derive(Debug, sqlx::FromRow)]
struct AccountRow {
    id: String,
    customer_id: String,
    username: String,
    password_hash: String,
    created_at: DateTime<Utc>,
}

impl From<AccountRow> for Account {
    fn from(row: AccountRow) -> Self {
        Account {
            id: row.id,
            customer_id: row.customer_id,
            username: row.username,
            password_hash: row.password_hash,
            created_at: row.created_at,
        }
    }
}

/// Repository for account database operations.
#[derive(Debug, Clone)]
pub struct AccountRepository {
    pool: PgPool,
}

impl AccountRepository {
    /// Creates a new AccountRepository.
    pub fn new(pool: PgPool) -> Self {
        AccountRepository { pool }
    }

    /// Checks whether a login name is already taken.
    pub async fn username_exists(&self, username: &str) -> DbResult<bool> {
        let exists: bool = sqlx::query_scalar(
            r#"
            SELECT EXISTS(SELECT 1 FROM accounts WHERE username = $1)
            "#,
        )
        .bind(username)
        .fetch_one(&self.pool)
        .await?;

        Ok(exists)
    }

    /// Checks whether a public customer id is already taken.
    pub async fn customer_id_exists(&self, customer_id: &str) -> DbResult<bool> {
        let exists: bool = sqlx::query_scalar(
            r#"
            SELECT EXISTS(SELECT 1 FROM accounts WHERE customer_id = $1)
            "#,
        )
        .bind(customer_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(exists)
    }

    /// Inserts a new account.
    pub async fn insert(&self, account: &Account) -> DbResult<()> {
        debug!(username = %account.username, "Inserting account");

        sqlx::query(
            r#"
            INSERT INTO accounts (id, customer_id, username, password_hash, created_at)
            VALUES ($1, $2, $3, $4, $5)
            "#,
        )
        .bind(&account.id)
        .bind(&account.customer_id)
        .bind(&account.username)
        .bind(&account.password_hash)
        .bind(account.created_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Looks up an account by login name.
    pub async fn find_by_username(&self, username: &str) -> DbResult<Option<Account>> {
        let row = sqlx::query_as::<_, AccountRow>(
            r#"
            SELECT id, customer_id, username, password_hash, created_at
            FROM accounts
            WHERE username = $1
            "#,
        )
        .bind(username)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(Account::from))
    }
}

//! PostgreSQL backend: table DDL, database bootstrap, and the store implementations.

use super::{AccountStore, MessageStore};
use crate::error::{AppError, ConfigError};
use crate::model::{Account, Message};
use async_trait::async_trait;
use sqlx::postgres::{PgConnectOptions, PgConnection};
use sqlx::{ConnectOptions, PgPool};
use std::str::FromStr;

const ACCOUNT_COLUMNS: &str = "account_id, username, password";
const MESSAGE_COLUMNS: &str = "message_id, posted_by, message_text, time_posted_epoch";
const MAINTENANCE_DATABASE: &str = "postgres";

/// Create the `account` and `message` tables if they do not exist.
/// Username uniqueness and the poster foreign key are enforced by the schema.
pub async fn ensure_tables(pool: &PgPool) -> Result<(), AppError> {
    let account_ddl = r#"
        CREATE TABLE IF NOT EXISTS account (
            account_id SERIAL PRIMARY KEY,
            username TEXT NOT NULL UNIQUE,
            password TEXT NOT NULL
        )
    "#;
    sqlx::query(account_ddl).execute(pool).await?;

    let message_ddl = r#"
        CREATE TABLE IF NOT EXISTS message (
            message_id SERIAL PRIMARY KEY,
            posted_by INTEGER NOT NULL REFERENCES account (account_id),
            message_text VARCHAR(255) NOT NULL,
            time_posted_epoch BIGINT NOT NULL
        )
    "#;
    sqlx::query(message_ddl).execute(pool).await?;

    sqlx::query("CREATE INDEX IF NOT EXISTS message_posted_by_idx ON message (posted_by)")
        .execute(pool)
        .await?;
    Ok(())
}

/// Create the target database of `database_url` when it is missing.
///
/// The check and the CREATE DATABASE run over a single connection to the server's
/// `postgres` maintenance database, since the target cannot be connected to yet.
/// A URL without a database name, or one naming `postgres`, needs no bootstrap.
pub async fn ensure_database_exists(database_url: &str) -> Result<(), AppError> {
    let (maintenance, target) = bootstrap_target(database_url)?;
    let Some(target) = target else {
        return Ok(());
    };
    let mut conn: PgConnection = maintenance.connect().await?;
    let (present,): (bool,) = sqlx::query_as("SELECT EXISTS(SELECT 1 FROM pg_database WHERE datname = $1)")
        .bind(&target)
        .fetch_one(&mut conn)
        .await?;
    if present {
        tracing::debug!(database = %target, "database present");
    } else {
        tracing::info!(database = %target, "creating database");
        sqlx::query(&format!("CREATE DATABASE {}", quote_ident(&target)))
            .execute(&mut conn)
            .await?;
    }
    Ok(())
}

/// Split `database_url` into connect options for the `postgres` maintenance database
/// and the name of the database the pool will use. Host, credentials and query
/// parameters carry over to the maintenance options unchanged.
fn bootstrap_target(database_url: &str) -> Result<(PgConnectOptions, Option<String>), ConfigError> {
    let options = PgConnectOptions::from_str(database_url).map_err(|e| ConfigError::DatabaseUrl(e.to_string()))?;
    let target = options
        .get_database()
        .map(str::trim)
        .filter(|name| !name.is_empty() && *name != MAINTENANCE_DATABASE)
        .map(str::to_string);
    Ok((options.database(MAINTENANCE_DATABASE), target))
}

fn quote_ident(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}

/// Account and message storage on a shared connection pool.
#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        PgStore { pool }
    }
}

#[async_trait]
impl AccountStore for PgStore {
    async fn list_accounts(&self) -> Result<Vec<Account>, AppError> {
        let sql = format!("SELECT {} FROM account ORDER BY account_id", ACCOUNT_COLUMNS);
        tracing::debug!(sql = %sql, "query");
        let rows = sqlx::query_as::<_, Account>(&sql).fetch_all(&self.pool).await?;
        Ok(rows)
    }

    async fn insert_account(&self, username: &str, password: &str) -> Result<Option<Account>, AppError> {
        let sql = format!(
            "INSERT INTO account (username, password) VALUES ($1, $2) ON CONFLICT (username) DO NOTHING RETURNING {}",
            ACCOUNT_COLUMNS
        );
        tracing::debug!(sql = %sql, username = %username, "query");
        let row = sqlx::query_as::<_, Account>(&sql)
            .bind(username)
            .bind(password)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    async fn account_by_id(&self, account_id: i32) -> Result<Option<Account>, AppError> {
        let sql = format!("SELECT {} FROM account WHERE account_id = $1", ACCOUNT_COLUMNS);
        tracing::debug!(sql = %sql, account_id, "query");
        let row = sqlx::query_as::<_, Account>(&sql)
            .bind(account_id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    async fn account_by_username(&self, username: &str) -> Result<Option<Account>, AppError> {
        let sql = format!("SELECT {} FROM account WHERE username = $1", ACCOUNT_COLUMNS);
        tracing::debug!(sql = %sql, username = %username, "query");
        let row = sqlx::query_as::<_, Account>(&sql)
            .bind(username)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    async fn ping(&self) -> Result<(), AppError> {
        sqlx::query("SELECT 1").fetch_optional(&self.pool).await?;
        Ok(())
    }
}

#[async_trait]
impl MessageStore for PgStore {
    async fn insert_message(
        &self,
        posted_by: i32,
        message_text: &str,
        time_posted_epoch: i64,
    ) -> Result<Option<Message>, AppError> {
        let sql = format!(
            r#"
            INSERT INTO message (posted_by, message_text, time_posted_epoch)
            SELECT $1::INTEGER, $2::TEXT, $3::BIGINT
            WHERE EXISTS (SELECT 1 FROM account WHERE account_id = $1::INTEGER)
            RETURNING {}
            "#,
            MESSAGE_COLUMNS
        );
        tracing::debug!(sql = %sql, posted_by, "query");
        let row = sqlx::query_as::<_, Message>(&sql)
            .bind(posted_by)
            .bind(message_text)
            .bind(time_posted_epoch)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    async fn list_messages(&self) -> Result<Vec<Message>, AppError> {
        let sql = format!("SELECT {} FROM message ORDER BY message_id", MESSAGE_COLUMNS);
        tracing::debug!(sql = %sql, "query");
        let rows = sqlx::query_as::<_, Message>(&sql).fetch_all(&self.pool).await?;
        Ok(rows)
    }

    async fn message_by_id(&self, message_id: i32) -> Result<Option<Message>, AppError> {
        let sql = format!("SELECT {} FROM message WHERE message_id = $1", MESSAGE_COLUMNS);
        tracing::debug!(sql = %sql, message_id, "query");
        let row = sqlx::query_as::<_, Message>(&sql)
            .bind(message_id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    async fn delete_message(&self, message_id: i32) -> Result<Option<Message>, AppError> {
        let sql = format!("DELETE FROM message WHERE message_id = $1 RETURNING {}", MESSAGE_COLUMNS);
        tracing::debug!(sql = %sql, message_id, "query");
        let row = sqlx::query_as::<_, Message>(&sql)
            .bind(message_id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    async fn replace_message_text(&self, message_id: i32, message_text: &str) -> Result<Option<Message>, AppError> {
        let sql = format!(
            "UPDATE message SET message_text = $2 WHERE message_id = $1 RETURNING {}",
            MESSAGE_COLUMNS
        );
        tracing::debug!(sql = %sql, message_id, "query");
        let row = sqlx::query_as::<_, Message>(&sql)
            .bind(message_id)
            .bind(message_text)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    async fn list_messages_by_account(&self, account_id: i32) -> Result<Vec<Message>, AppError> {
        let sql = format!(
            "SELECT {} FROM message WHERE posted_by = $1 ORDER BY message_id",
            MESSAGE_COLUMNS
        );
        tracing::debug!(sql = %sql, account_id, "query");
        let rows = sqlx::query_as::<_, Message>(&sql)
            .bind(account_id)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }
}

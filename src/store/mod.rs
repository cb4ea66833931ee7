//! Storage contracts for accounts and messages, with PostgreSQL and in-memory backends.
//!
//! Every method is a single atomic operation. Existence and uniqueness are decided
//! by the statement itself (conflict, conditional insert, affected row), never by a
//! separate read beforehand.

mod memory;
mod postgres;

pub use memory::MemoryStore;
pub use postgres::{ensure_database_exists, ensure_tables, PgStore};

use crate::error::AppError;
use crate::model::{Account, Message};
use async_trait::async_trait;

#[async_trait]
pub trait AccountStore: Send + Sync {
    /// All accounts, ordered by id.
    async fn list_accounts(&self) -> Result<Vec<Account>, AppError>;

    /// Insert a new account. Returns `None` when the username is already taken.
    async fn insert_account(&self, username: &str, password: &str) -> Result<Option<Account>, AppError>;

    async fn account_by_id(&self, account_id: i32) -> Result<Option<Account>, AppError>;

    async fn account_by_username(&self, username: &str) -> Result<Option<Account>, AppError>;

    /// Cheap round trip to the backing storage, used by readiness checks.
    async fn ping(&self) -> Result<(), AppError>;
}

#[async_trait]
pub trait MessageStore: Send + Sync {
    /// Insert a message if `posted_by` references an existing account. `None` otherwise.
    async fn insert_message(
        &self,
        posted_by: i32,
        message_text: &str,
        time_posted_epoch: i64,
    ) -> Result<Option<Message>, AppError>;

    /// All messages, ordered by id.
    async fn list_messages(&self) -> Result<Vec<Message>, AppError>;

    async fn message_by_id(&self, message_id: i32) -> Result<Option<Message>, AppError>;

    /// Delete by id. Returns the row as it was before deletion, or `None` if nothing matched.
    async fn delete_message(&self, message_id: i32) -> Result<Option<Message>, AppError>;

    /// Replace `message_text` in place. Returns the updated row, or `None` if nothing matched.
    async fn replace_message_text(&self, message_id: i32, message_text: &str) -> Result<Option<Message>, AppError>;

    async fn list_messages_by_account(&self, account_id: i32) -> Result<Vec<Message>, AppError>;
}

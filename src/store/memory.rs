//! In-process backend with the same semantics as the PostgreSQL one.
//! Ids are handed out from 1 upward and never reused, like a SERIAL column.

use super::{AccountStore, MessageStore};
use crate::error::AppError;
use crate::model::{Account, Message};
use async_trait::async_trait;
use std::collections::BTreeMap;
use std::sync::Arc;
use tokio::sync::RwLock;

#[derive(Default)]
struct Tables {
    accounts: BTreeMap<i32, Account>,
    messages: BTreeMap<i32, Message>,
    last_account_id: i32,
    last_message_id: i32,
}

/// Shared, cloneable store. Each operation holds the lock for its whole duration,
/// so check-and-write sequences inside one call are atomic.
#[derive(Clone, Default)]
pub struct MemoryStore {
    tables: Arc<RwLock<Tables>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl AccountStore for MemoryStore {
    async fn list_accounts(&self) -> Result<Vec<Account>, AppError> {
        let tables = self.tables.read().await;
        Ok(tables.accounts.values().cloned().collect())
    }

    async fn insert_account(&self, username: &str, password: &str) -> Result<Option<Account>, AppError> {
        let mut tables = self.tables.write().await;
        if tables.accounts.values().any(|a| a.username == username) {
            return Ok(None);
        }
        tables.last_account_id += 1;
        let account = Account {
            account_id: tables.last_account_id,
            username: username.to_string(),
            password: password.to_string(),
        };
        tables.accounts.insert(account.account_id, account.clone());
        Ok(Some(account))
    }

    async fn account_by_id(&self, account_id: i32) -> Result<Option<Account>, AppError> {
        let tables = self.tables.read().await;
        Ok(tables.accounts.get(&account_id).cloned())
    }

    async fn account_by_username(&self, username: &str) -> Result<Option<Account>, AppError> {
        let tables = self.tables.read().await;
        Ok(tables.accounts.values().find(|a| a.username == username).cloned())
    }

    async fn ping(&self) -> Result<(), AppError> {
        Ok(())
    }
}

#[async_trait]
impl MessageStore for MemoryStore {
    async fn insert_message(
        &self,
        posted_by: i32,
        message_text: &str,
        time_posted_epoch: i64,
    ) -> Result<Option<Message>, AppError> {
        let mut tables = self.tables.write().await;
        if !tables.accounts.contains_key(&posted_by) {
            return Ok(None);
        }
        tables.last_message_id += 1;
        let message = Message {
            message_id: tables.last_message_id,
            posted_by,
            message_text: message_text.to_string(),
            time_posted_epoch,
        };
        tables.messages.insert(message.message_id, message.clone());
        Ok(Some(message))
    }

    async fn list_messages(&self) -> Result<Vec<Message>, AppError> {
        let tables = self.tables.read().await;
        Ok(tables.messages.values().cloned().collect())
    }

    async fn message_by_id(&self, message_id: i32) -> Result<Option<Message>, AppError> {
        let tables = self.tables.read().await;
        Ok(tables.messages.get(&message_id).cloned())
    }

    async fn delete_message(&self, message_id: i32) -> Result<Option<Message>, AppError> {
        let mut tables = self.tables.write().await;
        Ok(tables.messages.remove(&message_id))
    }

    async fn replace_message_text(&self, message_id: i32, message_text: &str) -> Result<Option<Message>, AppError> {
        let mut tables = self.tables.write().await;
        Ok(tables.messages.get_mut(&message_id).map(|m| {
            m.message_text = message_text.to_string();
            m.clone()
        }))
    }

    async fn list_messages_by_account(&self, account_id: i32) -> Result<Vec<Message>, AppError> {
        let tables = self.tables.read().await;
        Ok(tables
            .messages
            .values()
            .filter(|m| m.posted_by == account_id)
            .cloned()
            .collect())
    }
}

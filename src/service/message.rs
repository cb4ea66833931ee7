//! Message creation, retrieval, text replacement and deletion.

use crate::error::{AppError, Rejection};
use crate::model::{Message, NewMessage};
use crate::service::account::AccountService;
use crate::service::validation::validate_message_text;
use crate::store::MessageStore;
use std::sync::Arc;

#[derive(Clone)]
pub struct MessageService {
    store: Arc<dyn MessageStore>,
    accounts: AccountService,
}

impl MessageService {
    pub fn new(store: Arc<dyn MessageStore>, accounts: AccountService) -> Self {
        MessageService { store, accounts }
    }

    /// Create a message for `new.posted_by`.
    ///
    /// The poster must exist, whatever the text. When the caller identified itself
    /// (`acting_account`), it must be the poster. The insert re-checks the poster
    /// atomically, so an account vanishing in between still yields `UnknownPoster`.
    pub async fn create(&self, new: &NewMessage, acting_account: Option<i32>) -> Result<Message, AppError> {
        if !self.accounts.account_exists(new.posted_by).await? {
            return Err(Rejection::UnknownPoster.into());
        }
        if let Some(acting) = acting_account {
            if acting != new.posted_by {
                tracing::warn!(acting, posted_by = new.posted_by, "message posted on behalf of another account");
                return Err(AppError::Unauthorized);
            }
        }
        let text = validate_message_text(new.message_text.as_deref())?;
        let message = self
            .store
            .insert_message(new.posted_by, text, new.time_posted_epoch)
            .await?
            .ok_or(Rejection::UnknownPoster)?;
        tracing::info!(message_id = message.message_id, posted_by = message.posted_by, "message created");
        Ok(message)
    }

    pub async fn get_all(&self) -> Result<Vec<Message>, AppError> {
        self.store.list_messages().await
    }

    pub async fn get_by_id(&self, message_id: i32) -> Result<Option<Message>, AppError> {
        self.store.message_by_id(message_id).await
    }

    /// Deleting an id that does not exist is not an error; it yields `None`.
    pub async fn delete_by_id(&self, message_id: i32) -> Result<Option<Message>, AppError> {
        let deleted = self.store.delete_message(message_id).await?;
        if deleted.is_some() {
            tracing::info!(message_id, "message deleted");
        }
        Ok(deleted)
    }

    /// Replace the text of an existing message. `None` when no message has that id.
    pub async fn update_text(&self, message_id: i32, new_text: Option<&str>) -> Result<Option<Message>, AppError> {
        let text = validate_message_text(new_text)?;
        self.store.replace_message_text(message_id, text).await
    }

    pub async fn list_by_account(&self, account_id: i32) -> Result<Vec<Message>, AppError> {
        self.store.list_messages_by_account(account_id).await
    }
}

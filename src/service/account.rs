//! Account registration and credential checks.

use crate::error::{AppError, Rejection};
use crate::model::Account;
use crate::service::validation::{validate_password, validate_username};
use crate::store::AccountStore;
use std::sync::Arc;

#[derive(Clone)]
pub struct AccountService {
    store: Arc<dyn AccountStore>,
}

impl AccountService {
    pub fn new(store: Arc<dyn AccountStore>) -> Self {
        AccountService { store }
    }

    /// Validate and create an account. Cheap field checks run before touching storage;
    /// uniqueness is decided by the insert itself.
    pub async fn register(&self, username: Option<&str>, password: Option<&str>) -> Result<Account, AppError> {
        let username = validate_username(username)?;
        let password = validate_password(password)?;
        let account = self
            .store
            .insert_account(username, password)
            .await?
            .ok_or(Rejection::DuplicateUsername)?;
        tracing::info!(account_id = account.account_id, username = %account.username, "account registered");
        Ok(account)
    }

    /// Returns the account whose username and password both match exactly.
    pub async fn authenticate(&self, username: &str, password: &str) -> Result<Account, AppError> {
        match self.store.account_by_username(username).await? {
            Some(account) if account.password == password => Ok(account),
            _ => Err(AppError::Unauthorized),
        }
    }

    pub async fn list_accounts(&self) -> Result<Vec<Account>, AppError> {
        self.store.list_accounts().await
    }

    pub async fn account_exists(&self, account_id: i32) -> Result<bool, AppError> {
        Ok(self.store.account_by_id(account_id).await?.is_some())
    }

    pub async fn ping(&self) -> Result<(), AppError> {
        self.store.ping().await
    }
}

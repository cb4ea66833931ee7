//! Shared application state for all routes.

use crate::service::{AccountService, MessageService};
use crate::store::{AccountStore, MessageStore};
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub accounts: AccountService,
    pub messages: MessageService,
}

impl AppState {
    /// Wire both services over one backend that stores accounts and messages.
    pub fn new<S>(store: Arc<S>) -> Self
    where
        S: AccountStore + MessageStore + 'static,
    {
        let accounts = AccountService::new(store.clone());
        let messages = MessageService::new(store, accounts.clone());
        AppState { accounts, messages }
    }
}

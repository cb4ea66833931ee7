//! Persisted entities and request payloads.

use serde::{Deserialize, Serialize};

/// Row of the `account` table.
#[derive(sqlx::FromRow, Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct Account {
    pub account_id: i32,
    pub username: String,
    pub password: String,
}

/// Row of the `message` table. `time_posted_epoch` is supplied by the caller.
#[derive(sqlx::FromRow, Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct Message {
    pub message_id: i32,
    pub posted_by: i32,
    pub message_text: String,
    pub time_posted_epoch: i64,
}

/// Body of POST /register. Missing fields are kept as `None` so the logic layer
/// can reject them with a specific reason.
#[derive(Deserialize, Clone, Debug, Default)]
pub struct NewAccount {
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
}

/// Body of POST /login.
#[derive(Deserialize, Clone, Debug, Default)]
pub struct Credentials {
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
}

/// Body of POST /messages. An absent `posted_by` reads as 0, which never matches an account.
#[derive(Deserialize, Clone, Debug, Default)]
pub struct NewMessage {
    #[serde(default)]
    pub posted_by: i32,
    #[serde(default)]
    pub message_text: Option<String>,
    #[serde(default)]
    pub time_posted_epoch: i64,
}

/// Body of PATCH /messages/:message_id. Only `message_text` is read.
#[derive(Deserialize, Clone, Debug, Default)]
pub struct MessageTextPatch {
    #[serde(default)]
    pub message_text: Option<String>,
}

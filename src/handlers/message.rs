//! Message handlers: create, list, read, update, delete, list by account.

use super::parse_id;
use crate::error::AppError;
use crate::extractors::AccountContext;
use crate::model::{MessageTextPatch, NewMessage};
use crate::response::{ok_many, ok_one, ok_optional};
use crate::state::AppState;
use axum::{
    extract::{rejection::JsonRejection, Path, State},
    Json,
};

/// POST /messages
pub async fn create_message(
    State(state): State<AppState>,
    AccountContext(acting): AccountContext,
    payload: Result<Json<NewMessage>, JsonRejection>,
) -> Result<impl axum::response::IntoResponse, AppError> {
    let Json(body) = payload?;
    let message = state
        .messages
        .create(&body, acting)
        .await
        .inspect_err(|e| tracing::warn!(error = %e, posted_by = body.posted_by, "message rejected"))?;
    Ok(ok_one(message))
}

/// GET /messages
pub async fn list_messages(State(state): State<AppState>) -> Result<impl axum::response::IntoResponse, AppError> {
    Ok(ok_many(state.messages.get_all().await?))
}

/// GET /messages/:message_id: empty 200 when the id is unknown.
pub async fn read_message(
    State(state): State<AppState>,
    Path(id_str): Path<String>,
) -> Result<impl axum::response::IntoResponse, AppError> {
    let id = parse_id(&id_str)?;
    Ok(ok_optional(state.messages.get_by_id(id).await?))
}

/// DELETE /messages/:message_id: always 200; body is the deleted message if there was one.
pub async fn delete_message(
    State(state): State<AppState>,
    Path(id_str): Path<String>,
) -> Result<impl axum::response::IntoResponse, AppError> {
    let id = parse_id(&id_str)?;
    Ok(ok_optional(state.messages.delete_by_id(id).await?))
}

/// PATCH /messages/:message_id: an unknown id is a client error.
pub async fn update_message(
    State(state): State<AppState>,
    Path(id_str): Path<String>,
    payload: Result<Json<MessageTextPatch>, JsonRejection>,
) -> Result<impl axum::response::IntoResponse, AppError> {
    let id = parse_id(&id_str)?;
    let Json(body) = payload?;
    let message = state
        .messages
        .update_text(id, body.message_text.as_deref())
        .await?
        .ok_or_else(|| AppError::BadRequest(format!("message not found: {}", id)))?;
    Ok(ok_one(message))
}

/// GET /accounts/:account_id/messages
pub async fn list_account_messages(
    State(state): State<AppState>,
    Path(id_str): Path<String>,
) -> Result<impl axum::response::IntoResponse, AppError> {
    let account_id = parse_id(&id_str)?;
    Ok(ok_many(state.messages.list_by_account(account_id).await?))
}

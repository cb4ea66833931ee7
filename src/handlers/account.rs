//! Account handlers: register and login.

use crate::error::AppError;
use crate::model::{Credentials, NewAccount};
use crate::response::ok_one;
use crate::state::AppState;
use axum::{extract::rejection::JsonRejection, extract::State, Json};

/// POST /register
pub async fn register(
    State(state): State<AppState>,
    payload: Result<Json<NewAccount>, JsonRejection>,
) -> Result<impl axum::response::IntoResponse, AppError> {
    let Json(body) = payload?;
    let account = state
        .accounts
        .register(body.username.as_deref(), body.password.as_deref())
        .await
        .inspect_err(|e| tracing::warn!(error = %e, "registration rejected"))?;
    Ok(ok_one(account))
}

/// POST /login
pub async fn login(
    State(state): State<AppState>,
    payload: Result<Json<Credentials>, JsonRejection>,
) -> Result<impl axum::response::IntoResponse, AppError> {
    let Json(body) = payload?;
    // Passwords are not trimmed: register accepts any four characters, spaces included.
    let (username, password) = match (body.username.as_deref(), body.password.as_deref()) {
        (Some(u), Some(p)) if !u.trim().is_empty() && !p.is_empty() => (u, p),
        _ => return Err(AppError::BadRequest("username and password are required".into())),
    };
    let account = state.accounts.authenticate(username, password).await?;
    tracing::debug!(account_id = account.account_id, "login succeeded");
    Ok(ok_one(account))
}

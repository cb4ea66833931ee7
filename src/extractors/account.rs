//! Extract the acting account from the request (`X-Account-Id` header).

use crate::error::AppError;
use async_trait::async_trait;
use axum::{extract::FromRequestParts, http::request::Parts};

/// Header carrying the id of the account issuing the request.
pub const ACCOUNT_ID_HEADER: &str = "X-Account-Id";

/// Identity of the caller for this request only. `None` when the header is absent or empty.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AccountContext(pub Option<i32>);

#[async_trait]
impl<S> FromRequestParts<S> for AccountContext
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let value = parts
            .headers
            .get(ACCOUNT_ID_HEADER)
            .and_then(|v| v.to_str().ok())
            .map(str::trim)
            .filter(|s| !s.is_empty());
        match value {
            None => Ok(AccountContext(None)),
            Some(s) => s
                .parse()
                .map(|id| AccountContext(Some(id)))
                .map_err(|_| AppError::BadRequest(format!("{} must be an integer", ACCOUNT_ID_HEADER))),
        }
    }
}

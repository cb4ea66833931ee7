//! Typed errors and HTTP mapping.

use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("invalid value for {key}: '{value}'")]
    InvalidValue { key: &'static str, value: String },
    #[error("unknown storage backend: {0} (expected postgres or memory)")]
    UnknownBackend(String),
    #[error("invalid DATABASE_URL: {0}")]
    DatabaseUrl(String),
}

/// Client-correctable reasons a request was turned down by the logic layer.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rejection {
    #[error("username must not be blank")]
    InvalidUsername,
    #[error("password must be at least 4 characters")]
    InvalidPassword,
    #[error("username is already taken")]
    DuplicateUsername,
    #[error("posted_by does not reference an existing account")]
    UnknownPoster,
    #[error("message_text must be non-blank and at most 255 characters")]
    InvalidText,
}

impl Rejection {
    pub fn code(self) -> &'static str {
        match self {
            Rejection::InvalidUsername => "invalid_username",
            Rejection::InvalidPassword => "invalid_password",
            Rejection::DuplicateUsername => "duplicate_username",
            Rejection::UnknownPoster => "unknown_poster",
            Rejection::InvalidText => "invalid_text",
        }
    }
}

#[derive(Error, Debug)]
pub enum AppError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Rejected(#[from] Rejection),
    #[error("invalid credentials")]
    Unauthorized,
    #[error("bad request: {0}")]
    BadRequest(String),
    #[error("database: {0}")]
    Db(#[from] sqlx::Error),
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::BadRequest(rejection.body_text())
    }
}

#[derive(Serialize)]
pub struct ErrorBody {
    pub error: ErrorDetail,
}

#[derive(Serialize)]
pub struct ErrorDetail {
    pub code: String,
    pub message: String,
}

impl IntoResponse for AppError {
    /// Rejections and failed logins answer with a bare status and no body; the reason
    /// goes to the log. Only malformed requests and server-side failures carry an error body.
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            AppError::Rejected(r) => {
                tracing::warn!(code = r.code(), "request rejected");
                return StatusCode::BAD_REQUEST.into_response();
            }
            AppError::Unauthorized => return StatusCode::UNAUTHORIZED.into_response(),
            AppError::BadRequest(_) => (StatusCode::BAD_REQUEST, "bad_request", self.to_string()),
            AppError::Config(e) => {
                tracing::error!(error = %e, "configuration failure");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "config_error",
                    "internal configuration error".to_string(),
                )
            }
            AppError::Db(e) => {
                // Engine detail stays in the log.
                tracing::error!(error = %e, "storage failure");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "database_error",
                    "internal storage error".to_string(),
                )
            }
        };
        let body = ErrorBody {
            error: ErrorDetail {
                code: code.to_string(),
                message,
            },
        };
        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejection_maps_to_bad_request() {
        let resp = AppError::from(Rejection::DuplicateUsername).into_response();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn storage_failure_maps_to_internal_error() {
        let resp = AppError::Db(sqlx::Error::PoolTimedOut).into_response();
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn unauthorized_maps_to_401() {
        assert_eq!(AppError::Unauthorized.into_response().status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn rejection_and_unauthorized_have_empty_bodies() {
        for err in [AppError::from(Rejection::InvalidUsername), AppError::Unauthorized] {
            let body = axum::body::to_bytes(err.into_response().into_body(), usize::MAX)
                .await
                .unwrap();
            assert!(body.is_empty());
        }
    }

    #[test]
    fn config_failure_maps_to_internal_error() {
        let resp = AppError::from(ConfigError::DatabaseUrl("bad".into())).into_response();
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}

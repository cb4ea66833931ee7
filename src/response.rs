//! Response helpers. Success bodies are the bare entity; a missing entity is an empty 200.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

pub fn ok_one<T: Serialize>(data: T) -> (StatusCode, Json<T>) {
    (StatusCode::OK, Json(data))
}

pub fn ok_many<T: Serialize>(data: Vec<T>) -> (StatusCode, Json<Vec<T>>) {
    (StatusCode::OK, Json(data))
}

/// 200 with the entity as JSON, or 200 with an empty body when there is none.
pub fn ok_optional<T: Serialize>(data: Option<T>) -> Response {
    match data {
        Some(d) => ok_one(d).into_response(),
        None => StatusCode::OK.into_response(),
    }
}

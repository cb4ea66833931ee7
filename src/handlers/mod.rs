//! HTTP handlers for registration, login, and message CRUD.

pub mod account;
pub mod message;
pub use account::*;
pub use message::*;

use crate::error::AppError;

/// Path ids are integers; anything else is a client error.
fn parse_id(id_str: &str) -> Result<i32, AppError> {
    id_str
        .trim()
        .parse()
        .map_err(|_| AppError::BadRequest(format!("invalid id: {}", id_str)))
}

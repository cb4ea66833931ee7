//! Field rules for accounts and messages.
//!
//! Lengths count characters, not bytes. Blank means nothing but whitespace.

use crate::error::Rejection;

pub const MIN_PASSWORD_LENGTH: usize = 4;
pub const MAX_MESSAGE_LENGTH: usize = 255;

fn is_blank(s: &str) -> bool {
    s.trim().is_empty()
}

/// Username must be present and not blank.
pub fn validate_username(username: Option<&str>) -> Result<&str, Rejection> {
    match username {
        Some(u) if !is_blank(u) => Ok(u),
        _ => Err(Rejection::InvalidUsername),
    }
}

/// Password must be present and at least [`MIN_PASSWORD_LENGTH`] characters.
pub fn validate_password(password: Option<&str>) -> Result<&str, Rejection> {
    match password {
        Some(p) if p.chars().count() >= MIN_PASSWORD_LENGTH => Ok(p),
        _ => Err(Rejection::InvalidPassword),
    }
}

/// Message text must be present, not blank, and at most [`MAX_MESSAGE_LENGTH`] characters.
pub fn validate_message_text(text: Option<&str>) -> Result<&str, Rejection> {
    match text {
        Some(t) if !is_blank(t) && t.chars().count() <= MAX_MESSAGE_LENGTH => Ok(t),
        _ => Err(Rejection::InvalidText),
    }
}

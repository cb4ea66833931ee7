//! Request extractors.

pub mod account;
pub use account::{AccountContext, ACCOUNT_ID_HEADER};

//! Validation and orchestration above the stores.

mod account;
mod message;
pub mod validation;
pub use account::AccountService;
pub use message::MessageService;

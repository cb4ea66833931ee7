//! Social media backend: account registration, login, and message CRUD over PostgreSQL.

pub mod config;
pub mod error;
pub mod extractors;
pub mod handlers;
pub mod model;
pub mod response;
pub mod routes;
pub mod service;
pub mod state;
pub mod store;

pub use config::{Settings, StorageBackend};
pub use error::{AppError, ConfigError, Rejection};
pub use model::{Account, Message};
pub use routes::{api_routes, app, status_routes};
pub use service::{AccountService, MessageService};
pub use state::AppState;
pub use store::{ensure_database_exists, ensure_tables, AccountStore, MemoryStore, MessageStore, PgStore};

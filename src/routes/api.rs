//! Account and message routes.

use crate::handlers::{
    create_message, delete_message, list_account_messages, list_messages, login, read_message, register,
    update_message,
};
use crate::state::AppState;
use axum::{routing::get, routing::post, Router};

pub fn api_routes(state: AppState) -> Router {
    Router::new()
        .route("/register", post(register))
        .route("/login", post(login))
        .route("/messages", get(list_messages).post(create_message))
        .route(
            "/messages/:message_id",
            get(read_message).patch(update_message).delete(delete_message),
        )
        .route("/accounts/:account_id/messages", get(list_account_messages))
        .with_state(state)
}

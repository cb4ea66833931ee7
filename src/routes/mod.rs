//! Router assembly.

mod api;
mod status;
pub use api::api_routes;
pub use status::status_routes;

use crate::state::AppState;
use axum::Router;
use tower::ServiceBuilder;
use tower_http::{limit::RequestBodyLimitLayer, trace::TraceLayer};

/// Full application: status routes plus the API, with request tracing and a body size limit.
pub fn app(state: AppState, body_limit_bytes: usize) -> Router {
    Router::new()
        .merge(status_routes(state.clone()))
        .merge(api_routes(state))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(RequestBodyLimitLayer::new(body_limit_bytes)),
        )
}

//! Operational endpoints: liveness, storage readiness, build version.

use crate::state::AppState;
use axum::{extract::State, http::StatusCode, routing::get, Json, Router};
use serde::Serialize;
use std::time::Instant;

#[derive(Serialize, Clone, Copy, Debug, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
enum Health {
    Up,
    Down,
}

#[derive(Serialize)]
struct Liveness {
    status: Health,
}

/// Readiness report. `storage_ms` is how long the storage round trip took.
#[derive(Serialize)]
struct Readiness {
    status: Health,
    storage: Health,
    storage_ms: u64,
}

#[derive(Serialize)]
struct BuildInfo {
    name: &'static str,
    version: &'static str,
}

async fn live() -> Json<Liveness> {
    Json(Liveness { status: Health::Up })
}

async fn ready(State(state): State<AppState>) -> (StatusCode, Json<Readiness>) {
    let started = Instant::now();
    let storage = match state.accounts.ping().await {
        Ok(()) => Health::Up,
        Err(e) => {
            tracing::warn!(error = %e, "storage not ready");
            Health::Down
        }
    };
    let storage_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX);
    let code = match storage {
        Health::Up => StatusCode::OK,
        Health::Down => StatusCode::SERVICE_UNAVAILABLE,
    };
    (
        code,
        Json(Readiness {
            status: storage,
            storage,
            storage_ms,
        }),
    )
}

async fn build_info() -> Json<BuildInfo> {
    Json(BuildInfo {
        name: env!("CARGO_PKG_NAME"),
        version: env!("CARGO_PKG_VERSION"),
    })
}

/// GET /health, GET /ready and GET /version.
pub fn status_routes(state: AppState) -> Router {
    Router::new()
        .route("/health", get(live))
        .route("/ready", get(ready))
        .route("/version", get(build_info))
        .with_state(state)
}

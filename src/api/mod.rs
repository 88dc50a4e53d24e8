//! HTTP surface: the probe endpoint, the status page, and a liveness probe.

use std::sync::Arc;

use axum::{routing::get, Router};

use crate::state::AppState;

pub mod health;
pub mod page;
pub mod probes;

/// Build the axum router.
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(page::status_page))
        .route("/healthz", get(health::healthz))
        .route("/api/health", get(probes::check_services))
        .with_state(state)
}

//! Shared application state injected into every handler via [`axum::extract::State`].

use std::time::Instant;

use crate::probe::Prober;

pub struct AppState {
    /// Probes the compiled-in service list on every `/api/health` request.
    pub prober: Prober,
    /// Server start time, reported as uptime by `/healthz`.
    pub started_at: Instant,
}

impl AppState {
    pub fn new(prober: Prober) -> Self {
        Self {
            prober,
            started_at: Instant::now(),
        }
    }
}

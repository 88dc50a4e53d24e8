//! Wire format of `GET /api/health`, shared by the server and the status client.

use serde::{Deserialize, Serialize};

use crate::probe::ServiceProbeResult;

/// Message returned when a probe cycle cannot be completed.
pub const PROBE_FAILURE_MESSAGE: &str = "Failed to check response times";

/// Body of `GET /api/health`, discriminated by its `status` field.
///
/// ```json
/// { "status": "success", "results": [ { "name": "API", "url": "https://…", "responseTime": 87, "status": "Operational" } ] }
/// { "status": "error", "message": "Failed to check response times", "error": "…" }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum HealthReport {
    Success { results: Vec<ServiceProbeResult> },
    Error { message: String, error: String },
}

impl HealthReport {
    pub fn failure(error: &anyhow::Error) -> Self {
        Self::Error {
            message: PROBE_FAILURE_MESSAGE.to_string(),
            error: format!("{error:#}"),
        }
    }
}

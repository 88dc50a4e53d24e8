//! Status client: calls a running dashboard's `/api/health` and renders it.
//!
//! [`StatusView`] tracks the three observable pieces of state (`loading`,
//! `results`, `error`) and only ever renders one of: a loading line, a single
//! error line, or the full table.
//!
//! Decoding is looser than the server's [`crate::report::HealthReport`]:
//! any JSON body whose `status` is not `"success"` is a rejection, and an
//! unrecognised tier string renders as `Unknown` instead of failing the fetch.

use std::fmt::Write as _;

use anyhow::Context;
use reqwest::Client;
use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;

/// Shown when the server answered with anything but a success payload.
pub const REJECTED_MESSAGE: &str = "Failed to fetch service status.";

/// Shown when the server could not be reached or its answer was not JSON.
pub const FETCH_FAILED_MESSAGE: &str = "An error occurred while fetching service status.";

#[derive(Debug, Error)]
pub enum ClientError {
    /// The endpoint answered with JSON whose `status` is not `"success"`.
    #[error("server reported status `{status}`: {}", rejection_detail(.message, .error))]
    Rejected {
        status: String,
        message: Option<String>,
        error: Option<String>,
    },

    /// The request did not complete.
    #[error("request to {url} failed")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// The body was not JSON, or a success payload carried unreadable results.
    #[error("response from {url} is not a health report")]
    Decode {
        url: String,
        #[source]
        source: serde_json::Error,
    },
}

fn rejection_detail<'a>(message: &'a Option<String>, error: &'a Option<String>) -> &'a str {
    message.as_deref().or(error.as_deref()).unwrap_or("no message")
}

impl ClientError {
    /// The single user-facing line for this failure.
    pub fn user_message(&self) -> &'static str {
        match self {
            Self::Rejected { .. } => REJECTED_MESSAGE,
            Self::Transport { .. } | Self::Decode { .. } => FETCH_FAILED_MESSAGE,
        }
    }
}

/// Tier as displayed by the client. Strings the client does not know become
/// [`RowStatus::Unknown`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub enum RowStatus {
    Operational,
    #[serde(rename = "Degraded Performance")]
    Degraded,
    Offline,
    #[serde(other)]
    Unknown,
}

impl std::fmt::Display for RowStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Self::Operational => "Operational",
            Self::Degraded => "Degraded Performance",
            Self::Offline => "Offline",
            Self::Unknown => "Unknown",
        })
    }
}

/// One table row as received from `/api/health`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusRow {
    pub name: String,
    pub url: String,
    pub response_time: i64,
    pub status: RowStatus,
}

/// HTTP client for a dashboard's probe endpoint.
pub struct StatusClient {
    client: Client,
    endpoint: String,
}

impl StatusClient {
    /// `base_url` is the dashboard root, e.g. `http://127.0.0.1:3000`.
    pub fn new(base_url: &str) -> anyhow::Result<Self> {
        let client = Client::builder()
            .build()
            .context("building reqwest client")?;
        Ok(Self {
            client,
            endpoint: format!("{}/api/health", base_url.trim_end_matches('/')),
        })
    }

    /// Fetch one probe cycle.
    ///
    /// The HTTP status is not consulted; the body's `status` field decides
    /// between success and rejection.
    pub async fn fetch(&self) -> Result<Vec<StatusRow>, ClientError> {
        let transport = |source: reqwest::Error| ClientError::Transport {
            url: self.endpoint.clone(),
            source,
        };
        let decode = |source: serde_json::Error| ClientError::Decode {
            url: self.endpoint.clone(),
            source,
        };

        let response = self
            .client
            .get(&self.endpoint)
            .send()
            .await
            .map_err(transport)?;
        let bytes = response.bytes().await.map_err(transport)?;
        let body: Value = serde_json::from_slice(&bytes).map_err(decode)?;

        let status = body.get("status").and_then(Value::as_str);
        if status == Some("success") {
            let results = body.get("results").cloned().unwrap_or(Value::Null);
            return serde_json::from_value(results).map_err(decode);
        }

        let text = |key: &str| body.get(key).and_then(Value::as_str).map(str::to_owned);
        Err(ClientError::Rejected {
            status: status.unwrap_or("<missing>").to_owned(),
            message: text("message"),
            error: text("error"),
        })
    }
}

/// Client-side view state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusView {
    pub loading: bool,
    pub results: Vec<StatusRow>,
    pub error: Option<String>,
}

impl Default for StatusView {
    fn default() -> Self {
        Self::new()
    }
}

impl StatusView {
    /// A view starts out loading, before the first fetch has been issued.
    pub fn new() -> Self {
        Self {
            loading: true,
            results: Vec::new(),
            error: None,
        }
    }

    pub fn begin(&mut self) {
        self.loading = true;
    }

    pub fn settle(&mut self, outcome: Result<Vec<StatusRow>, ClientError>) {
        match outcome {
            Ok(results) => {
                self.results = results;
                self.error = None;
            }
            Err(e) => {
                tracing::warn!(error = %e, "status fetch failed");
                self.error = Some(e.user_message().to_string());
            }
        }
        self.loading = false;
    }

    /// Fetch through `client` and settle with the outcome.
    pub async fn refresh(&mut self, client: &StatusClient) {
        self.begin();
        let outcome = client.fetch().await;
        self.settle(outcome);
    }

    /// Plain-text rendering.
    pub fn render(&self) -> String {
        if self.loading {
            return "Loading…\n".to_string();
        }
        if let Some(error) = &self.error {
            return format!("error: {error}\n");
        }

        let name_width = self
            .results
            .iter()
            .map(|r| r.name.chars().count())
            .chain(std::iter::once("Service".len()))
            .max()
            .unwrap_or(0);

        let mut out = String::new();
        let _ = writeln!(out, "{:<name_width$}  {:<20}  Response Time", "Service", "Status");
        for r in &self.results {
            let _ = writeln!(
                out,
                "{:<name_width$}  {:<20}  {}",
                r.name,
                r.status.to_string(),
                latency_cell(r.response_time)
            );
        }
        out
    }
}

/// `N/A` for the unreachable sentinel, otherwise `"{ms} ms"`.
pub fn latency_cell(response_time_ms: i64) -> String {
    if response_time_ms == crate::probe::UNREACHABLE_MS {
        "N/A".to_string()
    } else {
        format!("{response_time_ms} ms")
    }
}

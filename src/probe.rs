//! Service probing and latency classification.
//!
//! A [`Prober`] owns an immutable list of [`ServiceEndpoint`]s and a shared
//! [`reqwest::Client`]. [`Prober::probe_all`] sends one `HEAD` request per
//! endpoint, all at once, and waits for every probe to settle before returning.
//!
//! A probe never fails outward: any transport error becomes
//! [`ProbeOutcome::Unreachable`], which is reported as a response time of
//! [`UNREACHABLE_MS`] and classified [`ServiceStatus::Offline`].

use std::{
    sync::Arc,
    time::{Duration, Instant},
};

use anyhow::Context;
use futures_util::future::join_all;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

/// Response time reported for a probe that did not complete.
pub const UNREACHABLE_MS: i64 = -1;

/// Highest latency (inclusive) still considered fully operational.
pub const OPERATIONAL_MAX_MS: i64 = 200;

/// Highest latency (inclusive) considered degraded rather than offline.
pub const DEGRADED_MAX_MS: i64 = 1000;

/// Health tier derived from a single probe's response time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ServiceStatus {
    Operational,
    #[serde(rename = "Degraded Performance")]
    Degraded,
    Offline,
}

impl std::fmt::Display for ServiceStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Self::Operational => "Operational",
            Self::Degraded => "Degraded Performance",
            Self::Offline => "Offline",
        })
    }
}

/// Map a response time in milliseconds to a [`ServiceStatus`].
///
/// Both thresholds are inclusive: 200 ms is operational, 1000 ms is degraded.
/// Negative values only arise from the [`UNREACHABLE_MS`] sentinel and are
/// always offline.
pub fn classify(response_time_ms: i64) -> ServiceStatus {
    if response_time_ms < 0 {
        ServiceStatus::Offline
    } else if response_time_ms <= OPERATIONAL_MAX_MS {
        ServiceStatus::Operational
    } else if response_time_ms <= DEGRADED_MAX_MS {
        ServiceStatus::Degraded
    } else {
        ServiceStatus::Offline
    }
}

/// A named URL to probe.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceEndpoint {
    pub name: String,
    pub url: String,
}

impl ServiceEndpoint {
    pub fn new(name: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            url: url.into(),
        }
    }
}

/// How a single probe settled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProbeOutcome {
    /// The endpoint answered (with any HTTP status) after `elapsed_ms`.
    Reachable { elapsed_ms: u64 },
    /// The request failed before a response arrived.
    Unreachable,
}

impl ProbeOutcome {
    /// Response time in milliseconds, or [`UNREACHABLE_MS`].
    pub fn response_time_ms(self) -> i64 {
        match self {
            Self::Reachable { elapsed_ms } => i64::try_from(elapsed_ms).unwrap_or(i64::MAX),
            Self::Unreachable => UNREACHABLE_MS,
        }
    }
}

/// The reported result for one endpoint in one probe cycle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceProbeResult {
    pub name: String,
    pub url: String,
    /// Milliseconds, or `-1` when the endpoint could not be reached.
    pub response_time: i64,
    pub status: ServiceStatus,
}

impl ServiceProbeResult {
    pub fn new(endpoint: ServiceEndpoint, outcome: ProbeOutcome) -> Self {
        let response_time = outcome.response_time_ms();
        Self {
            name: endpoint.name,
            url: endpoint.url,
            response_time,
            status: classify(response_time),
        }
    }
}

/// Fans out liveness probes over a fixed endpoint list.
///
/// Cheap to clone: the client and the endpoint list are both reference-counted.
#[derive(Clone)]
pub struct Prober {
    client: Client,
    endpoints: Arc<[ServiceEndpoint]>,
}

impl Prober {
    /// Build a prober for `endpoints`.
    ///
    /// `timeout` of `None` leaves the HTTP client's default behaviour in place.
    pub fn new(
        endpoints: Vec<ServiceEndpoint>,
        timeout: Option<Duration>,
        user_agent: &str,
    ) -> anyhow::Result<Self> {
        let mut builder = Client::builder().user_agent(user_agent);
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder.build().context("building reqwest client")?;

        Ok(Self {
            client,
            endpoints: endpoints.into(),
        })
    }

    pub fn endpoints(&self) -> &[ServiceEndpoint] {
        &self.endpoints
    }

    /// Probe every endpoint concurrently and return one result per endpoint,
    /// in configuration order.
    ///
    /// # Errors
    /// Only if a probe task itself could not be joined (panic or runtime
    /// shutdown). Unreachable endpoints are never an error.
    pub async fn probe_all(&self) -> anyhow::Result<Vec<ServiceProbeResult>> {
        let started = Instant::now();

        let tasks = self.endpoints.iter().cloned().map(|endpoint| {
            let client = self.client.clone();
            tokio::spawn(async move {
                let outcome = probe(&client, &endpoint).await;
                ServiceProbeResult::new(endpoint, outcome)
            })
        });

        let results = join_all(tasks)
            .await
            .into_iter()
            .collect::<Result<Vec<_>, _>>()
            .context("probe task did not complete")?;

        let offline = results
            .iter()
            .filter(|r| r.status == ServiceStatus::Offline)
            .count();
        info!(
            total = results.len(),
            offline,
            elapsed_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX),
            "probe cycle complete"
        );

        Ok(results)
    }
}

/// Send a single `HEAD` request and time it.
///
/// The target's HTTP status is not inspected: any response counts as reachable.
async fn probe(client: &Client, endpoint: &ServiceEndpoint) -> ProbeOutcome {
    let start = Instant::now();
    match client.head(&endpoint.url).send().await {
        Ok(response) => {
            let elapsed_ms = u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX);
            debug!(
                service = %endpoint.name,
                url = %endpoint.url,
                http_status = response.status().as_u16(),
                elapsed_ms,
                "probe answered"
            );
            ProbeOutcome::Reachable { elapsed_ms }
        }
        Err(e) => {
            warn!(
                service = %endpoint.name,
                url = %endpoint.url,
                error = %e,
                "probe failed"
            );
            ProbeOutcome::Unreachable
        }
    }
}

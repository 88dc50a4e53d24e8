//! Configuration types for status-board.
//!
//! Config is optional: when the file does not exist every setting takes its
//! default. A file that exists but fails to parse or validate is rejected at
//! startup rather than silently ignored.
//!
//! The monitored service list is not part of the config; see [`crate::services`].
//!
//! # Example
//! ```toml
//! [server]
//! port = 3000
//! bind = "0.0.0.0"
//!
//! [probe]
//! timeout_ms = 10000
//! ```

use std::{
    net::{IpAddr, SocketAddr},
    path::Path,
    time::Duration,
};

use anyhow::Context;
use serde::{Deserialize, Serialize};
use tracing::info;

/// Top-level configuration.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,

    #[serde(default)]
    pub probe: ProbeConfig,
}

impl Config {
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let content =
            std::fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
        Self::parse(&content)
    }

    /// Like [`Config::load`], but a missing file yields [`Config::default`].
    pub fn load_or_default(path: &Path) -> anyhow::Result<Self> {
        if !path.exists() {
            info!(path = %path.display(), "no config file found, using defaults");
            return Ok(Self::default());
        }
        Self::load(path)
    }

    pub fn parse(content: &str) -> anyhow::Result<Self> {
        let config: Self = toml::from_str(content).context("parsing config TOML")?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> anyhow::Result<()> {
        anyhow::ensure!(self.server.port != 0, "[server] port must be non-zero");
        self.server.socket_addr()?;
        if let Some(ms) = self.probe.timeout_ms {
            anyhow::ensure!(ms > 0, "[probe] timeout_ms must be greater than zero");
        }
        Ok(())
    }
}

/// HTTP listener settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    /// Listening port (default: 3000).
    #[serde(default = "defaults::port")]
    pub port: u16,

    /// Listening address (default: `0.0.0.0`).
    #[serde(default = "defaults::bind")]
    pub bind: String,

    /// Log filter used when `RUST_LOG` is not set.
    #[serde(default)]
    pub log_level: Option<String>,
}

impl ServerConfig {
    /// Listening socket address built from `bind` and `port`.
    pub fn socket_addr(&self) -> anyhow::Result<SocketAddr> {
        let ip: IpAddr = self
            .bind
            .parse()
            .with_context(|| format!("[server] bind `{}` is not an IP address", self.bind))?;
        Ok(SocketAddr::new(ip, self.port))
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: defaults::port(),
            bind: defaults::bind(),
            log_level: None,
        }
    }
}

/// Outbound probe settings.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct ProbeConfig {
    /// Per-probe timeout in milliseconds.
    ///
    /// Unset means no override: the HTTP client's own defaults apply.
    #[serde(default)]
    pub timeout_ms: Option<u64>,

    /// `User-Agent` sent with every probe (default: `status-board/<version>`).
    #[serde(default)]
    pub user_agent: Option<String>,
}

impl ProbeConfig {
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_ms.map(Duration::from_millis)
    }

    pub fn user_agent(&self) -> String {
        self.user_agent
            .clone()
            .unwrap_or_else(|| concat!("status-board/", env!("CARGO_PKG_VERSION")).to_string())
    }
}

mod defaults {
    pub fn port() -> u16 { 3000 }
    pub fn bind() -> String { "0.0.0.0".into() }
}

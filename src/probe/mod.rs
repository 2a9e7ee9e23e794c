//! Probe module for reachability checks.
//!
//! Supports TCP connect, HTTP HEAD, and ping probes. Every strategy is
//! reduced to the same [`Observation`] before it reaches the ledger.

mod http;
mod ping;
mod tcp;

pub use http::*;
pub use ping::*;
pub use tcp::*;

use std::fmt;
use std::future::Future;
use std::str::FromStr;
use std::time::Duration;
use thiserror::Error;

use crate::ledger::Observation;

/// Probe error types.
#[derive(Error, Debug)]
pub enum ProbeError {
    #[error("probe timed out after {0:?}")]
    Timeout(Duration),
    #[error("network error: {0}")]
    Network(String),
    #[error("invalid configuration: {0}")]
    Config(String),
    #[error("command failed: {0}")]
    Command(String),
}

/// Available probe strategies.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ProbeKind {
    #[default]
    Tcp,
    Http,
    Ping,
}

impl FromStr for ProbeKind {
    type Err = ProbeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "tcp" => Ok(Self::Tcp),
            "http" => Ok(Self::Http),
            "ping" => Ok(Self::Ping),
            other => Err(ProbeError::Config(format!("unknown probe type: {}", other))),
        }
    }
}

impl fmt::Display for ProbeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Tcp => "tcp",
            Self::Http => "http",
            Self::Ping => "ping",
        })
    }
}

/// Probe configuration.
#[derive(Debug, Clone)]
pub struct ProbeConfig {
    pub kind: ProbeKind,
    pub host: String,
    pub port: u16,
    pub timeout: Duration,
}

impl ProbeConfig {
    pub fn new(kind: ProbeKind, host: &str, port: u16, timeout: Duration) -> Self {
        Self {
            kind,
            host: host.to_string(),
            port,
            timeout,
        }
    }

    /// `host:port`, bracketing bare IPv6 literals.
    pub fn address(&self) -> String {
        if self.host.contains(':') && !self.host.starts_with('[') {
            format!("[{}]:{}", self.host, self.port)
        } else {
            format!("{}:{}", self.host, self.port)
        }
    }
}

/// Run a probe with the given configuration.
///
/// Returns latency in milliseconds on success. Never runs past the
/// configured timeout.
pub async fn run_probe(config: &ProbeConfig) -> Result<f64, ProbeError> {
    let attempt = async {
        match config.kind {
            ProbeKind::Tcp => run_tcp_probe(&config.address()).await,
            ProbeKind::Http => run_http_probe(&config.host, config.port, config.timeout).await,
            ProbeKind::Ping => run_ping_probe(&config.host, config.timeout).await,
        }
    };

    let result = match tokio::time::timeout(config.timeout, attempt).await {
        Ok(result) => result,
        Err(_) => Err(ProbeError::Timeout(config.timeout)),
    };

    // Enforce timeout check
    if let Ok(latency) = &result {
        if *latency >= config.timeout.as_secs_f64() * 1000.0 {
            return Err(ProbeError::Timeout(config.timeout));
        }
    }

    result
}

/// Reduce a probe result to an observation.
pub fn observation_from(result: Result<f64, ProbeError>) -> Observation {
    match result {
        Ok(latency_ms) => Observation::online(latency_ms),
        Err(ProbeError::Timeout(_)) => Observation::offline("timeout"),
        Err(e) => Observation::offline(e.to_string()),
    }
}

/// A single reachability check against a fixed target.
pub trait Prober: Send + Sync {
    fn probe(&self) -> impl Future<Output = Observation> + Send;
}

/// Prober backed by one of the built-in strategies.
#[derive(Debug, Clone)]
pub struct TargetProber {
    config: ProbeConfig,
}

impl TargetProber {
    pub fn new(config: ProbeConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ProbeConfig {
        &self.config
    }
}

impl Prober for TargetProber {
    fn probe(&self) -> impl Future<Output = Observation> + Send {
        async move {
            let result = run_probe(&self.config).await;
            if let Err(e) = &result {
                tracing::debug!("Probe of {} failed: {}", self.config.address(), e);
            }
            observation_from(result)
        }
    }
}

#[cfg(test)]
pub(crate) use scripted::ScriptedProber;

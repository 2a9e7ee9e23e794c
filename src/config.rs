//! Configuration module for uptrail.
//!
//! Loads configuration from environment variables with sensible defaults.

use std::env;
use std::time::Duration;

use crate::probe::{ProbeConfig, ProbeKind};

/// Monitor configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct MonitorConfig {
    /// Host to probe (default: "127.0.0.1")
    pub target_host: String,
    /// Port to probe (default: 80)
    pub target_port: u16,
    /// Probe strategy (default: tcp)
    pub probe_kind: ProbeKind,
    /// Time between cycles (default: 60s)
    pub poll_interval: Duration,
    /// Upper bound on a single probe (default: 5s)
    pub timeout: Duration,
    /// HTTP port for the status server (default: 8080)
    pub http_port: u16,
    /// Path to the ledger file (default: "uptrail.json")
    pub ledger_path: String,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            target_host: "127.0.0.1".to_string(),
            target_port: 80,
            probe_kind: ProbeKind::Tcp,
            poll_interval: Duration::from_secs(60),
            timeout: Duration::from_secs(5),
            http_port: 8080,
            ledger_path: "uptrail.json".to_string(),
        }
    }
}

impl MonitorConfig {
    /// Load configuration from environment variables.
    ///
    /// Environment variables:
    /// - `UPTRAIL_TARGET_HOST`: host to probe (default: "127.0.0.1")
    /// - `UPTRAIL_TARGET_PORT`: port to probe (default: 80)
    /// - `UPTRAIL_PROBE_TYPE`: `tcp`, `http` or `ping` (default: "tcp")
    /// - `UPTRAIL_POLL_INTERVAL`: seconds between probes (default: 60)
    /// - `UPTRAIL_TIMEOUT`: probe timeout in seconds (default: 5)
    /// - `UPTRAIL_HTTP_PORT`: HTTP port (default: 8080)
    /// - `UPTRAIL_LEDGER_PATH`: ledger file path (default: "uptrail.json")
    pub fn load() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut cfg = Self::default();

        if let Some(host) = lookup("UPTRAIL_TARGET_HOST") {
            if !host.trim().is_empty() {
                cfg.target_host = host.trim().to_string();
            }
        }

        if let Some(port_str) = lookup("UPTRAIL_TARGET_PORT") {
            if let Ok(port) = port_str.trim().parse() {
                cfg.target_port = port;
            }
        }

        if let Some(kind_str) = lookup("UPTRAIL_PROBE_TYPE") {
            match kind_str.parse() {
                Ok(kind) => cfg.probe_kind = kind,
                Err(e) => tracing::warn!("Ignoring UPTRAIL_PROBE_TYPE: {}", e),
            }
        }

        if let Some(secs) = lookup("UPTRAIL_POLL_INTERVAL").and_then(|s| positive_secs(&s)) {
            cfg.poll_interval = secs;
        }

        if let Some(secs) = lookup("UPTRAIL_TIMEOUT").and_then(|s| positive_secs(&s)) {
            cfg.timeout = secs;
        }

        if let Some(port_str) = lookup("UPTRAIL_HTTP_PORT") {
            if let Ok(port) = port_str.trim().parse() {
                cfg.http_port = port;
            }
        }

        if let Some(path) = lookup("UPTRAIL_LEDGER_PATH") {
            if !path.trim().is_empty() {
                cfg.ledger_path = path;
            }
        }

        cfg
    }

    /// Probe settings derived from this configuration.
    pub fn probe_config(&self) -> ProbeConfig {
        ProbeConfig::new(self.probe_kind, &self.target_host, self.target_port, self.timeout)
    }
}

fn positive_secs(s: &str) -> Option<Duration> {
    s.trim()
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite() && *v > 0.0)
        .map(Duration::from_secs_f64)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn from_pairs(pairs: &[(&str, &str)]) -> MonitorConfig {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        MonitorConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_default_config() {
        let cfg = MonitorConfig::default();
        assert_eq!(cfg.http_port, 8080);
        assert_eq!(cfg.target_port, 80);
        assert_eq!(cfg.probe_kind, ProbeKind::Tcp);
        assert_eq!(cfg.poll_interval, Duration::from_secs(60));
        assert_eq!(cfg.ledger_path, "uptrail.json");
    }

    #[test]
    fn test_overrides() {
        let cfg = from_pairs(&[
            ("UPTRAIL_TARGET_HOST", "example.org"),
            ("UPTRAIL_TARGET_PORT", "443"),
            ("UPTRAIL_PROBE_TYPE", "http"),
            ("UPTRAIL_POLL_INTERVAL", "30"),
            ("UPTRAIL_TIMEOUT", "2.5"),
            ("UPTRAIL_HTTP_PORT", "9090"),
            ("UPTRAIL_LEDGER_PATH", "/var/lib/uptrail/ledger.json"),
        ]);

        assert_eq!(cfg.target_host, "example.org");
        assert_eq!(cfg.target_port, 443);
        assert_eq!(cfg.probe_kind, ProbeKind::Http);
        assert_eq!(cfg.poll_interval, Duration::from_secs(30));
        assert_eq!(cfg.timeout, Duration::from_millis(2500));
        assert_eq!(cfg.http_port, 9090);
        assert_eq!(cfg.ledger_path, "/var/lib/uptrail/ledger.json");

        let probe = cfg.probe_config();
        assert_eq!(probe.address(), "example.org:443");
        assert_eq!(probe.timeout, Duration::from_millis(2500));
    }

    #[test]
    fn test_invalid_values_keep_defaults() {
        let cfg = from_pairs(&[
            ("UPTRAIL_TARGET_PORT", "99999"),
            ("UPTRAIL_PROBE_TYPE", "carrier-pigeon"),
            ("UPTRAIL_POLL_INTERVAL", "0"),
            ("UPTRAIL_TIMEOUT", "-1"),
            ("UPTRAIL_TARGET_HOST", "  "),
        ]);

        assert_eq!(cfg.target_port, 80);
        assert_eq!(cfg.probe_kind, ProbeKind::Tcp);
        assert_eq!(cfg.poll_interval, Duration::from_secs(60));
        assert_eq!(cfg.timeout, Duration::from_secs(5));
        assert_eq!(cfg.target_host, "127.0.0.1");
    }
}

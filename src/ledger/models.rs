//! Ledger data types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Maximum number of downtime incidents kept in the ledger.
pub const MAX_INCIDENTS: usize = 10;

/// Reachability classification of the monitored host.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LedgerStatus {
    #[default]
    Unknown,
    Online,
    Offline,
}

impl LedgerStatus {
    pub fn from_online(online: bool) -> Self {
        if online {
            Self::Online
        } else {
            Self::Offline
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Unknown => "unknown",
            Self::Online => "online",
            Self::Offline => "offline",
        }
    }
}

impl std::fmt::Display for LedgerStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A completed outage, recorded when the host came back online.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Incident {
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    /// Rounded outage length in seconds
    pub duration: u64,
    pub id: Uuid,
}

impl Incident {
    pub fn new(start_time: DateTime<Utc>, end_time: DateTime<Utc>, duration_seconds: f64) -> Self {
        Self {
            start_time,
            end_time,
            duration: duration_seconds.max(0.0).round() as u64,
            id: Uuid::new_v4(),
        }
    }
}

/// The single persisted uptime record.
///
/// Field names serialize in camelCase so the stored file matches what
/// front-ends read directly.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Ledger {
    pub last_online: Option<DateTime<Utc>>,
    pub last_status: LedgerStatus,
    pub last_status_change: Option<DateTime<Utc>>,
    pub current_streak_seconds: f64,
    pub total_up_seconds: f64,
    pub total_down_seconds: f64,
    pub last_checked: Option<DateTime<Utc>>,
    /// Most recent first, at most [`MAX_INCIDENTS`] entries
    pub downtime_incidents: Vec<Incident>,
    pub total_outages: u64,
    /// Latency of the last observation in milliseconds
    pub latency: Option<f64>,
    pub error: Option<String>,
}

impl Ledger {
    /// Repair a ledger read from outside the engine (hand edits, older files).
    ///
    /// Accumulators are clamped to zero and the incident list to its bound.
    pub fn sanitized(mut self) -> Self {
        self.current_streak_seconds = non_negative(self.current_streak_seconds);
        self.total_up_seconds = non_negative(self.total_up_seconds);
        self.total_down_seconds = non_negative(self.total_down_seconds);
        self.latency = self.latency.filter(|l| l.is_finite() && *l >= 0.0);
        self.downtime_incidents.truncate(MAX_INCIDENTS);
        self.total_outages = self.total_outages.max(self.downtime_incidents.len() as u64);
        self
    }
}

fn non_negative(value: f64) -> f64 {
    if value.is_finite() && value > 0.0 {
        value
    } else {
        0.0
    }
}

/// Normalized result of one reachability check.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Observation {
    pub online: bool,
    pub latency_ms: Option<f64>,
    pub error: Option<String>,
}

impl Observation {
    pub fn online(latency_ms: f64) -> Self {
        Self {
            online: true,
            latency_ms: Some(latency_ms),
            error: None,
        }
    }

    pub fn offline(error: impl Into<String>) -> Self {
        Self {
            online: false,
            latency_ms: None,
            error: Some(error.into()),
        }
    }
}

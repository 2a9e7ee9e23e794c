//! Read-only formatting of a ledger for display.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::ledger::{Incident, Ledger, LedgerStatus};

/// Display-ready view of a ledger.
#[derive(Debug, Clone, Serialize)]
pub struct Summary {
    pub status: String,
    pub streak: String,
    pub uptime: String,
    pub last_checked: String,
    pub last_online: String,
    pub latency: Option<String>,
    pub error: Option<String>,
    pub total_outages: u64,
    pub incidents: Vec<IncidentSummary>,
}

#[derive(Debug, Clone, Serialize)]
pub struct IncidentSummary {
    pub id: String,
    pub started: String,
    pub ended: String,
    pub duration: String,
}

impl Summary {
    pub fn from_ledger(ledger: &Ledger, now: DateTime<Utc>) -> Self {
        Self {
            status: status_label(ledger.last_status).to_string(),
            streak: format_duration(ledger.current_streak_seconds),
            uptime: uptime_percentage(ledger)
                .map(format_percentage)
                .unwrap_or_else(|| "n/a".to_string()),
            last_checked: format_relative(ledger.last_checked, now),
            last_online: format_relative(ledger.last_online, now),
            latency: ledger.latency.map(|ms| format!("{:.0} ms", ms)),
            error: ledger.error.clone(),
            total_outages: ledger.total_outages,
            incidents: ledger
                .downtime_incidents
                .iter()
                .map(|i| IncidentSummary::new(i, now))
                .collect(),
        }
    }
}

impl IncidentSummary {
    fn new(incident: &Incident, now: DateTime<Utc>) -> Self {
        Self {
            id: incident.id.to_string(),
            started: incident.start_time.format("%Y-%m-%d %H:%M:%S UTC").to_string(),
            ended: format_relative(Some(incident.end_time), now),
            duration: format_duration(incident.duration as f64),
        }
    }
}

pub fn status_label(status: LedgerStatus) -> &'static str {
    match status {
        LedgerStatus::Unknown => "Unknown",
        LedgerStatus::Online => "Online",
        LedgerStatus::Offline => "Offline",
    }
}

/// Share of accounted time spent online, or `None` before any time accrued.
pub fn uptime_percentage(ledger: &Ledger) -> Option<f64> {
    let total = ledger.total_up_seconds + ledger.total_down_seconds;
    if total > 0.0 {
        Some(ledger.total_up_seconds / total * 100.0)
    } else {
        None
    }
}

pub fn format_percentage(pct: f64) -> String {
    format!("{:.1}", pct)
}

/// Compact duration: two most significant units.
pub fn format_duration(seconds: f64) -> String {
    const MINUTE: u64 = 60;
    const HOUR: u64 = MINUTE * 60;
    const DAY: u64 = HOUR * 24;

    let secs = if seconds.is_finite() && seconds > 0.0 {
        seconds.floor() as u64
    } else {
        0
    };

    if secs >= DAY {
        format!("{}d {}h", secs / DAY, (secs % DAY) / HOUR)
    } else if secs >= HOUR {
        format!("{}h {}m", secs / HOUR, (secs % HOUR) / MINUTE)
    } else if secs >= MINUTE {
        format!("{}m {}s", secs / MINUTE, secs % MINUTE)
    } else {
        format!("{}s", secs)
    }
}

pub fn format_relative(ts: Option<DateTime<Utc>>, now: DateTime<Utc>) -> String {
    let ts = match ts {
        Some(ts) => ts,
        None => return "never".to_string(),
    };

    let secs = (now - ts).num_seconds().max(0);
    match secs {
        0..=4 => "just now".to_string(),
        5..=59 => plural(secs, "second"),
        60..=3599 => plural(secs / 60, "minute"),
        3600..=86399 => plural(secs / 3600, "hour"),
        _ => plural(secs / 86400, "day"),
    }
}

fn plural(n: i64, unit: &str) -> String {
    if n == 1 {
        format!("1 {} ago", unit)
    } else {
        format!("{} {}s ago", n, unit)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ledger::{apply, Observation};
    use chrono::{Duration, TimeZone};

    #[test]
    fn test_uptime_percentage() {
        let mut ledger = Ledger::default();
        assert_eq!(uptime_percentage(&ledger), None);

        ledger.total_up_seconds = 199.0;
        ledger.total_down_seconds = 1.0;
        assert_eq!(format_percentage(uptime_percentage(&ledger).unwrap()), "99.5");

        ledger.total_up_seconds = 0.0;
        assert_eq!(format_percentage(uptime_percentage(&ledger).unwrap()), "0.0");
    }

    #[test]
    fn test_format_duration() {
        assert_eq!(format_duration(0.0), "0s");
        assert_eq!(format_duration(-3.0), "0s");
        assert_eq!(format_duration(45.9), "45s");
        assert_eq!(format_duration(192.0), "3m 12s");
        assert_eq!(format_duration(7500.0), "2h 5m");
        assert_eq!(format_duration(273600.0), "3d 4h");
    }

    #[test]
    fn test_format_relative() {
        let now = Utc.with_ymd_and_hms(2024, 5, 5, 12, 0, 0).unwrap();
        assert_eq!(format_relative(None, now), "never");
        assert_eq!(format_relative(Some(now), now), "just now");
        assert_eq!(format_relative(Some(now + Duration::seconds(30)), now), "just now");
        assert_eq!(format_relative(Some(now - Duration::seconds(30)), now), "30 seconds ago");
        assert_eq!(format_relative(Some(now - Duration::seconds(60)), now), "1 minute ago");
        assert_eq!(format_relative(Some(now - Duration::hours(5)), now), "5 hours ago");
        assert_eq!(format_relative(Some(now - Duration::days(2)), now), "2 days ago");
    }

    #[test]
    fn test_summary_from_ledger() {
        let t0 = Utc.with_ymd_and_hms(2024, 5, 5, 12, 0, 0).unwrap();
        let l1 = apply(&Ledger::default(), t0, &Observation::online(10.0));
        let l2 = apply(&l1, t0 + Duration::seconds(300), &Observation::offline("timeout"));
        let l3 = apply(&l2, t0 + Duration::seconds(360), &Observation::online(41.6));

        let summary = Summary::from_ledger(&l3, t0 + Duration::seconds(420));
        assert_eq!(summary.status, "Online");
        assert_eq!(summary.streak, "0s");
        assert_eq!(summary.uptime, "83.3");
        assert_eq!(summary.last_checked, "1 minute ago");
        assert_eq!(summary.latency.as_deref(), Some("42 ms"));
        assert!(summary.error.is_none());
        assert_eq!(summary.total_outages, 1);
        assert_eq!(summary.incidents.len(), 1);
        assert_eq!(summary.incidents[0].duration, "1m 0s");
        assert_eq!(summary.incidents[0].started, "2024-05-05 12:05:00 UTC");
    }

    #[test]
    fn test_summary_of_fresh_ledger() {
        let summary = Summary::from_ledger(&Ledger::default(), Utc::now());
        assert_eq!(summary.status, "Unknown");
        assert_eq!(summary.uptime, "n/a");
        assert_eq!(summary.last_online, "never");
        assert!(summary.incidents.is_empty());
    }
}

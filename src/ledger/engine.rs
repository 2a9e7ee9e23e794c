//! Ledger transition logic.
//!
//! `apply` folds one observation into the ledger. Elapsed time since the
//! previous check is charged to the previous status, and an incident is
//! only recorded at the moment the host recovers.

use chrono::{DateTime, Utc};

use super::models::{Incident, Ledger, LedgerStatus, Observation, MAX_INCIDENTS};

/// Compute the ledger that follows `prev` after observing `observation` at `now`.
///
/// Total over its inputs: out-of-order or repeated timestamps contribute
/// zero elapsed time instead of negative time.
pub fn apply(prev: &Ledger, now: DateTime<Utc>, observation: &Observation) -> Ledger {
    let mut next = prev.clone();
    let delta = elapsed_seconds(prev.last_checked, now);

    match prev.last_status {
        LedgerStatus::Online => next.total_up_seconds += delta,
        LedgerStatus::Offline => next.total_down_seconds += delta,
        LedgerStatus::Unknown => {}
    }

    let status = LedgerStatus::from_online(observation.online);
    if status != prev.last_status {
        next.last_status = status;
        next.last_status_change = Some(now);

        if prev.last_status == LedgerStatus::Offline && status == LedgerStatus::Online {
            if let Some(went_down) = prev.last_status_change.filter(|t| now > *t) {
                let downtime = elapsed_seconds(Some(went_down), now);
                next.downtime_incidents
                    .insert(0, Incident::new(went_down, now, downtime));
                next.downtime_incidents.truncate(MAX_INCIDENTS);
                next.total_outages += 1;
            }
        }

        next.current_streak_seconds = 0.0;
    } else {
        next.current_streak_seconds += delta;
    }

    if observation.online {
        next.last_online = Some(now);
        next.latency = observation.latency_ms;
        next.error = None;
    } else {
        next.latency = None;
        next.error = observation.error.clone();
    }
    next.last_checked = Some(now);

    next
}

/// Seconds from `since` to `now`, clamped at zero. Absent `since` counts as zero.
fn elapsed_seconds(since: Option<DateTime<Utc>>, now: DateTime<Utc>) -> f64 {
    match since {
        Some(since) => (now - since)
            .to_std()
            .map(|elapsed| elapsed.as_secs_f64())
            .unwrap_or(0.0),
        None => 0.0,
    }
}

//! One probe-and-update cycle against the ledger store.

use chrono::Utc;
use serde::Serialize;
use tokio::sync::{Mutex, RwLock};

use crate::ledger::{apply, Ledger, LedgerStatus, LedgerStore, Observation};
use crate::probe::Prober;

/// Outcome of a single cycle.
#[derive(Debug, Clone, Serialize)]
pub struct CycleReport {
    pub ledger: Ledger,
    pub observation: Observation,
    /// False when the store rejected the write; the ledger is retried next cycle.
    pub persisted: bool,
}

/// Runs load → probe → apply → save, one cycle at a time.
pub struct Monitor<P, S> {
    prober: P,
    store: S,
    /// Held for the whole cycle. Holds a ledger the store failed to save.
    pending: Mutex<Option<Ledger>>,
    /// Result of the last cycle, readable while the next one probes.
    latest: RwLock<Option<Ledger>>,
}

impl<P: Prober, S: LedgerStore> Monitor<P, S> {
    pub fn new(prober: P, store: S) -> Self {
        Self {
            prober,
            store,
            pending: Mutex::new(None),
            latest: RwLock::new(None),
        }
    }

    pub fn prober(&self) -> &P {
        &self.prober
    }

    /// Perform exactly one probe and fold it into the ledger.
    pub async fn run_cycle(&self) -> CycleReport {
        let mut pending = self.pending.lock().await;

        let prev = match pending.take() {
            Some(ledger) => ledger,
            None => self.store.load(),
        };

        let observation = self.prober.probe().await;
        let ledger = apply(&prev, Utc::now(), &observation);
        log_transition(&prev, &ledger);

        let persisted = match self.store.save(&ledger) {
            Ok(()) => true,
            Err(e) => {
                tracing::error!("Failed to save ledger, keeping it for the next cycle: {}", e);
                *pending = Some(ledger.clone());
                false
            }
        };
        *self.latest.write().await = Some(ledger.clone());

        tracing::debug!(
            status = %ledger.last_status,
            latency = ?ledger.latency,
            persisted,
            "cycle complete"
        );

        CycleReport {
            ledger,
            observation,
            persisted,
        }
    }

    /// Latest ledger, including one that has not been persisted yet.
    ///
    /// Never waits for a probe in flight.
    pub async fn current(&self) -> Ledger {
        let latest = self.latest.read().await.clone();
        match latest {
            Some(ledger) => ledger,
            None => self.store.load(),
        }
    }
}

fn log_transition(prev: &Ledger, next: &Ledger) {
    if prev.last_status == next.last_status {
        return;
    }

    match next.last_status {
        LedgerStatus::Offline => tracing::warn!(
            "Target went offline: {}",
            next.error.as_deref().unwrap_or("no detail")
        ),
        LedgerStatus::Online if next.total_outages > prev.total_outages => {
            let duration = next.downtime_incidents.first().map(|i| i.duration).unwrap_or(0);
            tracing::info!("Target back online after {}s down", duration);
        }
        LedgerStatus::Online => tracing::info!("Target online"),
        LedgerStatus::Unknown => {}
    }
}

//! Scheduler module for running probe cycles on a fixed interval.

mod monitor;

pub use monitor::*;

use crate::ledger::LedgerStore;
use crate::probe::Prober;

use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{broadcast, Mutex};

/// Drives a [`Monitor`] once per poll interval.
pub struct Scheduler<P, S> {
    monitor: Arc<Monitor<P, S>>,
    interval: Duration,
    stop: Mutex<Option<broadcast::Sender<()>>>,
}

impl<P, S> Scheduler<P, S>
where
    P: Prober + 'static,
    S: LedgerStore + 'static,
{
    pub fn new(monitor: Arc<Monitor<P, S>>, interval: Duration) -> Self {
        let interval = if interval.is_zero() {
            Duration::from_secs(60)
        } else {
            interval
        };

        Self {
            monitor,
            interval,
            stop: Mutex::new(None),
        }
    }

    /// Start the probe loop in the background. Starting twice is a no-op.
    pub async fn start(&self) {
        let mut stop = self.stop.lock().await;
        if stop.is_some() {
            return; // Already running
        }

        let (stop_tx, stop_rx) = broadcast::channel(1);
        *stop = Some(stop_tx);
        drop(stop);

        tracing::info!("Scheduler: probing every {:?}", self.interval);
        tokio::spawn(run_cycle_loop(self.monitor.clone(), self.interval, stop_rx));
    }

    /// Stop the probe loop. A cycle already in flight finishes first.
    pub async fn stop(&self) {
        if let Some(stop_tx) = self.stop.lock().await.take() {
            let _ = stop_tx.send(());
            tracing::info!("Scheduler: stopped");
        }
    }
}

async fn run_cycle_loop<P, S>(
    monitor: Arc<Monitor<P, S>>,
    interval_duration: Duration,
    mut stop_rx: broadcast::Receiver<()>,
) where
    P: Prober,
    S: LedgerStore,
{
    let mut interval = tokio::time::interval(interval_duration);
    interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

    loop {
        tokio::select! {
            biased;
            _ = stop_rx.recv() => {
                break;
            }
            _ = interval.tick() => {
                // Cycles run inline so at most one is in flight
                monitor.run_cycle().await;
            }
        }
    }
}

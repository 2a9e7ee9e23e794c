//! HTTP request handlers.

use super::AppState;
use crate::ledger::Ledger;
use crate::presenter::Summary;

use axum::{
    extract::State,
    response::{IntoResponse, Json},
};
use chrono::Utc;
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct StatusResponse {
    pub ledger: Ledger,
    pub summary: Summary,
}

/// Current ledger plus its display summary. Does not probe.
pub async fn handle_status(State(state): State<AppState>) -> impl IntoResponse {
    let ledger = state.monitor.current().await;
    let summary = Summary::from_ledger(&ledger, Utc::now());
    Json(StatusResponse { ledger, summary })
}

/// Run exactly one probe-and-update cycle and return its outcome.
pub async fn handle_check(State(state): State<AppState>) -> impl IntoResponse {
    let report = state.monitor.run_cycle().await;
    tracing::info!(
        "Manual check of {}: {}",
        state.monitor.prober().config().address(),
        report.ledger.last_status
    );
    Json(report)
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    status: &'static str,
    version: &'static str,
}

pub async fn handle_health() -> impl IntoResponse {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::MonitorConfig;
    use crate::ledger::{FileStore, LedgerStatus, LedgerStore};
    use crate::probe::{ProbeConfig, ProbeKind, TargetProber};
    use crate::scheduler::Monitor;
    use axum::body::to_bytes;
    use axum::http::StatusCode;
    use std::sync::Arc;
    use std::time::Duration;
    use tempfile::TempDir;
    use tokio::net::TcpListener;

    fn state(port: u16, dir: &TempDir) -> AppState {
        let config = MonitorConfig {
            target_port: port,
            ledger_path: dir.path().join("ledger.json").display().to_string(),
            ..Default::default()
        };
        let prober = TargetProber::new(ProbeConfig::new(
            ProbeKind::Tcp,
            "127.0.0.1",
            port,
            Duration::from_secs(2),
        ));
        let store = FileStore::new(&config.ledger_path);
        AppState {
            config,
            monitor: Arc::new(Monitor::new(prober, store)),
        }
    }

    async fn body_json(response: axum::response::Response) -> serde_json::Value {
        assert_eq!(response.status(), StatusCode::OK);
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_status_before_any_check() {
        let dir = TempDir::new().unwrap();
        let response = handle_status(State(state(9, &dir))).await.into_response();
        let body = body_json(response).await;

        assert_eq!(body["ledger"]["lastStatus"], "unknown");
        assert_eq!(body["summary"]["uptime"], "n/a");
    }

    #[tokio::test]
    async fn test_check_runs_one_cycle_and_persists() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = listener.local_addr().unwrap().port();
        let dir = TempDir::new().unwrap();
        let state = state(port, &dir);

        let response = handle_check(State(state.clone())).await.into_response();
        let body = body_json(response).await;
        assert_eq!(body["observation"]["online"], true);
        assert_eq!(body["persisted"], true);
        assert_eq!(body["ledger"]["lastStatus"], "online");

        let stored = FileStore::new(&state.config.ledger_path).load();
        assert_eq!(stored.last_status, LedgerStatus::Online);

        let response = handle_status(State(state)).await.into_response();
        let body = body_json(response).await;
        assert_eq!(body["summary"]["status"], "Online");
    }

    #[tokio::test]
    async fn test_check_against_closed_port_reports_offline() {
        let port = {
            let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
            listener.local_addr().unwrap().port()
        };
        let dir = TempDir::new().unwrap();

        let response = handle_check(State(state(port, &dir))).await.into_response();
        let body = body_json(response).await;
        assert_eq!(body["ledger"]["lastStatus"], "offline");
        assert!(body["ledger"]["error"].is_string());
        assert!(body["ledger"]["latency"].is_null());
    }

    #[tokio::test]
    async fn test_health() {
        let body = body_json(handle_health().await.into_response()).await;
        assert_eq!(body["status"], "ok");
    }
}

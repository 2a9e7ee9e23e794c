//! HTTP probe implementation.

use std::time::{Duration, Instant};
use super::ProbeError;

/// Build the URL probed for `host` on `port`.
///
/// A host that already carries a scheme is used as given.
pub fn probe_url(host: &str, port: u16) -> String {
    if host.starts_with("http://") || host.starts_with("https://") {
        return host.to_string();
    }

    let host = if host.contains(':') && !host.starts_with('[') {
        format!("[{}]", host)
    } else {
        host.to_string()
    };

    match port {
        443 => format!("https://{}/", host),
        80 => format!("http://{}/", host),
        port => format!("http://{}:{}/", host, port),
    }
}

/// Send an HTTP HEAD request to the target.
///
/// Any response, whatever its status code, means the host answered.
/// Returns latency in milliseconds.
pub async fn run_http_probe(host: &str, port: u16, timeout: Duration) -> Result<f64, ProbeError> {
    let url = probe_url(host, port);

    let client = reqwest::Client::builder()
        .timeout(timeout)
        .no_proxy()
        .build()
        .map_err(|e| ProbeError::Network(e.to_string()))?;

    let start = Instant::now();

    let response = client
        .head(&url)
        .send()
        .await
        .map_err(|e| {
            if e.is_timeout() {
                ProbeError::Timeout(timeout)
            } else {
                ProbeError::Network(e.to_string())
            }
        })?;

    let elapsed = start.elapsed().as_secs_f64() * 1000.0;
    tracing::trace!("HEAD {} -> {}", url, response.status());

    Ok(elapsed)
}

//! TCP connect probe implementation.

use std::time::Instant;
use tokio::net::TcpStream;

use super::ProbeError;

/// Open and immediately close a TCP connection to `address`.
///
/// Returns connect latency in milliseconds. The caller bounds the wait.
pub async fn run_tcp_probe(address: &str) -> Result<f64, ProbeError> {
    let start = Instant::now();

    let stream = TcpStream::connect(address)
        .await
        .map_err(|e| ProbeError::Network(format!("failed to connect to {}: {}", address, e)))?;

    let elapsed = start.elapsed().as_secs_f64() * 1000.0;
    drop(stream);

    Ok(elapsed)
}

//! Ping probe implementation using the system `ping` command.

use std::process::Stdio;
use std::sync::OnceLock;
use std::time::Duration;

use regex::Regex;
use tokio::process::Command;

use super::ProbeError;

/// Send a single echo request to `host`.
///
/// Returns round-trip time in milliseconds.
pub async fn run_ping_probe(host: &str, timeout: Duration) -> Result<f64, ProbeError> {
    let wait_secs = timeout.as_secs().max(1).to_string();

    // BSD ping takes the overall deadline with -t, iputils takes the reply wait with -W
    let wait_flag = if cfg!(target_os = "macos") { "-t" } else { "-W" };

    let output = Command::new("ping")
        .args(["-c", "1", wait_flag, &wait_secs, host])
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true)
        .output()
        .await
        .map_err(|e| ProbeError::Command(format!("failed to execute ping: {}", e)))?;

    let stdout = String::from_utf8_lossy(&output.stdout);

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        if stderr.contains("timeout")
            || stdout.contains("100% packet loss")
            || stdout.contains("100.0% packet loss")
        {
            return Err(ProbeError::Timeout(timeout));
        }
        let detail = if stderr.trim().is_empty() { stdout.trim() } else { stderr.trim() };
        return Err(ProbeError::Network(format!("ping failed: {}", detail)));
    }

    parse_ping_output(&stdout)
}

/// Parse ping command output for round-trip time in milliseconds.
fn parse_ping_output(output: &str) -> Result<f64, ProbeError> {
    // Per-packet reply "time=X.XXX ms"
    static REPLY: OnceLock<Regex> = OnceLock::new();
    let reply = REPLY.get_or_init(|| {
        Regex::new(r"time[=<](?P<ms>[0-9.]+)\s*ms").expect("reply pattern is valid")
    });

    if let Some(ms) = reply.captures(output).and_then(|c| parse_ms(c.name("ms"))) {
        return Ok(ms);
    }

    // Summary line, Linux "rtt min/avg/max/mdev" or macOS "round-trip min/avg/max/stddev"
    static SUMMARY: OnceLock<Regex> = OnceLock::new();
    let summary = SUMMARY.get_or_init(|| {
        Regex::new(r"(?:rtt|round-trip)\s+min/avg/max/(?:mdev|stddev)\s*=\s*[0-9.]+/(?P<avg>[0-9.]+)/")
            .expect("summary pattern is valid")
    });

    if let Some(ms) = summary.captures(output).and_then(|c| parse_ms(c.name("avg"))) {
        return Ok(ms);
    }

    Err(ProbeError::Command(format!(
        "failed to parse ping output: {}",
        output
    )))
}

fn parse_ms(m: Option<regex::Match<'_>>) -> Option<f64> {
    m.and_then(|m| m.as_str().parse::<f64>().ok())
}

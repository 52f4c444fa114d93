use std::io;
use std::net::IpAddr;
use std::process::Stdio;
use std::time::Duration;

use tokio::process::Command;
use tokio::time::timeout;

use crate::error::DiscoverError;
use crate::probe::Prober;

/// Grace added on top of ping's own wait so a wedged child cannot stall a
/// round indefinitely.
const PING_GRACE: Duration = Duration::from_secs(1);

/// Prober backed by the system `traceroute` and `ping` binaries.
#[derive(Debug, Clone)]
pub struct SystemProber {
    probe_timeout: Duration,
    discovery_timeout: Duration,
}

impl SystemProber {
    pub fn new(probe_timeout: Duration, discovery_timeout: Duration) -> Self {
        Self {
            probe_timeout,
            discovery_timeout,
        }
    }

    fn traceroute_command(&self, destination: IpAddr, max_hops: u8, icmp: bool) -> Command {
        let mut cmd = Command::new("traceroute");
        if icmp {
            cmd.arg("-I");
        }
        cmd.arg("-n")
            .arg("-m")
            .arg(max_hops.to_string())
            .arg(destination.to_string())
            .stdin(Stdio::null())
            .kill_on_drop(true);
        cmd
    }

    async fn run_traceroute(
        &self,
        destination: IpAddr,
        max_hops: u8,
        icmp: bool,
    ) -> Result<std::process::Output, DiscoverError> {
        let mut cmd = self.traceroute_command(destination, max_hops, icmp);
        timeout(self.discovery_timeout, cmd.output())
            .await
            .map_err(|_| DiscoverError::TimedOut(self.discovery_timeout))?
            .map_err(|e| {
                if e.kind() == io::ErrorKind::NotFound {
                    DiscoverError::ToolMissing
                } else {
                    DiscoverError::Io(e)
                }
            })
    }
}

impl Prober for SystemProber {
    async fn discover_route(
        &self,
        destination: IpAddr,
        max_hops: u8,
    ) -> Result<String, DiscoverError> {
        let mut output = self.run_traceroute(destination, max_hops, false).await?;

        // Some traceroute builds reject the default probe mode; retry in
        // ICMP mode when they say so.
        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            if stderr.contains("Unsupported Werror") {
                output = self.run_traceroute(destination, max_hops, true).await?;
            }
        }

        // A partial trace still prints usable hop lines, so exit status
        // alone is not a failure. No output at all is.
        if output.stdout.is_empty() && !output.status.success() {
            return Err(DiscoverError::Failed {
                status: output.status.to_string(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }

    async fn probe_latency(&self, addr: IpAddr) -> Option<Duration> {
        let wait_secs = self.probe_timeout.as_secs().max(1);
        let mut cmd = Command::new("ping");
        cmd.arg("-c")
            .arg("1")
            .arg("-W")
            .arg(wait_secs.to_string())
            .arg(addr.to_string())
            .stdin(Stdio::null())
            .stderr(Stdio::null())
            .kill_on_drop(true);

        let bound = self.probe_timeout + PING_GRACE;
        let output = timeout(bound, cmd.output()).await.ok()?.ok()?;
        if !output.status.success() {
            return None;
        }

        parse_ping_time(&String::from_utf8_lossy(&output.stdout))
    }
}

/// Determine the local IP the kernel would route toward `target`.
///
/// Uses the UDP connect trick: connecting a UDP socket sends no packets but
/// makes the kernel pick a source address. Returns None when that fails, in
/// which case callers skip origin-based filtering rather than guess.
pub fn local_source_addr(target: IpAddr) -> Option<IpAddr> {
    use std::net::{SocketAddr, UdpSocket};

    let bind_addr = match target {
        IpAddr::V4(_) => "0.0.0.0:0",
        IpAddr::V6(_) => "[::]:0",
    };

    let socket = UdpSocket::bind(bind_addr).ok()?;
    socket.connect(SocketAddr::new(target, 80)).ok()?;
    Some(socket.local_addr().ok()?.ip())
}

/// Pull the RTT out of ping output, e.g.
/// `64 bytes from 10.0.0.1: icmp_seq=1 ttl=64 time=12.3 ms`.
/// Handles both `time=12.3 ms` and the `time=12.3ms` shape some builds print.
/// Values a `Duration` cannot represent are treated as absent.
fn parse_ping_time(output: &str) -> Option<Duration> {
    for token in output.split_whitespace() {
        if let Some(value) = token.strip_prefix("time=") {
            let value = value.strip_suffix("ms").unwrap_or(value);
            if let Ok(ms) = value.parse::<f64>()
                && let Ok(rtt) = Duration::try_from_secs_f64(ms / 1000.0)
            {
                return Some(rtt);
            }
        }
    }
    None
}

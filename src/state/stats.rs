use std::fmt;
use std::net::IpAddr;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Serialize, Serializer};

/// Identity of one hop on the path: a concrete address, or a hop that
/// never answered during discovery.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HopAddr {
    Addr(IpAddr),
    Unknown,
}

impl fmt::Display for HopAddr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HopAddr::Addr(ip) => ip.fmt(f),
            HopAddr::Unknown => f.write_str("???"),
        }
    }
}

impl Serialize for HopAddr {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Running statistics for a single hop.
///
/// One record per hop, created right after discovery and mutated exactly
/// once per round. Aggregates are streaming (running min/max plus an
/// incremental mean), so memory stays constant over unbounded runs while
/// the observable values match the full sample history.
#[derive(Debug, Clone, Serialize)]
pub struct HopStats {
    pub addr: HopAddr,
    /// Rounds attempted.
    pub sent: u64,
    /// Rounds with no response.
    pub lost: u64,
    /// Rounds that produced a sample. `sent == lost + received` always.
    pub received: u64,
    /// RTT of the most recent round, `None` if that round was lost.
    #[serde(serialize_with = "ms_opt")]
    pub last: Option<Duration>,
    /// Minimum RTT seen, `None` until the first sample.
    #[serde(serialize_with = "ms_opt")]
    pub best: Option<Duration>,
    /// Maximum RTT seen, `None` until the first sample.
    #[serde(serialize_with = "ms_opt")]
    pub worst: Option<Duration>,
    /// Incremental mean over all samples, in milliseconds.
    #[serde(rename = "avg")]
    pub mean_ms: f64,
}

impl HopStats {
    pub fn new(addr: HopAddr) -> Self {
        Self {
            addr,
            sent: 0,
            lost: 0,
            received: 0,
            last: None,
            best: None,
            worst: None,
            mean_ms: 0.0,
        }
    }

    /// Apply one round's probe outcome.
    pub fn record(&mut self, outcome: Option<Duration>) {
        self.sent += 1;
        match outcome {
            Some(rtt) => {
                self.received += 1;
                self.last = Some(rtt);
                if self.best.is_none_or(|best| rtt < best) {
                    self.best = Some(rtt);
                }
                if self.worst.is_none_or(|worst| rtt > worst) {
                    self.worst = Some(rtt);
                }
                let ms = rtt.as_secs_f64() * 1000.0;
                self.mean_ms += (ms - self.mean_ms) / self.received as f64;
            }
            None => {
                self.lost += 1;
                self.last = None;
            }
        }
    }

    /// Loss percentage, 0.0 before any round has run.
    pub fn loss_pct(&self) -> f64 {
        if self.sent == 0 {
            0.0
        } else {
            self.lost as f64 / self.sent as f64 * 100.0
        }
    }

    pub fn last_ms(&self) -> f64 {
        as_ms(self.last)
    }

    pub fn best_ms(&self) -> f64 {
        as_ms(self.best)
    }

    pub fn worst_ms(&self) -> f64 {
        as_ms(self.worst)
    }

    /// Mean RTT in milliseconds, 0.0 while no samples exist.
    pub fn avg_ms(&self) -> f64 {
        if self.received == 0 { 0.0 } else { self.mean_ms }
    }
}

fn as_ms(d: Option<Duration>) -> f64 {
    d.map_or(0.0, |d| d.as_secs_f64() * 1000.0)
}

fn ms_opt<S: Serializer>(d: &Option<Duration>, serializer: S) -> Result<S::Ok, S::Error> {
    match d {
        Some(d) => serializer.serialize_some(&(d.as_secs_f64() * 1000.0)),
        None => serializer.serialize_none(),
    }
}

/// Immutable point-in-time view of the whole monitoring session, handed to
/// renderers and batch exporters. Never mutated after publication.
#[derive(Debug, Clone, Serialize)]
pub struct Snapshot {
    /// Destination as given on the command line.
    pub destination: String,
    /// Resolved destination address.
    pub resolved: IpAddr,
    pub started_at: DateTime<Utc>,
    /// Completed rounds so far.
    pub rounds: u64,
    /// Per-hop statistics in path order, 1-indexed for display.
    pub hops: Vec<HopStats>,
}

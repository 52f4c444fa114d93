use std::time::Duration;

use crate::cli::Args;

/// How long route discovery may take before it is abandoned
pub const DISCOVERY_TIMEOUT: Duration = Duration::from_secs(60);

/// Runtime configuration derived from CLI args
#[derive(Debug, Clone)]
pub struct Config {
    /// Number of rounds to run (None = until interrupted)
    pub count: Option<u64>,
    /// Interval between rounds
    pub interval: Duration,
    /// Maximum hops during route discovery
    pub max_hops: u8,
    /// Per-probe timeout
    pub probe_timeout: Duration,
    /// Route discovery timeout
    pub discovery_timeout: Duration,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            count: None,
            interval: Duration::from_secs(1),
            max_hops: 30,
            probe_timeout: Duration::from_secs(1),
            discovery_timeout: DISCOVERY_TIMEOUT,
        }
    }
}

impl From<&Args> for Config {
    fn from(args: &Args) -> Self {
        Self {
            count: if args.count == 0 { None } else { Some(args.count) },
            interval: args.interval_duration(),
            max_hops: args.max_hops,
            probe_timeout: args.timeout_duration(),
            discovery_timeout: DISCOVERY_TIMEOUT,
        }
    }
}

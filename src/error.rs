use std::io;
use std::net::IpAddr;
use std::time::Duration;

use thiserror::Error;

/// Failure to turn the destination name into an address.
///
/// Always fatal: without an address neither discovery nor probing can run.
#[derive(Debug, Error)]
pub enum ResolveError {
    #[error("could not resolve host: {0}")]
    NoAddress(String),

    #[error("could not resolve host: {host}: {source}")]
    Lookup {
        host: String,
        #[source]
        source: io::Error,
    },
}

/// Failure to discover the hop path.
///
/// Always fatal and never retried: discovery determines the entire
/// monitoring topology, so there is nothing sensible to fall back to.
#[derive(Debug, Error)]
pub enum DiscoverError {
    #[error("'traceroute' command not found")]
    ToolMissing,

    #[error("route discovery timed out after {}s", .0.as_secs())]
    TimedOut(Duration),

    #[error("traceroute failed ({status}): {stderr}")]
    Failed { status: String, stderr: String },

    #[error("could not discover route to {0}")]
    EmptyPath(IpAddr),

    #[error("could not run traceroute: {0}")]
    Io(#[from] io::Error),
}

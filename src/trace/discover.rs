use std::net::IpAddr;

use crate::error::DiscoverError;
use crate::probe::{Prober, local_source_addr};
use crate::state::HopAddr;

/// Discover the hop path to `destination`.
///
/// Runs the prober's route discovery once, parses its per-hop output, and
/// normalizes the result. The returned path always ends at the destination
/// and is never empty; unusable discovery output is a fatal error because
/// it determines the entire monitoring topology.
pub async fn discover<P: Prober>(
    prober: &P,
    destination: IpAddr,
    max_hops: u8,
) -> Result<Vec<HopAddr>, DiscoverError> {
    let raw = prober.discover_route(destination, max_hops).await?;
    let hops = parse_hops(&raw);
    if hops.is_empty() {
        return Err(DiscoverError::EmptyPath(destination));
    }
    Ok(normalize(hops, local_source_addr(destination), destination))
}

/// Parse raw traceroute-style output into one entry per hop.
///
/// A hop line starts with the hop number; the first address-shaped token on
/// it names the responder, and a line with none (`5  * * *`) is a hop that
/// never answered. Header, blank, and otherwise unparseable lines are
/// skipped without consuming a hop index.
pub fn parse_hops(raw: &str) -> Vec<HopAddr> {
    let mut hops = Vec::new();

    for line in raw.lines() {
        let mut tokens = line.split_whitespace();
        let Some(first) = tokens.next() else {
            continue;
        };
        if !first.bytes().all(|b| b.is_ascii_digit()) {
            continue;
        }

        let addr = tokens.find_map(|t| t.parse::<IpAddr>().ok());
        hops.push(match addr {
            Some(ip) => HopAddr::Addr(ip),
            None => HopAddr::Unknown,
        });
    }

    hops
}

/// Normalize a parsed hop path, in order:
///
/// 1. drop the first hop when it is this host's own address (a probe
///    artifact on some systems), unless it is the only hop;
/// 2. truncate after the first occurrence of the destination, or append the
///    destination when discovery never reached it;
/// 3. collapse identical terminal entries to one.
pub fn normalize(
    mut hops: Vec<HopAddr>,
    origin: Option<IpAddr>,
    destination: IpAddr,
) -> Vec<HopAddr> {
    if hops.len() > 1
        && let Some(origin) = origin
        && hops[0] == HopAddr::Addr(origin)
    {
        hops.remove(0);
    }

    let dest = HopAddr::Addr(destination);
    match hops.iter().position(|&h| h == dest) {
        Some(pos) => hops.truncate(pos + 1),
        None => hops.push(dest),
    }

    while hops.len() > 1 && hops[hops.len() - 1] == hops[hops.len() - 2] {
        hops.pop();
    }

    hops
}

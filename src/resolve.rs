use std::net::{IpAddr, ToSocketAddrs};

use crate::error::ResolveError;

/// Resolve the destination to the address everything else keys on.
///
/// Literal addresses pass through without a lookup; names go to the system
/// resolver, preferring IPv4 when both families come back (matching what
/// the system traceroute will probe by default).
pub fn resolve_destination(host: &str) -> Result<IpAddr, ResolveError> {
    if let Ok(ip) = host.parse::<IpAddr>() {
        return Ok(ip);
    }

    let addrs: Vec<IpAddr> = (host, 0)
        .to_socket_addrs()
        .map_err(|source| ResolveError::Lookup {
            host: host.to_string(),
            source,
        })?
        .map(|sa| sa.ip())
        .collect();

    addrs
        .iter()
        .find(|ip| ip.is_ipv4())
        .or_else(|| addrs.first())
        .copied()
        .ok_or_else(|| ResolveError::NoAddress(host.to_string()))
}

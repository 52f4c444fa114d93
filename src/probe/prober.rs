use std::net::IpAddr;
use std::time::Duration;

use crate::error::DiscoverError;

/// The network probing capability everything above depends on.
///
/// The production implementation shells out to the system traceroute and
/// ping binaries; tests substitute scripted doubles. Nothing above this
/// trait knows which transport is in play.
#[allow(async_fn_in_trait)]
pub trait Prober {
    /// Produce the raw per-hop discovery output for the path to
    /// `destination`, probing at most `max_hops` hops. May take
    /// significant wall-clock time; the implementation must bound it.
    async fn discover_route(
        &self,
        destination: IpAddr,
        max_hops: u8,
    ) -> Result<String, DiscoverError>;

    /// One bounded round-trip measurement against a single hop.
    ///
    /// Every failure mode collapses to `None`: an unresponsive hop and a
    /// broken probing facility are both just a lost sample.
    async fn probe_latency(&self, addr: IpAddr) -> Option<Duration>;
}

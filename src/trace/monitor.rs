use std::net::IpAddr;
use std::time::Duration;

use anyhow::Result;
use chrono::{DateTime, Utc};
use futures::future::join_all;
use tokio_util::sync::CancellationToken;

use crate::config::Config;
use crate::probe::Prober;
use crate::state::{HopAddr, HopStats, Snapshot};
use crate::tui::Render;

/// The monitor probes every hop once per interval and keeps the running
/// statistics for each. It owns the statistics table outright; renderers
/// only ever see immutable snapshots.
pub struct Monitor<P> {
    config: Config,
    destination: String,
    resolved: IpAddr,
    prober: P,
    hops: Vec<HopStats>,
    started_at: DateTime<Utc>,
    rounds: u64,
    cancel: CancellationToken,
}

impl<P: Prober> Monitor<P> {
    pub fn new(
        config: Config,
        destination: String,
        resolved: IpAddr,
        path: Vec<HopAddr>,
        prober: P,
        cancel: CancellationToken,
    ) -> Self {
        let hops = path.into_iter().map(HopStats::new).collect();
        Self {
            config,
            destination,
            resolved,
            prober,
            hops,
            started_at: Utc::now(),
            rounds: 0,
            cancel,
        }
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            destination: self.destination.clone(),
            resolved: self.resolved,
            started_at: self.started_at,
            rounds: self.rounds,
            hops: self.hops.clone(),
        }
    }

    /// Probe every hop once, in path order. Probes run concurrently but the
    /// outcomes come back in path order, and nothing is applied to the
    /// statistics until the whole round has completed. Unknown hops are
    /// never handed to the prober; they count as lost without a probe.
    async fn probe_round(&self) -> Vec<Option<Duration>> {
        let probes = self.hops.iter().map(|hop| async move {
            match hop.addr {
                HopAddr::Addr(ip) => self.prober.probe_latency(ip).await,
                HopAddr::Unknown => None,
            }
        });
        join_all(probes).await
    }

    /// Run rounds until cancelled or the configured round count is reached.
    ///
    /// A snapshot is published to the renderer after every completed round
    /// (plus one up front so the path shows before the first round lands).
    /// Cancellation observed mid-round discards that round's outcomes
    /// rather than publishing a partial update. Returns the final snapshot.
    pub async fn run<R: Render>(mut self, render: &mut R) -> Result<Snapshot> {
        let mut interval = tokio::time::interval(self.config.interval);
        interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

        render.draw(&self.snapshot())?;

        loop {
            // Biased polling: cancellation always wins a tie with the tick,
            // so no new round starts once the token is cancelled.
            tokio::select! {
                biased;
                _ = self.cancel.cancelled() => {
                    break;
                }
                _ = interval.tick() => {
                    let outcomes = tokio::select! {
                        biased;
                        _ = self.cancel.cancelled() => break,
                        outcomes = self.probe_round() => outcomes,
                    };

                    for (hop, outcome) in self.hops.iter_mut().zip(outcomes) {
                        hop.record(outcome);
                    }
                    self.rounds += 1;

                    render.draw(&self.snapshot())?;

                    if let Some(count) = self.config.count
                        && self.rounds >= count
                    {
                        break;
                    }
                }
            }
        }

        Ok(self.snapshot())
    }
}

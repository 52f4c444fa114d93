//! Integration tests for the discover→monitor→snapshot pipeline
//!
//! These tests drive the monitor with a scripted prober, verifying the
//! statistics flow without requiring actual network access.

use std::collections::HashMap;
use std::net::IpAddr;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio_util::sync::CancellationToken;

use hopmon::config::Config;
use hopmon::error::DiscoverError;
use hopmon::probe::Prober;
use hopmon::state::{HopAddr, Snapshot};
use hopmon::trace::{Monitor, discover};
use hopmon::tui::Render;

type CallLog = Arc<Mutex<HashMap<IpAddr, usize>>>;

/// Prober that replays canned traceroute output and per-address RTT
/// sequences. Once a sequence runs out its last entry repeats. The call
/// log is shared so tests can inspect it after the prober moves into the
/// monitor.
struct ScriptedProber {
    raw: String,
    plan: HashMap<IpAddr, Vec<Option<Duration>>>,
    calls: CallLog,
}

impl ScriptedProber {
    fn new(raw: &str) -> Self {
        Self {
            raw: raw.to_string(),
            plan: HashMap::new(),
            calls: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    fn with_rtts(mut self, addr: &str, rtts: Vec<Option<Duration>>) -> Self {
        self.plan.insert(addr.parse().unwrap(), rtts);
        self
    }

    fn call_log(&self) -> CallLog {
        self.calls.clone()
    }
}

impl Prober for ScriptedProber {
    async fn discover_route(
        &self,
        _destination: IpAddr,
        _max_hops: u8,
    ) -> Result<String, DiscoverError> {
        Ok(self.raw.clone())
    }

    async fn probe_latency(&self, addr: IpAddr) -> Option<Duration> {
        let idx = {
            let mut calls = self.calls.lock().unwrap();
            let n = calls.entry(addr).or_insert(0);
            let idx = *n;
            *n += 1;
            idx
        };
        let seq = self.plan.get(&addr)?;
        seq.get(idx).or_else(|| seq.last()).copied().flatten()
    }
}

/// Renderer that keeps every published snapshot.
#[derive(Default)]
struct CollectingRender {
    snapshots: Vec<Snapshot>,
}

impl Render for CollectingRender {
    fn draw(&mut self, snapshot: &Snapshot) -> anyhow::Result<()> {
        self.snapshots.push(snapshot.clone());
        Ok(())
    }
}

fn test_config(count: u64) -> Config {
    Config {
        count: Some(count),
        interval: Duration::from_millis(1),
        ..Config::default()
    }
}

fn ms(v: u64) -> Option<Duration> {
    Some(Duration::from_millis(v))
}

fn total_calls(log: &CallLog) -> usize {
    log.lock().unwrap().values().sum()
}

// Addresses come from the TEST-NET ranges so the origin-hop heuristic can
// never match a real local address and disturb the expected path.
const THREE_HOP_TRACE: &str = concat!(
    " 1  198.51.100.1  0.5 ms  0.5 ms  0.5 ms\n",
    " 2  198.51.100.2  1.2 ms  1.2 ms  1.2 ms\n",
    " 3  203.0.113.9  4.9 ms  4.9 ms  4.9 ms\n",
);

const UNKNOWN_HOP_TRACE: &str = concat!(
    " 1  198.51.100.1  0.5 ms\n",
    " 2  * * *\n",
    " 3  203.0.113.9  4.9 ms\n",
);

#[tokio::test]
async fn test_three_hops_five_rounds_middle_hop_dark() {
    let dest: IpAddr = "203.0.113.9".parse().unwrap();
    let prober = ScriptedProber::new(THREE_HOP_TRACE)
        .with_rtts("198.51.100.1", vec![ms(20)])
        .with_rtts("203.0.113.9", vec![ms(20)]);
    // 198.51.100.2 has no plan entry: every probe of it is lost.

    let path = discover(&prober, dest, 30).await.unwrap();
    assert_eq!(path.len(), 3);

    let monitor = Monitor::new(
        test_config(5),
        "example.net".to_string(),
        dest,
        path,
        prober,
        CancellationToken::new(),
    );
    let mut render = CollectingRender::default();
    let last = monitor.run(&mut render).await.unwrap();

    assert_eq!(last.rounds, 5);
    assert_eq!(last.hops.len(), 3);

    let dark = &last.hops[1];
    assert_eq!(dark.sent, 5);
    assert_eq!(dark.lost, 5);
    assert_eq!(dark.last, None);
    assert_eq!(dark.best, None);
    assert_eq!(dark.last_ms(), 0.0);
    assert_eq!(dark.worst_ms(), 0.0);

    for hop in [&last.hops[0], &last.hops[2]] {
        assert_eq!(hop.sent, 5);
        assert_eq!(hop.lost, 0);
        assert_eq!(hop.last_ms(), 20.0);
        assert_eq!(hop.avg_ms(), 20.0);
        assert_eq!(hop.best_ms(), 20.0);
        assert_eq!(hop.worst_ms(), 20.0);
    }
}

#[tokio::test]
async fn test_unknown_hop_counts_loss_without_probing() {
    let dest: IpAddr = "203.0.113.9".parse().unwrap();
    let prober = ScriptedProber::new(UNKNOWN_HOP_TRACE)
        .with_rtts("198.51.100.1", vec![ms(10)])
        .with_rtts("203.0.113.9", vec![ms(15)]);
    let log = prober.call_log();

    let path = discover(&prober, dest, 30).await.unwrap();
    assert_eq!(path[1], HopAddr::Unknown);

    let monitor = Monitor::new(
        test_config(4),
        "203.0.113.9".to_string(),
        dest,
        path,
        prober,
        CancellationToken::new(),
    );
    let mut render = CollectingRender::default();
    let last = monitor.run(&mut render).await.unwrap();

    let unknown = &last.hops[1];
    assert_eq!(unknown.sent, 4);
    assert_eq!(unknown.lost, 4);
    assert_eq!(unknown.received, 0);

    // Two known hops, four rounds each; the unknown hop never reached the
    // prober at all.
    assert_eq!(total_calls(&log), 8);
    let calls = log.lock().unwrap();
    assert_eq!(calls.len(), 2);
    assert_eq!(calls.get(&"198.51.100.1".parse().unwrap()), Some(&4));
    assert_eq!(calls.get(&"203.0.113.9".parse().unwrap()), Some(&4));
}

#[tokio::test]
async fn test_snapshot_per_round_and_monotonic_counters() {
    let dest: IpAddr = "203.0.113.9".parse().unwrap();
    let prober = ScriptedProber::new(THREE_HOP_TRACE)
        .with_rtts("198.51.100.1", vec![ms(20)])
        .with_rtts("198.51.100.2", vec![ms(30), None, ms(25)])
        .with_rtts("203.0.113.9", vec![ms(40)]);

    let path = discover(&prober, dest, 30).await.unwrap();
    let monitor = Monitor::new(
        test_config(3),
        "example.net".to_string(),
        dest,
        path,
        prober,
        CancellationToken::new(),
    );
    let mut render = CollectingRender::default();
    monitor.run(&mut render).await.unwrap();

    // One snapshot up front, then one per round.
    assert_eq!(render.snapshots.len(), 4);
    for (i, snapshot) in render.snapshots.iter().enumerate() {
        assert_eq!(snapshot.rounds, i as u64);
        for hop in &snapshot.hops {
            assert_eq!(hop.sent, i as u64);
            assert_eq!(hop.sent, hop.lost + hop.received);
        }
    }

    let last = render.snapshots.last().unwrap();
    let middle = &last.hops[1];
    assert_eq!(middle.lost, 1);
    assert_eq!(middle.best, Some(Duration::from_millis(25)));
    assert_eq!(middle.worst, Some(Duration::from_millis(30)));
    assert_eq!(middle.last, Some(Duration::from_millis(25)));
}

#[tokio::test]
async fn test_cancelled_before_start_publishes_no_rounds() {
    let dest: IpAddr = "203.0.113.9".parse().unwrap();
    let prober = ScriptedProber::new(THREE_HOP_TRACE).with_rtts("198.51.100.1", vec![ms(20)]);
    let log = prober.call_log();
    let path = discover(&prober, dest, 30).await.unwrap();

    let cancel = CancellationToken::new();
    cancel.cancel();

    let monitor = Monitor::new(
        Config::default(),
        "example.net".to_string(),
        dest,
        path,
        prober,
        cancel,
    );
    let mut render = CollectingRender::default();
    let last = monitor.run(&mut render).await.unwrap();

    assert_eq!(last.rounds, 0);
    for hop in &last.hops {
        assert_eq!(hop.sent, 0);
    }
    // Only the initial pre-round snapshot went out, and nothing was probed.
    assert_eq!(render.snapshots.len(), 1);
    assert_eq!(total_calls(&log), 0);
}

struct BrokenProber;

impl Prober for BrokenProber {
    async fn discover_route(
        &self,
        _destination: IpAddr,
        _max_hops: u8,
    ) -> Result<String, DiscoverError> {
        Err(DiscoverError::ToolMissing)
    }

    async fn probe_latency(&self, _addr: IpAddr) -> Option<Duration> {
        None
    }
}

#[tokio::test]
async fn test_discovery_failure_is_surfaced() {
    let dest: IpAddr = "203.0.113.9".parse().unwrap();
    let err = discover(&BrokenProber, dest, 30).await.unwrap_err();
    assert!(matches!(err, DiscoverError::ToolMissing));
}

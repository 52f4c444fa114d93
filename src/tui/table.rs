use std::net::IpAddr;

use crate::state::{HopAddr, HopStats, Snapshot};

/// Total rendered width: 28 for the host column, then 7/6/7/7/7/7.
pub const TABLE_WIDTH: usize = 69;

/// Title line: program name on the left, `destination (resolved)` flushed
/// to the right edge of the table.
pub fn title_line(destination: &str, resolved: IpAddr) -> String {
    let left = format!(" hopmon v{}", env!("CARGO_PKG_VERSION"));
    let right = format!("{destination} ({resolved})");
    let pad = TABLE_WIDTH.saturating_sub(left.len());
    format!("{left}{right:>pad$}")
}

pub fn column_header() -> String {
    format!(
        "{:<28}{:>7}{:>6}{:>7}{:>7}{:>7}{:>7}",
        "Host", "Loss%", "Snt", "Last", "Avg", "Best", "Wrst"
    )
}

/// One table row. Hops that never identified themselves during discovery
/// show only their index and `???`; their statistics columns stay blank.
pub fn format_row(index: usize, hop: &HopStats) -> String {
    let host = format!(" {}. {}", index + 1, hop.addr);
    if hop.addr == HopAddr::Unknown {
        return format!("{host:<28}");
    }
    format!(
        "{:<28}{:>7}{:>6}{:>7.1}{:>7.1}{:>7.1}{:>7.1}",
        host,
        format!("{:.1}%", hop.loss_pct()),
        hop.sent,
        hop.last_ms(),
        hop.avg_ms(),
        hop.best_ms(),
        hop.worst_ms(),
    )
}

/// The full table for one snapshot, top to bottom.
pub fn render_lines(snapshot: &Snapshot) -> Vec<String> {
    let mut lines = Vec::with_capacity(snapshot.hops.len() + 2);
    lines.push(title_line(&snapshot.destination, snapshot.resolved));
    lines.push(column_header());
    for (index, hop) in snapshot.hops.iter().enumerate() {
        lines.push(format_row(index, hop));
    }
    lines
}

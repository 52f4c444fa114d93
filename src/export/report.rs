use std::io::Write;

use crate::state::Snapshot;
use crate::tui::{TABLE_WIDTH, column_header, format_row};

/// Generate a text report similar to mtr --report
pub fn generate_report<W: Write>(snapshot: &Snapshot, mut writer: W) -> std::io::Result<()> {
    writeln!(
        writer,
        "hopmon report for {} ({})",
        snapshot.destination, snapshot.resolved
    )?;
    writeln!(
        writer,
        "Started: {}",
        snapshot.started_at.format("%Y-%m-%d %H:%M:%S UTC")
    )?;
    writeln!(writer, "Rounds: {}", snapshot.rounds)?;
    writeln!(writer)?;

    writeln!(writer, "{}", column_header())?;
    writeln!(writer, "{}", "-".repeat(TABLE_WIDTH))?;
    for (index, hop) in snapshot.hops.iter().enumerate() {
        writeln!(writer, "{}", format_row(index, hop))?;
    }

    Ok(())
}

/// Generate report to string
#[allow(dead_code)]
pub fn generate_report_string(snapshot: &Snapshot) -> String {
    let mut buf = Vec::new();
    generate_report(snapshot, &mut buf).unwrap();
    String::from_utf8(buf).unwrap()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::{HopAddr, HopStats};
    use chrono::Utc;
    use std::time::Duration;

    fn snapshot() -> Snapshot {
        let mut first = HopStats::new(HopAddr::Addr("10.0.0.1".parse().unwrap()));
        first.record(Some(Duration::from_millis(20)));
        let mut second = HopStats::new(HopAddr::Unknown);
        second.record(None);
        Snapshot {
            destination: "example.net".to_string(),
            resolved: "203.0.113.9".parse().unwrap(),
            started_at: Utc::now(),
            rounds: 1,
            hops: vec![first, second],
        }
    }

    #[test]
    fn test_report_structure() {
        let report = generate_report_string(&snapshot());
        let lines: Vec<&str> = report.lines().collect();
        assert_eq!(lines[0], "hopmon report for example.net (203.0.113.9)");
        assert!(lines[1].starts_with("Started: "));
        assert!(lines[1].ends_with(" UTC"));
        assert_eq!(lines[2], "Rounds: 1");
        assert_eq!(lines[3], "");
        assert_eq!(lines[4], column_header());
        assert_eq!(lines[5], "-".repeat(TABLE_WIDTH));
        assert!(lines[6].starts_with(" 1. 10.0.0.1"));
        assert!(lines[7].starts_with(" 2. ???"));
        assert_eq!(lines.len(), 8);
    }
}

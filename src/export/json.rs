use std::io::Write;

use anyhow::Result;

use crate::state::Snapshot;

/// Write the snapshot as pretty-printed JSON.
pub fn export_json<W: Write>(snapshot: &Snapshot, mut writer: W) -> Result<()> {
    serde_json::to_writer_pretty(&mut writer, snapshot)?;
    writeln!(writer)?;
    Ok(())
}

use std::io::{Write, stdout};

use anyhow::Result;
use crossterm::ExecutableCommand;
use crossterm::cursor::{Hide, MoveTo, Show};
use crossterm::queue;
use crossterm::style::Print;
use crossterm::terminal::{Clear, ClearType, EnterAlternateScreen, LeaveAlternateScreen};
use scopeguard::defer;

use crate::probe::Prober;
use crate::state::Snapshot;
use crate::trace::Monitor;
use crate::tui::table::render_lines;

/// A renderer consumes read-only snapshots; it never feeds anything back
/// into the statistics.
pub trait Render {
    fn draw(&mut self, snapshot: &Snapshot) -> Result<()>;
}

/// Full-screen renderer: repaints the whole table from the top-left on
/// every snapshot.
pub struct Screen;

impl Render for Screen {
    fn draw(&mut self, snapshot: &Snapshot) -> Result<()> {
        let mut out = stdout();
        queue!(out, MoveTo(0, 0), Clear(ClearType::All))?;
        for line in render_lines(snapshot) {
            queue!(out, Print(line), Print("\r\n"))?;
        }
        out.flush()?;
        Ok(())
    }
}

/// Renderer that discards snapshots. Used in batch mode, where only the
/// final report matters.
pub struct Headless;

impl Render for Headless {
    fn draw(&mut self, _snapshot: &Snapshot) -> Result<()> {
        Ok(())
    }
}

/// Run the monitor against the live screen.
///
/// Enters the alternate screen for the duration of the run and restores the
/// terminal on any exit, including errors. Raw mode stays off: Ctrl-C must
/// keep delivering SIGINT so the interrupt handler can stop the run.
pub async fn run_live<P: Prober>(monitor: Monitor<P>) -> Result<Snapshot> {
    stdout().execute(EnterAlternateScreen)?;
    stdout().execute(Hide)?;

    defer! {
        let _ = stdout().execute(Show);
        let _ = stdout().execute(LeaveAlternateScreen);
    }

    monitor.run(&mut Screen).await
}

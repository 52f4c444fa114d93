use anyhow::Result;
use clap::Parser;
use tokio_util::sync::CancellationToken;

mod cli;
mod config;
mod error;
mod export;
mod probe;
mod resolve;
mod state;
mod trace;
mod tui;

use cli::Args;
use config::Config;
use export::{export_json, generate_report};
use probe::SystemProber;
use resolve::resolve_destination;
use trace::{Monitor, discover};
use tui::Headless;

#[tokio::main]
async fn main() {
    let args = match Args::try_parse() {
        Ok(args) => args,
        Err(e) => {
            // Help and version go to stdout and exit 0; usage errors go to
            // stderr and exit 1.
            let code = if e.use_stderr() { 1 } else { 0 };
            let _ = e.print();
            std::process::exit(code);
        }
    };

    if let Err(e) = args.validate() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }

    if let Err(e) = run(args).await {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}

async fn run(args: Args) -> Result<()> {
    let config = Config::from(&args);
    let resolved = resolve_destination(&args.target)?;

    // Cancellation token for graceful shutdown
    let cancel = CancellationToken::new();
    let cancel_clone = cancel.clone();
    tokio::spawn(async move {
        tokio::signal::ctrl_c().await.ok();
        cancel_clone.cancel();
    });

    let prober = SystemProber::new(config.probe_timeout, config.discovery_timeout);

    // Discovery can take up to a minute; Ctrl-C must be able to abort it.
    let path = tokio::select! {
        _ = cancel.cancelled() => {
            println!("\nQuitting.");
            return Ok(());
        }
        path = discover(&prober, resolved, config.max_hops) => path?,
    };

    let monitor = Monitor::new(
        config,
        args.target.clone(),
        resolved,
        path,
        prober,
        cancel.clone(),
    );

    let snapshot = if args.is_batch_mode() {
        monitor.run(&mut Headless).await?
    } else {
        tui::run_live(monitor).await?
    };

    if args.json {
        export_json(&snapshot, std::io::stdout())?;
    } else if args.report {
        generate_report(&snapshot, std::io::stdout())?;
    }

    if cancel.is_cancelled() {
        println!("\nQuitting.");
    }

    Ok(())
}

use anyhow::Result;
use std::io;

use bmi_tracker::{logging, Config, PlainDisplay, Session, SqliteStore};

fn main() -> Result<()> {
    let config = match Config::load() {
        Ok(config) => config,
        Err(err) => {
            eprintln!("❌ {}", err);
            std::process::exit(1);
        }
    };

    // Logging is optional; the tracker still works without its log file
    if let Err(err) = logging::init(&config.logging) {
        eprintln!("⚠️  Logging disabled, can't open log file: {}", err);
    }
    tracing::info!(version = bmi_tracker::VERSION, "starting");

    // Fatal before the interactive loop starts
    let mut store = match SqliteStore::open(&config.store.db_path) {
        Ok(store) => store,
        Err(err) => {
            tracing::error!(error = %err, "store unavailable");
            eprintln!("❌ {}", err);
            std::process::exit(1);
        }
    };

    run_interactive(&mut store, config.history.limit)?;

    Ok(())
}

#[cfg(feature = "tui")]
fn run_interactive(store: &mut SqliteStore, history_limit: u32) -> Result<()> {
    use std::io::IsTerminal;

    if io::stdin().is_terminal() && io::stdout().is_terminal() {
        let mut display = bmi_tracker::TerminalDisplay::new()?;
        Session::new(store, &mut display, history_limit).run()?;
        return Ok(());
    }

    run_plain(store, history_limit)
}

#[cfg(not(feature = "tui"))]
fn run_interactive(store: &mut SqliteStore, history_limit: u32) -> Result<()> {
    run_plain(store, history_limit)
}

/// Line-oriented session over stdin/stdout, for pipes and scripted input
fn run_plain(store: &mut SqliteStore, history_limit: u32) -> Result<()> {
    let stdin = io::stdin();
    let stdout = io::stdout();
    let mut display = PlainDisplay::new(stdin.lock(), stdout.lock());
    Session::new(store, &mut display, history_limit).run()?;
    Ok(())
}

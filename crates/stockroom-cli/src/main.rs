//! Stockroom - numbered text menus for small JSON-backed record books.
//!
//! Run `stockroom inventory`, `stockroom library` or `stockroom school`.
//! Data locations come from the environment (see `stockroom_core::config`);
//! a `.env` file in the working directory is loaded first.

mod menu;
mod prompt;

use std::io;

use anyhow::{anyhow, Result};
use tracing::info;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use stockroom_core::{App, StorageConfig};

use prompt::Prompt;

/// When set, logs go to a daily file in this directory instead of stderr.
const LOG_DIR_VAR: &str = "STOCKROOM_LOG_DIR";

const LOG_FILE_PREFIX: &str = "stockroom.log";

const USAGE: &str = "\
Usage: stockroom <inventory|library|school>

Options:
  -h, --help    Print this help

Environment:
  INV_DATA_DIR, LIB_DATA_DIR, SCH_DATA_DIR    Data directory per app
  RUST_LOG                                    Log filter (default: warn)
  STOCKROOM_LOG_DIR                           Write logs to a daily file here";

/// Initialize the tracing subscriber for logging.
/// The returned guard must live until exit so buffered file logs are flushed.
fn init_tracing() -> Option<WorkerGuard> {
    // Use RUST_LOG env var to control log level (e.g., RUST_LOG=debug)
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    match std::env::var_os(LOG_DIR_VAR) {
        Some(dir) if !dir.is_empty() => {
            let appender = tracing_appender::rolling::daily(dir, LOG_FILE_PREFIX);
            let (writer, guard) = tracing_appender::non_blocking(appender);
            tracing_subscriber::registry()
                .with(fmt::layer().with_writer(writer).with_ansi(false))
                .with(filter)
                .init();
            Some(guard)
        }
        _ => {
            tracing_subscriber::registry()
                .with(fmt::layer().with_writer(io::stderr))
                .with(filter)
                .init();
            None
        }
    }
}

fn main() -> Result<()> {
    // Load .env file if present (silently ignore if not found)
    let _ = dotenvy::dotenv();

    let args: Vec<String> = std::env::args().collect();
    let Some(command) = args.get(1) else {
        eprintln!("{}", USAGE);
        return Err(anyhow!("Missing application name"));
    };
    if command == "--help" || command == "-h" {
        println!("{}", USAGE);
        return Ok(());
    }
    let app: App = command.parse().map_err(|e: String| anyhow!("{}\n\n{}", e, USAGE))?;

    let _guard = init_tracing();
    let config = StorageConfig::from_env(app);
    info!(app = %app, data_dir = %config.data_dir().display(), "Stockroom starting");

    let stdin = io::stdin();
    let mut prompt = Prompt::new(stdin.lock(), io::stdout());
    menu::run(app, &config, &mut prompt)?;

    info!(app = %app, "Stockroom shutting down");
    Ok(())
}

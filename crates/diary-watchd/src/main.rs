//! repl-diary daemon: watches a Julia REPL history file and appends
//! primary-mode entries to the active project's diary file.

use anyhow::{Context, Result};
use clap::Parser;
use diary_core::{DiaryWatcher, WatchOptions, resolve_configuration};
use diary_watchd::logging::{self, LogConfig, LogFormat};
use std::path::PathBuf;
use std::time::Duration;

/// Background watcher that mirrors REPL history into project diaries.
#[derive(Parser, Debug)]
#[command(name = "diary-watchd")]
#[command(about = "Watches a Julia REPL history file and keeps per-project diary files")]
#[command(version)]
struct Cli {
    /// History file to watch (defaults to ~/.julia/logs/repl_history.jl)
    #[arg(long, value_name = "FILE")]
    history: Option<PathBuf>,

    /// Mirror every raw history line to this file, verbatim
    #[arg(long, value_name = "FILE")]
    mirror: Option<PathBuf>,

    /// Poll fallback interval in milliseconds
    #[arg(long, value_name = "MS", default_value_t = 250)]
    poll_ms: u64,

    /// Enable verbose logging (INFO for all diary targets)
    #[arg(short, long)]
    verbose: bool,

    /// Enable debug logging
    #[arg(short, long)]
    debug: bool,

    /// Enable trace logging (includes state transitions)
    #[arg(long)]
    trace: bool,

    /// Quiet mode (WARN and ERROR only)
    #[arg(short, long)]
    quiet: bool,

    /// Set log level for specific targets (e.g., "watch=debug").
    /// Targets are prefixed with "diary::" automatically.
    #[arg(long = "log", value_name = "TARGET=LEVEL")]
    log_overrides: Vec<String>,

    /// Log output format
    #[arg(long = "log-format", value_name = "FORMAT", default_value = "text")]
    log_format: LogFormat,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let log_config = LogConfig::from_cli(
        cli.verbose,
        cli.debug,
        cli.trace,
        cli.quiet,
        cli.log_overrides,
        cli.log_format,
    );
    logging::init(&log_config);

    let history_path = match cli.history {
        Some(path) => path,
        None => default_history_path()?,
    };

    // persistent_history = false opts the session out of mirroring,
    // even when a mirror path was given.
    let mirror_path = if cli.mirror.is_some() {
        let cwd = std::env::current_dir()?;
        let config = resolve_configuration(&cwd);
        if config.persistent_history {
            cli.mirror
        } else {
            tracing::info!(
                target: "diary::main",
                "persistent_history is off; mirror disabled"
            );
            None
        }
    } else {
        None
    };

    let mut options = WatchOptions::new(&history_path);
    options.mirror_path = mirror_path;
    options.poll_interval = Duration::from_millis(cli.poll_ms);

    let handle = DiaryWatcher::start(options)
        .with_context(|| format!("failed to watch {}", history_path.display()))?;
    tracing::info!(
        target: "diary::main",
        "Watching {}",
        history_path.display()
    );

    tokio::signal::ctrl_c().await?;
    tracing::info!(target: "diary::main", "Shutting down");
    handle.stop().await;
    Ok(())
}

fn default_history_path() -> Result<PathBuf> {
    let home = dirs::home_dir().context("no home directory")?;
    Ok(home.join(".julia").join("logs").join("repl_history.jl"))
}

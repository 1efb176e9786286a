mod logging;
mod tui;

use std::path::PathBuf;

use anyhow::{anyhow, Result};
use clap::Parser;
use log::info;
use tickdo_core::{shared, StatusFilter, StoreConfig, TaskStore};

#[derive(Parser)]
#[command(name = "tickdo")]
#[command(about = "A grouped to-do list that flags tasks urgent as they age", long_about = None)]
struct Cli {
    /// Seconds an open task may sit before it turns urgent
    #[arg(long, default_value_t = 60)]
    threshold_secs: u64,

    /// Milliseconds between urgency recompute passes
    #[arg(long, default_value_t = 1000)]
    tick_ms: u64,

    /// Initial status filter: open or completed (default: show all)
    #[arg(long)]
    filter: Option<String>,

    /// Directory for log files (default: platform data dir)
    #[arg(long)]
    log_dir: Option<PathBuf>,
}

fn parse_filter(raw: &str) -> Result<StatusFilter> {
    match raw.to_lowercase().as_str() {
        "open" => Ok(StatusFilter::Open),
        "completed" | "done" => Ok(StatusFilter::Completed),
        other => Err(anyhow!(
            "Invalid filter '{}': expected open or completed",
            other
        )),
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let log_dir = cli.log_dir.unwrap_or_else(logging::default_log_dir);
    let _logger = logging::init(&log_dir)?;

    let filter = cli.filter.as_deref().map(parse_filter).transpose()?;

    let config = StoreConfig {
        urgent_threshold: chrono::Duration::seconds(cli.threshold_secs as i64),
        tick_interval: std::time::Duration::from_millis(cli.tick_ms),
    };
    info!(
        "session start threshold={}s tick={}ms",
        cli.threshold_secs, cli.tick_ms
    );

    let store = shared(TaskStore::new(config));
    tui::run(store, filter)?;

    info!("session end");
    Ok(())
}

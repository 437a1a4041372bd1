//! Scout Screener - ranks a configured asset universe by opportunity score.
//!
//! Reads market data snapshots from the data directory, scores every asset
//! and prints the ranked report to stdout (or writes it with `--output`).

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use scout_common::config::Config;
use scout_common::logging::{init_logging_with_exclusions, with_bootstrap_logging};
use scout_screener::screener::{ReportFormat, ScreenerConfig, ScreenerEngine, ScreenerReport};
use scout_screener::LocalFileProvider;

/// Market Scout screener.
#[derive(Parser, Debug)]
#[command(name = "scout-screener")]
#[command(version)]
#[command(about = "Score and rank a watch list of stocks, indices and commodities.", long_about = None)]
struct Cli {
    /// Config file (default: ~/.scout/config.json)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Directory of market data snapshots
    #[arg(long)]
    data_dir: Option<PathBuf>,

    /// Report format (table, markdown, json)
    #[arg(short, long)]
    format: Option<ReportFormat>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long)]
    log_level: Option<String>,

    /// Price history window in calendar days
    #[arg(long)]
    lookback_days: Option<u32>,

    /// Write the report to a file instead of stdout
    #[arg(short, long)]
    output: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let bootstrap_level = cli.log_level.as_deref().unwrap_or("info");
    let mut config =
        with_bootstrap_logging(bootstrap_level, || Config::load_with_env(cli.config.as_deref()))?;
    if let Some(level) = cli.log_level {
        config.observability.log_level = level;
    }
    if let Some(dir) = cli.data_dir {
        config.screener.data_dir = Some(dir);
    }
    if let Some(days) = cli.lookback_days {
        config.screener.lookback_days = Some(days);
    }

    init_logging_with_exclusions(
        &config.observability.log_level,
        &config.observability.log_format,
        &config.observability.excluded_targets,
    );

    tracing::info!("Scout Screener v{}", env!("CARGO_PKG_VERSION"));

    let screener_config = match ScreenerConfig::from_settings(&config.screener) {
        Ok(screener_config) => screener_config,
        Err(e) => {
            tracing::error!(error = %e, "Invalid screener configuration");
            std::process::exit(i32::from(e.exit_code()));
        }
    };
    let format = cli.format.unwrap_or(screener_config.output.format);
    let max_rows = screener_config.output.max_rows;

    let provider = Arc::new(LocalFileProvider::new(screener_config.data_dir.clone()));
    tracing::debug!(data_dir = %provider.root().display(), "Using local snapshot provider");

    let engine = ScreenerEngine::new(screener_config, provider);
    let result = engine.run().await;
    tracing::info!("{}", result.summary());

    let report = ScreenerReport::new(result).with_max_rows(max_rows);
    match cli.output {
        Some(path) => {
            let written = report
                .save_to_file(&path, format)
                .with_context(|| format!("Failed to save report to {}", path.display()))?;
            tracing::info!(path = %written.display(), "Report saved");
        }
        None => print!("{}", report.generate(format)),
    }

    Ok(())
}

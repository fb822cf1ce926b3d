//! rinkside - schedule/result retrieval tool

use anyhow::Result;
use clap::Parser;
use rinkside_common::logging::{init_logging, LogConfig, LogLevel};
use rinkside_ingest::config::Config;
use rinkside_ingest::pipeline::{self, RunOutcome};
use rinkside_ingest::sink::DirSink;
use std::path::PathBuf;
use tracing::info;

#[derive(Parser, Debug)]
#[command(name = "rinkside")]
#[command(author, version, about = "Fetch and normalize Swiss ice hockey schedule/results")]
struct Cli {
    /// Output directory for the result artifacts
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Relevance filter substring; may be given multiple times.
    /// Replaces the configured default when present.
    #[arg(short, long)]
    team: Vec<String>,

    /// Page size requested from the upstream list endpoint
    #[arg(long)]
    take: Option<u32>,

    /// Ceiling on secondary detail requests per run
    #[arg(long)]
    max_detail: Option<usize>,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut log_config = LogConfig::from_env()?;
    if cli.verbose {
        log_config.level = LogLevel::Debug;
    }
    init_logging(&log_config)?;

    let mut config = Config::from_env()?;
    if let Some(output) = cli.output {
        config.output_dir = output;
    }
    if !cli.team.is_empty() {
        config.team_filters = cli.team;
    }
    if let Some(take) = cli.take {
        config.take = take;
    }
    if let Some(max_detail) = cli.max_detail {
        config.max_detail = max_detail;
    }

    let sink = DirSink::new(&config.output_dir);

    match pipeline::run(&config, &sink).await {
        RunOutcome::Persisted { count } => {
            info!(count, output = %config.output_dir.display(), "ingestion complete");
            Ok(())
        },
        RunOutcome::Failed => {
            // Artifacts (empty list + diagnostics) are already on disk;
            // the non-zero status is for automation only.
            std::process::exit(1);
        },
    }
}

//! keyspaces-bench - CRUD latency benchmark for a wide-column review store
//!
//! Runs the single-record suite and the bulk suite and prints timing tables

#![allow(missing_docs)]

use clap::Parser;
use keyspaces_bench::config::Config;
use keyspaces_bench::runner::{self, RunOptions};
use keyspaces_bench::utils::init_logging;
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Debug, Parser)]
#[command(name = "keyspaces-bench", version, about)]
struct Args {
    /// YAML configuration file
    #[arg(short, long, env = "BENCH_CONFIG")]
    config: Option<PathBuf>,

    /// Newline-delimited JSON dataset for the bulk suite
    #[arg(short, long)]
    dataset: Option<PathBuf>,

    /// Skip the single-record suite
    #[arg(long)]
    skip_single: bool,

    /// Skip the bulk suite
    #[arg(long)]
    skip_bulk: bool,

    /// Log level or filter directive, overrides the configured level
    #[arg(long)]
    log_level: Option<String>,
}

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();

    match run(args).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            // Print error using Display (not Debug) to preserve newlines
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run(args: Args) -> keyspaces_bench::Result<()> {
    let mut config = Config::load(args.config.as_deref()).await?;
    if let Some(level) = args.log_level {
        config.logging.level = level;
    }

    // Initialize logging system
    init_logging(&config.logging)?;

    let build = keyspaces_bench::build_info();
    tracing::info!(
        version = build.version,
        git_hash = build.git_hash,
        backend = %config.store.backend,
        "Starting {}",
        keyspaces_bench::NAME
    );
    tracing::debug!("Effective configuration:\n{}", config.to_yaml()?);

    let options = RunOptions {
        dataset: args.dataset,
        skip_single: args.skip_single,
        skip_bulk: args.skip_bulk,
    };

    let summary = runner::run(&config, &options).await?;
    println!("{}", summary);
    Ok(())
}

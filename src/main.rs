use anyhow::{Context, Result};
use clap::Parser;
use img_webpify::cli::Args;
use img_webpify::constants::WARNING_PREFIX;
use img_webpify::{BatchConverter, BatchOptions, Logger};
use std::io::IsTerminal;
use std::process::ExitCode;
use std::sync::Arc;
use tracing::{error, warn};
use tracing_subscriber::EnvFilter;

fn main() -> ExitCode {
    let args = Args::parse();
    init_tracing(&args);

    match run(&args) {
        Ok(code) => code,
        Err(e) => {
            error!("❌ {:#}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(args: &Args) -> Result<ExitCode> {
    let options =
        BatchOptions::new(Some(args.quality), Some(args.workers))?.with_progress(!args.quiet);
    let converter = BatchConverter::new(options, Arc::new(Logger::new(args.quiet)));

    let summary = converter
        .run(&args.input_dir)
        .with_context(|| format!("Failed to convert images in {}", args.input_dir.display()))?;

    // An empty tree almost always means a wrong --input-dir.
    if summary.discovered == 0 {
        warn!(
            "{} No files found under {}",
            WARNING_PREFIX,
            args.input_dir.display()
        );
        return Ok(ExitCode::FAILURE);
    }

    Ok(ExitCode::SUCCESS)
}

fn init_tracing(args: &Args) {
    let default_level = if args.verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    let result = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_ansi(std::io::stdout().is_terminal())
        .try_init();

    if let Err(e) = result {
        eprintln!("Warning: Failed to initialize logging: {}", e);
    }
}

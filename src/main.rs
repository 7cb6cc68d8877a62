//! Sumi-Skim main entry point
//!
//! This is the command-line interface for the Sumi-Skim page harvester.

use anyhow::{Context, Result};
use clap::Parser;
use std::fs::OpenOptions;
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::sync::Mutex;
use sumi_skim::config::{load_config_with_hash, validate, Config};
use sumi_skim::crawler::Coordinator;
use sumi_skim::output::print_report;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Sumi-Skim: A polite single-hop page harvester
///
/// Sumi-Skim fetches a seed page, then downloads the text of every page it
/// links to, while respecting each site's robots.txt rules and crawl-delay.
#[derive(Parser, Debug)]
#[command(name = "sumi-skim")]
#[command(version)]
#[command(about = "A polite single-hop page harvester", long_about = None)]
struct Cli {
    /// Page whose links are harvested (prompted for when omitted)
    #[arg(value_name = "SEED")]
    seed: Option<String>,

    /// Path to TOML configuration file
    #[arg(short, long, value_name = "CONFIG")]
    config: Option<PathBuf>,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Directory the harvested pages are written to
    #[arg(long, value_name = "DIR")]
    output_dir: Option<String>,

    /// Number of domains crawled at the same time
    #[arg(long, value_name = "N")]
    concurrency: Option<u32>,

    /// Log to stderr only, ignoring the configured log file
    #[arg(long)]
    no_log_file: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let (mut config, config_hash) = match &cli.config {
        Some(path) => {
            let (config, hash) = load_config_with_hash(path)
                .with_context(|| format!("Failed to load configuration from {}", path.display()))?;
            (config, Some(hash))
        }
        None => (Config::default(), None),
    };

    if let Some(dir) = cli.output_dir.clone() {
        config.output.directory = dir;
    }
    if let Some(concurrency) = cli.concurrency {
        config.crawler.max_concurrent_domains = concurrency;
    }
    if cli.no_log_file {
        config.output.log_path = None;
    }
    validate(&config).context("Invalid configuration")?;

    setup_logging(cli.verbose, cli.quiet, config.output.log_file())?;

    match (&cli.config, &config_hash) {
        (Some(path), Some(hash)) => tracing::info!(
            "Configuration loaded from {} (hash: {})",
            path.display(),
            hash
        ),
        _ => tracing::info!("Using default configuration"),
    }

    let seed = match cli.seed {
        Some(seed) => seed,
        None => prompt_for_seed()?,
    };

    let coordinator = Coordinator::new(config).context("Failed to set up the crawler")?;

    let cancel = coordinator.cancellation_token();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::warn!("Interrupt received, stopping harvest");
            cancel.cancel();
        }
    });

    let report = coordinator.run(&seed).await?;

    if let Some(message) = &report.message {
        println!("{}", message);
    }
    if !cli.quiet {
        print_report(&report);
    }

    Ok(())
}

/// Sets up the logging/tracing subscriber based on verbosity level
///
/// Events go to stderr, and are also appended to `log_path` when set.
fn setup_logging(verbose: u8, quiet: bool, log_path: Option<&str>) -> Result<()> {
    let filter = if quiet {
        // Only show errors
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("sumi_skim=info,warn"),
            1 => EnvFilter::new("sumi_skim=debug,info"),
            2 => EnvFilter::new("sumi_skim=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    let file_layer = match log_path {
        Some(path) => {
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .with_context(|| format!("Failed to open log file {}", path))?;
            Some(
                fmt::layer()
                    .with_writer(Mutex::new(file))
                    .with_ansi(false)
                    .with_target(false),
            )
        }
        None => None,
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_writer(io::stderr)
                .with_target(false)
                .with_thread_ids(false)
                .with_file(false),
        )
        .with(file_layer)
        .init();

    Ok(())
}

/// Reads the seed URL from stdin
fn prompt_for_seed() -> Result<String> {
    print!("Enter the URL to scrape: ");
    io::stdout().flush()?;

    let mut line = String::new();
    io::stdin()
        .lock()
        .read_line(&mut line)
        .context("Failed to read the seed URL")?;

    Ok(line.trim().to_string())
}

//! Sitemapper main entry point
//!
//! This is the command-line interface for the Sitemapper site crawler.

use anyhow::Context;
use clap::Parser;
use sitemapper::config::{load_config_with_hash, Config};
use sitemapper::crawler::{build_with_cancel, cancel_pair, HttpFetcher};
use sitemapper::output::{print_statistics, write_sitemap, BuildStatistics};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

/// Sitemapper: a bounded site crawler
///
/// Sitemapper walks one website breadth-first from its root URL, following
/// in-domain links up to a depth and page limit, and writes the pages it
/// found as a Sitemap 0.9 XML file.
#[derive(Parser, Debug)]
#[command(name = "sitemapper")]
#[command(version)]
#[command(about = "Builds a sitemap by crawling a single site", long_about = None)]
struct Cli {
    /// Path to TOML configuration file
    #[arg(value_name = "CONFIG")]
    config: PathBuf,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Validate config and show what would be crawled without fetching anything
    #[arg(long, conflicts_with = "stats")]
    dry_run: bool,

    /// Print build statistics after the sitemap is written
    #[arg(long)]
    stats: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose, cli.quiet);

    tracing::info!("Loading configuration from: {}", cli.config.display());
    let (config, config_hash) = load_config_with_hash(&cli.config)
        .with_context(|| format!("Failed to load configuration from {}", cli.config.display()))?;
    tracing::info!("Configuration loaded successfully (hash: {})", config_hash);

    if cli.dry_run {
        handle_dry_run(&config);
        return Ok(());
    }

    handle_build(config, cli.stats).await
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("sitemapper=info,warn"),
            1 => EnvFilter::new("sitemapper=debug,info"),
            2 => EnvFilter::new("sitemapper=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}

/// Handles the --dry-run mode: shows the effective settings
fn handle_dry_run(config: &Config) {
    println!("=== Sitemapper Dry Run ===\n");

    println!("Crawler Configuration:");
    println!("  Root: {}", config.crawler.root_host);
    match config.crawler.depth_bound() {
        Some(depth) => println!("  Max depth: {}", depth),
        None => println!("  Max depth: unlimited"),
    }
    println!("  Page limit: {}", config.crawler.page_limit);
    println!("  Fetch timeout: {}ms", config.crawler.fetch_timeout_ms);
    println!(
        "  Max concurrent fetches: {}",
        config.crawler.max_concurrent_fetches
    );

    println!("\nUser Agent:");
    println!("  {}", config.user_agent.header_value());

    println!("\nOutput:");
    println!("  Sitemap: {}", config.output.sitemap_path);

    println!("\n✓ Configuration is valid");
}

/// Handles the main build: crawl, then write the sitemap
async fn handle_build(config: Config, show_stats: bool) -> anyhow::Result<()> {
    let fetcher = HttpFetcher::new(&config.user_agent, config.crawler.fetch_timeout())
        .context("Failed to build HTTP client")?;

    let (cancel_handle, cancel_token) = cancel_pair();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::warn!("Received Ctrl-C, aborting in-flight fetches");
            cancel_handle.cancel();
        }
    });

    let report = build_with_cancel(&config.crawler, Arc::new(fetcher), cancel_token)
        .await
        .context("Build failed to start")?;

    if report.graph.root_page().map_or(true, |root| !root.status().is_success()) {
        tracing::warn!("Root page {} could not be fetched", report.graph.root());
    }

    let sitemap_path = Path::new(&config.output.sitemap_path);
    write_sitemap(&report.graph, sitemap_path)
        .with_context(|| format!("Failed to write sitemap to {}", sitemap_path.display()))?;

    if show_stats {
        print_statistics(&BuildStatistics::from_report(&report));
    }

    Ok(())
}

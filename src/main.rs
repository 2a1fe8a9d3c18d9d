//! Scholar-Cache main entry point
//!
//! This is the command-line interface for querying a researcher's publications.

use anyhow::Context;
use clap::Parser;
use scholar_cache::config::{load_config, Config};
use scholar_cache::{Scholar, ScholarCache};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

/// Scholar-Cache: a polite publication-list harvester
///
/// Retrieves a researcher's publications and their metadata from a scholar
/// profile, optionally keeping a local cache so repeated queries stay cheap.
#[derive(Parser, Debug)]
#[command(name = "scholar-cache")]
#[command(version = "1.0.0")]
#[command(about = "A polite publication-list harvester", long_about = None)]
struct Cli {
    /// Profile handle (the `user` parameter of the profile URL)
    #[arg(short, long)]
    user: String,

    /// Maximum number of articles to return
    #[arg(short, long, default_value_t = 20)]
    limit: usize,

    /// Use the on-disk cache (loaded before and saved after the query)
    #[arg(long, conflicts_with = "listing_only")]
    cache: bool,

    /// Only read the listing pages; skip article detail pages
    #[arg(long)]
    listing_only: bool,

    /// Path to TOML configuration file
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);

    let config = match &cli.config {
        Some(path) => {
            tracing::info!("Loading configuration from: {}", path.display());
            load_config(path)
                .with_context(|| format!("Failed to load configuration {}", path.display()))?
        }
        None => Config::default(),
    };

    let scholar = Scholar::new(&config).context("Failed to set up the HTTP client")?;

    if cli.listing_only {
        let rows = scholar.query_profile_listing(&cli.user, cli.limit).await?;
        for row in &rows {
            println!("{} ({}) - cited by {}", row.title, row.year, row.num_citations);
        }
        return Ok(());
    }

    let articles = if cli.cache {
        let cache = Arc::new(ScholarCache::from_config(&config.cache));
        let scholar = scholar.with_cache(Arc::clone(&cache));
        let articles = scholar.query_profile_cached(&cli.user, cli.limit).await?;

        cache
            .save(
                Path::new(&config.cache.profile_path),
                Path::new(&config.cache.article_path),
            )
            .context("Failed to save the cache")?;
        articles
    } else {
        scholar.query_profile(&cli.user, cli.limit).await?
    };

    for article in &articles {
        println!("{}", article);
    }
    tracing::info!("Retrieved {} articles for {}", articles.len(), cli.user);

    Ok(())
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("scholar_cache=info,warn"),
            1 => EnvFilter::new("scholar_cache=debug,info"),
            2 => EnvFilter::new("scholar_cache=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_writer(std::io::stderr)
        .init();
}

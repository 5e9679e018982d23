//! Scour main entry point
//!
//! Command-line interface for crawling, searching and query suggestions.

use anyhow::{anyhow, bail, Context, Result};
use clap::{Parser, Subcommand};
use scour::config::load_config_with_hash;
use scour::crawler::print_stats;
use scour::extract::ContentType;
use scour::index::{CrawlSnapshot, SearchIndex, SearchOptions};
use scour::{Config, Crawler};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Scour: a crawl-and-search engine
///
/// Scour crawls websites politely, extracts and quality-scores their
/// content, and serves ranked full-text search over the crawled pages
/// from a snapshot file.
#[derive(Parser, Debug)]
#[command(name = "scour")]
#[command(version)]
#[command(about = "A polite crawl-and-search engine", long_about = None)]
struct Cli {
    /// Path to TOML configuration file
    #[arg(short, long, value_name = "CONFIG", default_value = "scour.toml")]
    config: PathBuf,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Crawl seed URLs and write the snapshot file
    Crawl {
        /// Seed URLs (defaults to the seeds in the config file)
        urls: Vec<String>,

        /// Override the configured maximum crawl depth
        #[arg(long)]
        max_depth: Option<u32>,

        /// Crawl only the given URLs without following links
        #[arg(long)]
        no_follow: bool,
    },

    /// Search the snapshot written by a previous crawl
    Search {
        /// Query text
        query: String,

        /// Maximum number of results
        #[arg(long)]
        limit: Option<usize>,

        /// Number of results to skip
        #[arg(long, default_value_t = 0)]
        offset: usize,

        /// Only return pages of this content type
        #[arg(long)]
        content_type: Option<String>,

        /// Minimum quality score (0-100)
        #[arg(long)]
        min_quality: Option<u8>,

        /// Only return pages published within this many days
        #[arg(long)]
        max_age_days: Option<i64>,

        /// Minimum word count
        #[arg(long)]
        min_word_count: Option<usize>,

        /// Only return pages tagged with this topic
        #[arg(long)]
        topic: Option<String>,
    },

    /// Suggest query completions from the indexed vocabulary
    Suggest {
        /// Partial query text
        partial: String,

        /// Maximum number of suggestions
        #[arg(long, default_value_t = 10)]
        limit: usize,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);

    tracing::info!("Loading configuration from: {}", cli.config.display());
    let (config, _config_hash) = match load_config_with_hash(&cli.config) {
        Ok((cfg, hash)) => {
            tracing::info!("Configuration loaded successfully (hash: {})", hash);
            (cfg, hash)
        }
        Err(e) => {
            tracing::error!("Failed to load configuration: {}", e);
            return Err(e.into());
        }
    };

    match cli.command {
        Command::Crawl {
            urls,
            max_depth,
            no_follow,
        } => handle_crawl(config, urls, max_depth, no_follow).await?,
        Command::Search {
            query,
            limit,
            offset,
            content_type,
            min_quality,
            max_age_days,
            min_word_count,
            topic,
        } => {
            let content_type = match content_type.as_deref() {
                Some(raw) => Some(
                    ContentType::parse(raw)
                        .ok_or_else(|| anyhow!("unknown content type: {raw}"))?,
                ),
                None => None,
            };
            let options = SearchOptions {
                limit,
                offset,
                content_type,
                min_quality,
                max_age_days,
                min_word_count,
                topic,
            };
            handle_search(&config, &query, &options)?;
        }
        Command::Suggest { partial, limit } => handle_suggest(&config, &partial, limit)?,
    }

    Ok(())
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("scour=info,warn"),
            1 => EnvFilter::new("scour=debug,info"),
            2 => EnvFilter::new("scour=trace,debug"),
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

/// Handles the crawl subcommand
async fn handle_crawl(
    config: Config,
    urls: Vec<String>,
    max_depth: Option<u32>,
    no_follow: bool,
) -> Result<()> {
    let seeds = if urls.is_empty() {
        config.seeds.clone()
    } else {
        urls
    };
    if seeds.is_empty() {
        bail!("no seed URLs given on the command line or in the config");
    }
    tracing::info!("Starting crawl with {} seed URLs", seeds.len());

    let snapshot_path = config.output.snapshot_path.clone();
    let crawler = Crawler::new(config);

    let mut events = crawler.events();
    let progress = tokio::spawn(async move {
        while let Some(event) = events.recv().await {
            match event {
                scour::CrawlEvent::PageCrawled {
                    url,
                    depth,
                    quality_score,
                } => {
                    println!("  [{depth}] q={quality_score:<3} {url}");
                }
                scour::CrawlEvent::CrawlError { url, message } => {
                    println!("  [!] {url}: {message}");
                }
            }
        }
    });

    let outcome = crawler.start_crawl(&seeds, max_depth, !no_follow).await?;
    drop(crawler.events()); // replaces the sender so the progress task ends
    let _ = progress.await;

    print_stats(&outcome.stats);
    if let Some(doc) = &outcome.document {
        println!(
            "\nCrawled: {} ({}, quality {}, {} words)",
            doc.url, doc.content_type, doc.quality_score, doc.word_count
        );
    }

    let snapshot = crawler.export_snapshot();
    let json = serde_json::to_string(&snapshot)?;
    std::fs::write(&snapshot_path, json)
        .with_context(|| format!("could not write snapshot {snapshot_path}"))?;
    println!("\nSnapshot written to: {snapshot_path}");

    Ok(())
}

/// Handles the search subcommand
fn handle_search(
    config: &Config,
    query: &str,
    options: &SearchOptions,
) -> Result<()> {
    let index = load_index(config)?;
    let response = index.search(query, options);

    println!(
        "{} results for \"{}\" ({} ms)\n",
        response.total, response.query, response.elapsed_ms
    );
    for (rank, result) in response.results.iter().enumerate() {
        println!(
            "{:>3}. [{:.2}] {}",
            rank + 1 + options.offset,
            result.relevance,
            result.title
        );
        println!("     {}", result.url);
        if !result.description.is_empty() {
            println!("     {}", result.description);
        }
        println!(
            "     type={} quality={} words={}",
            result.content_type, result.quality_score, result.word_count
        );
    }

    Ok(())
}

/// Handles the suggest subcommand
fn handle_suggest(
    config: &Config,
    partial: &str,
    limit: usize,
) -> Result<()> {
    let index = load_index(config)?;
    for suggestion in index.suggest(partial, limit) {
        println!("{suggestion}");
    }
    Ok(())
}

/// Loads the search index from the configured snapshot file
fn load_index(config: &Config) -> Result<SearchIndex> {
    let path = &config.output.snapshot_path;
    let json = std::fs::read_to_string(path)
        .with_context(|| format!("could not read snapshot {path}"))?;
    let snapshot: CrawlSnapshot =
        serde_json::from_str(&json).with_context(|| format!("malformed snapshot {path}"))?;

    let mut index = SearchIndex::new(config.search.clone());
    index.import(snapshot.index);
    tracing::info!(
        "Loaded snapshot with {} documents from {}",
        index.total_docs(),
        path
    );
    Ok(index)
}

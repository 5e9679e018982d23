//! Crawl scheduling, fetching and session statistics

mod fetcher;
mod frontier;
mod scheduler;
mod stats;

pub use fetcher::{FetchError, FetchedPage, HttpFetcher, PageFetcher, TransportKind};
pub use frontier::{Frontier, FrontierEntry};
pub use scheduler::{CrawlEvent, CrawlOutcome, Crawler};
pub use stats::{print_stats, CrawlStats, StatsTracker};

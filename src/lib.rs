//! Scour: a topic-scoped crawl-and-search engine
//!
//! This crate crawls websites, extracts structured content, scores its
//! quality, and builds an in-memory inverted index supporting ranked
//! full-text retrieval. The index can be exported to and reimported from a
//! snapshot file, so search works without re-crawling.

pub mod config;
pub mod crawler;
pub mod extract;
pub mod index;
pub mod robots;
pub mod score;
pub mod store;
pub mod text;
pub mod url;

use thiserror::Error;

/// Main error type for scour operations
#[derive(Debug, Error)]
pub enum ScourError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("URL error: {0}")]
    Url(#[from] UrlError),

    #[error("URL parse error: {0}")]
    UrlParse(#[from] ::url::ParseError),

    #[error("Fetch error for {url}: {source}")]
    Fetch {
        url: String,
        source: crawler::FetchError,
    },

    #[error("Extraction error for {url}: {message}")]
    Extract { url: String, message: String },

    #[error("Fetch client could not be rebuilt: {0}")]
    ClientExhausted(String),

    #[error("Snapshot error: {0}")]
    Snapshot(String),

    #[error("Serialization error: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("HTTP client error: {0}")]
    Reqwest(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),
}

/// URL-specific errors
#[derive(Debug, Error)]
pub enum UrlError {
    #[error("Failed to parse URL: {0}")]
    Parse(String),

    #[error("Invalid URL scheme: {0}")]
    InvalidScheme(String),

    #[error("Missing host in URL")]
    MissingHost,

    #[error("Malformed URL: {0}")]
    Malformed(String),
}

/// Result type alias for scour operations
pub type Result<T> = std::result::Result<T, ScourError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

/// Result type alias for URL operations
pub type UrlResult<T> = std::result::Result<T, UrlError>;

// Re-export commonly used types
pub use crate::config::Config;
pub use crate::crawler::{CrawlEvent, CrawlStats, Crawler};
pub use crate::extract::{ContentType, PageDocument};
pub use crate::index::{SearchIndex, SearchOptions, SearchResponse};
pub use crate::url::{extract_domain, normalize_url, same_host};

use serde::Deserialize;

/// Main configuration structure for scour
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub crawler: CrawlerConfig,
    #[serde(default)]
    pub search: SearchConfig,
    #[serde(rename = "user-agent")]
    pub user_agent: UserAgentConfig,
    pub output: OutputConfig,
    /// Seed URLs crawled when none are given on the command line
    #[serde(default)]
    pub seeds: Vec<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            crawler: CrawlerConfig::default(),
            search: SearchConfig::default(),
            user_agent: UserAgentConfig::default(),
            output: OutputConfig::default(),
            seeds: vec![],
        }
    }
}

/// Crawler behavior configuration
#[derive(Debug, Clone, Deserialize)]
pub struct CrawlerConfig {
    /// Maximum depth to crawl from seed URLs
    #[serde(rename = "max-depth", default = "default_max_depth")]
    pub max_depth: u32,

    /// Maximum number of concurrently in-flight fetches
    #[serde(rename = "max-concurrent-fetches", default = "default_max_concurrent")]
    pub max_concurrent_fetches: u32,

    /// Fixed delay before each request, in milliseconds (politeness)
    #[serde(rename = "request-delay-ms", default = "default_request_delay")]
    pub request_delay_ms: u64,

    /// Fetch timeout in milliseconds
    #[serde(rename = "fetch-timeout-ms", default = "default_fetch_timeout")]
    pub fetch_timeout_ms: u64,

    /// Additional retries for transient transport failures
    #[serde(rename = "retry-limit", default = "default_retry_limit")]
    pub retry_limit: u32,

    /// Fixed backoff between retries, in milliseconds
    #[serde(rename = "retry-backoff-ms", default = "default_retry_backoff")]
    pub retry_backoff_ms: u64,

    /// How many outbound links per page re-enter the frontier
    #[serde(rename = "max-links-per-page", default = "default_max_links")]
    pub max_links_per_page: usize,
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            max_depth: default_max_depth(),
            max_concurrent_fetches: default_max_concurrent(),
            request_delay_ms: default_request_delay(),
            fetch_timeout_ms: default_fetch_timeout(),
            retry_limit: default_retry_limit(),
            retry_backoff_ms: default_retry_backoff(),
            max_links_per_page: default_max_links(),
        }
    }
}

/// Search behavior configuration
#[derive(Debug, Clone, Deserialize)]
pub struct SearchConfig {
    /// Queries shorter than this return an empty result set
    #[serde(rename = "min-query-length", default = "default_min_query_length")]
    pub min_query_length: usize,

    /// Hard cap on the per-query result limit
    #[serde(rename = "max-limit", default = "default_max_limit")]
    pub max_limit: usize,

    /// Result limit used when the caller does not supply one
    #[serde(rename = "default-limit", default = "default_default_limit")]
    pub default_limit: usize,

    /// Whether the tokenizer applies English stemming
    #[serde(rename = "stemming", default)]
    pub stemming: bool,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            min_query_length: default_min_query_length(),
            max_limit: default_max_limit(),
            default_limit: default_default_limit(),
            stemming: false,
        }
    }
}

/// User agent identification configuration
#[derive(Debug, Clone, Deserialize)]
pub struct UserAgentConfig {
    /// Name of the crawler
    #[serde(rename = "crawler-name")]
    pub crawler_name: String,

    /// Version of the crawler
    #[serde(rename = "crawler-version")]
    pub crawler_version: String,

    /// URL with information about the crawler
    #[serde(rename = "contact-url")]
    pub contact_url: String,

    /// Email address for crawler-related contact
    #[serde(rename = "contact-email")]
    pub contact_email: String,
}

impl Default for UserAgentConfig {
    fn default() -> Self {
        Self {
            crawler_name: "scour".to_string(),
            crawler_version: env!("CARGO_PKG_VERSION").to_string(),
            contact_url: "https://example.com/scour".to_string(),
            contact_email: "crawler@example.com".to_string(),
        }
    }
}

impl UserAgentConfig {
    /// Formats the full user-agent string sent with every request
    pub fn full_string(&self) -> String {
        format!(
            "{}/{} (+{}; {})",
            self.crawler_name, self.crawler_version, self.contact_url, self.contact_email
        )
    }
}

/// Output configuration
#[derive(Debug, Clone, Deserialize)]
pub struct OutputConfig {
    /// Path the crawl snapshot is written to and read from
    #[serde(rename = "snapshot-path")]
    pub snapshot_path: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            snapshot_path: "scour-snapshot.json".to_string(),
        }
    }
}

fn default_max_depth() -> u32 {
    2
}

fn default_max_concurrent() -> u32 {
    5
}

fn default_request_delay() -> u64 {
    1000
}

fn default_fetch_timeout() -> u64 {
    30_000
}

fn default_retry_limit() -> u32 {
    2
}

fn default_retry_backoff() -> u64 {
    2000
}

fn default_max_links() -> usize {
    5
}

fn default_min_query_length() -> usize {
    2
}

fn default_max_limit() -> usize {
    100
}

fn default_default_limit() -> usize {
    10
}

//! Crawl scheduler
//!
//! Drives the whole pipeline: frontier draining, politeness, fetching with
//! retries, extraction, scoring, storage and indexing. Shared state sits
//! behind a std mutex that is never held across an await point.

use crate::config::Config;
use crate::crawler::fetcher::{FetchError, HttpFetcher, PageFetcher};
use crate::crawler::frontier::Frontier;
use crate::crawler::stats::{CrawlStats, StatsTracker};
use crate::extract::{self, PageDocument};
use crate::index::{CrawlSnapshot, SearchIndex, SearchOptions, SearchResponse};
use crate::robots::RobotsCache;
use crate::score::{prioritize_links, score_quality};
use crate::store::ContentStore;
use crate::url::normalize_url;
use crate::{Result, ScourError};
use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tokio::sync::Semaphore;
use tokio::time::sleep;
use tracing::{debug, info, warn};

/// Priority assigned to seed URLs so they drain before discovered links
const SEED_PRIORITY: f64 = 1000.0;

/// Progress notifications emitted during a crawl
#[derive(Debug, Clone)]
pub enum CrawlEvent {
    PageCrawled {
        url: String,
        depth: u32,
        quality_score: u8,
    },
    CrawlError {
        url: String,
        message: String,
    },
}

/// Result of `start_crawl`
#[derive(Debug, Clone)]
pub struct CrawlOutcome {
    pub stats: CrawlStats,
    /// The page document when crawling a single URL without link following
    pub document: Option<Arc<PageDocument>>,
}

struct CrawlState {
    frontier: Frontier,
    store: ContentStore,
    index: SearchIndex,
    stats: StatsTracker,
}

/// Polite, bounded-concurrency crawler with an attached search index
pub struct Crawler {
    config: Config,
    fetcher: Arc<dyn PageFetcher>,
    robots: RobotsCache,
    slots: Arc<Semaphore>,
    max_depth: AtomicU32,
    stopped: AtomicBool,
    state: Mutex<CrawlState>,
    events: Mutex<Option<UnboundedSender<CrawlEvent>>>,
}

impl Crawler {
    pub fn new(config: Config) -> Self {
        let fetcher = Arc::new(HttpFetcher::new(config.user_agent.full_string()));
        Self::with_fetcher(config, fetcher)
    }

    /// Builds a crawler around a custom fetch implementation
    pub fn with_fetcher(config: Config, fetcher: Arc<dyn PageFetcher>) -> Self {
        let robots = RobotsCache::new(&config.user_agent.full_string());
        let slots = Arc::new(Semaphore::new(config.crawler.max_concurrent_fetches as usize));
        let max_depth = AtomicU32::new(config.crawler.max_depth);
        let state = Mutex::new(CrawlState {
            frontier: Frontier::new(),
            store: ContentStore::new(),
            index: SearchIndex::new(config.search.clone()),
            stats: StatsTracker::new(),
        });
        Self {
            config,
            fetcher,
            robots,
            slots,
            max_depth,
            stopped: AtomicBool::new(false),
            state,
            events: Mutex::new(None),
        }
    }

    /// Subscribes to crawl progress events
    ///
    /// Only the most recent subscriber receives events.
    pub fn events(&self) -> UnboundedReceiver<CrawlEvent> {
        let (tx, rx) = mpsc::unbounded_channel();
        *self.lock_events() = Some(tx);
        rx
    }

    /// Requests a stop: no new fetches start, in-flight ones finish
    pub fn stop(&self) {
        self.stopped.store(true, Ordering::SeqCst);
        info!("stop requested");
    }

    pub fn is_stopped(&self) -> bool {
        self.stopped.load(Ordering::SeqCst)
    }

    /// The robots policy cache, exposed so rules can be pre-seeded
    pub fn robots(&self) -> &RobotsCache {
        &self.robots
    }

    /// Crawls seed URLs and everything discovered from them
    pub async fn start_crawl(
        &self,
        urls: &[String],
        max_depth: Option<u32>,
        follow_links: bool,
    ) -> Result<CrawlOutcome> {
        if let Some(depth) = max_depth {
            self.max_depth.store(depth, Ordering::SeqCst);
        }

        if !follow_links {
            let document = match urls.first() {
                Some(url) => self.crawl_one(url, 0, SEED_PRIORITY).await?,
                None => None,
            };
            let stats = self.lock_state().stats.snapshot(0);
            return Ok(CrawlOutcome { stats, document });
        }

        let stats = self.crawl_batch(urls).await?;
        Ok(CrawlOutcome {
            stats,
            document: None,
        })
    }

    /// Drains the frontier starting from the given seeds
    pub async fn crawl_batch(&self, seeds: &[String]) -> Result<CrawlStats> {
        {
            let mut state = self.lock_state();
            for seed in seeds {
                match normalize_url(seed) {
                    Ok(url) => {
                        state
                            .frontier
                            .enqueue(String::from(url), 0, SEED_PRIORITY, None);
                    }
                    Err(e) => warn!(seed = %seed, error = %e, "skipping invalid seed"),
                }
            }
        }

        loop {
            if self.is_stopped() {
                break;
            }
            let Some(entry) = self.lock_state().frontier.pop() else {
                break;
            };
            self.crawl_one(&entry.url, entry.depth, entry.priority)
                .await?;
        }

        let state = self.lock_state();
        Ok(state.stats.snapshot(state.frontier.pending_len()))
    }

    /// Crawls a single URL through the full pipeline
    ///
    /// Returns the stored document, or `None` when the URL was skipped or
    /// failed. Only an unrecoverable fetch client failure is an `Err`.
    pub async fn crawl_one(
        &self,
        url: &str,
        depth: u32,
        priority: f64,
    ) -> Result<Option<Arc<PageDocument>>> {
        if self.is_stopped() {
            return Ok(None);
        }

        let parsed = match normalize_url(url) {
            Ok(parsed) => parsed,
            Err(e) => {
                debug!(url, error = %e, "rejecting unnormalizable URL");
                return Ok(None);
            }
        };
        let normalized = parsed.to_string();
        if depth > self.max_depth.load(Ordering::SeqCst) {
            debug!(url = %normalized, depth, "past depth limit");
            return Ok(None);
        }
        // Claim the URL before any await so concurrent callers racing on
        // the same URL fetch it at most once.
        if !self.lock_state().frontier.begin(&normalized) {
            debug!(url = %normalized, "already handled this session");
            return Ok(None);
        }

        if !self.robots.allowed(&parsed).await {
            warn!(url = %normalized, "blocked by robots.txt");
            self.fail(&normalized, "blocked by robots.txt".to_string());
            return Ok(None);
        }

        let permit = match self.slots.acquire().await {
            Ok(permit) => permit,
            Err(_) => {
                self.lock_state().frontier.release(&normalized);
                return Ok(None);
            }
        };
        if self.is_stopped() {
            self.lock_state().frontier.release(&normalized);
            return Ok(None);
        }

        sleep(Duration::from_millis(self.config.crawler.request_delay_ms)).await;

        debug!(url = %normalized, depth, priority, "fetching");
        let timeout = Duration::from_millis(self.config.crawler.fetch_timeout_ms);
        let backoff = Duration::from_millis(self.config.crawler.retry_backoff_ms);
        let mut attempt: u32 = 0;
        let page = loop {
            match self.fetcher.fetch(&normalized, timeout).await {
                Ok(page) => break page,
                Err(FetchError::Client(message)) => {
                    self.fail(&normalized, message.clone());
                    return Err(ScourError::ClientExhausted(message));
                }
                Err(e) if e.is_transient() && attempt < self.config.crawler.retry_limit => {
                    attempt += 1;
                    warn!(url = %normalized, attempt, error = %e, "transient fetch failure, retrying");
                    sleep(backoff).await;
                }
                Err(e) => {
                    self.fail(&normalized, e.to_string());
                    return Ok(None);
                }
            }
        };
        drop(permit);

        let mut doc = match extract::extract(&page.html, &parsed) {
            Ok(doc) => doc,
            Err(e) => {
                self.fail(&normalized, e.to_string());
                return Ok(None);
            }
        };
        doc.depth = depth;
        doc.quality_score = score_quality(&doc);
        let doc = Arc::new(doc);

        {
            let mut state = self.lock_state();
            state.frontier.mark_crawled(&normalized);
            let id = state.store.insert(Arc::clone(&doc));
            state.index.index_document(id, &doc);
            state.stats.record_page(&doc);

            if depth < self.max_depth.load(Ordering::SeqCst) {
                // Take the top-ranked links first, then drop already-seen
                // ones; a seen link in the top slice does not pull a
                // lower-ranked link up into it.
                let scored = prioritize_links(&doc.links, &parsed);
                for link in scored.iter().take(self.config.crawler.max_links_per_page) {
                    let Ok(child) = normalize_url(&link.link.url) else {
                        continue;
                    };
                    state.frontier.enqueue(
                        String::from(child),
                        depth + 1,
                        link.score,
                        Some(normalized.clone()),
                    );
                }
            }
        }

        info!(
            url = %normalized,
            depth,
            quality = doc.quality_score,
            words = doc.word_count,
            "page crawled"
        );
        self.emit(CrawlEvent::PageCrawled {
            url: normalized,
            depth,
            quality_score: doc.quality_score,
        });
        Ok(Some(doc))
    }

    /// Runs a query against the session index
    pub fn search(&self, query: &str, options: &SearchOptions) -> SearchResponse {
        self.lock_state().index.search(query, options)
    }

    pub fn suggest(&self, partial: &str, limit: usize) -> Vec<String> {
        self.lock_state().index.suggest(partial, limit)
    }

    pub fn stats(&self) -> CrawlStats {
        let state = self.lock_state();
        state.stats.snapshot(state.frontier.pending_len())
    }

    /// Exports everything the session accumulated
    pub fn export_snapshot(&self) -> CrawlSnapshot {
        let state = self.lock_state();
        CrawlSnapshot {
            crawled: state.frontier.crawled().clone(),
            failed: state.frontier.failed().clone(),
            store: state.store.export(),
            index: state.index.export(),
        }
    }

    /// Restores a previous session, replacing current state
    pub fn import_snapshot(&self, snapshot: CrawlSnapshot) {
        let mut state = self.lock_state();
        state.frontier = Frontier::new();
        state
            .frontier
            .restore(snapshot.crawled, snapshot.failed);
        state.store.import(snapshot.store);
        state.index.import(snapshot.index);
    }

    fn fail(&self, url: &str, message: String) {
        {
            let mut state = self.lock_state();
            state.frontier.mark_failed(url);
            state.stats.record_failure();
        }
        self.emit(CrawlEvent::CrawlError {
            url: url.to_string(),
            message,
        });
    }

    fn emit(&self, event: CrawlEvent) {
        let mut guard = self.lock_events();
        if let Some(tx) = guard.as_ref() {
            if tx.send(event).is_err() {
                *guard = None;
            }
        }
    }

    fn lock_state(&self) -> MutexGuard<'_, CrawlState> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn lock_events(&self) -> MutexGuard<'_, Option<UnboundedSender<CrawlEvent>>> {
        self.events.lock().unwrap_or_else(|e| e.into_inner())
    }
}

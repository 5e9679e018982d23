//! Session statistics

use crate::extract::PageDocument;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::time::Instant;

/// Aggregate numbers for one crawl session
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CrawlStats {
    pub total_pages: u64,
    pub total_urls: u64,
    pub total_words: u64,
    pub total_failed: u64,
    pub average_quality: f64,
    pub unique_domains: usize,
    pub pending_urls: usize,
    pub duration_seconds: f64,
    pub pages_per_second: f64,
    pub success_rate: f64,
}

/// Running accumulators behind `CrawlStats`
pub struct StatsTracker {
    pages: u64,
    failed: u64,
    words: u64,
    quality_sum: u64,
    domains: HashSet<String>,
    started: Instant,
}

impl Default for StatsTracker {
    fn default() -> Self {
        Self::new()
    }
}

impl StatsTracker {
    pub fn new() -> Self {
        Self {
            pages: 0,
            failed: 0,
            words: 0,
            quality_sum: 0,
            domains: HashSet::new(),
            started: Instant::now(),
        }
    }

    pub fn record_page(&mut self, doc: &PageDocument) {
        self.pages += 1;
        self.words += doc.word_count as u64;
        self.quality_sum += u64::from(doc.quality_score);
        self.domains.insert(doc.domain.clone());
    }

    pub fn record_failure(&mut self) {
        self.failed += 1;
    }

    /// Produces the final stats for the session so far
    pub fn snapshot(&self, pending_urls: usize) -> CrawlStats {
        let duration = self.started.elapsed().as_secs_f64();
        let attempted = self.pages + self.failed;
        CrawlStats {
            total_pages: self.pages,
            total_urls: attempted,
            total_words: self.words,
            total_failed: self.failed,
            average_quality: if self.pages > 0 {
                self.quality_sum as f64 / self.pages as f64
            } else {
                0.0
            },
            unique_domains: self.domains.len(),
            pending_urls,
            duration_seconds: duration,
            pages_per_second: if duration > 0.0 {
                self.pages as f64 / duration
            } else {
                0.0
            },
            success_rate: if attempted > 0 {
                self.pages as f64 / attempted as f64 * 100.0
            } else {
                0.0
            },
        }
    }
}

/// Prints a human-readable session summary to stdout
pub fn print_stats(stats: &CrawlStats) {
    println!();
    println!("Crawl summary");
    println!("-------------");
    println!("  pages crawled:   {}", stats.total_pages);
    println!("  failed:          {}", stats.total_failed);
    println!("  pending:         {}", stats.pending_urls);
    println!("  unique domains:  {}", stats.unique_domains);
    println!("  total words:     {}", stats.total_words);
    println!("  average quality: {:.1}", stats.average_quality);
    println!("  duration:        {:.1}s", stats.duration_seconds);
    println!("  throughput:      {:.2} pages/s", stats.pages_per_second);
    println!("  success rate:    {:.1}%", stats.success_rate);
}

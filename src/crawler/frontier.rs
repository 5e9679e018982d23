//! Crawl frontier
//!
//! Pending URLs live in a map keyed by normalized URL, with a binary heap
//! providing highest-priority-first draining. Crawled and failed sets make
//! each URL fetchable at most once per session.

use std::cmp::Ordering;
use std::collections::{BinaryHeap, HashMap, HashSet};

/// A URL waiting to be crawled
#[derive(Debug, Clone)]
pub struct FrontierEntry {
    pub url: String,
    pub depth: u32,
    pub priority: f64,
    pub parent: Option<String>,
    seq: u64,
}

/// Heap key: descending priority, then insertion order
struct HeapEntry {
    priority: f64,
    seq: u64,
    url: String,
}

impl PartialEq for HeapEntry {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for HeapEntry {}

impl PartialOrd for HeapEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for HeapEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        // max-heap: higher priority first, earlier insertion breaks ties
        self.priority
            .total_cmp(&other.priority)
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

#[derive(Default)]
pub struct Frontier {
    pending: HashMap<String, FrontierEntry>,
    heap: BinaryHeap<HeapEntry>,
    in_flight: HashSet<String>,
    crawled: HashSet<String>,
    failed: HashSet<String>,
    next_seq: u64,
}

impl Frontier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a URL if it has never been seen this session
    ///
    /// Returns false when the URL is already pending, crawled or failed.
    pub fn enqueue(
        &mut self,
        url: String,
        depth: u32,
        priority: f64,
        parent: Option<String>,
    ) -> bool {
        if self.has_seen(&url) {
            return false;
        }

        let seq = self.next_seq;
        self.next_seq += 1;
        self.heap.push(HeapEntry {
            priority,
            seq,
            url: url.clone(),
        });
        self.pending.insert(
            url.clone(),
            FrontierEntry {
                url,
                depth,
                priority,
                parent,
                seq,
            },
        );
        true
    }

    /// Removes and returns the highest-priority pending URL
    pub fn pop(&mut self) -> Option<FrontierEntry> {
        while let Some(top) = self.heap.pop() {
            // Lazy deletion: skip heap keys whose pending entry is gone or
            // was replaced after this key was pushed.
            match self.pending.get(&top.url) {
                Some(entry) if entry.seq == top.seq => {
                    return self.pending.remove(&top.url);
                }
                _ => continue,
            }
        }
        None
    }

    /// Claims a URL for fetching
    ///
    /// Returns false when the URL already completed this session or another
    /// caller holds the claim. The claim lasts until `mark_crawled`,
    /// `mark_failed` or `release`, so concurrent callers fetch each URL at
    /// most once.
    pub fn begin(&mut self, url: &str) -> bool {
        if self.is_finished(url) || self.in_flight.contains(url) {
            return false;
        }
        self.pending.remove(url);
        self.in_flight.insert(url.to_string());
        true
    }

    /// Drops a claim without recording an outcome, leaving the URL
    /// fetchable again
    pub fn release(&mut self, url: &str) {
        self.in_flight.remove(url);
    }

    pub fn mark_crawled(&mut self, url: &str) {
        self.pending.remove(url);
        self.in_flight.remove(url);
        self.crawled.insert(url.to_string());
    }

    pub fn mark_failed(&mut self, url: &str) {
        self.pending.remove(url);
        self.in_flight.remove(url);
        self.failed.insert(url.to_string());
    }

    /// True when the URL is pending, in flight, crawled or failed
    pub fn has_seen(&self, url: &str) -> bool {
        self.pending.contains_key(url)
            || self.in_flight.contains(url)
            || self.is_finished(url)
    }

    /// True when the URL already completed this session, either way
    pub fn is_finished(&self, url: &str) -> bool {
        self.crawled.contains(url) || self.failed.contains(url)
    }

    pub fn pending_len(&self) -> usize {
        self.pending.len()
    }

    pub fn crawled(&self) -> &HashSet<String> {
        &self.crawled
    }

    pub fn failed(&self) -> &HashSet<String> {
        &self.failed
    }

    pub fn restore(&mut self, crawled: HashSet<String>, failed: HashSet<String>) {
        self.crawled = crawled;
        self.failed = failed;
    }
}

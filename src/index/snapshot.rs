//! Serializable snapshot of the search index and crawl session
//!
//! The snapshot is the only persistence surface: `crawl` writes it out,
//! `search` and `suggest` load it back without re-crawling.

use super::{DocEntry, SearchIndex};
use crate::store::{DocId, StoreSnapshot};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

/// Flat, serde-friendly image of a `SearchIndex`
#[derive(Debug, Serialize, Deserialize)]
pub struct IndexSnapshot {
    pub postings: HashMap<String, Vec<DocId>>,
    pub term_frequencies: HashMap<DocId, HashMap<String, f64>>,
    pub document_frequencies: HashMap<String, u32>,
    pub docs: HashMap<DocId, DocEntry>,
    pub total_docs: u32,
}

/// Everything a crawl session accumulates, as written to the snapshot file
#[derive(Debug, Serialize, Deserialize)]
pub struct CrawlSnapshot {
    pub crawled: HashSet<String>,
    pub failed: HashSet<String>,
    pub store: StoreSnapshot,
    pub index: IndexSnapshot,
}

impl SearchIndex {
    /// Exports the index state for serialization
    pub fn export(&self) -> IndexSnapshot {
        IndexSnapshot {
            postings: self
                .postings
                .iter()
                .map(|(term, ids)| {
                    let mut ids: Vec<DocId> = ids.iter().copied().collect();
                    ids.sort_unstable();
                    (term.clone(), ids)
                })
                .collect(),
            term_frequencies: self.term_frequencies.clone(),
            document_frequencies: self.document_frequencies.clone(),
            docs: self.docs.clone(),
            total_docs: self.total_docs,
        }
    }

    /// Replaces the index state with a previously exported snapshot
    pub fn import(&mut self, snapshot: IndexSnapshot) {
        self.postings = snapshot
            .postings
            .into_iter()
            .map(|(term, ids)| (term, ids.into_iter().collect()))
            .collect();
        self.term_frequencies = snapshot.term_frequencies;
        self.document_frequencies = snapshot.document_frequencies;
        self.docs = snapshot.docs;
        self.total_docs = snapshot.total_docs;
    }
}

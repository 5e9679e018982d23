//! In-memory inverted index with TF-IDF ranking
//!
//! Documents are indexed per field with field-specific boosts; queries run
//! through the same tokenizer as indexing so stemming stays symmetric.

mod search;
mod snapshot;

pub use search::{SearchOptions, SearchResponse, SearchResult};
pub use snapshot::{CrawlSnapshot, IndexSnapshot};

use crate::config::SearchConfig;
use crate::extract::{ContentType, PageDocument};
use crate::store::DocId;
use crate::text::{tokenize, TokenizerOptions};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

/// Term-frequency boost applied to title tokens
pub const TITLE_BOOST: f64 = 3.0;
/// Term-frequency boost applied to heading tokens
pub const HEADING_BOOST: f64 = 2.5;
/// Term-frequency boost applied to description tokens
pub const DESCRIPTION_BOOST: f64 = 2.0;
/// Term-frequency boost applied to keyword tokens
pub const KEYWORD_BOOST: f64 = 2.0;
/// Term-frequency boost applied to body tokens
pub const BODY_BOOST: f64 = 1.0;

/// Per-document metadata kept alongside the postings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocEntry {
    pub url: String,
    pub title: String,
    pub description: String,
    pub domain: String,
    pub content_type: ContentType,
    pub quality_score: u8,
    pub word_count: usize,
    pub publish_date: Option<DateTime<Utc>>,
    pub topics: Vec<String>,
    /// Lowercased concatenation of title, description, headings and
    /// paragraphs, used for exact-phrase scoring
    pub full_text: String,
    pub title_terms: HashSet<String>,
    pub description_terms: HashSet<String>,
}

/// Inverted index over crawled documents
pub struct SearchIndex {
    postings: HashMap<String, HashSet<DocId>>,
    term_frequencies: HashMap<DocId, HashMap<String, f64>>,
    document_frequencies: HashMap<String, u32>,
    docs: HashMap<DocId, DocEntry>,
    total_docs: u32,
    tokenizer: TokenizerOptions,
    config: SearchConfig,
}

impl SearchIndex {
    pub fn new(config: SearchConfig) -> Self {
        let tokenizer = TokenizerOptions {
            stemming: config.stemming,
        };
        Self {
            postings: HashMap::new(),
            term_frequencies: HashMap::new(),
            document_frequencies: HashMap::new(),
            docs: HashMap::new(),
            total_docs: 0,
            tokenizer,
            config,
        }
    }

    /// Adds a document to the index
    ///
    /// Indexing the same id twice is a no-op, which keeps the
    /// document-frequency table consistent.
    pub fn index_document(&mut self, id: DocId, doc: &PageDocument) {
        if self.docs.contains_key(&id) {
            return;
        }

        let mut weighted: HashMap<String, f64> = HashMap::new();
        let accumulate = |terms: Vec<String>, boost: f64, into: &mut HashMap<String, f64>| {
            for term in terms {
                *into.entry(term).or_insert(0.0) += boost;
            }
        };

        let title_tokens = tokenize(&doc.title, &self.tokenizer);
        let description_tokens = tokenize(&doc.description, &self.tokenizer);

        accumulate(title_tokens.clone(), TITLE_BOOST, &mut weighted);
        accumulate(description_tokens.clone(), DESCRIPTION_BOOST, &mut weighted);
        for heading in &doc.headings {
            accumulate(
                tokenize(&heading.text, &self.tokenizer),
                HEADING_BOOST,
                &mut weighted,
            );
        }
        for keyword in &doc.keywords {
            accumulate(tokenize(keyword, &self.tokenizer), KEYWORD_BOOST, &mut weighted);
        }
        for paragraph in &doc.paragraphs {
            accumulate(tokenize(paragraph, &self.tokenizer), BODY_BOOST, &mut weighted);
        }

        for term in weighted.keys() {
            self.postings.entry(term.clone()).or_default().insert(id);
            *self.document_frequencies.entry(term.clone()).or_insert(0) += 1;
        }

        self.docs.insert(
            id,
            DocEntry {
                url: doc.url.clone(),
                title: doc.title.clone(),
                description: doc.description.clone(),
                domain: doc.domain.clone(),
                content_type: doc.content_type,
                quality_score: doc.quality_score,
                word_count: doc.word_count,
                publish_date: doc.publish_date,
                topics: doc.topics.clone(),
                full_text: doc.full_text().to_lowercase(),
                title_terms: title_tokens.into_iter().collect(),
                description_terms: description_tokens.into_iter().collect(),
            },
        );
        self.term_frequencies.insert(id, weighted);
        self.total_docs += 1;
    }

    pub fn total_docs(&self) -> u32 {
        self.total_docs
    }

    pub fn term_count(&self) -> usize {
        self.postings.len()
    }

    pub fn document_frequency(&self, term: &str) -> u32 {
        self.document_frequencies.get(term).copied().unwrap_or(0)
    }

    /// Drops all indexed state
    pub fn clear(&mut self) {
        self.postings.clear();
        self.term_frequencies.clear();
        self.document_frequencies.clear();
        self.docs.clear();
        self.total_docs = 0;
    }

    pub(crate) fn postings(&self) -> &HashMap<String, HashSet<DocId>> {
        &self.postings
    }

    pub(crate) fn term_frequencies(&self) -> &HashMap<DocId, HashMap<String, f64>> {
        &self.term_frequencies
    }

    pub(crate) fn document_frequencies(&self) -> &HashMap<String, u32> {
        &self.document_frequencies
    }

    pub(crate) fn docs(&self) -> &HashMap<DocId, DocEntry> {
        &self.docs
    }

    pub(crate) fn config(&self) -> &SearchConfig {
        &self.config
    }

    pub(crate) fn tokenizer(&self) -> &TokenizerOptions {
        &self.tokenizer
    }
}


#[cfg(test)]
mod tests {
    use super::test_docs::doc;
    use super::*;

    fn index() -> SearchIndex {
        SearchIndex::new(SearchConfig::default())
    }

    #[test]
    fn test_index_document_updates_counts() {
        let mut idx = index();
        idx.index_document(
            0,
            &doc(
                "https://example.com/rust",
                "Rust ownership",
                &["Ownership is the core concept of the Rust borrow checker."],
            ),
        );

        assert_eq!(idx.total_docs(), 1);
        assert!(idx.term_count() > 0);
        assert_eq!(idx.document_frequency("rust"), 1);
    }

    #[test]
    fn test_document_frequency_counts_each_doc_once() {
        let mut idx = index();
        // "rust" appears in title, heading and body; df must still be 1
        idx.index_document(
            0,
            &doc(
                "https://example.com/rust",
                "Rust Rust Rust",
                &["More rust content about rust here in the body."],
            ),
        );
        assert_eq!(idx.document_frequency("rust"), 1);

        idx.index_document(
            1,
            &doc("https://example.com/other", "Rust again", &["Rust body."]),
        );
        assert_eq!(idx.document_frequency("rust"), 2);
    }

    #[test]
    fn test_reindex_same_id_is_noop() {
        let mut idx = index();
        let d = doc("https://example.com/a", "Alpha", &["Alpha body text here."]);
        idx.index_document(0, &d);
        idx.index_document(0, &d);

        assert_eq!(idx.total_docs(), 1);
        assert_eq!(idx.document_frequency("alpha"), 1);
    }

    #[test]
    fn test_title_terms_weighted_above_body() {
        let mut idx = index();
        idx.index_document(
            0,
            &doc(
                "https://example.com/a",
                "Compiler",
                &["The linker runs after code generation finishes."],
            ),
        );

        let tf = idx.term_frequencies().get(&0).unwrap();
        // title + heading occurrences outweigh a single body occurrence
        assert!(tf["compiler"] > tf["linker"]);
    }

    #[test]
    fn test_clear_resets_index() {
        let mut idx = index();
        idx.index_document(0, &doc("https://example.com/a", "Alpha", &["Body text."]));
        idx.clear();

        assert_eq!(idx.total_docs(), 0);
        assert_eq!(idx.term_count(), 0);
        assert!(idx.docs().is_empty());
    }
}

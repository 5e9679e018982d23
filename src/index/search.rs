//! Query execution: TF-IDF relevance, fuzzy expansion, filters, pagination

use super::{DocEntry, SearchIndex};
use crate::extract::ContentType;
use crate::store::DocId;
use crate::text::tokenize;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::time::Instant;

/// Multiplier on the exact-phrase occurrence bonus
const PHRASE_BONUS_WEIGHT: f64 = 5.0;
/// Scales field boosts into the per-term field-match bonus
const FIELD_MATCH_WEIGHT: f64 = 0.2;
/// Scales the 0-100 quality score into the relevance sum
const QUALITY_WEIGHT: f64 = 0.1;
/// Upper bound on the freshness bonus
const FRESHNESS_CAP: f64 = 0.1;
/// Freshness decays linearly to zero over this many days
const FRESHNESS_WINDOW_DAYS: f64 = 365.0;
/// Minimum normalized similarity for a fuzzy term match
const FUZZY_THRESHOLD: f64 = 0.8;
/// Query terms at or below this length are never fuzzy-expanded
const FUZZY_MIN_TERM_LEN: usize = 3;

/// Caller-supplied query options and filters
#[derive(Debug, Clone, Default)]
pub struct SearchOptions {
    pub limit: Option<usize>,
    pub offset: usize,
    pub content_type: Option<ContentType>,
    pub min_quality: Option<u8>,
    pub max_age_days: Option<i64>,
    pub min_word_count: Option<usize>,
    pub topic: Option<String>,
}

/// A single ranked hit
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchResult {
    pub url: String,
    pub title: String,
    pub description: String,
    pub content_type: ContentType,
    pub quality_score: u8,
    pub word_count: usize,
    pub publish_date: Option<DateTime<Utc>>,
    pub topics: Vec<String>,
    pub relevance: f64,
}

/// Ranked results plus query metadata
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchResponse {
    pub query: String,
    pub total: usize,
    pub results: Vec<SearchResult>,
    pub elapsed_ms: u64,
}

impl SearchResponse {
    fn empty(query: &str, started: Instant) -> Self {
        Self {
            query: query.to_string(),
            total: 0,
            results: vec![],
            elapsed_ms: started.elapsed().as_millis() as u64,
        }
    }
}

impl SearchIndex {
    /// Runs a ranked query over the index
    pub fn search(&self, query: &str, options: &SearchOptions) -> SearchResponse {
        let started = Instant::now();
        let trimmed = query.trim();
        if trimmed.chars().count() < self.config().min_query_length {
            return SearchResponse::empty(trimmed, started);
        }

        let terms = tokenize(trimmed, self.tokenizer());
        if terms.is_empty() {
            return SearchResponse::empty(trimmed, started);
        }

        // Expand each query term to the stored terms it should score
        // against: itself when indexed, otherwise its fuzzy neighbours.
        let mut matched_terms: Vec<String> = Vec::new();
        let mut candidates: HashSet<DocId> = HashSet::new();
        for term in &terms {
            if let Some(ids) = self.postings().get(term) {
                candidates.extend(ids.iter().copied());
                matched_terms.push(term.clone());
            } else if term.chars().count() > FUZZY_MIN_TERM_LEN {
                for stored in self.fuzzy_matches(term) {
                    if let Some(ids) = self.postings().get(&stored) {
                        candidates.extend(ids.iter().copied());
                    }
                    matched_terms.push(stored);
                }
            }
        }

        let phrase = trimmed.to_lowercase();
        let mut scored: Vec<(DocId, f64)> = candidates
            .into_iter()
            .filter_map(|id| {
                let entry = self.docs().get(&id)?;
                if !passes_filters(entry, options) {
                    return None;
                }
                let score = self.relevance(id, entry, &terms, &matched_terms, &phrase);
                (score > 0.0).then_some((id, score))
            })
            .collect();

        scored.sort_by(|a, b| b.1.total_cmp(&a.1).then_with(|| a.0.cmp(&b.0)));

        let total = scored.len();
        let limit = options
            .limit
            .unwrap_or(self.config().default_limit)
            .min(self.config().max_limit);
        let results = scored
            .into_iter()
            .skip(options.offset)
            .take(limit)
            .filter_map(|(id, score)| {
                let entry = self.docs().get(&id)?;
                Some(SearchResult {
                    url: entry.url.clone(),
                    title: entry.title.clone(),
                    description: entry.description.clone(),
                    content_type: entry.content_type,
                    quality_score: entry.quality_score,
                    word_count: entry.word_count,
                    publish_date: entry.publish_date,
                    topics: entry.topics.clone(),
                    relevance: (score * 100.0).round() / 100.0,
                })
            })
            .collect();

        SearchResponse {
            query: trimmed.to_string(),
            total,
            results,
            elapsed_ms: started.elapsed().as_millis() as u64,
        }
    }

    /// Prefix completions for a partial query, most common terms first
    pub fn suggest(&self, partial: &str, limit: usize) -> Vec<String> {
        let prefix = partial.trim().to_lowercase();
        if prefix.is_empty() {
            return vec![];
        }

        let mut matches: Vec<(&String, u32)> = self
            .document_frequencies()
            .iter()
            .filter(|(term, _)| term.starts_with(&prefix))
            .map(|(term, df)| (term, *df))
            .collect();
        matches.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));
        matches.into_iter().take(limit).map(|(t, _)| t.clone()).collect()
    }

    fn relevance(
        &self,
        id: DocId,
        entry: &DocEntry,
        query_terms: &[String],
        matched_terms: &[String],
        phrase: &str,
    ) -> f64 {
        let tf = match self.term_frequencies().get(&id) {
            Some(tf) => tf,
            None => return 0.0,
        };

        let total = f64::from(self.total_docs().max(1));
        let mut score = 0.0;
        for term in matched_terms {
            let (Some(weight), Some(&df)) = (tf.get(term), self.document_frequencies().get(term))
            else {
                continue;
            };
            if df > 0 {
                score += weight * (total / f64::from(df)).ln();
            }
        }

        if query_terms.len() > 1 {
            let occurrences = entry.full_text.matches(phrase).count();
            if occurrences > 0 {
                score += PHRASE_BONUS_WEIGHT * (1.0 + occurrences as f64).ln();
            }
        }

        for term in query_terms {
            if entry.title_terms.contains(term) {
                score += super::TITLE_BOOST * FIELD_MATCH_WEIGHT;
            }
            if entry.description_terms.contains(term) {
                score += super::DESCRIPTION_BOOST * FIELD_MATCH_WEIGHT;
            }
        }

        score += f64::from(entry.quality_score) * QUALITY_WEIGHT;
        score += freshness_bonus(entry.publish_date);
        score += content_type_bonus(entry.content_type);

        score / (1.0 + entry.word_count as f64).ln().max(1.0)
    }

    fn fuzzy_matches(&self, term: &str) -> Vec<String> {
        self.document_frequencies()
            .keys()
            .filter(|stored| similarity(term, stored) > FUZZY_THRESHOLD)
            .cloned()
            .collect()
    }
}

fn passes_filters(entry: &DocEntry, options: &SearchOptions) -> bool {
    if let Some(ct) = options.content_type {
        if entry.content_type != ct {
            return false;
        }
    }
    if let Some(min) = options.min_quality {
        if entry.quality_score < min {
            return false;
        }
    }
    if let Some(max_age) = options.max_age_days {
        match entry.publish_date {
            Some(date) => {
                if (Utc::now() - date).num_days() > max_age {
                    return false;
                }
            }
            None => return false,
        }
    }
    if let Some(min_words) = options.min_word_count {
        if entry.word_count < min_words {
            return false;
        }
    }
    if let Some(topic) = &options.topic {
        let wanted = topic.to_lowercase();
        if !entry.topics.iter().any(|t| t.to_lowercase() == wanted) {
            return false;
        }
    }
    true
}

fn freshness_bonus(publish_date: Option<DateTime<Utc>>) -> f64 {
    let Some(date) = publish_date else {
        return 0.0;
    };
    let age_days = (Utc::now() - date).num_days();
    if age_days < 0 {
        return 0.0;
    }
    let remaining = 1.0 - age_days as f64 / FRESHNESS_WINDOW_DAYS;
    (FRESHNESS_CAP * remaining).clamp(0.0, FRESHNESS_CAP)
}

fn content_type_bonus(content_type: ContentType) -> f64 {
    match content_type {
        ContentType::Article => 0.15,
        ContentType::Tutorial => 0.15,
        ContentType::Documentation => 0.12,
        ContentType::Recipe => 0.1,
        ContentType::News => 0.1,
        ContentType::Product => 0.05,
        ContentType::General => 0.0,
    }
}

/// Normalized Levenshtein similarity in [0, 1]
fn similarity(a: &str, b: &str) -> f64 {
    let a_len = a.chars().count();
    let b_len = b.chars().count();
    let max_len = a_len.max(b_len);
    if max_len == 0 {
        return 1.0;
    }
    1.0 - levenshtein(a, b) as f64 / max_len as f64
}

fn levenshtein(a: &str, b: &str) -> usize {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    if a.is_empty() {
        return b.len();
    }
    if b.is_empty() {
        return a.len();
    }

    let mut prev: Vec<usize> = (0..=b.len()).collect();
    let mut current = vec![0; b.len() + 1];
    for (i, &ca) in a.iter().enumerate() {
        current[0] = i + 1;
        for (j, &cb) in b.iter().enumerate() {
            let substitution = prev[j] + usize::from(ca != cb);
            current[j + 1] = substitution.min(prev[j + 1] + 1).min(current[j] + 1);
        }
        std::mem::swap(&mut prev, &mut current);
    }
    prev[b.len()]
}

#[cfg(test)]
mod tests {
    use super::super::test_docs::doc;
    use super::*;
    use crate::config::SearchConfig;
    use chrono::Duration;

    fn index_with(docs: &[(DocId, crate::extract::PageDocument)]) -> SearchIndex {
        let mut idx = SearchIndex::new(SearchConfig::default());
        for (id, d) in docs {
            idx.index_document(*id, d);
        }
        idx
    }

    #[test]
    fn test_levenshtein_basics() {
        assert_eq!(levenshtein("kitten", "sitting"), 3);
        assert_eq!(levenshtein("", "abc"), 3);
        assert_eq!(levenshtein("abc", "abc"), 0);
    }

    #[test]
    fn test_similarity_bounds() {
        assert!(similarity("tokenizer", "tokenizer") > 0.99);
        assert!(similarity("tokenizer", "tokenizers") > 0.8);
        assert!(similarity("tokenizer", "compiler") < 0.8);
    }

    #[test]
    fn test_short_query_returns_empty() {
        let idx = index_with(&[(0, doc("https://example.com/a", "Alpha", &["Body text."]))]);
        let response = idx.search("a", &SearchOptions::default());
        assert_eq!(response.total, 0);
        assert!(response.results.is_empty());
    }

    #[test]
    fn test_exact_phrase_outranks_scattered_terms() {
        let idx = index_with(&[
            (
                0,
                doc(
                    "https://example.com/phrase",
                    "Guide",
                    &["Learn about the rust borrow checker and how it enforces ownership."],
                ),
            ),
            (
                1,
                doc(
                    "https://example.com/scattered",
                    "Guide",
                    &["The borrow of a book is checked. Rust never sleeps, the checker said."],
                ),
            ),
        ]);

        let response = idx.search("rust borrow checker", &SearchOptions::default());
        assert_eq!(response.total, 2);
        assert_eq!(response.results[0].url, "https://example.com/phrase");
    }

    #[test]
    fn test_fuzzy_match_finds_near_terms() {
        let idx = index_with(&[(
            0,
            doc(
                "https://example.com/a",
                "Tokenizers",
                &["All about tokenizers and how they split input text."],
            ),
        )]);

        let response = idx.search("tokenizer", &SearchOptions::default());
        assert_eq!(response.total, 1);
    }

    #[test]
    fn test_quality_filter_excludes_low_scores() {
        let mut low = doc("https://example.com/low", "Rust topic", &["Rust body here."]);
        low.quality_score = 20;
        let mut high = doc("https://example.com/high", "Rust topic", &["Rust body here."]);
        high.quality_score = 90;
        let idx = index_with(&[(0, low), (1, high)]);

        let options = SearchOptions {
            min_quality: Some(50),
            ..Default::default()
        };
        let response = idx.search("rust", &options);
        assert_eq!(response.total, 1);
        assert_eq!(response.results[0].url, "https://example.com/high");
    }

    #[test]
    fn test_max_age_filter_requires_publish_date() {
        let mut dated = doc("https://example.com/dated", "Rust news", &["Rust body."]);
        dated.publish_date = Some(Utc::now() - Duration::days(10));
        let undated = doc("https://example.com/undated", "Rust news", &["Rust body."]);
        let idx = index_with(&[(0, dated), (1, undated)]);

        let options = SearchOptions {
            max_age_days: Some(30),
            ..Default::default()
        };
        let response = idx.search("rust", &options);
        assert_eq!(response.total, 1);
        assert_eq!(response.results[0].url, "https://example.com/dated");
    }

    #[test]
    fn test_pagination_offset_and_limit() {
        let docs: Vec<_> = (0..5)
            .map(|i| {
                (
                    i,
                    doc(
                        &format!("https://example.com/{i}"),
                        "Rust page",
                        &["Rust body content for ranking."],
                    ),
                )
            })
            .collect();
        let idx = index_with(&docs);

        let options = SearchOptions {
            limit: Some(2),
            offset: 2,
            ..Default::default()
        };
        let response = idx.search("rust", &options);
        assert_eq!(response.total, 5);
        assert_eq!(response.results.len(), 2);
    }

    #[test]
    fn test_limit_clamped_to_max() {
        let idx = index_with(&[(0, doc("https://example.com/a", "Rust", &["Rust body."]))]);
        let options = SearchOptions {
            limit: Some(10_000),
            ..Default::default()
        };
        // clamp must not panic or over-allocate; behavior equals max-limit
        let response = idx.search("rust", &options);
        assert_eq!(response.results.len(), 1);
    }

    #[test]
    fn test_suggest_ranked_by_document_frequency() {
        let idx = index_with(&[
            (0, doc("https://example.com/a", "Rust alpha", &["Rust body."])),
            (1, doc("https://example.com/b", "Rust beta", &["Rust and ruby."])),
        ]);

        let suggestions = idx.suggest("ru", 10);
        assert_eq!(suggestions.first().map(String::as_str), Some("rust"));
        assert!(suggestions.contains(&"ruby".to_string()));
    }

    #[test]
    fn test_freshness_bonus_caps_and_decays() {
        assert_eq!(freshness_bonus(None), 0.0);
        let fresh = freshness_bonus(Some(Utc::now() - Duration::days(1)));
        let old = freshness_bonus(Some(Utc::now() - Duration::days(300)));
        assert!(fresh > old);
        assert!(fresh <= FRESHNESS_CAP);
        assert_eq!(freshness_bonus(Some(Utc::now() - Duration::days(400))), 0.0);
    }
}

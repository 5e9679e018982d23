//! Shared text tokenizer
//!
//! One tokenizer feeds both sides of the system: the extractor uses it for
//! semantic keywords, and the index uses it for documents and queries.
//! Indexing and querying must tokenize identically or posting lookups
//! silently miss.

use lazy_static::lazy_static;
use rust_stemmers::{Algorithm, Stemmer};
use std::collections::HashSet;

/// Tokens shorter than this are dropped
const MIN_TOKEN_LEN: usize = 2;

/// Tokens longer than this are dropped (url fragments, base64 blobs)
const MAX_TOKEN_LEN: usize = 30;

lazy_static! {
    static ref STEMMER: Stemmer = Stemmer::create(Algorithm::English);
    static ref STOPWORDS: HashSet<&'static str> = {
        let words: &[&str] = &[
            "a", "about", "above", "after", "again", "all", "also", "am", "an", "and", "any",
            "are", "as", "at", "be", "because", "been", "before", "being", "below", "between",
            "both", "but", "by", "can", "could", "did", "do", "does", "doing", "down", "during",
            "each", "few", "for", "from", "further", "had", "has", "have", "having", "he", "her",
            "here", "hers", "him", "his", "how", "i", "if", "in", "into", "is", "it", "its",
            "just", "me", "more", "most", "my", "no", "nor", "not", "now", "of", "off", "on",
            "once", "only", "or", "other", "our", "ours", "out", "over", "own", "same", "she",
            "should", "so", "some", "such", "than", "that", "the", "their", "theirs", "them",
            "then", "there", "these", "they", "this", "those", "through", "to", "too", "under",
            "until", "up", "very", "was", "we", "were", "what", "when", "where", "which", "while",
            "who", "whom", "why", "will", "with", "would", "you", "your", "yours",
        ];
        words.iter().copied().collect()
    };
}

/// Tokenizer behavior switches
#[derive(Debug, Clone, Copy, Default)]
pub struct TokenizerOptions {
    /// Apply English stemming after filtering
    pub stemming: bool,
}

/// Tokenizes text into index terms
///
/// Lowercases, splits on non-alphanumeric boundaries, drops tokens outside
/// the length bounds, drops stop words, and optionally stems.
pub fn tokenize(text: &str, options: &TokenizerOptions) -> Vec<String> {
    let lowered = text.to_lowercase();

    lowered
        .split(|c: char| !c.is_alphanumeric())
        .filter(|token| {
            // Length bounds are in characters, not bytes, so multibyte
            // words are measured the same as ASCII ones.
            let chars = token.chars().count();
            chars >= MIN_TOKEN_LEN && chars <= MAX_TOKEN_LEN
        })
        .filter(|token| !is_stopword(token))
        .map(|token| {
            if options.stemming {
                STEMMER.stem(token).to_string()
            } else {
                token.to_string()
            }
        })
        .collect()
}

/// Checks whether a (lowercase) token is a stop word
pub fn is_stopword(token: &str) -> bool {
    STOPWORDS.contains(token)
}

/// Counts whitespace-separated words, the unit used by the quality scorer
/// and reading-time estimate
pub fn word_count(text: &str) -> usize {
    text.split_whitespace().count()
}

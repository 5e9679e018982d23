//! Document quality scoring
//!
//! Maps a structured document to an integer in [0, 100] from eight weighted
//! sub-scores. Each sub-score is itself in [0, 100]; the weights sum to 1.

use crate::extract::PageDocument;
use chrono::Utc;

const WEIGHT_WORD_COUNT: f64 = 0.20;
const WEIGHT_HEADINGS: f64 = 0.15;
const WEIGHT_METADATA: f64 = 0.15;
const WEIGHT_LINKS: f64 = 0.10;
const WEIGHT_IMAGES: f64 = 0.05;
const WEIGHT_TEXT_QUALITY: f64 = 0.20;
const WEIGHT_STRUCTURED_DATA: f64 = 0.10;
const WEIGHT_FRESHNESS: f64 = 0.05;

/// Word-count thresholds for the piecewise-linear sub-score
const MIN_WORDS: f64 = 100.0;
const OPTIMAL_WORDS: f64 = 800.0;
const MAX_WORDS: f64 = 5000.0;

/// Scores a document's overall quality
///
/// The result is the weighted sum of the eight sub-scores, clamped to
/// [0, 100] and rounded.
pub fn score_quality(doc: &PageDocument) -> u8 {
    let total = word_count_score(doc.word_count) * WEIGHT_WORD_COUNT
        + heading_score(doc) * WEIGHT_HEADINGS
        + metadata_score(doc) * WEIGHT_METADATA
        + link_score(doc) * WEIGHT_LINKS
        + image_score(doc) * WEIGHT_IMAGES
        + text_quality_score(doc) * WEIGHT_TEXT_QUALITY
        + structured_data_score(doc) * WEIGHT_STRUCTURED_DATA
        + freshness_score(doc) * WEIGHT_FRESHNESS;

    total.clamp(0.0, 100.0).round() as u8
}

/// Piecewise-linear word-count sub-score
///
/// Ramps 0→50 below the minimum threshold, 50→100 up to the optimal
/// threshold, decays to 80 at the maximum threshold, flat 80 beyond.
fn word_count_score(word_count: usize) -> f64 {
    let wc = word_count as f64;
    if wc < MIN_WORDS {
        wc / MIN_WORDS * 50.0
    } else if wc <= OPTIMAL_WORDS {
        50.0 + (wc - MIN_WORDS) / (OPTIMAL_WORDS - MIN_WORDS) * 50.0
    } else if wc <= MAX_WORDS {
        100.0 - (wc - OPTIMAL_WORDS) / (MAX_WORDS - OPTIMAL_WORDS) * 20.0
    } else {
        80.0
    }
}

/// Heading structure sub-score
///
/// Rewards presence, level variety, and progression that never skips more
/// than one level at a time.
fn heading_score(doc: &PageDocument) -> f64 {
    if doc.headings.is_empty() {
        return 0.0;
    }

    let mut score = 50.0;

    let levels: Vec<u8> = doc.headings.iter().map(|h| h.level).collect();
    let mut distinct = levels.clone();
    distinct.sort_unstable();
    distinct.dedup();
    score += (distinct.len().min(4) as f64 - 1.0) * 10.0;

    let no_skips = levels
        .windows(2)
        .all(|pair| pair[1] <= pair[0] || pair[1] - pair[0] <= 1);
    if no_skips {
        score += 20.0;
    }

    score.min(100.0)
}

/// Metadata completeness sub-score
fn metadata_score(doc: &PageDocument) -> f64 {
    let mut score = 0.0;
    if !doc.title.is_empty() {
        score += 25.0;
    }
    if !doc.description.is_empty() {
        score += 25.0;
    }
    if doc.author.is_some() {
        score += 15.0;
    }
    if doc.publish_date.is_some() {
        score += 15.0;
    }
    if !doc.keywords.is_empty() {
        score += 20.0;
    }
    score
}

/// Link quality sub-score: enough links to be connected, mix of internal
/// and external
fn link_score(doc: &PageDocument) -> f64 {
    if doc.links.is_empty() {
        return 30.0;
    }

    let count_component = (doc.links.len().min(20) as f64) / 20.0 * 60.0;

    let internal = doc.links.iter().filter(|l| l.internal).count();
    let external = doc.links.len() - internal;
    let mix_component = if internal > 0 && external > 0 { 40.0 } else { 20.0 };

    count_component + mix_component
}

/// Image presence sub-score; alt text raises it
fn image_score(doc: &PageDocument) -> f64 {
    if doc.images.is_empty() {
        return 30.0;
    }
    let with_alt = doc.images.iter().filter(|img| !img.alt.is_empty()).count();
    let alt_ratio = with_alt as f64 / doc.images.len() as f64;
    70.0 + 30.0 * alt_ratio
}

/// Text quality sub-score from paragraph shape
///
/// Prefers paragraphs of moderate average length with sentence-final
/// punctuation.
fn text_quality_score(doc: &PageDocument) -> f64 {
    if doc.paragraphs.is_empty() {
        return 0.0;
    }

    let total_len: usize = doc.paragraphs.iter().map(|p| p.len()).sum();
    let avg_len = total_len as f64 / doc.paragraphs.len() as f64;

    let length_component = if (80.0..=600.0).contains(&avg_len) {
        60.0
    } else if avg_len >= 40.0 {
        40.0
    } else {
        20.0
    };

    let punctuated = doc
        .paragraphs
        .iter()
        .filter(|p| p.ends_with(['.', '!', '?']))
        .count();
    let punctuation_component = punctuated as f64 / doc.paragraphs.len() as f64 * 40.0;

    length_component + punctuation_component
}

/// Structured-data presence sub-score
fn structured_data_score(doc: &PageDocument) -> f64 {
    if !doc.structured_data.is_empty() {
        return 100.0;
    }
    // Open Graph markup counts for partial credit
    if doc.metadata.keys().any(|k| k.starts_with("og:")) {
        return 40.0;
    }
    0.0
}

/// Freshness sub-score: step function of document age in days
///
/// Unknown and future dates are neutral.
fn freshness_score(doc: &PageDocument) -> f64 {
    let published = match doc.publish_date {
        Some(date) => date,
        None => return 50.0,
    };

    let age_days = (Utc::now() - published).num_days();
    if age_days < 0 {
        return 50.0;
    }

    match age_days {
        0..=7 => 100.0,
        8..=30 => 90.0,
        31..=90 => 80.0,
        91..=365 => 70.0,
        366..=730 => 60.0,
        _ => 50.0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extract::{ContentType, Heading, PageLink};
    use chrono::{Duration, Utc};
    use std::collections::HashMap;

    fn empty_doc() -> PageDocument {
        PageDocument {
            url: "https://example.com/".to_string(),
            domain: "example.com".to_string(),
            language: None,
            title: String::new(),
            description: String::new(),
            author: None,
            publish_date: None,
            keywords: vec![],
            headings: vec![],
            paragraphs: vec![],
            links: vec![],
            images: vec![],
            metadata: HashMap::new(),
            structured_data: vec![],
            word_count: 0,
            reading_time_minutes: 0,
            content_density: 0.0,
            semantic_keywords: vec![],
            content_type: ContentType::General,
            topics: vec![],
            quality_score: 0,
            depth: 0,
        }
    }

    fn rich_doc() -> PageDocument {
        let mut doc = empty_doc();
        doc.title = "A Long Form Guide".to_string();
        doc.description = "Everything about the topic in depth.".to_string();
        doc.author = Some("Author".to_string());
        doc.publish_date = Some(Utc::now() - Duration::days(3));
        doc.keywords = vec!["guide".to_string()];
        doc.headings = vec![
            Heading { level: 1, text: "Guide".to_string() },
            Heading { level: 2, text: "Part One".to_string() },
            Heading { level: 3, text: "Detail".to_string() },
        ];
        doc.paragraphs = vec![
            "A reasonably long paragraph that explains the first part of the topic in detail."
                .to_string();
            6
        ];
        doc.links = vec![
            PageLink {
                url: "https://example.com/a".to_string(),
                anchor: "a".to_string(),
                context: String::new(),
                internal: true,
            },
            PageLink {
                url: "https://other.com/b".to_string(),
                anchor: "b".to_string(),
                context: String::new(),
                internal: false,
            },
        ];
        doc.structured_data = vec![serde_json::json!({"@type": "Article"})];
        doc.word_count = 800;
        doc
    }

    #[test]
    fn test_score_bounds_on_degenerate_doc() {
        let score = score_quality(&empty_doc());
        assert!(score <= 100);
    }

    #[test]
    fn test_rich_doc_scores_high() {
        let score = score_quality(&rich_doc());
        assert!(score >= 70, "expected a high score, got {}", score);
    }

    #[test]
    fn test_rich_beats_empty() {
        assert!(score_quality(&rich_doc()) > score_quality(&empty_doc()));
    }

    #[test]
    fn test_word_count_monotonic_below_optimal() {
        let mut previous = -1.0;
        for wc in (0..=800).step_by(25) {
            let score = word_count_score(wc);
            assert!(
                score >= previous,
                "word count sub-score decreased at {} words",
                wc
            );
            previous = score;
        }
    }

    #[test]
    fn test_word_count_breakpoints() {
        assert_eq!(word_count_score(0), 0.0);
        assert_eq!(word_count_score(100), 50.0);
        assert_eq!(word_count_score(800), 100.0);
        assert_eq!(word_count_score(5000), 80.0);
        assert_eq!(word_count_score(20_000), 80.0);
    }

    #[test]
    fn test_word_count_decays_past_optimal() {
        assert!(word_count_score(2000) < word_count_score(800));
        assert!(word_count_score(2000) > 80.0);
    }

    #[test]
    fn test_heading_score_zero_without_headings() {
        assert_eq!(heading_score(&empty_doc()), 0.0);
    }

    #[test]
    fn test_heading_skip_penalized() {
        let mut orderly = empty_doc();
        orderly.headings = vec![
            Heading { level: 1, text: "a".to_string() },
            Heading { level: 2, text: "b".to_string() },
        ];
        let mut skipping = empty_doc();
        skipping.headings = vec![
            Heading { level: 1, text: "a".to_string() },
            Heading { level: 4, text: "b".to_string() },
        ];
        assert!(heading_score(&orderly) > heading_score(&skipping));
    }

    #[test]
    fn test_metadata_score_complete() {
        let doc = rich_doc();
        assert_eq!(metadata_score(&doc), 100.0);
    }

    #[test]
    fn test_freshness_steps() {
        let mut doc = empty_doc();
        assert_eq!(freshness_score(&doc), 50.0);

        doc.publish_date = Some(Utc::now() - Duration::days(2));
        assert_eq!(freshness_score(&doc), 100.0);

        doc.publish_date = Some(Utc::now() - Duration::days(100));
        assert_eq!(freshness_score(&doc), 70.0);

        doc.publish_date = Some(Utc::now() - Duration::days(1000));
        assert_eq!(freshness_score(&doc), 50.0);

        // Future dates are as neutral as missing ones
        doc.publish_date = Some(Utc::now() + Duration::days(30));
        assert_eq!(freshness_score(&doc), 50.0);
    }

    #[test]
    fn test_image_alt_ratio() {
        let mut doc = empty_doc();
        assert_eq!(image_score(&doc), 30.0);

        doc.images = vec![
            crate::extract::PageImage {
                url: "https://example.com/a.jpg".to_string(),
                alt: "described".to_string(),
            },
            crate::extract::PageImage {
                url: "https://example.com/b.jpg".to_string(),
                alt: String::new(),
            },
        ];
        assert_eq!(image_score(&doc), 85.0);
    }

    #[test]
    fn test_structured_data_partial_credit_for_og() {
        let mut doc = empty_doc();
        assert_eq!(structured_data_score(&doc), 0.0);
        doc.metadata.insert("og:title".to_string(), "t".to_string());
        assert_eq!(structured_data_score(&doc), 40.0);
        doc.structured_data = vec![serde_json::json!({})];
        assert_eq!(structured_data_score(&doc), 100.0);
    }
}

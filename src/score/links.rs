//! Outbound-link prioritization
//!
//! Scores a page's outbound links to decide what enters the frontier next.
//! A link scoring zero is dropped entirely; everything else is sorted
//! descending so the scheduler can take the top few.

use crate::extract::PageLink;
use crate::url::same_host;
use url::Url;

/// Path fragments that score a link zero outright
const DISALLOWED_PATTERNS: &[&str] = &[
    "/login", "/signin", "/signup", "/register", "/logout", "/admin", "/account", "/cart",
    "/checkout", "/password", "/auth/",
];

/// File extensions that are not HTML pages
const DISALLOWED_EXTENSIONS: &[&str] = &[
    ".pdf", ".jpg", ".jpeg", ".png", ".gif", ".svg", ".webp", ".zip", ".gz", ".tar", ".exe",
    ".dmg", ".css", ".js", ".json", ".xml", ".rss", ".mp3", ".mp4", ".avi", ".mov", ".woff",
    ".woff2", ".ico",
];

/// Path fragments that usually lead to substantive content
const VALUABLE_PATTERNS: &[&str] = &[
    "/blog/", "/article/", "/post/", "/news/", "/docs/", "/guide/", "/tutorial/", "/learn/",
    "/reference/", "/recipe/",
];

/// Anchor vocabulary that signals content behind the link
const CONTENT_WORDS: &[&str] = &[
    "guide", "tutorial", "article", "review", "how", "learn", "documentation", "reference",
    "introduction", "overview", "explained", "recipe",
];

/// Anchor vocabulary for ordinary navigation
const NAV_WORDS: &[&str] = &["next", "previous", "more", "continue", "chapter", "part"];

/// Anchor texts that carry no information
const GENERIC_TEXTS: &[&str] = &["click here", "here", "link", "this", "read more", "more info"];

const SAME_HOST_BONUS: f64 = 30.0;
const CROSS_HOST_BONUS: f64 = 10.0;

/// A link together with its priority score
#[derive(Debug, Clone)]
pub struct ScoredLink {
    pub link: PageLink,
    pub score: f64,
}

/// Scores and ranks outbound links for frontier insertion
///
/// # Arguments
///
/// * `links` - The page's extracted outbound links
/// * `base_url` - The page's own URL, for the same-host bonus
///
/// # Returns
///
/// Links with positive scores, sorted descending by score. The sort is
/// stable, so equal scores keep page order.
pub fn prioritize_links(links: &[PageLink], base_url: &Url) -> Vec<ScoredLink> {
    let mut scored: Vec<ScoredLink> = links
        .iter()
        .filter_map(|link| {
            let score = score_link(link, base_url);
            if score > 0.0 {
                Some(ScoredLink {
                    link: link.clone(),
                    score,
                })
            } else {
                None
            }
        })
        .collect();

    scored.sort_by(|a, b| b.score.total_cmp(&a.score));
    scored
}

/// Scores a single link; zero means drop
pub fn score_link(link: &PageLink, base_url: &Url) -> f64 {
    let url = match Url::parse(&link.url) {
        Ok(u) => u,
        Err(_) => return 0.0,
    };
    if url.scheme() != "http" && url.scheme() != "https" {
        return 0.0;
    }

    let path = url.path().to_lowercase();
    if DISALLOWED_PATTERNS.iter().any(|p| path.contains(p)) {
        return 0.0;
    }
    if DISALLOWED_EXTENSIONS.iter().any(|ext| path.ends_with(ext)) {
        return 0.0;
    }

    let domain_bonus = if same_host(&url, base_url) {
        SAME_HOST_BONUS
    } else {
        CROSS_HOST_BONUS
    };

    domain_bonus + anchor_score(&link.anchor) + url_structure_score(&url) + context_score(link)
}

/// Anchor-text quality: length fitness, content vocabulary, navigation
/// vocabulary, generic-text penalty
fn anchor_score(anchor: &str) -> f64 {
    let trimmed = anchor.trim();
    let lowered = trimmed.to_lowercase();
    let mut score = 0.0;

    let len = trimmed.len();
    if (3..=80).contains(&len) {
        score += 10.0;
        if (10..=60).contains(&len) {
            score += 5.0;
        }
    }

    if CONTENT_WORDS.iter().any(|w| lowered.contains(w)) {
        score += 15.0;
    }
    if NAV_WORDS.iter().any(|w| lowered.contains(w)) {
        score += 5.0;
    }
    if GENERIC_TEXTS.contains(&lowered.as_str()) {
        score -= 10.0;
    }

    score
}

/// URL structure: valuable path patterns, shallow paths, clean query,
/// readable slug
fn url_structure_score(url: &Url) -> f64 {
    let path = url.path().to_lowercase();
    let mut score = 0.0;

    if VALUABLE_PATTERNS.iter().any(|p| path.contains(p)) {
        score += 15.0;
    }

    let segments = path.split('/').filter(|s| !s.is_empty()).count();
    if segments <= 3 {
        score += 10.0;
    }

    if url.query().is_none() {
        score += 5.0;
    }

    if has_readable_slug(&path) {
        score += 10.0;
    }

    score
}

/// A readable slug is a final segment of hyphen-joined words rather than an
/// opaque identifier
fn has_readable_slug(path: &str) -> bool {
    let last = match path.rsplit('/').find(|s| !s.is_empty()) {
        Some(s) => s,
        None => return false,
    };
    last.contains('-')
        && last.chars().all(|c| c.is_ascii_alphanumeric() || c == '-')
        && last.chars().any(|c| c.is_ascii_alphabetic())
}

/// Context relevance: enough surrounding text, relevant vocabulary, word
/// overlap between anchor and context
fn context_score(link: &PageLink) -> f64 {
    let context = link.context.trim();
    if context.is_empty() {
        return 0.0;
    }

    let lowered = context.to_lowercase();
    let mut score = 0.0;

    if context.len() >= 50 {
        score += 5.0;
    }

    if CONTENT_WORDS.iter().any(|w| lowered.contains(w)) {
        score += 10.0;
    }

    let anchor_lower = link.anchor.to_lowercase();
    let overlap = anchor_lower
        .split_whitespace()
        .filter(|w| w.len() > 3)
        .any(|w| lowered.matches(w).count() > 1);
    if overlap {
        score += 10.0;
    }

    score
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base() -> Url {
        Url::parse("https://example.com/blog/post").unwrap()
    }

    fn link(url: &str, anchor: &str, context: &str) -> PageLink {
        PageLink {
            url: url.to_string(),
            anchor: anchor.to_string(),
            context: context.to_string(),
            internal: false,
        }
    }

    #[test]
    fn test_disallowed_path_scores_zero() {
        for path in ["/login", "/admin/users", "/cart", "/checkout/step-1"] {
            let l = link(&format!("https://example.com{}", path), "text", "");
            assert_eq!(score_link(&l, &base()), 0.0, "path {} should be zero", path);
        }
    }

    #[test]
    fn test_non_html_extension_scores_zero() {
        for ext in [".pdf", ".png", ".zip", ".css"] {
            let l = link(&format!("https://example.com/file{}", ext), "text", "");
            assert_eq!(score_link(&l, &base()), 0.0, "extension {} should be zero", ext);
        }
    }

    #[test]
    fn test_invalid_url_scores_zero() {
        let l = link("not a url", "text", "");
        assert_eq!(score_link(&l, &base()), 0.0);
    }

    #[test]
    fn test_same_host_beats_cross_host() {
        let internal = link("https://example.com/guide/setup", "Setup guide", "");
        let external = link("https://other.com/guide/setup", "Setup guide", "");
        assert!(score_link(&internal, &base()) > score_link(&external, &base()));
    }

    #[test]
    fn test_content_anchor_beats_generic() {
        let content = link("https://example.com/page-one", "Complete tutorial on baking", "");
        let generic = link("https://example.com/page-two", "click here", "");
        assert!(score_link(&content, &base()) > score_link(&generic, &base()));
    }

    #[test]
    fn test_valuable_path_bonus() {
        let valuable = link("https://example.com/blog/entry-one", "entry one text", "");
        let plain = link("https://example.com/misc/entry-one", "entry one text", "");
        assert!(score_link(&valuable, &base()) > score_link(&plain, &base()));
    }

    #[test]
    fn test_readable_slug_bonus() {
        let readable = link("https://example.com/how-to-bake", "baking text", "");
        let opaque = link("https://example.com/a8f3e2", "baking text", "");
        assert!(score_link(&readable, &base()) > score_link(&opaque, &base()));
    }

    #[test]
    fn test_query_string_penalized() {
        let clean = link("https://example.com/page-one", "anchor text here", "");
        let query = link("https://example.com/page-one?session=5", "anchor text here", "");
        assert!(score_link(&clean, &base()) > score_link(&query, &base()));
    }

    #[test]
    fn test_context_adds_relevance() {
        let with_context = link(
            "https://example.com/page-one",
            "bread baking",
            "A long surrounding paragraph about the tutorial covering bread baking in detail.",
        );
        let without = link("https://example.com/page-one", "bread baking", "");
        assert!(score_link(&with_context, &base()) > score_link(&without, &base()));
    }

    #[test]
    fn test_prioritize_sorts_descending_and_drops_zeros() {
        let links = vec![
            link("https://example.com/login", "log in", ""),
            link("https://other.com/misc", "misc", ""),
            link("https://example.com/guide/full-tutorial", "Complete tutorial guide", ""),
        ];
        let ranked = prioritize_links(&links, &base());

        assert_eq!(ranked.len(), 2);
        assert!(ranked[0].link.url.contains("full-tutorial"));
        assert!(ranked.windows(2).all(|w| w[0].score >= w[1].score));
    }

    #[test]
    fn test_equal_scores_keep_page_order() {
        let links = vec![
            link("https://example.com/first-page", "same anchor text", ""),
            link("https://example.com/second-page", "same anchor text", ""),
        ];
        let ranked = prioritize_links(&links, &base());
        assert_eq!(ranked.len(), 2);
        assert!(ranked[0].link.url.contains("first-page"));
    }
}

//! HTML to structured-document extraction
//!
//! `extract` is a pure function of the markup and the page URL. It strips
//! known noise regions, resolves each metadata field through an ordered
//! candidate list, and derives the metrics the quality scorer and search
//! index consume.

use crate::extract::classify::classify_content_type;
use crate::extract::document::{Heading, PageDocument, PageImage, PageLink};
use crate::extract::ExtractError;
use crate::text::{is_stopword, tokenize, word_count, TokenizerOptions};
use crate::url::{extract_domain, same_host};
use chrono::{DateTime, NaiveDate, Utc};
use scraper::{ElementRef, Html, Selector};
use std::collections::{HashMap, HashSet};
use url::Url;

/// Paragraphs shorter than this are treated as boilerplate fragments
const MIN_PARAGRAPH_LEN: usize = 30;

/// Link context snippets are truncated to this many characters
const MAX_CONTEXT_LEN: usize = 150;

/// How many semantic keywords are kept
const MAX_SEMANTIC_KEYWORDS: usize = 10;

/// Cap on the derived topic set
const MAX_TOPICS: usize = 15;

/// Elements that never contribute content
const NOISE_TAGS: &[&str] = &[
    "nav", "header", "footer", "aside", "script", "style", "noscript", "form", "iframe",
];

/// Class/id fragments that mark chrome, ads, and other non-content regions
const NOISE_MARKERS: &[&str] = &[
    "nav", "menu", "sidebar", "footer", "banner", "advert", "promo", "cookie", "popup", "share",
];

/// Extracts a structured document from fetched markup
///
/// # Arguments
///
/// * `html` - The raw page markup
/// * `url` - The page's own (normalized) URL, used for link resolution and
///   the internal/external flag
///
/// # Returns
///
/// * `Ok(PageDocument)` - Structured document with derived metrics;
///   `quality_score` and `depth` are left at zero for the scheduler to set
/// * `Err(ExtractError)` - The markup was empty or yielded no content at all
pub fn extract(html: &str, url: &Url) -> Result<PageDocument, ExtractError> {
    if html.trim().is_empty() {
        return Err(ExtractError::EmptyDocument);
    }

    let document = Html::parse_document(html);
    let domain = extract_domain(url).unwrap_or_default();

    let metadata = collect_metadata(&document);
    let language = extract_language(&document, &metadata);
    let headings = extract_headings(&document);
    let paragraphs = extract_paragraphs(&document);
    let title = extract_title(&document, &metadata, &headings);
    let description = extract_description(&metadata, &paragraphs);
    let author = extract_author(&document, &metadata);
    let publish_date = extract_publish_date(&document, &metadata);
    let keywords = extract_keywords(&metadata);
    let links = extract_links(&document, url);
    let images = extract_images(&document, url);
    let structured_data = extract_structured_data(&document);

    let words = word_count(&title)
        + word_count(&description)
        + headings.iter().map(|h| word_count(&h.text)).sum::<usize>()
        + paragraphs.iter().map(|p| word_count(p)).sum::<usize>();

    let reading_time_minutes = words.div_ceil(200) as u32;

    let paragraph_chars: usize = paragraphs.iter().map(|p| p.len()).sum();
    let content_density = if html.is_empty() {
        0.0
    } else {
        paragraph_chars as f64 / html.len() as f64
    };

    let semantic_keywords = semantic_keywords(&headings, &paragraphs);
    let body_text = paragraphs.join(" ");
    let content_type = classify_content_type(url, &body_text, headings.len(), words);
    let topics = derive_topics(&keywords, &semantic_keywords, &headings);

    Ok(PageDocument {
        url: url.to_string(),
        domain,
        language,
        title,
        description,
        author,
        publish_date,
        keywords,
        headings,
        paragraphs,
        links,
        images,
        metadata,
        structured_data,
        word_count: words,
        reading_time_minutes,
        content_density,
        semantic_keywords,
        content_type,
        topics,
        quality_score: 0,
        depth: 0,
    })
}

fn sel(selector: &str) -> Option<Selector> {
    Selector::parse(selector).ok()
}

/// Walks an element's ancestor chain looking for noise containers
fn in_noise_region(element: &ElementRef) -> bool {
    for ancestor in element.ancestors() {
        if let Some(el) = ElementRef::wrap(ancestor) {
            let tag = el.value().name();
            if NOISE_TAGS.contains(&tag) {
                return true;
            }
            if el.value().attr("hidden").is_some() {
                return true;
            }
            if let Some(style) = el.value().attr("style") {
                let style = style.replace(' ', "").to_lowercase();
                if style.contains("display:none") || style.contains("visibility:hidden") {
                    return true;
                }
            }
            if has_noise_marker(&el) {
                return true;
            }
        }
    }
    false
}

fn has_noise_marker(el: &ElementRef) -> bool {
    let mut joined = String::new();
    if let Some(class) = el.value().attr("class") {
        joined.push_str(&class.to_lowercase());
        joined.push(' ');
    }
    if let Some(id) = el.value().attr("id") {
        joined.push_str(&id.to_lowercase());
    }
    if joined.is_empty() {
        return false;
    }
    joined
        .split(|c: char| !c.is_alphanumeric())
        .any(|token| NOISE_MARKERS.contains(&token))
}

fn element_text(el: &ElementRef) -> String {
    el.text().collect::<String>().trim().to_string()
}

/// Collects every `<meta>` tag into a name/property → content map
fn collect_metadata(document: &Html) -> HashMap<String, String> {
    let mut metadata = HashMap::new();

    if let Some(meta_sel) = sel("meta") {
        for element in document.select(&meta_sel) {
            let key = element
                .value()
                .attr("name")
                .or_else(|| element.value().attr("property"))
                .or_else(|| element.value().attr("http-equiv"));
            let content = element.value().attr("content");
            if let (Some(key), Some(content)) = (key, content) {
                let content = content.trim();
                if !content.is_empty() {
                    metadata.insert(key.to_lowercase(), content.to_string());
                }
            }
        }
    }

    metadata
}

fn extract_language(document: &Html, metadata: &HashMap<String, String>) -> Option<String> {
    if let Some(html_sel) = sel("html") {
        if let Some(element) = document.select(&html_sel).next() {
            if let Some(lang) = element.value().attr("lang") {
                let lang = lang.trim();
                if !lang.is_empty() {
                    return Some(lang.to_lowercase());
                }
            }
        }
    }
    metadata.get("content-language").map(|l| l.to_lowercase())
}

/// Resolves the title through an ordered candidate list: Open Graph, Twitter
/// card, `<title>`, first `<h1>`. First non-empty, length-valid candidate
/// wins.
fn extract_title(
    document: &Html,
    metadata: &HashMap<String, String>,
    headings: &[Heading],
) -> String {
    let candidates = [metadata.get("og:title"), metadata.get("twitter:title")];
    for candidate in candidates.into_iter().flatten() {
        if title_valid(candidate) {
            return candidate.clone();
        }
    }

    if let Some(title_sel) = sel("title") {
        if let Some(element) = document.select(&title_sel).next() {
            let text = element_text(&element);
            if title_valid(&text) {
                return text;
            }
        }
    }

    headings
        .iter()
        .find(|h| h.level == 1 && title_valid(&h.text))
        .map(|h| h.text.clone())
        .unwrap_or_default()
}

fn title_valid(text: &str) -> bool {
    let len = text.trim().len();
    len > 0 && len <= 300
}

/// Description candidates: meta description, Open Graph description, then
/// the first paragraph truncated
fn extract_description(metadata: &HashMap<String, String>, paragraphs: &[String]) -> String {
    let candidates = [metadata.get("description"), metadata.get("og:description")];
    for candidate in candidates.into_iter().flatten() {
        let len = candidate.trim().len();
        if len >= 10 && len <= 500 {
            return candidate.clone();
        }
    }

    paragraphs
        .first()
        .map(|p| truncate(p, 300))
        .unwrap_or_default()
}

fn extract_author(document: &Html, metadata: &HashMap<String, String>) -> Option<String> {
    let candidates = [metadata.get("author"), metadata.get("article:author")];
    for candidate in candidates.into_iter().flatten() {
        let trimmed = candidate.trim();
        if !trimmed.is_empty() && trimmed.len() <= 100 {
            return Some(trimmed.to_string());
        }
    }

    for selector in ["[rel='author']", ".author"] {
        if let Some(author_sel) = sel(selector) {
            if let Some(element) = document.select(&author_sel).next() {
                let text = element_text(&element);
                if !text.is_empty() && text.len() <= 100 {
                    return Some(text);
                }
            }
        }
    }

    None
}

/// Publish-date candidates: article:published_time, `<time datetime>`, then
/// plain date metas. Accepts RFC 3339 or bare `YYYY-MM-DD`.
fn extract_publish_date(
    document: &Html,
    metadata: &HashMap<String, String>,
) -> Option<DateTime<Utc>> {
    let meta_candidates = [
        metadata.get("article:published_time"),
        metadata.get("date"),
        metadata.get("publish-date"),
        metadata.get("dc.date"),
    ];
    for candidate in meta_candidates.into_iter().flatten() {
        if let Some(parsed) = parse_date(candidate) {
            return Some(parsed);
        }
    }

    if let Some(time_sel) = sel("time[datetime]") {
        for element in document.select(&time_sel) {
            if let Some(datetime) = element.value().attr("datetime") {
                if let Some(parsed) = parse_date(datetime) {
                    return Some(parsed);
                }
            }
        }
    }

    None
}

fn parse_date(value: &str) -> Option<DateTime<Utc>> {
    let value = value.trim();
    if let Ok(parsed) = DateTime::parse_from_rfc3339(value) {
        return Some(parsed.with_timezone(&Utc));
    }
    if let Ok(date) = NaiveDate::parse_from_str(value, "%Y-%m-%d") {
        return date.and_hms_opt(0, 0, 0).map(|dt| dt.and_utc());
    }
    None
}

fn extract_keywords(metadata: &HashMap<String, String>) -> Vec<String> {
    metadata
        .get("keywords")
        .map(|raw| {
            raw.split(',')
                .map(|k| k.trim().to_lowercase())
                .filter(|k| !k.is_empty())
                .collect()
        })
        .unwrap_or_default()
}

/// Captures h1-h6 with level and text, in document order
fn extract_headings(document: &Html) -> Vec<Heading> {
    let mut headings = Vec::new();

    if let Some(heading_sel) = sel("h1, h2, h3, h4, h5, h6") {
        for element in document.select(&heading_sel) {
            if in_noise_region(&element) {
                continue;
            }
            let text = element_text(&element);
            if text.is_empty() {
                continue;
            }
            let level = match element.value().name() {
                "h1" => 1,
                "h2" => 2,
                "h3" => 3,
                "h4" => 4,
                "h5" => 5,
                _ => 6,
            };
            headings.push(Heading { level, text });
        }
    }

    headings
}

fn extract_paragraphs(document: &Html) -> Vec<String> {
    let mut paragraphs = Vec::new();

    if let Some(p_sel) = sel("p") {
        for element in document.select(&p_sel) {
            if in_noise_region(&element) {
                continue;
            }
            let text = element_text(&element);
            if text.len() >= MIN_PARAGRAPH_LEN {
                paragraphs.push(text);
            }
        }
    }

    paragraphs
}

/// Extracts outbound links, deduplicated by absolute URL
///
/// Each link carries its anchor text, a context snippet from the enclosing
/// element, and an internal/external flag.
fn extract_links(document: &Html, base_url: &Url) -> Vec<PageLink> {
    let mut links = Vec::new();
    let mut seen: HashSet<String> = HashSet::new();

    if let Some(a_sel) = sel("a[href]") {
        for element in document.select(&a_sel) {
            if in_noise_region(&element) {
                continue;
            }
            let href = match element.value().attr("href") {
                Some(h) => h.trim(),
                None => continue,
            };
            let absolute = match resolve_link(href, base_url) {
                Some(u) => u,
                None => continue,
            };
            if !seen.insert(absolute.to_string()) {
                continue;
            }

            let anchor = element_text(&element);
            let context = element
                .parent()
                .and_then(ElementRef::wrap)
                .map(|parent| truncate(&element_text(&parent), MAX_CONTEXT_LEN))
                .unwrap_or_default();

            links.push(PageLink {
                internal: same_host(&absolute, base_url),
                url: absolute.to_string(),
                anchor,
                context,
            });
        }
    }

    links
}

/// Resolves an href to an absolute http(s) URL
///
/// Returns None for javascript:/mailto:/tel:/data: schemes, fragment-only
/// anchors, and anything that fails to resolve.
fn resolve_link(href: &str, base_url: &Url) -> Option<Url> {
    if href.is_empty() || href.starts_with('#') {
        return None;
    }
    if href.starts_with("javascript:")
        || href.starts_with("mailto:")
        || href.starts_with("tel:")
        || href.starts_with("data:")
    {
        return None;
    }

    match base_url.join(href) {
        Ok(absolute) if absolute.scheme() == "http" || absolute.scheme() == "https" => {
            Some(absolute)
        }
        _ => None,
    }
}

fn extract_images(document: &Html, base_url: &Url) -> Vec<PageImage> {
    let mut images = Vec::new();
    let mut seen: HashSet<String> = HashSet::new();

    if let Some(img_sel) = sel("img[src]") {
        for element in document.select(&img_sel) {
            let src = match element.value().attr("src") {
                Some(s) => s.trim(),
                None => continue,
            };
            if src.is_empty() || src.starts_with("data:") {
                continue;
            }
            if let Ok(absolute) = base_url.join(src) {
                if seen.insert(absolute.to_string()) {
                    images.push(PageImage {
                        url: absolute.to_string(),
                        alt: element.value().attr("alt").unwrap_or("").trim().to_string(),
                    });
                }
            }
        }
    }

    images
}

/// Parses JSON-LD script blocks into structured-data records
fn extract_structured_data(document: &Html) -> Vec<serde_json::Value> {
    let mut records = Vec::new();

    if let Some(ld_sel) = sel("script[type='application/ld+json']") {
        for element in document.select(&ld_sel) {
            let raw = element.text().collect::<String>();
            if let Ok(value) = serde_json::from_str::<serde_json::Value>(&raw) {
                records.push(value);
            }
        }
    }

    records
}

/// Picks the most frequent non-stopword terms from headings and paragraphs
///
/// Ties break alphabetically so the result is deterministic.
fn semantic_keywords(headings: &[Heading], paragraphs: &[String]) -> Vec<String> {
    let options = TokenizerOptions::default();
    let mut freq: HashMap<String, usize> = HashMap::new();

    for heading in headings {
        for token in tokenize(&heading.text, &options) {
            *freq.entry(token).or_insert(0) += 1;
        }
    }
    for paragraph in paragraphs {
        for token in tokenize(paragraph, &options) {
            *freq.entry(token).or_insert(0) += 1;
        }
    }

    let mut terms: Vec<(String, usize)> = freq.into_iter().collect();
    terms.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    terms
        .into_iter()
        .take(MAX_SEMANTIC_KEYWORDS)
        .map(|(term, _)| term)
        .collect()
}

/// Builds the topic set: declared keywords, then semantic keywords, then
/// long heading words, deduplicated and capped
fn derive_topics(
    keywords: &[String],
    semantic_keywords: &[String],
    headings: &[Heading],
) -> Vec<String> {
    let mut topics: Vec<String> = Vec::new();
    let mut seen: HashSet<String> = HashSet::new();

    let mut push = |topic: String| {
        if topics.len() < MAX_TOPICS && !topic.is_empty() && seen.insert(topic.clone()) {
            topics.push(topic);
        }
    };

    for keyword in keywords {
        push(keyword.to_lowercase());
    }
    for keyword in semantic_keywords {
        push(keyword.clone());
    }
    for heading in headings {
        for word in heading.text.to_lowercase().split_whitespace() {
            let word: String = word.chars().filter(|c| c.is_alphanumeric()).collect();
            if word.len() > 5 && !is_stopword(&word) {
                push(word);
            }
        }
    }

    topics
}

fn truncate(text: &str, max_len: usize) -> String {
    if text.len() <= max_len {
        return text.to_string();
    }
    let mut end = max_len;
    while !text.is_char_boundary(end) {
        end -= 1;
    }
    text[..end].to_string()
}

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// A structured document produced by the extractor
///
/// Created once per successful crawl and immutable afterwards. The scheduler
/// fills in `quality_score` and `depth` before handing the document to the
/// content store and the search index.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PageDocument {
    /// Canonical (normalized) URL of the page
    pub url: String,

    /// Lowercase host of the page
    pub domain: String,

    /// Declared document language, if any
    pub language: Option<String>,

    pub title: String,
    pub description: String,
    pub author: Option<String>,
    pub publish_date: Option<DateTime<Utc>>,

    /// Keywords declared in page metadata
    pub keywords: Vec<String>,

    /// Headings in document order
    pub headings: Vec<Heading>,

    /// Body paragraphs longer than the boilerplate cutoff
    pub paragraphs: Vec<String>,

    /// Outbound links, deduplicated by absolute URL
    pub links: Vec<PageLink>,

    pub images: Vec<PageImage>,

    /// Raw `<meta>` name/property to content mapping
    pub metadata: HashMap<String, String>,

    /// JSON-LD records found in the page
    pub structured_data: Vec<serde_json::Value>,

    /// Words across title, description, headings, and paragraphs
    pub word_count: usize,

    /// Estimated reading time in minutes (200 words per minute)
    pub reading_time_minutes: u32,

    /// Ratio of paragraph text length to raw markup length
    pub content_density: f64,

    /// Most frequent non-stopword terms in the body
    pub semantic_keywords: Vec<String>,

    pub content_type: ContentType,

    /// Union of declared keywords, semantic keywords, and long heading
    /// words, capped at 15
    pub topics: Vec<String>,

    /// Heuristic quality rating in [0, 100], set by the scheduler
    pub quality_score: u8,

    /// Crawl depth this page was reached at, set by the scheduler
    pub depth: u32,
}

/// A heading with its level, in document order
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Heading {
    /// 1 for `<h1>` through 6 for `<h6>`
    pub level: u8,
    pub text: String,
}

/// An outbound link found on a page
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PageLink {
    /// Absolute URL
    pub url: String,

    /// Anchor text, trimmed
    pub anchor: String,

    /// Surrounding text, truncated
    pub context: String,

    /// Whether the link stays on the page's own host
    pub internal: bool,
}

/// An image reference found on a page
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PageImage {
    /// Absolute URL
    pub url: String,
    pub alt: String,
}

/// Coarse content classification used for search filtering and ranking
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentType {
    Article,
    Tutorial,
    Recipe,
    Product,
    Documentation,
    News,
    General,
}

impl ContentType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Article => "article",
            Self::Tutorial => "tutorial",
            Self::Recipe => "recipe",
            Self::Product => "product",
            Self::Documentation => "documentation",
            Self::News => "news",
            Self::General => "general",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "article" => Some(Self::Article),
            "tutorial" => Some(Self::Tutorial),
            "recipe" => Some(Self::Recipe),
            "product" => Some(Self::Product),
            "documentation" => Some(Self::Documentation),
            "news" => Some(Self::News),
            "general" => Some(Self::General),
            _ => None,
        }
    }
}

impl fmt::Display for ContentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl PageDocument {
    /// Concatenated text of every indexed field, used for phrase matching
    pub fn full_text(&self) -> String {
        let mut parts: Vec<&str> = Vec::with_capacity(2 + self.headings.len() + self.paragraphs.len());
        parts.push(&self.title);
        parts.push(&self.description);
        for heading in &self.headings {
            parts.push(&heading.text);
        }
        for paragraph in &self.paragraphs {
            parts.push(paragraph);
        }
        parts.join(" ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_content_type_roundtrip() {
        for ct in [
            ContentType::Article,
            ContentType::Tutorial,
            ContentType::Recipe,
            ContentType::Product,
            ContentType::Documentation,
            ContentType::News,
            ContentType::General,
        ] {
            assert_eq!(ContentType::parse(ct.as_str()), Some(ct));
        }
        assert_eq!(ContentType::parse("bogus"), None);
    }

    #[test]
    fn test_content_type_display() {
        assert_eq!(format!("{}", ContentType::Recipe), "recipe");
    }
}

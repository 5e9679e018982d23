//! Content-type classification
//!
//! Applies an ordered rule list: URL path patterns first, then content
//! vocabulary heuristics, then a structural fallback on heading count and
//! word count.

use crate::extract::document::ContentType;
use url::Url;

/// URL path fragments mapped to content types, checked in order
const PATH_RULES: &[(&str, ContentType)] = &[
    ("/recipe", ContentType::Recipe),
    ("/tutorial", ContentType::Tutorial),
    ("/how-to", ContentType::Tutorial),
    ("/docs", ContentType::Documentation),
    ("/documentation", ContentType::Documentation),
    ("/reference", ContentType::Documentation),
    ("/api/", ContentType::Documentation),
    ("/news", ContentType::News),
    ("/product", ContentType::Product),
    ("/shop", ContentType::Product),
    ("/store/", ContentType::Product),
    ("/blog", ContentType::Article),
    ("/article", ContentType::Article),
    ("/post", ContentType::Article),
];

/// Classifies a page's content type
///
/// # Arguments
///
/// * `url` - The page URL (path patterns are the strongest signal)
/// * `body_text` - Joined paragraph text for vocabulary heuristics
/// * `heading_count` - Number of extracted headings
/// * `word_count` - Derived word count
pub fn classify_content_type(
    url: &Url,
    body_text: &str,
    heading_count: usize,
    word_count: usize,
) -> ContentType {
    let path = url.path().to_lowercase();
    for (pattern, content_type) in PATH_RULES {
        if path.contains(pattern) {
            return *content_type;
        }
    }

    let lowered = body_text.to_lowercase();
    if lowered.contains("ingredients") && (lowered.contains("recipe") || lowered.contains("instructions")) {
        return ContentType::Recipe;
    }
    if lowered.contains("tutorial")
        || lowered.contains("step-by-step")
        || lowered.contains("step 1")
    {
        return ContentType::Tutorial;
    }

    // Structural fallback: substantial multi-section pages read like articles
    if heading_count >= 3 && word_count >= 500 {
        return ContentType::Article;
    }

    ContentType::General
}

#[cfg(test)]
mod tests {
    use super::*;

    fn url(path: &str) -> Url {
        Url::parse(&format!("https://example.com{}", path)).unwrap()
    }

    #[test]
    fn test_path_rules_win() {
        assert_eq!(
            classify_content_type(&url("/recipes/recipe/42"), "", 0, 0),
            ContentType::Recipe
        );
        assert_eq!(
            classify_content_type(&url("/docs/getting-started"), "", 0, 0),
            ContentType::Documentation
        );
        assert_eq!(
            classify_content_type(&url("/blog/2024/hello"), "", 0, 0),
            ContentType::Article
        );
        assert_eq!(
            classify_content_type(&url("/news/today"), "", 0, 0),
            ContentType::News
        );
    }

    #[test]
    fn test_recipe_vocabulary() {
        let body = "Gather the ingredients and follow the instructions closely.";
        assert_eq!(
            classify_content_type(&url("/pages/1"), body, 0, 50),
            ContentType::Recipe
        );
    }

    #[test]
    fn test_tutorial_vocabulary() {
        let body = "This tutorial walks through the setup.";
        assert_eq!(
            classify_content_type(&url("/pages/1"), body, 0, 50),
            ContentType::Tutorial
        );
    }

    #[test]
    fn test_structural_fallback_article() {
        assert_eq!(
            classify_content_type(&url("/pages/1"), "plain text", 4, 800),
            ContentType::Article
        );
    }

    #[test]
    fn test_default_general() {
        assert_eq!(
            classify_content_type(&url("/pages/1"), "plain text", 1, 100),
            ContentType::General
        );
    }

    #[test]
    fn test_path_beats_vocabulary() {
        let body = "Gather the ingredients and follow the recipe.";
        assert_eq!(
            classify_content_type(&url("/docs/cooking"), body, 0, 50),
            ContentType::Documentation
        );
    }
}

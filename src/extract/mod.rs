//! Content extraction module
//!
//! Turns fetched markup into a structured [`PageDocument`]: metadata fields
//! resolved through ordered candidate lists, headings and paragraphs with
//! noise regions stripped, annotated outbound links, and derived metrics
//! (word count, reading time, content density, semantic keywords, content
//! type, topics).

mod classify;
mod document;
mod extractor;

pub use classify::classify_content_type;
pub use document::{ContentType, Heading, PageDocument, PageImage, PageLink};
pub use extractor::extract;

use thiserror::Error;

/// Errors produced while extracting a document from markup
#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("markup was empty")]
    EmptyDocument,
}

//! Scoring module
//!
//! Two heuristic scorers shape what the crawler keeps and what it crawls
//! next: the quality scorer rates an extracted document on a 0-100 scale,
//! and the link prioritizer ranks a page's outbound links for frontier
//! insertion.

mod links;
mod quality;

pub use links::{prioritize_links, score_link, ScoredLink};
pub use quality::score_quality;

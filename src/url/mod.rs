//! URL handling module for scour
//!
//! Provides the canonical URL form used for frontier dedup, plus host
//! helpers used by the extractor and link prioritizer.

mod domain;
mod normalize;

pub use domain::{extract_domain, same_host};
pub use normalize::normalize_url;

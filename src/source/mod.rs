//! Source location handling for Sitemap-Harvest
//!
//! This module provides local/remote classification of sitemap and page
//! locations, resolution of child locations listed in sitemap indexes,
//! export filename derivation, and pre-run source validation.

mod filename;
mod location;
mod validate;

// Re-export main types and functions
pub use filename::export_stem;
pub use location::{classify_location, SourceKind, SourceLocation};
pub use validate::{validate_source, PROBE_TIMEOUT};

/// Builds source locations from raw strings, dropping blank entries
///
/// # Examples
///
/// ```
/// use sitemap_harvest::source::parse_sources;
///
/// let sources = parse_sources(&["https://a.com/sitemap.xml".to_string(), "  ".to_string()]);
/// assert_eq!(sources.len(), 1);
/// ```
pub fn parse_sources(raw: &[String]) -> Vec<SourceLocation> {
    raw.iter()
        .filter(|s| !s.trim().is_empty())
        .map(|s| SourceLocation::new(s.as_str()))
        .collect()
}

//! Sitemap parsing and resolution
//!
//! This module contains the sitemap side of the pipeline:
//! - Classifying a fetched XML document as index, leaf, or empty
//! - Recursively flattening sitemap indexes into a URL list per root
//! - Resolving many roots with per-source results and progress accounting
//!
//! Failures are never raised out of resolution. Each failing node becomes
//! one [`NodeError`] on the owning [`ResolutionResult`] and contributes no
//! URLs, so one broken nested sitemap never hides its siblings.

mod multi;
mod parser;
mod resolver;

pub use multi::MultiSourceResolver;
pub use parser::parse_sitemap;
pub use resolver::SitemapResolver;

use crate::source::SourceLocation;
use std::fmt;

/// A parsed sitemap document
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SitemapNode {
    /// A sitemap index listing nested sitemaps, in document order
    Index { children: Vec<SourceLocation> },
    /// A leaf sitemap listing page URLs, in document order
    Leaf { urls: Vec<String> },
    /// A well-formed document without any usable location
    Empty,
}

/// Category of a recovered node failure
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ErrorKind {
    /// The document could not be retrieved
    Fetch,
    /// The document is not well-formed XML
    Parse,
    /// The root document is well-formed but lists nothing
    NoUrlsFound,
    /// The index refers back to one of its own ancestors
    Cycle,
    /// The index nesting exceeds the configured depth
    DepthExceeded,
    /// A child reference that cannot be resolved to a fetchable location
    InvalidLocation,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Fetch => "fetch",
            Self::Parse => "parse",
            Self::NoUrlsFound => "no-urls",
            Self::Cycle => "cycle",
            Self::DepthExceeded => "depth-exceeded",
            Self::InvalidLocation => "invalid-location",
        };
        f.write_str(name)
    }
}

/// One failed node of a resolution
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NodeError {
    /// Location of the node that failed
    pub location: SourceLocation,
    pub kind: ErrorKind,
    /// Human-readable failure reason
    pub message: String,
}

impl NodeError {
    pub fn new(location: SourceLocation, kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            location,
            kind,
            message: message.into(),
        }
    }
}

/// Flattened output of resolving one root location
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolutionResult {
    pub root: SourceLocation,
    /// Page URLs from every reachable leaf sitemap, in traversal order
    pub urls: Vec<String>,
    /// One entry per failed node, in traversal order
    pub errors: Vec<NodeError>,
}

impl ResolutionResult {
    /// Creates an empty result for `root`
    pub fn new(root: SourceLocation) -> Self {
        Self {
            root,
            urls: Vec::new(),
            errors: Vec::new(),
        }
    }

    /// Returns true if at least one URL was found
    pub fn has_urls(&self) -> bool {
        !self.urls.is_empty()
    }
}

//! Sitemap-Harvest: sitemap resolution and page title enrichment
//!
//! This crate reads one or more sitemaps (local files or remote URLs),
//! flattens nested sitemap indexes into a URL list per source, and can
//! optionally fetch every page concurrently to record its title.

pub mod config;
pub mod crawler;
pub mod output;
pub mod progress;
pub mod sitemap;
pub mod source;

use std::time::Duration;
use thiserror::Error;

/// Main error type for Sitemap-Harvest operations
#[derive(Debug, Error)]
pub enum HarvestError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Source error: {0}")]
    Source(#[from] SourceError),

    #[error("Fetch error: {0}")]
    Fetch(#[from] FetchError),

    #[error("Sitemap parse error: {0}")]
    Parse(#[from] ParseError),

    #[error("Output error: {0}")]
    Output(#[from] output::OutputError),

    #[error("HTTP client error: {0}")]
    HttpClient(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("No URLs were found in any of the {count} source(s)")]
    AllSourcesFailed { count: usize },

    #[error("No sources to harvest")]
    NoSources,
}

/// Errors raised while retrieving a single document
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("HTTP request to {location} failed: {source}")]
    Http {
        location: String,
        source: reqwest::Error,
    },

    #[error("HTTP {status} from {location}")]
    Status { location: String, status: u16 },

    #[error("Timed out after {timeout:?} fetching {location}")]
    Timeout { location: String, timeout: Duration },

    #[error("File not found: {path}")]
    NotFound { path: String },

    #[error("Failed to read {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },
}

/// Errors raised while parsing a sitemap document
#[derive(Debug, Error)]
pub enum ParseError {
    #[error("Malformed XML: {0}")]
    Malformed(String),
}

/// Errors raised while validating a source location before a run
#[derive(Debug, Error)]
pub enum SourceError {
    #[error("Source location is empty")]
    Empty,

    #[error("Path does not exist: {0}")]
    NotFound(String),

    #[error("Not an XML file: {0}")]
    NotXml(String),

    #[error("Invalid URL {location}: {reason}")]
    InvalidUrl { location: String, reason: String },

    #[error("Cannot reach {location}: {reason}")]
    Unreachable { location: String, reason: String },
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Failed to serialize TOML: {0}")]
    Serialize(#[from] toml::ser::Error),

    #[error("Validation error: {0}")]
    Validation(String),
}

/// Result type alias for Sitemap-Harvest operations
pub type Result<T> = std::result::Result<T, HarvestError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

/// Result type alias for fetch operations
pub type FetchResult<T> = std::result::Result<T, FetchError>;

// Re-export commonly used types
pub use config::Config;
pub use crawler::{Harvester, PageTitle, TitleOutcome};
pub use output::{aggregate, AggregateReport};
pub use sitemap::{ResolutionResult, SitemapNode};
pub use source::{SourceKind, SourceLocation};

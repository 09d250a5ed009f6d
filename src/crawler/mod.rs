//! Crawler module for document fetching and page enrichment
//!
//! This module contains the network-facing side of the pipeline:
//! - Fetching sitemaps and pages from HTTP(S) or the local filesystem
//! - Extracting page titles from HTML
//! - Fetching many page titles with a bounded worker pool
//! - Coordinating a whole harvest run

mod coordinator;
mod enricher;
mod fetcher;
mod parser;

pub use coordinator::{Harvester, RunProgress};
pub use enricher::{fetch_title, PageTitle, TitleEnricher, TitleOutcome, NO_TITLE};
pub use fetcher::{build_http_client, Fetcher};
pub use parser::{decode_html, extract_title};

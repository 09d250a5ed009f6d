//! Output module for run reports and export files
//!
//! This module handles:
//! - Merging per-source results into one run report
//! - Writing URL lists and title tables per source
//! - Writing a markdown summary of the run
//! - Printing run statistics to the console

mod aggregate;
mod markdown;
pub mod stats;
mod text_export;
mod traits;

pub use aggregate::{aggregate, AggregateReport, SourceReport};
pub use markdown::{format_markdown_summary, generate_markdown_summary, MarkdownSummary};
pub use stats::{format_url_preview, print_statistics, URL_PREVIEW_LIMIT};
pub use text_export::TextExporter;
pub use traits::{export_report, OutputError, OutputHandler, OutputResult};

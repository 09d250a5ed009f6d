//! Output handler traits and errors
//!
//! Exporters receive the finished [`AggregateReport`] one source at a time
//! and then once more as a whole, so per-source files and run-wide
//! summaries share a single entry point.

use crate::output::aggregate::{AggregateReport, SourceReport};
use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur during output operations
#[derive(Debug, Error)]
pub enum OutputError {
    #[error("Failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to create output directory {path}: {source}")]
    CreateDir {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// Result type for output operations
pub type OutputResult<T> = Result<T, OutputError>;

/// Trait for export targets
pub trait OutputHandler {
    /// Writes whatever this handler keeps per source
    ///
    /// Returns the paths of the files written, which may be none.
    fn write_source(&self, source: &SourceReport) -> OutputResult<Vec<PathBuf>>;

    /// Writes run-wide output after every source has been handled
    fn finalize(&self, report: &AggregateReport) -> OutputResult<Vec<PathBuf>>;
}

/// Runs every handler over the report, sources first and then the whole run
///
/// Stops at the first failing write.
pub fn export_report(
    report: &AggregateReport,
    handlers: &[&dyn OutputHandler],
) -> OutputResult<Vec<PathBuf>> {
    let mut written = Vec::new();

    for source in &report.sources {
        for handler in handlers {
            written.extend(handler.write_source(source)?);
        }
    }
    for handler in handlers {
        written.extend(handler.finalize(report)?);
    }

    tracing::debug!("Wrote {} output files", written.len());
    Ok(written)
}

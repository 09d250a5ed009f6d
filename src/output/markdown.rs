//! Markdown run summary
//!
//! This module renders a human-readable markdown summary of a harvest run,
//! including per-source counts and every recovered node error.

use crate::output::aggregate::{AggregateReport, SourceReport};
use crate::output::traits::{OutputError, OutputHandler, OutputResult};
use std::fs;
use std::path::{Path, PathBuf};

/// Writes the markdown summary once the run is complete
#[derive(Debug, Clone)]
pub struct MarkdownSummary {
    path: PathBuf,
}

impl MarkdownSummary {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl OutputHandler for MarkdownSummary {
    fn write_source(&self, _source: &SourceReport) -> OutputResult<Vec<PathBuf>> {
        Ok(Vec::new())
    }

    fn finalize(&self, report: &AggregateReport) -> OutputResult<Vec<PathBuf>> {
        generate_markdown_summary(report, &self.path)?;
        Ok(vec![self.path.clone()])
    }
}

/// Writes a markdown summary of `report` to `output_path`
///
/// # Arguments
///
/// * `report` - The finished run report
/// * `output_path` - Path where the markdown file should be written
///
/// # Returns
///
/// * `Ok(())` - Successfully wrote markdown summary
/// * `Err(OutputError)` - Failed to write summary
pub fn generate_markdown_summary(report: &AggregateReport, output_path: &Path) -> OutputResult<()> {
    if let Some(parent) = output_path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|source| OutputError::CreateDir {
            path: parent.to_path_buf(),
            source,
        })?;
    }

    fs::write(output_path, format_markdown_summary(report)).map_err(|source| OutputError::Write {
        path: output_path.to_path_buf(),
        source,
    })
}

/// Formats a run report as markdown
pub fn format_markdown_summary(report: &AggregateReport) -> String {
    let mut md = String::new();

    md.push_str("# Sitemap Harvest Summary\n\n");

    md.push_str("## Run Information\n\n");
    if let Some(started) = report.started_at {
        md.push_str(&format!("- **Started**: {}\n", started.to_rfc3339()));
    }
    if let Some(finished) = report.finished_at {
        md.push_str(&format!("- **Finished**: {}\n", finished.to_rfc3339()));
    }
    if let Some(duration) = report.duration_seconds() {
        md.push_str(&format!("- **Duration**: {:.1} seconds\n", duration));
    }
    md.push_str(&format!("- **Sources**: {}\n\n", report.sources.len()));

    md.push_str("## Overall Statistics\n\n");
    md.push_str(&format!("- **Total URLs**: {}\n", report.total_urls));
    md.push_str(&format!("- **Node Errors**: {}\n", report.total_errors));
    md.push_str(&format!(
        "- **Sources Without URLs**: {}\n",
        report.failed_sources()
    ));
    if let Some(successes) = report.total_successes {
        md.push_str(&format!(
            "- **Titles Fetched**: {} / {} ({:.2}%)\n",
            successes,
            report.total_lookups(),
            report.success_rate()
        ));
    }
    md.push('\n');

    md.push_str("## Sources\n\n");
    md.push_str("| Source | URLs | Errors | Titles |\n");
    md.push_str("|--------|------|--------|--------|\n");
    for source in &report.sources {
        let titles = match &source.titles {
            Some(titles) => format!("{} / {}", source.title_successes(), titles.len()),
            None => "-".to_string(),
        };
        md.push_str(&format!(
            "| {} | {} | {} | {} |\n",
            escape_cell(source.root().as_str()),
            source.result.urls.len(),
            source.result.errors.len(),
            titles
        ));
    }
    md.push('\n');

    if report.total_errors > 0 {
        md.push_str("## Errors\n\n");
        for source in report.sources.iter().filter(|s| !s.result.errors.is_empty()) {
            md.push_str(&format!("### {}\n\n", source.root()));
            for error in &source.result.errors {
                md.push_str(&format!(
                    "- `{}` {}: {}\n",
                    error.kind, error.location, error.message
                ));
            }
            md.push('\n');
        }
    }

    md
}

fn escape_cell(value: &str) -> String {
    value.replace('|', "\\|")
}

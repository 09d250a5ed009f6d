//! Console statistics for a finished run
//!
//! This module prints per-source counts, a short preview of the URLs found,
//! and a note for every recovered error.

use crate::output::aggregate::AggregateReport;

/// Number of URLs shown per source before the preview is cut
pub const URL_PREVIEW_LIMIT: usize = 20;

/// Renders the first `limit` URLs, one per indented line
///
/// A trailing line tells how many more were left out.
pub fn format_url_preview(urls: &[String], limit: usize) -> String {
    let mut out = String::new();
    for url in urls.iter().take(limit) {
        out.push_str("  ");
        out.push_str(url);
        out.push('\n');
    }
    if urls.len() > limit {
        out.push_str(&format!("  ... and {} more\n", urls.len() - limit));
    }
    out
}

/// Prints run statistics to stdout in a formatted manner
///
/// # Arguments
///
/// * `report` - The finished run report
/// * `preview_limit` - Number of URLs listed per source
pub fn print_statistics(report: &AggregateReport, preview_limit: usize) {
    println!("=== Harvest Statistics ===\n");

    for source in &report.sources {
        println!("{}", source.root());
        println!("  URLs found: {}", source.result.urls.len());
        if !source.result.errors.is_empty() {
            println!("  Errors: {}", source.result.errors.len());
            for error in &source.result.errors {
                println!("    [{}] {}: {}", error.kind, error.location, error.message);
            }
        }
        if let Some(titles) = &source.titles {
            println!(
                "  Titles fetched: {} / {}",
                source.title_successes(),
                titles.len()
            );
        }
        if source.result.has_urls() {
            print!("{}", format_url_preview(&source.result.urls, preview_limit));
        }
        println!();
    }

    println!("Overview:");
    println!("  Sources: {}", report.sources.len());
    println!("  Sources without URLs: {}", report.failed_sources());
    println!("  Total URLs: {}", report.total_urls);
    println!("  Node errors: {}", report.total_errors);
    if let Some(successes) = report.total_successes {
        println!(
            "  Title success rate: {:.1}% ({} / {} pages)",
            report.success_rate(),
            successes,
            report.total_lookups()
        );
    }
    if let Some(duration) = report.duration_seconds() {
        println!("  Duration: {:.1}s", duration);
    }
}

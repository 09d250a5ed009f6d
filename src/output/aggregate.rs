//! Whole-run report assembly
//!
//! Merges the per-source resolution results and optional title outcomes
//! into one [`AggregateReport`] with overall counts.

use crate::crawler::TitleOutcome;
use crate::sitemap::ResolutionResult;
use crate::source::SourceLocation;
use chrono::{DateTime, Utc};

/// Everything collected for one root source
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceReport {
    pub result: ResolutionResult,
    /// Title outcomes, present only when enrichment ran for this source
    pub titles: Option<Vec<TitleOutcome>>,
}

impl SourceReport {
    pub fn root(&self) -> &SourceLocation {
        &self.result.root
    }

    /// Number of pages whose lookup did not fail
    pub fn title_successes(&self) -> usize {
        self.titles
            .as_ref()
            .map(|titles| titles.iter().filter(|o| !o.title.is_error()).count())
            .unwrap_or(0)
    }
}

/// Summary of one harvest run across every source
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AggregateReport {
    /// One entry per root, in input order
    pub sources: Vec<SourceReport>,
    pub total_urls: usize,
    /// Pages with a title or an explicit no-title; `None` without enrichment
    pub total_successes: Option<usize>,
    /// Node errors across every source
    pub total_errors: usize,
    pub started_at: Option<DateTime<Utc>>,
    pub finished_at: Option<DateTime<Utc>>,
}

impl AggregateReport {
    /// Looks up the report of one root
    pub fn get(&self, root: &SourceLocation) -> Option<&SourceReport> {
        self.sources.iter().find(|s| s.root() == root)
    }

    /// Number of roots that produced no URL at all
    pub fn failed_sources(&self) -> usize {
        self.sources.iter().filter(|s| !s.result.has_urls()).count()
    }

    /// True when there was at least one source and none produced a URL
    pub fn is_total_failure(&self) -> bool {
        !self.sources.is_empty() && self.failed_sources() == self.sources.len()
    }

    /// Total number of title lookups performed
    pub fn total_lookups(&self) -> usize {
        self.sources
            .iter()
            .filter_map(|s| s.titles.as_ref())
            .map(Vec::len)
            .sum()
    }

    /// Share of successful title lookups as a percentage
    pub fn success_rate(&self) -> f64 {
        let lookups = self.total_lookups();
        match self.total_successes {
            Some(successes) if lookups > 0 => (successes as f64 / lookups as f64) * 100.0,
            _ => 0.0,
        }
    }

    /// Wall-clock duration of the run, once both timestamps are known
    pub fn duration_seconds(&self) -> Option<f64> {
        match (self.started_at, self.finished_at) {
            (Some(started), Some(finished)) => {
                Some((finished - started).num_milliseconds() as f64 / 1000.0)
            }
            _ => None,
        }
    }
}

/// Merges resolution results and optional titles into one report
///
/// Source order follows `results`. Title lists are matched by position, so
/// `titles[i]` belongs to `results[i]` even when two roots are the same
/// location. Sources past the end of `titles` get no title list. Passing
/// `None` means no enrichment happened, and `total_successes` stays `None`.
pub fn aggregate(
    results: Vec<ResolutionResult>,
    titles: Option<Vec<Vec<TitleOutcome>>>,
) -> AggregateReport {
    let total_urls = results.iter().map(|r| r.urls.len()).sum();
    let total_errors = results.iter().map(|r| r.errors.len()).sum();

    let enriched = titles.is_some();
    let mut titles = titles.map(Vec::into_iter);

    let sources: Vec<SourceReport> = results
        .into_iter()
        .map(|result| {
            let source_titles = titles.as_mut().and_then(Iterator::next);
            SourceReport {
                result,
                titles: source_titles,
            }
        })
        .collect();

    let total_successes = enriched
        .then(|| sources.iter().map(SourceReport::title_successes).sum());

    AggregateReport {
        sources,
        total_urls,
        total_successes,
        total_errors,
        started_at: None,
        finished_at: None,
    }
}

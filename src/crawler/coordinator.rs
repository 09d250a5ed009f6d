//! Harvest coordinator - main run orchestration logic
//!
//! This module wires the pipeline stages together for one run:
//! - Resolving every root source concurrently
//! - Fetching page titles per source, when enabled
//! - Merging everything into one report with run timestamps

use crate::config::Config;
use crate::crawler::enricher::{TitleEnricher, TitleOutcome};
use crate::crawler::fetcher::{build_http_client, Fetcher};
use crate::output::{aggregate, AggregateReport};
use crate::progress::ProgressObserver;
use crate::sitemap::{MultiSourceResolver, ResolutionResult, SitemapResolver};
use crate::source::SourceLocation;
use crate::HarvestError;
use chrono::Utc;
use std::future::Future;
use std::sync::Arc;

/// Progress observers for the two stages of a run
#[derive(Clone, Copy)]
pub struct RunProgress<'a> {
    /// Told once per finished root source
    pub sources: &'a dyn ProgressObserver,
    /// Told once per page title, restarting for every source
    pub titles: &'a dyn ProgressObserver,
}

/// Main harvest coordinator structure
#[derive(Debug, Clone)]
pub struct Harvester {
    config: Arc<Config>,
    fetcher: Fetcher,
}

impl Harvester {
    /// Creates a new harvester, building the shared HTTP client
    ///
    /// # Arguments
    ///
    /// * `config` - The validated configuration
    ///
    /// # Returns
    ///
    /// * `Ok(Harvester)` - Ready to run
    /// * `Err(HarvestError)` - The HTTP client could not be built
    pub fn new(config: Config) -> Result<Self, HarvestError> {
        let client = build_http_client(&config.fetcher)?;

        Ok(Self {
            config: Arc::new(config),
            fetcher: Fetcher::new(client),
        })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn fetcher(&self) -> &Fetcher {
        &self.fetcher
    }

    /// Builds the multi-source resolver from the configuration
    pub fn resolver(&self) -> MultiSourceResolver {
        let resolver = SitemapResolver::new(
            self.fetcher.clone(),
            self.config.fetcher.timeout(),
            self.config.resolver.max_depth,
        );
        MultiSourceResolver::new(resolver, self.config.resolver.source_concurrency as usize)
    }

    /// Builds the title enricher from the configuration
    pub fn enricher(&self) -> TitleEnricher {
        TitleEnricher::new(
            self.fetcher.clone(),
            self.config.enricher.concurrency as usize,
            self.config.enricher.timeout(),
        )
    }

    /// Runs one harvest over `sources`
    ///
    /// Roots are resolved concurrently. When enrichment is enabled, titles
    /// are then fetched source by source in input order. The report keeps
    /// every source, including ones that produced nothing.
    ///
    /// # Returns
    ///
    /// * `Ok(AggregateReport)` - The run finished, possibly with node errors
    /// * `Err(HarvestError::NoSources)` - `sources` was empty
    pub async fn run(
        &self,
        sources: &[SourceLocation],
        progress: RunProgress<'_>,
    ) -> Result<AggregateReport, HarvestError> {
        if sources.is_empty() {
            return Err(HarvestError::NoSources);
        }

        let started_at = Utc::now();
        tracing::info!("Starting harvest of {} source(s)", sources.len());

        let results = self.resolver().resolve_all(sources, progress.sources).await;

        let titles = if self.config.enricher.enabled {
            Some(self.enrich_all(&results, progress.titles).await)
        } else {
            None
        };

        let mut report = aggregate(results, titles);
        report.started_at = Some(started_at);
        report.finished_at = Some(Utc::now());

        tracing::info!(
            "Harvest finished: {} URLs from {} source(s), {} node error(s)",
            report.total_urls,
            report.sources.len(),
            report.total_errors
        );

        Ok(report)
    }

    /// Runs one harvest unless `stop` resolves first
    ///
    /// Only the harvest itself races `stop`; whatever the caller does with
    /// the report afterwards is not interrupted by it.
    ///
    /// # Returns
    ///
    /// * `Ok(Some(report))` - The run finished before `stop`
    /// * `Ok(None)` - `stop` resolved first and the run was dropped
    /// * `Err(HarvestError)` - As for [`Harvester::run`]
    pub async fn run_until<F>(
        &self,
        sources: &[SourceLocation],
        progress: RunProgress<'_>,
        stop: F,
    ) -> Result<Option<AggregateReport>, HarvestError>
    where
        F: Future<Output = ()>,
    {
        tokio::select! {
            biased;
            _ = stop => {
                tracing::warn!("Harvest interrupted before it finished");
                Ok(None)
            }
            report = self.run(sources, progress) => report.map(Some),
        }
    }

    async fn enrich_all(
        &self,
        results: &[ResolutionResult],
        progress: &dyn ProgressObserver,
    ) -> Vec<Vec<TitleOutcome>> {
        let enricher = self.enricher();
        let mut titles = Vec::with_capacity(results.len());

        for result in results {
            if result.has_urls() {
                tracing::info!(
                    "Fetching titles for {} URLs from {}",
                    result.urls.len(),
                    result.root
                );
            }
            let outcomes = enricher.enrich(&result.urls, progress).await;
            titles.push(outcomes);
        }

        titles
    }
}

//! Concurrent page title enrichment
//!
//! A fixed pool of workers drains a closed work queue of page URLs. Each
//! worker fetches one page at a time, extracts its title, and sends the
//! outcome to a single collector over a channel. The collector reports
//! progress once per outcome and returns outcomes in completion order.
//!
//! A failed fetch never aborts the batch; it becomes a [`PageTitle::Error`]
//! outcome for that URL, so the number of outcomes always equals the number
//! of input URLs.

use crate::crawler::fetcher::Fetcher;
use crate::crawler::parser::{decode_html, extract_title};
use crate::progress::ProgressObserver;
use crate::source::SourceLocation;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{mpsc, Mutex};
use tokio::task::JoinSet;

/// Text written for pages without a usable `<title>`
pub const NO_TITLE: &str = "No title";

/// Reason recorded for page URLs that are not HTTP(S)
const NOT_HTTP: &str = "not an http(s) URL";

/// Title lookup result for one page
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageTitle {
    /// The trimmed content of the first `<title>` element
    Title(String),
    /// The page was fetched but has no title
    NoTitle,
    /// The page could not be fetched; carries the reason
    Error(String),
}

impl PageTitle {
    /// Returns true for failed lookups
    pub fn is_error(&self) -> bool {
        matches!(self, Self::Error(_))
    }
}

impl fmt::Display for PageTitle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Title(title) => f.write_str(title),
            Self::NoTitle => f.write_str(NO_TITLE),
            Self::Error(reason) => write!(f, "Error: {}", reason),
        }
    }
}

/// Title lookup outcome for one input URL
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TitleOutcome {
    pub url: String,
    pub title: PageTitle,
}

/// Fetches page titles with bounded concurrency
#[derive(Debug, Clone)]
pub struct TitleEnricher {
    fetcher: Fetcher,
    concurrency: usize,
    timeout: Duration,
}

impl TitleEnricher {
    /// Creates an enricher
    ///
    /// # Arguments
    ///
    /// * `fetcher` - Retrieves each page
    /// * `concurrency` - Maximum number of pages fetched at the same time
    /// * `timeout` - Bound on every single page fetch
    pub fn new(fetcher: Fetcher, concurrency: usize, timeout: Duration) -> Self {
        Self {
            fetcher,
            concurrency: concurrency.max(1),
            timeout,
        }
    }

    /// Looks up the title of every URL
    ///
    /// Returns exactly one outcome per input URL, in completion order.
    /// `progress` is told after each outcome, labelled with the page.
    pub async fn enrich(&self, urls: &[String], progress: &dyn ProgressObserver) -> Vec<TitleOutcome> {
        let total = urls.len();
        if total == 0 {
            return Vec::new();
        }

        let workers = self.concurrency.min(total);
        tracing::debug!("Fetching {} titles with {} workers", total, workers);

        // Fill the queue up front, then close it by dropping the sender
        let (work_tx, work_rx) = mpsc::unbounded_channel::<(usize, String)>();
        for (index, url) in urls.iter().enumerate() {
            if work_tx.send((index, url.clone())).is_err() {
                break;
            }
        }
        drop(work_tx);
        let work_rx = Arc::new(Mutex::new(work_rx));

        let (result_tx, mut result_rx) = mpsc::unbounded_channel::<(usize, TitleOutcome)>();

        let mut pool = JoinSet::new();
        for worker_id in 0..workers {
            pool.spawn(run_worker(
                worker_id,
                self.fetcher.clone(),
                self.timeout,
                Arc::clone(&work_rx),
                result_tx.clone(),
            ));
        }
        drop(result_tx);

        let mut reported = vec![false; total];
        let mut outcomes = Vec::with_capacity(total);

        while let Some((index, outcome)) = result_rx.recv().await {
            reported[index] = true;
            progress.on_progress(outcomes.len() + 1, total, &page_label(&outcome.url));
            outcomes.push(outcome);
        }

        while let Some(joined) = pool.join_next().await {
            if let Err(e) = joined {
                tracing::warn!("Title worker stopped unexpectedly: {}", e);
            }
        }

        // A worker that died mid-page never reported; keep the count whole
        for (index, url) in urls.iter().enumerate() {
            if !reported[index] {
                let outcome = TitleOutcome {
                    url: url.clone(),
                    title: PageTitle::Error("worker aborted".to_string()),
                };
                progress.on_progress(outcomes.len() + 1, total, &page_label(url));
                outcomes.push(outcome);
            }
        }

        let failures = outcomes.iter().filter(|o| o.title.is_error()).count();
        tracing::info!(
            "Fetched {} titles ({} failed)",
            outcomes.len() - failures,
            failures
        );

        outcomes
    }
}

async fn run_worker(
    worker_id: usize,
    fetcher: Fetcher,
    timeout: Duration,
    work_rx: Arc<Mutex<mpsc::UnboundedReceiver<(usize, String)>>>,
    result_tx: mpsc::UnboundedSender<(usize, TitleOutcome)>,
) {
    tracing::trace!("Title worker {} started", worker_id);

    loop {
        // The queue is closed before workers start, so recv never waits
        let next = work_rx.lock().await.recv().await;
        let Some((index, url)) = next else {
            break;
        };

        let title = fetch_title(&fetcher, &url, timeout).await;
        if result_tx.send((index, TitleOutcome { url, title })).is_err() {
            break;
        }
    }

    tracing::trace!("Title worker {} finished", worker_id);
}

/// Fetches one page and extracts its title
///
/// Pages are only ever retrieved over HTTP(S). A URL without an `http://`
/// or `https://` scheme is an error outcome and never touches the disk.
pub async fn fetch_title(fetcher: &Fetcher, url: &str, timeout: Duration) -> PageTitle {
    let location = SourceLocation::new(url);
    if !location.is_remote() {
        tracing::debug!("Not fetching title of non-HTTP location {}", url);
        return PageTitle::Error(NOT_HTTP.to_string());
    }

    match fetcher.fetch(&location, timeout).await {
        Ok(body) => match extract_title(&decode_html(&body)) {
            Some(title) => PageTitle::Title(title),
            None => PageTitle::NoTitle,
        },
        Err(e) => {
            tracing::debug!("Title lookup failed for {}: {}", url, e);
            PageTitle::Error(e.to_string())
        }
    }
}

fn page_label(url: &str) -> String {
    SourceLocation::new(url).label()
}

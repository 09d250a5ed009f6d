//! Document fetcher
//!
//! This module handles every retrieval the harvester makes, including:
//! - Building the HTTP client with the configured user agent
//! - GET requests for remote sitemaps and pages
//! - Whole-file reads for local sitemaps
//! - Bounding each retrieval by a timeout
//! - Error classification
//!
//! There is no retry logic: a failed fetch is reported once and the caller
//! decides what to do with it.

use crate::config::FetcherConfig;
use crate::source::{SourceKind, SourceLocation};
use crate::{FetchError, FetchResult};
use reqwest::Client;
use std::io::ErrorKind;
use std::time::Duration;

/// Upper bound on TCP connect time, independent of the overall timeout
const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// Builds an HTTP client with proper configuration
///
/// # Arguments
///
/// * `config` - The fetcher configuration
///
/// # Returns
///
/// * `Ok(Client)` - Successfully built HTTP client
/// * `Err(reqwest::Error)` - Failed to build client
///
/// # Example
///
/// ```no_run
/// use sitemap_harvest::config::FetcherConfig;
/// use sitemap_harvest::crawler::build_http_client;
///
/// let client = build_http_client(&FetcherConfig::default()).unwrap();
/// ```
pub fn build_http_client(config: &FetcherConfig) -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(config.user_agent.clone())
        .connect_timeout(CONNECT_TIMEOUT.min(config.timeout()))
        .gzip(true)
        .brotli(true)
        .build()
}

/// Retrieves raw document bytes from local or remote locations
///
/// Cloning is cheap; clones share the underlying connection pool.
#[derive(Debug, Clone)]
pub struct Fetcher {
    client: Client,
}

impl Fetcher {
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    /// Returns the HTTP client used for remote fetches
    pub fn client(&self) -> &Client {
        &self.client
    }

    /// Fetches the full contents of `location` within `timeout`
    ///
    /// # Fetch Rules
    ///
    /// | Condition | Result |
    /// |-----------|--------|
    /// | Remote, HTTP 2xx/3xx | Body bytes |
    /// | Remote, HTTP 4xx/5xx | `FetchError::Status` |
    /// | Remote, transport failure | `FetchError::Http` |
    /// | Local, file missing | `FetchError::NotFound` |
    /// | Local, unreadable | `FetchError::Io` |
    /// | Anything exceeding `timeout` | `FetchError::Timeout` |
    pub async fn fetch(&self, location: &SourceLocation, timeout: Duration) -> FetchResult<Vec<u8>> {
        tracing::debug!("Fetching {} (timeout {:?})", location, timeout);

        let work = async {
            match location.kind() {
                SourceKind::Remote => self.fetch_remote(location, timeout).await,
                SourceKind::Local => fetch_local(location).await,
            }
        };

        match tokio::time::timeout(timeout, work).await {
            Ok(result) => result,
            Err(_) => Err(FetchError::Timeout {
                location: location.to_string(),
                timeout,
            }),
        }
    }

    async fn fetch_remote(&self, location: &SourceLocation, timeout: Duration) -> FetchResult<Vec<u8>> {
        let classify = |e: reqwest::Error| {
            if e.is_timeout() {
                FetchError::Timeout {
                    location: location.to_string(),
                    timeout,
                }
            } else {
                FetchError::Http {
                    location: location.to_string(),
                    source: e,
                }
            }
        };

        let response = self
            .client
            .get(location.as_str())
            .timeout(timeout)
            .send()
            .await
            .map_err(classify)?;

        let status = response.status();
        if status.is_client_error() || status.is_server_error() {
            return Err(FetchError::Status {
                location: location.to_string(),
                status: status.as_u16(),
            });
        }

        let body = response.bytes().await.map_err(classify)?;
        Ok(body.to_vec())
    }
}

async fn fetch_local(location: &SourceLocation) -> FetchResult<Vec<u8>> {
    tokio::fs::read(location.as_str())
        .await
        .map_err(|e| match e.kind() {
            ErrorKind::NotFound => FetchError::NotFound {
                path: location.to_string(),
            },
            _ => FetchError::Io {
                path: location.to_string(),
                source: e,
            },
        })
}

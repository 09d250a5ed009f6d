use serde::Deserialize;
use std::time::Duration;

/// Main configuration structure for Sitemap-Harvest
///
/// Every section is optional in the TOML file; missing values fall back to
/// the defaults below.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Sitemap locations to harvest, in order
    pub sources: Vec<String>,
    pub fetcher: FetcherConfig,
    pub resolver: ResolverConfig,
    pub enricher: EnricherConfig,
    pub output: OutputConfig,
}

/// Network and file retrieval settings
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct FetcherConfig {
    /// Per-document timeout for sitemap fetches (seconds)
    #[serde(rename = "timeout-secs")]
    pub timeout_secs: u64,

    /// User-Agent header sent with every request
    #[serde(rename = "user-agent")]
    pub user_agent: String,
}

impl FetcherConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl Default for FetcherConfig {
    fn default() -> Self {
        Self {
            timeout_secs: 10,
            user_agent: "Mozilla/5.0".to_string(),
        }
    }
}

/// Sitemap index expansion settings
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ResolverConfig {
    /// Maximum nesting depth of sitemap indexes below a root
    #[serde(rename = "max-depth")]
    pub max_depth: u32,

    /// Number of root sources resolved at the same time
    #[serde(rename = "source-concurrency")]
    pub source_concurrency: u32,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            max_depth: 8,
            source_concurrency: 4,
        }
    }
}

/// Title enrichment settings
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct EnricherConfig {
    /// Whether page titles are fetched after resolution
    pub enabled: bool,

    /// Number of pages fetched at the same time
    pub concurrency: u32,

    /// Per-page timeout (seconds)
    #[serde(rename = "timeout-secs")]
    pub timeout_secs: u64,
}

impl EnricherConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl Default for EnricherConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            concurrency: 10,
            timeout_secs: 10,
        }
    }
}

/// Output configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Directory receiving the per-source export files
    pub directory: String,

    /// Name of the markdown run summary, written inside `directory`
    #[serde(rename = "summary-file")]
    pub summary_file: String,

    /// File remembering the last successfully harvested sources
    #[serde(rename = "history-path")]
    pub history_path: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            directory: "output".to_string(),
            summary_file: "summary.md".to_string(),
            history_path: "sitemap_sources.toml".to_string(),
        }
    }
}

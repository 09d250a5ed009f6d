//! Sitemap-Harvest main entry point
//!
//! This is the command-line interface for the sitemap harvester.

use anyhow::Context;
use clap::Parser;
use reqwest::Client;
use sitemap_harvest::config::{load_config_or_default, load_history, save_history, validate, Config};
use sitemap_harvest::crawler::{Harvester, RunProgress};
use sitemap_harvest::output::{
    export_report, print_statistics, MarkdownSummary, OutputHandler, TextExporter,
    URL_PREVIEW_LIMIT,
};
use sitemap_harvest::progress::BarProgress;
use sitemap_harvest::source::{parse_sources, validate_source};
use sitemap_harvest::{HarvestError, SourceLocation};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing_subscriber::EnvFilter;

/// Exit status for runs stopped with Ctrl-C
const EXIT_INTERRUPTED: u8 = 130;

/// How a harvest ended when it did not fail
enum RunStatus {
    Completed,
    Interrupted,
}

/// Sitemap-Harvest: flatten sitemaps into URL lists
///
/// Reads sitemaps from local files or URLs, expands nested sitemap indexes,
/// and writes one URL list per source. With --titles every page is fetched
/// to record its title.
#[derive(Parser, Debug)]
#[command(name = "sitemap-harvest")]
#[command(version = "1.0.0")]
#[command(about = "Flatten sitemaps into URL lists and page titles", long_about = None)]
struct Cli {
    /// Sitemap files or URLs to harvest
    #[arg(value_name = "SOURCES")]
    sources: Vec<String>,

    /// Path to TOML configuration file
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Fetch the title of every page found
    #[arg(short, long)]
    titles: bool,

    /// Number of pages fetched at the same time
    #[arg(long, value_name = "N")]
    concurrency: Option<u32>,

    /// Timeout for every fetch, in seconds
    #[arg(long, value_name = "SECS")]
    timeout: Option<u64>,

    /// Directory receiving the export files
    #[arg(short, long, value_name = "DIR")]
    output_dir: Option<PathBuf>,

    /// Do not remember the sources for the next run
    #[arg(long)]
    no_save: bool,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose, cli.quiet);

    match handle_harvest(cli).await {
        Ok(RunStatus::Completed) => ExitCode::SUCCESS,
        Ok(RunStatus::Interrupted) => {
            eprintln!("\nOperation cancelled, nothing was exported");
            ExitCode::from(EXIT_INTERRUPTED)
        }
        Err(e) => {
            tracing::error!("{:#}", e);
            ExitCode::FAILURE
        }
    }
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        // Only show errors
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("sitemap_harvest=info,warn"),
            1 => EnvFilter::new("sitemap_harvest=debug,info"),
            2 => EnvFilter::new("sitemap_harvest=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_writer(std::io::stderr)
        .init();
}

/// Resolves once Ctrl-C is pressed
///
/// If the signal handler cannot be installed the run simply cannot be
/// interrupted, so this never resolves.
async fn wait_for_interrupt() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!("Cannot listen for Ctrl-C: {}", e);
        std::future::pending::<()>().await;
    }
}

/// Applies command-line flags on top of the file configuration
fn apply_overrides(config: &mut Config, cli: &Cli) {
    if cli.titles {
        config.enricher.enabled = true;
    }
    if let Some(concurrency) = cli.concurrency {
        config.enricher.concurrency = concurrency;
    }
    if let Some(secs) = cli.timeout {
        config.fetcher.timeout_secs = secs;
        config.enricher.timeout_secs = secs;
    }
    if let Some(dir) = &cli.output_dir {
        config.output.directory = dir.to_string_lossy().into_owned();
    }
}

/// Handles the main harvest operation
async fn handle_harvest(cli: Cli) -> anyhow::Result<RunStatus> {
    let mut config = load_config_or_default(cli.config.as_deref())
        .context("Failed to load configuration")?;
    apply_overrides(&mut config, &cli);
    validate(&config).context("Invalid configuration")?;

    let harvester = Harvester::new(config.clone())?;
    let sources = collect_sources(&cli, &config, harvester.fetcher().client()).await?;

    tracing::info!(
        "Harvesting {} source(s), titles {}",
        sources.len(),
        if config.enricher.enabled { "on" } else { "off" }
    );

    let (source_bar, title_bar) = if cli.quiet {
        (BarProgress::hidden(), BarProgress::hidden())
    } else {
        (BarProgress::new("Sitemaps"), BarProgress::new("Titles"))
    };

    // Ctrl-C only cancels the harvest; once a report exists it is exported
    let outcome = harvester
        .run_until(
            &sources,
            RunProgress {
                sources: &source_bar,
                titles: &title_bar,
            },
            wait_for_interrupt(),
        )
        .await?;
    source_bar.finish();
    title_bar.finish();

    let Some(report) = outcome else {
        return Ok(RunStatus::Interrupted);
    };

    if !cli.quiet {
        print_statistics(&report, URL_PREVIEW_LIMIT);
    }

    let directory = Path::new(&config.output.directory);
    let text = TextExporter::new(directory);
    let summary = MarkdownSummary::new(directory.join(&config.output.summary_file));
    let handlers: [&dyn OutputHandler; 2] = [&text, &summary];
    let written = export_report(&report, &handlers)?;
    tracing::info!(
        "Wrote {} file(s) to {}",
        written.len(),
        directory.display()
    );

    if report.is_total_failure() {
        return Err(HarvestError::AllSourcesFailed {
            count: report.sources.len(),
        }
        .into());
    }

    if !cli.no_save {
        let raw: Vec<String> = sources.iter().map(|s| s.to_string()).collect();
        if let Err(e) = save_history(Path::new(&config.output.history_path), &raw) {
            tracing::warn!("Could not save sources (this run is unaffected): {}", e);
        }
    }

    Ok(RunStatus::Completed)
}

/// Picks the sources for this run
///
/// The first non-empty origin wins: command line, config file, saved
/// history, then an interactive prompt. Every candidate is validated and
/// invalid ones are skipped with a warning.
async fn collect_sources(
    cli: &Cli,
    config: &Config,
    client: &Client,
) -> anyhow::Result<Vec<SourceLocation>> {
    if !cli.sources.is_empty() {
        return require_some(validate_all(client, parse_sources(&cli.sources)).await);
    }

    if !config.sources.is_empty() {
        return require_some(validate_all(client, parse_sources(&config.sources)).await);
    }

    match load_history(Path::new(&config.output.history_path)) {
        Ok(Some(saved)) => {
            let valid = validate_all(client, parse_sources(&saved)).await;
            if !valid.is_empty() {
                tracing::info!("Using {} saved source(s)", valid.len());
                return Ok(valid);
            }
        }
        Ok(None) => {}
        Err(e) => tracing::warn!("Ignoring saved sources: {}", e),
    }

    prompt_for_sources(client).await
}

fn require_some(sources: Vec<SourceLocation>) -> anyhow::Result<Vec<SourceLocation>> {
    if sources.is_empty() {
        return Err(HarvestError::NoSources.into());
    }
    Ok(sources)
}

async fn validate_all(client: &Client, sources: Vec<SourceLocation>) -> Vec<SourceLocation> {
    let mut valid = Vec::with_capacity(sources.len());
    for source in sources {
        match validate_source(client, &source).await {
            Ok(()) => valid.push(source),
            Err(e) => tracing::warn!("Skipping source: {}", e),
        }
    }
    valid
}

/// Asks on stdin until at least one valid source is entered
///
/// Several sources may be given on one line, separated by whitespace or
/// commas. End of input aborts with `NoSources`.
async fn prompt_for_sources(client: &Client) -> anyhow::Result<Vec<SourceLocation>> {
    println!("\n=== Please provide a sitemap ===");
    println!("Accepted:");
    println!("1. A local file path (e.g. ./sitemap.xml)");
    println!("2. A URL (e.g. https://example.com/sitemap.xml)");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    loop {
        print!("Sitemap path: ");
        std::io::stdout().flush()?;

        let Some(line) = lines.next_line().await? else {
            return Err(HarvestError::NoSources.into());
        };

        let raw: Vec<String> = line
            .split(|c: char| c.is_whitespace() || c == ',')
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect();

        let valid = validate_all(client, parse_sources(&raw)).await;
        if !valid.is_empty() {
            return Ok(valid);
        }
        println!("No usable source, please try again");
    }
}

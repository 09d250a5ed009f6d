//! Configuration module for Sitemap-Harvest
//!
//! This module handles loading, parsing, and validating TOML configuration
//! files, plus the saved-sources history shared between runs.
//!
//! # Example
//!
//! ```no_run
//! use sitemap_harvest::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("harvest.toml")).unwrap();
//! println!("Will resolve {} sources", config.sources.len());
//! ```

mod history;
mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{Config, EnricherConfig, FetcherConfig, OutputConfig, ResolverConfig};

// Re-export parser functions
pub use history::{load_history, save_history};
pub use parser::{load_config, load_config_or_default, parse_config};
pub use validation::validate;

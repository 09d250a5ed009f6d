use crate::config::types::{Config, EnricherConfig, FetcherConfig, OutputConfig, ResolverConfig};
use crate::ConfigError;

const MAX_TIMEOUT_SECS: u64 = 300;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_fetcher_config(&config.fetcher)?;
    validate_resolver_config(&config.resolver)?;
    validate_enricher_config(&config.enricher)?;
    validate_output_config(&config.output)?;
    Ok(())
}

fn validate_fetcher_config(config: &FetcherConfig) -> Result<(), ConfigError> {
    validate_timeout("fetcher.timeout_secs", config.timeout_secs)?;

    if config.user_agent.trim().is_empty() {
        return Err(ConfigError::Validation(
            "user_agent cannot be empty".to_string(),
        ));
    }

    Ok(())
}

fn validate_resolver_config(config: &ResolverConfig) -> Result<(), ConfigError> {
    if config.max_depth < 1 || config.max_depth > 32 {
        return Err(ConfigError::Validation(format!(
            "max_depth must be between 1 and 32, got {}",
            config.max_depth
        )));
    }

    if config.source_concurrency < 1 || config.source_concurrency > 32 {
        return Err(ConfigError::Validation(format!(
            "source_concurrency must be between 1 and 32, got {}",
            config.source_concurrency
        )));
    }

    Ok(())
}

fn validate_enricher_config(config: &EnricherConfig) -> Result<(), ConfigError> {
    if config.concurrency < 1 || config.concurrency > 100 {
        return Err(ConfigError::Validation(format!(
            "enricher concurrency must be between 1 and 100, got {}",
            config.concurrency
        )));
    }

    validate_timeout("enricher.timeout_secs", config.timeout_secs)
}

fn validate_output_config(config: &OutputConfig) -> Result<(), ConfigError> {
    if config.directory.trim().is_empty() {
        return Err(ConfigError::Validation(
            "output directory cannot be empty".to_string(),
        ));
    }

    if config.summary_file.trim().is_empty() {
        return Err(ConfigError::Validation(
            "summary_file cannot be empty".to_string(),
        ));
    }

    if config.history_path.trim().is_empty() {
        return Err(ConfigError::Validation(
            "history_path cannot be empty".to_string(),
        ));
    }

    Ok(())
}

fn validate_timeout(name: &str, secs: u64) -> Result<(), ConfigError> {
    if secs < 1 || secs > MAX_TIMEOUT_SECS {
        return Err(ConfigError::Validation(format!(
            "{} must be between 1 and {}, got {}",
            name, MAX_TIMEOUT_SECS, secs
        )));
    }
    Ok(())
}

//! Saved source history
//!
//! Remembers the source list of the last successful run so the next run can
//! start without arguments.

use crate::ConfigError;
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Default, Serialize, Deserialize)]
struct SavedSources {
    #[serde(default)]
    sources: Vec<String>,
}

/// Loads the saved source list
///
/// Returns `Ok(None)` when no history file exists yet or it lists no sources.
pub fn load_history(path: &Path) -> Result<Option<Vec<String>>, ConfigError> {
    if !path.exists() {
        return Ok(None);
    }

    let content = std::fs::read_to_string(path)?;
    let saved: SavedSources = toml::from_str(&content)?;

    if saved.sources.is_empty() {
        Ok(None)
    } else {
        Ok(Some(saved.sources))
    }
}

/// Writes the source list, replacing any previous history
pub fn save_history(path: &Path, sources: &[String]) -> Result<(), ConfigError> {
    let saved = SavedSources {
        sources: sources.to_vec(),
    };
    let content = toml::to_string(&saved)?;

    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    std::fs::write(path, content)?;

    Ok(())
}

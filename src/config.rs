use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

use crate::constants;
use crate::error::{PrepError, Result};

/// Runtime settings for a cleaning run.
///
/// Every field has a default matching the fixed constants, so an empty (or
/// absent) config file reproduces the stock behavior.
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct PipelineConfig {
    /// Raw track CSV to read
    pub input_path: PathBuf,
    /// Cleaned CSV to write (overwritten)
    pub output_path: PathBuf,
    /// Genre column aliases in priority order
    pub genre_columns: Vec<String>,
    /// Number of most frequent genres to keep
    pub top_genres: usize,
    /// Optional JSON run report
    pub report_path: Option<PathBuf>,
    /// Optional Prometheus exposition dump
    pub metrics_path: Option<PathBuf>,
    /// Directory for rolling log files
    pub log_dir: PathBuf,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            input_path: PathBuf::from(constants::DEFAULT_INPUT_PATH),
            output_path: PathBuf::from(constants::DEFAULT_OUTPUT_PATH),
            genre_columns: constants::default_genre_columns(),
            top_genres: constants::DEFAULT_TOP_GENRES,
            report_path: None,
            metrics_path: None,
            log_dir: PathBuf::from(constants::DEFAULT_LOG_DIR),
        }
    }
}

impl PipelineConfig {
    /// Load from a TOML file, or fall back to defaults when no path is given
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let config = match path {
            Some(path) => {
                let content = fs::read_to_string(path).map_err(|e| {
                    PrepError::Config(format!(
                        "Failed to read config file '{}': {}",
                        path.display(),
                        e
                    ))
                })?;
                Self::from_toml_str(&content)?
            }
            None => Self::default(),
        };
        config.validate()?;
        Ok(config)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: PipelineConfig = toml::from_str(content)?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.genre_columns.iter().all(|c| c.trim().is_empty()) {
            return Err(PrepError::Config(
                "genre_columns must name at least one column".to_string(),
            ));
        }
        if self.top_genres == 0 {
            return Err(PrepError::Config(
                "top_genres must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

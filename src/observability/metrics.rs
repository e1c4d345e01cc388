//! Simple metrics module for the cleaning pipeline
//!
//! This module provides a straightforward API for recording metrics using
//! the standard Prometheus naming conventions. Without an installed recorder
//! (library use, tests) every call is a no-op.

use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use once_cell::sync::OnceCell;
use std::fmt;
use std::fs;
use std::path::Path;

use crate::error::{PrepError, Result};

static METRICS_HANDLE: OnceCell<PrometheusHandle> = OnceCell::new();

/// Enum representing all metric names used in the system
/// This eliminates magic strings and provides compile-time safety
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MetricName {
    // Ingestion
    RowsRead,

    // Normalization
    RowsRejected,
    RecordsAccepted,

    // Genre reduction
    GenresRetained,

    // Output
    RowsWritten,
    RunDuration,
}

impl fmt::Display for MetricName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl MetricName {
    pub fn as_str(&self) -> &'static str {
        match self {
            MetricName::RowsRead => "spotify_prep_rows_read_total",
            MetricName::RowsRejected => "spotify_prep_rows_rejected_total",
            MetricName::RecordsAccepted => "spotify_prep_records_accepted_total",
            MetricName::GenresRetained => "spotify_prep_genres_retained",
            MetricName::RowsWritten => "spotify_prep_rows_written_total",
            MetricName::RunDuration => "spotify_prep_run_duration_seconds",
        }
    }

    pub fn all_metrics() -> impl Iterator<Item = MetricName> {
        use MetricName::*;
        [
            RowsRead,
            RowsRejected,
            RecordsAccepted,
            GenresRetained,
            RowsWritten,
            RunDuration,
        ]
        .into_iter()
    }
}

/// Install the Prometheus recorder. Calling it twice is an error.
pub fn init() -> Result<()> {
    let handle = PrometheusBuilder::new()
        .install_recorder()
        .map_err(|e| PrepError::Config(format!("Failed to install Prometheus recorder: {}", e)))?;
    METRICS_HANDLE
        .set(handle)
        .map_err(|_| PrepError::Config("Prometheus recorder already installed".to_string()))?;
    Ok(())
}

/// Render the current exposition text, if a recorder is installed
pub fn render() -> Option<String> {
    METRICS_HANDLE.get().map(|handle| handle.render())
}

/// Write the exposition text to `path`; does nothing without a recorder
pub fn write_to(path: &Path) -> Result<bool> {
    match render() {
        Some(text) => {
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                fs::create_dir_all(parent)?;
            }
            fs::write(path, text)?;
            Ok(true)
        }
        None => Ok(false),
    }
}

pub mod ingestion {
    use super::MetricName;

    pub fn rows_read(count: u64) {
        ::metrics::counter!(MetricName::RowsRead.as_str()).increment(count);
    }
}

pub mod normalize {
    use super::MetricName;

    /// Record a rejected row, labelled with why it was dropped
    pub fn row_rejected(reason: &'static str) {
        ::metrics::counter!(MetricName::RowsRejected.as_str(), "reason" => reason).increment(1);
    }

    pub fn records_accepted(count: u64) {
        ::metrics::counter!(MetricName::RecordsAccepted.as_str()).increment(count);
    }
}

pub mod genre_filter {
    use super::MetricName;

    pub fn genres_retained(count: usize) {
        ::metrics::gauge!(MetricName::GenresRetained.as_str()).set(count as f64);
    }
}

pub mod output {
    use super::MetricName;

    pub fn rows_written(count: u64) {
        ::metrics::counter!(MetricName::RowsWritten.as_str()).increment(count);
    }

    pub fn run_duration(seconds: f64) {
        ::metrics::histogram!(MetricName::RunDuration.as_str()).record(seconds);
    }
}

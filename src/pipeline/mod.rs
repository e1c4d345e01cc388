// Cleaning pipeline: ingestion, per-record processing, genre reduction, and output

pub mod ingestion;
pub mod output;
pub mod processing;

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::BTreeMap;
use std::fs;
use std::io::Read;
use std::path::PathBuf;
use std::time::Instant;
use tracing::{debug, info, instrument};

use crate::config::PipelineConfig;
use crate::domain::CleanRecord;
use crate::error::Result;
use crate::observability::metrics;
use ingestion::{RawRow, RowRead, TrackSource};
use processing::{resolve_genre_column, retain_top_genres, GenreCount, RejectReason, TrackNormalizer};

/// Records that survived every per-record check, before genre reduction
#[derive(Debug, Clone, Default)]
pub struct NormalizedBatch {
    pub genre_column: String,
    pub rows_read: usize,
    pub records: Vec<CleanRecord>,
    pub rejected: BTreeMap<RejectReason, usize>,
}

/// Final records plus everything the run report needs
#[derive(Debug, Clone)]
pub struct CleanedDataset {
    pub genre_column: String,
    pub rows_read: usize,
    pub records_accepted: usize,
    pub rejected: BTreeMap<RejectReason, usize>,
    pub top_genres: Vec<GenreCount>,
    pub records: Vec<CleanRecord>,
}

/// Result of a complete pipeline run
#[derive(Debug, Clone, Serialize)]
pub struct PipelineResult {
    pub input_path: PathBuf,
    pub output_path: PathBuf,
    pub genre_column: String,
    pub rows_read: usize,
    pub records_accepted: usize,
    pub rows_written: usize,
    pub rejected: BTreeMap<RejectReason, usize>,
    pub top_genres: Vec<GenreCount>,
    pub output_sha256: String,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
}

impl PipelineResult {
    pub fn total_rejected(&self) -> usize {
        self.rejected.values().sum()
    }
}

pub struct Pipeline {
    config: PipelineConfig,
}

impl Pipeline {
    pub fn new(config: PipelineConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Resolve the genre column, then validate and dedup every row.
    ///
    /// Fails only when no genre column exists or the input cannot be read.
    pub fn normalize_rows<R: Read>(&self, source: &mut TrackSource<R>) -> Result<NormalizedBatch> {
        let genre_column = resolve_genre_column(&self.config.genre_columns, source.columns())?;
        info!(genre_column = %genre_column, "Resolved genre column");

        let mut normalizer = TrackNormalizer::new(genre_column.clone());
        let mut batch = NormalizedBatch {
            genre_column,
            ..NormalizedBatch::default()
        };

        while let Some(read) = source.next_row()? {
            batch.rows_read += 1;
            let outcome = match read {
                RowRead::Row(record) => normalizer.normalize(&RawRow::new(source.columns(), &record)),
                RowRead::Malformed(e) => {
                    debug!("Skipping undecodable row: {}", e);
                    Err(RejectReason::MalformedRow)
                }
            };
            match outcome {
                Ok(record) => batch.records.push(record),
                Err(reason) => {
                    metrics::normalize::row_rejected(reason.as_str());
                    *batch.rejected.entry(reason).or_insert(0) += 1;
                }
            }
        }

        metrics::ingestion::rows_read(batch.rows_read as u64);
        metrics::normalize::records_accepted(batch.records.len() as u64);
        debug!(
            rows_read = batch.rows_read,
            accepted = batch.records.len(),
            distinct_ids = normalizer.seen_count(),
            "Normalization finished"
        );
        Ok(batch)
    }

    /// Full in-memory transform: normalize every row, then keep the most
    /// frequent genres
    pub fn clean<R: Read>(&self, input: R) -> Result<CleanedDataset> {
        let mut source = TrackSource::from_reader(input)?;
        let batch = self.normalize_rows(&mut source)?;
        Ok(self.reduce(batch))
    }

    fn reduce(&self, batch: NormalizedBatch) -> CleanedDataset {
        let records_accepted = batch.records.len();
        let (records, top_genres) = retain_top_genres(batch.records, self.config.top_genres);
        metrics::genre_filter::genres_retained(top_genres.len());
        info!(
            accepted = records_accepted,
            retained = records.len(),
            genres = top_genres.len(),
            "Applied genre frequency filter"
        );

        CleanedDataset {
            genre_column: batch.genre_column,
            rows_read: batch.rows_read,
            records_accepted,
            rejected: batch.rejected,
            top_genres,
            records,
        }
    }

    /// Run the complete pipeline: read the input file, write the cleaned file,
    /// and (if configured) the JSON run report.
    ///
    /// The output is only touched after every record has been processed.
    #[instrument(skip(self), fields(input = %self.config.input_path.display()))]
    pub fn run(&self) -> Result<PipelineResult> {
        let started_at = Utc::now();
        let timer = Instant::now();
        info!("Starting cleaning run");

        let mut source = TrackSource::open(&self.config.input_path)?;
        let batch = self.normalize_rows(&mut source)?;
        drop(source);
        let dataset = self.reduce(batch);

        let summary = output::write_csv_file(&self.config.output_path, &dataset.records)?;
        metrics::output::rows_written(summary.rows_written as u64);

        let result = PipelineResult {
            input_path: self.config.input_path.clone(),
            output_path: self.config.output_path.clone(),
            genre_column: dataset.genre_column,
            rows_read: dataset.rows_read,
            records_accepted: dataset.records_accepted,
            rows_written: summary.rows_written,
            rejected: dataset.rejected,
            top_genres: dataset.top_genres,
            output_sha256: summary.sha256,
            started_at,
            finished_at: Utc::now(),
        };

        if let Some(report_path) = &self.config.report_path {
            write_report(report_path, &result)?;
            debug!("Wrote run report to {}", report_path.display());
        }

        metrics::output::run_duration(timer.elapsed().as_secs_f64());
        info!(
            rows_read = result.rows_read,
            rows_written = result.rows_written,
            rejected = result.total_rejected(),
            "Cleaning run finished"
        );
        Ok(result)
    }
}

fn write_report(path: &std::path::Path, result: &PipelineResult) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, serde_json::to_string_pretty(result)?)?;
    Ok(())
}

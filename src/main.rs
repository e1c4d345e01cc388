use anyhow::Context;
use clap::Parser;
use std::path::PathBuf;
use tracing::{error, info, warn};

use spotify_prep::config::PipelineConfig;
use spotify_prep::observability;
use spotify_prep::{logging, Pipeline};

#[derive(Parser)]
#[command(name = "spotify_prep")]
#[command(about = "Clean raw Spotify track data into a dashboard-ready CSV")]
#[command(version = "0.1.0")]
struct Cli {
    /// TOML config file; defaults apply when omitted
    #[arg(long)]
    config: Option<PathBuf>,
    /// Raw track CSV (default: data/spotify_songs.csv)
    #[arg(long)]
    input: Option<PathBuf>,
    /// Cleaned CSV to write (default: data/spotify_clean.csv)
    #[arg(long)]
    output: Option<PathBuf>,
    /// Number of most frequent genres to keep (default: 10)
    #[arg(long)]
    top_genres: Option<usize>,
    /// Write a JSON run report here
    #[arg(long)]
    report: Option<PathBuf>,
    /// Write Prometheus metrics text here at the end of the run
    #[arg(long)]
    metrics_out: Option<PathBuf>,
}

impl Cli {
    fn into_config(self) -> anyhow::Result<PipelineConfig> {
        let mut config = PipelineConfig::load(self.config.as_deref())?;
        if let Some(input) = self.input {
            config.input_path = input;
        }
        if let Some(output) = self.output {
            config.output_path = output;
        }
        if let Some(top_genres) = self.top_genres {
            config.top_genres = top_genres;
        }
        if self.report.is_some() {
            config.report_path = self.report;
        }
        if self.metrics_out.is_some() {
            config.metrics_path = self.metrics_out;
        }
        config.validate()?;
        Ok(config)
    }
}

fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();
    let config = Cli::parse().into_config()?;

    // Keep the guard alive so file logs are flushed on exit
    let _log_guard = logging::init_logging(&config.log_dir);

    if config.metrics_path.is_some() {
        if let Err(e) = observability::init() {
            warn!("Metrics disabled: {}", e);
        }
    }

    let pipeline = Pipeline::new(config.clone());
    let result = match pipeline.run() {
        Ok(result) => result,
        Err(e) => {
            error!("Cleaning run failed: {}", e);
            return Err(e).context("cleaning run failed");
        }
    };

    if let Some(metrics_path) = &config.metrics_path {
        observability::write_to(metrics_path)
            .with_context(|| format!("writing metrics to {}", metrics_path.display()))?;
    }

    info!(genres = ?result.top_genres.iter().map(|g| g.genre.as_str()).collect::<Vec<_>>(), "Retained genres");
    println!("Wrote {} rows to {}", result.rows_written, result.output_path.display());
    Ok(())
}

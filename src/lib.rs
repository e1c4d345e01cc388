pub mod config;
pub mod constants;
pub mod domain;
pub mod error;
pub mod logging;
pub mod observability;
pub mod pipeline;

pub use config::PipelineConfig;
pub use domain::CleanRecord;
pub use error::{PrepError, Result};
pub use pipeline::{Pipeline, PipelineResult};

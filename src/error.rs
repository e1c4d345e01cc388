use thiserror::Error;

#[derive(Error, Debug)]
pub enum PrepError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("TOML deserialization failed: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("JSON serialization failed: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Could not find genre column (tried {candidates:?}). Available columns: {available:?}")]
    GenreColumnNotFound {
        candidates: Vec<String>,
        available: Vec<String>,
    },
}

pub type Result<T> = std::result::Result<T, PrepError>;

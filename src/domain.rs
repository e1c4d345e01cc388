use serde::{Deserialize, Serialize};

/// A validated track ready for the cleaned dataset.
///
/// Field order here is the output column order; the serializer relies on it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CleanRecord {
    /// Track identifier (dedup key, never empty)
    pub id: String,
    pub track_name: String,
    pub track_artist: String,
    /// Never empty
    pub genre: String,
    /// Release year within [1900, 2100]
    pub year: i32,
    pub popularity: i64,
    pub danceability: Option<f64>,
    /// Mandatory audio feature
    pub energy: f64,
    pub loudness: Option<f64>,
    pub speechiness: Option<f64>,
    pub acousticness: Option<f64>,
    pub instrumentalness: Option<f64>,
    pub liveness: Option<f64>,
    pub valence: Option<f64>,
    pub tempo: Option<f64>,
    pub duration_ms: Option<i64>,
}

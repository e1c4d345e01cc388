use crate::error::{PrepError, Result};
use crate::pipeline::ingestion::ColumnIndex;

/// Pick the genre column: the first candidate, in priority order, that the
/// input actually has. Without one the run cannot continue.
pub fn resolve_genre_column(candidates: &[String], columns: &ColumnIndex) -> Result<String> {
    candidates
        .iter()
        .find(|candidate| columns.contains(candidate))
        .cloned()
        .ok_or_else(|| PrepError::GenreColumnNotFound {
            candidates: candidates.to_vec(),
            available: columns.names().to_vec(),
        })
}

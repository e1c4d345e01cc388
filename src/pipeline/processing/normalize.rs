use serde::Serialize;
use std::collections::HashSet;
use std::fmt;

use crate::constants::*;
use crate::domain::CleanRecord;
use crate::pipeline::ingestion::RawRow;
use crate::pipeline::processing::coerce::{extract_year, float_to_int, to_float, to_int};

/// Why a raw row did not become a record.
///
/// These are aggregated into counts only; a rejected row is not an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RejectReason {
    MissingId,
    DuplicateId,
    MissingYear,
    MissingPopularity,
    MissingGenre,
    MissingEnergy,
    /// The row could not be decoded at all
    MalformedRow,
}

impl RejectReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            RejectReason::MissingId => "missing_id",
            RejectReason::DuplicateId => "duplicate_id",
            RejectReason::MissingYear => "missing_year",
            RejectReason::MissingPopularity => "missing_popularity",
            RejectReason::MissingGenre => "missing_genre",
            RejectReason::MissingEnergy => "missing_energy",
            RejectReason::MalformedRow => "malformed_row",
        }
    }
}

impl fmt::Display for RejectReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The nine audio features, coerced but not yet validated
#[derive(Debug, Clone, Copy, Default, PartialEq)]
struct AudioFeatures {
    danceability: Option<f64>,
    energy: Option<f64>,
    loudness: Option<f64>,
    speechiness: Option<f64>,
    acousticness: Option<f64>,
    instrumentalness: Option<f64>,
    liveness: Option<f64>,
    valence: Option<f64>,
    tempo: Option<f64>,
}

impl AudioFeatures {
    fn from_row(row: &RawRow<'_>) -> Self {
        let feature = |column: &str| to_float(row.get_or_empty(column));
        Self {
            danceability: feature(COL_DANCEABILITY),
            energy: feature(COL_ENERGY),
            loudness: feature(COL_LOUDNESS),
            speechiness: feature(COL_SPEECHINESS),
            acousticness: feature(COL_ACOUSTICNESS),
            instrumentalness: feature(COL_INSTRUMENTALNESS),
            liveness: feature(COL_LIVENESS),
            valence: feature(COL_VALENCE),
            tempo: feature(COL_TEMPO),
        }
    }
}

/// Turns raw rows into clean records, remembering which track ids it has seen.
///
/// One normalizer lives for exactly one run.
pub struct TrackNormalizer {
    genre_column: String,
    seen_ids: HashSet<String>,
}

impl TrackNormalizer {
    pub fn new(genre_column: impl Into<String>) -> Self {
        Self {
            genre_column: genre_column.into(),
            seen_ids: HashSet::new(),
        }
    }

    pub fn genre_column(&self) -> &str {
        &self.genre_column
    }

    /// Number of distinct non-empty ids encountered so far
    pub fn seen_count(&self) -> usize {
        self.seen_ids.len()
    }

    /// Validate and build one record. Checks run in a fixed order and the
    /// first failing check decides the reason.
    ///
    /// An id counts as seen once it passes the duplicate check, even if the
    /// row is rejected afterwards.
    pub fn normalize(&mut self, row: &RawRow<'_>) -> Result<CleanRecord, RejectReason> {
        let id = row.get_or_empty(COL_TRACK_ID).trim();
        if id.is_empty() {
            return Err(RejectReason::MissingId);
        }
        if !self.seen_ids.insert(id.to_string()) {
            return Err(RejectReason::DuplicateId);
        }

        let year = extract_year(row.get_or_empty(COL_RELEASE_DATE))
            .ok_or(RejectReason::MissingYear)?;
        let popularity = to_int(row.get_or_empty(COL_POPULARITY))
            .ok_or(RejectReason::MissingPopularity)?;

        let genre = row.get_or_empty(&self.genre_column).trim();
        if genre.is_empty() {
            return Err(RejectReason::MissingGenre);
        }

        let features = AudioFeatures::from_row(row);
        let energy = features.energy.ok_or(RejectReason::MissingEnergy)?;
        let duration_ms = to_float(row.get_or_empty(COL_DURATION_MS)).and_then(float_to_int);

        Ok(CleanRecord {
            id: id.to_string(),
            track_name: row.get_or_empty(COL_TRACK_NAME).trim().to_string(),
            track_artist: row.get_or_empty(COL_TRACK_ARTIST).trim().to_string(),
            genre: genre.to_string(),
            year,
            popularity,
            danceability: features.danceability,
            energy,
            loudness: features.loudness,
            speechiness: features.speechiness,
            acousticness: features.acousticness,
            instrumentalness: features.instrumentalness,
            liveness: features.liveness,
            valence: features.valence,
            tempo: features.tempo,
            duration_ms,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::ingestion::ColumnIndex;
    use csv::StringRecord;

    const HEADER: [&str; 17] = [
        "track_id",
        "track_name",
        "track_artist",
        "track_popularity",
        "track_album_release_date",
        "playlist_genre",
        "danceability",
        "energy",
        "loudness",
        "speechiness",
        "acousticness",
        "instrumentalness",
        "liveness",
        "valence",
        "tempo",
        "duration_ms",
        "genre",
    ];

    fn columns() -> ColumnIndex {
        ColumnIndex::from_headers(&StringRecord::from(HEADER.to_vec()))
    }

    fn record(overrides: &[(&str, &str)]) -> StringRecord {
        let mut values = vec![
            "6f807x0ima9a1j3VPbc7VN",
            "  I Don't Care ",
            " Ed Sheeran ",
            "66",
            "2019-06-14",
            "pop",
            "0.748",
            "0.916",
            "-2.634",
            "0.0583",
            "0.102",
            "0",
            "0.0653",
            "0.518",
            "122.036",
            "194754",
            "ignored",
        ];
        for (column, value) in overrides {
            let idx = HEADER.iter().position(|h| h == column).unwrap();
            values[idx] = *value;
        }
        StringRecord::from(values)
    }

    fn normalize_one(normalizer: &mut TrackNormalizer, rec: &StringRecord) -> Result<CleanRecord, RejectReason> {
        let columns = columns();
        normalizer.normalize(&RawRow::new(&columns, rec))
    }

    #[test]
    fn test_builds_clean_record() {
        let mut normalizer = TrackNormalizer::new("playlist_genre");
        let clean = normalize_one(&mut normalizer, &record(&[])).unwrap();

        assert_eq!(clean.id, "6f807x0ima9a1j3VPbc7VN");
        assert_eq!(clean.track_name, "I Don't Care");
        assert_eq!(clean.track_artist, "Ed Sheeran");
        assert_eq!(clean.genre, "pop");
        assert_eq!(clean.year, 2019);
        assert_eq!(clean.popularity, 66);
        assert_eq!(clean.energy, 0.916);
        assert_eq!(clean.loudness, Some(-2.634));
        assert_eq!(clean.instrumentalness, Some(0.0));
        assert_eq!(clean.tempo, Some(122.036));
        assert_eq!(clean.duration_ms, Some(194754));
    }

    #[test]
    fn test_uses_resolved_genre_column() {
        let mut normalizer = TrackNormalizer::new("genre");
        let clean = normalize_one(&mut normalizer, &record(&[])).unwrap();
        assert_eq!(clean.genre, "ignored");
    }

    #[test]
    fn test_trims_id_and_genre() {
        let mut normalizer = TrackNormalizer::new("playlist_genre");
        let clean = normalize_one(
            &mut normalizer,
            &record(&[("track_id", "  abc  "), ("playlist_genre", " rock ")]),
        )
        .unwrap();
        assert_eq!(clean.id, "abc");
        assert_eq!(clean.genre, "rock");
    }

    #[test]
    fn test_rejects_missing_fields() {
        let cases = [
            (("track_id", "   "), RejectReason::MissingId),
            (("track_album_release_date", "75"), RejectReason::MissingYear),
            (("track_album_release_date", "1850-01-01"), RejectReason::MissingYear),
            (("track_popularity", "abc"), RejectReason::MissingPopularity),
            (("playlist_genre", "  "), RejectReason::MissingGenre),
            (("energy", ""), RejectReason::MissingEnergy),
        ];
        for ((column, value), expected) in cases {
            let mut normalizer = TrackNormalizer::new("playlist_genre");
            let result = normalize_one(&mut normalizer, &record(&[(column, value)]));
            assert_eq!(result, Err(expected), "{column}={value:?}");
        }
    }

    #[test]
    fn test_optional_features_pass_through_as_none() {
        let mut normalizer = TrackNormalizer::new("playlist_genre");
        let clean = normalize_one(
            &mut normalizer,
            &record(&[("danceability", ""), ("tempo", "fast"), ("duration_ms", "")]),
        )
        .unwrap();
        assert_eq!(clean.danceability, None);
        assert_eq!(clean.tempo, None);
        assert_eq!(clean.duration_ms, None);
        assert_eq!(clean.energy, 0.916);
    }

    #[test]
    fn test_duration_accepts_decimal_form() {
        let mut normalizer = TrackNormalizer::new("playlist_genre");
        let clean = normalize_one(&mut normalizer, &record(&[("duration_ms", "194754.0")])).unwrap();
        assert_eq!(clean.duration_ms, Some(194754));
    }

    #[test]
    fn test_first_duplicate_wins() {
        let mut normalizer = TrackNormalizer::new("playlist_genre");
        let first = normalize_one(&mut normalizer, &record(&[("track_name", "First")])).unwrap();
        let second = normalize_one(&mut normalizer, &record(&[("track_name", "Second")]));

        assert_eq!(first.track_name, "First");
        assert_eq!(second, Err(RejectReason::DuplicateId));
        assert_eq!(normalizer.seen_count(), 1);
    }

    #[test]
    fn test_rejected_first_occurrence_still_blocks_duplicates() {
        let mut normalizer = TrackNormalizer::new("playlist_genre");
        let first = normalize_one(&mut normalizer, &record(&[("energy", "")]));
        let second = normalize_one(&mut normalizer, &record(&[]));

        assert_eq!(first, Err(RejectReason::MissingEnergy));
        assert_eq!(second, Err(RejectReason::DuplicateId));
    }

    #[test]
    fn test_short_row_reads_missing_cells_as_empty() {
        let mut normalizer = TrackNormalizer::new("playlist_genre");
        let short = StringRecord::from(vec!["abc", "name", "artist", "50", "2001-01-01", "pop"]);
        assert_eq!(normalize_one(&mut normalizer, &short), Err(RejectReason::MissingEnergy));
    }
}

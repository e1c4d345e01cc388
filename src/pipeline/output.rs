use csv::WriterBuilder;
use sha2::{Digest, Sha256};
use std::fs;
use std::io::Write;
use std::path::Path;
use tracing::debug;

use crate::constants::OUTPUT_COLUMNS;
use crate::domain::CleanRecord;
use crate::error::Result;

/// What was written by a single output pass
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputSummary {
    pub rows_written: usize,
    pub bytes_written: usize,
    /// Hex SHA-256 of the written bytes
    pub sha256: String,
}

/// Serialize records in the fixed column order. The header row is always
/// written; missing values become empty fields.
pub fn write_records<W: Write>(writer: W, records: &[CleanRecord]) -> Result<()> {
    let mut wtr = WriterBuilder::new().has_headers(false).from_writer(writer);
    wtr.write_record(OUTPUT_COLUMNS)?;
    for record in records {
        wtr.serialize(record)?;
    }
    wtr.flush()?;
    Ok(())
}

/// Render records to CSV bytes in memory
pub fn render_records(records: &[CleanRecord]) -> Result<Vec<u8>> {
    let mut buf = Vec::new();
    write_records(&mut buf, records)?;
    Ok(buf)
}

/// Write the cleaned dataset to `path`, replacing any existing file.
///
/// Rendering finishes before the file is touched, so a serialization failure
/// leaves the previous file in place.
pub fn write_csv_file(path: &Path, records: &[CleanRecord]) -> Result<OutputSummary> {
    let bytes = render_records(records)?;
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, &bytes)?;
    debug!("Wrote {} bytes to {}", bytes.len(), path.display());

    Ok(OutputSummary {
        rows_written: records.len(),
        bytes_written: bytes.len(),
        sha256: digest(&bytes),
    })
}

pub fn digest(bytes: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    hex::encode(hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> CleanRecord {
        CleanRecord {
            id: "abc".to_string(),
            track_name: "Song, With Comma".to_string(),
            track_artist: "Artist".to_string(),
            genre: "pop".to_string(),
            year: 2019,
            popularity: 66,
            danceability: Some(0.748),
            energy: 0.916,
            loudness: Some(-2.634),
            speechiness: None,
            acousticness: Some(0.102),
            instrumentalness: Some(0.0),
            liveness: None,
            valence: Some(0.518),
            tempo: Some(122.036),
            duration_ms: None,
        }
    }

    fn render_string(records: &[CleanRecord]) -> String {
        String::from_utf8(render_records(records).unwrap()).unwrap()
    }

    #[test]
    fn test_header_only_when_empty() {
        assert_eq!(render_string(&[]), format!("{}\n", OUTPUT_COLUMNS.join(",")));
    }

    #[test]
    fn test_fixed_column_order_and_empty_nulls() {
        let out = render_string(&[sample()]);
        let mut lines = out.lines();

        assert_eq!(
            lines.next().unwrap(),
            "id,track_name,track_artist,genre,year,popularity,danceability,energy,loudness,\
             speechiness,acousticness,instrumentalness,liveness,valence,tempo,duration_ms"
        );
        let row = lines.next().unwrap();
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(false)
            .from_reader(row.as_bytes());
        let fields = reader.records().next().unwrap().unwrap();

        assert_eq!(fields.len(), 16);
        assert_eq!(&fields[0], "abc");
        assert_eq!(&fields[1], "Song, With Comma");
        assert_eq!(&fields[3], "pop");
        assert_eq!(&fields[4], "2019");
        assert_eq!(&fields[5], "66");
        assert_eq!(fields[6].parse::<f64>().unwrap(), 0.748);
        assert_eq!(fields[7].parse::<f64>().unwrap(), 0.916);
        assert_eq!(&fields[9], "");
        assert_eq!(&fields[12], "");
        assert_eq!(&fields[15], "");
        assert!(lines.next().is_none());
    }

    #[test]
    fn test_write_file_overwrites_and_reports_digest() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("clean.csv");
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, "stale contents that are much longer than the header row\n").unwrap();

        let summary = write_csv_file(&path, &[sample()]).unwrap();
        let written = fs::read(&path).unwrap();

        assert_eq!(summary.rows_written, 1);
        assert_eq!(summary.bytes_written, written.len());
        assert_eq!(summary.sha256, digest(&written));
        assert_eq!(summary.sha256.len(), 64);
        assert!(!String::from_utf8(written).unwrap().contains("stale"));
    }

    #[test]
    fn test_write_file_creates_parent_directory() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("data").join("clean.csv");
        write_csv_file(&path, &[]).unwrap();
        assert!(path.exists());
    }
}

// Pipeline ingestion: reading raw track rows from delimited input

use csv::{Reader, ReaderBuilder, StringRecord};
use std::collections::HashMap;
use std::fs::File;
use std::io::Read;
use std::path::Path;
use tracing::debug;

use crate::error::Result;

/// Maps header names to their column positions.
///
/// When a header name repeats, the last position wins.
#[derive(Debug, Clone, Default)]
pub struct ColumnIndex {
    names: Vec<String>,
    positions: HashMap<String, usize>,
}

impl ColumnIndex {
    pub fn from_headers(headers: &StringRecord) -> Self {
        let names: Vec<String> = headers.iter().map(|h| h.to_string()).collect();
        let positions = names
            .iter()
            .enumerate()
            .map(|(idx, name)| (name.clone(), idx))
            .collect();
        Self { names, positions }
    }

    /// Header names in file order
    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn contains(&self, name: &str) -> bool {
        self.positions.contains_key(name)
    }

    pub fn position(&self, name: &str) -> Option<usize> {
        self.positions.get(name).copied()
    }
}

/// One input row, viewed through the header index.
///
/// Lives only while the row is being validated.
#[derive(Debug, Clone, Copy)]
pub struct RawRow<'a> {
    columns: &'a ColumnIndex,
    record: &'a StringRecord,
}

impl<'a> RawRow<'a> {
    pub fn new(columns: &'a ColumnIndex, record: &'a StringRecord) -> Self {
        Self { columns, record }
    }

    /// Raw cell value; `None` for unknown columns or short rows
    pub fn get(&self, column: &str) -> Option<&'a str> {
        self.columns
            .position(column)
            .and_then(|idx| self.record.get(idx))
    }

    /// Raw cell value with absent cells read as empty
    pub fn get_or_empty(&self, column: &str) -> &'a str {
        self.get(column).unwrap_or("")
    }
}

/// Outcome of pulling one row from the source
pub enum RowRead {
    Row(StringRecord),
    /// The row could not be decoded (bad UTF-8, broken quoting)
    Malformed(csv::Error),
}

/// Delimited track source with a header row
pub struct TrackSource<R: Read> {
    reader: Reader<R>,
    columns: ColumnIndex,
}

impl TrackSource<File> {
    pub fn open(path: &Path) -> Result<Self> {
        let file = File::open(path)?;
        debug!("Opened input file {}", path.display());
        Self::from_reader(file)
    }
}

impl<R: Read> TrackSource<R> {
    pub fn from_reader(input: R) -> Result<Self> {
        let mut reader = ReaderBuilder::new()
            .flexible(true) // Short or long rows are tolerated
            .from_reader(input);
        let columns = ColumnIndex::from_headers(reader.headers()?);
        debug!("Discovered {} input columns", columns.names().len());
        Ok(Self { reader, columns })
    }

    pub fn columns(&self) -> &ColumnIndex {
        &self.columns
    }

    /// Read the next row. I/O failures are fatal; decode failures are
    /// reported as `RowRead::Malformed` so the caller can skip the row.
    pub fn next_row(&mut self) -> Result<Option<RowRead>> {
        let mut record = StringRecord::new();
        match self.reader.read_record(&mut record) {
            Ok(true) => Ok(Some(RowRead::Row(record))),
            Ok(false) => Ok(None),
            Err(e) if e.is_io_error() => Err(e.into()),
            Err(e) => Ok(Some(RowRead::Malformed(e))),
        }
    }
}

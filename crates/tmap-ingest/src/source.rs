use std::fs::File;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::{IngestError, Result};

/// A fully-read delimited source: header plus data rows.
#[derive(Debug, Clone)]
pub struct SourceTable {
    pub header: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

/// Streaming data-row iterator over an open source file.
///
/// Every yielded row is validated against the header width; a mismatch is
/// surfaced as [`IngestError::RaggedRow`] with the offending line number
/// instead of letting a later column index run past the row.
pub struct SourceRows {
    records: csv::StringRecordsIntoIter<File>,
    path: PathBuf,
    expected: usize,
}

impl Iterator for SourceRows {
    type Item = Result<Vec<String>>;

    fn next(&mut self) -> Option<Self::Item> {
        let record = match self.records.next()? {
            Ok(record) => record,
            Err(source) => {
                return Some(Err(IngestError::Csv {
                    path: self.path.clone(),
                    source,
                }));
            }
        };
        let line = record.position().map(|p| p.line()).unwrap_or_default();
        if record.len() != self.expected {
            return Some(Err(IngestError::RaggedRow {
                path: self.path.clone(),
                line,
                expected: self.expected,
                found: record.len(),
            }));
        }
        Some(Ok(record.iter().map(str::to_string).collect()))
    }
}

/// Opens a delimited source, returning the header and a lazy row iterator.
///
/// The first row is the header; cells are kept verbatim apart from a BOM
/// strip on header names.
pub fn open_source(path: &Path, delimiter: u8) -> Result<(Vec<String>, SourceRows)> {
    let file = File::open(path).map_err(|source| IngestError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let reader = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .has_headers(false)
        .flexible(true)
        .from_reader(file);
    let mut records = reader.into_records();
    let header: Vec<String> = match records.next() {
        None => {
            return Err(IngestError::EmptyFile {
                path: path.to_path_buf(),
            });
        }
        Some(Err(source)) => {
            return Err(IngestError::Csv {
                path: path.to_path_buf(),
                source,
            });
        }
        Some(Ok(record)) => record
            .iter()
            .map(|cell| cell.trim_matches('\u{feff}').to_string())
            .collect(),
    };
    let expected = header.len();
    Ok((
        header,
        SourceRows {
            records,
            path: path.to_path_buf(),
            expected,
        },
    ))
}

/// Reads a whole delimited source into memory.
pub fn read_source(path: &Path, delimiter: u8) -> Result<SourceTable> {
    let (header, rows) = open_source(path, delimiter)?;
    let rows = rows.collect::<Result<Vec<_>>>()?;
    debug!(path = %path.display(), rows = rows.len(), "read source table");
    Ok(SourceTable { header, rows })
}

/// Reads only the header row of a delimited source.
pub fn read_columns(path: &Path, delimiter: u8) -> Result<Vec<String>> {
    let (header, _) = open_source(path, delimiter)?;
    Ok(header)
}

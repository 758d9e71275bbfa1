use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum IngestError {
    #[error("read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("parse {path}: {source}")]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },
    #[error("{path}:{line}: row has {found} cells, header has {expected}")]
    RaggedRow {
        path: PathBuf,
        line: u64,
        expected: usize,
        found: usize,
    },
    #[error("{path}: no header row")]
    EmptyFile { path: PathBuf },
    #[error("column index {column} out of range for {count} columns")]
    ColumnOutOfRange { column: usize, count: usize },
    #[error("not a directory: {path}")]
    DirectoryNotFound { path: PathBuf },
    #[error(transparent)]
    Layer(#[from] tmap_model::ModelError),
}

pub type Result<T> = std::result::Result<T, IngestError>;

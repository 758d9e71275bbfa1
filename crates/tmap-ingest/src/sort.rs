use std::path::Path;

use tracing::info;

use crate::error::{IngestError, Result};
use crate::source::read_source;
use crate::writeback::write_delimited;

/// Sorts a delimited file's data rows by one column and rewrites the file in
/// place. The header row stays first; the sort is stable, so rows with equal
/// keys keep their original order. The rewrite is staged, so a failed run
/// never truncates the input.
pub fn sort_source(path: &Path, column: usize, reverse: bool, delimiter: u8) -> Result<()> {
    let mut table = read_source(path, delimiter)?;
    if column >= table.header.len() {
        return Err(IngestError::ColumnOutOfRange {
            column,
            count: table.header.len(),
        });
    }
    if reverse {
        table.rows.sort_by(|a, b| b[column].cmp(&a[column]));
    } else {
        table.rows.sort_by(|a, b| a[column].cmp(&b[column]));
    }

    write_delimited(path, delimiter, &table.header, &table.rows)?;
    info!(path = %path.display(), column, reverse, "sorted source file");
    Ok(())
}

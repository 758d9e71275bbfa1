use std::io::Write;
use std::path::Path;

use tempfile::NamedTempFile;

use crate::error::{IngestError, Result};

/// Writes a delimited file by staging the complete contents next to `path`
/// and renaming over it only once everything is flushed. A failure part-way
/// through leaves the existing file exactly as it was.
pub(crate) fn write_delimited(
    path: &Path,
    delimiter: u8,
    header: &[String],
    rows: &[Vec<String>],
) -> Result<()> {
    let mut buffer = Vec::new();
    {
        let mut writer = csv::WriterBuilder::new()
            .delimiter(delimiter)
            .from_writer(&mut buffer);
        writer
            .write_record(header)
            .map_err(|source| IngestError::Csv {
                path: path.to_path_buf(),
                source,
            })?;
        for row in rows {
            writer.write_record(row).map_err(|source| IngestError::Csv {
                path: path.to_path_buf(),
                source,
            })?;
        }
        writer.flush().map_err(|source| IngestError::Io {
            path: path.to_path_buf(),
            source,
        })?;
    }

    // Stage in the destination directory so the final rename stays on one
    // filesystem.
    let parent = match path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir,
        _ => Path::new("."),
    };
    let mut staged = NamedTempFile::new_in(parent).map_err(|source| IngestError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    staged.write_all(&buffer).map_err(|source| IngestError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    staged.persist(path).map_err(|source| IngestError::Io {
        path: path.to_path_buf(),
        source: source.error,
    })?;
    Ok(())
}

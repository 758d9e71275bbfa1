#![deny(unsafe_code)]

pub mod attr_table;
pub mod discovery;
pub mod error;
pub mod sort;
pub mod source;
mod writeback;

pub use attr_table::{load_attribute_table, write_attribute_table};
pub use discovery::list_files_with_extension;
pub use error::{IngestError, Result};
pub use sort::sort_source;
pub use source::{SourceRows, SourceTable, open_source, read_columns, read_source};

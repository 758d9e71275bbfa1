#![deny(unsafe_code)]

pub mod error;
pub mod extrema;
pub mod join;
pub mod schema;

pub use error::{ConfigError, CoreError, Result, SchemaError};
pub use extrema::{
    ExtremaRecord, ExtremaReport, LabelFormat, apply_extrema_labels, compute_group_extrema,
    format_label,
};
pub use join::{JoinOptions, JoinReport, ParseFailure, check_missing_keys, join};
pub use schema::{ensure_fields, remove_fields};

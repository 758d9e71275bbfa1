use thiserror::Error;

use tmap_model::{FeatureId, ModelError};

/// Schema violations. Always fatal for the operation that hits them.
#[derive(Debug, Error)]
pub enum SchemaError {
    #[error("field name is empty")]
    EmptyName,
    #[error("field name starts with a digit: {name:?}")]
    NameStartsWithDigit { name: String },
    #[error("field names {first:?} and {second:?} both truncate to {physical:?}")]
    TruncationCollision {
        first: String,
        second: String,
        physical: String,
    },
    #[error("layer has no field named {field:?}")]
    MissingField { field: String },
    #[error("feature {feature} has no {field:?} value")]
    MissingKeyValue { feature: FeatureId, field: String },
}

/// Invalid column-range configuration for a join.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("join key column {column} out of range for {count} source columns")]
    KeyColumnOutOfRange { column: usize, count: usize },
    #[error("value column range {start}..{end} out of range for {count} source columns")]
    ValueRangeOutOfRange {
        start: usize,
        end: usize,
        count: usize,
    },
    #[error("value column range {start}..{end} is empty")]
    EmptyValueRange { start: usize, end: usize },
    #[error("value columns {start}..{end} must start after join key column {key_column}")]
    ValueRangeBeforeKey {
        key_column: usize,
        start: usize,
        end: usize,
    },
}

#[derive(Debug, Error)]
pub enum CoreError {
    #[error(transparent)]
    Schema(#[from] SchemaError),
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Layer(#[from] ModelError),
}

pub type Result<T> = std::result::Result<T, CoreError>;

use thiserror::Error;

use crate::layer::FeatureId;

/// Errors raised by the layer attribute store itself.
#[derive(Debug, Error)]
pub enum ModelError {
    #[error("layer has no field named {0:?}")]
    UnknownField(String),
    #[error("layer already has a field named {0:?}")]
    DuplicateField(String),
    #[error("layer has no feature {0}")]
    UnknownFeature(FeatureId),
}

pub type Result<T> = std::result::Result<T, ModelError>;

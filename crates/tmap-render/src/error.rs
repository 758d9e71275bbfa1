use std::path::PathBuf;

use thiserror::Error;

/// Failures surfaced by a rendering backend.
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("template not found: {path}")]
    TemplateNotFound { path: PathBuf },
    #[error("render failed for field {field:?}: {message}")]
    Failed { field: String, message: String },
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

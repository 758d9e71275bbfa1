//! Result types shared between command execution and summary rendering.

use std::path::PathBuf;

use tmap_core::JoinReport;
use tmap_render::RenderJob;

/// Everything a `run` invocation produced, for the summary table and the
/// optional JSON outputs.
pub struct RunResult {
    pub table: PathBuf,
    pub source: PathBuf,
    /// Where the updated table went; `None` on a dry run.
    pub table_out: Option<PathBuf>,
    pub features: usize,
    pub report: JoinReport,
    pub label_fields: Vec<String>,
    pub extrema_groups: usize,
    pub extrema_failures: usize,
    pub render_jobs: Vec<RenderJob>,
    pub plan_out: Option<PathBuf>,
}

use tracing::info;

use crate::error::RenderError;
use crate::plan::RenderJob;

/// The seam to the external rendering engine. Implementations take a fully
/// prepared job and produce the image file.
pub trait MapRenderer {
    fn render(&mut self, job: &RenderJob) -> Result<(), RenderError>;
}

/// Runs every job in plan order, returning the number rendered.
pub fn render_plan<R: MapRenderer>(
    renderer: &mut R,
    jobs: &[RenderJob],
) -> Result<usize, RenderError> {
    for job in jobs {
        info!(
            template = %job.template.display(),
            field = %job.value_field,
            output = %job.output.display(),
            "rendering map"
        );
        renderer.render(job)?;
    }
    Ok(jobs.len())
}

/// Test double that records the jobs it was asked to render.
#[derive(Debug, Default)]
pub struct RecordingRenderer {
    pub jobs: Vec<RenderJob>,
}

impl MapRenderer for RecordingRenderer {
    fn render(&mut self, job: &RenderJob) -> Result<(), RenderError> {
        self.jobs.push(job.clone());
        Ok(())
    }
}

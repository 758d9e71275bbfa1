#![deny(unsafe_code)]

pub mod error;
pub mod plan;
pub mod renderer;

pub use error::RenderError;
pub use plan::{
    LabelSpec, LabelStyle, PlanOptions, RenderJob, Symbology, build_render_plan,
    label_expression, no_data_filter,
};
pub use renderer::{MapRenderer, RecordingRenderer, render_plan};

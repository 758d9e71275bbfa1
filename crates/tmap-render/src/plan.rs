use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// Graduated-color symbology applied to the value field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Symbology {
    /// Built-in percent-change class breaks.
    PercentChange,
    /// Built-in difference-in-loss-cost class breaks.
    DiffLossCost,
    /// A saved symbology layer file.
    LayerFile(PathBuf),
}

/// Formatting of the label text drawn next to each feature.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LabelStyle {
    /// The field value as-is.
    Plain,
    /// Integer percentage.
    Percent,
    /// Three decimal places.
    Fixed3,
}

/// Label-expression string in the engine's grammar.
pub fn label_expression(field: &str, style: LabelStyle) -> String {
    match style {
        LabelStyle::Plain => format!("[{field}]"),
        LabelStyle::Percent => {
            format!("str(int(round(float([{field}])*100,0))) + '%'")
        }
        LabelStyle::Fixed3 => format!("str(round(float([{field}]),3))"),
    }
}

/// Label filter that hides no-data features.
pub fn no_data_filter(field: &str, sentinel: f64) -> String {
    format!("{field} <> {sentinel}")
}

/// Labeling instructions attached to a render job.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LabelSpec {
    pub expression: String,
    pub no_data_filter: String,
}

/// One map to render: a template, a symbolized value field, and where the
/// image goes. The engine consuming this is external; the job only carries
/// its inputs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RenderJob {
    pub template: PathBuf,
    pub value_field: String,
    pub symbology: Symbology,
    pub label: Option<LabelSpec>,
    pub output: PathBuf,
    pub resolution: u32,
}

/// Plan-wide settings.
#[derive(Debug, Clone)]
pub struct PlanOptions {
    pub symbology: Symbology,
    pub label_style: Option<LabelStyle>,
    /// Output file-name prefix; recommended when sweeping multiple sources
    /// into one output folder.
    pub prefix: Option<String>,
    pub output_dir: PathBuf,
    pub resolution: u32,
    pub no_data: f64,
}

impl PlanOptions {
    pub fn new(symbology: Symbology, output_dir: impl Into<PathBuf>) -> Self {
        Self {
            symbology,
            label_style: None,
            prefix: None,
            output_dir: output_dir.into(),
            resolution: 600,
            no_data: -9999.0,
        }
    }
}

fn template_stem(template: &Path) -> String {
    template
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_default()
}

fn output_name(options: &PlanOptions, template: &Path, field: &str) -> PathBuf {
    let stem = template_stem(template);
    let name = match &options.prefix {
        Some(prefix) => format!("{prefix}_{stem}_{field}.jpg"),
        None => format!("{stem}_{field}.jpg"),
    };
    options.output_dir.join(name)
}

/// Builds the template × field render matrix.
///
/// Job order is templates outermost, fields innermost, matching the batch
/// driver's iteration.
pub fn build_render_plan(
    templates: &[PathBuf],
    fields: &[String],
    options: &PlanOptions,
) -> Vec<RenderJob> {
    let mut jobs = Vec::with_capacity(templates.len() * fields.len());
    for template in templates {
        for field in fields {
            let label = options.label_style.map(|style| LabelSpec {
                expression: label_expression(field, style),
                no_data_filter: no_data_filter(field, options.no_data),
            });
            jobs.push(RenderJob {
                template: template.clone(),
                value_field: field.clone(),
                symbology: options.symbology.clone(),
                label,
                output: output_name(options, template, field),
                resolution: options.resolution,
            });
        }
    }
    jobs
}

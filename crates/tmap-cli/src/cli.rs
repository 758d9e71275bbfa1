//! CLI argument definitions for the thematic map pipeline.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;

#[derive(Parser)]
#[command(
    name = "tmap",
    version,
    about = "Batch thematic map preparation - join tabular values onto layer features",
    long_about = "Join delimited value files onto a layer attribute table, compute\n\
                  per-group max/min labels, and plan symbolized map renders across\n\
                  template documents. The rendering engine itself is external; this\n\
                  tool prepares its inputs."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Adjust log verbosity (-v for debug, -vv for trace, -q for errors only).
    #[command(flatten)]
    pub verbosity: Verbosity<WarnLevel>,

    /// Control ANSI color output (auto, always, never).
    #[command(flatten)]
    pub color: Color,

    /// Explicit log level (overrides -v/-q flags).
    #[arg(long = "log-level", value_enum, global = true)]
    pub log_level: Option<LogLevelArg>,

    /// Log output format (pretty for human, json for machine parsing).
    #[arg(
        long = "log-format",
        value_enum,
        default_value = "pretty",
        global = true
    )]
    pub log_format: LogFormatArg,

    /// Write logs to a file instead of stderr.
    #[arg(long = "log-file", value_name = "PATH", global = true)]
    pub log_file: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Command {
    /// Join a values file onto an attribute table and prepare map renders.
    Run(RunArgs),

    /// Print the column names of a delimited file.
    Columns(ColumnsArgs),

    /// Report source keys that match no feature in the attribute table.
    CheckMissing(CheckMissingArgs),

    /// Sort a delimited file by one column, in place.
    Sort(SortArgs),
}

#[derive(Parser)]
pub struct RunArgs {
    /// Layer attribute table (delimited export of the feature collection).
    #[arg(value_name = "TABLE")]
    pub table: PathBuf,

    /// Values file to join onto the table.
    #[arg(value_name = "SOURCE")]
    pub source: PathBuf,

    /// Attribute field holding the join key.
    #[arg(long = "layer-key", default_value = "JOIN")]
    pub layer_key: String,

    /// Source column index holding the join key.
    #[arg(long = "key-col", default_value_t = 0)]
    pub key_col: usize,

    /// First value column index (must lie after the key column).
    #[arg(long = "value-start", default_value_t = 1)]
    pub value_start: usize,

    /// End of the value columns (exclusive; default: end of row).
    #[arg(long = "value-end")]
    pub value_end: Option<usize>,

    /// Type for the provisioned value fields.
    #[arg(long = "value-type", value_enum, default_value = "double")]
    pub value_type: ValueTypeArg,

    /// Write this value into provisioned fields of unmatched features
    /// (default: leave them untouched).
    #[arg(long = "fill", value_name = "VALUE")]
    pub fill: Option<f64>,

    /// Compute per-group max/min labels grouped by this attribute field.
    #[arg(long = "group-by", value_name = "FIELD")]
    pub group_by: Option<String>,

    /// Formatting of the max/min label values.
    #[arg(long = "label-format", value_enum, default_value = "raw")]
    pub label_format: LabelFormatArg,

    /// Plan one render per template in this directory and per value field.
    #[arg(long = "templates-dir", value_name = "DIR")]
    pub templates_dir: Option<PathBuf>,

    /// Built-in symbology for planned renders.
    #[arg(long = "symbology", value_enum)]
    pub symbology: Option<SymbologyArg>,

    /// Symbology layer file for planned renders (overrides --symbology).
    #[arg(long = "symbology-file", value_name = "PATH")]
    pub symbology_file: Option<PathBuf>,

    /// Draw labels on planned renders, formatted per --label-format.
    #[arg(long = "map-labels")]
    pub map_labels: bool,

    /// Output file-name prefix for planned renders.
    #[arg(long = "prefix")]
    pub prefix: Option<String>,

    /// Output directory for planned renders.
    #[arg(long = "output-dir", default_value = "out")]
    pub output_dir: PathBuf,

    /// Render resolution in dpi.
    #[arg(long = "resolution", default_value_t = 600)]
    pub resolution: u32,

    /// Write the render plan as a JSON manifest.
    #[arg(long = "plan-out", value_name = "PATH")]
    pub plan_out: Option<PathBuf>,

    /// Write the join report as JSON.
    #[arg(long = "report-json", value_name = "PATH")]
    pub report_json: Option<PathBuf>,

    /// Write the updated table here instead of back over TABLE.
    #[arg(long = "table-out", value_name = "PATH")]
    pub table_out: Option<PathBuf>,

    /// Validate and report without writing the table.
    #[arg(long = "dry-run")]
    pub dry_run: bool,

    /// Apply the legacy vector format's 10-character field-name limit.
    #[arg(long = "shapefile-names")]
    pub shapefile_names: bool,

    /// Cell delimiter: a single character, or "tab".
    #[arg(long = "delimiter", default_value = ",")]
    pub delimiter: String,
}

#[derive(Parser)]
pub struct ColumnsArgs {
    /// Delimited file to inspect.
    #[arg(value_name = "FILE")]
    pub file: PathBuf,

    /// Cell delimiter: a single character, or "tab".
    #[arg(long = "delimiter", default_value = ",")]
    pub delimiter: String,
}

#[derive(Parser)]
pub struct CheckMissingArgs {
    /// Layer attribute table.
    #[arg(value_name = "TABLE")]
    pub table: PathBuf,

    /// Values file whose keys are checked.
    #[arg(value_name = "SOURCE")]
    pub source: PathBuf,

    /// Attribute field holding the join key.
    #[arg(long = "layer-key", default_value = "JOIN")]
    pub layer_key: String,

    /// Source column index holding the join key.
    #[arg(long = "key-col", default_value_t = 0)]
    pub key_col: usize,

    /// Cell delimiter: a single character, or "tab".
    #[arg(long = "delimiter", default_value = ",")]
    pub delimiter: String,
}

#[derive(Parser)]
pub struct SortArgs {
    /// Delimited file to sort in place.
    #[arg(value_name = "FILE")]
    pub file: PathBuf,

    /// Column index to sort by.
    #[arg(long = "by", default_value_t = 0)]
    pub by: usize,

    /// Sort descending.
    #[arg(long = "reverse")]
    pub reverse: bool,

    /// Cell delimiter: a single character, or "tab".
    #[arg(long = "delimiter", default_value = ",")]
    pub delimiter: String,
}

#[derive(Clone, Copy, ValueEnum)]
pub enum ValueTypeArg {
    Double,
    Text,
    /// ISO dates (YYYY-MM-DD).
    Date,
}

#[derive(Clone, Copy, ValueEnum)]
pub enum LabelFormatArg {
    Raw,
    Percent,
    Fixed2,
    Fixed3,
}

#[derive(Clone, Copy, ValueEnum)]
pub enum SymbologyArg {
    PercentChange,
    DiffLossCost,
}

/// CLI log level choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogLevelArg {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// CLI log format choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogFormatArg {
    Pretty,
    Compact,
    Json,
}

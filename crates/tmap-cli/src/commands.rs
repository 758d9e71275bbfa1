use std::fs;
use std::path::Path;

use anyhow::{Context, Result, bail};
use tracing::{info, info_span, warn};

use tmap_core::{
    JoinOptions, LabelFormat, apply_extrema_labels, check_missing_keys, compute_group_extrema, join,
};
use tmap_ingest::{
    list_files_with_extension, load_attribute_table, read_columns, read_source, sort_source,
    write_attribute_table,
};
use tmap_model::{FieldType, Layer, LayerFormatCapabilities, NO_DATA};
use tmap_render::{LabelStyle, PlanOptions, RenderJob, Symbology, build_render_plan};

use crate::cli::{
    CheckMissingArgs, ColumnsArgs, LabelFormatArg, RunArgs, SortArgs, SymbologyArg, ValueTypeArg,
};
use crate::summary::print_columns;
use crate::types::RunResult;

pub fn run_pipeline(args: &RunArgs) -> Result<RunResult> {
    let delimiter = parse_delimiter(&args.delimiter)?;
    let capabilities = if args.shapefile_names {
        LayerFormatCapabilities::shapefile()
    } else {
        LayerFormatCapabilities::table()
    };

    let span = info_span!("run", table = %args.table.display(), source = %args.source.display());
    let _guard = span.enter();

    let mut layer = load_attribute_table(&args.table, delimiter, capabilities)
        .with_context(|| format!("load attribute table {}", args.table.display()))?;
    let source = read_source(&args.source, delimiter)
        .with_context(|| format!("read source {}", args.source.display()))?;

    let options = JoinOptions {
        key_column: args.key_col,
        layer_key_field: args.layer_key.clone(),
        value_start: args.value_start,
        value_end: args.value_end,
        value_type: match args.value_type {
            ValueTypeArg::Double => FieldType::Double,
            ValueTypeArg::Text => FieldType::Text,
            ValueTypeArg::Date => FieldType::Date,
        },
        unmatched_fill: args.fill,
    };
    let report = join(&mut layer, &source.header, &source.rows, &options)
        .context("join source onto attribute table")?;

    let mut label_fields = Vec::new();
    let mut extrema_groups = 0usize;
    let mut extrema_failures = 0usize;
    if let Some(group_by) = &args.group_by {
        let extrema = compute_group_extrema(
            &layer,
            &args.layer_key,
            group_by,
            &report.applied_fields,
            NO_DATA,
        )
        .context("compute group extrema")?;
        extrema_groups = extrema.extrema.values().map(std::collections::BTreeMap::len).sum();
        extrema_failures = extrema.failures.len();
        label_fields = apply_extrema_labels(
            &mut layer,
            &args.layer_key,
            group_by,
            &extrema,
            label_format(args.label_format),
        )
        .context("write extrema labels")?;
    }

    let table_out = if args.dry_run {
        info!("dry run, table not written");
        None
    } else {
        let dest = args.table_out.clone().unwrap_or_else(|| args.table.clone());
        write_attribute_table(&layer, &dest, delimiter)
            .with_context(|| format!("write attribute table {}", dest.display()))?;
        Some(dest)
    };

    let render_jobs = plan_renders(args, &report.applied_fields)?;
    if let Some(path) = &args.plan_out {
        write_json(path, &render_jobs).context("write render plan")?;
    }
    if let Some(path) = &args.report_json {
        write_json(path, &report).context("write join report")?;
    }

    Ok(RunResult {
        table: args.table.clone(),
        source: args.source.clone(),
        table_out,
        features: layer.feature_count(),
        report,
        label_fields,
        extrema_groups,
        extrema_failures,
        render_jobs,
        plan_out: args.plan_out.clone(),
    })
}

fn plan_renders(args: &RunArgs, value_fields: &[String]) -> Result<Vec<RenderJob>> {
    let Some(dir) = &args.templates_dir else {
        return Ok(Vec::new());
    };
    let templates = list_files_with_extension(dir, "mxd")
        .with_context(|| format!("list templates in {}", dir.display()))?;
    if templates.is_empty() {
        warn!(dir = %dir.display(), "no map templates found");
        return Ok(Vec::new());
    }
    let symbology = match (&args.symbology_file, args.symbology) {
        (Some(path), _) => Symbology::LayerFile(path.clone()),
        (None, Some(SymbologyArg::PercentChange)) => Symbology::PercentChange,
        (None, Some(SymbologyArg::DiffLossCost)) => Symbology::DiffLossCost,
        (None, None) => bail!("--templates-dir needs --symbology or --symbology-file"),
    };
    let mut options = PlanOptions::new(symbology, args.output_dir.clone());
    options.prefix = args.prefix.clone();
    options.resolution = args.resolution;
    if args.map_labels {
        options.label_style = Some(map_label_style(args.label_format));
    }
    Ok(build_render_plan(&templates, value_fields, &options))
}

fn map_label_style(format: LabelFormatArg) -> LabelStyle {
    match format {
        LabelFormatArg::Raw => LabelStyle::Plain,
        LabelFormatArg::Percent => LabelStyle::Percent,
        LabelFormatArg::Fixed3 => LabelStyle::Fixed3,
        LabelFormatArg::Fixed2 => {
            warn!("map label grammar has no two-decimal form, using three decimals");
            LabelStyle::Fixed3
        }
    }
}

pub fn run_columns(args: &ColumnsArgs) -> Result<()> {
    let delimiter = parse_delimiter(&args.delimiter)?;
    let columns = read_columns(&args.file, delimiter)
        .with_context(|| format!("read columns of {}", args.file.display()))?;
    print_columns(&args.file, &columns);
    Ok(())
}

/// Returns the source keys that match no feature. Empty means every key
/// joined.
pub fn run_check_missing(args: &CheckMissingArgs) -> Result<Vec<String>> {
    let delimiter = parse_delimiter(&args.delimiter)?;
    let layer = load_attribute_table(&args.table, delimiter, LayerFormatCapabilities::table())
        .with_context(|| format!("load attribute table {}", args.table.display()))?;
    let source = read_source(&args.source, delimiter)
        .with_context(|| format!("read source {}", args.source.display()))?;
    let missing = check_missing_keys(&layer, &source.rows, args.key_col, &args.layer_key)
        .context("check source keys")?;
    Ok(missing)
}

pub fn run_sort(args: &SortArgs) -> Result<()> {
    let delimiter = parse_delimiter(&args.delimiter)?;
    sort_source(&args.file, args.by, args.reverse, delimiter)
        .with_context(|| format!("sort {}", args.file.display()))?;
    Ok(())
}

fn label_format(arg: LabelFormatArg) -> LabelFormat {
    match arg {
        LabelFormatArg::Raw => LabelFormat::Raw,
        LabelFormatArg::Percent => LabelFormat::Percent,
        LabelFormatArg::Fixed2 => LabelFormat::Fixed2,
        LabelFormatArg::Fixed3 => LabelFormat::Fixed3,
    }
}

fn parse_delimiter(raw: &str) -> Result<u8> {
    match raw {
        "tab" | "\\t" | "\t" => Ok(b'\t'),
        other => {
            let mut bytes = other.bytes();
            match (bytes.next(), bytes.next()) {
                (Some(byte), None) if byte.is_ascii() => Ok(byte),
                _ => bail!("delimiter must be a single ASCII character or \"tab\""),
            }
        }
    }
}

fn write_json<T: serde::Serialize>(path: &Path, value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value)?;
    fs::write(path, json).with_context(|| format!("write {}", path.display()))?;
    Ok(())
}

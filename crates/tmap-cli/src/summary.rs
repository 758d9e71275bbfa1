//! Terminal summary tables for the pipeline run.

use comfy_table::modifiers::{UTF8_ROUND_CORNERS, UTF8_SOLID_INNER_BORDERS};
use comfy_table::presets::UTF8_FULL;
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};

use crate::types::RunResult;

const PREVIEW_LIMIT: usize = 10;

pub fn print_run_summary(result: &RunResult) {
    println!("Table: {}", result.table.display());
    println!("Source: {}", result.source.display());
    match &result.table_out {
        Some(path) => println!("Output: {}", path.display()),
        None => println!("Output: (dry run, nothing written)"),
    }
    if let Some(path) = &result.plan_out {
        println!("Render plan: {}", path.display());
    }

    let mut table = Table::new();
    table.set_header(vec![header_cell("Metric"), header_cell("Value")]);
    apply_summary_table_style(&mut table);
    align_column(&mut table, 1, CellAlignment::Right);

    table.add_row(vec![Cell::new("Features"), Cell::new(result.features)]);
    table.add_row(vec![
        Cell::new("Value fields"),
        Cell::new(result.report.applied_fields.len()),
    ]);
    table.add_row(vec![Cell::new("Matched"), Cell::new(result.report.matched)]);
    table.add_row(vec![
        Cell::new("Unmatched"),
        count_cell(result.report.unmatched, Color::Yellow),
    ]);
    table.add_row(vec![
        Cell::new("Parse failures"),
        count_cell(result.report.failures.len(), Color::Red),
    ]);
    table.add_row(vec![
        Cell::new("Unconsumed keys"),
        count_cell(result.report.unconsumed_keys.len(), Color::Yellow),
    ]);
    if !result.label_fields.is_empty() {
        table.add_row(vec![
            Cell::new("Label fields"),
            Cell::new(result.label_fields.join(", ")),
        ]);
        table.add_row(vec![
            Cell::new("Extrema groups"),
            Cell::new(result.extrema_groups),
        ]);
        table.add_row(vec![
            Cell::new("Extrema failures"),
            count_cell(result.extrema_failures, Color::Red),
        ]);
    }
    if !result.render_jobs.is_empty() {
        table.add_row(vec![
            Cell::new("Planned renders"),
            Cell::new(result.render_jobs.len()),
        ]);
    }
    println!("{table}");

    print_preview(
        "Unconsumed source keys",
        result.report.unconsumed_keys.iter().map(String::as_str),
        result.report.unconsumed_keys.len(),
    );
    let failure_lines: Vec<String> = result
        .report
        .failures
        .iter()
        .map(|f| format!("feature {} field {} value {:?}", f.feature, f.field, f.raw))
        .collect();
    print_preview(
        "Parse failures",
        failure_lines.iter().map(String::as_str),
        failure_lines.len(),
    );
}

pub fn print_columns(path: &std::path::Path, columns: &[String]) {
    println!("Columns of {}:", path.display());
    let mut table = Table::new();
    table.set_header(vec![header_cell("#"), header_cell("Name")]);
    apply_summary_table_style(&mut table);
    align_column(&mut table, 0, CellAlignment::Right);
    for (index, name) in columns.iter().enumerate() {
        table.add_row(vec![Cell::new(index), Cell::new(name)]);
    }
    println!("{table}");
}

fn print_preview<'a>(title: &str, lines: impl Iterator<Item = &'a str>, total: usize) {
    if total == 0 {
        return;
    }
    println!("{title} ({total}):");
    for line in lines.take(PREVIEW_LIMIT) {
        println!("- {line}");
    }
    if total > PREVIEW_LIMIT {
        println!("... and {} more", total - PREVIEW_LIMIT);
    }
}

fn apply_summary_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .apply_modifier(UTF8_SOLID_INNER_BORDERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(100);
}

fn align_column(table: &mut Table, index: usize, alignment: CellAlignment) {
    if let Some(column) = table.column_mut(index) {
        column.set_cell_alignment(alignment);
    }
}

fn header_cell(label: &str) -> Cell {
    Cell::new(label)
        .fg(Color::Cyan)
        .add_attribute(Attribute::Bold)
}

fn count_cell(count: usize, color: Color) -> Cell {
    if count > 0 {
        Cell::new(count).fg(color).add_attribute(Attribute::Bold)
    } else {
        Cell::new(count).fg(Color::DarkGrey)
    }
}

//! Terminal summary of a generation run.

use comfy_table::{presets::UTF8_FULL, Cell, Color, Table};
use drift_core::DriftConfig;
use drift_generator::{RowPlan, RunMetrics};
use drift_populate::PopulateMetrics;

/// Format the row plan of a run as a table.
pub fn format_plan(plan: &RowPlan) -> String {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    table.set_header(vec!["Day", "Rows", "First row"]);

    for (day, rows) in plan.as_map() {
        table.add_row(vec![
            Cell::new(day),
            Cell::new(format_number(rows)),
            Cell::new(format_number(plan.offset(day))),
        ]);
    }
    table.add_row(vec![
        Cell::new("TOTAL").fg(Color::Cyan),
        Cell::new(format_number(plan.total_rows())),
        Cell::new("-"),
    ]);

    table.to_string()
}

/// Format the metrics of a finished run.
pub fn format_summary(
    config: &DriftConfig,
    run: &RunMetrics,
    populate: &PopulateMetrics,
) -> String {
    let mut output = String::new();

    let mut days = Table::new();
    days.load_preset(UTF8_FULL);
    days.set_header(vec!["Day", "Rows"]);
    for (day, rows) in &run.rows_per_day {
        days.add_row(vec![Cell::new(day), Cell::new(format_number(*rows))]);
    }
    output.push_str(&days.to_string());
    output.push('\n');

    let mut columns = Table::new();
    columns.load_preset(UTF8_FULL);
    columns.set_header(vec![
        "Column",
        "Type",
        "Transitions",
        "At",
        "First day",
        "Active rows",
        "Nulls",
        "Zeros",
        "Strings",
    ]);
    for (spec, report) in config.columns.iter().zip(&run.columns) {
        let metrics = &report.metrics;
        let first_day = match metrics.first_active_day {
            Some(day) => Cell::new(day).fg(Color::Yellow),
            None if spec.has_transitions() => Cell::new("not reached"),
            None => Cell::new("-"),
        };
        columns.add_row(vec![
            Cell::new(&spec.name),
            Cell::new(spec.data_type),
            Cell::new(spec.transition_type),
            Cell::new(format!("{:.0}%", spec.transition_percentage * 100.0)),
            first_day,
            Cell::new(format_number(metrics.activated_rows)),
            Cell::new(format_number(metrics.nulls)),
            Cell::new(format_number(metrics.zeros)),
            Cell::new(format_number(metrics.stringified)),
        ]);
    }
    output.push_str(&columns.to_string());
    output.push('\n');

    output.push_str(&format!(
        "{} files, {} rows, {} bytes in {:.2}s ({:.1} rows/sec)\n",
        populate.files_written,
        format_number(populate.rows_written),
        format_number(populate.bytes_written),
        populate.total_duration.as_secs_f64(),
        populate.rows_per_second()
    ));

    output
}

/// Format a number with thousands separators.
fn format_number(n: u64) -> String {
    let s = n.to_string();
    let mut result = String::new();
    let chars: Vec<char> = s.chars().collect();

    for (i, c) in chars.iter().enumerate() {
        if i > 0 && (chars.len() - i) % 3 == 0 {
            result.push(',');
        }
        result.push(*c);
    }

    result
}

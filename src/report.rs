//! Tabular view of an analysis for the CLI and exports.

use crate::analysis::CriticalPathAnalysis;
use crate::task::{Task, TaskId};
use chrono::{Duration, NaiveDate};
use polars::prelude::*;
use std::collections::HashMap;

/// One row per analysed task, ordered by early start then id.
///
/// Day offsets are projected onto the calendar with the earliest task start
/// as day 0; finish columns hold the last day of the task, inclusive.
pub fn analysis_dataframe(
    tasks: &[Task],
    analysis: &CriticalPathAnalysis,
) -> PolarsResult<DataFrame> {
    let rows = analysis.rows();
    let anchor = tasks.iter().map(|t| t.start_date).min();
    let by_id: HashMap<&TaskId, &Task> = tasks.iter().map(|t| (&t.id, t)).collect();
    let find = |row_id: &TaskId| by_id.get(row_id).copied();

    let ids: Vec<String> = rows.iter().map(|r| r.id.to_string()).collect();
    let names: Vec<Option<&str>> = rows
        .iter()
        .map(|r| find(&r.id).and_then(|t| t.name.as_deref()))
        .collect();
    let starts: Vec<Option<i32>> = rows
        .iter()
        .map(|r| find(&r.id).map(|t| date_to_i32(t.start_date)))
        .collect();
    let ends: Vec<Option<i32>> = rows
        .iter()
        .map(|r| find(&r.id).map(|t| date_to_i32(t.end_date)))
        .collect();
    let offset_date = |offset: i64| anchor.map(|a| date_to_i32(a + Duration::days(offset)));

    let mut columns: Vec<Column> = Vec::with_capacity(11);
    let id_refs: Vec<&str> = ids.iter().map(String::as_str).collect();
    columns.push(Series::new(PlSmallStr::from_static("id"), id_refs).into_column());
    columns.push(Series::new(PlSmallStr::from_static("name"), names).into_column());
    columns.push(date_series("start_date", starts)?.into_column());
    columns.push(date_series("end_date", ends)?.into_column());

    let durations: Vec<i64> = rows.iter().map(|r| r.timing.duration_days).collect();
    columns.push(Series::new(PlSmallStr::from_static("duration_days"), durations).into_column());

    let es: Vec<Option<i32>> = rows.iter().map(|r| offset_date(r.timing.early_start)).collect();
    let ef: Vec<Option<i32>> = rows
        .iter()
        .map(|r| offset_date(r.timing.early_finish - 1))
        .collect();
    let ls: Vec<Option<i32>> = rows.iter().map(|r| offset_date(r.timing.late_start)).collect();
    let lf: Vec<Option<i32>> = rows
        .iter()
        .map(|r| offset_date(r.timing.late_finish - 1))
        .collect();
    columns.push(date_series("early_start", es)?.into_column());
    columns.push(date_series("early_finish", ef)?.into_column());
    columns.push(date_series("late_start", ls)?.into_column());
    columns.push(date_series("late_finish", lf)?.into_column());

    let slack: Vec<i64> = rows.iter().map(|r| r.timing.slack).collect();
    columns.push(Series::new(PlSmallStr::from_static("slack_days"), slack).into_column());
    let critical: Vec<bool> = rows.iter().map(|r| r.is_critical).collect();
    columns.push(Series::new(PlSmallStr::from_static("is_critical"), critical).into_column());

    DataFrame::new(columns)
}

fn date_series(name: &str, days: Vec<Option<i32>>) -> PolarsResult<Series> {
    Series::new(name.into(), days).cast(&DataType::Date)
}

fn date_to_i32(date: NaiveDate) -> i32 {
    // NaiveDate::default() is 1970-01-01, the epoch polars counts from
    (date - NaiveDate::default()).num_days() as i32
}

fn cell_text(av: &AnyValue) -> String {
    match av {
        AnyValue::Null => String::new(),
        AnyValue::Int32(v) => v.to_string(),
        AnyValue::Int64(v) => v.to_string(),
        AnyValue::String(s) => s.to_string(),
        AnyValue::Boolean(b) => if *b { "yes" } else { "" }.to_string(),
        _ => av.to_string(),
    }
}

fn display_width(s: &str) -> usize {
    s.chars().count()
}

/// Boxed plain-text table, one line per row.
pub fn render_table(df: &DataFrame) -> String {
    let columns = df.get_columns();
    let col_names: Vec<String> = columns.iter().map(|c| c.name().to_string()).collect();

    let cells: Vec<Vec<String>> = (0..df.height())
        .map(|row_idx| {
            columns
                .iter()
                .map(|col| col.get(row_idx).map(|av| cell_text(&av)).unwrap_or_default())
                .collect()
        })
        .collect();

    // Compute column widths
    let mut widths: Vec<usize> = col_names.iter().map(|n| display_width(n)).collect();
    for row in &cells {
        for (ci, s) in row.iter().enumerate() {
            widths[ci] = widths[ci].max(display_width(s));
        }
    }

    let mut sep = String::from("+");
    for w in &widths {
        sep.push_str(&"-".repeat(*w + 2));
        sep.push('+');
    }

    let render_row = |values: &[String]| {
        let mut line = String::from("|");
        for (ci, s) in values.iter().enumerate() {
            line.push(' ');
            line.push_str(s);
            line.push_str(&" ".repeat(widths[ci].saturating_sub(display_width(s))));
            line.push_str(" |");
        }
        line
    };

    let mut out = String::new();
    out.push_str(&sep);
    out.push('\n');
    out.push_str(&render_row(&col_names));
    out.push('\n');
    out.push_str(&sep);
    out.push('\n');
    for row in &cells {
        out.push_str(&render_row(row));
        out.push('\n');
    }
    out.push_str(&sep);
    out.push('\n');
    out
}

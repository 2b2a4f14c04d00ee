//! Console rendering helpers shared by the provider reports.
//!
//! Record-shaped data (arrays of flat objects, or date-keyed objects of flat objects)
//! becomes a table; everything else is printed as `key: value` lines or indented JSON.

use serde_json::{Map, Value};
use tabled::{builder::Builder, settings::Style};

/// Separator printed between sampled entries.
pub const SEPARATOR: &str = "----------------------------------------";

/// Display a JSON scalar without quotes; objects and arrays fall back to compact JSON.
pub fn cell(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    }
}

/// `"1. open"` -> `"open"`. Alpha Vantage numbers its field names.
pub fn clean_column(name: &str) -> &str {
    match name.split_once(". ") {
        Some((prefix, rest))
            if prefix.starts_with(|c: char| c.is_ascii_digit())
                && prefix.chars().all(|c| c.is_ascii_alphanumeric()) =>
        {
            rest
        }
        _ => name,
    }
}

/// Column names in first-seen order across `records`.
pub fn columns_of(records: &[Value]) -> Vec<String> {
    let mut columns: Vec<String> = Vec::new();
    for rec in records {
        if let Some(obj) = rec.as_object() {
            for key in obj.keys() {
                if !columns.iter().any(|c| c == key) {
                    columns.push(key.clone());
                }
            }
        }
    }
    columns
}

/// Table of the first `limit` records of an array of objects.
pub fn records_table(records: &[Value], limit: usize) -> String {
    let shown = &records[..records.len().min(limit)];
    let columns = columns_of(shown);
    let mut builder = Builder::default();
    builder.push_record(columns.iter().cloned());
    for rec in shown {
        builder.push_record(columns.iter().map(|c| cell(rec.get(c))));
    }
    let mut table = builder.build();
    table.with(Style::psql());
    table.to_string()
}

/// Dates of a date-keyed series, newest first.
pub fn series_dates(series: &Map<String, Value>) -> Vec<&str> {
    let mut dates: Vec<&str> = series.keys().map(String::as_str).collect();
    dates.sort_unstable_by(|a, b| b.cmp(a));
    dates
}

/// `(oldest, newest)` date of a series, or `None` when empty.
pub fn series_period(series: &Map<String, Value>) -> Option<(&str, &str)> {
    let dates = series_dates(series);
    Some((*dates.last()?, *dates.first()?))
}

/// Table of the newest `limit` entries of a date-keyed series. Fields for which `keep`
/// returns false are dropped; column names are cleaned with [`clean_column`].
pub fn series_table(
    series: &Map<String, Value>,
    limit: usize,
    keep: impl Fn(&str) -> bool,
) -> String {
    let dates: Vec<&str> = series_dates(series).into_iter().take(limit).collect();
    let rows: Vec<&Value> = dates.iter().filter_map(|d| series.get(*d)).collect();

    let mut fields: Vec<&str> = Vec::new();
    for row in &rows {
        if let Some(obj) = row.as_object() {
            for key in obj.keys().map(String::as_str).filter(|k| keep(k)) {
                if !fields.contains(&key) {
                    fields.push(key);
                }
            }
        }
    }

    let mut builder = Builder::default();
    builder.push_record(
        std::iter::once("date".to_string()).chain(fields.iter().map(|f| clean_column(f).to_string())),
    );
    for (date, row) in dates.iter().zip(&rows) {
        builder.push_record(
            std::iter::once(date.to_string()).chain(fields.iter().map(|f| cell(row.get(*f)))),
        );
    }
    let mut table = builder.build();
    table.with(Style::psql());
    table.to_string()
}

/// `  key: value` lines for every entry of an object.
pub fn key_values(map: &Map<String, Value>, indent: usize) -> String {
    let pad = " ".repeat(indent);
    map.iter()
        .map(|(k, v)| format!("{pad}{k}: {}", cell(Some(v))))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Two-space indented JSON.
pub fn pretty(value: &Value) -> String {
    serde_json::to_string_pretty(value).unwrap_or_else(|_| value.to_string())
}

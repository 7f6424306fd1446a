pub mod csv_out;
pub mod json;
pub mod minimal;
pub mod table;

use crate::OutputFormat;
use serde_json::Value;
use std::io::{self, Write};

/// Dispatch output to the appropriate formatter.
pub fn format_output(format: &OutputFormat, value: &Value, out: &mut dyn Write) -> io::Result<()> {
    match format {
        OutputFormat::Json => json::write_json(out, value),
        OutputFormat::Table => table::write_table(out, value),
        OutputFormat::Csv => csv_out::write_csv(out, value),
        OutputFormat::Minimal => minimal::write_minimal(out, value),
    }
}

/// Render a JSON scalar for human-facing formats.
pub(crate) fn format_scalar(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null => String::new(),
        _ => serde_json::to_string(value).unwrap_or_default(),
    }
}

/// Split an object into scalar fields and arrays of row objects.
pub(crate) fn partition_fields(
    map: &serde_json::Map<String, Value>,
) -> (Vec<(&str, &Value)>, Vec<(&str, &[Value])>) {
    let mut scalars = Vec::new();
    let mut tables = Vec::new();
    for (key, val) in map {
        match val {
            Value::Array(rows) if rows.first().is_some_and(Value::is_object) => {
                tables.push((key.as_str(), rows.as_slice()))
            }
            _ => scalars.push((key.as_str(), val)),
        }
    }
    (scalars, tables)
}

/// Headers of an array of row objects, taken from the first row.
pub(crate) fn row_headers(rows: &[Value]) -> Vec<String> {
    match rows.first() {
        Some(Value::Object(first)) => first.keys().cloned().collect(),
        _ => Vec::new(),
    }
}

/// Cell values of a row object in header order.
pub(crate) fn row_cells(row: &Value, headers: &[String]) -> Vec<String> {
    headers
        .iter()
        .map(|h| row.get(h.as_str()).map(format_scalar).unwrap_or_default())
        .collect()
}

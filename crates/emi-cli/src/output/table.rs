use serde_json::Value;
use std::io::{self, Write};
use tabled::{builder::Builder, Table};

use super::{format_scalar, partition_fields, row_cells, row_headers};

/// Format output as tables using the tabled crate.
///
/// Scalar result fields go in a Field/Value table; each array of rows
/// (the amortization schedule) gets its own table underneath.
pub fn write_table(out: &mut dyn Write, value: &Value) -> io::Result<()> {
    match value {
        Value::Object(map) => match map.get("result") {
            Some(Value::Object(result)) => {
                write_object(out, result)?;
                write_envelope_notes(out, map)
            }
            _ => write_object(out, map),
        },
        Value::Array(rows) => write_rows(out, rows),
        _ => writeln!(out, "{}", format_scalar(value)),
    }
}

fn write_object(out: &mut dyn Write, map: &serde_json::Map<String, Value>) -> io::Result<()> {
    let (scalars, tables) = partition_fields(map);

    let mut builder = Builder::default();
    builder.push_record(["Field", "Value"]);
    for (key, val) in scalars {
        builder.push_record([key.to_string(), format_scalar(val)]);
    }
    writeln!(out, "{}", Table::from(builder))?;

    for (name, rows) in tables {
        writeln!(out, "\n{}:", name)?;
        write_rows(out, rows)?;
    }
    Ok(())
}

fn write_rows(out: &mut dyn Write, rows: &[Value]) -> io::Result<()> {
    let headers = row_headers(rows);
    if headers.is_empty() {
        if rows.is_empty() {
            return writeln!(out, "(empty)");
        }
        for item in rows {
            writeln!(out, "{}", format_scalar(item))?;
        }
        return Ok(());
    }

    let mut builder = Builder::default();
    builder.push_record(headers.clone());
    for row in rows {
        builder.push_record(row_cells(row, &headers));
    }
    writeln!(out, "{}", Table::from(builder))
}

fn write_envelope_notes(
    out: &mut dyn Write,
    envelope: &serde_json::Map<String, Value>,
) -> io::Result<()> {
    if let Some(Value::Array(warnings)) = envelope.get("warnings") {
        if !warnings.is_empty() {
            writeln!(out, "\nWarnings:")?;
            for w in warnings.iter().filter_map(Value::as_str) {
                writeln!(out, "  - {}", w)?;
            }
        }
    }

    if let Some(Value::String(meth)) = envelope.get("methodology") {
        writeln!(out, "\nMethodology: {}", meth)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn render(value: &Value) -> String {
        let mut buf = Vec::new();
        write_table(&mut buf, value).unwrap();
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn test_schedule_gets_its_own_table() {
        let value = json!({
            "result": {
                "periodic_payment_amount": "100",
                "schedule": [
                    {"period_index": 1, "remaining_balance": "50"},
                    {"period_index": 2, "remaining_balance": "0"}
                ]
            },
            "methodology": "Level-payment annuity amortization schedule",
            "warnings": ["Zero interest rate"]
        });
        let text = render(&value);
        assert!(text.contains("periodic_payment_amount"));
        assert!(text.contains("schedule:"));
        assert!(text.contains("remaining_balance"));
        assert!(text.contains("  - Zero interest rate"));
        assert!(text.contains("Methodology: Level-payment annuity amortization schedule"));
    }

    #[test]
    fn test_empty_array() {
        assert_eq!(render(&json!([])), "(empty)\n");
    }
}

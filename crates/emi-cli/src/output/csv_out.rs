use serde_json::Value;
use std::io::{self, Write};

use super::{format_scalar, partition_fields, row_cells, row_headers};

/// Write output as CSV.
///
/// A result holding a schedule is written one row per period; otherwise a
/// two-column field/value sheet.
pub fn write_csv(out: &mut dyn Write, value: &Value) -> io::Result<()> {
    let mut wtr = csv::Writer::from_writer(out);

    match value {
        Value::Object(map) => {
            let fields = match map.get("result") {
                Some(Value::Object(result)) => result,
                _ => map,
            };
            let (scalars, tables) = partition_fields(fields);
            if let Some((_, rows)) = tables.first() {
                write_rows(&mut wtr, rows)?;
            } else {
                wtr.write_record(["field", "value"])?;
                for (key, val) in scalars {
                    wtr.write_record([key, format_scalar(val).as_str()])?;
                }
            }
        }
        Value::Array(rows) => write_rows(&mut wtr, rows)?,
        _ => wtr.write_record([format_scalar(value)])?,
    }

    wtr.flush()
}

fn write_rows<W: Write>(wtr: &mut csv::Writer<W>, rows: &[Value]) -> io::Result<()> {
    let headers = row_headers(rows);
    if headers.is_empty() {
        for item in rows {
            wtr.write_record([format_scalar(item)])?;
        }
        return Ok(());
    }

    wtr.write_record(&headers)?;
    for row in rows {
        wtr.write_record(row_cells(row, &headers))?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn render(value: &Value) -> String {
        let mut buf = Vec::new();
        write_csv(&mut buf, value).unwrap();
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn test_schedule_rows() {
        let value = json!({
            "result": {
                "total_periods": 2,
                "schedule": [
                    {"period_index": 1, "remaining_balance": "50"},
                    {"period_index": 2, "remaining_balance": "0"}
                ]
            }
        });
        assert_eq!(
            render(&value),
            "period_index,remaining_balance\n1,50\n2,0\n"
        );
    }

    #[test]
    fn test_field_value_sheet() {
        let value = json!({"result": {"monthly_payment": "4395.56"}});
        assert_eq!(render(&value), "field,value\nmonthly_payment,4395.56\n");
    }
}

use serde_json::Value;
use std::io::{self, Write};

use super::format_scalar;

/// Key answer fields, in priority order.
const PRIORITY_KEYS: [&str; 4] = [
    "periodic_payment_amount",
    "monthly_payment",
    "total_interest",
    "total_amount",
];

/// Print just the key answer value from the output.
pub fn write_minimal(out: &mut dyn Write, value: &Value) -> io::Result<()> {
    let result_obj = value
        .as_object()
        .and_then(|m| m.get("result"))
        .unwrap_or(value);

    if let Value::Object(map) = result_obj {
        for key in PRIORITY_KEYS {
            if let Some(val) = map.get(key).filter(|v| !v.is_null()) {
                return writeln!(out, "{}", format_scalar(val));
            }
        }

        if let Some((key, val)) = map.iter().next() {
            return writeln!(out, "{}: {}", key, format_scalar(val));
        }
    }

    writeln!(out, "{}", format_scalar(result_obj))
}

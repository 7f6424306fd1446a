use serde_json::Value;
use std::io::{self, Write};

/// Pretty-printed JSON followed by a newline.
pub fn write_json(out: &mut dyn Write, value: &Value) -> io::Result<()> {
    serde_json::to_writer_pretty(&mut *out, value)?;
    writeln!(out)
}

use serde_json::Value;

use crate::Result;

/// A command that can be sent to a device.
///
/// One instance is shared by every device of a run, so implementations must be
/// stateless or synchronise internally.
pub trait DeviceCommand: Send + Sync {
    /// Literal text written to the device.
    fn command_text(&self) -> String;

    /// Turns the raw device output into structured data.
    fn parse(&self, raw_output: &str) -> Result<Value>;

    /// Short label used by diagnostics.
    fn label(&self) -> &str {
        ""
    }

    /// Column headers for tabular rendering of list results.
    fn table_headers(&self) -> Option<&'static [&'static str]> {
        None
    }

    /// One-line summary of a parsed result.
    fn summarise(&self, result: &Value) -> String {
        default_summary(result)
    }

    /// Human-readable rendering of a parsed result.
    fn render(&self, result: &Value) -> String {
        match (self.table_headers(), result) {
            (Some(headers), Value::Array(rows)) => render_table(headers, rows),
            _ => serde_json::to_string_pretty(result).unwrap_or_else(|_| result.to_string()),
        }
    }
}

pub fn default_summary(result: &Value) -> String {
    match result {
        Value::Array(items) if items.is_empty() => "[empty list]".to_string(),
        Value::Array(items) => format!("{} entries", items.len()),
        Value::Object(fields) if fields.is_empty() => "[empty dict]".to_string(),
        Value::Object(fields) => format!("{} fields", fields.len()),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Renders rows of objects as a left-aligned text table.
pub fn render_table(headers: &[&str], rows: &[Value]) -> String {
    let cells: Vec<Vec<String>> = rows
        .iter()
        .map(|row| headers.iter().map(|h| cell(row.get(*h))).collect())
        .collect();

    let widths: Vec<usize> = headers
        .iter()
        .enumerate()
        .map(|(i, h)| {
            cells
                .iter()
                .map(|row| row[i].chars().count())
                .chain(std::iter::once(h.chars().count()))
                .max()
                .unwrap_or(0)
        })
        .collect();

    let mut lines: Vec<String> = Vec::with_capacity(rows.len() + 2);
    lines.push(join_padded(headers.iter().map(|h| h.to_string()), &widths));
    lines.push(
        widths
            .iter()
            .map(|w| "-".repeat(*w))
            .collect::<Vec<String>>()
            .join("  "),
    );
    for row in cells {
        lines.push(join_padded(row.into_iter(), &widths));
    }
    lines.join("\n")
}

fn join_padded(values: impl Iterator<Item = String>, widths: &[usize]) -> String {
    values
        .zip(widths)
        .map(|(v, w)| format!("{v:<w$}"))
        .collect::<Vec<String>>()
        .join("  ")
        .trim_end()
        .to_string()
}

fn cell(value: Option<&Value>) -> String {
    match value {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Null) | None => String::new(),
        Some(other) => other.to_string(),
    }
}

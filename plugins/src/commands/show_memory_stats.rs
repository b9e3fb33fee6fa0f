//! `show memory statistics`, reduced to the processor pool.

use serde_json::{Map, Value, json};

use netrun_common::plugin::{
    CommandPlugin, DeviceCommand, Plugin, PluginConfig, PluginDescriptor,
};
use netrun_common::{Error, Result};

const HEADERS: &[&str] = &["TOTAL_BYTES", "USED_BYTES", "FREE_BYTES"];

/// Usage at or above this percentage is flagged.
pub const HIGH_USAGE_PERCENT: f64 = 85.0;

#[derive(Debug, Default)]
pub struct ShowMemoryStats;

impl Plugin for ShowMemoryStats {
    const NAME: &'static str = "show-memory-stats";
}

impl CommandPlugin for ShowMemoryStats {
    fn from_config(_config: &PluginConfig) -> Result<Self> {
        Ok(Self)
    }
}

impl DeviceCommand for ShowMemoryStats {
    fn command_text(&self) -> String {
        "show memory statistics".to_string()
    }

    fn parse(&self, raw_output: &str) -> Result<Value> {
        let mut seen_header: bool = false;
        for line in raw_output.lines() {
            if line.contains("Total(b)") {
                seen_header = true;
                continue;
            }
            if !seen_header {
                continue;
            }
            let cols: Vec<&str> = line.split_whitespace().collect();
            if cols.first() != Some(&"Processor") || cols.len() < 5 {
                continue;
            }
            let mut row: Map<String, Value> = Map::new();
            for (header, col) in HEADERS.iter().zip(&cols[2..5]) {
                let bytes: u64 = col.parse().map_err(|_| {
                    Error::command(format!("'{col}' is not a byte count in the processor pool row"))
                })?;
                row.insert(header.to_string(), json!(bytes));
            }
            return Ok(Value::Array(vec![Value::Object(row)]));
        }
        Err(Error::command("no processor pool in 'show memory statistics' output"))
    }

    fn label(&self) -> &str {
        "Memory Stats"
    }

    fn table_headers(&self) -> Option<&'static [&'static str]> {
        Some(HEADERS)
    }

    fn summarise(&self, result: &Value) -> String {
        let Some(row) = result.get(0) else {
            return "[no output]".to_string();
        };
        let bytes = |key: &str| row.get(key).and_then(Value::as_f64);
        let (Some(total), Some(used)) = (bytes("TOTAL_BYTES"), bytes("USED_BYTES")) else {
            return "[parse error]".to_string();
        };
        if total <= 0.0 {
            return "[parse error]".to_string();
        }

        let percent: f64 = used / total * 100.0;
        let status: &str = if percent >= HIGH_USAGE_PERCENT { "HIGH" } else { "OK" };
        format!(
            "{:.1}MB / {:.1}MB ({percent:.1}%) - {status}",
            used / 1e6,
            total / 1e6
        )
    }
}

pub fn descriptors() -> Result<Vec<PluginDescriptor>> {
    Ok(vec![PluginDescriptor::command::<ShowMemoryStats>()])
}

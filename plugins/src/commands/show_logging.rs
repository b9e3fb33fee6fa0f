//! `show logging`, one row per buffered syslog message.
//!
//! Entries look like `*Mar  1 00:00:05.123: %SYS-5-CONFIG_I: text`. Lines
//! that do not carry a `%FACILITY-SEVERITY-MNEMONIC` tag are skipped.

use serde_json::{Map, Value};

use netrun_common::Result;
use netrun_common::plugin::{
    CommandPlugin, DeviceCommand, Plugin, PluginConfig, PluginDescriptor,
};

const HEADERS: &[&str] = &[
    "MONTH", "DAY", "TIME", "FACILITY", "SEVERITY", "MNEMONIC", "MESSAGE",
];

const SEVERITY_LABELS: [&str; 8] = [
    "Emergency", "Alert", "Critical", "Error", "Warning", "Notice", "Info", "Debug",
];

#[derive(Debug, Default)]
pub struct ShowLogging;

impl Plugin for ShowLogging {
    const NAME: &'static str = "show-logging";
}

impl CommandPlugin for ShowLogging {
    fn from_config(_config: &PluginConfig) -> Result<Self> {
        Ok(Self)
    }
}

impl DeviceCommand for ShowLogging {
    fn command_text(&self) -> String {
        "show logging".to_string()
    }

    fn parse(&self, raw_output: &str) -> Result<Value> {
        Ok(Value::Array(raw_output.lines().filter_map(entry).collect()))
    }

    fn label(&self) -> &str {
        "System Logging"
    }

    fn table_headers(&self) -> Option<&'static [&'static str]> {
        Some(HEADERS)
    }

    fn summarise(&self, result: &Value) -> String {
        let entries: &[Value] = result.as_array().map(Vec::as_slice).unwrap_or_default();
        if entries.is_empty() {
            return "[no log entries]".to_string();
        }

        let mut counts: [usize; 8] = [0; 8];
        for severity in entries
            .iter()
            .filter_map(|e| e.get("SEVERITY").and_then(Value::as_str))
            .filter_map(|s| s.parse::<usize>().ok())
        {
            if let Some(count) = counts.get_mut(severity) {
                *count += 1;
            }
        }

        counts
            .iter()
            .zip(SEVERITY_LABELS)
            .filter(|(count, _)| **count > 0)
            .map(|(count, label)| format!("{count}x {label}"))
            .collect::<Vec<String>>()
            .join(", ")
    }
}

fn entry(line: &str) -> Option<Value> {
    let line: &str = line.trim().trim_start_matches(['*', '.']);
    let (stamp, rest) = line.split_once(": %")?;

    let mut stamp = stamp.split_whitespace();
    let (month, day, time) = (stamp.next()?, stamp.next()?, stamp.next()?);

    let (tag, message) = rest.split_once(": ").unwrap_or((rest.trim_end_matches(':'), ""));
    let mut tag = tag.splitn(3, '-');
    let (facility, severity, mnemonic) = (tag.next()?, tag.next()?, tag.next()?);
    if !matches!(severity.as_bytes(), [b'0'..=b'7']) {
        return None;
    }

    let values = [month, day, time, facility, severity, mnemonic, message.trim()];
    let row: Map<String, Value> = HEADERS
        .iter()
        .zip(values)
        .map(|(h, v)| (h.to_string(), Value::String(v.to_string())))
        .collect();
    Some(Value::Object(row))
}

pub fn descriptors() -> Result<Vec<PluginDescriptor>> {
    Ok(vec![PluginDescriptor::command::<ShowLogging>()])
}

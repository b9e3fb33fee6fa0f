//! `show processes cpu sorted`, filtered to busy processes.
//!
//! Every row repeats the five second utilisation of the whole device next to
//! one process, so the first row is enough for the summary.

use serde_json::{Map, Value};

use netrun_common::plugin::{
    CommandPlugin, DeviceCommand, Plugin, PluginConfig, PluginDescriptor,
};
use netrun_common::{Error, Result};

const HEADERS: &[&str] = &["CPU_USAGE_5_SEC", "PROCESS_NAME", "PROCESS_CPU_USAGE_5_SEC"];
const UTILISATION_PREFIX: &str = "CPU utilization for five seconds:";
/// PID, runtime, invoked, uSecs, 5Sec, 1Min, 5Min, TTY, then the process name.
const PROCESS_COLUMNS: usize = 9;
const HIGH_USAGE_PERCENT: i64 = 85;

#[derive(Debug, Default)]
pub struct ShowProcessesCpu;

impl Plugin for ShowProcessesCpu {
    const NAME: &'static str = "show-processes-cpu";
}

impl CommandPlugin for ShowProcessesCpu {
    fn from_config(_config: &PluginConfig) -> Result<Self> {
        Ok(Self)
    }
}

impl DeviceCommand for ShowProcessesCpu {
    fn command_text(&self) -> String {
        "show processes cpu sorted | exclude 0.00%".to_string()
    }

    fn parse(&self, raw_output: &str) -> Result<Value> {
        let usage: &str = raw_output
            .lines()
            .find_map(|line| line.trim().strip_prefix(UTILISATION_PREFIX))
            .and_then(|rest| rest.trim().split(['%', '/']).next())
            .map(str::trim)
            .filter(|usage| !usage.is_empty())
            .ok_or_else(|| Error::command("no CPU utilisation line in 'show processes cpu' output"))?;

        let mut rows: Vec<Value> = raw_output
            .lines()
            .filter_map(|line| {
                let cols: Vec<&str> = line.split_whitespace().collect();
                if cols.len() < PROCESS_COLUMNS || cols[0].parse::<u32>().is_err() {
                    return None;
                }
                Some(row(usage, &cols[8..].join(" "), cols[4].trim_end_matches('%')))
            })
            .collect();

        if rows.is_empty() {
            rows.push(row(usage, "", ""));
        }
        Ok(Value::Array(rows))
    }

    fn label(&self) -> &str {
        "CPU Stats"
    }

    fn table_headers(&self) -> Option<&'static [&'static str]> {
        Some(HEADERS)
    }

    fn summarise(&self, result: &Value) -> String {
        let Some(first) = result.get(0) else {
            return "[no output]".to_string();
        };
        let usage: Option<i64> = first
            .get("CPU_USAGE_5_SEC")
            .and_then(Value::as_str)
            .and_then(|s| s.parse().ok());
        match usage {
            Some(usage) if usage >= HIGH_USAGE_PERCENT => format!("{usage}% (5s avg) - HIGH"),
            Some(usage) => format!("{usage}% (5s avg) - OK"),
            None => "[parse error]".to_string(),
        }
    }
}

fn row(usage: &str, process: &str, process_usage: &str) -> Value {
    let mut row: Map<String, Value> = Map::new();
    row.insert("CPU_USAGE_5_SEC".into(), Value::String(usage.to_string()));
    row.insert("PROCESS_NAME".into(), Value::String(process.to_string()));
    row.insert("PROCESS_CPU_USAGE_5_SEC".into(), Value::String(process_usage.to_string()));
    Value::Object(row)
}

pub fn descriptors() -> Result<Vec<PluginDescriptor>> {
    Ok(vec![PluginDescriptor::command::<ShowProcessesCpu>()])
}

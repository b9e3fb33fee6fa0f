//! `show version` for IOS-style devices.
//!
//! The parser reads the handful of lines every IOS release prints in the same
//! shape and ignores the rest.

use serde_json::{Map, Value};

use netrun_common::plugin::{
    CommandPlugin, DeviceCommand, Plugin, PluginConfig, PluginDescriptor,
};
use netrun_common::{Error, Result};

const HEADERS: &[&str] = &[
    "HOSTNAME",
    "SOFTWARE_IMAGE",
    "VERSION",
    "UPTIME",
    "RUNNING_IMAGE",
    "ROMMON",
    "RELEASE",
];

#[derive(Debug, Default)]
pub struct ShowVersion;

impl Plugin for ShowVersion {
    const NAME: &'static str = "show-version";
}

impl CommandPlugin for ShowVersion {
    fn from_config(_config: &PluginConfig) -> Result<Self> {
        Ok(Self)
    }
}

impl DeviceCommand for ShowVersion {
    fn command_text(&self) -> String {
        "show version".to_string()
    }

    fn parse(&self, raw_output: &str) -> Result<Value> {
        let mut row: Map<String, Value> = HEADERS
            .iter()
            .map(|h| (h.to_string(), Value::String(String::new())))
            .collect();

        for line in raw_output.lines().map(str::trim) {
            if let Some((host, uptime)) = line.split_once(" uptime is ") {
                set(&mut row, "HOSTNAME", host);
                set(&mut row, "UPTIME", uptime);
            } else if line.contains("Software") && line.contains("Version ") {
                if let Some(version) = between(line, "Version ", &[',', ' ']) {
                    set(&mut row, "VERSION", version);
                }
                if let Some(image) = between(line, "Software (", &[')']) {
                    set(&mut row, "SOFTWARE_IMAGE", image);
                }
                if let Some(release) = between(line, "RELEASE SOFTWARE (", &[')']) {
                    set(&mut row, "RELEASE", release);
                }
            } else if let Some(image) = line.strip_prefix("System image file is ") {
                set(&mut row, "RUNNING_IMAGE", image.trim_matches('"'));
            } else if let Some(rom) = line.strip_prefix("ROM: ") {
                set(&mut row, "ROMMON", rom);
            }
        }

        if row.get("VERSION").and_then(Value::as_str).is_none_or(str::is_empty) {
            return Err(Error::command("no software version found in 'show version' output"));
        }
        Ok(Value::Array(vec![Value::Object(row)]))
    }

    fn label(&self) -> &str {
        "Platform Info"
    }

    fn table_headers(&self) -> Option<&'static [&'static str]> {
        Some(HEADERS)
    }

    fn summarise(&self, result: &Value) -> String {
        let first: Option<&Value> = result.get(0);
        let field = |key: &str| -> String {
            first
                .and_then(|row| row.get(key))
                .and_then(Value::as_str)
                .filter(|s| !s.is_empty())
                .unwrap_or("N/A")
                .to_string()
        };
        format!("{} - {}", field("SOFTWARE_IMAGE"), field("VERSION"))
    }
}

fn set(row: &mut Map<String, Value>, key: &str, value: &str) {
    row.insert(key.to_string(), Value::String(value.trim().to_string()));
}

fn between<'a>(line: &'a str, start: &str, stops: &[char]) -> Option<&'a str> {
    let rest: &str = &line[line.find(start)? + start.len()..];
    let end: usize = rest.find(stops).unwrap_or(rest.len());
    Some(&rest[..end])
}

pub fn descriptors() -> Result<Vec<PluginDescriptor>> {
    Ok(vec![PluginDescriptor::command::<ShowVersion>()])
}

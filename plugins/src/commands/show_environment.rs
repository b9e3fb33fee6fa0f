//! `show environment`. Keeps the status lines as plain text.

use serde_json::{Value, json};

use netrun_common::Result;
use netrun_common::plugin::{
    CommandPlugin, DeviceCommand, Plugin, PluginConfig, PluginDescriptor,
};

#[derive(Debug, Default)]
pub struct ShowEnvironment;

impl Plugin for ShowEnvironment {
    const NAME: &'static str = "show-environment";
}

impl CommandPlugin for ShowEnvironment {
    fn from_config(_config: &PluginConfig) -> Result<Self> {
        Ok(Self)
    }
}

impl DeviceCommand for ShowEnvironment {
    fn command_text(&self) -> String {
        "show environment".to_string()
    }

    fn parse(&self, raw_output: &str) -> Result<Value> {
        let checks: Vec<&str> = raw_output
            .lines()
            .map(str::trim)
            .filter(|line| line.contains(" is "))
            .collect();
        Ok(json!({ "summary": checks }))
    }

    fn label(&self) -> &str {
        "Environment"
    }

    fn summarise(&self, result: &Value) -> String {
        match result.get("summary").and_then(Value::as_array) {
            Some(checks) if !checks.is_empty() => format!("{} checks OK", checks.len()),
            _ => "[no environment info]".to_string(),
        }
    }

    fn render(&self, result: &Value) -> String {
        result
            .get("summary")
            .and_then(Value::as_array)
            .map(|checks| {
                checks
                    .iter()
                    .filter_map(Value::as_str)
                    .collect::<Vec<&str>>()
                    .join("\n")
            })
            .unwrap_or_default()
    }
}

pub fn descriptors() -> Result<Vec<PluginDescriptor>> {
    Ok(vec![PluginDescriptor::command::<ShowEnvironment>()])
}

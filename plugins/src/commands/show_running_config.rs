use serde_json::{Value, json};

use netrun_common::Result;
use netrun_common::plugin::{
    CommandPlugin, DeviceCommand, Plugin, PluginConfig, PluginDescriptor,
};

#[derive(Debug, Default)]
pub struct ShowRunningConfig;

impl Plugin for ShowRunningConfig {
    const NAME: &'static str = "show-running-config";
}

impl CommandPlugin for ShowRunningConfig {
    fn from_config(_config: &PluginConfig) -> Result<Self> {
        Ok(Self)
    }
}

impl DeviceCommand for ShowRunningConfig {
    fn command_text(&self) -> String {
        "show running-config".to_string()
    }

    fn parse(&self, raw_output: &str) -> Result<Value> {
        let lines: Vec<&str> = raw_output.trim().lines().collect();
        Ok(json!({ "config_lines": lines }))
    }

    fn label(&self) -> &str {
        "Running Config"
    }

    fn summarise(&self, result: &Value) -> String {
        match config_lines(result) {
            Some(lines) => format!("{} lines of config", lines.len()),
            None => "[no output]".to_string(),
        }
    }

    fn render(&self, result: &Value) -> String {
        config_lines(result)
            .map(|lines| {
                lines
                    .iter()
                    .filter_map(Value::as_str)
                    .collect::<Vec<&str>>()
                    .join("\n")
            })
            .unwrap_or_default()
    }
}

fn config_lines(result: &Value) -> Option<&Vec<Value>> {
    result.get("config_lines").and_then(Value::as_array)
}

pub fn descriptors() -> Result<Vec<PluginDescriptor>> {
    Ok(vec![PluginDescriptor::command::<ShowRunningConfig>()])
}

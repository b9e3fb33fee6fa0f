use serde_json::{Value, json};
use tracing::debug;

use netrun_common::Result;
use netrun_common::plugin::{
    CommandPlugin, DeviceCommand, Plugin, PluginConfig, PluginDescriptor,
};

/// Connectivity check: sends `echo test` and keeps whatever comes back.
#[derive(Debug, Default)]
pub struct EchoTest;

impl Plugin for EchoTest {
    const NAME: &'static str = "echo-test";
}

impl CommandPlugin for EchoTest {
    fn from_config(_config: &PluginConfig) -> Result<Self> {
        Ok(Self)
    }
}

impl DeviceCommand for EchoTest {
    fn command_text(&self) -> String {
        "echo test".to_string()
    }

    fn parse(&self, raw_output: &str) -> Result<Value> {
        let raw: &str = raw_output.trim();
        debug!(raw, "parsing echo output");
        Ok(json!({ "raw": raw }))
    }

    fn label(&self) -> &str {
        "Echo"
    }

    fn render(&self, result: &Value) -> String {
        match result.get("raw") {
            Some(Value::String(raw)) => raw.clone(),
            _ => result.to_string(),
        }
    }
}

pub fn descriptors() -> Result<Vec<PluginDescriptor>> {
    Ok(vec![PluginDescriptor::command::<EchoTest>()])
}

use async_trait::async_trait;
use serde::Deserialize;

use netrun_common::plugin::{
    self, DeviceSource, Plugin, PluginConfig, PluginDescriptor, SourcePlugin,
};
use netrun_common::{Device, Result};

/// Devices written directly into the settings file:
///
/// ```yaml
/// plugin_configs:
///   inline:
///     devices:
///       - { name: lab, host: 127.0.0.1, protocol: loopback }
/// ```
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct InlineSource {
    devices: Vec<Device>,
}

impl InlineSource {
    pub fn new(devices: Vec<Device>) -> Self {
        Self { devices }
    }
}

impl Plugin for InlineSource {
    const NAME: &'static str = "inline";
}

impl SourcePlugin for InlineSource {
    fn from_config(config: &PluginConfig) -> Result<Self> {
        plugin::settings(Self::NAME, config)
    }
}

#[async_trait]
impl DeviceSource for InlineSource {
    async fn list_devices(&self) -> Result<Vec<Device>> {
        Ok(self.devices.clone())
    }
}

pub fn descriptors() -> Result<Vec<PluginDescriptor>> {
    Ok(vec![PluginDescriptor::device_source::<InlineSource>()])
}

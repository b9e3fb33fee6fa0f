use std::path::{Path, PathBuf};

use async_trait::async_trait;
use serde::Deserialize;
use tracing::{debug, info};

use netrun_common::config::find_upward;
use netrun_common::plugin::{
    self, DeviceSource, Plugin, PluginConfig, PluginDescriptor, SourcePlugin,
};
use netrun_common::{Device, Error, Result};

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct YamlSettings {
    device_file: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct DeviceFile {
    #[serde(default)]
    devices: Vec<Device>,
}

/// Devices listed under the top-level `devices` key of a YAML file.
#[derive(Debug)]
pub struct YamlSource {
    device_file: String,
}

impl YamlSource {
    pub fn new(device_file: impl Into<String>) -> Self {
        Self {
            device_file: device_file.into(),
        }
    }

    fn locate(&self) -> Result<PathBuf> {
        find_upward(Path::new(&self.device_file)).ok_or_else(|| {
            Error::configuration(format!("device file '{}' not found", self.device_file))
        })
    }
}

impl Plugin for YamlSource {
    const NAME: &'static str = "yaml";
}

impl SourcePlugin for YamlSource {
    fn from_config(config: &PluginConfig) -> Result<Self> {
        let settings: YamlSettings = plugin::settings(Self::NAME, config)?;
        match settings.device_file {
            Some(file) if !file.trim().is_empty() => Ok(Self::new(file)),
            _ => Err(Error::configuration(
                "settings file is missing plugin_configs.yaml.device_file",
            )),
        }
    }
}

#[async_trait]
impl DeviceSource for YamlSource {
    async fn list_devices(&self) -> Result<Vec<Device>> {
        let path: PathBuf = self.locate()?;
        info!(path = %path.display(), "loading devices from yaml");

        let raw: String = tokio::fs::read_to_string(&path)
            .await
            .map_err(|e| Error::configuration(format!("failed to read {}: {e}", path.display())))?;
        let file: DeviceFile = serde_yaml::from_str(&raw).map_err(|e| {
            Error::configuration(format!("invalid device file {}: {e}", path.display()))
        })?;

        debug!(count = file.devices.len(), "devices loaded");
        Ok(file.devices)
    }
}

pub fn descriptors() -> Result<Vec<PluginDescriptor>> {
    Ok(vec![PluginDescriptor::device_source::<YamlSource>()])
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use netrun_common::ErrorKind;

    use super::*;

    const DEVICES: &str = "\
devices:
  - name: r1
    host: 10.0.0.1
    username: admin
    password: secret
    protocol: telnet
    platform: ios
    site: ams
  - name: lab
    host: 127.0.0.1
    protocol: loopback
";

    #[tokio::test]
    async fn lists_devices_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("devices.yaml");
        std::fs::write(&path, DEVICES).unwrap();

        let source = YamlSource::from_config(&json!({"device_file": path.to_str().unwrap()})).unwrap();
        let devices = source.list_devices().await.unwrap();

        assert_eq!(devices.len(), 2);
        assert_eq!(devices[0].name, "r1");
        assert!(devices[0].in_site("ams"));
        assert_eq!(devices[1].protocol, "loopback");
    }

    #[tokio::test]
    async fn file_without_devices_key_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("devices.yaml");
        std::fs::write(&path, "other: 1\n").unwrap();

        let source = YamlSource::new(path.to_str().unwrap());
        assert!(source.list_devices().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn missing_file_is_configuration_error() {
        let dir = tempfile::tempdir().unwrap();
        let source = YamlSource::new(dir.path().join("nope.yaml").to_str().unwrap());
        let err = source.list_devices().await.unwrap_err();
        assert_eq!(err.kind(), Some(ErrorKind::ConfigurationError));
    }

    #[test]
    fn device_file_setting_is_required() {
        let err = YamlSource::from_config(&PluginConfig::Null).unwrap_err();
        assert_eq!(err.kind(), Some(ErrorKind::ConfigurationError));
        assert!(err.to_string().contains("device_file"));
    }
}

//! In-process transport for dry runs and tests: nothing leaves the machine.

use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use tracing::debug;

use netrun_common::plugin::{
    self, Plugin, PluginConfig, PluginDescriptor, Transport, TransportPlugin,
};
use netrun_common::{Device, Error, Result};

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct LoopbackSettings {
    /// Applied to every lifecycle call.
    pub delay_ms: u64,
    /// Canned output per command text. Unlisted commands are echoed back.
    pub responses: HashMap<String, String>,
    /// Usernames whose login is refused.
    pub rejected_users: Vec<String>,
}

pub struct LoopbackTransport {
    device: Device,
    settings: LoopbackSettings,
    connected: bool,
}

impl LoopbackTransport {
    pub fn new(device: Device, settings: LoopbackSettings) -> Self {
        Self {
            device,
            settings,
            connected: false,
        }
    }

    async fn pause(&self) {
        if self.settings.delay_ms > 0 {
            tokio::time::sleep(Duration::from_millis(self.settings.delay_ms)).await;
        }
    }
}

impl Plugin for LoopbackTransport {
    const NAME: &'static str = "loopback";
}

impl TransportPlugin for LoopbackTransport {
    fn from_device(device: Device, config: &PluginConfig) -> Result<Self> {
        Ok(Self::new(device, plugin::settings(Self::NAME, config)?))
    }
}

#[async_trait]
impl Transport for LoopbackTransport {
    async fn connect(&mut self) -> Result<()> {
        self.pause().await;
        if self.settings.rejected_users.contains(&self.device.username) {
            return Err(Error::authentication(format!(
                "login rejected for '{}' on {}",
                self.device.username, self.device.name
            )));
        }
        self.connected = true;
        debug!(device = %self.device.name, "loopback session opened");
        Ok(())
    }

    async fn send_command(&mut self, command: &str) -> Result<String> {
        if !self.connected {
            return Err(Error::transport(format!(
                "no open session to {}",
                self.device.name
            )));
        }
        self.pause().await;
        Ok(self
            .settings
            .responses
            .get(command)
            .cloned()
            .unwrap_or_else(|| command.to_string()))
    }

    async fn disconnect(&mut self) -> Result<()> {
        if self.connected {
            self.pause().await;
            self.connected = false;
            debug!(device = %self.device.name, "loopback session closed");
        }
        Ok(())
    }
}

pub fn descriptors() -> Result<Vec<PluginDescriptor>> {
    Ok(vec![PluginDescriptor::transport::<LoopbackTransport>()])
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use netrun_common::ErrorKind;

    use super::*;

    fn device() -> Device {
        Device::new("lab-1", "127.0.0.1", "loopback")
    }

    #[tokio::test]
    async fn echoes_unknown_commands() {
        let mut transport = LoopbackTransport::from_device(device(), &PluginConfig::Null).unwrap();
        transport.connect().await.unwrap();
        assert_eq!(transport.send_command("echo test").await.unwrap(), "echo test");
        transport.disconnect().await.unwrap();
    }

    #[tokio::test]
    async fn serves_canned_responses() {
        let config = json!({"responses": {"show clock": "10:00 UTC"}});
        let mut transport = LoopbackTransport::from_device(device(), &config).unwrap();
        transport.connect().await.unwrap();
        assert_eq!(transport.send_command("show clock").await.unwrap(), "10:00 UTC");
    }

    #[tokio::test]
    async fn send_before_connect_fails() {
        let mut transport = LoopbackTransport::from_device(device(), &PluginConfig::Null).unwrap();
        let err = transport.send_command("x").await.unwrap_err();
        assert_eq!(err.kind(), Some(ErrorKind::TransportError));
        transport.disconnect().await.unwrap();
    }

    #[tokio::test]
    async fn refuses_listed_users() {
        let config = json!({"rejected_users": ["intruder"]});
        let device = device().with_credentials("intruder", "pw");
        let mut transport = LoopbackTransport::from_device(device, &config).unwrap();

        let err = transport.connect().await.unwrap_err();
        assert_eq!(err.kind(), Some(ErrorKind::AuthenticationError));
        assert_eq!(err.to_string(), "login rejected for 'intruder' on lab-1");
        assert!(transport.send_command("x").await.is_err());
    }

    #[test]
    fn rejects_malformed_settings() {
        let config = json!({"delay_ms": "soon"});
        let err = LoopbackTransport::from_device(device(), &config).err().unwrap();
        assert_eq!(err.kind(), Some(ErrorKind::ConfigurationError));
    }
}

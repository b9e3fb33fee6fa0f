//! # Device Model
//!
//! A [`Device`] is an immutable description of a managed endpoint: where it lives,
//! how to log in, and which transport plugin reaches it. Device sources create
//! them; the executor and transports only read them.

use std::fmt;

use serde::{Deserialize, Serialize};

#[derive(Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Device {
    /// Unique name, used to address the device on the command line.
    pub name: String,
    pub host: String,
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
    /// Registry name of the transport plugin used to reach this device.
    pub protocol: String,
    /// Operating system family (`ios`, `nxos`, `junos`, ...), may be empty.
    #[serde(default)]
    pub platform: String,
    #[serde(default)]
    pub site: Option<String>,
}

impl Device {
    pub fn new(name: impl Into<String>, host: impl Into<String>, protocol: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            host: host.into(),
            username: String::new(),
            password: String::new(),
            protocol: protocol.into(),
            platform: String::new(),
            site: None,
        }
    }

    pub fn with_credentials(mut self, username: impl Into<String>, password: impl Into<String>) -> Self {
        self.username = username.into();
        self.password = password.into();
        self
    }

    pub fn with_platform(mut self, platform: impl Into<String>) -> Self {
        self.platform = platform.into();
        self
    }

    pub fn with_site(mut self, site: impl Into<String>) -> Self {
        self.site = Some(site.into());
        self
    }

    pub fn in_site(&self, site: &str) -> bool {
        self.site.as_deref() == Some(site)
    }
}

// Credentials never end up in logs.
impl fmt::Debug for Device {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Device")
            .field("name", &self.name)
            .field("host", &self.host)
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .field("protocol", &self.protocol)
            .field("platform", &self.platform)
            .field("site", &self.site)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn debug_redacts_password() {
        let device = Device::new("r1", "10.0.0.1", "telnet").with_credentials("admin", "hunter2");
        let out = format!("{device:?}");
        assert!(!out.contains("hunter2"));
        assert!(out.contains("admin"));
    }

    #[test]
    fn deserializes_with_defaults() {
        let device: Device = serde_yaml::from_str(
            "name: sw1\nhost: 192.0.2.10\nprotocol: loopback\n",
        )
        .unwrap();
        assert_eq!(device.name, "sw1");
        assert!(device.platform.is_empty());
        assert!(device.site.is_none());
    }

    #[test]
    fn site_membership() {
        let device = Device::new("r1", "10.0.0.1", "telnet").with_site("ams");
        assert!(device.in_site("ams"));
        assert!(!device.in_site("fra"));
    }
}

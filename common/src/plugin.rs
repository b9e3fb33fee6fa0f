//! # Plugin Contracts
//!
//! netrun has three extension points, one per [`PluginKind`]:
//!
//! * [`DeviceCommand`]: what to send to a device and how to read the answer.
//! * [`Transport`]: how to reach a device (`connect`, `send_command`, `disconnect`).
//! * [`DeviceSource`]: where the inventory of devices comes from.
//!
//! Implementations report their own registry name through [`Plugin::NAME`] and are
//! built from an opaque [`PluginConfig`] block taken from the settings file. The
//! [`catalog`] module holds the types used to hand implementations to the loader.

use std::fmt;

use serde::de::DeserializeOwned;

use crate::{Device, Error, Result};

pub mod catalog;
pub mod command;
pub mod source;
pub mod transport;

pub use catalog::{PluginDescriptor, PluginFactory, PluginModule, PluginRoot, RootProvider};
pub use command::DeviceCommand;
pub use source::DeviceSource;
pub use transport::Transport;

/// Opaque, plugin-specific settings block. `Null` when nothing is configured.
pub type PluginConfig = serde_json::Value;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum PluginKind {
    Command,
    Transport,
    DeviceSource,
}

impl PluginKind {
    pub const ALL: [PluginKind; 3] = [Self::Command, Self::Transport, Self::DeviceSource];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Command => "command",
            Self::Transport => "transport",
            Self::DeviceSource => "device source",
        }
    }
}

impl fmt::Display for PluginKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Identity shared by every plugin type.
pub trait Plugin {
    /// Registry key, unique within the plugin's kind.
    const NAME: &'static str;
}

pub trait CommandPlugin: DeviceCommand + Plugin + Sized + 'static {
    fn from_config(config: &PluginConfig) -> Result<Self>;
}

pub trait TransportPlugin: Transport + Plugin + Sized + 'static {
    fn from_device(device: Device, config: &PluginConfig) -> Result<Self>;
}

pub trait SourcePlugin: DeviceSource + Plugin + Sized + 'static {
    fn from_config(config: &PluginConfig) -> Result<Self>;
}

/// Decodes a plugin's settings block into `T`.
///
/// A missing (`null`) block yields `T::default()`; a malformed one is a
/// configuration error naming the plugin.
pub fn settings<T>(plugin: &str, config: &PluginConfig) -> Result<T>
where
    T: DeserializeOwned + Default,
{
    if config.is_null() {
        return Ok(T::default());
    }
    serde_json::from_value(config.clone())
        .map_err(|e| Error::configuration(format!("invalid settings for plugin '{plugin}': {e}")))
}

use std::collections::BTreeMap;

use netrun_common::plugin::catalog::{CommandFactory, SourceFactory, TransportFactory};
use netrun_common::plugin::{
    DeviceCommand, DeviceSource, PluginConfig, PluginFactory, PluginKind, Transport,
};
use netrun_common::{Device, Error, Result};
use tracing::{debug, warn};

/// Factories keyed by plugin kind and name.
///
/// Filled once during boot, then shared behind an `Arc` and only read.
#[derive(Default)]
pub struct PluginRegistry {
    commands: BTreeMap<String, CommandFactory>,
    transports: BTreeMap<String, TransportFactory>,
    sources: BTreeMap<String, SourceFactory>,
}

impl PluginRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores `factory` under `(kind, name)`. A previous entry is replaced, last
    /// write wins, and returned.
    pub fn register(
        &mut self,
        kind: PluginKind,
        name: &str,
        factory: PluginFactory,
    ) -> Result<Option<PluginFactory>> {
        let replaced: Option<PluginFactory> = match (kind, factory) {
            (PluginKind::Command, PluginFactory::Command(f)) => self
                .commands
                .insert(name.to_string(), f)
                .map(PluginFactory::Command),
            (PluginKind::Transport, PluginFactory::Transport(f)) => self
                .transports
                .insert(name.to_string(), f)
                .map(PluginFactory::Transport),
            (PluginKind::DeviceSource, PluginFactory::DeviceSource(f)) => self
                .sources
                .insert(name.to_string(), f)
                .map(PluginFactory::DeviceSource),
            (kind, factory) => {
                return Err(Error::configuration(format!(
                    "plugin '{name}' is a {} plugin and cannot be registered as a {kind} plugin",
                    factory.kind()
                )));
            }
        };

        if replaced.is_some() {
            warn!(kind = %kind, name, "plugin registered twice, keeping the last one");
        } else {
            debug!(kind = %kind, name, "plugin registered");
        }
        Ok(replaced)
    }

    pub fn get(&self, kind: PluginKind, name: &str) -> Result<PluginFactory> {
        let found: Option<PluginFactory> = match kind {
            PluginKind::Command => self.commands.get(name).cloned().map(PluginFactory::Command),
            PluginKind::Transport => self
                .transports
                .get(name)
                .cloned()
                .map(PluginFactory::Transport),
            PluginKind::DeviceSource => self
                .sources
                .get(name)
                .cloned()
                .map(PluginFactory::DeviceSource),
        };
        found.ok_or_else(|| Error::lookup(kind, name))
    }

    pub fn contains(&self, kind: PluginKind, name: &str) -> bool {
        match kind {
            PluginKind::Command => self.commands.contains_key(name),
            PluginKind::Transport => self.transports.contains_key(name),
            PluginKind::DeviceSource => self.sources.contains_key(name),
        }
    }

    /// Registered names of one kind, sorted.
    pub fn names(&self, kind: PluginKind) -> Vec<String> {
        match kind {
            PluginKind::Command => self.commands.keys().cloned().collect(),
            PluginKind::Transport => self.transports.keys().cloned().collect(),
            PluginKind::DeviceSource => self.sources.keys().cloned().collect(),
        }
    }

    pub fn command(&self, name: &str, config: &PluginConfig) -> Result<Box<dyn DeviceCommand>> {
        let build: &CommandFactory = self
            .commands
            .get(name)
            .ok_or_else(|| Error::lookup(PluginKind::Command, name))?;
        build(config)
    }

    pub fn transport(
        &self,
        name: &str,
        device: Device,
        config: &PluginConfig,
    ) -> Result<Box<dyn Transport>> {
        let build: &TransportFactory = self
            .transports
            .get(name)
            .ok_or_else(|| Error::lookup(PluginKind::Transport, name))?;
        build(device, config)
    }

    pub fn device_source(&self, name: &str, config: &PluginConfig) -> Result<Box<dyn DeviceSource>> {
        let build: &SourceFactory = self
            .sources
            .get(name)
            .ok_or_else(|| Error::lookup(PluginKind::DeviceSource, name))?;
        build(config)
    }
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝

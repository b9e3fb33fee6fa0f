//! # Plugin Catalog
//!
//! Plugins are compiled in. A **root** is a named catalog made of **modules**;
//! loading a module yields [`PluginDescriptor`]s, each pairing a registry name with
//! a [`PluginFactory`] that builds the implementation on demand.

use std::fmt;
use std::sync::Arc;

use super::{
    CommandPlugin, DeviceCommand, DeviceSource, PluginConfig, PluginKind, SourcePlugin,
    Transport, TransportPlugin,
};
use crate::{Device, Result};

pub type CommandFactory =
    Arc<dyn Fn(&PluginConfig) -> Result<Box<dyn DeviceCommand>> + Send + Sync>;
pub type TransportFactory =
    Arc<dyn Fn(Device, &PluginConfig) -> Result<Box<dyn Transport>> + Send + Sync>;
pub type SourceFactory =
    Arc<dyn Fn(&PluginConfig) -> Result<Box<dyn DeviceSource>> + Send + Sync>;

/// Constructor for one plugin implementation, tagged with its kind.
#[derive(Clone)]
pub enum PluginFactory {
    Command(CommandFactory),
    Transport(TransportFactory),
    DeviceSource(SourceFactory),
}

impl PluginFactory {
    pub fn kind(&self) -> PluginKind {
        match self {
            Self::Command(_) => PluginKind::Command,
            Self::Transport(_) => PluginKind::Transport,
            Self::DeviceSource(_) => PluginKind::DeviceSource,
        }
    }

    pub fn command<C: CommandPlugin>() -> Self {
        Self::Command(Arc::new(|config: &PluginConfig| {
            Ok(Box::new(C::from_config(config)?) as Box<dyn DeviceCommand>)
        }))
    }

    pub fn transport<T: TransportPlugin>() -> Self {
        Self::Transport(Arc::new(|device: Device, config: &PluginConfig| {
            Ok(Box::new(T::from_device(device, config)?) as Box<dyn Transport>)
        }))
    }

    pub fn device_source<S: SourcePlugin>() -> Self {
        Self::DeviceSource(Arc::new(|config: &PluginConfig| {
            Ok(Box::new(S::from_config(config)?) as Box<dyn DeviceSource>)
        }))
    }
}

impl fmt::Debug for PluginFactory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PluginFactory({})", self.kind())
    }
}

#[derive(Clone, Debug)]
pub struct PluginDescriptor {
    pub name: String,
    pub factory: PluginFactory,
}

impl PluginDescriptor {
    pub fn new(name: impl Into<String>, factory: PluginFactory) -> Self {
        Self {
            name: name.into(),
            factory,
        }
    }

    pub fn command<C: CommandPlugin>() -> Self {
        Self::new(C::NAME, PluginFactory::command::<C>())
    }

    pub fn transport<T: TransportPlugin>() -> Self {
        Self::new(T::NAME, PluginFactory::transport::<T>())
    }

    pub fn device_source<S: SourcePlugin>() -> Self {
        Self::new(S::NAME, PluginFactory::device_source::<S>())
    }

    pub fn kind(&self) -> PluginKind {
        self.factory.kind()
    }
}

pub type ModuleLoader = fn() -> Result<Vec<PluginDescriptor>>;

/// One loadable unit inside a root.
#[derive(Clone)]
pub struct PluginModule {
    pub path: &'static str,
    load: ModuleLoader,
}

impl PluginModule {
    pub const fn new(path: &'static str, load: ModuleLoader) -> Self {
        Self { path, load }
    }

    pub fn load(&self) -> Result<Vec<PluginDescriptor>> {
        (self.load)()
    }
}

impl fmt::Debug for PluginModule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PluginModule").field("path", &self.path).finish()
    }
}

#[derive(Clone, Debug)]
pub struct PluginRoot {
    pub name: String,
    pub modules: Vec<PluginModule>,
}

impl PluginRoot {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            modules: Vec::new(),
        }
    }

    pub fn with_module(mut self, module: PluginModule) -> Self {
        self.modules.push(module);
        self
    }
}

/// Produces a root's module list. Failing providers are skipped by the loader.
pub type RootProvider = fn() -> Result<PluginRoot>;

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝

#[cfg(test)]
mod tests {
    use async_trait::async_trait;
    use serde_json::Value;

    use super::*;
    use crate::plugin::Plugin;

    struct Ping;

    impl Plugin for Ping {
        const NAME: &'static str = "ping";
    }

    impl DeviceCommand for Ping {
        fn command_text(&self) -> String {
            "ping".into()
        }

        fn parse(&self, raw_output: &str) -> Result<Value> {
            Ok(Value::String(raw_output.into()))
        }
    }

    impl CommandPlugin for Ping {
        fn from_config(_config: &PluginConfig) -> Result<Self> {
            Ok(Ping)
        }
    }

    struct Null {
        device: Device,
    }

    impl Plugin for Null {
        const NAME: &'static str = "null";
    }

    #[async_trait]
    impl Transport for Null {
        async fn connect(&mut self) -> Result<()> {
            Ok(())
        }

        async fn send_command(&mut self, _command: &str) -> Result<String> {
            Ok(self.device.name.clone())
        }

        async fn disconnect(&mut self) -> Result<()> {
            Ok(())
        }
    }

    impl TransportPlugin for Null {
        fn from_device(device: Device, _config: &PluginConfig) -> Result<Self> {
            Ok(Null { device })
        }
    }

    #[test]
    fn descriptor_takes_plugin_name_and_kind() {
        let descriptor = PluginDescriptor::command::<Ping>();
        assert_eq!(descriptor.name, "ping");
        assert_eq!(descriptor.kind(), PluginKind::Command);

        let PluginFactory::Command(build) = descriptor.factory else {
            panic!("expected a command factory");
        };
        let command = build(&Value::Null).unwrap();
        assert_eq!(command.command_text(), "ping");
    }

    #[tokio::test]
    async fn transport_factory_binds_device() {
        let descriptor = PluginDescriptor::transport::<Null>();
        let PluginFactory::Transport(build) = descriptor.factory else {
            panic!("expected a transport factory");
        };
        let mut transport = build(Device::new("r9", "h", "null"), &Value::Null).unwrap();
        assert_eq!(transport.send_command("x").await.unwrap(), "r9");
    }

    #[test]
    fn module_load_delegates() {
        fn load() -> Result<Vec<PluginDescriptor>> {
            Ok(vec![PluginDescriptor::command::<Ping>()])
        }
        let root = PluginRoot::new("test.root").with_module(PluginModule::new("test.root.ping", load));
        assert_eq!(root.modules.len(), 1);
        assert_eq!(root.modules[0].load().unwrap().len(), 1);
    }
}

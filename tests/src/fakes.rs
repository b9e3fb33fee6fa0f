//! Lab plugins for the scenarios.
//!
//! The `scripted` transport never touches the network. Its behaviour is picked per
//! device: a password of `wrong` fails the login, a platform of `panics`, `flaky`
//! or `silent` breaks `send_command` in different ways. Every connect and
//! disconnect is counted per host, so tests must use hosts of their own.
//!
//! `flaky-src` and `licensed` fail with unclassified errors, the way a plugin
//! wrapping a foreign library would.

use std::collections::BTreeMap;
use std::sync::{Mutex, PoisonError};
use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{Value, json};

use netrun_common::config::Settings;
use netrun_common::plugin::{
    self, CommandPlugin, DeviceCommand, DeviceSource, Plugin, PluginConfig, PluginDescriptor,
    PluginModule, PluginRoot, SourcePlugin, Transport, TransportPlugin,
};
use netrun_common::{Device, Error, Result};
use netrun_core::{BootOptions, CommandExecutor, RootIndex, bootstrap};

pub const LAB_ROOT: &str = "lab.fakes";
pub const SHADOW_ROOT: &str = "lab.shadow";
pub const BROKEN_ROOT: &str = "lab.broken";
pub const UNRELIABLE_ROOT: &str = "lab.unreliable";

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Calls {
    pub connects: usize,
    pub disconnects: usize,
}

static LEDGER: Mutex<BTreeMap<String, Calls>> = Mutex::new(BTreeMap::new());

fn record(host: &str, update: fn(&mut Calls)) {
    let mut ledger = LEDGER.lock().unwrap_or_else(PoisonError::into_inner);
    update(ledger.entry(host.to_string()).or_default());
}

/// Lifecycle calls seen so far for `host`.
pub fn calls(host: &str) -> Calls {
    LEDGER
        .lock()
        .unwrap_or_else(PoisonError::into_inner)
        .get(host)
        .copied()
        .unwrap_or_default()
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct ScriptedSettings {
    /// Applied to `connect`.
    pub delay_ms: u64,
}

pub struct ScriptedTransport {
    device: Device,
    settings: ScriptedSettings,
}

impl Plugin for ScriptedTransport {
    const NAME: &'static str = "scripted";
}

impl TransportPlugin for ScriptedTransport {
    fn from_device(device: Device, config: &PluginConfig) -> Result<Self> {
        Ok(Self {
            device,
            settings: plugin::settings(Self::NAME, config)?,
        })
    }
}

#[async_trait]
impl Transport for ScriptedTransport {
    async fn connect(&mut self) -> Result<()> {
        record(&self.device.host, |c| c.connects += 1);
        if self.settings.delay_ms > 0 {
            tokio::time::sleep(Duration::from_millis(self.settings.delay_ms)).await;
        }
        if self.device.password == "wrong" {
            return Err(Error::authentication(format!(
                "login rejected for {}",
                self.device.username
            )));
        }
        Ok(())
    }

    async fn send_command(&mut self, command: &str) -> Result<String> {
        match self.device.platform.as_str() {
            "panics" => panic!("scripted transport crashed"),
            "flaky" => Err(Error::unexpected(std::io::Error::other(
                "connection reset by peer",
            ))),
            "silent" => Err(Error::timeout(format!(
                "no prompt from {} after {command}",
                self.device.host
            ))),
            _ => Ok(format!("{} ran {command}", self.device.name)),
        }
    }

    async fn disconnect(&mut self) -> Result<()> {
        record(&self.device.host, |c| c.disconnects += 1);
        Ok(())
    }
}

/// Registered under the built-in `echo-test` name to shadow it.
#[derive(Debug, Default)]
pub struct LoudEcho;

impl Plugin for LoudEcho {
    const NAME: &'static str = "echo-test";
}

impl CommandPlugin for LoudEcho {
    fn from_config(_config: &PluginConfig) -> Result<Self> {
        Ok(Self)
    }
}

impl DeviceCommand for LoudEcho {
    fn command_text(&self) -> String {
        "echo loud".to_string()
    }

    fn parse(&self, raw_output: &str) -> Result<Value> {
        Ok(json!({ "loud": raw_output.trim().to_uppercase() }))
    }
}

/// Inventory backed by a service that answers with a bad gateway.
#[derive(Debug, Default)]
pub struct FlakySource;

impl Plugin for FlakySource {
    const NAME: &'static str = "flaky-src";
}

impl SourcePlugin for FlakySource {
    fn from_config(_config: &PluginConfig) -> Result<Self> {
        Ok(Self)
    }
}

#[async_trait]
impl DeviceSource for FlakySource {
    async fn list_devices(&self) -> Result<Vec<Device>> {
        Err(Error::unexpected(std::io::Error::other("http 502 from inventory")))
    }
}

/// A command whose constructor cannot find its license file.
#[derive(Debug)]
pub struct Licensed;

impl Plugin for Licensed {
    const NAME: &'static str = "licensed";
}

impl CommandPlugin for Licensed {
    fn from_config(_config: &PluginConfig) -> Result<Self> {
        Err(Error::unexpected(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            "license.key not found",
        )))
    }
}

impl DeviceCommand for Licensed {
    fn command_text(&self) -> String {
        "show license".to_string()
    }

    fn parse(&self, raw_output: &str) -> Result<Value> {
        Ok(Value::String(raw_output.to_string()))
    }
}

fn scripted_module() -> Result<Vec<PluginDescriptor>> {
    Ok(vec![PluginDescriptor::transport::<ScriptedTransport>()])
}

fn shadow_module() -> Result<Vec<PluginDescriptor>> {
    Ok(vec![PluginDescriptor::command::<LoudEcho>()])
}

fn broken_module() -> Result<Vec<PluginDescriptor>> {
    Err(Error::configuration("module needs a library that is not installed"))
}

fn unreliable_module() -> Result<Vec<PluginDescriptor>> {
    Ok(vec![
        PluginDescriptor::device_source::<FlakySource>(),
        PluginDescriptor::command::<Licensed>(),
    ])
}

pub fn lab_root() -> Result<PluginRoot> {
    Ok(PluginRoot::new(LAB_ROOT).with_module(PluginModule::new("lab.fakes.scripted", scripted_module)))
}

pub fn unreliable_root() -> Result<PluginRoot> {
    Ok(PluginRoot::new(UNRELIABLE_ROOT)
        .with_module(PluginModule::new("lab.unreliable.plugins", unreliable_module)))
}

pub fn shadow_root() -> Result<PluginRoot> {
    Ok(PluginRoot::new(SHADOW_ROOT).with_module(PluginModule::new("lab.shadow.echo", shadow_module)))
}

/// One loadable module and one that fails.
pub fn broken_root() -> Result<PluginRoot> {
    Ok(PluginRoot::new(BROKEN_ROOT)
        .with_module(PluginModule::new("lab.broken.missing", broken_module))
        .with_module(PluginModule::new("lab.broken.scripted", scripted_module)))
}

pub fn lab_index() -> RootIndex {
    RootIndex::with_builtin()
        .with_root(LAB_ROOT, lab_root)
        .with_root(SHADOW_ROOT, shadow_root)
        .with_root(BROKEN_ROOT, broken_root)
        .with_root(UNRELIABLE_ROOT, unreliable_root)
}

/// A `scripted` device with working credentials.
pub fn device(name: &str, host: &str) -> Value {
    json!({
        "name": name,
        "host": host,
        "username": "netops",
        "password": "secret",
        "protocol": ScriptedTransport::NAME,
    })
}

/// Inline inventory of `devices`, scripted transport delayed by `delay_ms`.
pub fn lab_settings(devices: Vec<Value>, delay_ms: u64) -> Settings {
    Settings::new("inline")
        .with_plugin_config("inline", json!({ "devices": devices }))
        .with_plugin_config(ScriptedTransport::NAME, json!({ "delay_ms": delay_ms }))
}

pub fn boot(settings: Settings, extra_roots: &[&str], strict: bool) -> Result<CommandExecutor> {
    let options = BootOptions {
        extra_roots: extra_roots.iter().map(|root| root.to_string()).collect(),
        strict,
    };
    bootstrap(settings, &lab_index(), options)
}

/// Boots with the lab root only, the common case.
pub fn lab(devices: Vec<Value>) -> Result<CommandExecutor> {
    boot(lab_settings(devices, 0), &[LAB_ROOT], false)
}

//! # Command Executor
//!
//! Turns a request of the form *"run command X on devices A, B, C"* into a batch
//! for the [`CommandRunner`]:
//!
//! 1. Build the configured device source and list its devices.
//! 2. Expand site names into their devices and drop repeated names.
//! 3. Select the requested devices in request order. Unknown names abort the
//!    call with an `ApplicationError` before anything is contacted.
//! 4. Build the command, then one transport per device from `device.protocol`.
//! 5. Hand the pairs to the runner.
//!
//! Lookup and configuration failures in steps 1-4 fail the whole call. Once the
//! runner takes over, failures are per device. Either way an unclassified plugin
//! error surfaces as a `RunnerError`.

use std::collections::{BTreeMap, BTreeSet, HashSet};
use std::sync::Arc;

use serde::Serialize;
use serde_json::Value;
use tracing::{info, warn};

use netrun_common::config::Settings;
use netrun_common::plugin::{DeviceCommand, DeviceSource, PluginKind, Transport};
use netrun_common::{Device, Error, Result};

use crate::registry::PluginRegistry;
use crate::runner::{CommandRunner, ExecutionResult, Job};

/// Commands run, in this order, by [`CommandExecutor::diagnostic`].
pub const DIAGNOSTIC_COMMANDS: [&str; 5] = [
    "show-version",
    "show-ip-interface-brief",
    "show-memory-stats",
    "show-processes-cpu",
    "show-logging",
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Listing {
    Devices { site: Option<String> },
    Sites,
    Commands,
    Transports,
    DeviceSources,
}

/// Diagnostic outcome of one device: `(command, result or "[error] ...")` pairs.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DiagnosticReport {
    pub device: String,
    pub checks: Vec<(String, Value)>,
}

pub struct CommandExecutor {
    settings: Arc<Settings>,
    registry: Arc<PluginRegistry>,
    runner: Arc<dyn CommandRunner>,
}

impl CommandExecutor {
    pub fn new(
        settings: Arc<Settings>,
        registry: Arc<PluginRegistry>,
        runner: Arc<dyn CommandRunner>,
    ) -> Self {
        Self {
            settings,
            registry,
            runner,
        }
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn registry(&self) -> &PluginRegistry {
        &self.registry
    }

    /// Every device of the configured source, optionally limited to one site.
    pub async fn inventory(&self, site: Option<&str>) -> Result<Vec<Device>> {
        let name: &str = &self.settings.device_source;
        let source: Box<dyn DeviceSource> = self
            .registry
            .device_source(name, self.settings.plugin_config(name))
            .map_err(Error::into_domain)?;
        let devices: Vec<Device> = source.list_devices().await.map_err(Error::into_domain)?;

        Ok(match site {
            Some(site) => devices.into_iter().filter(|d| d.in_site(site)).collect(),
            None => devices,
        })
    }

    pub async fn expand_device_names(&self, names: &[String]) -> Result<Vec<String>> {
        let devices: Vec<Device> = self.inventory(None).await?;
        Ok(expand(&devices, names))
    }

    pub async fn execute(
        &self,
        device_names: &[String],
        command_name: &str,
    ) -> Result<Vec<ExecutionResult>> {
        if device_names.is_empty() {
            return Ok(Vec::new());
        }

        let inventory: Vec<Device> = self.inventory(None).await?;
        let requested: Vec<String> = expand(&inventory, device_names);
        let selected: Vec<Device> = select(inventory, &requested)?;

        let command: Box<dyn DeviceCommand> = self
            .registry
            .command(command_name, self.settings.plugin_config(command_name))
            .map_err(Error::into_domain)?;

        let mut jobs: Vec<Job> = Vec::with_capacity(selected.len());
        for device in selected {
            let protocol: String = device.protocol.clone();
            let transport: Box<dyn Transport> = self
                .registry
                .transport(&protocol, device.clone(), self.settings.plugin_config(&protocol))
                .map_err(Error::into_domain)?;
            jobs.push((device, transport));
        }

        info!(command = command_name, devices = jobs.len(), "dispatching command");
        Ok(self.runner.run(jobs, Arc::from(command)).await)
    }

    /// Like [`execute`](Self::execute), keyed by device name: the parsed result on
    /// success, the error message on failure.
    pub async fn run(
        &self,
        device_names: &[String],
        command_name: &str,
    ) -> Result<BTreeMap<String, Value>> {
        let results: Vec<ExecutionResult> = self.execute(device_names, command_name).await?;
        Ok(results
            .into_iter()
            .map(|r| (r.device.clone(), r.into_value()))
            .collect())
    }

    pub async fn list(&self, listing: &Listing) -> Result<Vec<String>> {
        let names: Vec<String> = match listing {
            Listing::Devices { site } => self
                .inventory(site.as_deref())
                .await?
                .into_iter()
                .map(|d| d.name)
                .collect(),
            Listing::Sites => sites(&self.inventory(None).await?).into_iter().collect(),
            Listing::Commands => self.registry.names(PluginKind::Command),
            Listing::Transports => self.registry.names(PluginKind::Transport),
            Listing::DeviceSources => self.registry.names(PluginKind::DeviceSource),
        };
        Ok(names)
    }

    /// Runs the diagnostic command set one command at a time, each across all
    /// devices. A command that fails as a whole is recorded as `[error] ...` for
    /// every device.
    pub async fn diagnostic(&self, device_names: &[String]) -> Result<Vec<DiagnosticReport>> {
        let names: Vec<String> = self.expand_device_names(device_names).await?;
        let mut reports: Vec<DiagnosticReport> = names
            .iter()
            .map(|name| DiagnosticReport {
                device: name.clone(),
                checks: Vec::new(),
            })
            .collect();

        for command in DIAGNOSTIC_COMMANDS {
            match self.run(&names, command).await {
                Ok(mut outcome) => {
                    for report in &mut reports {
                        let value: Value = outcome.remove(&report.device).unwrap_or(Value::Null);
                        report.checks.push((command.to_string(), value));
                    }
                }
                Err(e) => {
                    warn!(command, error = %e, "diagnostic command failed");
                    for report in &mut reports {
                        report
                            .checks
                            .push((command.to_string(), Value::String(format!("[error] {e}"))));
                    }
                }
            }
        }

        Ok(reports)
    }
}

/// Replaces site names with the devices of that site. A name that is both a
/// device and a site is taken as the device. First occurrence wins.
pub fn expand(devices: &[Device], names: &[String]) -> Vec<String> {
    let device_names: HashSet<&str> = devices.iter().map(|d| d.name.as_str()).collect();
    let known_sites: BTreeSet<String> = sites(devices);
    let mut seen: HashSet<String> = HashSet::new();
    let mut expanded: Vec<String> = Vec::with_capacity(names.len());

    for name in names {
        if !device_names.contains(name.as_str()) && known_sites.contains(name) {
            for device in devices.iter().filter(|d| d.in_site(name)) {
                if seen.insert(device.name.clone()) {
                    expanded.push(device.name.clone());
                }
            }
        } else if seen.insert(name.clone()) {
            expanded.push(name.clone());
        }
    }
    expanded
}

fn sites(devices: &[Device]) -> BTreeSet<String> {
    devices.iter().filter_map(|d| d.site.clone()).collect()
}

fn select(inventory: Vec<Device>, requested: &[String]) -> Result<Vec<Device>> {
    let mut by_name: BTreeMap<String, Device> = inventory
        .into_iter()
        .map(|d| (d.name.clone(), d))
        .collect();

    let unknown: Vec<&str> = requested
        .iter()
        .filter(|name| !by_name.contains_key(name.as_str()))
        .map(String::as_str)
        .collect();
    if !unknown.is_empty() {
        return Err(Error::application(format!(
            "unknown device(s): {}",
            unknown.join(", ")
        )));
    }

    Ok(requested
        .iter()
        .filter_map(|name| by_name.remove(name))
        .collect())
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝

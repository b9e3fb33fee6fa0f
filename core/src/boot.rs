use std::sync::Arc;

use netrun_common::Result;
use netrun_common::config::Settings;
use tracing::debug;

use crate::executor::CommandExecutor;
use crate::loader::RootIndex;
use crate::registrar::PluginRegistrar;
use crate::registry::PluginRegistry;
use crate::runner::{CommandRunner, Runner};

#[derive(Debug, Clone, Default)]
pub struct BootOptions {
    /// Roots searched after the built-in one of each kind.
    pub extra_roots: Vec<String>,
    /// Fail on unloadable plugin sources and duplicate names.
    pub strict: bool,
}

/// Registers every plugin kind and wires the executor with the default runner.
pub fn bootstrap(settings: Settings, index: &RootIndex, options: BootOptions) -> Result<CommandExecutor> {
    bootstrap_with_runner(settings, index, options, Arc::new(Runner::new()))
}

pub fn bootstrap_with_runner(
    settings: Settings,
    index: &RootIndex,
    options: BootOptions,
    runner: Arc<dyn CommandRunner>,
) -> Result<CommandExecutor> {
    let mut registry: PluginRegistry = PluginRegistry::new();
    let total: usize = PluginRegistrar::new(index)
        .with_extra_roots(options.extra_roots)
        .strict(options.strict)
        .register_all(&mut registry)?;
    debug!(total, device_source = %settings.device_source, "boot finished");

    Ok(CommandExecutor::new(Arc::new(settings), Arc::new(registry), runner))
}

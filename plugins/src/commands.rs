use netrun_common::Result;
use netrun_common::plugin::{PluginModule, PluginRoot};

pub mod echo;
pub mod show_environment;
pub mod show_ip_interface_brief;
pub mod show_logging;
pub mod show_memory_stats;
pub mod show_processes_cpu;
pub mod show_running_config;
pub mod show_version;

pub use echo::EchoTest;
pub use show_environment::ShowEnvironment;
pub use show_ip_interface_brief::ShowIpInterfaceBrief;
pub use show_logging::ShowLogging;
pub use show_memory_stats::ShowMemoryStats;
pub use show_processes_cpu::ShowProcessesCpu;
pub use show_running_config::ShowRunningConfig;
pub use show_version::ShowVersion;

pub const ROOT: &str = "netrun.commands";

pub fn root() -> Result<PluginRoot> {
    Ok(PluginRoot::new(ROOT)
        .with_module(PluginModule::new("netrun.commands.echo", echo::descriptors))
        .with_module(PluginModule::new(
            "netrun.commands.show_version",
            show_version::descriptors,
        ))
        .with_module(PluginModule::new(
            "netrun.commands.show_ip_interface_brief",
            show_ip_interface_brief::descriptors,
        ))
        .with_module(PluginModule::new(
            "netrun.commands.show_running_config",
            show_running_config::descriptors,
        ))
        .with_module(PluginModule::new(
            "netrun.commands.show_memory_stats",
            show_memory_stats::descriptors,
        ))
        .with_module(PluginModule::new(
            "netrun.commands.show_processes_cpu",
            show_processes_cpu::descriptors,
        ))
        .with_module(PluginModule::new(
            "netrun.commands.show_logging",
            show_logging::descriptors,
        ))
        .with_module(PluginModule::new(
            "netrun.commands.show_environment",
            show_environment::descriptors,
        )))
}

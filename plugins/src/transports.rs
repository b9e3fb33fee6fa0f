use netrun_common::Result;
use netrun_common::plugin::{PluginModule, PluginRoot};

pub mod loopback;
pub mod ssh;
pub mod telnet;

pub use loopback::LoopbackTransport;
pub use ssh::SshTransport;
pub use telnet::TelnetTransport;

pub const ROOT: &str = "netrun.transports";

pub fn root() -> Result<PluginRoot> {
    Ok(PluginRoot::new(ROOT)
        .with_module(PluginModule::new("netrun.transports.loopback", loopback::descriptors))
        .with_module(PluginModule::new("netrun.transports.telnet", telnet::descriptors))
        .with_module(PluginModule::new("netrun.transports.ssh", ssh::descriptors)))
}

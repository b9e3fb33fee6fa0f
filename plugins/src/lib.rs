//! # Built-in plugins
//!
//! Three compiled-in roots, one per plugin kind:
//!
//! * **`netrun.commands`**: `echo-test`, `show-version`, `show-ip-interface-brief`,
//!   `show-running-config`, `show-memory-stats`, `show-processes-cpu`,
//!   `show-logging`, `show-environment`.
//! * **`netrun.transports`**: `loopback` (no network), `telnet` and `ssh`.
//! * **`netrun.sources`**: `yaml` (device file) and `inline` (devices in the settings file).

use netrun_common::plugin::{PluginKind, RootProvider};

pub mod commands;
pub mod sources;
pub mod transports;

/// Root name and provider of every built-in root.
pub fn builtin_roots() -> [(&'static str, RootProvider); 3] {
    [
        (commands::ROOT, commands::root as RootProvider),
        (transports::ROOT, transports::root as RootProvider),
        (sources::ROOT, sources::root as RootProvider),
    ]
}

/// Built-in root that serves `kind`.
pub fn builtin_root_for(kind: PluginKind) -> &'static str {
    match kind {
        PluginKind::Command => commands::ROOT,
        PluginKind::Transport => transports::ROOT,
        PluginKind::DeviceSource => sources::ROOT,
    }
}

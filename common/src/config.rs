//! # Settings
//!
//! The YAML settings file selects the device source, the log level and carries one
//! opaque block per plugin:
//!
//! ```yaml
//! device_source: yaml
//! log_level: info
//! plugin_configs:
//!   yaml:
//!     device_file: devices.yaml
//!   telnet:
//!     port: 2323
//! ```
//!
//! Relative paths are looked up in the working directory first, then in each
//! parent directory.

use std::collections::HashMap;
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::plugin::PluginConfig;
use crate::{Error, Result};

pub const CONFIG_PATH_ENV: &str = "NETRUN_CONFIG_PATH";
pub const DEFAULT_CONFIG_FILE: &str = "netrun.yaml";

static NO_CONFIG: PluginConfig = PluginConfig::Null;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Off,
    #[default]
    Info,
    Debug,
}

impl LogLevel {
    /// Directive understood by `tracing_subscriber::EnvFilter`. `off` still lets
    /// errors through.
    pub fn as_filter(&self) -> &'static str {
        match self {
            Self::Off => "error",
            Self::Info => "info",
            Self::Debug => "debug",
        }
    }
}

impl FromStr for LogLevel {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "off" => Ok(Self::Off),
            "info" => Ok(Self::Info),
            "debug" => Ok(Self::Debug),
            other => Err(Error::usage(format!(
                "unknown log level '{other}', expected off, info or debug"
            ))),
        }
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Off => "off",
            Self::Info => "info",
            Self::Debug => "debug",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Settings {
    /// Registry name of the device source plugin.
    #[serde(alias = "device_repo")]
    pub device_source: String,

    #[serde(default)]
    pub log_level: LogLevel,

    /// Per-plugin settings, keyed by plugin name.
    #[serde(default)]
    pub plugin_configs: HashMap<String, PluginConfig>,
}

impl Settings {
    pub fn new(device_source: impl Into<String>) -> Self {
        Self {
            device_source: device_source.into(),
            log_level: LogLevel::default(),
            plugin_configs: HashMap::new(),
        }
    }

    pub fn with_log_level(mut self, level: LogLevel) -> Self {
        self.log_level = level;
        self
    }

    pub fn with_plugin_config(mut self, plugin: impl Into<String>, config: PluginConfig) -> Self {
        self.plugin_configs.insert(plugin.into(), config);
        self
    }

    /// Locates and parses the settings file.
    pub fn load(path: &Path) -> Result<Self> {
        let resolved = find_upward(path).ok_or_else(|| {
            Error::configuration(format!("settings file '{}' not found", path.display()))
        })?;
        debug!(path = %resolved.display(), "loading settings");

        let raw = std::fs::read_to_string(&resolved).map_err(|e| {
            Error::configuration(format!("failed to read {}: {e}", resolved.display()))
        })?;
        Self::parse(&raw).map_err(|e| {
            Error::configuration(format!("invalid settings in {}: {e}", resolved.display()))
        })
    }

    pub fn parse(raw: &str) -> Result<Self> {
        serde_yaml::from_str(raw).map_err(|e| Error::configuration(e.to_string()))
    }

    /// Settings block of one plugin, `Null` when none is configured.
    pub fn plugin_config(&self, plugin: &str) -> &PluginConfig {
        self.plugin_configs.get(plugin).unwrap_or(&NO_CONFIG)
    }
}

/// Resolves `path` against the working directory and its ancestors.
pub fn find_upward(path: &Path) -> Option<PathBuf> {
    if path.is_absolute() {
        return path.is_file().then(|| path.to_path_buf());
    }
    let cwd = std::env::current_dir().ok()?;
    find_upward_from(&cwd, path)
}

pub fn find_upward_from(start: &Path, path: &Path) -> Option<PathBuf> {
    start
        .ancestors()
        .map(|dir| dir.join(path))
        .find(|candidate| candidate.is_file())
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝

//! # Plugin Loader
//!
//! Plugins are compiled in and grouped into named **roots**. A [`RootIndex`] maps
//! root names to their providers; the [`PluginLoader`] walks the requested roots
//! and collects every descriptor of one kind.
//!
//! Discovery is tolerant: an unknown root, a failing root provider or a failing
//! module is logged and recorded in [`Discovery::skipped`], and the remaining
//! sources still load. Nothing is registered here.

use std::collections::BTreeMap;

use netrun_common::plugin::{PluginDescriptor, PluginKind, PluginRoot, RootProvider};
use netrun_common::{Error, Result};
use tracing::{debug, warn};

#[derive(Clone, Default)]
pub struct RootIndex {
    roots: BTreeMap<String, RootProvider>,
}

impl RootIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Index holding the roots shipped with netrun.
    pub fn with_builtin() -> Self {
        netrun_plugins::builtin_roots()
            .into_iter()
            .fold(Self::new(), |index, (name, provider)| index.with_root(name, provider))
    }

    pub fn with_root(mut self, name: impl Into<String>, provider: RootProvider) -> Self {
        self.add(name, provider);
        self
    }

    pub fn add(&mut self, name: impl Into<String>, provider: RootProvider) {
        self.roots.insert(name.into(), provider);
    }

    pub fn contains(&self, name: &str) -> bool {
        self.roots.contains_key(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.roots.keys().map(String::as_str)
    }

    pub fn import(&self, name: &str) -> Result<PluginRoot> {
        let provider: &RootProvider = self
            .roots
            .get(name)
            .ok_or_else(|| Error::configuration(format!("plugin root '{name}' is not available")))?;
        provider()
    }
}

/// A root or module that could not be loaded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Skipped {
    pub source: String,
    pub reason: String,
}

#[derive(Debug, Default)]
pub struct Discovery {
    pub plugins: Vec<PluginDescriptor>,
    pub skipped: Vec<Skipped>,
}

pub struct PluginLoader<'a> {
    index: &'a RootIndex,
}

impl<'a> PluginLoader<'a> {
    pub fn new(index: &'a RootIndex) -> Self {
        Self { index }
    }

    /// Every descriptor of `kind` found under `roots`, in root then module order.
    pub fn discover(&self, roots: &[String], kind: PluginKind) -> Discovery {
        let mut discovery: Discovery = Discovery::default();

        for root_name in roots {
            let root: PluginRoot = match self.index.import(root_name) {
                Ok(root) => root,
                Err(e) => {
                    warn!(root = %root_name, error = %e, "skipping plugin root");
                    discovery.skipped.push(Skipped {
                        source: root_name.clone(),
                        reason: e.to_string(),
                    });
                    continue;
                }
            };

            for module in &root.modules {
                match module.load() {
                    Ok(descriptors) => discovery
                        .plugins
                        .extend(descriptors.into_iter().filter(|d| d.kind() == kind)),
                    Err(e) => {
                        warn!(module = module.path, error = %e, "skipping plugin module");
                        discovery.skipped.push(Skipped {
                            source: module.path.to_string(),
                            reason: e.to_string(),
                        });
                    }
                }
            }
        }

        debug!(
            kind = %kind,
            found = discovery.plugins.len(),
            skipped = discovery.skipped.len(),
            "plugin discovery finished"
        );
        discovery
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

//! # Plugin Registrar
//!
//! Fills a [`PluginRegistry`] at boot. For each kind the roots searched are the
//! built-in root of that kind followed by the extra roots named in
//! `NETRUN_EXTRA_PLUGIN_ROOTS` (or `--plugin-roots`), a colon-separated list.
//!
//! In the default mode an unloadable source or a duplicate name only produces a
//! warning and the last registration wins. **Strict** mode turns both into a
//! configuration error.

use std::collections::HashSet;

use netrun_common::plugin::PluginKind;
use netrun_common::{Error, Result};
use tracing::info;

use crate::loader::{Discovery, PluginLoader, RootIndex};
use crate::registry::PluginRegistry;

pub const EXTRA_ROOTS_ENV: &str = "NETRUN_EXTRA_PLUGIN_ROOTS";

/// Splits a colon-separated root list, dropping blanks and repeats.
pub fn parse_extra_roots(value: &str) -> Vec<String> {
    let mut seen: HashSet<&str> = HashSet::new();
    value
        .split(':')
        .map(str::trim)
        .filter(|root| !root.is_empty() && seen.insert(*root))
        .map(String::from)
        .collect()
}

pub fn extra_roots_from_env() -> Vec<String> {
    std::env::var(EXTRA_ROOTS_ENV)
        .map(|value| parse_extra_roots(&value))
        .unwrap_or_default()
}

pub struct PluginRegistrar<'a> {
    index: &'a RootIndex,
    extra_roots: Vec<String>,
    strict: bool,
    registered: HashSet<PluginKind>,
}

impl<'a> PluginRegistrar<'a> {
    pub fn new(index: &'a RootIndex) -> Self {
        Self {
            index,
            extra_roots: Vec::new(),
            strict: false,
            registered: HashSet::new(),
        }
    }

    pub fn with_extra_roots(mut self, roots: Vec<String>) -> Self {
        self.extra_roots = roots;
        self
    }

    pub fn strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    /// Roots searched for `kind`, built-in first.
    pub fn roots_for(&self, kind: PluginKind) -> Vec<String> {
        let builtin: &str = netrun_plugins::builtin_root_for(kind);
        std::iter::once(builtin.to_string())
            .chain(self.extra_roots.iter().filter(|r| *r != builtin).cloned())
            .collect()
    }

    /// Registers every plugin of `kind`. Returns how many descriptors were registered.
    pub fn register(&mut self, registry: &mut PluginRegistry, kind: PluginKind) -> Result<usize> {
        if !self.registered.insert(kind) {
            return Err(Error::configuration(format!(
                "{kind} plugins have already been registered"
            )));
        }

        let roots: Vec<String> = self.roots_for(kind);
        let discovery: Discovery = PluginLoader::new(self.index).discover(&roots, kind);

        if self.strict && !discovery.skipped.is_empty() {
            let failed: Vec<String> = discovery
                .skipped
                .iter()
                .map(|s| format!("{} ({})", s.source, s.reason))
                .collect();
            return Err(Error::configuration(format!(
                "failed to load {kind} plugins from: {}",
                failed.join(", ")
            )));
        }

        let mut count: usize = 0;
        for descriptor in discovery.plugins {
            if self.strict && registry.contains(kind, &descriptor.name) {
                return Err(Error::configuration(format!(
                    "{kind} plugin '{}' is provided more than once",
                    descriptor.name
                )));
            }
            registry.register(kind, &descriptor.name, descriptor.factory)?;
            count += 1;
        }

        info!(kind = %kind, count, roots = roots.len(), "plugins registered");
        Ok(count)
    }

    /// Registers all three kinds.
    pub fn register_all(&mut self, registry: &mut PluginRegistry) -> Result<usize> {
        let mut total: usize = 0;
        for kind in PluginKind::ALL {
            total += self.register(registry, kind)?;
        }
        Ok(total)
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

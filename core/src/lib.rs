//! # netrun core
//!
//! Boot-time plugin wiring and the run-time execution engine.
//!
//! * **[`loader`]**: reads plugin descriptors out of compiled-in roots.
//! * **[`registry`]**: `(kind, name) → factory` table, immutable after boot.
//! * **[`registrar`]**: decides which roots feed which kind and fills the registry.
//! * **[`runner`]**: concurrent fan-out of one command over many device sessions.
//! * **[`executor`]**: resolves names to devices and plugins, then hands off to the runner.
//! * **[`boot`]**: composition root tying the above together.

pub mod boot;
pub mod executor;
pub mod loader;
pub mod registrar;
pub mod registry;
pub mod runner;

pub use boot::{BootOptions, bootstrap};
pub use executor::{CommandExecutor, DiagnosticReport, Listing};
pub use loader::{PluginLoader, RootIndex};
pub use registrar::PluginRegistrar;
pub use registry::PluginRegistry;
pub use runner::{CommandRunner, ExecutionResult, Runner};

//! # netrun common
//!
//! Types shared by every crate in the workspace:
//!
//! * **[`device`]**: the [`Device`] model handed out by device sources.
//! * **[`plugin`]**: the three capability contracts (command, transport, device source)
//!   plus the catalog types used to register implementations.
//! * **[`error`]**: the bounded error taxonomy every plugin and core component surfaces.
//! * **[`config`]**: the YAML settings file.

pub mod config;
pub mod device;
pub mod error;
pub mod plugin;

pub use device::Device;
pub use error::{Error, ErrorKind, Result};

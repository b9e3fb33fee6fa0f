use async_trait::async_trait;

use crate::Result;

/// Session lifecycle towards a single device.
///
/// A transport is built for exactly one device and driven by exactly one task,
/// hence `&mut self` and no `Sync` bound.
#[async_trait]
pub trait Transport: Send {
    async fn connect(&mut self) -> Result<()>;

    /// Sends one command line and returns the raw device output.
    async fn send_command(&mut self, command: &str) -> Result<String>;

    /// Releases the session. Must succeed as a no-op when `connect` failed or
    /// was never called.
    async fn disconnect(&mut self) -> Result<()>;
}

//! # Runner
//!
//! Fans one command out over many `(device, transport)` pairs. Every pair runs in
//! its own tokio task:
//!
//! ```text
//! connect → send_command → disconnect → parse
//! ```
//!
//! `disconnect` runs on every path once the session was attempted, including
//! after a failed `connect` or `send_command`. A failure in one task never
//! cancels its siblings, and the batch only returns once every task finished.
//! Results come back in input order.

use std::any::Any;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use serde::Serialize;
use serde_json::Value;
use tokio::task::JoinError;
use tracing::{Instrument, debug, error, info_span, warn};

use netrun_common::plugin::{DeviceCommand, Transport};
use netrun_common::{Device, Error, ErrorKind, Result};

/// Outcome for a single device. Exactly one of `result` and `error` is set.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExecutionResult {
    pub device: String,
    pub success: bool,
    pub result: Option<Value>,
    pub error: Option<String>,
    pub error_kind: Option<ErrorKind>,
}

impl ExecutionResult {
    pub fn success(device: impl Into<String>, result: Value) -> Self {
        Self {
            device: device.into(),
            success: true,
            result: Some(result),
            error: None,
            error_kind: None,
        }
    }

    /// `Error::Unexpected` is reported as a `RunnerError` keeping the original message.
    pub fn failure(device: impl Into<String>, error: &Error) -> Self {
        Self {
            device: device.into(),
            success: false,
            result: None,
            error: Some(error.to_string()),
            error_kind: Some(error.kind().unwrap_or(ErrorKind::RunnerError)),
        }
    }

    /// Parsed result on success, error message on failure.
    pub fn into_value(self) -> Value {
        match (self.result, self.error) {
            (Some(result), _) => result,
            (None, Some(error)) => Value::String(error),
            (None, None) => Value::Null,
        }
    }
}

pub type Job = (Device, Box<dyn Transport>);
pub type ProgressCallback = Arc<dyn Fn(usize) + Send + Sync>;

#[async_trait]
pub trait CommandRunner: Send + Sync {
    async fn run(&self, jobs: Vec<Job>, command: Arc<dyn DeviceCommand>) -> Vec<ExecutionResult>;
}

#[derive(Clone, Default)]
pub struct Runner {
    on_device_done: Option<ProgressCallback>,
}

impl Runner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Called with the number of finished devices each time one completes.
    pub fn with_progress(mut self, callback: ProgressCallback) -> Self {
        self.on_device_done = Some(callback);
        self
    }
}

#[async_trait]
impl CommandRunner for Runner {
    async fn run(&self, jobs: Vec<Job>, command: Arc<dyn DeviceCommand>) -> Vec<ExecutionResult> {
        let finished: Arc<AtomicUsize> = Arc::new(AtomicUsize::new(0));
        let mut handles = Vec::with_capacity(jobs.len());

        for (device, transport) in jobs {
            let command: Arc<dyn DeviceCommand> = Arc::clone(&command);
            let finished: Arc<AtomicUsize> = Arc::clone(&finished);
            let callback: Option<ProgressCallback> = self.on_device_done.clone();
            let name: String = device.name.clone();
            let span = info_span!("device", name = %device.name);

            let handle = tokio::spawn(
                async move {
                    let outcome: Result<Value> = run_unit(transport, command.as_ref()).await;
                    let done: usize = finished.fetch_add(1, Ordering::Relaxed) + 1;
                    if let Some(callback) = callback {
                        callback(done);
                    }
                    outcome
                }
                .instrument(span),
            );
            handles.push((name, handle));
        }

        let mut results: Vec<ExecutionResult> = Vec::with_capacity(handles.len());
        for (name, handle) in handles {
            let result: ExecutionResult = match handle.await {
                Ok(Ok(value)) => ExecutionResult::success(name, value),
                Ok(Err(e)) => {
                    warn!(device = %name, kind = ?e.kind(), error = %e, "device failed");
                    ExecutionResult::failure(name, &e.into_domain())
                }
                Err(join_error) => {
                    let e: Error = task_failure(&name, join_error);
                    error!(device = %name, error = %e, "device task aborted");
                    ExecutionResult::failure(name, &e)
                }
            };
            results.push(result);
        }
        results
    }
}

async fn run_unit(mut transport: Box<dyn Transport>, command: &dyn DeviceCommand) -> Result<Value> {
    let text: String = command.command_text();
    let exchange: Result<String> = session(transport.as_mut(), &text).await;
    let released: Result<()> = transport.disconnect().await;

    let raw: String = match (exchange, released) {
        (Ok(raw), Ok(())) => raw,
        (Ok(_), Err(e)) | (Err(e), Ok(())) => return Err(e),
        (Err(e), Err(release)) => {
            warn!(error = %release, "disconnect failed after an earlier error");
            return Err(e);
        }
    };

    debug!(bytes = raw.len(), "parsing output");
    command.parse(&raw)
}

async fn session(transport: &mut dyn Transport, text: &str) -> Result<String> {
    transport.connect().await?;
    transport.send_command(text).await
}

fn task_failure(device: &str, join_error: JoinError) -> Error {
    if join_error.is_panic() {
        let message: String = panic_message(join_error.into_panic());
        Error::runner(format!("task for {device} panicked: {message}"))
    } else {
        Error::runner(format!("task for {device} was cancelled"))
    }
}

fn panic_message(payload: Box<dyn Any + Send>) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        message.to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic payload".to_string()
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

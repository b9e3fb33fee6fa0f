//! # SSH transport
//!
//! Password login over SSH, one `exec` channel per command. The output of a
//! command is whatever the channel carries until the device closes it, so no
//! prompt matching is needed.
//!
//! Host keys are not verified.
//!
//! Failure mapping is the same as for telnet:
//! * connect, login or command deadline exceeded → `TransportTimeoutError`
//! * credentials rejected → `AuthenticationError`
//! * socket and protocol errors → `TransportError`

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use russh::client::{self, Handle};
use russh::{ChannelMsg, Disconnect};
use russh_keys::key::PublicKey;
use serde::Deserialize;
use tokio::time::timeout;
use tracing::{debug, info};

use netrun_common::plugin::{
    self, Plugin, PluginConfig, PluginDescriptor, Transport, TransportPlugin,
};
use netrun_common::{Device, Error, Result};
use netrun_protocols::prompt;

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SshSettings {
    pub port: u16,
    pub connect_timeout_ms: u64,
    pub command_timeout_ms: u64,
}

impl Default for SshSettings {
    fn default() -> Self {
        Self {
            port: 22,
            connect_timeout_ms: 5000,
            command_timeout_ms: 10_000,
        }
    }
}

/// Accepts whatever host key the device presents.
struct TrustingClient;

#[async_trait]
impl client::Handler for TrustingClient {
    type Error = russh::Error;

    async fn check_server_key(
        &mut self,
        _server_public_key: &PublicKey,
    ) -> std::result::Result<bool, Self::Error> {
        Ok(true)
    }
}

pub struct SshTransport {
    device: Device,
    settings: SshSettings,
    session: Option<Handle<TrustingClient>>,
}

impl SshTransport {
    pub fn new(device: Device, settings: SshSettings) -> Self {
        Self {
            device,
            settings,
            session: None,
        }
    }

    fn address(&self) -> String {
        format!("{}:{}", self.device.host, self.settings.port)
    }

    async fn open(&self) -> Result<Handle<TrustingClient>> {
        let addr: String = self.address();
        let config = Arc::new(client::Config::default());
        let mut session: Handle<TrustingClient> = client::connect(config, addr.as_str(), TrustingClient)
            .await
            .map_err(|e| Error::transport_with(format!("failed to connect to {addr}"), e))?;

        let accepted: bool = session
            .authenticate_password(self.device.username.as_str(), self.device.password.as_str())
            .await
            .map_err(|e| Error::transport_with(format!("login exchange with {addr} failed"), e))?;
        if !accepted {
            return Err(Error::authentication(format!(
                "{addr} rejected the credentials for '{}'",
                self.device.username
            )));
        }
        Ok(session)
    }
}

impl Plugin for SshTransport {
    const NAME: &'static str = "ssh";
}

impl TransportPlugin for SshTransport {
    fn from_device(device: Device, config: &PluginConfig) -> Result<Self> {
        Ok(Self::new(device, plugin::settings(Self::NAME, config)?))
    }
}

#[async_trait]
impl Transport for SshTransport {
    async fn connect(&mut self) -> Result<()> {
        let limit: Duration = Duration::from_millis(self.settings.connect_timeout_ms);
        info!(device = %self.device.name, addr = %self.address(), "connecting via ssh");

        let session: Handle<TrustingClient> = timeout(limit, self.open()).await.map_err(|_| {
            Error::timeout(format!(
                "connecting to {} timed out after {} ms",
                self.address(),
                self.settings.connect_timeout_ms
            ))
        })??;
        self.session = Some(session);
        Ok(())
    }

    async fn send_command(&mut self, command: &str) -> Result<String> {
        let limit: Duration = Duration::from_millis(self.settings.command_timeout_ms);
        let Some(session) = self.session.as_ref() else {
            return Err(Error::transport(format!(
                "no open ssh session to {}",
                self.device.name
            )));
        };

        debug!(device = %self.device.name, command, "sending command");
        let raw: Vec<u8> = timeout(limit, exec(session, command))
            .await
            .map_err(|_| {
                Error::timeout(format!(
                    "'{command}' got no complete answer within {} ms",
                    self.settings.command_timeout_ms
                ))
            })??;

        let text: String = String::from_utf8_lossy(&raw).replace("\r\n", "\n");
        Ok(prompt::strip_ansi(&text).trim_end().to_string())
    }

    async fn disconnect(&mut self) -> Result<()> {
        let Some(session) = self.session.take() else {
            return Ok(());
        };
        debug!(device = %self.device.name, "closing ssh session");
        session
            .disconnect(Disconnect::ByApplication, "", "en")
            .await
            .map_err(|e| Error::transport_with(format!("failed to close {}", self.address()), e))
    }
}

/// Runs `command` on a fresh channel and collects stdout and stderr until the
/// channel closes.
async fn exec(session: &Handle<TrustingClient>, command: &str) -> Result<Vec<u8>> {
    let mut channel = session
        .channel_open_session()
        .await
        .map_err(|e| Error::transport_with("failed to open an ssh channel", e))?;
    channel
        .exec(true, command)
        .await
        .map_err(|e| Error::transport_with(format!("failed to start '{command}'"), e))?;

    let mut output: Vec<u8> = Vec::new();
    while let Some(message) = channel.wait().await {
        match message {
            ChannelMsg::Data { ref data } => output.extend_from_slice(data),
            ChannelMsg::ExtendedData { ref data, .. } => output.extend_from_slice(data),
            ChannelMsg::ExitStatus { exit_status } if exit_status != 0 => {
                debug!(command, exit_status, "command exited with a failure status");
            }
            _ => {}
        }
    }
    Ok(output)
}

pub fn descriptors() -> Result<Vec<PluginDescriptor>> {
    Ok(vec![PluginDescriptor::transport::<SshTransport>()])
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝

//! # Telnet transport
//!
//! Plain TCP session towards an IOS-style CLI. The session logs in when the
//! device asks for a username or password, then treats everything up to the
//! next prompt as the output of the last command.
//!
//! Failure mapping:
//! * connect or command deadline exceeded → `TransportTimeoutError`
//! * credentials rejected → `AuthenticationError`
//! * socket errors, peer closing the connection → `TransportError`

use std::borrow::Cow;
use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;
use tokio::time::timeout;
use tracing::{debug, info};

use netrun_common::plugin::{
    self, Plugin, PluginConfig, PluginDescriptor, Transport, TransportPlugin,
};
use netrun_common::{Device, Error, Result};
use netrun_protocols::prompt::{self, Screen};
use netrun_protocols::telnet::{self as wire, TelnetDecoder};

const READ_BUFFER_SIZE: usize = 4096;

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct TelnetSettings {
    pub port: u16,
    pub connect_timeout_ms: u64,
    pub command_timeout_ms: u64,
    /// Answer username/password prompts with the device credentials.
    pub login: bool,
    /// Sent once after login, e.g. `terminal length 0`.
    pub setup_commands: Vec<String>,
}

impl Default for TelnetSettings {
    fn default() -> Self {
        Self {
            port: 23,
            connect_timeout_ms: 5000,
            command_timeout_ms: 10_000,
            login: true,
            setup_commands: Vec::new(),
        }
    }
}

pub struct TelnetTransport {
    device: Device,
    settings: TelnetSettings,
    session: Option<Session>,
}

impl TelnetTransport {
    pub fn new(device: Device, settings: TelnetSettings) -> Self {
        Self {
            device,
            settings,
            session: None,
        }
    }

    fn address(&self) -> String {
        format!("{}:{}", self.device.host, self.settings.port)
    }

    async fn open(&self) -> Result<Session> {
        let addr: String = self.address();
        let stream: TcpStream = TcpStream::connect(&addr)
            .await
            .map_err(|e| Error::transport_with(format!("failed to connect to {addr}"), e))?;
        let mut session: Session = Session::new(stream, addr);

        if self.settings.login {
            session
                .login(&self.device.username, &self.device.password)
                .await?;
        } else {
            session.wait_for_input(false).await?;
        }
        Ok(session)
    }
}

impl Plugin for TelnetTransport {
    const NAME: &'static str = "telnet";
}

impl TransportPlugin for TelnetTransport {
    fn from_device(device: Device, config: &PluginConfig) -> Result<Self> {
        Ok(Self::new(device, plugin::settings(Self::NAME, config)?))
    }
}

#[async_trait]
impl Transport for TelnetTransport {
    async fn connect(&mut self) -> Result<()> {
        let limit: Duration = Duration::from_millis(self.settings.connect_timeout_ms);
        info!(device = %self.device.name, addr = %self.address(), "connecting via telnet");

        let mut session: Session = timeout(limit, self.open()).await.map_err(|_| {
            Error::timeout(format!(
                "connecting to {} timed out after {} ms",
                self.address(),
                self.settings.connect_timeout_ms
            ))
        })??;

        for command in &self.settings.setup_commands {
            let limit: Duration = Duration::from_millis(self.settings.command_timeout_ms);
            timeout(limit, session.exchange(command))
                .await
                .map_err(|_| Error::timeout(format!("setup command '{command}' timed out")))??;
        }

        self.session = Some(session);
        Ok(())
    }

    async fn send_command(&mut self, command: &str) -> Result<String> {
        let limit: Duration = Duration::from_millis(self.settings.command_timeout_ms);
        let Some(session) = self.session.as_mut() else {
            return Err(Error::transport(format!(
                "no open telnet session to {}",
                self.device.name
            )));
        };

        debug!(device = %self.device.name, command, "sending command");
        timeout(limit, session.exchange(command))
            .await
            .map_err(|_| {
                Error::timeout(format!(
                    "'{command}' got no complete answer within {} ms",
                    self.settings.command_timeout_ms
                ))
            })?
    }

    async fn disconnect(&mut self) -> Result<()> {
        let Some(mut session) = self.session.take() else {
            return Ok(());
        };
        debug!(device = %self.device.name, "closing telnet session");
        session
            .stream
            .shutdown()
            .await
            .map_err(|e| Error::transport_with(format!("failed to close {}", session.addr), e))
    }
}

struct Session {
    stream: TcpStream,
    addr: String,
    decoder: TelnetDecoder,
    /// Raw bytes since the last write. Decoded as a whole so that multibyte
    /// characters split across reads survive.
    buffer: Vec<u8>,
}

impl Session {
    fn new(stream: TcpStream, addr: String) -> Self {
        Self {
            stream,
            addr,
            decoder: TelnetDecoder::new(),
            buffer: Vec::new(),
        }
    }

    fn text(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(&self.buffer)
    }

    async fn login(&mut self, username: &str, password: &str) -> Result<()> {
        let mut sent_username: bool = false;
        let mut sent_password: bool = false;

        loop {
            let greeting: bool = !sent_username && !sent_password;
            match self.wait_for_input(greeting).await? {
                Screen::Shell => return Ok(()),
                Screen::Login if !sent_username && !sent_password => {
                    self.write_line(username).await?;
                    sent_username = true;
                }
                Screen::Password if !sent_password => {
                    self.write_line(password).await?;
                    sent_password = true;
                }
                _ => {
                    return Err(Error::authentication(format!(
                        "{} rejected the credentials for '{username}'",
                        self.addr
                    )));
                }
            }
        }
    }

    /// Sends one command and returns its cleaned output.
    async fn exchange(&mut self, command: &str) -> Result<String> {
        self.write_line(command).await?;
        loop {
            if prompt::ends_with_prompt(&self.text()) {
                let output: String = prompt::clean_output(&self.text(), command);
                self.buffer.clear();
                return Ok(output);
            }
            self.read_chunk().await?;
        }
    }

    /// Reads until the device waits for something other than more output.
    /// `greeting` is set while nothing has been sent yet.
    async fn wait_for_input(&mut self, greeting: bool) -> Result<Screen> {
        loop {
            let screen: Screen = if greeting {
                prompt::classify_greeting(&self.text())
            } else {
                prompt::classify(&self.text())
            };
            if screen != Screen::Pending {
                self.buffer.clear();
                return Ok(screen);
            }
            self.read_chunk().await?;
        }
    }

    async fn write_line(&mut self, line: &str) -> Result<()> {
        self.buffer.clear();
        self.stream
            .write_all(&wire::encode_line(line))
            .await
            .map_err(|e| Error::transport_with(format!("write to {} failed", self.addr), e))
    }

    async fn read_chunk(&mut self) -> Result<()> {
        let mut chunk: [u8; READ_BUFFER_SIZE] = [0u8; READ_BUFFER_SIZE];
        let read: usize = self
            .stream
            .read(&mut chunk)
            .await
            .map_err(|e| Error::transport_with(format!("read from {} failed", self.addr), e))?;
        if read == 0 {
            return Err(Error::transport(format!("{} closed the connection", self.addr)));
        }

        let decoded = self.decoder.feed(&chunk[..read]);
        if !decoded.replies.is_empty() {
            self.stream
                .write_all(&decoded.replies)
                .await
                .map_err(|e| Error::transport_with(format!("write to {} failed", self.addr), e))?;
        }
        self.buffer.extend_from_slice(&decoded.data);
        Ok(())
    }
}

pub fn descriptors() -> Result<Vec<PluginDescriptor>> {
    Ok(vec![PluginDescriptor::transport::<TelnetTransport>()])
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝

//! # Error taxonomy
//!
//! Every public operation of a plugin or of the core returns [`Result`]. The
//! variants of [`Error`] map one-to-one onto the kinds in [`ErrorKind`], except
//! [`Error::Unexpected`], which carries a failure nobody classified. The core
//! never lets `Unexpected` reach its callers: [`Error::into_domain`] wraps it
//! into a [`ErrorKind::RunnerError`] first.

use std::fmt;

use serde::Serialize;
use thiserror::Error;

use crate::plugin::PluginKind;

pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Names of the error kinds callers are allowed to observe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum ErrorKind {
    ConfigurationError,
    RegistryLookupError,
    TransportError,
    AuthenticationError,
    TransportTimeoutError,
    CommandError,
    RunnerError,
    ApplicationError,
    UsageError,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ConfigurationError => "ConfigurationError",
            Self::RegistryLookupError => "RegistryLookupError",
            Self::TransportError => "TransportError",
            Self::AuthenticationError => "AuthenticationError",
            Self::TransportTimeoutError => "TransportTimeoutError",
            Self::CommandError => "CommandError",
            Self::RunnerError => "RunnerError",
            Self::ApplicationError => "ApplicationError",
            Self::UsageError => "UsageError",
        }
    }

    /// Authentication and timeout failures are transport failures too.
    pub fn is_transport(&self) -> bool {
        matches!(
            self,
            Self::TransportError | Self::AuthenticationError | Self::TransportTimeoutError
        )
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Error)]
pub enum Error {
    #[error("{message}")]
    Configuration { message: String },

    #[error("no {kind} plugin named '{name}' is registered")]
    RegistryLookup { kind: PluginKind, name: String },

    #[error("{message}")]
    Transport {
        message: String,
        #[source]
        source: Option<BoxError>,
    },

    #[error("{message}")]
    Authentication {
        message: String,
        #[source]
        source: Option<BoxError>,
    },

    #[error("{message}")]
    TransportTimeout {
        message: String,
        #[source]
        source: Option<BoxError>,
    },

    #[error("{message}")]
    Command {
        message: String,
        #[source]
        source: Option<BoxError>,
    },

    #[error("{message}")]
    Runner {
        message: String,
        #[source]
        source: Option<BoxError>,
    },

    #[error("{message}")]
    Application { message: String },

    #[error("{message}")]
    Usage { message: String },

    /// A failure outside the taxonomy. Plugins should classify errors themselves
    /// and only fall back to this when they cannot.
    #[error(transparent)]
    Unexpected(BoxError),
}

impl Error {
    #[must_use]
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    #[must_use]
    pub fn lookup(kind: PluginKind, name: impl Into<String>) -> Self {
        Self::RegistryLookup {
            kind,
            name: name.into(),
        }
    }

    #[must_use]
    pub fn transport(message: impl Into<String>) -> Self {
        Self::Transport {
            message: message.into(),
            source: None,
        }
    }

    #[must_use]
    pub fn transport_with(
        message: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::Transport {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    #[must_use]
    pub fn authentication(message: impl Into<String>) -> Self {
        Self::Authentication {
            message: message.into(),
            source: None,
        }
    }

    #[must_use]
    pub fn timeout(message: impl Into<String>) -> Self {
        Self::TransportTimeout {
            message: message.into(),
            source: None,
        }
    }

    #[must_use]
    pub fn timeout_with(
        message: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::TransportTimeout {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    #[must_use]
    pub fn command(message: impl Into<String>) -> Self {
        Self::Command {
            message: message.into(),
            source: None,
        }
    }

    #[must_use]
    pub fn command_with(
        message: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::Command {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    #[must_use]
    pub fn runner(message: impl Into<String>) -> Self {
        Self::Runner {
            message: message.into(),
            source: None,
        }
    }

    #[must_use]
    pub fn application(message: impl Into<String>) -> Self {
        Self::Application {
            message: message.into(),
        }
    }

    #[must_use]
    pub fn usage(message: impl Into<String>) -> Self {
        Self::Usage {
            message: message.into(),
        }
    }

    #[must_use]
    pub fn unexpected(source: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Unexpected(Box::new(source))
    }

    /// The taxonomy kind, or `None` for [`Error::Unexpected`].
    pub fn kind(&self) -> Option<ErrorKind> {
        let kind = match self {
            Self::Configuration { .. } => ErrorKind::ConfigurationError,
            Self::RegistryLookup { .. } => ErrorKind::RegistryLookupError,
            Self::Transport { .. } => ErrorKind::TransportError,
            Self::Authentication { .. } => ErrorKind::AuthenticationError,
            Self::TransportTimeout { .. } => ErrorKind::TransportTimeoutError,
            Self::Command { .. } => ErrorKind::CommandError,
            Self::Runner { .. } => ErrorKind::RunnerError,
            Self::Application { .. } => ErrorKind::ApplicationError,
            Self::Usage { .. } => ErrorKind::UsageError,
            Self::Unexpected(_) => return None,
        };
        Some(kind)
    }

    pub fn is_domain(&self) -> bool {
        self.kind().is_some()
    }

    /// Folds [`Error::Unexpected`] into a `RunnerError` with the same message.
    /// Taxonomy errors pass through untouched.
    #[must_use]
    pub fn into_domain(self) -> Self {
        match self {
            Self::Unexpected(source) => Self::Runner {
                message: source.to_string(),
                source: Some(source),
            },
            other => other,
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝

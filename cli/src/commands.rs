pub mod diagnose;
pub mod list;
pub mod run;

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use netrun_common::config::{CONFIG_PATH_ENV, DEFAULT_CONFIG_FILE, LogLevel};
use netrun_core::Listing;

#[derive(Parser)]
#[command(name = "netrun")]
#[command(version, about = "Run commands across network devices in parallel.")]
pub struct CommandLine {
    /// Settings file
    #[arg(long, short, global = true, env = CONFIG_PATH_ENV, default_value = DEFAULT_CONFIG_FILE)]
    pub config: PathBuf,

    /// Log level, overrides the settings file
    #[arg(long, global = true)]
    pub log_level: Option<LogLevel>,

    /// Colon-separated extra plugin roots, searched after the built-in ones
    #[arg(long, global = true)]
    pub plugin_roots: Option<String>,

    /// Fail on unloadable plugin sources and duplicate plugin names
    #[arg(long, global = true)]
    pub strict_plugins: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run one command on devices or sites
    #[command(alias = "r")]
    Run {
        command: String,
        #[arg(required = true)]
        devices: Vec<String>,
        /// Print results as JSON
        #[arg(long)]
        json: bool,
    },
    /// List devices, sites or registered plugins
    #[command(alias = "l")]
    List {
        what: ListTarget,
        /// Only devices of this site
        #[arg(long)]
        site: Option<String>,
    },
    /// Run the diagnostic command set on devices or sites
    #[command(alias = "d")]
    Diagnose {
        #[arg(required = true)]
        devices: Vec<String>,
        /// Print results as JSON
        #[arg(long)]
        json: bool,
    },
}

#[derive(Clone, Copy, ValueEnum)]
pub enum ListTarget {
    Devices,
    Sites,
    Commands,
    Transports,
    Sources,
}

impl ListTarget {
    pub fn listing(self, site: Option<String>) -> Listing {
        match self {
            ListTarget::Devices => Listing::Devices { site },
            ListTarget::Sites => Listing::Sites,
            ListTarget::Commands => Listing::Commands,
            ListTarget::Transports => Listing::Transports,
            ListTarget::Sources => Listing::DeviceSources,
        }
    }
}

impl CommandLine {
    pub fn parse_args() -> Self {
        Self::parse()
    }
}

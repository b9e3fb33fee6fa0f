mod commands;
mod terminal;

use std::sync::Arc;

use anyhow::Context;
use commands::{CommandLine, Commands, diagnose, list, run};
use netrun_common::config::{LogLevel, Settings};
use netrun_core::boot::bootstrap_with_runner;
use netrun_core::registrar::{extra_roots_from_env, parse_extra_roots};
use netrun_core::{BootOptions, CommandExecutor, RootIndex, Runner};
use terminal::{logging, print, spinner};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let commands = CommandLine::parse_args();

    let settings: Settings = Settings::load(&commands.config)
        .with_context(|| format!("could not load settings from {}", commands.config.display()))?;
    let level: LogLevel = commands.log_level.unwrap_or(settings.log_level);
    logging::init_logging(level);

    let options = BootOptions {
        extra_roots: match &commands.plugin_roots {
            Some(roots) => parse_extra_roots(roots),
            None => extra_roots_from_env(),
        },
        strict: commands.strict_plugins,
    };
    let runner = Runner::new().with_progress(Arc::new(spinner::report_progress));
    let executor: CommandExecutor =
        bootstrap_with_runner(settings, &RootIndex::with_builtin(), options, Arc::new(runner))?;

    match commands.command {
        Commands::Run {
            command,
            devices,
            json,
        } => {
            if !json {
                print::banner();
            }
            run::run(&executor, &command, &devices, json).await
        }
        Commands::List { what, site } => {
            print::banner();
            list::list(&executor, what.listing(site)).await
        }
        Commands::Diagnose { devices, json } => {
            if !json {
                print::banner();
            }
            diagnose::diagnose(&executor, &devices, json).await
        }
    }
}

use colored::*;
use serde_json::Value;
use tracing::debug;

use netrun_common::plugin::DeviceCommand;
use netrun_common::plugin::command::default_summary;
use netrun_core::{CommandExecutor, DiagnosticReport};

use crate::mprint;
use crate::terminal::{colors, print, spinner};

pub async fn diagnose(executor: &CommandExecutor, devices: &[String], json: bool) -> anyhow::Result<()> {
    if !json {
        let targets: Vec<String> = executor.expand_device_names(devices).await?;
        print::header("running diagnostics");
        spinner::start("Collecting diagnostics...", targets.len());
    }

    let outcome = executor.diagnostic(devices).await;
    spinner::finish();
    let reports: Vec<DiagnosticReport> = outcome?;

    if json {
        println!("{}", serde_json::to_string_pretty(&reports)?);
        return Ok(());
    }

    if reports.is_empty() {
        print::no_results("devices");
        return Ok(());
    }

    for (idx, report) in reports.iter().enumerate() {
        print::tree_head(idx, &report.device);
        let details: Vec<(String, ColoredString)> = report
            .checks
            .iter()
            .map(|(command, value)| summarise(executor, command, value))
            .collect();
        print::as_tree_one_level(details);
        if idx + 1 != reports.len() {
            mprint!();
        }
    }
    print::end_of_program();
    Ok(())
}

/// Row heading and summary of one check. Rows are headed by the command's
/// label, a bare string value is a failure.
fn summarise(executor: &CommandExecutor, command: &str, value: &Value) -> (String, ColoredString) {
    let plugin: Option<Box<dyn DeviceCommand>> = executor
        .registry()
        .command(command, executor.settings().plugin_config(command))
        .inspect_err(|e| debug!(command, error = %e, "falling back to the generic summary"))
        .ok();

    let heading: String = match plugin.as_deref().map(|plugin| plugin.label()) {
        Some(label) if !label.is_empty() => label.to_string(),
        _ => command.to_string(),
    };
    let summary: ColoredString = match (value, &plugin) {
        (Value::String(message), _) => message.color(colors::FAILURE),
        (_, Some(plugin)) => plugin.summarise(value).normal(),
        (_, None) => default_summary(value).normal(),
    };
    (heading, summary)
}

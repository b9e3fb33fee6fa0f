use std::time::{Duration, Instant};

use colored::*;
use netrun_common::plugin::DeviceCommand;
use netrun_core::{CommandExecutor, ExecutionResult};

use crate::mprint;
use crate::terminal::{colors, print, spinner};

type Detail = (String, ColoredString);

pub async fn run(
    executor: &CommandExecutor,
    command_name: &str,
    devices: &[String],
    json: bool,
) -> anyhow::Result<()> {
    let targets: Vec<String> = executor.expand_device_names(devices).await?;
    let command: Box<dyn DeviceCommand> = executor
        .registry()
        .command(command_name, executor.settings().plugin_config(command_name))?;

    if !json {
        print::header(&format!("running {command_name}"));
        spinner::start(&format!("Sending '{}'...", command.command_text()), targets.len());
    }

    let start_time: Instant = Instant::now();
    let outcome = executor.execute(&targets, command_name).await;
    spinner::finish();
    let results: Vec<ExecutionResult> = outcome?;

    if json {
        println!("{}", serde_json::to_string_pretty(&results)?);
        return Ok(());
    }

    if results.is_empty() {
        print::no_results("devices");
        return Ok(());
    }

    print_results(&results, command.as_ref());
    print_summary(&results, start_time.elapsed());
    Ok(())
}

fn print_results(results: &[ExecutionResult], command: &dyn DeviceCommand) {
    for (idx, result) in results.iter().enumerate() {
        print::tree_head(idx, &result.device);
        print::as_tree_one_level(details(result, command));

        if let Some(value) = &result.result {
            let rendered: String = command.render(value);
            if rendered.lines().count() > 1 {
                print::indented_block(&rendered);
            }
        }

        if idx + 1 != results.len() {
            mprint!();
        }
    }
}

fn details(result: &ExecutionResult, command: &dyn DeviceCommand) -> Vec<Detail> {
    match (&result.result, &result.error) {
        (Some(value), _) => vec![
            ("Status".to_string(), "ok".color(colors::SUCCESS).bold()),
            ("Summary".to_string(), command.summarise(value).normal()),
        ],
        (None, error) => {
            let kind: String = result
                .error_kind
                .map(|kind| kind.to_string())
                .unwrap_or_default();
            vec![
                ("Status".to_string(), "failed".color(colors::FAILURE).bold()),
                ("Kind".to_string(), kind.color(colors::ERROR_KIND)),
                (
                    "Error".to_string(),
                    error.as_deref().unwrap_or_default().color(colors::FAILURE),
                ),
            ]
        }
    }
}

fn print_summary(results: &[ExecutionResult], total_time: Duration) {
    let succeeded: usize = results.iter().filter(|r| r.success).count();
    let failed: usize = results.len() - succeeded;

    let succeeded: ColoredString = format!("{succeeded} succeeded").bold().green();
    let failed: ColoredString = if failed > 0 {
        format!("{failed} failed").bold().red()
    } else {
        format!("{failed} failed").normal()
    };
    let total_time: ColoredString = format!("{:.2}s", total_time.as_secs_f64()).bold().yellow();
    let output: ColoredString =
        format!("Run Complete: {succeeded}, {failed} in {total_time}").color(colors::TEXT_DEFAULT);

    print::fat_separator();
    print::centerln(&output.to_string());
}

use colored::*;
use netrun_common::Device;
use netrun_core::{CommandExecutor, Listing};

use crate::mprint;
use crate::terminal::{colors, print};

pub async fn list(executor: &CommandExecutor, listing: Listing) -> anyhow::Result<()> {
    match &listing {
        Listing::Devices { site } => {
            let devices: Vec<Device> = executor.inventory(site.as_deref()).await?;
            print_devices(&devices);
        }
        other => {
            let names: Vec<String> = executor.list(other).await?;
            print_names(title(other), &names);
        }
    }
    Ok(())
}

fn title(listing: &Listing) -> &'static str {
    match listing {
        Listing::Devices { .. } => "devices",
        Listing::Sites => "sites",
        Listing::Commands => "commands",
        Listing::Transports => "transports",
        Listing::DeviceSources => "device sources",
    }
}

fn print_names(title: &str, names: &[String]) {
    if names.is_empty() {
        print::no_results(title);
        return;
    }
    print::header(title);
    for name in names {
        print::print_status(name);
    }
}

fn print_devices(devices: &[Device]) {
    if devices.is_empty() {
        print::no_results("devices");
        return;
    }

    print::header("devices");
    for (idx, device) in devices.iter().enumerate() {
        print::tree_head(idx, &device.name);
        print::as_tree_one_level(vec![
            ("Host".to_string(), device.host.normal()),
            ("Protocol".to_string(), device.protocol.color(colors::ACCENT)),
            (
                "Platform".to_string(),
                match device.platform.as_str() {
                    "" => "unknown".dimmed(),
                    platform => platform.normal(),
                },
            ),
            (
                "Site".to_string(),
                device.site.as_deref().unwrap_or("-").normal(),
            ),
        ]);
        if idx + 1 != devices.len() {
            mprint!();
        }
    }
}

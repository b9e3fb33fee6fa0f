use serde_json::{Value, json};

use netrun_common::plugin::{
    CommandPlugin, DeviceCommand, Plugin, PluginConfig, PluginDescriptor,
};
use netrun_common::{Error, Result};

const HEADERS: &[&str] = &["INTF", "IPADDR", "STATUS", "PROTO"];
// Interface, IP-Address, OK?, Method, Status (one or more words), Protocol
const MIN_COLUMNS: usize = 6;

#[derive(Debug, Default)]
pub struct ShowIpInterfaceBrief;

impl Plugin for ShowIpInterfaceBrief {
    const NAME: &'static str = "show-ip-interface-brief";
}

impl CommandPlugin for ShowIpInterfaceBrief {
    fn from_config(_config: &PluginConfig) -> Result<Self> {
        Ok(Self)
    }
}

impl DeviceCommand for ShowIpInterfaceBrief {
    fn command_text(&self) -> String {
        "show ip interface brief".to_string()
    }

    fn parse(&self, raw_output: &str) -> Result<Value> {
        let mut lines = raw_output
            .lines()
            .skip_while(|l| !(l.trim_start().starts_with("Interface") && l.contains("IP-Address")));

        if lines.next().is_none() {
            return Err(Error::command("no interface table in 'show ip interface brief' output"));
        }

        let rows: Vec<Value> = lines
            .filter_map(|line| {
                let cols: Vec<&str> = line.split_whitespace().collect();
                if cols.len() < MIN_COLUMNS {
                    return None;
                }
                let last: usize = cols.len() - 1;
                Some(json!({
                    "INTF": cols[0],
                    "IPADDR": cols[1],
                    "STATUS": cols[4..last].join(" "),
                    "PROTO": cols[last],
                }))
            })
            .collect();

        Ok(Value::Array(rows))
    }

    fn label(&self) -> &str {
        "Interfaces (IP Brief)"
    }

    fn table_headers(&self) -> Option<&'static [&'static str]> {
        Some(HEADERS)
    }

    fn summarise(&self, result: &Value) -> String {
        let Some(rows) = result.as_array().filter(|rows| !rows.is_empty()) else {
            return "[no interface info]".to_string();
        };
        let up: usize = rows.iter().filter(|r| r["STATUS"] == "up").count();
        format!("{} up, {} down", up, rows.len() - up)
    }
}

pub fn descriptors() -> Result<Vec<PluginDescriptor>> {
    Ok(vec![PluginDescriptor::command::<ShowIpInterfaceBrief>()])
}

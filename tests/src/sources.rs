#![cfg(test)]
use std::fs;
use std::path::PathBuf;

use serde_json::json;
use tempfile::TempDir;

use netrun_common::ErrorKind;
use netrun_common::config::{LogLevel, Settings};
use netrun_core::Listing;

use crate::fakes::{self, LAB_ROOT, calls};

const DEVICES: &str = r#"
devices:
  - name: core-1
    host: 10.30.0.1
    username: netops
    password: secret
    protocol: scripted
    platform: ios
    site: dc1
  - name: core-2
    host: 10.30.0.2
    username: netops
    password: wrong
    protocol: scripted
    site: dc1
  - name: edge-1
    host: 10.30.1.1
    protocol: loopback
    site: dc2
"#;

fn workspace() -> (TempDir, PathBuf) {
    let dir = tempfile::tempdir().unwrap();
    let devices = dir.path().join("devices.yaml");
    fs::write(&devices, DEVICES).unwrap();

    let settings = dir.path().join("netrun.yaml");
    fs::write(
        &settings,
        format!(
            "device_repo: yaml\nlog_level: debug\nplugin_configs:\n  yaml:\n    device_file: {}\n  scripted:\n    delay_ms: 10\n",
            devices.display()
        ),
    )
    .unwrap();
    (dir, settings)
}

#[tokio::test]
async fn settings_file_drives_a_yaml_inventory() {
    let (_dir, path) = workspace();
    let settings = Settings::load(&path).unwrap();
    assert_eq!(settings.device_source, "yaml");
    assert_eq!(settings.log_level, LogLevel::Debug);

    let executor = fakes::boot(settings, &[LAB_ROOT], false).unwrap();

    assert_eq!(executor.list(&Listing::Sites).await.unwrap(), ["dc1", "dc2"]);

    let results = executor
        .execute(&["dc1".to_string(), "edge-1".to_string()], "echo-test")
        .await
        .unwrap();

    let devices: Vec<&str> = results.iter().map(|r| r.device.as_str()).collect();
    assert_eq!(devices, ["core-1", "core-2", "edge-1"]);
    assert_eq!(results[0].result, Some(json!({"raw": "core-1 ran echo test"})));
    assert_eq!(results[1].error_kind, Some(ErrorKind::AuthenticationError));
    assert_eq!(results[2].result, Some(json!({"raw": "echo test"})));
    assert_eq!(calls("10.30.0.2").disconnects, 1);
}

#[tokio::test]
async fn missing_device_file_is_a_configuration_error() {
    let settings = Settings::new("yaml")
        .with_plugin_config("yaml", json!({"device_file": "/nonexistent/netrun/devices.yaml"}));
    let executor = fakes::boot(settings, &[], false).unwrap();

    let err = executor
        .execute(&["core-1".to_string()], "echo-test")
        .await
        .unwrap_err();
    assert_eq!(err.kind(), Some(ErrorKind::ConfigurationError));
}

#[test]
fn missing_settings_file_is_a_configuration_error() {
    let dir = tempfile::tempdir().unwrap();
    let err = Settings::load(&dir.path().join("netrun.yaml")).unwrap_err();
    assert_eq!(err.kind(), Some(ErrorKind::ConfigurationError));
}

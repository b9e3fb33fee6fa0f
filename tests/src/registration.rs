#![cfg(test)]
use serde_json::json;

use netrun_common::ErrorKind;
use netrun_common::plugin::PluginKind;
use netrun_core::Listing;

use crate::fakes::{self, BROKEN_ROOT, LAB_ROOT, SHADOW_ROOT, calls, device, lab_settings};

#[tokio::test]
async fn later_root_shadows_builtin_command() {
    let settings = lab_settings(vec![device("shadow-1", "10.20.0.1")], 0);
    let executor = fakes::boot(settings, &[LAB_ROOT, SHADOW_ROOT], false).unwrap();

    let outcome = executor
        .run(&["shadow-1".to_string()], "echo-test")
        .await
        .unwrap();

    assert_eq!(outcome["shadow-1"], json!({"loud": "SHADOW-1 RAN ECHO LOUD"}));
}

#[test]
fn strict_boot_rejects_shadowing() {
    let settings = lab_settings(Vec::new(), 0);
    let err = fakes::boot(settings, &[LAB_ROOT, SHADOW_ROOT], true).err().unwrap();

    assert_eq!(err.kind(), Some(ErrorKind::ConfigurationError));
    assert!(err.to_string().contains("echo-test"), "{err}");
}

#[tokio::test]
async fn broken_module_is_skipped_and_the_rest_loads() {
    let settings = lab_settings(vec![device("broken-1", "10.21.0.1")], 0);
    let executor = fakes::boot(settings, &[BROKEN_ROOT, "lab.nowhere"], false).unwrap();

    assert!(executor.registry().contains(PluginKind::Transport, "scripted"));
    let results = executor
        .execute(&["broken-1".to_string()], "echo-test")
        .await
        .unwrap();
    assert!(results[0].success);
    assert_eq!(calls("10.21.0.1").connects, 1);
}

#[test]
fn strict_boot_rejects_broken_modules() {
    let err = fakes::boot(lab_settings(Vec::new(), 0), &[BROKEN_ROOT], true)
        .err()
        .unwrap();

    assert_eq!(err.kind(), Some(ErrorKind::ConfigurationError));
    assert!(err.to_string().contains("lab.broken.missing"), "{err}");
}

#[tokio::test]
async fn listings_cover_every_kind() {
    let mut tagged = device("list-1", "10.22.0.1");
    tagged["site"] = json!("north");
    let settings = lab_settings(vec![tagged, device("list-2", "10.22.0.2")], 0);
    let executor = fakes::boot(settings, &[LAB_ROOT], false).unwrap();

    assert_eq!(
        executor.list(&Listing::Commands).await.unwrap(),
        [
            "echo-test",
            "show-environment",
            "show-ip-interface-brief",
            "show-logging",
            "show-memory-stats",
            "show-processes-cpu",
            "show-running-config",
            "show-version",
        ]
    );
    assert_eq!(
        executor.list(&Listing::Transports).await.unwrap(),
        ["loopback", "scripted", "ssh", "telnet"]
    );
    assert_eq!(
        executor.list(&Listing::DeviceSources).await.unwrap(),
        ["inline", "yaml"]
    );
    assert_eq!(executor.list(&Listing::Sites).await.unwrap(), ["north"]);
    assert_eq!(
        executor
            .list(&Listing::Devices { site: None })
            .await
            .unwrap(),
        ["list-1", "list-2"]
    );
    assert_eq!(
        executor
            .list(&Listing::Devices {
                site: Some("north".into())
            })
            .await
            .unwrap(),
        ["list-1"]
    );
}

#[tokio::test]
async fn unknown_device_source_fails_lookup() {
    let mut settings = lab_settings(Vec::new(), 0);
    settings.device_source = "cmdb".to_string();
    let executor = fakes::boot(settings, &[], false).unwrap();

    let err = executor.list(&Listing::Sites).await.unwrap_err();
    assert_eq!(err.kind(), Some(ErrorKind::RegistryLookupError));
    assert!(err.to_string().contains("device source"), "{err}");
    assert!(err.to_string().contains("cmdb"), "{err}");
}

#![cfg(test)]
use std::time::{Duration, Instant};

use serde_json::{Value, json};

use netrun_common::ErrorKind;
use netrun_common::config::Settings;
use netrun_core::executor::DIAGNOSTIC_COMMANDS;
use netrun_core::{CommandExecutor, ExecutionResult, Listing};

use crate::fakes::{self, LAB_ROOT, UNRELIABLE_ROOT, calls, device, lab, lab_settings};

fn names(list: &[&str]) -> Vec<String> {
    list.iter().map(|name| name.to_string()).collect()
}

fn loopback_lab(delay_ms: u64, rejected_users: &[&str]) -> CommandExecutor {
    let devices: Vec<Value> = (1..=5)
        .map(|i| {
            json!({
                "name": format!("lo-{i}"),
                "host": format!("127.0.0.{i}"),
                "username": format!("user{i}"),
                "protocol": "loopback",
            })
        })
        .collect();
    let settings = Settings::new("inline")
        .with_plugin_config("inline", json!({ "devices": devices }))
        .with_plugin_config(
            "loopback",
            json!({ "delay_ms": delay_ms, "rejected_users": rejected_users }),
        );
    fakes::boot(settings, &[], false).unwrap()
}

const LOOPBACK_DEVICES: [&str; 5] = ["lo-1", "lo-2", "lo-3", "lo-4", "lo-5"];

/// Five devices that each spend 300ms in their session finish together, not one after another.
#[tokio::test]
async fn devices_run_concurrently() {
    let executor = loopback_lab(100, &[]);

    let start: Instant = Instant::now();
    let outcome = executor.run(&names(&LOOPBACK_DEVICES), "echo-test").await.unwrap();
    let elapsed: Duration = start.elapsed();

    assert_eq!(outcome.keys().collect::<Vec<_>>(), LOOPBACK_DEVICES);
    assert!(outcome.values().all(|value| *value == json!({"raw": "echo test"})));
    assert!(elapsed < Duration::from_millis(1000), "took {elapsed:?}");
}

#[tokio::test]
async fn rejected_login_only_fails_its_own_device() {
    let executor = loopback_lab(20, &["user5"]);

    let results = executor
        .execute(&names(&LOOPBACK_DEVICES), "echo-test")
        .await
        .unwrap();
    assert!(results[..4].iter().all(|r| r.success));
    assert_eq!(results[4].error_kind, Some(ErrorKind::AuthenticationError));

    let outcome = executor.run(&names(&LOOPBACK_DEVICES), "echo-test").await.unwrap();
    assert_eq!(outcome.len(), 5);
    for name in &LOOPBACK_DEVICES[..4] {
        assert_eq!(outcome[*name], json!({"raw": "echo test"}));
    }
    assert_eq!(outcome["lo-5"], json!("login rejected for 'user5' on lo-5"));
}

#[tokio::test]
async fn one_failed_login_does_not_affect_the_others() {
    let mut locked = device("auth-2", "10.2.0.2");
    locked["password"] = json!("wrong");
    let executor = lab(vec![device("auth-1", "10.2.0.1"), locked, device("auth-3", "10.2.0.3")]).unwrap();

    let results: Vec<ExecutionResult> = executor
        .execute(&names(&["auth-1", "auth-2", "auth-3"]), "echo-test")
        .await
        .unwrap();

    let devices: Vec<&str> = results.iter().map(|r| r.device.as_str()).collect();
    assert_eq!(devices, ["auth-1", "auth-2", "auth-3"]);

    assert!(results[0].success && results[2].success);
    assert_eq!(results[0].result, Some(json!({"raw": "auth-1 ran echo test"})));

    let failed = &results[1];
    assert!(!failed.success);
    assert!(failed.result.is_none());
    assert_eq!(failed.error_kind, Some(ErrorKind::AuthenticationError));
    assert_eq!(failed.error.as_deref(), Some("login rejected for netops"));

    for host in ["10.2.0.1", "10.2.0.2", "10.2.0.3"] {
        let seen = calls(host);
        assert_eq!((seen.connects, seen.disconnects), (1, 1), "{host}");
    }
}

#[tokio::test]
async fn unknown_device_aborts_before_any_connection() {
    let executor = lab(vec![device("known-1", "10.3.0.1")]).unwrap();

    let err = executor
        .execute(&names(&["known-1", "ghost"]), "echo-test")
        .await
        .unwrap_err();

    assert_eq!(err.kind(), Some(ErrorKind::ApplicationError));
    assert!(err.to_string().contains("ghost"));
    assert_eq!(calls("10.3.0.1").connects, 0);
}

#[tokio::test]
async fn unknown_command_fails_the_whole_call() {
    let executor = lab(vec![device("cmd-1", "10.4.0.1")]).unwrap();

    let err = executor
        .execute(&names(&["cmd-1"]), "reload-everything")
        .await
        .unwrap_err();

    assert_eq!(err.kind(), Some(ErrorKind::RegistryLookupError));
    assert!(err.to_string().contains("reload-everything"));
    assert_eq!(calls("10.4.0.1").connects, 0);
}

#[tokio::test]
async fn missing_transport_fails_the_whole_call() {
    let mut netconf = device("nc-1", "10.5.0.1");
    netconf["protocol"] = json!("netconf");
    let executor = lab(vec![netconf]).unwrap();

    let err = executor.execute(&names(&["nc-1"]), "echo-test").await.unwrap_err();

    assert_eq!(err.kind(), Some(ErrorKind::RegistryLookupError));
    assert!(err.to_string().contains("transport"));
}

#[tokio::test]
async fn unexpected_and_panicking_transports_become_runner_errors() {
    let mut flaky = device("flaky-1", "10.6.0.1");
    flaky["platform"] = json!("flaky");
    let mut crashing = device("crash-1", "10.6.0.2");
    crashing["platform"] = json!("panics");
    let executor = lab(vec![flaky, crashing, device("fine-1", "10.6.0.3")]).unwrap();

    let results = executor
        .execute(&names(&["flaky-1", "crash-1", "fine-1"]), "echo-test")
        .await
        .unwrap();

    assert_eq!(results[0].error_kind, Some(ErrorKind::RunnerError));
    assert_eq!(results[0].error.as_deref(), Some("connection reset by peer"));
    assert_eq!(calls("10.6.0.1").disconnects, 1);

    assert_eq!(results[1].error_kind, Some(ErrorKind::RunnerError));
    assert!(results[1].error.as_deref().unwrap().contains("scripted transport crashed"));

    assert!(results[2].success);
}

#[tokio::test]
async fn failing_inventory_is_a_runner_error() {
    let executor = fakes::boot(Settings::new("flaky-src"), &[UNRELIABLE_ROOT], false).unwrap();

    let err = executor.execute(&names(&["any-1"]), "echo-test").await.unwrap_err();
    assert_eq!(err.kind(), Some(ErrorKind::RunnerError));
    assert_eq!(err.to_string(), "http 502 from inventory");

    let err = executor.list(&Listing::Sites).await.unwrap_err();
    assert_eq!(err.kind(), Some(ErrorKind::RunnerError));
}

#[tokio::test]
async fn failing_command_constructor_is_a_runner_error() {
    let settings = lab_settings(vec![device("lic-1", "10.13.0.1")], 0);
    let executor = fakes::boot(settings, &[LAB_ROOT, UNRELIABLE_ROOT], false).unwrap();

    let err = executor.execute(&names(&["lic-1"]), "licensed").await.unwrap_err();
    assert_eq!(err.kind(), Some(ErrorKind::RunnerError));
    assert_eq!(err.to_string(), "license.key not found");
    assert_eq!(calls("10.13.0.1").connects, 0);
}

#[tokio::test]
async fn timeouts_keep_their_kind() {
    let mut silent = device("quiet-1", "10.7.0.1");
    silent["platform"] = json!("silent");
    let executor = lab(vec![silent]).unwrap();

    let results = executor.execute(&names(&["quiet-1"]), "echo-test").await.unwrap();

    assert_eq!(results[0].error_kind, Some(ErrorKind::TransportTimeoutError));
    assert_eq!(calls("10.7.0.1").disconnects, 1);
}

#[tokio::test]
async fn run_maps_devices_to_result_or_message() {
    let mut locked = device("map-2", "10.8.0.2");
    locked["password"] = json!("wrong");
    let executor = lab(vec![device("map-1", "10.8.0.1"), locked]).unwrap();

    let outcome = executor.run(&names(&["map-1", "map-2"]), "echo-test").await.unwrap();

    assert_eq!(outcome.len(), 2);
    assert_eq!(outcome["map-1"], json!({"raw": "map-1 ran echo test"}));
    assert_eq!(outcome["map-2"], json!("login rejected for netops"));
}

#[tokio::test]
async fn sites_expand_and_repeats_collapse() {
    let mut east_1 = device("east-1", "10.9.0.1");
    east_1["site"] = json!("east");
    let mut east_2 = device("east-2", "10.9.0.2");
    east_2["site"] = json!("east");
    let mut west_1 = device("west-1", "10.9.1.1");
    west_1["site"] = json!("west");
    let executor = lab(vec![east_1, east_2, west_1]).unwrap();

    let results = executor
        .execute(&names(&["east-2", "east", "east-2"]), "echo-test")
        .await
        .unwrap();

    let devices: Vec<&str> = results.iter().map(|r| r.device.as_str()).collect();
    assert_eq!(devices, ["east-2", "east-1"]);
    assert_eq!(calls("10.9.0.2").connects, 1);
    assert_eq!(calls("10.9.1.1").connects, 0);
}

#[tokio::test]
async fn empty_request_contacts_nobody() {
    let executor = lab(vec![device("idle-1", "10.10.0.1")]).unwrap();

    assert!(executor.execute(&[], "echo-test").await.unwrap().is_empty());
    assert!(executor.run(&[], "echo-test").await.unwrap().is_empty());
    assert_eq!(calls("10.10.0.1").connects, 0);
}

async fn diagnose(executor: &CommandExecutor, devices: &[&str]) -> Vec<(String, Vec<(String, Value)>)> {
    executor
        .diagnostic(&names(devices))
        .await
        .unwrap()
        .into_iter()
        .map(|report| (report.device, report.checks))
        .collect()
}

#[tokio::test]
async fn diagnostic_runs_every_check_on_every_device() {
    let executor = lab(vec![device("diag-1", "10.11.0.1"), device("diag-2", "10.11.0.2")]).unwrap();

    let reports = diagnose(&executor, &["diag-1", "diag-2"]).await;

    assert_eq!(reports.len(), 2);
    for (name, checks) in &reports {
        let commands: Vec<&str> = checks.iter().map(|(c, _)| c.as_str()).collect();
        assert_eq!(commands, DIAGNOSTIC_COMMANDS);

        // Scripted output is not IOS, so the structured parsers reject it.
        for (command, value) in &checks[..4] {
            let message = value.as_str().unwrap();
            assert!(!message.starts_with("[error] "), "{name} {command}: {message}");
        }
        assert_eq!(checks[4].1, json!([]));
    }
    assert_eq!(calls("10.11.0.1").connects, 5);
}

#[tokio::test]
async fn diagnostic_records_whole_command_failures_per_device() {
    let executor = lab(vec![device("diag-3", "10.12.0.1")]).unwrap();

    let reports = diagnose(&executor, &["diag-3", "phantom"]).await;

    assert_eq!(reports.len(), 2);
    for (_, checks) in &reports {
        assert_eq!(checks.len(), DIAGNOSTIC_COMMANDS.len());
        for (_, value) in checks {
            let message = value.as_str().unwrap();
            assert!(message.starts_with("[error] "), "{message}");
            assert!(message.contains("phantom"), "{message}");
        }
    }
    assert_eq!(calls("10.12.0.1").connects, 0);
}

//! Command-line behavior of the `wnt` binary
//!
//! Every test points the inventory at temporary files so no test touches the
//! wireless adapter or the host's saved networks.

use assert_cmd::prelude::*;
use predicates::prelude::*;
use std::fs;
use std::path::Path;
use std::process::Command;
use tempfile::TempDir;

fn wnt(dir: &Path) -> Command {
    let mut cmd = Command::cargo_bin("wnt").unwrap();
    cmd.current_dir(dir)
        .env_remove("WIFI_DESTINATION")
        .env_remove("WIFI_INTERFACE")
        .env_remove("WIFI_PROBE_COUNT")
        .env_remove("WIFI_PROBE_TARGET")
        .env("WIFI_SETTINGS_PATH", dir.join("settings.json"));
    cmd
}

/// Inventory files that hold no networks at all
fn empty_inventory(dir: &Path) -> (String, String) {
    let db = dir.join("network_db");
    let supplicant = dir.join("wpa_supplicant.conf");
    fs::write(&db, "").unwrap();
    fs::write(&supplicant, "ctrl_interface=DIR=/var/run/wpa_supplicant\nupdate_config=1\n").unwrap();
    (db.display().to_string(), supplicant.display().to_string())
}

#[test]
fn test_help_lists_main_flags() {
    let dir = TempDir::new().unwrap();
    wnt(dir.path())
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("--watch"))
        .stdout(predicate::str::contains("--count"))
        .stdout(predicate::str::contains("--set-destination"));
}

#[test]
fn test_version_flag() {
    let dir = TempDir::new().unwrap();
    wnt(dir.path())
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn test_print_env_example() {
    let dir = TempDir::new().unwrap();
    wnt(dir.path())
        .arg("--print-env-example")
        .assert()
        .success()
        .stdout(predicate::str::contains("WIFI_PROBE_COUNT"))
        .stdout(predicate::str::contains("WIFI_NETWORK_DB"));
}

#[test]
fn test_empty_inventory_reports_nothing_to_test() {
    let dir = TempDir::new().unwrap();
    let (db, supplicant) = empty_inventory(dir.path());

    wnt(dir.path())
        .env("WIFI_NETWORK_DB", db)
        .env("WIFI_SUPPLICANT_CONF", supplicant)
        .arg("--no-color")
        .assert()
        .success()
        .stdout(predicate::str::contains("No networks to test"));
}

#[test]
fn test_empty_inventory_as_json() {
    let dir = TempDir::new().unwrap();
    let (db, supplicant) = empty_inventory(dir.path());

    wnt(dir.path())
        .env("WIFI_NETWORK_DB", db)
        .env("WIFI_SUPPLICANT_CONF", supplicant)
        .arg("--json")
        .assert()
        .success()
        .stdout(predicate::str::contains("\"run_id\""));
}

#[test]
fn test_missing_inventory_reports_run_failure() {
    let dir = TempDir::new().unwrap();

    wnt(dir.path())
        .env("WIFI_NETWORK_DB", dir.path().join("missing-db"))
        .env("WIFI_SUPPLICANT_CONF", dir.path().join("missing.conf"))
        .arg("--no-color")
        .assert()
        .code(2)
        .stdout(predicate::str::contains("test run failed"));
}

#[test]
fn test_count_out_of_range_rejected() {
    let dir = TempDir::new().unwrap();
    wnt(dir.path()).args(["--count", "0"]).assert().failure();
    wnt(dir.path()).args(["--count", "101"]).assert().failure();
}

#[test]
fn test_conflicting_flags_rejected() {
    let dir = TempDir::new().unwrap();

    wnt(dir.path())
        .args(["--color", "--no-color"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("--no-color"));

    wnt(dir.path())
        .args(["--interval", "5"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("--watch"));

    wnt(dir.path())
        .args(["--watch", "--set-subscriber", "42"])
        .assert()
        .failure();
}

#[test]
fn test_settings_are_saved_and_cleared() {
    let dir = TempDir::new().unwrap();
    let settings = dir.path().join("settings.json");

    wnt(dir.path())
        .args(["--set-destination", "https://hooks.example.com/abc", "--set-subscriber", "4242"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Settings saved"))
        .stdout(predicate::str::contains("subscriber: 4242"));

    let saved = fs::read_to_string(&settings).unwrap();
    assert!(saved.contains("https://hooks.example.com/abc"));
    assert!(saved.contains("4242"));

    wnt(dir.path())
        .arg("--clear-destination")
        .assert()
        .success()
        .stdout(predicate::str::contains("destination: (none)"));

    let saved = fs::read_to_string(&settings).unwrap();
    assert!(!saved.contains("hooks.example.com"));
    assert!(saved.contains("4242"));
}

#[test]
fn test_invalid_env_value_is_config_error() {
    let dir = TempDir::new().unwrap();
    wnt(dir.path())
        .env("WIFI_PROBE_COUNT", "lots")
        .assert()
        .code(1)
        .stderr(predicate::str::contains("WIFI_PROBE_COUNT"));
}

/// Send `signal` (e.g. "-USR1") to a running child
#[cfg(unix)]
fn send_signal(child: &std::process::Child, signal: &str) {
    let status = Command::new("kill")
        .args([signal, &child.id().to_string()])
        .status()
        .unwrap();
    assert!(status.success());
}

#[cfg(unix)]
#[test]
fn test_watch_mode_answers_user1_with_summary() {
    use std::io::{BufRead, BufReader};
    use std::process::Stdio;
    use std::sync::mpsc;
    use std::time::Duration;

    let dir = TempDir::new().unwrap();
    let (db, supplicant) = empty_inventory(dir.path());

    let mut child = wnt(dir.path())
        .env("WIFI_NETWORK_DB", db)
        .env("WIFI_SUPPLICANT_CONF", supplicant)
        .args(["--watch", "--verbose", "--no-color"])
        .stdout(Stdio::piped())
        .spawn()
        .unwrap();

    let (lines_tx, lines) = mpsc::channel();
    let stdout = child.stdout.take().unwrap();
    std::thread::spawn(move || {
        for line in BufReader::new(stdout).lines().map_while(Result::ok) {
            if lines_tx.send(line).is_err() {
                break;
            }
        }
    });
    let wait_for = |needle: &str| loop {
        let line = lines.recv_timeout(Duration::from_secs(10)).unwrap();
        if line.contains(needle) {
            break;
        }
    };

    // Handlers are in place once the loop announces itself
    wait_for("Watch mode started");
    send_signal(&child, "-USR1");
    wait_for("No networks to test");

    send_signal(&child, "-TERM");
    let status = child.wait().unwrap();
    assert!(status.success());
}

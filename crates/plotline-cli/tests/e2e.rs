//! End-to-end tests for Plotline CLI commands.
//!
//! These tests verify that the CLI produces expected output
//! when run against real script files.

#![allow(deprecated)] // Allow deprecated Command::cargo_bin for tests

use std::fs;
use std::path::PathBuf;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

// =============================================================================
// Test Helpers
// =============================================================================

/// A temporary directory holding test scripts.
struct TestScripts {
    temp_dir: TempDir,
}

impl TestScripts {
    fn new() -> Self {
        Self {
            temp_dir: TempDir::new().expect("Failed to create temp directory"),
        }
    }

    fn add(&self, filename: &str, source: &str) -> PathBuf {
        let path = self.temp_dir.path().join(filename);
        fs::write(&path, source).expect("Failed to write script");
        path
    }
}

fn plotline() -> Command {
    Command::cargo_bin("plotline").expect("Failed to find plotline binary")
}

/// Parse `--json` stdout into one value per statement.
fn json_lines(stdout: &[u8]) -> Vec<serde_json::Value> {
    String::from_utf8_lossy(stdout)
        .lines()
        .map(|line| serde_json::from_str(line).expect("Invalid JSON line"))
        .collect()
}

const CLOSE_SCRIPT: &str = r#"import matplotlib.pyplot as plt
plt.close()
z.configure_mpl(interactive=False, close=True, angular=False)
plt.plot([1, 2, 3])
plt.show()
plt.show()
plt.plot([1, 2, 3])
plt.show()
"#;

// =============================================================================
// Run command
// =============================================================================

#[test]
fn test_run_shows_html_figure() {
    let scripts = TestScripts::new();
    let path = scripts.add("simple.plot", CLOSE_SCRIPT);

    plotline()
        .arg("run")
        .arg(&path)
        .assert()
        .success()
        .stdout(predicate::str::contains("(context simple)"))
        .stdout(predicate::str::contains("HTML"))
        .stdout(predicate::str::contains("data:image/svg+xml;base64,"))
        .stdout(predicate::str::contains("Completed"));
}

#[test]
fn test_run_json_close_lifecycle() {
    let scripts = TestScripts::new();
    let path = scripts.add("close.plot", CLOSE_SCRIPT);

    let output = plotline()
        .arg("run")
        .arg(&path)
        .arg("--json")
        .output()
        .expect("Failed to run plotline");
    assert!(output.status.success());

    let shows: Vec<_> = json_lines(&output.stdout)
        .into_iter()
        .filter(|v| v["statement"] == "plt.show()")
        .collect();
    assert_eq!(shows.len(), 3);

    assert_eq!(shows[0]["result"]["kind"], "HTML");
    assert_eq!(shows[1]["result"]["kind"], "TEXT");
    assert_eq!(shows[1]["result"]["message"], "");
    assert_eq!(shows[2]["result"]["message"], shows[0]["result"]["message"]);
}

#[test]
fn test_run_no_close_flag() {
    let scripts = TestScripts::new();
    let path = scripts.add(
        "live.plot",
        "plt.plot([1, 2, 3])\nplt.show()\nplt.show()\n",
    );

    let output = plotline()
        .args(["run", "--no-close", "--json"])
        .arg(&path)
        .output()
        .expect("Failed to run plotline");
    assert!(output.status.success());

    let results = json_lines(&output.stdout);
    let second_show = &results[2]["result"];
    assert_eq!(second_show["kind"], "HTML");
    assert_eq!(second_show["message"], "");
}

#[test]
fn test_run_angular_lists_registry() {
    let scripts = TestScripts::new();
    let path = scripts.add("live.plot", "plt.plot([1, 2, 3])\nplt.show()\n");

    plotline()
        .args(["run", "--angular", "--no-close"])
        .arg(&path)
        .assert()
        .success()
        .stdout(predicate::str::contains("ANGULAR"))
        .stdout(predicate::str::contains("Live registry:"))
        .stdout(predicate::str::contains("live/figure_1"));
}

#[test]
fn test_script_error_does_not_fail_run() {
    let scripts = TestScripts::new();
    let path = scripts.add("typo.plot", "plt.plott([1])\nprint('still running')\n");

    plotline()
        .arg("run")
        .arg(&path)
        .assert()
        .success()
        .stdout(predicate::str::contains("ERROR"))
        .stdout(predicate::str::contains("NameError"))
        .stdout(predicate::str::contains("still running"));
}

#[test]
fn test_malformed_configuration_fails_run() {
    let scripts = TestScripts::new();
    let path = scripts.add(
        "bad.plot",
        "z.configure_mpl(close=sometimes)\nprint('never')\n",
    );

    plotline()
        .arg("run")
        .arg(&path)
        .assert()
        .failure()
        .stderr(predicate::str::contains("configuration error"))
        .stderr(predicate::str::contains("line 1"))
        .stdout(predicate::str::contains("never").not());
}

#[test]
fn test_parallel_scripts_get_own_contexts() {
    let scripts = TestScripts::new();
    let left = scripts.add("left.plot", "plt.plot([1, 2, 3])\nplt.show()\n");
    let right = scripts.add("right.plot", "plt.plot([3, 2, 1])\nplt.show()\n");

    let output = plotline()
        .args(["run", "--json"])
        .arg(&left)
        .arg(&right)
        .output()
        .expect("Failed to run plotline");
    assert!(output.status.success());

    let contexts: Vec<_> = json_lines(&output.stdout)
        .into_iter()
        .map(|v| v["context"].as_str().unwrap_or_default().to_string())
        .collect();
    assert!(contexts.contains(&"left".to_string()));
    assert!(contexts.contains(&"right".to_string()));
}

#[test]
fn test_context_flag_requires_single_script() {
    let scripts = TestScripts::new();
    let a = scripts.add("a.plot", "pass\n");
    let b = scripts.add("b.plot", "pass\n");

    plotline()
        .args(["run", "--context", "note"])
        .arg(&a)
        .arg(&b)
        .assert()
        .failure()
        .stderr(predicate::str::contains("single script"));
}

#[test]
fn test_missing_script() {
    plotline()
        .args(["run", "does-not-exist.plot"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Script not found"));
}

#[test]
fn test_defaults_command() {
    let output = plotline()
        .arg("defaults")
        .output()
        .expect("Failed to run plotline");
    assert!(output.status.success());

    let config: serde_json::Value =
        serde_json::from_slice(&output.stdout).expect("Invalid JSON");
    assert_eq!(config["close"], true);
    assert_eq!(config["angular"], false);
    assert_eq!(config["width"], 600);
}

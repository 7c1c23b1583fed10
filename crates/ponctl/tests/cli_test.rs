//! Integration tests for the `ponctl` binary.
//!
//! Every test runs against a temporary config, a recorded MIB snapshot and a
//! scratch audit log, so nothing touches the network or the user's files.
#![allow(clippy::unwrap_used)]

use std::path::{Path, PathBuf};

use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use tempfile::TempDir;

// ── Fixtures ────────────────────────────────────────────────────────

const CONFIG: &str = r#"
[dispatch]
attempt_timeout_ms = 1000
retries_per_transport = 0

[elements.olt-lab]
vendor = "huawei"
model = "MA5683T"
address = "10.0.0.1"

[elements.olt-lab.snmp]
community = "lab"

[[elements.olt-lab.onts]]
serial = "HWTC0001"
interface = 4194312192
ont_id = 3
"#;

const SNAPSHOT: &str = r#"{
  "community": "lab",
  "objects": {
    "1.3.6.1.2.1.1.5.0": { "type": "octet_string", "value": "olt-lab-01" },
    "1.3.6.1.4.1.2011.6.128.1.1.2.46.1.15.4194312192.3": { "type": "integer", "value": 1 },
    "1.3.6.1.4.1.2011.6.128.1.1.2.51.1.4.4194312192.3": { "type": "integer", "value": -1850 }
  }
}"#;

struct Lab {
    dir: TempDir,
}

impl Lab {
    fn new() -> Self {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("config.toml"), CONFIG).unwrap();
        std::fs::write(dir.path().join("mib.json"), SNAPSHOT).unwrap();
        Self { dir }
    }

    fn path(&self, name: &str) -> PathBuf {
        self.dir.path().join(name)
    }

    /// `ponctl` with env isolation and the lab files wired in.
    fn cmd(&self) -> assert_cmd::Command {
        let mut cmd = cargo_bin_cmd!("ponctl");
        cmd.env("HOME", self.dir.path())
            .env("XDG_CONFIG_HOME", self.dir.path())
            .env("XDG_DATA_HOME", self.dir.path())
            .env_remove("PONCTL_OUTPUT")
            .env_remove("RUST_LOG")
            .args(["--color", "never", "--config"])
            .arg(self.path("config.toml"))
            .arg("--mib-snapshot")
            .arg(self.path("mib.json"))
            .arg("--audit-log")
            .arg(self.path("audit.jsonl"));
        cmd
    }
}

fn audit_lines(path: &Path) -> usize {
    std::fs::read_to_string(path)
        .map(|raw| raw.lines().count())
        .unwrap_or(0)
}

// ── Basic invocation ────────────────────────────────────────────────

#[test]
fn test_no_args_shows_help() {
    let output = cargo_bin_cmd!("ponctl").output().unwrap();
    assert_eq!(output.status.code(), Some(2));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Usage"), "Expected 'Usage' in:\n{stderr}");
}

#[test]
fn test_completions_bash() {
    cargo_bin_cmd!("ponctl")
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("ponctl"));
}

// ── Operations ──────────────────────────────────────────────────────

#[test]
fn test_read_from_snapshot() {
    let lab = Lab::new();
    lab.cmd()
        .args(["-o", "plain", "read", "olt-lab", "1.3.6.1.2.1.1.5.0"])
        .assert()
        .success()
        .stdout(predicate::str::contains("1.3.6.1.2.1.1.5.0 = olt-lab-01"));
    assert_eq!(audit_lines(&lab.path("audit.jsonl")), 1);
}

#[test]
fn test_read_json_carries_transport() {
    let lab = Lab::new();
    let output = lab
        .cmd()
        .args(["-o", "json", "read", "olt-lab", "1.3.6.1.2.1.1.5.0"])
        .output()
        .unwrap();
    assert!(output.status.success());
    let body: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(body["status"], "success");
    assert_eq!(body["transport"], "snmp");
    assert_eq!(body["bindings"][0]["value"]["value"], "olt-lab-01");
}

#[test]
fn test_invoke_on_snmp_only_model_is_unsupported() {
    let lab = Lab::new();
    lab.cmd()
        .args(["invoke", "olt-lab", "/ont/reboot", "-X", "POST"])
        .assert()
        .code(5)
        .stderr(predicate::str::contains("unsupported"));
    // refused dispatches are still audited
    assert_eq!(audit_lines(&lab.path("audit.jsonl")), 1);
}

#[test]
fn test_set_rejects_bad_value() {
    let lab = Lab::new();
    lab.cmd()
        .args(["set", "olt-lab", "1.3.6.1.2.1.1.5.0", "abc", "--type", "integer"])
        .assert()
        .code(2);
    assert_eq!(audit_lines(&lab.path("audit.jsonl")), 0);
}

// ── Inspection ──────────────────────────────────────────────────────

#[test]
fn test_onts_refresh_projects_state() {
    let lab = Lab::new();
    lab.cmd()
        .args(["-o", "plain", "onts", "olt-lab", "--refresh"])
        .assert()
        .success()
        .stdout(predicate::str::contains("olt-lab/4194312192/3 HWTC0001 online"));
}

#[test]
fn test_onts_without_refresh_is_unknown() {
    let lab = Lab::new();
    lab.cmd()
        .args(["-o", "plain", "onts", "olt-lab"])
        .assert()
        .success()
        .stdout(predicate::str::contains("HWTC0001 unknown"));
}

#[test]
fn test_audit_lists_newest_first() {
    let lab = Lab::new();
    lab.cmd()
        .args(["read", "olt-lab", "1.3.6.1.2.1.1.5.0"])
        .assert()
        .success();
    lab.cmd()
        .args(["walk", "olt-lab", "1.3.6.1.4.1.2011.6.128.1.1.2.51"])
        .assert()
        .success();

    let output = lab
        .cmd()
        .args(["-o", "json", "audit", "--element", "olt-lab"])
        .output()
        .unwrap();
    let entries: Vec<serde_json::Value> = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(entries.len(), 2);
    assert_eq!(entries[0]["operation"], "enumerate_subtree");
    assert_eq!(entries[0]["value_count"], 1);
    assert_eq!(entries[1]["operation"], "read_one");
}

#[test]
fn test_plan_for_snmp_only_model() {
    let lab = Lab::new();
    lab.cmd()
        .args(["-o", "plain", "plan", "olt-lab"])
        .assert()
        .success()
        .stdout(predicate::str::contains("snmp udp://10.0.0.1:161"));
}

#[test]
fn test_plan_unknown_element_is_not_found() {
    let lab = Lab::new();
    lab.cmd()
        .args(["plan", "olt-nope"])
        .assert()
        .code(4)
        .stderr(predicate::str::contains("olt-nope"));
}

#[test]
fn test_capabilities_vendor_filter() {
    let lab = Lab::new();
    lab.cmd()
        .args(["-o", "plain", "capabilities", "--vendor", "ZTE"])
        .assert()
        .success()
        .stdout(predicate::str::contains("zte c300").and(predicate::str::contains("huawei").not()));
}

//! End-to-end CLI tests against the plans in `tests/fixtures/`.
//!
//! These run the binary and verify:
//! 1. Exit code (0 = compliant, 2 = violations, 1 = runtime error)
//! 2. stdout carries exactly one violation message per line
//! 3. The JSON report validates against the report schema and renders

use assert_cmd::Command;
use planguard_types::PlanguardReport;
use predicates::prelude::*;
use serde_json::Value;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

const NONCOMPLIANT_LINES: [&str; 8] = [
    "S3 bucket 'acme-uploads' does not have default server-side encryption enabled (CIS AWS 2.1.1)",
    "S3 bucket 'acme-uploads' does not have versioning enabled (CIS AWS 2.1.3)",
    "S3 bucket 'acme-uploads' does not have access logging enabled (CIS AWS 3.6)",
    "S3 bucket 'acme-uploads' does not block public access (CIS AWS 2.1.5)",
    "no CloudTrail trail is defined in the plan (CIS AWS 3.1)",
    "no AWS Config configuration recorder is defined in the plan (CIS AWS 3.5)",
    "EBS volume 'aws_ebs_volume.scratch' is not encrypted (CIS AWS 2.2.1)",
    "security group 'bastion' allows SSH (port 22) from the internet (CIS AWS 5.2)",
];

/// Helper to get a Command for the planguard binary.
/// Wraps the deprecated cargo_bin to centralize the deprecation warning.
#[allow(deprecated)]
fn planguard_cmd() -> Command {
    let mut cmd = Command::cargo_bin("planguard").expect("planguard binary not found");
    cmd.env_remove("PLANGUARD_LOG");
    cmd
}

fn fixture(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .parent()
        .expect("planguard-cli crate should have a parent directory")
        .parent()
        .expect("crates directory should have a parent (repo root)")
        .join("tests")
        .join("fixtures")
        .join(name)
}

/// Runs `check` from inside `dir` so no stray planguard.toml is picked up.
fn check(dir: &Path, plan: &str, extra: &[&str]) -> std::process::Output {
    planguard_cmd()
        .current_dir(dir)
        .arg("check")
        .arg("--plan")
        .arg(fixture(plan))
        .args(extra)
        .output()
        .expect("run planguard check")
}

fn stdout_lines(output: &std::process::Output) -> Vec<String> {
    String::from_utf8_lossy(&output.stdout)
        .lines()
        .map(str::to_string)
        .collect()
}

fn report_schema() -> Value {
    serde_json::to_value(schemars::schema_for!(PlanguardReport)).expect("schema json")
}

// ============================================================================
// check
// ============================================================================

#[test]
fn noncompliant_plan_prints_violations_in_rule_order() {
    let temp = TempDir::new().expect("temp dir");
    let output = check(temp.path(), "noncompliant.json", &[]);

    assert_eq!(output.status.code(), Some(2));
    assert_eq!(stdout_lines(&output), NONCOMPLIANT_LINES);
}

#[test]
fn compliant_plan_prints_nothing_and_exits_zero() {
    let temp = TempDir::new().expect("temp dir");
    let output = check(temp.path(), "compliant_s3.json", &["--package", "s3"]);

    assert_eq!(output.status.code(), Some(0));
    assert!(output.stdout.is_empty());
}

#[test]
fn package_override_limits_rules() {
    let temp = TempDir::new().expect("temp dir");
    let output = check(temp.path(), "noncompliant.json", &["--package", "compute"]);

    assert_eq!(output.status.code(), Some(2));
    assert_eq!(stdout_lines(&output), &NONCOMPLIANT_LINES[6..]);
}

#[test]
fn report_validates_against_schema() {
    let temp = TempDir::new().expect("temp dir");
    let report_path = temp.path().join("out").join("report.json");
    let output = check(
        temp.path(),
        "noncompliant.json",
        &["--report-out", report_path.to_str().expect("utf8")],
    );
    assert_eq!(output.status.code(), Some(2));

    let report: Value =
        serde_json::from_str(&std::fs::read_to_string(&report_path).expect("read report"))
            .expect("report json");

    let validator = jsonschema::validator_for(&report_schema()).expect("compile schema");
    let errors: Vec<String> = validator.iter_errors(&report).map(|e| e.to_string()).collect();
    assert!(errors.is_empty(), "schema errors: {errors:?}");

    assert_eq!(report["schema"], "planguard.report.v1");
    assert_eq!(report["verdict"], "fail");
    assert_eq!(report["data"]["package"], "all");
    assert_eq!(report["data"]["resources_scanned"], 3);
    assert_eq!(report["data"]["rules_evaluated"], 16);
    assert_eq!(report["data"]["violations_total"], 8);
    assert_eq!(report["data"]["unknown_tracking"], "available");

    let violations = report["violations"].as_array().expect("violations array");
    assert_eq!(violations.len(), NONCOMPLIANT_LINES.len());
    let ssh = &violations[7];
    assert_eq!(ssh["rule_id"], "compute.ssh_ingress");
    assert_eq!(ssh["package"], "compute");
    assert_eq!(ssh["severity"], "error");
    assert_eq!(ssh["resource"]["address"], "module.network.aws_security_group.bastion");
    assert_eq!(ssh["resource"]["identity"], "bastion");
    assert_eq!(ssh["fingerprint"].as_str().map(str::len), Some(64));
    assert!(violations[4].get("resource").is_none());
}

#[test]
fn config_file_disables_and_downgrades_rules() {
    let temp = TempDir::new().expect("temp dir");
    std::fs::write(
        temp.path().join("planguard.toml"),
        r#"
package = "compute"

[rules."compute.ebs_encryption"]
enabled = false

[rules."compute.ssh_ingress"]
severity = "warning"
"#,
    )
    .expect("write config");
    let report_path = temp.path().join("report.json");

    let output = check(
        temp.path(),
        "noncompliant.json",
        &["--report-out", report_path.to_str().expect("utf8")],
    );

    assert_eq!(output.status.code(), Some(2));
    assert_eq!(stdout_lines(&output), &NONCOMPLIANT_LINES[7..]);
    let report: Value =
        serde_json::from_str(&std::fs::read_to_string(&report_path).expect("read report"))
            .expect("report json");
    assert_eq!(report["violations"][0]["severity"], "warning");
}

#[test]
fn allowlist_skips_matching_resources() {
    let temp = TempDir::new().expect("temp dir");
    let config = temp.path().join("custom.toml");
    std::fs::write(
        &config,
        "[rules.\"compute.ssh_ingress\"]\nallow = [\"module.network.*\"]\n",
    )
    .expect("write config");

    let output = check(
        temp.path(),
        "noncompliant.json",
        &["--package", "compute", "--config", config.to_str().expect("utf8")],
    );

    assert_eq!(output.status.code(), Some(2));
    assert_eq!(stdout_lines(&output), &NONCOMPLIANT_LINES[6..7]);
}

#[test]
fn malformed_plan_is_a_runtime_error() {
    let temp = TempDir::new().expect("temp dir");
    let report_path = temp.path().join("report.json");
    let output = check(
        temp.path(),
        "malformed.json",
        &["--report-out", report_path.to_str().expect("utf8")],
    );

    assert_eq!(output.status.code(), Some(1));
    assert!(output.stdout.is_empty());
    assert!(String::from_utf8_lossy(&output.stderr).contains("malformed plan at planned_values"));
    assert!(!report_path.exists());
}

#[test]
fn missing_plan_file_is_a_runtime_error() {
    let temp = TempDir::new().expect("temp dir");
    planguard_cmd()
        .current_dir(temp.path())
        .args(["check", "--plan", "absent.json"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("failed to read plan"));
}

#[test]
fn invalid_config_is_a_runtime_error() {
    let temp = TempDir::new().expect("temp dir");
    std::fs::write(temp.path().join("planguard.toml"), "package = \"gcp\"\n").expect("write");
    let output = check(temp.path(), "noncompliant.json", &[]);

    assert_eq!(output.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&output.stderr).contains("unknown package: gcp"));
}

#[test]
fn debug_logging_goes_to_stderr_only() {
    let temp = TempDir::new().expect("temp dir");
    let output = planguard_cmd()
        .current_dir(temp.path())
        .env("PLANGUARD_LOG", "debug")
        .arg("check")
        .arg("--plan")
        .arg(fixture("noncompliant.json"))
        .output()
        .expect("run planguard check");

    assert_eq!(output.status.code(), Some(2));
    assert_eq!(stdout_lines(&output), NONCOMPLIANT_LINES);
    assert!(String::from_utf8_lossy(&output.stderr).contains("rule evaluated"));
}

// ============================================================================
// md / annotations
// ============================================================================

fn write_report(temp: &TempDir) -> PathBuf {
    let report_path = temp.path().join("report.json");
    let output = check(
        temp.path(),
        "noncompliant.json",
        &["--report-out", report_path.to_str().expect("utf8")],
    );
    assert_eq!(output.status.code(), Some(2));
    report_path
}

#[test]
fn check_writes_markdown_when_asked() {
    let temp = TempDir::new().expect("temp dir");
    let md_path = temp.path().join("comment.md");
    let output = check(
        temp.path(),
        "noncompliant.json",
        &["--write-markdown", "--markdown-out", md_path.to_str().expect("utf8")],
    );
    assert_eq!(output.status.code(), Some(2));

    let md = std::fs::read_to_string(&md_path).expect("read markdown");
    assert!(md.starts_with("# Planguard report"));
    assert!(md.contains("Verdict: **FAIL**"));
    assert!(md.contains("`module.network.aws_security_group.bastion`"));
}

#[test]
fn md_command_renders_from_report() {
    let temp = TempDir::new().expect("temp dir");
    let report_path = write_report(&temp);

    planguard_cmd()
        .arg("md")
        .arg("--report")
        .arg(&report_path)
        .assert()
        .success()
        .stdout(predicate::str::contains("## Violations"))
        .stdout(predicate::str::contains("`compute.ssh_ingress` / `ssh_open_to_world`"));
}

#[test]
fn annotations_command_respects_max() {
    let temp = TempDir::new().expect("temp dir");
    let report_path = write_report(&temp);

    let output = planguard_cmd()
        .arg("annotations")
        .arg("--report")
        .arg(&report_path)
        .arg("--max")
        .arg("3")
        .output()
        .expect("run annotations");

    assert!(output.status.success());
    let lines = stdout_lines(&output);
    assert_eq!(lines.len(), 3);
    assert!(lines.iter().all(|l| l.starts_with("::error::[s3.")));
}

#[test]
fn md_rejects_non_report_json() {
    let temp = TempDir::new().expect("temp dir");
    planguard_cmd()
        .arg("md")
        .arg("--report")
        .arg(fixture("noncompliant.json"))
        .current_dir(temp.path())
        .assert()
        .code(1)
        .stderr(predicate::str::contains("unknown report schema"));
}

// ============================================================================
// explain / rules / version
// ============================================================================

#[test]
fn explain_rule_and_code() {
    planguard_cmd()
        .args(["explain", "kms.key_rotation"])
        .assert()
        .success()
        .stdout(predicate::str::contains("  package:   kms\n"))
        .stdout(predicate::str::contains("Compliant:\n    resource \"aws_kms_key\""));
    planguard_cmd()
        .args(["explain", "ssh_open_to_world"])
        .assert()
        .success()
        .stdout(predicate::str::contains("SSH"));
}

#[test]
fn explain_unknown_exits_one() {
    planguard_cmd()
        .args(["explain", "s3.nope"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("unknown rule or code: s3.nope"))
        .stderr(predicate::str::contains("did you mean: s3.bucket_encryption"));
}

#[test]
fn rules_lists_package() {
    let output = planguard_cmd()
        .args(["rules", "--package", "s3"])
        .output()
        .expect("run rules");
    assert!(output.status.success());
    let lines = stdout_lines(&output);
    assert_eq!(lines.len(), 4);
    assert!(lines[0].starts_with("s3.bucket_encryption"));
    assert!(lines.iter().all(|l| l.contains("linked")));
}

#[test]
fn rules_unknown_package_fails() {
    planguard_cmd()
        .args(["rules", "--package", "gcp"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("unknown package: gcp"));
}

#[test]
fn version_flag_works() {
    planguard_cmd()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("0.1.0"));
}

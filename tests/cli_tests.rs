#![cfg(feature = "cli")]

use assert_cmd::Command;
use predicates::str::contains as str_contains;
use std::io::Write;
use tempfile::NamedTempFile;

#[allow(deprecated)]
fn cli() -> Command {
    Command::cargo_bin("cli").expect("cli binary")
}

fn snapshot_file() -> NamedTempFile {
    let mut file = NamedTempFile::new().expect("create temp file");
    let body = serde_json::json!({
        "resources": [
            { "id": "r1", "name": "Ana", "role": "Engineer", "weeklyCapacity": "40" },
            { "id": "r2", "name": "Bo", "role": "Designer", "isActive": false },
            { "id": "r3", "name": "Gone", "isDeleted": true }
        ],
        "allocations": [
            { "resourceId": "r1", "projectId": "p1", "weeklyHours": { "2024-W29": 30, "2024-W30": 50 } }
        ]
    });
    file.write_all(body.to_string().as_bytes()).unwrap();
    file
}

#[test]
fn classify_prints_status() {
    cli()
        .args(["classify", "40", "44"])
        .assert()
        .success()
        .stdout(str_contains("110.0%"))
        .stdout(str_contains("over-capacity"));

    cli()
        .args(["classify", "40", "44", "--inactive"])
        .assert()
        .success()
        .stdout(str_contains("inactive"));
}

#[test]
fn table_lists_visible_resources() {
    let file = snapshot_file();
    let assert = cli()
        .args(["table"])
        .arg(file.path())
        .args(["--sort", "status", "--dir", "desc", "--week", "2024-W29"])
        .assert()
        .success();
    let output = String::from_utf8_lossy(&assert.get_output().stdout).to_string();
    assert!(output.contains("Optimal"), "{output}");
    assert!(output.contains("Inactive"), "{output}");
    assert!(!output.contains("Gone"), "deleted resource listed:\n{output}");
    let ana = output.find("Ana").unwrap();
    let bo = output.find("Bo").unwrap();
    assert!(ana < bo, "expected Ana before Bo:\n{output}");
}

#[test]
fn kpis_summary_line() {
    let file = snapshot_file();
    cli()
        .arg("kpis")
        .arg(file.path())
        .args(["--week", "2024-W30"])
        .assert()
        .success()
        .stdout(str_contains("resources=2, active=1"))
        .stdout(str_contains("over_allocated=1"));
}

#[test]
fn heatmap_renders_week_columns() {
    let file = snapshot_file();
    cli()
        .arg("heatmap")
        .arg(file.path())
        .args(["--from", "2024-W29", "--weeks", "2"])
        .assert()
        .success()
        .stdout(str_contains("2024-W29"))
        .stdout(str_contains("2024-W30"))
        .stdout(str_contains("125%"));
}

#[test]
fn csv_resources_are_accepted() {
    let mut resources = tempfile::Builder::new()
        .suffix(".csv")
        .tempfile()
        .unwrap();
    writeln!(resources, "id,name,role,department,weekly_capacity,is_active,is_deleted,skills").unwrap();
    writeln!(resources, "r1,Ana,Engineer,,20,,,").unwrap();
    let mut allocations = NamedTempFile::new().unwrap();
    writeln!(allocations, "id,resource_id,project_id,week,hours").unwrap();
    writeln!(allocations, "a1,r1,p1,,19").unwrap();

    cli()
        .arg("table")
        .arg(resources.path())
        .arg("--allocations")
        .arg(allocations.path())
        .assert()
        .success()
        .stdout(str_contains("95.0%"))
        .stdout(str_contains("Near capacity"));
}

#[test]
fn invalid_week_is_rejected() {
    let file = snapshot_file();
    cli()
        .arg("kpis")
        .arg(file.path())
        .args(["--week", "week-29"])
        .assert()
        .failure();
}

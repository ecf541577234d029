use assert_cmd::Command;
use serde_json::{json, Value};

#[test]
fn cli_help_runs() {
    let mut cmd = Command::cargo_bin("rx-benchmark").expect("binary exists");
    cmd.arg("--help").assert().success();
}

#[test]
fn combine_writes_json_and_csv() {
    let dir = tempfile::tempdir().unwrap();
    let data = dir.path().join("data");
    let outputs = dir.path().join("outputs");
    std::fs::create_dir_all(&data).unwrap();

    let numerator = json!([
        {"row_id": "A81001", "row_name": "The Densham Surgery", "date": "2017-03-01",
         "items": 25, "actual_cost": 100.0, "setting": 4}
    ]);
    let denominator = json!([
        {"row_id": "A81001", "date": "2017-03-01", "total_list_size": 20000, "setting": 4}
    ]);
    std::fs::write(data.join("numerator.json"), numerator.to_string()).unwrap();
    std::fs::write(data.join("denominator.json"), denominator.to_string()).unwrap();

    Command::cargo_bin("rx-benchmark")
        .expect("binary exists")
        .env("DATA_DIR", &data)
        .env("OUTPUTS_DIR", &outputs)
        .args([
            "combine",
            "--numerator",
            "numerator.json",
            "--denominator",
            "denominator.json",
        ])
        .assert()
        .success();

    let written: Value =
        serde_json::from_str(&std::fs::read_to_string(outputs.join("combined.json")).unwrap())
            .unwrap();
    assert_eq!(written[0]["ratio_items"], json!(1.25));
    assert_eq!(written[0]["display_name"], json!("The Densham Surgery (A81001)"));
    assert!(outputs.join("combined.csv").exists());
}

#[test]
fn unknown_org_type_fails() {
    let dir = tempfile::tempdir().unwrap();
    Command::cargo_bin("rx-benchmark")
        .expect("binary exists")
        .env("DATA_DIR", dir.path())
        .env("OUTPUTS_DIR", dir.path())
        .args(["benchmark", "--measures", "measures.json", "--org-type", "region"])
        .assert()
        .failure();
}

#[test]
fn empty_combine_still_writes_csv_header() {
    let dir = tempfile::tempdir().unwrap();
    let data = dir.path().join("data");
    let outputs = dir.path().join("outputs");
    std::fs::create_dir_all(&data).unwrap();
    std::fs::write(data.join("numerator.json"), "[]").unwrap();
    std::fs::write(data.join("denominator.json"), "[]").unwrap();

    Command::cargo_bin("rx-benchmark")
        .expect("binary exists")
        .env("DATA_DIR", &data)
        .env("OUTPUTS_DIR", &outputs)
        .args([
            "combine",
            "--numerator",
            "numerator.json",
            "--denominator",
            "denominator.json",
        ])
        .assert()
        .success();

    let csv = std::fs::read_to_string(outputs.join("combined.csv")).unwrap();
    assert!(csv.starts_with("entity_id,display_name,month"));
    assert_eq!(csv.lines().count(), 1);
}

use assert_cmd::prelude::*;
use predicates::prelude::*;
use std::fs;
use std::process::Command;
use tempfile::tempdir;

const CSV: &str = "region,sales,units\nnorth,120,3\nsouth,80,5\neast,95,\nwest,60,2\n";

#[test]
fn cli_shows_help() {
    let mut cmd = Command::cargo_bin("exploralytics").unwrap();
    cmd.arg("--help");
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("exploralytics"))
        .stdout(predicate::str::contains("corr-target"));
}

#[test]
fn bar_chart_from_csv_to_json() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("sales.csv");
    let out = dir.path().join("bar.json");
    fs::write(&input, CSV).unwrap();

    let mut cmd = Command::cargo_bin("exploralytics").unwrap();
    cmd.arg("bar")
        .arg("--input")
        .arg(&input)
        .arg("--out")
        .arg(&out)
        .args(["--category", "region", "--value", "sales"])
        .args(["--highlight-top", "1:green", "--hline-at", "Goal=90"]);
    cmd.assert()
        .success()
        .stderr(predicate::str::contains("Wrote chart to"));

    let v: serde_json::Value = serde_json::from_str(&fs::read_to_string(&out).unwrap()).unwrap();
    assert_eq!(v["data"][0]["y"][0], "north");
    assert_eq!(v["data"][0]["marker"]["color"][0], "green");
    assert_eq!(v["layout"]["shapes"][0]["x0"], 90.0);
}

#[test]
fn style_file_sets_defaults() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("sales.csv");
    let style = dir.path().join("style.json");
    let out = dir.path().join("hist.json");
    fs::write(&input, CSV).unwrap();
    fs::write(&style, r#"{"width": 800, "template": "plotly_dark"}"#).unwrap();

    let mut cmd = Command::cargo_bin("exploralytics").unwrap();
    cmd.arg("hist")
        .arg("--input")
        .arg(&input)
        .arg("--out")
        .arg(&out)
        .arg("--style")
        .arg(&style)
        .args(["--num-cols", "2", "--show-mean"]);
    cmd.assert().success();

    let v: serde_json::Value = serde_json::from_str(&fs::read_to_string(&out).unwrap()).unwrap();
    assert_eq!(v["layout"]["width"], 800);
    assert_eq!(v["layout"]["meta"]["template"], "plotly_dark");
    assert_eq!(v["data"].as_array().unwrap().len(), 2);
}

#[test]
fn missing_column_fails_with_message() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("sales.csv");
    fs::write(&input, CSV).unwrap();

    let mut cmd = Command::cargo_bin("exploralytics").unwrap();
    cmd.arg("dots")
        .arg("--input")
        .arg(&input)
        .arg("--out")
        .arg(dir.path().join("dots.svg"))
        .args(["--label", "region", "--value", "profit"]);
    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("profit"));
}

#[test]
fn stats_prints_summaries() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("sales.csv");
    fs::write(&input, CSV).unwrap();

    let mut cmd = Command::cargo_bin("exploralytics").unwrap();
    cmd.arg("stats").arg("--input").arg(&input);
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("sales  count=4 missing=0"))
        .stdout(predicate::str::contains("units  count=3 missing=1"));
}

#[test]
fn bold_flag_overrides_style_file() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("sales.csv");
    let style = dir.path().join("style.json");
    fs::write(&input, CSV).unwrap();
    fs::write(&style, r#"{"title_bold": true}"#).unwrap();

    let title_of = |extra: &[&str], name: &str| {
        let out = dir.path().join(name);
        let mut cmd = Command::cargo_bin("exploralytics").unwrap();
        cmd.arg("bar")
            .arg("--input")
            .arg(&input)
            .arg("--out")
            .arg(&out)
            .arg("--style")
            .arg(&style)
            .args(["--category", "region", "--value", "sales", "--title", "Sales"])
            .args(extra);
        cmd.assert().success();
        let v: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(&out).unwrap()).unwrap();
        v["layout"]["title"]["text"].as_str().unwrap().to_string()
    };

    assert!(title_of(&[], "styled.json").starts_with("<b>Sales</b>"));
    assert!(title_of(&["--bold=false"], "plain.json").starts_with("Sales"));
    assert!(title_of(&["--bold"], "bold.json").starts_with("<b>Sales</b>"));
}

#[test]
fn dist_writes_histogram_and_box_traces() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("sales.csv");
    let out = dir.path().join("dist.json");
    fs::write(&input, CSV).unwrap();

    let mut cmd = Command::cargo_bin("exploralytics").unwrap();
    cmd.arg("dist")
        .arg("--input")
        .arg(&input)
        .arg("--out")
        .arg(&out)
        .args(["--num-cols", "2"]);
    cmd.assert().success();

    let v: serde_json::Value = serde_json::from_str(&fs::read_to_string(&out).unwrap()).unwrap();
    let types: Vec<&str> = v["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|t| t["type"].as_str().unwrap())
        .collect();
    assert_eq!(types, vec!["histogram", "box", "histogram", "box"]);
    assert_eq!(v["layout"]["height"], 300);
}

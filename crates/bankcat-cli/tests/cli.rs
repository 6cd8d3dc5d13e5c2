use std::fs;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

const REPORT: &str = "还款    1.28万\n\n休闲娱乐\n8,030.47\n\n购物  3,850.00\n总计 24,680.47\n";

const TABLE: &str = "<table>\n<tr><td>支出项目</td><td>万元</td></tr>\n<tr><td>房贷</td><td>3.5</td></tr>\n</table>";

fn bankcat() -> Command {
    Command::cargo_bin("bankcat").unwrap()
}

#[test]
fn extract_text_report_as_json() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("report.txt");
    fs::write(&input, REPORT).unwrap();

    bankcat()
        .arg("extract")
        .arg(&input)
        .assert()
        .success()
        .stdout(predicate::str::contains("\"category_name\": \"休闲娱乐\""))
        .stdout(predicate::str::contains("\"category_count\": 3"))
        .stdout(predicate::str::contains("总计").not());
}

#[test]
fn extract_from_stdin_as_csv() {
    bankcat()
        .args(["extract", "-", "--format", "csv", "--type", "income"])
        .write_stdin("工资 9,000.00\n利息 12.30\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("0,工资,9000.00,income"))
        .stdout(predicate::str::contains("1,利息,12.30,income"));
}

#[test]
fn extract_table_with_stages() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("report.html");
    fs::write(&input, TABLE).unwrap();

    bankcat()
        .arg("extract")
        .arg(&input)
        .arg("--stages")
        .assert()
        .success()
        .stdout(predicate::str::contains("\"source\": \"table\""))
        .stdout(predicate::str::contains("\"total_amount\": 35000.0"));
}

#[test]
fn extract_rejects_unknown_report_type() {
    bankcat()
        .args(["extract", "-", "--type", "savings"])
        .write_stdin("餐饮 12.00")
        .assert()
        .failure();
}

#[test]
fn extract_missing_file_fails() {
    bankcat()
        .args(["extract", "does-not-exist.txt"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Input file not found"));
}

#[test]
fn confirm_selected_categories() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("report.txt");
    fs::write(&input, REPORT).unwrap();

    bankcat()
        .arg("confirm")
        .arg(&input)
        .args(["--select", "0,2,9", "--month", "2024-05", "--owner", "alice"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"date\": \"2024-05-01\""))
        .stdout(predicate::str::contains("\"category\": \"还款\""))
        .stdout(predicate::str::contains("\"category\": \"购物\""))
        .stdout(predicate::str::contains("休闲娱乐").not())
        .stdout(predicate::str::contains("OCR import: 2024-05 expense category summary"));
}

#[test]
fn confirm_rejects_bad_month() {
    bankcat()
        .args(["confirm", "-", "--select", "0", "--month", "2024/05"])
        .write_stdin(REPORT)
        .assert()
        .failure()
        .stderr(predicate::str::contains("expected YYYY-MM"));
}

#[test]
fn batch_writes_outputs_and_summary() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("may.txt"), REPORT).unwrap();
    fs::write(dir.path().join("june.html"), TABLE).unwrap();
    fs::write(dir.path().join("notes.pdf"), "ignored").unwrap();
    let out = dir.path().join("out");

    bankcat()
        .arg("batch")
        .arg(format!("{}/*", dir.path().display()))
        .arg("--output-dir")
        .arg(&out)
        .arg("--summary")
        .assert()
        .success();

    assert!(out.join("may.json").exists());
    assert!(out.join("june.json").exists());

    let summary = fs::read_to_string(out.join("summary.csv")).unwrap();
    assert!(summary.starts_with("filename,status,source"));
    assert!(summary.contains("june.html,success,table,1,35000.00"));
    assert!(summary.contains("may.txt,success,text,3"));
}

#[test]
fn config_init_get_set() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("config.json");
    let path_str = path.to_str().unwrap();

    bankcat().args(["--config", path_str, "config", "init"]).assert().success();
    assert!(path.exists());

    bankcat()
        .args(["--config", path_str, "config", "set", "transcription.model", "local-vl"])
        .assert()
        .success();

    bankcat()
        .args(["--config", path_str, "config", "get", "transcription.model"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"local-vl\""));

    bankcat()
        .args(["--config", path_str, "config", "set", "extraction.default_report_type", "savings"])
        .assert()
        .failure();
}

#[test]
fn config_default_report_type_is_used() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("config.json");
    fs::write(&path, r#"{"extraction": {"default_report_type": "income"}}"#).unwrap();

    bankcat()
        .arg("--config")
        .arg(&path)
        .args(["extract", "-"])
        .write_stdin("工资 9,000.00")
        .assert()
        .success()
        .stdout(predicate::str::contains("\"report_type\": \"income\""));
}

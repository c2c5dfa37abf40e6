use assert_cmd::prelude::*;
use predicates::prelude::*;
use rstest::rstest;
use std::fs;
use std::io::Write;
use std::path::PathBuf;
use std::process::Command;
use tempfile::tempdir;

fn write_config(dir: &tempfile::TempDir, toml: &str) -> PathBuf {
    let path = dir.path().join("cfg.toml");
    fs::write(&path, toml).unwrap();
    path
}

// Stock game; logging stays on the console so tests leave no files behind.
fn write_valid_config(dir: &tempfile::TempDir) -> PathBuf {
    write_config(
        dir,
        r#"
[grid]
rows = 7
cols = 5

[tasks]
base_hz = 1000

[board]
serve = "chooser"
"#,
    )
}

#[rstest]
#[case(&["--help"], 0, "Usage:", "stdout")]
#[case(&["simulate"], 0, "winner: a", "stdout")]
#[case(&["simulate", "--ticks", "50"], 0, "winner: none", "stdout")]
#[case(&["self-check"], 0, "self-check ok", "stdout")]
#[case(&["simulate", "--ticks"], 2, "value is required", "stderr")]
fn cli_table_cases(
    #[case] args: &[&str],
    #[case] exit_code: i32,
    #[case] needle: &str,
    #[case] stream: &str,
) {
    let dir = tempdir().unwrap();
    let cfg = write_valid_config(&dir);

    let mut cmd = Command::cargo_bin("catch_cli").unwrap();
    cmd.arg("--config").arg(&cfg);
    for a in args {
        cmd.arg(a);
    }

    let assert = cmd.assert().code(exit_code);
    match stream {
        "stdout" => {
            assert.stdout(predicate::str::contains(needle));
        }
        "stderr" => {
            assert.stderr(predicate::str::contains(needle));
        }
        other => panic!("unknown stream: {other}"),
    }
}

#[test]
fn demo_round_reports_both_boards() {
    let dir = tempdir().unwrap();
    let cfg = write_valid_config(&dir);

    let mut cmd = Command::cargo_bin("catch_cli").unwrap();
    cmd.arg("--config").arg(&cfg).arg("simulate");
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("board a: state=over outcome=win score=1"))
        .stdout(predicate::str::contains("board b: state=over outcome=lose score=0"));
}

#[test]
fn json_summary_names_the_winner() {
    let dir = tempdir().unwrap();
    let cfg = write_valid_config(&dir);

    let out = Command::cargo_bin("catch_cli")
        .unwrap()
        .arg("--config")
        .arg(&cfg)
        .arg("--json")
        .arg("simulate")
        .output()
        .unwrap();
    assert!(out.status.success());

    let stdout = String::from_utf8(out.stdout).unwrap();
    let v: serde_json::Value = serde_json::from_str(stdout.trim()).expect("summary is JSON");
    assert_eq!(v["winner"], "a");
    assert_eq!(v["interrupted"], false);
    let boards = v["boards"].as_array().unwrap();
    assert_eq!(boards.len(), 2);
    assert_eq!(boards[0]["score"], 1);
    assert_eq!(boards[1]["outcome"], "lose");
    // a sent its speed choice and one handoff; b only the win byte.
    assert_eq!(boards[0]["sent"], 2);
    assert_eq!(boards[1]["sent"], 1);
    assert_eq!(boards[1]["received"], 2);
}

#[test]
fn show_prints_the_matrices() {
    let dir = tempdir().unwrap();
    let cfg = write_valid_config(&dir);

    let mut cmd = Command::cargo_bin("catch_cli").unwrap();
    cmd.arg("--config").arg(&cfg).arg("simulate").arg("--show");
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("text: 1"))
        .stdout(predicate::str::contains("....."));
}

#[test]
fn custom_script_plays_a_round() {
    let dir = tempdir().unwrap();
    let cfg = write_valid_config(&dir);

    let script = dir.path().join("round.csv");
    let mut f = fs::File::create(&script).unwrap();
    writeln!(f, "tick,board,event").unwrap();
    writeln!(f, "0,a,push").unwrap();
    writeln!(f, "0,b,push").unwrap();
    writeln!(f, "100,a,west").unwrap();
    writeln!(f, "200,a,push").unwrap();
    writeln!(f, "300,a,north").unwrap();
    writeln!(f, "400,a,push").unwrap();

    let mut cmd = Command::cargo_bin("catch_cli").unwrap();
    cmd.arg("--config")
        .arg(&cfg)
        .arg("simulate")
        .arg("--ticks")
        .arg("2000")
        .arg("--script")
        .arg(&script);
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("ticks: 2000"))
        .stdout(predicate::str::contains("winner: a"));
}

#[rstest]
fn cli_reports_bad_script_header() {
    let dir = tempdir().unwrap();
    let cfg = write_valid_config(&dir);

    let bad_csv = dir.path().join("script.csv");
    let mut f = fs::File::create(&bad_csv).unwrap();
    writeln!(f, "when,who,what").unwrap();
    writeln!(f, "0,a,push").unwrap();

    let mut cmd = Command::cargo_bin("catch_cli").unwrap();
    cmd.arg("--config")
        .arg(&cfg)
        .arg("simulate")
        .arg("--script")
        .arg(&bad_csv);

    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("Invalid headers"));
}

#[rstest]
#[case("[grid]\nrows = 2\n", "grid.rows must be in [3, 16]")]
#[case("[tasks]\nbase_hz = 100\nmotion_hz = 250\n", "tasks.motion_hz must be <= tasks.base_hz")]
#[case("[board]\nserve = \"sometimes\"\n", "Configuration is invalid")]
fn cli_rejects_bad_config(#[case] toml: &str, #[case] needle: &str) {
    let dir = tempdir().unwrap();
    let cfg = write_config(&dir, toml);

    let mut cmd = Command::cargo_bin("catch_cli").unwrap();
    cmd.arg("--config").arg(&cfg).arg("self-check");
    cmd.assert()
        .code(1)
        .stderr(predicate::str::contains(needle));
}

#[test]
fn json_errors_are_structured() {
    let dir = tempdir().unwrap();
    let cfg = write_config(&dir, "[grid]\ncols = 1\n");

    let out = Command::cargo_bin("catch_cli")
        .unwrap()
        .arg("--config")
        .arg(&cfg)
        .arg("--json")
        .arg("self-check")
        .output()
        .unwrap();
    assert_eq!(out.status.code(), Some(1));

    let stderr = String::from_utf8(out.stderr).unwrap();
    let line = stderr
        .lines()
        .rev()
        .find(|l| l.contains("\"reason\""))
        .expect("structured error line");
    let v: serde_json::Value = serde_json::from_str(line).unwrap();
    assert_eq!(v["reason"], "Error");
    assert_eq!(v["code"], 1);
}

#[test]
fn missing_config_is_explained() {
    let dir = tempdir().unwrap();
    let mut cmd = Command::cargo_bin("catch_cli").unwrap();
    cmd.arg("--config")
        .arg(dir.path().join("nope.toml"))
        .arg("self-check");
    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("config file could not be read"));
}

//! Exit-status and output checks for the `var-forecast` binary.

use assert_cmd::Command;
use predicates::prelude::*;
use std::io::Write;
use tempfile::NamedTempFile;

fn var_forecast() -> Command {
    Command::cargo_bin("var-forecast").expect("var-forecast binary")
}

/// Two variables where the second is always the first plus one.
fn ramp_csv() -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    for t in 1..=5 {
        writeln!(file, "{},{}", t, t + 1).unwrap();
    }
    file.flush().unwrap();
    file
}

#[test]
fn collinear_fit_exits_two_without_stdout() {
    let data = ramp_csv();
    var_forecast()
        .arg("--train")
        .arg(data.path())
        .arg("--test")
        .arg(data.path())
        .args(["--lag", "1"])
        .assert()
        .code(2)
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::contains("Model estimation failed"));
}

#[test]
fn drop_aliased_fit_reports_rmse() {
    let data = ramp_csv();
    var_forecast()
        .arg("--train")
        .arg(data.path())
        .arg("--test")
        .arg(data.path())
        .args(["--lag", "1", "--drop-aliased"])
        .assert()
        .success()
        .stdout(predicate::str::contains("(aliased)"))
        .stdout(predicate::str::contains("rmse 0.000000"));
}

#[test]
fn missing_file_exits_one() {
    var_forecast()
        .args([
            "--train",
            "/nonexistent/var_forecast/train.csv",
            "--test",
            "/nonexistent/var_forecast/test.csv",
        ])
        .assert()
        .code(1)
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::contains("error:"));
}

use assert_cmd::Command;
use predicates::prelude::*;

#[test]
fn test_demo_match_runs_to_a_verdict() {
    let mut cmd = Command::cargo_bin("ember").unwrap();
    cmd.args(["--turns", "3", "--iterations", "8", "--quiet"])
        .assert()
        .success()
        .stdout(predicate::str::contains("wins").or(predicate::str::contains("no winner")));
}

use crate::fixture_path;
use assert_cmd::Command;
use predicates::prelude::*;

#[test]
fn config_show_defaults() {
    let tmp = tempfile::tempdir().unwrap();
    let mut cmd = Command::cargo_bin("ruleindex").unwrap();
    cmd.args(["config", "show", "--path", tmp.path().to_str().unwrap()]);
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("Resolved settings:"))
        .stdout(predicate::str::contains("defaults.format: json <- default"))
        .stdout(predicate::str::contains("defaults.repo_name: (main) <- default"))
        .stdout(predicate::str::contains("resolve: 0 directive(s) <- default"));
}

#[test]
fn config_show_fixture_project() {
    let mut cmd = Command::cargo_bin("ruleindex").unwrap();
    cmd.args(["config", "show", "--path"])
        .arg(fixture_path("monorepo"));
    cmd.assert()
        .success()
        .stdout(predicate::str::contains(".ruleindex.toml"))
        .stdout(predicate::str::contains(
            "map_kind: my_go_library -> go_library <- project config",
        ))
        .stdout(predicate::str::contains(
            "[go] go:github.com/external/dep -> @com_github_external_dep//:dep",
        ));
}

#[test]
fn env_var_overrides_project_config() {
    let mut cmd = Command::cargo_bin("ruleindex").unwrap();
    cmd.env("RULEINDEX_FORMAT", "text")
        .args(["config", "show", "--path"])
        .arg(fixture_path("monorepo"));
    cmd.assert()
        .success()
        .stdout(predicate::str::contains(
            "defaults.format: text <- env var (RULEINDEX_FORMAT)",
        ));
}

#[test]
fn config_explain_section() {
    let tmp = tempfile::tempdir().unwrap();
    let mut cmd = Command::cargo_bin("ruleindex").unwrap();
    cmd.args(["config", "explain", "targeting", "--path", tmp.path().to_str().unwrap()]);
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("Section: targeting"))
        .stdout(predicate::str::contains("targeting.include"));
}

#[test]
fn invalid_project_config_fails() {
    let tmp = tempfile::tempdir().unwrap();
    std::fs::write(tmp.path().join(".ruleindex.toml"), "[defaults\n").unwrap();
    let mut cmd = Command::cargo_bin("ruleindex").unwrap();
    cmd.args(["config", "show", "--path", tmp.path().to_str().unwrap()]);
    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("Invalid project config"));
}

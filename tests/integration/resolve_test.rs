use crate::fixture_path;
use assert_cmd::Command;
use predicates::prelude::*;
use pretty_assertions::assert_eq;
use serde_json::Value;

fn resolve_json() -> Value {
    let output = Command::cargo_bin("ruleindex")
        .unwrap()
        .args(["resolve", "--quiet"])
        .arg(fixture_path("monorepo"))
        .output()
        .unwrap();
    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));
    serde_json::from_slice(&output.stdout).unwrap()
}

fn rule<'v>(report: &'v Value, label: &str) -> &'v Value {
    report["rules"]
        .as_array()
        .unwrap()
        .iter()
        .find(|r| r["label"] == label)
        .unwrap_or_else(|| panic!("no rule {label} in report"))
}

fn strings(value: &Value) -> Vec<String> {
    value
        .as_array()
        .unwrap()
        .iter()
        .map(|v| v.as_str().unwrap().to_string())
        .collect()
}

#[test]
fn resolve_reports_metadata() {
    let report = resolve_json();
    let metadata = &report["metadata"];
    // third_party is excluded through .ruleindexignore
    assert_eq!(metadata["build_files"], 7);
    assert_eq!(metadata["rules_total"], 11);
    assert_eq!(metadata["rules_indexed"], 9);
    assert_eq!(metadata["unresolved_imports"], 1);
    assert_eq!(strings(&metadata["languages"]), vec!["proto", "go"]);
}

#[test]
fn binary_deps_follow_embedding_and_ambiguity() {
    let report = resolve_json();
    let app = rule(&report, "//app");
    assert_eq!(app["kind"], "go_binary");
    assert_eq!(strings(&app["deps"]), vec!["//dup/a", "//lib"]);
    assert_eq!(strings(&app["unresolved"]), vec!["github.com/unknown/pkg"]);
    assert_eq!(app["ambiguous"][0]["import"], "example.com/repo/dup");
    assert_eq!(
        strings(&app["ambiguous"][0]["candidates"]),
        vec!["//dup/a", "//dup/b"]
    );
}

#[test]
fn library_deps_use_overrides_kind_mapping_and_skip_self_imports() {
    let report = resolve_json();
    let lib = rule(&report, "//lib");
    assert_eq!(
        strings(&lib["deps"]),
        vec![
            "//proto/common:common_go_proto",
            "//util",
            "@com_github_external_dep//:dep",
        ]
    );
    assert!(lib["unresolved"].as_array().unwrap().is_empty());

    let test = rule(&report, "//lib:lib_test");
    assert_eq!(strings(&test["deps"]), vec![":lib"]);
}

#[test]
fn well_known_protos_resolve_per_language() {
    let report = resolve_json();
    assert_eq!(
        strings(&rule(&report, "//proto/common:common_proto")["deps"]),
        vec!["@com_google_protobuf//:timestamp_proto"]
    );
    assert_eq!(
        strings(&rule(&report, "//proto/common:common_go_proto")["deps"]),
        vec!["@org_golang_google_protobuf//types/known/timestamppb"]
    );
}

#[test]
fn embed_cycles_are_reported() {
    let report = resolve_json();
    let diagnostics = report["diagnostics"].as_array().unwrap();
    assert_eq!(diagnostics.len(), 1);
    assert_eq!(diagnostics[0]["kind"], "embed_cycle");
    assert_eq!(
        strings(&diagnostics[0]["members"]),
        vec!["//cycle:x", "//cycle:y"]
    );
}

#[test]
fn repo_name_flag_qualifies_labels() {
    let output = Command::cargo_bin("ruleindex")
        .unwrap()
        .args(["resolve", "--quiet", "--repo-name", "main"])
        .arg(fixture_path("monorepo"))
        .output()
        .unwrap();
    assert!(output.status.success());
    let report: Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(report["metadata"]["repo_name"], "main");
    assert_eq!(
        strings(&rule(&report, "@main//app")["deps"]),
        vec!["@main//dup/a", "@main//lib"]
    );
}

#[test]
fn langs_filter_limits_resolved_rules() {
    let output = Command::cargo_bin("ruleindex")
        .unwrap()
        .args(["resolve", "--quiet", "--langs", "proto"])
        .arg(fixture_path("monorepo"))
        .output()
        .unwrap();
    assert!(output.status.success());
    let report: Value = serde_json::from_slice(&output.stdout).unwrap();
    let labels: Vec<&str> = report["rules"]
        .as_array()
        .unwrap()
        .iter()
        .map(|r| r["label"].as_str().unwrap())
        .collect();
    assert_eq!(labels, vec!["//proto/common:common_proto"]);
    assert_eq!(report["metadata"]["rules_indexed"], 1);
}

#[test]
fn text_format() {
    let mut cmd = Command::cargo_bin("ruleindex").unwrap();
    cmd.args(["resolve", "--quiet", "--format", "text"])
        .arg(fixture_path("monorepo"));
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("Rule Index Report"))
        .stdout(predicate::str::contains("//app (go_binary)"))
        .stdout(predicate::str::contains("  dep        //lib"))
        .stdout(predicate::str::contains(
            "embed cycle between //cycle:x, //cycle:y",
        ));
}

#[test]
fn empty_directory_fails() {
    let tmp = tempfile::tempdir().unwrap();
    let mut cmd = Command::cargo_bin("ruleindex").unwrap();
    cmd.args(["resolve", "--quiet"]).arg(tmp.path());
    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("No build files found"));
}

#[test]
fn malformed_build_file_fails() {
    let tmp = tempfile::tempdir().unwrap();
    std::fs::write(tmp.path().join("BUILD.toml"), "[[rule]]\nkind = \"go_library\"\n").unwrap();
    let mut cmd = Command::cargo_bin("ruleindex").unwrap();
    cmd.args(["resolve", "--quiet"]).arg(tmp.path());
    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("Invalid build file"));
}

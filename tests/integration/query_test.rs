use crate::fixture_path;
use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::Value;

fn query(args: &[&str]) -> Value {
    let output = Command::cargo_bin("ruleindex")
        .unwrap()
        .arg("query")
        .arg(fixture_path("monorepo"))
        .args(args)
        .output()
        .unwrap();
    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));
    serde_json::from_slice(&output.stdout).unwrap()
}

#[test]
fn embedded_import_resolves_to_embedder() {
    let report = query(&["--import", "example.com/repo/lib/impl", "--lang", "go"]);
    let results = report["results"].as_array().unwrap();
    assert_eq!(results.len(), 1);
    assert_eq!(results[0]["label"], "//lib");
    assert_eq!(results[0]["embeds"][0], "//lib:lib_impl");
}

#[test]
fn proto_import_matches_per_consumer_language() {
    let go = query(&[
        "--import",
        "proto/common/common.proto",
        "--import-lang",
        "proto",
        "--lang",
        "go",
    ]);
    assert_eq!(go["results"][0]["label"], "//proto/common:common_go_proto");

    let proto = query(&[
        "--import",
        "proto/common/common.proto",
        "--lang",
        "proto",
    ]);
    assert_eq!(proto["results"][0]["label"], "//proto/common:common_proto");
}

#[test]
fn falls_back_to_cross_resolution() {
    let report = query(&[
        "--import",
        "google/protobuf/any.proto",
        "--import-lang",
        "proto",
        "--lang",
        "go",
    ]);
    assert_eq!(
        report["results"][0]["label"],
        "@org_golang_google_protobuf//types/known/anypb"
    );
}

#[test]
fn no_match_in_text_format() {
    let mut cmd = Command::cargo_bin("ruleindex").unwrap();
    cmd.arg("query")
        .arg(fixture_path("monorepo"))
        .args(["--import", "example.com/none", "--lang", "go", "--format", "text"]);
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("No go rules provide go:example.com/none"));
}

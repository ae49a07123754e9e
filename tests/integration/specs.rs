//! Tests for `featurescript specs`.

use featurescript::test_utils::CatalogFixture;
use predicates::prelude::*;

use crate::common::TestProject;

#[test]
fn test_specs_lists_catalog() {
    let project = TestProject::new(&CatalogFixture::logging());

    project
        .cmd()
        .arg("specs")
        .arg("--catalog")
        .arg(project.catalog())
        .assert()
        .success()
        .stdout(predicate::str::contains("subsystem.logging.console-handler"))
        .stdout(predicate::str::contains("subsystem.logging.root-logger.ROOT"))
        .stdout(predicate::str::contains("4 of 4 specs"));
}

#[test]
fn test_specs_filter_json() {
    let project = TestProject::new(&CatalogFixture::logging());

    let output = project
        .cmd()
        .args(["specs", "handler", "--format", "json", "--catalog"])
        .arg(project.catalog())
        .output()
        .unwrap();
    assert!(output.status.success());

    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let entries = json.as_array().unwrap();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0]["name"], "subsystem.logging.console-handler");
    assert_eq!(entries[0]["op"], "add");
    assert_eq!(entries[0]["provides"][0], "org.wildfly.logging.handler.$console-handler");
}

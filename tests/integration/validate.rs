//! Tests for `featurescript validate`.

use featurescript::test_utils::{CatalogFixture, ConfigFixture};
use predicates::prelude::*;

use crate::common::TestProject;

#[test]
fn test_validate_text_summary() {
    let project = TestProject::new(&CatalogFixture::logging());
    let document = project.document(&ConfigFixture::logging());

    project
        .cmd()
        .arg("validate")
        .arg("--catalog")
        .arg(project.catalog())
        .arg(&document)
        .assert()
        .success()
        .stdout(predicate::str::contains("1. subsystem.logging"))
        .stdout(predicate::str::contains("4. subsystem.logging.root-logger.ROOT"))
        .stdout(predicate::str::contains("Valid: 4 features"));
}

#[test]
fn test_validate_json() {
    let project = TestProject::new(&CatalogFixture::subsystem_property());
    let document = project.document(&ConfigFixture::subsystem_property());

    let output = project
        .cmd()
        .args(["validate", "--format", "json", "--catalog"])
        .arg(project.catalog())
        .arg(&document)
        .output()
        .unwrap();
    assert!(output.status.success());

    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json["valid"], true);
    assert_eq!(json["features"], 3);
    assert_eq!(json["commands"], 9);
    assert_eq!(json["order"][0], "subsystem");
    assert_eq!(json["errors"].as_array().unwrap().len(), 0);
}

#[test]
fn test_validate_json_reports_errors() {
    let project = TestProject::new(&CatalogFixture::subsystem_property());
    let document = project.write_yaml("bad.yml", "config:\n  nothing: 1\n");

    let output = project
        .cmd()
        .args(["validate", "--format", "json", "--catalog"])
        .arg(project.catalog())
        .arg(&document)
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(1));

    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json["valid"], false);
    assert!(json["errors"][0].as_str().unwrap().contains("Invalid element nothing"));
}

#[test]
fn test_validate_warns_about_dropped_templates() {
    let project = TestProject::new(&CatalogFixture::logging());
    // No named-formatter, so the handler's required capability cannot be expanded
    let document = project.write_yaml(
        "handler.yml",
        "config:\n  subsystem:\n    logging:\n      console-handler:\n        CONSOLE:\n          level: INFO\n",
    );

    project
        .cmd()
        .args(["validate", "--quiet", "--warn-dropped", "--catalog"])
        .arg(project.catalog())
        .arg(&document)
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "'org.wildfly.logging.formatter.$named-formatter' of subsystem.logging.console-handler.CONSOLE",
        ));

    project
        .cmd()
        .args(["validate", "--catalog"])
        .arg(project.catalog())
        .arg(&document)
        .assert()
        .success()
        .stdout(predicate::str::contains("could not be resolved").not());
}

//! Failure exit codes and user-facing error messages.

use featurescript::test_utils::{CatalogFixture, ConfigFixture};
use predicates::prelude::*;

use crate::common::TestProject;

#[test]
fn test_unknown_leaf_is_invalid_path() {
    let project = TestProject::new(&CatalogFixture::subsystem_property());
    let document = project.write_yaml("bad.yml", "config:\n  subsystem:\n    bogus: 1\n");

    project
        .cmd()
        .arg("generate")
        .arg("--catalog")
        .arg(project.catalog())
        .arg(&document)
        .assert()
        .code(1)
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::contains("Invalid element bogus for subsystem"))
        .stderr(predicate::str::contains("featurescript specs"));
}

#[test]
fn test_duplicate_declaration_across_documents() {
    let project = TestProject::new(&CatalogFixture::subsystem_property());
    let first = project.document(&ConfigFixture::subsystem_property());
    let second = project.write_yaml(
        "again.yml",
        "config:\n  subsystem:\n    property:\n      p1:\n        value: other\n",
    );

    project
        .cmd()
        .arg("generate")
        .arg("--catalog")
        .arg(project.catalog())
        .arg(&first)
        .arg(&second)
        .assert()
        .code(1)
        .stderr(predicate::str::contains("declared more than once"));
}

#[test]
fn test_malformed_record_fails_catalog_load() {
    let project = TestProject::new(&CatalogFixture::subsystem_property());
    std::fs::write(project.catalog().join("broken.toml"), "op = \"add\"\nparams = \"a,,b\"\n")
        .unwrap();

    project
        .cmd()
        .arg("specs")
        .arg("--catalog")
        .arg(project.catalog())
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Failed to load feature spec"))
        .stderr(predicate::str::contains("broken.toml"));
}

#[test]
fn test_missing_catalog_setting() {
    let project = TestProject::new(&CatalogFixture::subsystem_property());
    let document = project.document(&ConfigFixture::subsystem_property());

    project
        .cmd()
        .arg("generate")
        .arg(&document)
        .assert()
        .code(1)
        .stderr(predicate::str::contains("No spec catalog directory given"))
        .stderr(predicate::str::contains("--catalog"));
}

#[test]
fn test_missing_document() {
    let project = TestProject::new(&CatalogFixture::subsystem_property());

    project
        .cmd()
        .arg("generate")
        .arg("--catalog")
        .arg(project.catalog())
        .arg("missing.yml")
        .assert()
        .code(1)
        .stderr(predicate::str::contains("missing.yml"));
}

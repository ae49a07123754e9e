//! Tests for `featurescript generate`.

use featurescript::test_utils::{CatalogFixture, ConfigFixture};
use predicates::prelude::*;

use crate::common::TestProject;

#[test]
fn test_generate_to_stdout() {
    let project = TestProject::new(&CatalogFixture::logging());
    let document = project.document(&ConfigFixture::logging());

    let output = project
        .cmd()
        .arg("generate")
        .arg("--catalog")
        .arg(project.catalog())
        .arg(&document)
        .output()
        .unwrap();
    assert!(output.status.success());

    let stdout = String::from_utf8(output.stdout).unwrap();
    let comments: Vec<&str> = stdout.lines().filter(|line| line.starts_with('#')).collect();
    assert_eq!(
        comments,
        vec![
            "# subsystem.logging",
            "# subsystem.logging.pattern-formatter.COLOR-PATTERN",
            "# subsystem.logging.console-handler.CONSOLE",
            "# subsystem.logging.root-logger.ROOT",
        ]
    );
    assert!(stdout.contains(
        "/subsystem=logging/console-handler=CONSOLE:add(level=INFO,named-formatter=COLOR-PATTERN)"
    ));
    assert!(stdout.ends_with("end-if\n"));
}

#[test]
fn test_generate_without_comments() {
    let project = TestProject::new(&CatalogFixture::subsystem_property());
    let document = project.document(&ConfigFixture::subsystem_property());

    project
        .cmd()
        .args(["generate", "--no-comments", "--catalog"])
        .arg(project.catalog())
        .arg(&document)
        .assert()
        .success()
        .stdout(predicate::str::contains("#").not())
        .stdout(predicate::str::starts_with("if (outcome != success) of /:read-resource\n"));
}

#[test]
fn test_generate_to_file() {
    let project = TestProject::new(&CatalogFixture::subsystem_property());
    let document = project.document(&ConfigFixture::subsystem_property());
    let output = project.path().join("build").join("setup.cli");

    project
        .cmd()
        .arg("generate")
        .arg("--catalog")
        .arg(project.catalog())
        .arg("-o")
        .arg(&output)
        .arg(&document)
        .assert()
        .success()
        .stdout(predicate::str::contains("Generated 9 commands for 3 features"));

    let script = std::fs::read_to_string(&output).unwrap();
    assert!(script.starts_with("# subsystem\n"));
    assert!(script.contains("/name=p2:add(value=v2)"));
}

#[test]
fn test_generate_resolves_documents_together() {
    let project = TestProject::new(&CatalogFixture::capability_pair());
    let consumer = project.write_yaml("consumer.yml", "config:\n  consumer:\n");
    let provider = project.write_yaml("provider.yml", "config:\n  provider:\n    foo:\n");

    let output = project
        .cmd()
        .args(["generate", "--no-comments", "--catalog"])
        .arg(project.catalog())
        .arg(&consumer)
        .arg(&provider)
        .output()
        .unwrap();
    assert!(output.status.success());

    let stdout = String::from_utf8(output.stdout).unwrap();
    let provider_at = stdout.find("/name=foo:add").unwrap();
    let consumer_at = stdout.find("/:add").unwrap();
    assert!(provider_at < consumer_at);
}

#[test]
fn test_generate_uses_tool_config() {
    let project = TestProject::new(&CatalogFixture::subsystem_property());
    let document = project.document(&ConfigFixture::subsystem_property());
    let output = project.path().join("configured.cli");
    project.set_tool_config(&format!(
        "catalog = \"{}\"\noutput = \"{}\"\ncomments = false\n",
        project.catalog().display(),
        output.display()
    ));

    project.cmd().arg("generate").arg(&document).assert().success();

    let script = std::fs::read_to_string(&output).unwrap();
    assert!(!script.contains('#'));
    assert_eq!(script.lines().count(), 9);
}

//! Tests for argument parsing, configuration building and command execution.
//!
//! Execution tests always pass an explicit `--config` file inside a temporary
//! directory so the user's `~/.featurescript/config.toml` is never read.

use super::{Cli, CliConfig, Commands, OutputFormat};
use crate::test_utils::{CatalogFixture, ConfigFixture};
use clap::Parser;
use std::path::PathBuf;
use tempfile::TempDir;

#[test]
fn test_cli_parsing() {
    assert!(Cli::try_parse_from(["featurescript", "--help"]).is_err());
    assert!(Cli::try_parse_from(["featurescript"]).is_err());
    assert!(Cli::try_parse_from(["featurescript", "specs"]).is_ok());
}

#[test]
fn test_generate_requires_a_config() {
    assert!(Cli::try_parse_from(["featurescript", "generate"]).is_err());

    let cli = Cli::try_parse_from(["featurescript", "generate", "a.yml", "b.yml", "--no-comments"])
        .unwrap();
    match cli.command {
        Commands::Generate(cmd) => {
            assert_eq!(cmd.configs, vec![PathBuf::from("a.yml"), PathBuf::from("b.yml")]);
            assert!(cmd.no_comments);
            assert!(cmd.output.is_none());
        }
        _ => panic!("expected generate"),
    }
}

#[test]
fn test_validate_format_flag() {
    let cli = Cli::try_parse_from(["featurescript", "validate", "--format", "json", "a.yml"])
        .unwrap();
    match cli.command {
        Commands::Validate(cmd) => {
            assert_eq!(cmd.format, OutputFormat::Json);
            assert!(!cmd.warn_dropped);
        }
        _ => panic!("expected validate"),
    }

    assert!(
        Cli::try_parse_from(["featurescript", "validate", "--format", "xml", "a.yml"]).is_err()
    );
}

#[test]
fn test_build_config_log_levels() {
    let cli = Cli::try_parse_from(["featurescript", "specs"]).unwrap();
    assert_eq!(cli.build_config().log_level.as_deref(), Some("warn"));

    let cli = Cli::try_parse_from(["featurescript", "-v", "specs"]).unwrap();
    assert_eq!(cli.build_config().log_level.as_deref(), Some("debug"));

    let cli = Cli::try_parse_from(["featurescript", "specs", "--quiet"]).unwrap();
    assert_eq!(cli.build_config().log_level.as_deref(), Some("error"));

    assert!(Cli::try_parse_from(["featurescript", "-v", "-q", "specs"]).is_err());
}

#[test]
fn test_build_config_keeps_config_path() {
    let cli = Cli::try_parse_from(["featurescript", "--config", "/tmp/fs.toml", "specs"]).unwrap();
    assert_eq!(cli.build_config().config_path, Some(PathBuf::from("/tmp/fs.toml")));
}

struct Workspace {
    temp: TempDir,
    config: PathBuf,
    catalog: PathBuf,
}

impl Workspace {
    fn new(tool_config: &str) -> Self {
        let temp = tempfile::tempdir().unwrap();
        let catalog = CatalogFixture::subsystem_property().write_to(&temp.path().join("specs")).unwrap();
        let config = temp.path().join("featurescript.toml");
        std::fs::write(&config, tool_config).unwrap();
        Self {
            temp,
            config,
            catalog,
        }
    }

    fn run(&self, args: &[&str]) -> anyhow::Result<()> {
        let mut argv = vec!["featurescript", "--config", self.config.to_str().unwrap()];
        argv.extend_from_slice(args);
        let cli = Cli::try_parse_from(argv).unwrap();
        cli.execute_with_config(CliConfig {
            log_level: Some("error".to_string()),
            config_path: Some(self.config.clone()),
        })
    }
}

#[test]
fn test_generate_writes_output_file() {
    let ws = Workspace::new("");
    let document = ConfigFixture::subsystem_property().write_to(ws.temp.path()).unwrap();
    let output = ws.temp.path().join("out").join("setup.cli");

    ws.run(&[
        "generate",
        "--catalog",
        ws.catalog.to_str().unwrap(),
        "-o",
        output.to_str().unwrap(),
        document.to_str().unwrap(),
    ])
    .unwrap();

    let script = std::fs::read_to_string(&output).unwrap();
    assert!(script.starts_with("# subsystem\n"));
    assert!(script.contains("/name=p1:add(value=v1)"));
}

#[test]
fn test_catalog_and_output_from_tool_config() {
    let temp = tempfile::tempdir().unwrap();
    let output = temp.path().join("configured.cli");
    let ws = Workspace::new("");
    let tool_config = format!(
        "catalog = \"{}\"\noutput = \"{}\"\ncomments = false\n",
        ws.catalog.display(),
        output.display()
    );
    std::fs::write(&ws.config, tool_config).unwrap();
    let document = ConfigFixture::subsystem_property().write_to(ws.temp.path()).unwrap();

    ws.run(&["generate", document.to_str().unwrap()]).unwrap();

    let script = std::fs::read_to_string(&output).unwrap();
    assert!(!script.contains('#'));
    assert!(script.starts_with("if (outcome != success)"));
}

#[test]
fn test_missing_catalog_is_reported() {
    let ws = Workspace::new("");
    let document = ConfigFixture::subsystem_property().write_to(ws.temp.path()).unwrap();

    let err = ws.run(&["validate", document.to_str().unwrap()]).unwrap_err();
    let context = crate::core::user_friendly_error(err);
    assert!(context.error.to_string().contains("No spec catalog directory given"));
    assert!(context.suggestion.is_some());
}

#[test]
fn test_missing_tool_config_file_fails() {
    let ws = Workspace::new("");
    std::fs::remove_file(&ws.config).unwrap();
    let err = ws.run(&["specs", "--catalog", ws.catalog.to_str().unwrap()]).unwrap_err();
    assert!(err.to_string().contains("Configuration file not found"));
}

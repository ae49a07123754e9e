//! Shared helpers for the integration tests.

#![allow(dead_code)]

use assert_cmd::Command;
use featurescript::test_utils::{CatalogFixture, ConfigFixture};
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// A temporary directory holding a catalog, documents and an empty tool config.
pub struct TestProject {
    temp: TempDir,
    catalog: PathBuf,
    tool_config: PathBuf,
}

impl TestProject {
    /// Project with the records of `catalog` written to `<temp>/specs`.
    pub fn new(catalog: &CatalogFixture) -> Self {
        let temp = TempDir::new().unwrap();
        let catalog = catalog.write_to(&temp.path().join("specs")).unwrap();
        let tool_config = temp.path().join("featurescript.toml");
        fs::write(&tool_config, "").unwrap();
        Self {
            temp,
            catalog,
            tool_config,
        }
    }

    pub fn path(&self) -> &Path {
        self.temp.path()
    }

    pub fn catalog(&self) -> &Path {
        &self.catalog
    }

    /// Write a document fixture and return its path.
    pub fn document(&self, fixture: &ConfigFixture) -> PathBuf {
        fixture.write_to(self.temp.path()).unwrap()
    }

    /// Write raw YAML to `<temp>/<name>` and return its path.
    pub fn write_yaml(&self, name: &str, content: &str) -> PathBuf {
        let path = self.temp.path().join(name);
        fs::write(&path, content).unwrap();
        path
    }

    /// Replace the tool configuration file contents.
    pub fn set_tool_config(&self, content: &str) {
        fs::write(&self.tool_config, content).unwrap();
    }

    /// The binary, isolated from the user's configuration and `RUST_LOG`.
    pub fn cmd(&self) -> Command {
        let mut cmd = Command::cargo_bin("featurescript").unwrap();
        cmd.current_dir(self.temp.path())
            .env_remove("RUST_LOG")
            .env_remove("FEATURESCRIPT_CONFIG")
            .arg("--config")
            .arg(&self.tool_config);
        cmd
    }
}

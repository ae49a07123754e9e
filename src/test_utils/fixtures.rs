//! Test fixtures for catalogs and configuration documents
//!
//! Catalog fixtures hold spec records as TOML text, so the same fixture can be
//! written to a directory for loader and CLI tests or parsed in memory for
//! resolver tests.

use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};

use crate::catalog::{SpecCatalog, record};
use crate::models::{ConfigDocument, ConfigValue};

/// A set of spec records keyed by spec name
#[derive(Clone, Debug)]
pub struct CatalogFixture {
    pub name: String,
    pub records: Vec<(String, String)>,
}

impl CatalogFixture {
    fn new(name: &str, records: &[(&str, &str)]) -> Self {
        Self {
            name: name.to_string(),
            records: records
                .iter()
                .map(|(spec, content)| ((*spec).to_string(), content.trim().to_string()))
                .collect(),
        }
    }

    /// Logging subsystem with handlers, formatters and the root logger
    pub fn logging() -> Self {
        Self::new(
            "logging",
            &[
                (
                    "subsystem.logging",
                    r#"
op = "add"
params = "subsystem,add-logging-api-dependencies"
capabilities-provided = "org.wildfly.logging"

[param.subsystem]
feature-id = true
default = "logging"
"#,
                ),
                (
                    "subsystem.logging.console-handler",
                    r#"
op = "add"
op-params = "level,named-formatter"
params = "subsystem,console-handler,level,named-formatter,autoflush,filter-spec"
refs = "subsystem.logging"
capabilities-provided = "org.wildfly.logging.handler.$console-handler"
capabilities-required = "org.wildfly.logging.formatter.$named-formatter"

[param.subsystem]
feature-id = true
default = "logging"

[param.console-handler]
feature-id = true
"#,
                ),
                (
                    "subsystem.logging.pattern-formatter",
                    r#"
op = "add"
op-params = "pattern"
params = "subsystem,pattern-formatter,pattern,color-map"
refs = "subsystem.logging"
capabilities-provided = "org.wildfly.logging.formatter.$pattern-formatter"

[param.subsystem]
feature-id = true
default = "logging"

[param.pattern-formatter]
feature-id = true
"#,
                ),
                (
                    "subsystem.logging.root-logger.ROOT",
                    r#"
op = "add"
op-params = "level,handlers"
params = "subsystem,root-logger,level,handlers,filter-spec"
refs = "subsystem.logging"
capabilities-required = "org.wildfly.logging.handler.$handlers"

[param.subsystem]
feature-id = true
default = "logging"

[param.root-logger]
feature-id = true
default = "ROOT"
"#,
                ),
            ],
        )
    }

    /// `subsystem` singleton with named `subsystem.property` instances
    pub fn subsystem_property() -> Self {
        Self::new(
            "subsystem_property",
            &[
                ("subsystem", "op = \"add\"\n"),
                (
                    "subsystem.property",
                    r#"
op = "add"
op-params = "value"
params = "name,value"

[param.name]
feature-id = true
"#,
                ),
            ],
        )
    }

    /// `provider` instances providing `cap.$name`, and a `consumer` requiring `cap.foo`
    pub fn capability_pair() -> Self {
        Self::new(
            "capability_pair",
            &[
                ("consumer", "op = \"add\"\ncapabilities-required = \"cap.foo\"\n"),
                (
                    "provider",
                    r#"
op = "add"
params = "name"
capabilities-provided = "cap.$name"

[param.name]
feature-id = true
"#,
                ),
            ],
        )
    }

    /// Parse the records into an in-memory catalog
    pub fn catalog(&self) -> Result<SpecCatalog> {
        let specs = self
            .records
            .iter()
            .map(|(spec, content)| record::parse_record(spec, &format!("{spec}.toml"), content))
            .collect::<crate::core::Result<Vec<_>>>()?;
        Ok(SpecCatalog::from_specs(specs)?)
    }

    /// Write one `<spec>.toml` file per record into `dir`
    pub fn write_to(&self, dir: &Path) -> Result<PathBuf> {
        fs::create_dir_all(dir)
            .with_context(|| format!("Failed to create catalog directory {}", dir.display()))?;
        for (spec, content) in &self.records {
            let path = dir.join(format!("{spec}.toml"));
            fs::write(&path, content)
                .with_context(|| format!("Failed to write {}", path.display()))?;
        }
        Ok(dir.to_path_buf())
    }
}

/// Test fixture for YAML configuration documents
#[derive(Clone, Debug)]
pub struct ConfigFixture {
    pub name: String,
    pub content: String,
}

impl ConfigFixture {
    /// Logging configuration matching [`CatalogFixture::logging`]
    pub fn logging() -> Self {
        Self {
            name: "logging".to_string(),
            content: r#"
wildfly-configuration:
  subsystem:
    logging:
      root-logger:
        ROOT:
          level: INFO
          handlers: [CONSOLE]
      console-handler:
        CONSOLE:
          level: INFO
          named-formatter: COLOR-PATTERN
          autoflush: true
      pattern-formatter:
        COLOR-PATTERN:
          pattern: "%K{level}%d{HH:mm:ss,SSS} %-5p [%c] (%t) %s%e%n"
"#
            .trim()
            .to_string(),
        }
    }

    /// Configuration matching [`CatalogFixture::subsystem_property`]
    pub fn subsystem_property() -> Self {
        Self {
            name: "subsystem_property".to_string(),
            content: r#"
config:
  subsystem:
    property:
      p1:
        value: v1
      p2:
        value: v2
"#
            .trim()
            .to_string(),
        }
    }

    /// Parse the document and return the tree below its root key
    pub fn tree(&self) -> Result<ConfigValue> {
        Ok(ConfigDocument::from_yaml_str(&self.content)?.tree)
    }

    /// Write the document to `dir/<name>.yml`
    pub fn write_to(&self, dir: &Path) -> Result<PathBuf> {
        let path = dir.join(format!("{}.yml", self.name));
        fs::write(&path, &self.content)
            .with_context(|| format!("Failed to write {}", path.display()))?;
        Ok(path)
    }
}

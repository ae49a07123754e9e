//! List the entries of a spec catalog.
//!
//! ```bash
//! featurescript specs --catalog feature-specs
//! featurescript specs logging --format json
//! ```

use anyhow::Result;
use clap::Args;
use colored::Colorize;
use serde::Serialize;
use std::path::PathBuf;

use super::common::{OutputFormat, load_catalog};
use crate::catalog::{FeatureSpec, SpecCatalog};
use crate::config::ToolConfig;

/// Arguments for `featurescript specs`.
#[derive(Args, Debug)]
pub struct SpecsCommand {
    /// Only list specs whose name contains this text
    #[arg(value_name = "FILTER")]
    pub filter: Option<String>,

    /// Spec catalog directory
    #[arg(long, value_name = "DIR")]
    pub catalog: Option<PathBuf>,

    /// Output format: text or json
    #[arg(long, value_enum, default_value = "text")]
    pub format: OutputFormat,
}

#[derive(Debug, Serialize)]
struct SpecEntry<'a> {
    name: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    op: Option<&'a str>,
    ids: &'a [String],
    #[serde(skip_serializing_if = "Vec::is_empty")]
    provides: Vec<&'a str>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    requires: Vec<&'a str>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    refs: Vec<&'a str>,
}

impl<'a> From<&'a FeatureSpec> for SpecEntry<'a> {
    fn from(spec: &'a FeatureSpec) -> Self {
        Self {
            name: &spec.name,
            op: spec.op.as_deref(),
            ids: &spec.id_params,
            provides: spec.provided_capabilities.iter().map(String::as_str).collect(),
            requires: spec.required_capabilities.iter().map(String::as_str).collect(),
            refs: spec.feature_refs.iter().map(String::as_str).collect(),
        }
    }
}

impl SpecsCommand {
    pub fn execute(self, config: &ToolConfig) -> Result<()> {
        let catalog = load_catalog(self.catalog.as_deref(), config)?;
        let entries = self.entries(&catalog);

        match self.format {
            OutputFormat::Json => {
                println!("{}", serde_json::to_string_pretty(&entries)?);
            }
            OutputFormat::Text => {
                if entries.is_empty() {
                    println!("No matching specs");
                    return Ok(());
                }
                for entry in &entries {
                    let op = entry
                        .op
                        .map_or_else(|| "(reference)".dimmed().to_string(), |op| op.cyan().to_string());
                    if entry.ids.is_empty() {
                        println!("{} {op}", entry.name.bold());
                    } else {
                        println!("{} {op} [{}]", entry.name.bold(), entry.ids.join(", "));
                    }
                }
                println!("\n{} of {} specs", entries.len(), catalog.len());
            }
        }

        Ok(())
    }

    fn entries<'a>(&self, catalog: &'a SpecCatalog) -> Vec<SpecEntry<'a>> {
        catalog
            .iter()
            .filter(|spec| self.filter.as_deref().is_none_or(|filter| spec.name.contains(filter)))
            .map(|spec| SpecEntry::from(spec.as_ref()))
            .collect()
    }
}

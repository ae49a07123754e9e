//! Validate configuration documents against a catalog.
//!
//! Runs the full resolution and ordering without writing a script. Text output
//! lists the features in script order; JSON output emits a
//! [`ValidationResults`] object on success and on failure, which makes the
//! command usable from CI.
//!
//! With `--warn-dropped` (or `warn-dropped = true` in the configuration file)
//! capability templates that could not be filled from a feature's values are
//! reported as warnings.
//!
//! ```bash
//! featurescript validate wildfly.yml
//! featurescript validate --format json --warn-dropped base.yml logging.yml
//! ```

use anyhow::Result;
use clap::Args;
use colored::Colorize;
use serde::Serialize;
use std::path::PathBuf;
use tracing::warn;

use super::common::{OutputFormat, load_catalog, load_documents};
use crate::catalog::SpecCatalog;
use crate::config::ToolConfig;
use crate::resolver::{ResolvedFeature, resolve_and_order};
use crate::script::{Script, ScriptOptions};

/// Arguments for `featurescript validate`.
#[derive(Args, Debug)]
pub struct ValidateCommand {
    /// Configuration documents (YAML), resolved together
    #[arg(value_name = "CONFIG", required = true)]
    pub configs: Vec<PathBuf>,

    /// Spec catalog directory
    #[arg(long, value_name = "DIR")]
    pub catalog: Option<PathBuf>,

    /// Output format: text or json
    #[arg(long, value_enum, default_value = "text")]
    pub format: OutputFormat,

    /// Report capability templates dropped during resolution
    #[arg(long)]
    pub warn_dropped: bool,
}

/// Summary printed by `validate --format json`.
#[derive(Debug, Default, Serialize)]
pub struct ValidationResults {
    /// Whether resolution and ordering succeeded
    pub valid: bool,
    /// Number of resolved features
    pub features: usize,
    /// Number of emitted commands
    pub commands: usize,
    /// Resolved paths in script order
    pub order: Vec<String>,
    /// Fatal problems
    pub errors: Vec<String>,
    /// Non-fatal problems
    pub warnings: Vec<String>,
}

impl ValidationResults {
    fn from_ordered(ordered: &[ResolvedFeature], warn_dropped: bool) -> Self {
        let script = Script::from_features(
            ordered,
            ScriptOptions {
                comments: false,
            },
        );

        let mut warnings = Vec::new();
        if warn_dropped {
            for feature in ordered {
                for template in feature.dropped_capabilities() {
                    warnings.push(format!(
                        "Capability template '{template}' of {} could not be resolved",
                        feature.resolved_path()
                    ));
                }
            }
        }

        Self {
            valid: true,
            features: ordered.len(),
            commands: script.command_count(),
            order: ordered.iter().map(|f| f.resolved_path().to_string()).collect(),
            errors: Vec::new(),
            warnings,
        }
    }

    fn failed(message: String) -> Self {
        Self {
            valid: false,
            errors: vec![message],
            ..Self::default()
        }
    }
}

impl ValidateCommand {
    pub fn execute(self, config: &ToolConfig) -> Result<()> {
        let warn_dropped = self.warn_dropped || config.warn_dropped;

        let outcome = load_catalog(self.catalog.as_deref(), config).and_then(|catalog| {
            let ordered = self.resolve(&catalog)?;
            Ok(ValidationResults::from_ordered(&ordered, warn_dropped))
        });

        let results = match outcome {
            Ok(results) => results,
            Err(e) => {
                if matches!(self.format, OutputFormat::Json) {
                    let results = ValidationResults::failed(format!("{e:#}"));
                    println!("{}", serde_json::to_string_pretty(&results)?);
                }
                return Err(e);
            }
        };

        for warning in &results.warnings {
            warn!("{warning}");
        }

        match self.format {
            OutputFormat::Json => {
                println!("{}", serde_json::to_string_pretty(&results)?);
            }
            OutputFormat::Text => {
                for (index, path) in results.order.iter().enumerate() {
                    println!("{:>4}. {path}", index + 1);
                }
                for warning in &results.warnings {
                    println!("{} {warning}", "⚠".yellow());
                }
                println!(
                    "{} Valid: {} features, {} commands",
                    "✓".green(),
                    results.features,
                    results.commands
                );
            }
        }

        Ok(())
    }

    fn resolve(&self, catalog: &SpecCatalog) -> Result<Vec<ResolvedFeature>> {
        let roots = load_documents(&self.configs)?;
        Ok(resolve_and_order(catalog, &roots)?)
    }
}

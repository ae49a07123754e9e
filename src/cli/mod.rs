//! Command-line interface for featurescript.
//!
//! # Commands
//!
//! - `generate` - Resolve configuration documents and write the ordered script
//! - `validate` - Resolve and order without writing, reporting a summary
//! - `specs` - List the entries of a spec catalog
//!
//! # Examples
//!
//! ```bash
//! # Print the script for one document
//! featurescript generate --catalog feature-specs wildfly.yml
//!
//! # Several documents resolved together, written to a file
//! featurescript generate --catalog feature-specs base.yml datasources.yml -o setup.cli
//!
//! # Machine-readable validation
//! featurescript validate --format json --warn-dropped wildfly.yml
//!
//! # Catalog entries whose name contains "logging"
//! featurescript specs logging
//! ```
//!
//! Global flags (`--verbose`, `--quiet`, `--config`) are accepted before or
//! after the subcommand. Command line flags take precedence over values from
//! the [`ToolConfig`] file.

mod common;
mod generate;
mod specs;
mod validate;

#[cfg(test)]
mod tests;

pub use common::OutputFormat;

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use crate::config::ToolConfig;

/// Runtime settings derived from the global flags.
///
/// Kept separate from [`Cli`] so tests can execute commands with an explicit
/// configuration.
#[derive(Debug, Clone, Default)]
pub struct CliConfig {
    /// Log filter used when `RUST_LOG` is unset.
    pub log_level: Option<String>,

    /// Tool configuration file given with `--config`.
    pub config_path: Option<PathBuf>,
}

impl CliConfig {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Install the global tracing subscriber, writing to stderr.
    ///
    /// `RUST_LOG` wins over `log_level`. Calling this more than once is
    /// harmless; later calls leave the first subscriber in place.
    pub fn init_logging(&self) {
        let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(self.log_level.as_deref().unwrap_or("warn"))
        });

        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .with_target(false)
            .without_time()
            .try_init();
    }
}

/// Resolve declarative feature configurations into ordered management scripts.
#[derive(Parser)]
#[command(
    name = "featurescript",
    about = "Resolve declarative feature configurations into ordered management scripts",
    version,
    long_about = "featurescript matches a nested configuration document against a catalog of feature specs and emits an ordered, idempotent command script."
)]
pub struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Show resolution details (debug logging)
    #[arg(short, long, global = true, conflicts_with = "quiet")]
    verbose: bool,

    /// Only log errors
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Path to the tool configuration file
    ///
    /// Defaults to `$FEATURESCRIPT_CONFIG`, then `~/.featurescript/config.toml`.
    #[arg(short, long, global = true, value_name = "FILE")]
    config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Resolve, order and write the command script
    Generate(generate::GenerateCommand),

    /// Resolve and order without writing, then report
    Validate(validate::ValidateCommand),

    /// List catalog entries
    Specs(specs::SpecsCommand),
}

impl Cli {
    /// Execute with the configuration built from the parsed flags.
    pub fn execute(self) -> Result<()> {
        let config = self.build_config();
        self.execute_with_config(config)
    }

    /// Translate global flags into a [`CliConfig`].
    ///
    /// `--verbose` selects `debug`, `--quiet` selects `error`, otherwise `warn`.
    #[must_use]
    pub fn build_config(&self) -> CliConfig {
        let log_level = if self.verbose {
            "debug"
        } else if self.quiet {
            "error"
        } else {
            "warn"
        };

        CliConfig {
            log_level: Some(log_level.to_string()),
            config_path: self.config.clone(),
        }
    }

    /// Execute the selected subcommand with an explicit configuration.
    pub fn execute_with_config(self, config: CliConfig) -> Result<()> {
        config.init_logging();

        let tool_config = ToolConfig::load_with_optional(config.config_path.clone())?;

        match self.command {
            Commands::Generate(cmd) => cmd.execute(&tool_config),
            Commands::Validate(cmd) => cmd.execute(&tool_config),
            Commands::Specs(cmd) => cmd.execute(&tool_config),
        }
    }
}

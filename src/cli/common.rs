//! Helpers shared by the subcommands.

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::catalog::SpecCatalog;
use crate::config::ToolConfig;
use crate::core::{ErrorContext, FeatureScriptError};
use crate::models::{ConfigDocument, ConfigValue};

/// Output format for commands that report results.
#[derive(Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text
    Text,
    /// Pretty-printed JSON
    Json,
}

/// The catalog directory from the flag, falling back to the configuration file.
pub fn catalog_dir(flag: Option<&Path>, config: &ToolConfig) -> Result<PathBuf> {
    if let Some(dir) = flag {
        return Ok(dir.to_path_buf());
    }
    match config.catalog_dir()? {
        Some(dir) => Ok(dir),
        None => Err(ErrorContext::new(FeatureScriptError::ConfigError {
            message: "No spec catalog directory given".to_string(),
        })
        .with_suggestion(
            "Pass --catalog <DIR> or set `catalog` in ~/.featurescript/config.toml",
        )
        .into()),
    }
}

/// Load the catalog selected by `flag` or the configuration.
pub fn load_catalog(flag: Option<&Path>, config: &ToolConfig) -> Result<SpecCatalog> {
    let dir = catalog_dir(flag, config)?;
    debug!("Loading spec catalog from {}", dir.display());
    Ok(SpecCatalog::load(&dir)?)
}

/// Load every configuration document, returning the trees below their root keys.
pub fn load_documents(paths: &[PathBuf]) -> Result<Vec<ConfigValue>> {
    paths
        .iter()
        .map(|path| {
            ConfigDocument::load(path)
                .map(|document| document.tree)
                .with_context(|| format!("Failed to load configuration {}", path.display()))
        })
        .collect()
}

//! Tool configuration for featurescript
//!
//! Optional user settings read from a TOML file. Every setting has a command
//! line counterpart that takes precedence.
//!
//! # Location
//!
//! 1. `--config <path>` on the command line
//! 2. `FEATURESCRIPT_CONFIG` environment variable
//! 3. `~/.featurescript/config.toml`
//!
//! A missing file at the default location yields [`ToolConfig::default`]. A
//! file named explicitly through 1 or 2 must exist.
//!
//! # Format
//!
//! ```toml
//! # Directory of spec records
//! catalog = "~/wildfly/feature-specs"
//!
//! # Script destination; stdout when unset
//! output = "$BUILD_DIR/setup.cli"
//!
//! # Precede each feature block with a `# <path>` comment
//! comments = true
//!
//! # Report capability templates that could not be substituted
//! warn-dropped = false
//! ```
//!
//! Path values support `~/` and `$VAR` expansion.

mod parser;

pub use parser::parse_config;

use anyhow::{Result, bail};
use serde::{Deserialize, Serialize};
use std::ffi::OsString;
use std::path::PathBuf;
use tracing::debug;

use crate::utils::resolve_path;

/// Environment variable naming the configuration file.
pub const CONFIG_ENV: &str = "FEATURESCRIPT_CONFIG";

/// User settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct ToolConfig {
    /// Spec catalog directory.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub catalog: Option<String>,

    /// Script output file.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output: Option<String>,

    /// Emit `# <resolved-path>` comments.
    #[serde(default = "default_comments")]
    pub comments: bool,

    /// Warn about capability templates dropped during resolution.
    #[serde(default)]
    pub warn_dropped: bool,
}

const fn default_comments() -> bool {
    true
}

impl Default for ToolConfig {
    fn default() -> Self {
        Self {
            catalog: None,
            output: None,
            comments: default_comments(),
            warn_dropped: false,
        }
    }
}

impl ToolConfig {
    /// `~/.featurescript/config.toml`.
    pub fn default_path() -> Result<PathBuf> {
        Ok(dirs::home_dir()
            .ok_or_else(|| anyhow::anyhow!("Unable to determine home directory"))?
            .join(".featurescript")
            .join("config.toml"))
    }

    /// Load from `path`, the environment override, or the default location.
    pub fn load_with_optional(path: Option<PathBuf>) -> Result<Self> {
        Self::load_located(path, std::env::var_os(CONFIG_ENV))
    }

    fn load_located(path: Option<PathBuf>, env: Option<OsString>) -> Result<Self> {
        let explicit = path.or_else(|| env.filter(|v| !v.is_empty()).map(PathBuf::from));
        match explicit {
            Some(path) => {
                if !path.exists() {
                    bail!("Configuration file not found: {}", path.display());
                }
                Self::load_from(&path)
            }
            None => {
                let path = Self::default_path()?;
                if path.exists() {
                    Self::load_from(&path)
                } else {
                    debug!("No configuration at {}, using defaults", path.display());
                    Ok(Self::default())
                }
            }
        }
    }

    /// Load from a specific file.
    pub fn load_from(path: &std::path::Path) -> Result<Self> {
        let config: Self = parse_config(path)?;
        debug!("Loaded configuration from {}", path.display());
        Ok(config)
    }

    /// Expanded catalog directory, if configured.
    pub fn catalog_dir(&self) -> Result<Option<PathBuf>> {
        self.catalog.as_deref().map(resolve_path).transpose()
    }

    /// Expanded output path, if configured.
    pub fn output_path(&self) -> Result<Option<PathBuf>> {
        self.output.as_deref().map(resolve_path).transpose()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_defaults() {
        let config: ToolConfig = toml::from_str("").unwrap();
        assert_eq!(config, ToolConfig::default());
        assert!(config.comments);
        assert!(!config.warn_dropped);
    }

    #[test]
    fn test_parse_all_fields() {
        let config: ToolConfig = toml::from_str(
            "catalog = \"specs\"\noutput = \"out.cli\"\ncomments = false\nwarn-dropped = true\n",
        )
        .unwrap();
        assert_eq!(config.catalog_dir().unwrap(), Some(PathBuf::from("specs")));
        assert_eq!(config.output_path().unwrap(), Some(PathBuf::from("out.cli")));
        assert!(!config.comments);
        assert!(config.warn_dropped);
    }

    #[test]
    fn test_unknown_field_rejected() {
        assert!(toml::from_str::<ToolConfig>("catalgo = \"specs\"\n").is_err());
    }

    #[test]
    fn test_explicit_path_must_exist() {
        let temp = tempdir().unwrap();
        let missing = temp.path().join("missing.toml");
        let err = ToolConfig::load_located(Some(missing), None).unwrap_err();
        assert!(err.to_string().contains("Configuration file not found"));
    }

    #[test]
    fn test_env_path_used_when_no_flag() {
        let temp = tempdir().unwrap();
        let path = temp.path().join("config.toml");
        std::fs::write(&path, "comments = false\n").unwrap();

        let config = ToolConfig::load_located(None, Some(path.clone().into_os_string())).unwrap();
        assert!(!config.comments);

        let other = temp.path().join("other.toml");
        std::fs::write(&other, "warn-dropped = true\n").unwrap();
        let config = ToolConfig::load_located(Some(other), Some(path.into_os_string())).unwrap();
        assert!(config.warn_dropped);
        assert!(config.comments);
    }
}

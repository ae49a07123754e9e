//! Generic TOML parsing with file context.
//!
//! ```rust,no_run
//! use featurescript::config::{ToolConfig, parse_config};
//! use std::path::Path;
//!
//! # fn example() -> anyhow::Result<()> {
//! let config: ToolConfig = parse_config(Path::new("featurescript.toml"))?;
//! println!("Catalog: {:?}", config.catalog);
//! # Ok(())
//! # }
//! ```
//!
//! Errors carry the file path as context with the read or TOML error as cause:
//!
//! ```text
//! Failed to parse config file: /path/to/config.toml
//! Caused by:
//!     unknown field `catalgo`, expected one of `catalog`, `output`, ...
//! ```

use anyhow::{Context, Result};
use std::path::Path;

/// Parse a TOML configuration file into `T`.
///
/// # Errors
///
/// Returns an error if the file cannot be read or does not deserialize into `T`.
pub fn parse_config<T>(path: &Path) -> Result<T>
where
    T: serde::de::DeserializeOwned,
{
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;

    let config: T = toml::from_str(&content)
        .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

    Ok(config)
}

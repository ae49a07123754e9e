//! Home directory lookup and user path expansion.

use anyhow::{Context, Result};
use std::path::PathBuf;

/// The current user's home directory.
pub fn get_home_dir() -> Result<PathBuf> {
    dirs::home_dir().ok_or_else(|| {
        anyhow::anyhow!(
            "Could not determine home directory.\n\n\
             Check that the HOME environment variable is set"
        )
    })
}

/// Expand a leading `~/` and `$VAR`/`${VAR}` references in `path`.
///
/// # Examples
///
/// ```rust,no_run
/// use featurescript::utils::resolve_path;
///
/// let catalog = resolve_path("~/catalogs/wildfly").unwrap();
/// assert!(catalog.is_absolute());
/// ```
pub fn resolve_path(path: &str) -> Result<PathBuf> {
    let expanded = if let Some(stripped) = path.strip_prefix("~/") {
        get_home_dir()?.join(stripped)
    } else if path == "~" {
        get_home_dir()?
    } else if path.starts_with('~') {
        return Err(anyhow::anyhow!(
            "Invalid path: {path}\n\n\
             Tilde expansion only supports '~/' for home directory."
        ));
    } else {
        PathBuf::from(path)
    };

    let path_str = expanded.to_string_lossy();
    let expanded = shellexpand::env(&path_str).with_context(|| {
        format!(
            "Failed to expand environment variables in path: {path_str}\n\n\
             Common issues:\n\
             - Undefined environment variable (e.g., $UNDEFINED_VAR)\n\
             - Invalid variable syntax (use $VAR or ${{VAR}})"
        )
    })?;
    Ok(PathBuf::from(expanded.into_owned()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_plain_path() {
        assert_eq!(resolve_path("catalog/specs").unwrap(), PathBuf::from("catalog/specs"));
    }

    #[test]
    fn test_resolve_home() {
        let home = get_home_dir().unwrap();
        assert_eq!(resolve_path("~/specs").unwrap(), home.join("specs"));
        assert_eq!(resolve_path("~").unwrap(), home);
    }

    #[test]
    fn test_resolve_rejects_user_tilde() {
        assert!(resolve_path("~other/specs").is_err());
    }

    #[test]
    fn test_resolve_undefined_variable() {
        let err = resolve_path("$FEATURESCRIPT_SURELY_UNDEFINED_VAR/x").unwrap_err();
        assert!(err.to_string().contains("Failed to expand"));
    }
}

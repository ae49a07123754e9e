//! Configuration tree model
//!
//! The resolver never sees a serialization format. It walks a [`ConfigValue`]
//! tree, a tagged variant of scalars, lists of scalars, nested mappings and
//! absent values. [`ConfigDocument`] is the thin front door that turns a YAML
//! document into that tree and strips the single top-level key every
//! installation document is rooted at.

use std::collections::BTreeMap;
use std::fmt;
use std::path::Path;

use anyhow::Context;

use crate::core::{FeatureScriptError, Result};

/// A node of the installation configuration tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigValue {
    /// A single value. Numbers and booleans are kept in their textual form.
    Scalar(String),
    /// A list of scalar values.
    List(Vec<String>),
    /// Nested keys. Sorted, so walking the tree is deterministic.
    Mapping(BTreeMap<String, ConfigValue>),
    /// A key present without a value (`key: ~` or `key:`).
    Absent,
}

impl ConfigValue {
    /// Build a scalar from anything string-like.
    pub fn scalar(value: impl Into<String>) -> Self {
        Self::Scalar(value.into())
    }

    /// Build a list from string-like items.
    pub fn list<I, S>(items: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::List(items.into_iter().map(Into::into).collect())
    }

    /// Build a mapping from `(key, value)` pairs.
    pub fn mapping<I, K>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, ConfigValue)>,
        K: Into<String>,
    {
        Self::Mapping(entries.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }

    /// Short name of the variant, used in error messages.
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Scalar(_) => "scalar",
            Self::List(_) => "list",
            Self::Mapping(_) => "mapping",
            Self::Absent => "undefined value",
        }
    }

    /// Convert a YAML value, reporting the dotted path of unsupported nodes.
    pub fn from_yaml(value: &serde_yaml::Value, path: &str) -> Result<Self> {
        use serde_yaml::Value;

        match value {
            Value::Null => Ok(Self::Absent),
            Value::Sequence(items) => items
                .iter()
                .map(|item| {
                    yaml_scalar(item).ok_or_else(|| FeatureScriptError::ConfigParse {
                        file: path.to_string(),
                        reason: "lists may only contain scalar values".to_string(),
                    })
                })
                .collect::<Result<Vec<_>>>()
                .map(Self::List),
            Value::Mapping(map) => {
                let mut entries = BTreeMap::new();
                for (key, child) in map {
                    let key = yaml_scalar(key).ok_or_else(|| FeatureScriptError::ConfigParse {
                        file: path.to_string(),
                        reason: "mapping keys must be scalars".to_string(),
                    })?;
                    let child_path = join_path(path, &key);
                    let child = Self::from_yaml(child, &child_path)?;
                    entries.insert(key, child);
                }
                Ok(Self::Mapping(entries))
            }
            Value::Tagged(tagged) => Self::from_yaml(&tagged.value, path),
            other => yaml_scalar(other).map(Self::Scalar).ok_or_else(|| {
                FeatureScriptError::ConfigParse {
                    file: path.to_string(),
                    reason: "unsupported value".to_string(),
                }
            }),
        }
    }
}

impl fmt::Display for ConfigValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Scalar(value) => write!(f, "{value}"),
            Self::List(items) => write!(f, "[{}]", items.join(",")),
            Self::Mapping(entries) => {
                let parts: Vec<String> = entries.iter().map(|(k, v)| format!("{k}={v}")).collect();
                write!(f, "{{{}}}", parts.join(","))
            }
            Self::Absent => write!(f, "undefined"),
        }
    }
}

fn yaml_scalar(value: &serde_yaml::Value) -> Option<String> {
    use serde_yaml::Value;

    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Tagged(tagged) => yaml_scalar(&tagged.value),
        _ => None,
    }
}

/// Join a dotted path prefix with a key. An empty prefix yields the key.
pub fn join_path(prefix: &str, key: &str) -> String {
    if prefix.is_empty() {
        key.to_string()
    } else {
        format!("{prefix}.{key}")
    }
}

/// An installation configuration document with its root key removed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigDocument {
    /// Name of the skipped top-level key
    pub root_key: String,
    /// The tree below the root key
    pub tree: ConfigValue,
}

impl ConfigDocument {
    /// Parse a YAML document rooted at a single top-level key.
    pub fn from_yaml_str(content: &str) -> Result<Self> {
        let value: serde_yaml::Value = serde_yaml::from_str(content)?;
        Self::from_yaml_value(&value, "<memory>")
    }

    /// Load and parse a YAML document from disk.
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read configuration file: {}", path.display()))?;
        let value: serde_yaml::Value = serde_yaml::from_str(&content)
            .map_err(FeatureScriptError::from)
            .with_context(|| format!("Failed to parse configuration file: {}", path.display()))?;
        Ok(Self::from_yaml_value(&value, &path.display().to_string())?)
    }

    fn from_yaml_value(value: &serde_yaml::Value, file: &str) -> Result<Self> {
        let serde_yaml::Value::Mapping(map) = value else {
            return Err(FeatureScriptError::ConfigParse {
                file: file.to_string(),
                reason: "the document must be a mapping".to_string(),
            });
        };
        let mut entries = map.iter();
        let (key, child) = match (entries.next(), entries.next()) {
            (Some(entry), None) => entry,
            _ => {
                return Err(FeatureScriptError::ConfigParse {
                    file: file.to_string(),
                    reason: format!("expected a single top-level key, found {}", map.len()),
                });
            }
        };
        let root_key = yaml_scalar(key).ok_or_else(|| FeatureScriptError::ConfigParse {
            file: file.to_string(),
            reason: "the top-level key must be a scalar".to_string(),
        })?;
        let tree = ConfigValue::from_yaml(child, "")?;
        Ok(Self {
            root_key,
            tree,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_document_skips_root_key() {
        let doc = ConfigDocument::from_yaml_str(
            r#"
wildfly:
  subsystem:
    logging:
      level: 3
      enabled: true
      handlers: [A, B]
      extra: ~
"#,
        )
        .unwrap();
        assert_eq!(doc.root_key, "wildfly");

        let expected = ConfigValue::mapping([(
            "subsystem",
            ConfigValue::mapping([(
                "logging",
                ConfigValue::mapping([
                    ("level", ConfigValue::scalar("3")),
                    ("enabled", ConfigValue::scalar("true")),
                    ("handlers", ConfigValue::list(["A", "B"])),
                    ("extra", ConfigValue::Absent),
                ]),
            )]),
        )]);
        assert_eq!(doc.tree, expected);
    }

    #[test]
    fn test_document_requires_single_root() {
        let err = ConfigDocument::from_yaml_str("a: 1\nb: 2\n").unwrap_err();
        assert!(matches!(err, FeatureScriptError::ConfigParse { .. }));

        let err = ConfigDocument::from_yaml_str("- a\n- b\n").unwrap_err();
        assert!(matches!(err, FeatureScriptError::ConfigParse { .. }));
    }

    #[test]
    fn test_list_of_maps_rejected_with_path() {
        let err = ConfigDocument::from_yaml_str("root:\n  a:\n    b:\n      - x: 1\n").unwrap_err();
        match err {
            FeatureScriptError::ConfigParse {
                file,
                ..
            } => assert_eq!(file, "a.b"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_display_renders_nested_values() {
        let value = ConfigValue::mapping([
            ("a", ConfigValue::scalar("1")),
            ("b", ConfigValue::list(["x", "y"])),
        ]);
        assert_eq!(value.to_string(), "{a=1,b=[x,y]}");
    }
}

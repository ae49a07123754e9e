//! Feature spec catalog.
//!
//! The catalog maps dotted spec names to [`FeatureSpec`]s. It is read once from a
//! directory of record files (see [`record`]) and never mutated afterwards;
//! specs are shared with resolved features through [`Arc`].

pub mod record;
pub mod spec;

use std::collections::BTreeMap;
use std::path::Path;
use std::sync::Arc;

use strsim::levenshtein;
use tracing::debug;
use walkdir::WalkDir;

use crate::core::{FeatureScriptError, Result};

pub use spec::{FeatureParameterSpec, FeatureSpec, FeatureSpecBuilder, UNDEFINED_DEFAULT};

/// Record file extension inside a catalog directory.
pub const RECORD_EXTENSION: &str = "toml";

/// Maximum edit distance, as a percentage of the name length, for suggestions.
const SIMILARITY_THRESHOLD_PERCENT: usize = 40;

/// Immutable mapping from spec name to [`FeatureSpec`].
#[derive(Debug, Clone, Default)]
pub struct SpecCatalog {
    specs: BTreeMap<String, Arc<FeatureSpec>>,
}

impl SpecCatalog {
    /// Load every `*.toml` record below `dir`.
    pub fn load(dir: &Path) -> Result<Self> {
        if !dir.is_dir() {
            return Err(FeatureScriptError::catalog(
                dir.display().to_string(),
                "catalog directory does not exist",
            ));
        }

        let mut specs = Vec::new();
        for entry in WalkDir::new(dir).follow_links(true).sort_by_file_name() {
            let entry = entry.map_err(|e| {
                FeatureScriptError::catalog(dir.display().to_string(), e.to_string())
            })?;
            let path = entry.path();
            if !entry.file_type().is_file()
                || path.extension().and_then(|e| e.to_str()) != Some(RECORD_EXTENSION)
            {
                continue;
            }
            specs.push(record::load_record(path)?);
        }

        let catalog = Self::from_specs(specs)?;
        debug!("Loaded {} feature specs from {}", catalog.len(), dir.display());
        Ok(catalog)
    }

    /// Build a catalog from already constructed specs.
    pub fn from_specs(specs: impl IntoIterator<Item = FeatureSpec>) -> Result<Self> {
        let mut map = BTreeMap::new();
        for spec in specs {
            let name = spec.name.clone();
            if map.insert(name.clone(), Arc::new(spec)).is_some() {
                return Err(FeatureScriptError::catalog(name, "spec is declared more than once"));
            }
        }
        Ok(Self {
            specs: map,
        })
    }

    /// Look up a spec by dotted name.
    pub fn get(&self, name: &str) -> Option<&Arc<FeatureSpec>> {
        self.specs.get(name)
    }

    /// Whether a spec named `name` exists.
    pub fn contains(&self, name: &str) -> bool {
        self.specs.contains_key(name)
    }

    /// Number of specs.
    pub fn len(&self) -> usize {
        self.specs.len()
    }

    /// Whether the catalog holds no specs.
    pub fn is_empty(&self) -> bool {
        self.specs.is_empty()
    }

    /// Specs in name order.
    pub fn iter(&self) -> impl Iterator<Item = &Arc<FeatureSpec>> {
        self.specs.values()
    }

    /// Up to three spec names close to `name`, closest first.
    pub fn suggest(&self, name: &str) -> Vec<String> {
        let limit = name.len() * SIMILARITY_THRESHOLD_PERCENT / 100;
        let mut scored: Vec<(usize, &String)> =
            self.specs.keys().map(|candidate| (levenshtein(name, candidate), candidate)).collect();
        scored.sort();
        scored.into_iter().filter(|(d, _)| *d <= limit).take(3).map(|(_, n)| n.clone()).collect()
    }
}

//! Configuration tree resolution.
//!
//! The [`PathResolver`] walks a nested configuration tree and matches every
//! node against dotted spec names in the [`SpecCatalog`]. Mapping keys either
//! extend the spec path (`subsystem` → `subsystem.logging`), name a concrete
//! instance of a parameterized spec (`console-handler` → `CONSOLE`), or are
//! attributes of an already resolved feature.
//!
//! # Identifier accumulation
//!
//! A spec such as `subsystem.logging.console-handler` declares identifier
//! parameters. When the walker reaches the spec path with too few identifier
//! values to fill them, each key of the current mapping is taken as the next
//! value and the walk continues one level deeper with the same spec path:
//!
//! ```text
//! subsystem:                      path subsystem           ids []
//!   logging:                      path subsystem.logging   ids []
//!     console-handler:            path ...console-handler  ids []      (not yet)
//!       CONSOLE:                  path ...console-handler  ids [CONSOLE] (resolved)
//!         level: INFO             attribute of CONSOLE
//! ```
//!
//! Each recursive call receives its own extended copy of the identifier list.
//!
//! # Ordering
//!
//! [`PathResolver::resolve`] returns features in discovery order (parents
//! before their nested sub-features). [`DependencyOrderer`] then places them
//! so that capability providers and referenced specs come first.

pub mod feature;
pub mod ordering;


use std::collections::{BTreeMap, HashSet};
use std::sync::Arc;

use tracing::debug;

use crate::catalog::{FeatureSpec, SpecCatalog};
use crate::core::{FeatureScriptError, Result};
use crate::models::{ConfigValue, join_path};

pub use feature::{Address, IdBinding, ResolvedFeature};
pub use ordering::DependencyOrderer;

/// Walks a configuration tree against a spec catalog.
#[derive(Debug, Clone, Copy)]
pub struct PathResolver<'a> {
    catalog: &'a SpecCatalog,
}

impl<'a> PathResolver<'a> {
    /// Create a resolver over `catalog`.
    pub fn new(catalog: &'a SpecCatalog) -> Self {
        Self {
            catalog,
        }
    }

    /// Resolve every feature declared in `root`.
    ///
    /// `root` is the tree below the skipped top-level key. The result is in
    /// discovery order and contains no two features with the same resolved path.
    ///
    /// # Errors
    ///
    /// - [`FeatureScriptError::InvalidPath`] when the tree does not match the catalog
    /// - [`FeatureScriptError::DuplicateDeclaration`] when a resolved path repeats
    pub fn resolve(&self, root: &ConfigValue) -> Result<Vec<ResolvedFeature>> {
        self.resolve_all(std::slice::from_ref(root))
    }

    /// Resolve several trees as one configuration.
    ///
    /// Features keep the order of `roots`. A feature declared by more than one
    /// tree is a [`FeatureScriptError::DuplicateDeclaration`].
    pub fn resolve_all(&self, roots: &[ConfigValue]) -> Result<Vec<ResolvedFeature>> {
        let mut features = Vec::new();
        for root in roots {
            match root {
                ConfigValue::Mapping(_) | ConfigValue::Absent => {
                    features.extend(self.walk("", &Address::root(), root, &[], "")?);
                }
                other => {
                    return Err(FeatureScriptError::invalid_path(
                        "<root>",
                        format!("expected a mapping below the root key, found a {}", other.kind()),
                    ));
                }
            }
        }

        ensure_unique_paths(&features)?;
        debug!("Resolved {} features from {} trees", features.len(), roots.len());
        Ok(features)
    }

    fn walk(
        &self,
        path: &str,
        address: &Address,
        value: &ConfigValue,
        ids: &[String],
        resolved_path: &str,
    ) -> Result<Vec<ResolvedFeature>> {
        let Some(spec) = self.catalog.get(path) else {
            return self.walk_unknown(path, address, value, ids, resolved_path);
        };

        match value {
            ConfigValue::Absent => {
                if spec.op.is_none() {
                    debug!("Skipping reference-only feature {resolved_path}");
                    return Ok(Vec::new());
                }
                let Some(binding) = try_resolve(spec, ids, resolved_path)? else {
                    return Err(FeatureScriptError::invalid_path(
                        resolved_path,
                        format!("{} needs identifier values that are not present", spec.name),
                    ));
                };
                self.build_feature(spec, binding, address, ids, resolved_path, &BTreeMap::new())
            }
            ConfigValue::Mapping(entries) => match try_resolve(spec, ids, resolved_path)? {
                Some(binding) => {
                    self.build_feature(spec, binding, address, ids, resolved_path, entries)
                }
                None => {
                    let mut features = Vec::new();
                    for (key, child) in entries {
                        let mut next_ids = ids.to_vec();
                        next_ids.push(key.clone());
                        features.extend(self.walk(
                            path,
                            address,
                            child,
                            &next_ids,
                            &join_path(resolved_path, key),
                        )?);
                    }
                    Ok(features)
                }
            },
            ConfigValue::Scalar(_) | ConfigValue::List(_) => Err(FeatureScriptError::invalid_path(
                resolved_path,
                format!("{} is a feature and cannot be assigned a {}", spec.name, value.kind()),
            )),
        }
    }

    fn walk_unknown(
        &self,
        path: &str,
        address: &Address,
        value: &ConfigValue,
        ids: &[String],
        resolved_path: &str,
    ) -> Result<Vec<ResolvedFeature>> {
        match value {
            ConfigValue::Absent => Ok(Vec::new()),
            ConfigValue::Mapping(entries) => {
                let mut features = Vec::new();
                for (key, child) in entries {
                    features.extend(self.walk(
                        &join_path(path, key),
                        address,
                        child,
                        ids,
                        &join_path(resolved_path, key),
                    )?);
                }
                Ok(features)
            }
            ConfigValue::Scalar(_) | ConfigValue::List(_) => {
                Err(self.invalid_element(path, resolved_path))
            }
        }
    }

    fn build_feature(
        &self,
        spec: &Arc<FeatureSpec>,
        binding: IdBinding,
        parent: &Address,
        ids: &[String],
        resolved_path: &str,
        attributes: &BTreeMap<String, ConfigValue>,
    ) -> Result<Vec<ResolvedFeature>> {
        let address = parent.extend_with(&binding.address_pairs(spec));
        let (feature, undeclared) = ResolvedFeature::build(
            Arc::clone(spec),
            binding,
            resolved_path,
            address,
            self.catalog,
            attributes,
        )?;
        debug!("Resolved {} as {} at {}", resolved_path, spec.name, feature.address());

        let address = feature.address().clone();
        let mut features = vec![feature];
        for (key, child) in undeclared {
            features.extend(self.walk(
                &join_path(&spec.name, key),
                &address,
                child,
                ids,
                &join_path(resolved_path, key),
            )?);
        }
        Ok(features)
    }

    fn invalid_element(&self, path: &str, resolved_path: &str) -> FeatureScriptError {
        let (parent, element) = resolved_path.rsplit_once('.').unwrap_or(("<root>", resolved_path));
        let mut reason = format!("Invalid element {element} for {parent}");
        let suggestions = self.catalog.suggest(path);
        if !suggestions.is_empty() {
            reason.push_str(&format!(" (did you mean {}?)", suggestions.join(", ")));
        }
        FeatureScriptError::invalid_path(resolved_path, reason)
    }
}

/// Match `ids` against the identifier positions of `spec`.
///
/// Returns the bound identifiers when the implied resolved path equals
/// `candidate`, `None` when more values are needed or the values do not line
/// up with the candidate path.
///
/// # Errors
///
/// Returns [`FeatureScriptError::InvalidPath`] when a segment following an id
/// parameter with a fixed default does not equal that default.
pub fn try_resolve(
    spec: &FeatureSpec,
    ids: &[String],
    candidate: &str,
) -> Result<Option<IdBinding>> {
    let segments: Vec<&str> = spec.segments().collect();
    let mut values = ids.iter();
    let mut implied: Vec<&str> = Vec::with_capacity(segments.len() + ids.len());
    let mut binding = IdBinding::default();
    let mut named = HashSet::new();

    let mut index = 0;
    while index < segments.len() {
        let segment = segments[index];
        implied.push(segment);
        index += 1;

        let Some(param) = spec.param(segment).filter(|p| p.is_id && !p.is_undefined()) else {
            continue;
        };
        named.insert(segment);
        match &param.default_value {
            Some(default) => {
                if segments.get(index) != Some(&default.as_str()) {
                    return Err(FeatureScriptError::invalid_path(
                        candidate,
                        format!("'{segment}' of {} must be followed by '{default}'", spec.name),
                    ));
                }
                implied.push(segments[index]);
                index += 1;
                binding.bind(segment, default);
            }
            None => match values.next() {
                Some(value) => {
                    implied.push(value.as_str());
                    binding.bind(segment, value);
                }
                None => return Ok(None),
            },
        }
    }

    for param in spec.id_param_specs() {
        if param.is_undefined() || named.contains(param.name.as_str()) {
            continue;
        }
        match &param.default_value {
            Some(default) => binding.bind(&param.name, default),
            None => match values.next() {
                Some(value) => {
                    implied.push(value.as_str());
                    binding.bind(&param.name, value);
                }
                None => return Ok(None),
            },
        }
    }

    if values.next().is_some() || implied.join(".") != candidate {
        return Ok(None);
    }
    Ok(Some(binding))
}

/// Fail on the first resolved path that occurs twice.
pub fn ensure_unique_paths(features: &[ResolvedFeature]) -> Result<()> {
    let mut seen = HashSet::new();
    for feature in features {
        if !seen.insert(feature.resolved_path()) {
            return Err(FeatureScriptError::DuplicateDeclaration {
                path: feature.resolved_path().to_string(),
            });
        }
    }
    Ok(())
}

/// Resolve `roots` as one configuration and order the result.
pub fn resolve_and_order(
    catalog: &SpecCatalog,
    roots: &[ConfigValue],
) -> Result<Vec<ResolvedFeature>> {
    let features = PathResolver::new(catalog).resolve_all(roots)?;
    DependencyOrderer::order(features)
}

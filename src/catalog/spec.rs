//! Feature spec types and their validating builder.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::LazyLock;

use regex::Regex;

use crate::capability::CapabilityTemplate;
use crate::core::{FeatureScriptError, Result};

/// Default value marking a parameter as intentionally undefined.
///
/// Parameters carrying it never take part in path matching or addressing.
pub const UNDEFINED_DEFAULT: &str = "GLN_UNDEFINED";

static SPEC_NAME: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9_*\-]+(\.[A-Za-z0-9_*\-]+)*$").ok());

/// One declared parameter of a [`FeatureSpec`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeatureParameterSpec {
    /// Parameter name
    pub name: String,
    /// Fixed default value, if any
    pub default_value: Option<String>,
    /// Whether the parameter contributes to the feature's resolved path
    pub is_id: bool,
}

impl FeatureParameterSpec {
    /// A plain attribute parameter.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            default_value: None,
            is_id: false,
        }
    }

    /// An identifier parameter.
    pub fn id(name: impl Into<String>) -> Self {
        Self {
            is_id: true,
            ..Self::new(name)
        }
    }

    /// Attach a default value.
    #[must_use]
    pub fn with_default(mut self, default: impl Into<String>) -> Self {
        self.default_value = Some(default.into());
        self
    }

    /// True when the default is the undefined sentinel.
    pub fn is_undefined(&self) -> bool {
        self.default_value.as_deref() == Some(UNDEFINED_DEFAULT)
    }
}

/// A reusable feature specification loaded from the catalog.
///
/// Capability sets hold unresolved templates; they are expanded per resolved
/// feature by [`crate::capability`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeatureSpec {
    /// Dotted catalog key
    pub name: String,
    /// Creation operation. `None` means the feature can only be referenced.
    pub op: Option<String>,
    /// Parameters passed to the creation operation
    pub op_params: Vec<String>,
    /// Parameters forming the resource address, in address order
    pub addr_params: Vec<String>,
    /// Declared parameters by name
    pub params: BTreeMap<String, FeatureParameterSpec>,
    /// Identifier parameter names in declaration order
    pub id_params: Vec<String>,
    /// Provided capability templates
    pub provided_capabilities: BTreeSet<String>,
    /// Required capability templates
    pub required_capabilities: BTreeSet<String>,
    /// Spec names this spec implicitly depends on
    pub feature_refs: BTreeSet<String>,
    /// Opaque grouping tag
    pub branch: Option<String>,
}

impl FeatureSpec {
    /// Start building a spec named `name`.
    pub fn builder(name: impl Into<String>) -> FeatureSpecBuilder {
        FeatureSpecBuilder::new(name)
    }

    /// Look up a declared parameter.
    pub fn param(&self, name: &str) -> Option<&FeatureParameterSpec> {
        self.params.get(name)
    }

    /// Identifier parameters in declaration order.
    pub fn id_param_specs(&self) -> impl Iterator<Item = &FeatureParameterSpec> {
        self.id_params.iter().filter_map(|name| self.params.get(name))
    }

    /// Whether `name` is passed to the creation operation.
    pub fn is_op_param(&self, name: &str) -> bool {
        self.op_params.iter().any(|p| p == name)
    }

    /// Segments of the dotted spec name.
    pub fn segments(&self) -> impl Iterator<Item = &str> {
        self.name.split('.')
    }
}

/// Builder that validates a [`FeatureSpec`] the same way the catalog loader does.
#[derive(Debug, Clone, Default)]
pub struct FeatureSpecBuilder {
    name: String,
    op: Option<String>,
    op_params: Vec<String>,
    addr_params: Vec<String>,
    params: Vec<FeatureParameterSpec>,
    refs: Vec<String>,
    required: Vec<String>,
    provided: Vec<String>,
    branch: Option<String>,
}

impl FeatureSpecBuilder {
    fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Set the creation operation.
    #[must_use]
    pub fn op(mut self, op: impl Into<String>) -> Self {
        self.op = Some(op.into());
        self
    }

    /// Declare the creation operation's parameters.
    #[must_use]
    pub fn op_params<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.op_params.extend(names.into_iter().map(Into::into));
        self
    }

    /// Declare the address parameters.
    #[must_use]
    pub fn addr_params<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.addr_params.extend(names.into_iter().map(Into::into));
        self
    }

    /// Declare a parameter.
    #[must_use]
    pub fn param(mut self, param: FeatureParameterSpec) -> Self {
        self.params.push(param);
        self
    }

    /// Declare several plain parameters.
    #[must_use]
    pub fn params<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.params.extend(names.into_iter().map(FeatureParameterSpec::new));
        self
    }

    /// Add feature references.
    #[must_use]
    pub fn refs<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.refs.extend(names.into_iter().map(Into::into));
        self
    }

    /// Add required capability templates.
    #[must_use]
    pub fn requires<I, S>(mut self, templates: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.required.extend(templates.into_iter().map(Into::into));
        self
    }

    /// Add provided capability templates.
    #[must_use]
    pub fn provides<I, S>(mut self, templates: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.provided.extend(templates.into_iter().map(Into::into));
        self
    }

    /// Set the grouping tag.
    #[must_use]
    pub fn branch(mut self, branch: impl Into<String>) -> Self {
        self.branch = Some(branch.into());
        self
    }

    /// Validate and build the spec.
    pub fn build(self) -> Result<FeatureSpec> {
        let fail = |reason: String| FeatureScriptError::catalog(self.name.clone(), reason);

        if !SPEC_NAME.as_ref().is_some_and(|re| re.is_match(&self.name)) {
            return Err(fail(format!("'{}' is not a valid dotted spec name", self.name)));
        }

        let mut params = BTreeMap::new();
        let mut id_params = Vec::new();
        for param in &self.params {
            if param.name.is_empty() {
                return Err(fail("parameter names must not be empty".to_string()));
            }
            if param.is_id {
                id_params.push(param.name.clone());
            }
            if params.insert(param.name.clone(), param.clone()).is_some() {
                return Err(fail(format!("parameter '{}' is declared twice", param.name)));
            }
        }

        for (field, names) in [("op-params", &self.op_params), ("addr-params", &self.addr_params)] {
            if let Some(unknown) = names.iter().find(|n| !params.contains_key(n.as_str())) {
                return Err(fail(format!("{field} references undeclared parameter '{unknown}'")));
            }
        }

        for template in self.required.iter().chain(&self.provided) {
            CapabilityTemplate::parse(template).map_err(fail)?;
        }

        let segments: Vec<&str> = self.name.split('.').collect();
        for (i, segment) in segments.iter().enumerate() {
            let Some(param) = params.get(*segment) else {
                continue;
            };
            if !param.is_id || param.is_undefined() {
                continue;
            }
            if let Some(default) = &param.default_value {
                if segments.get(i + 1) != Some(&default.as_str()) {
                    return Err(fail(format!(
                        "id parameter '{}' defaults to '{default}' but the spec name does not \
                         continue with it",
                        param.name
                    )));
                }
            }
        }

        Ok(FeatureSpec {
            name: self.name,
            op: self.op,
            op_params: self.op_params,
            addr_params: self.addr_params,
            params,
            id_params,
            provided_capabilities: self.provided.into_iter().collect(),
            required_capabilities: self.required.into_iter().collect(),
            feature_refs: self.refs.into_iter().collect(),
            branch: self.branch,
        })
    }
}

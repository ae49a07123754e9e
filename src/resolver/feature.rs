//! Resolved features and the commands they emit.
//!
//! A [`ResolvedFeature`] is one concrete instance of a [`FeatureSpec`]: the spec
//! plus the identifier values that locate it in the configuration tree, the
//! attributes declared for it, its expanded capabilities and the management
//! commands that create or update it.
//!
//! The emitted block is idempotent. Creation is guarded by an existence probe,
//! so replaying the block against a target that already has the resource skips
//! the create call and only applies the attribute writes:
//!
//! ```text
//! if (outcome != success) of /subsystem=logging/console-handler=CONSOLE:read-resource
//! /subsystem=logging/console-handler=CONSOLE:add(level=INFO)
//! end-if
//! /subsystem=logging/console-handler=CONSOLE:write-attribute(name=autoflush,value=true)
//! ```

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::sync::Arc;

use tracing::debug;

use crate::capability::{self, ValueContext};
use crate::catalog::{FeatureSpec, SpecCatalog};
use crate::core::{FeatureScriptError, Result};
use crate::models::{ConfigValue, join_path};

/// Characters that force a value to be quoted in a command.
const QUOTE_TRIGGERS: &[char] = &[',', '=', '(', ')', '{', '}', '[', ']', '"'];

/// Resource locator made of `key=value` pairs, rendered `/k1=v1/k2=v2`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Address {
    pairs: Vec<(String, String)>,
}

impl Address {
    /// The root address, rendered `/`.
    pub fn root() -> Self {
        Self::default()
    }

    /// Extend `self` with the pairs whose keys it does not already contain.
    #[must_use]
    pub fn extend_with(&self, pairs: &[(String, String)]) -> Self {
        let mut extended = self.clone();
        for (key, value) in pairs {
            if !extended.pairs.iter().any(|(k, _)| k == key) {
                extended.pairs.push((key.clone(), value.clone()));
            }
        }
        extended
    }

    /// The `(key, value)` pairs in order.
    pub fn pairs(&self) -> &[(String, String)] {
        &self.pairs
    }

    /// Whether this is the root address.
    pub fn is_root(&self) -> bool {
        self.pairs.is_empty()
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_root() {
            return f.write_str("/");
        }
        for (key, value) in &self.pairs {
            write!(f, "/{key}={}", quote_value(value))?;
        }
        Ok(())
    }
}

/// Identifier values bound while matching a spec path.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IdBinding {
    /// Id parameter name to value
    pub ids: BTreeMap<String, String>,
    /// Bound pairs in the order they were matched
    pub order: Vec<(String, String)>,
}

impl IdBinding {
    /// Record a bound id value.
    pub fn bind(&mut self, name: &str, value: &str) {
        self.ids.insert(name.to_string(), value.to_string());
        self.order.push((name.to_string(), value.to_string()));
    }

    /// Address pairs for `spec`: its address parameters when declared,
    /// otherwise the bound ids in match order.
    pub fn address_pairs(&self, spec: &FeatureSpec) -> Vec<(String, String)> {
        if spec.addr_params.is_empty() {
            return self.order.clone();
        }
        spec.addr_params
            .iter()
            .filter_map(|name| {
                let value = self.ids.get(name).cloned().or_else(|| {
                    spec.param(name)
                        .filter(|p| !p.is_undefined())
                        .and_then(|p| p.default_value.clone())
                })?;
                Some((name.clone(), value))
            })
            .collect()
    }
}

/// Quote a value when it contains whitespace or command syntax characters.
pub fn quote_value(value: &str) -> String {
    if value.is_empty() || value.chars().any(|c| c.is_whitespace() || QUOTE_TRIGGERS.contains(&c))
    {
        format!("\"{}\"", value.replace('\\', "\\\\").replace('"', "\\\""))
    } else {
        value.to_string()
    }
}

/// Render a configuration value in command syntax.
pub fn render_value(value: &ConfigValue) -> String {
    match value {
        ConfigValue::Scalar(s) => quote_value(s),
        ConfigValue::List(items) => {
            format!("[{}]", items.iter().map(|i| quote_value(i)).collect::<Vec<_>>().join(","))
        }
        ConfigValue::Mapping(entries) => format!(
            "{{{}}}",
            entries
                .iter()
                .map(|(k, v)| format!("{k}={}", render_value(v)))
                .collect::<Vec<_>>()
                .join(",")
        ),
        ConfigValue::Absent => "undefined".to_string(),
    }
}

/// One concrete instance of a feature spec.
#[derive(Debug, Clone)]
pub struct ResolvedFeature {
    spec: Arc<FeatureSpec>,
    resolved_ids: BTreeMap<String, String>,
    resolved_path: String,
    address: Address,
    args: BTreeMap<String, ConfigValue>,
    add_arguments: Vec<(String, String)>,
    write_attributes: Vec<(String, String)>,
    list_add: Vec<(String, String)>,
    undefine_attributes: Vec<String>,
    complex: Vec<ResolvedFeature>,
    required_capabilities: BTreeSet<String>,
    provided_capabilities: BTreeSet<String>,
    dropped_capabilities: Vec<String>,
    commands: Vec<String>,
}

impl ResolvedFeature {
    /// Create a feature with no attributes yet.
    pub fn new(
        spec: Arc<FeatureSpec>,
        resolved_ids: BTreeMap<String, String>,
        resolved_path: impl Into<String>,
        address: Address,
    ) -> Self {
        Self {
            spec,
            resolved_ids,
            resolved_path: resolved_path.into(),
            address,
            args: BTreeMap::new(),
            add_arguments: Vec::new(),
            write_attributes: Vec::new(),
            list_add: Vec::new(),
            undefine_attributes: Vec::new(),
            complex: Vec::new(),
            required_capabilities: BTreeSet::new(),
            provided_capabilities: BTreeSet::new(),
            dropped_capabilities: Vec::new(),
            commands: Vec::new(),
        }
    }

    /// Build a complete feature from its attribute map.
    ///
    /// Runs attribute retrieval, capability expansion and command emission.
    /// Returns the feature together with the undeclared entries, which the
    /// caller walks as nested sub-features.
    pub fn build<'a>(
        spec: Arc<FeatureSpec>,
        binding: IdBinding,
        resolved_path: impl Into<String>,
        address: Address,
        catalog: &SpecCatalog,
        attributes: &'a BTreeMap<String, ConfigValue>,
    ) -> Result<(Self, Vec<(&'a str, &'a ConfigValue)>)> {
        let mut feature = Self::new(spec, binding.ids, resolved_path, address);
        let undeclared = feature.retrieve_params_and_attributes(catalog, attributes)?;
        feature.resolve_capabilities();
        feature.add_commands();
        Ok((feature, undeclared))
    }

    /// Partition `attributes` into declared parameters and undeclared entries.
    ///
    /// Declared parameters are staged as creation arguments (when named by the
    /// spec's operation parameters), attribute writes, list additions or
    /// undefines. A mapping value whose `<spec>.<attribute>` spec exists in the
    /// catalog also produces a complex child absorbing that spec's capabilities.
    pub fn retrieve_params_and_attributes<'a>(
        &mut self,
        catalog: &SpecCatalog,
        attributes: &'a BTreeMap<String, ConfigValue>,
    ) -> Result<Vec<(&'a str, &'a ConfigValue)>> {
        let mut undeclared = Vec::new();

        for (name, value) in attributes {
            let Some(param) = self.spec.param(name) else {
                undeclared.push((name.as_str(), value));
                continue;
            };
            if param.is_id {
                return Err(FeatureScriptError::invalid_path(
                    join_path(&self.resolved_path, name),
                    format!(
                        "'{name}' identifies {} and cannot be set as an attribute",
                        self.spec.name
                    ),
                ));
            }

            let is_op_param = self.spec.op.is_some() && self.spec.is_op_param(name);
            match value {
                ConfigValue::Scalar(_) | ConfigValue::Mapping(_) if is_op_param => {
                    self.add_arguments.push((name.clone(), render_value(value)));
                }
                ConfigValue::List(_) if is_op_param => {
                    self.add_arguments.push((name.clone(), render_value(value)));
                }
                ConfigValue::Scalar(_) | ConfigValue::Mapping(_) => {
                    self.write_attributes.push((name.clone(), render_value(value)));
                }
                ConfigValue::List(items) => {
                    self.list_add.extend(items.iter().map(|i| (name.clone(), quote_value(i))));
                }
                ConfigValue::Absent if is_op_param => {}
                ConfigValue::Absent => self.undefine_attributes.push(name.clone()),
            }

            if let ConfigValue::Mapping(nested) = value {
                let complex_name = join_path(&self.spec.name, name);
                if let Some(complex_spec) = catalog.get(&complex_name) {
                    self.complex.push(self.complex_child(
                        Arc::clone(complex_spec),
                        name,
                        catalog,
                        nested,
                    )?);
                }
            }
            self.args.insert(name.clone(), value.clone());
        }

        let spec = Arc::clone(&self.spec);
        self.add_arguments.sort_by_key(|(name, _)| spec.op_params.iter().position(|p| p == name));
        Ok(undeclared)
    }

    fn complex_child(
        &self,
        spec: Arc<FeatureSpec>,
        attribute: &str,
        catalog: &SpecCatalog,
        nested: &BTreeMap<String, ConfigValue>,
    ) -> Result<Self> {
        let path = join_path(&self.resolved_path, attribute);
        let mut child =
            Self::new(spec, self.resolved_ids.clone(), path.clone(), self.address.clone());
        let undeclared = child.retrieve_params_and_attributes(catalog, nested)?;
        if let Some((key, _)) = undeclared.first() {
            return Err(FeatureScriptError::invalid_path(
                join_path(&path, key),
                format!("Invalid element {key} for {path}"),
            ));
        }
        child.resolve_capabilities();
        Ok(child)
    }

    /// Values available to capability templates: ids overlaid by attributes.
    pub fn value_context(&self) -> ValueContext {
        let mut context: ValueContext = self
            .resolved_ids
            .iter()
            .map(|(k, v)| (k.clone(), ConfigValue::Scalar(v.clone())))
            .collect();
        context.extend(self.args.iter().map(|(k, v)| (k.clone(), v.clone())));
        context
    }

    /// Expand the spec's capability templates and fold in complex children.
    pub fn resolve_capabilities(&mut self) {
        let context = self.value_context();
        let spec = Arc::clone(&self.spec);

        for (templates, target) in [
            (&spec.required_capabilities, &mut self.required_capabilities),
            (&spec.provided_capabilities, &mut self.provided_capabilities),
        ] {
            for template in templates {
                match capability::expand(template, &context) {
                    Some(caps) => target.extend(caps),
                    None => {
                        debug!(
                            "Capability template '{}' not applicable to {}",
                            template, self.resolved_path
                        );
                        self.dropped_capabilities.push(template.clone());
                    }
                }
            }
        }

        for child in &self.complex {
            self.required_capabilities.extend(child.required_capabilities.iter().cloned());
            self.provided_capabilities.extend(child.provided_capabilities.iter().cloned());
            for template in &child.dropped_capabilities {
                if !self.dropped_capabilities.contains(template) {
                    self.dropped_capabilities.push(template.clone());
                }
            }
        }
    }

    /// Emit the conditional create block followed by the attribute commands.
    pub fn add_commands(&mut self) {
        let address = self.address.to_string();
        let mut commands = Vec::new();

        if let Some(op) = &self.spec.op {
            commands.push(format!("if (outcome != success) of {address}:read-resource"));
            if self.add_arguments.is_empty() {
                commands.push(format!("{address}:{op}"));
            } else {
                let args: Vec<String> =
                    self.add_arguments.iter().map(|(k, v)| format!("{k}={v}")).collect();
                commands.push(format!("{address}:{op}({})", args.join(",")));
            }
            commands.push("end-if".to_string());
        }
        for (name, value) in &self.write_attributes {
            commands.push(format!("{address}:write-attribute(name={name},value={value})"));
        }
        for (name, value) in &self.list_add {
            commands.push(format!("{address}:list-add(name={name},value={value})"));
        }
        for name in &self.undefine_attributes {
            commands.push(format!("{address}:undefine-attribute(name={name})"));
        }

        self.commands = commands;
    }

    /// The spec this feature instantiates.
    pub fn spec(&self) -> &Arc<FeatureSpec> {
        &self.spec
    }

    /// Identifier values by parameter name.
    pub fn resolved_ids(&self) -> &BTreeMap<String, String> {
        &self.resolved_ids
    }

    /// Dotted path identifying this instance in the configuration tree.
    pub fn resolved_path(&self) -> &str {
        &self.resolved_path
    }

    /// Resource address.
    pub fn address(&self) -> &Address {
        &self.address
    }

    /// Declared attributes with their raw values.
    pub fn args(&self) -> &BTreeMap<String, ConfigValue> {
        &self.args
    }

    /// Staged creation arguments.
    pub fn add_arguments(&self) -> &[(String, String)] {
        &self.add_arguments
    }

    /// Staged attribute writes.
    pub fn write_attributes(&self) -> &[(String, String)] {
        &self.write_attributes
    }

    /// Staged list additions.
    pub fn list_add(&self) -> &[(String, String)] {
        &self.list_add
    }

    /// Complex children embedded in attributes.
    pub fn complex(&self) -> &[ResolvedFeature] {
        &self.complex
    }

    /// Required capabilities, including those of complex children.
    pub fn required_capabilities(&self) -> &BTreeSet<String> {
        &self.required_capabilities
    }

    /// Provided capabilities, including those of complex children.
    pub fn provided_capabilities(&self) -> &BTreeSet<String> {
        &self.provided_capabilities
    }

    /// Capability templates that could not be substituted.
    pub fn dropped_capabilities(&self) -> &[String] {
        &self.dropped_capabilities
    }

    /// Emitted management commands.
    pub fn commands(&self) -> &[String] {
        &self.commands
    }
}

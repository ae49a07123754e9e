//! Dependency ordering of resolved features.
//!
//! Features are placed by repeated stable scans. A feature is placed once
//! nothing it waits on is still pending:
//!
//! 1. **Capabilities**: no required capability is provided by another
//!    not-yet-placed feature. Capabilities nobody provides are assumed to
//!    exist on the target already.
//! 2. **Feature references**: additionally, no spec the feature references
//!    still has not-yet-placed instances. This pass runs over the output of
//!    the first, so containers end up before the features nested under them.
//!
//! A scan that places nothing means the remaining features wait on each
//! other. The cycle is located with a depth-first search over a `petgraph`
//! graph of the stuck features and reported as
//! [`FeatureScriptError::CyclicDependency`].

use std::collections::HashMap;

use petgraph::graph::{DiGraph, NodeIndex};
use tracing::debug;

use super::ResolvedFeature;
use crate::core::{FeatureScriptError, Result};

/// Dependency relations considered by a placement pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Relation {
    Capabilities,
    CapabilitiesAndRefs,
}

/// Orders features so providers and referenced specs come first.
#[derive(Debug, Clone, Copy, Default)]
pub struct DependencyOrderer;

impl DependencyOrderer {
    /// Produce a total order of `features`.
    ///
    /// For every pair where one feature provides a capability the other
    /// requires, the provider is placed first. Among features that do not
    /// depend on each other the input order is kept.
    ///
    /// # Errors
    ///
    /// Returns [`FeatureScriptError::CyclicDependency`] when capabilities or
    /// feature references form a cycle.
    pub fn order(features: Vec<ResolvedFeature>) -> Result<Vec<ResolvedFeature>> {
        let by_capability = place(features, Relation::Capabilities)?;
        place(by_capability, Relation::CapabilitiesAndRefs)
    }
}

/// Providers and instances of not-yet-placed features.
#[derive(Debug, Default)]
struct Pending {
    capabilities: HashMap<String, usize>,
    specs: HashMap<String, usize>,
}

impl Pending {
    fn new(features: &[ResolvedFeature]) -> Self {
        let mut pending = Self::default();
        for feature in features {
            for capability in feature.provided_capabilities() {
                *pending.capabilities.entry(capability.clone()).or_default() += 1;
            }
            *pending.specs.entry(feature.spec().name.clone()).or_default() += 1;
        }
        pending
    }

    fn is_blocked(&self, feature: &ResolvedFeature, relation: Relation) -> bool {
        let waits_on_capability = feature.required_capabilities().iter().any(|capability| {
            let own = usize::from(feature.provided_capabilities().contains(capability));
            self.capabilities.get(capability).copied().unwrap_or(0) > own
        });
        if waits_on_capability || relation == Relation::Capabilities {
            return waits_on_capability;
        }

        let spec = feature.spec();
        spec.feature_refs.iter().any(|name| {
            let own = usize::from(*name == spec.name);
            self.specs.get(name).copied().unwrap_or(0) > own
        })
    }

    fn remove(&mut self, feature: &ResolvedFeature) {
        for capability in feature.provided_capabilities() {
            if let Some(count) = self.capabilities.get_mut(capability) {
                *count = count.saturating_sub(1);
            }
        }
        if let Some(count) = self.specs.get_mut(&feature.spec().name) {
            *count = count.saturating_sub(1);
        }
    }
}

fn place(features: Vec<ResolvedFeature>, relation: Relation) -> Result<Vec<ResolvedFeature>> {
    let mut pending = Pending::new(&features);
    let mut placed = Vec::with_capacity(features.len());
    let mut remaining = features;
    let mut scans = 0;

    while !remaining.is_empty() {
        scans += 1;
        let before = placed.len();
        let mut blocked = Vec::new();

        for feature in remaining {
            if pending.is_blocked(&feature, relation) {
                blocked.push(feature);
            } else {
                pending.remove(&feature);
                placed.push(feature);
            }
        }

        if placed.len() == before {
            return Err(cycle_error(&blocked, relation));
        }
        remaining = blocked;
    }

    debug!("Placed {} features in {} scans ({:?})", placed.len(), scans, relation);
    Ok(placed)
}

/// Whether `feature` waits on `other`.
fn waits_on(feature: &ResolvedFeature, other: &ResolvedFeature, relation: Relation) -> bool {
    if !feature.required_capabilities().is_disjoint(other.provided_capabilities()) {
        return true;
    }
    relation == Relation::CapabilitiesAndRefs
        && feature.spec().feature_refs.contains(&other.spec().name)
}

fn cycle_error(stuck: &[ResolvedFeature], relation: Relation) -> FeatureScriptError {
    let mut graph: DiGraph<usize, ()> = DiGraph::new();
    let nodes: Vec<NodeIndex> = (0..stuck.len()).map(|i| graph.add_node(i)).collect();
    for (i, feature) in stuck.iter().enumerate() {
        for (j, other) in stuck.iter().enumerate() {
            if i != j && waits_on(feature, other, relation) {
                graph.add_edge(nodes[i], nodes[j], ());
            }
        }
    }

    let chain = match find_cycle(&graph) {
        Some(cycle) => cycle
            .iter()
            .map(|&node| stuck[graph[node]].resolved_path())
            .collect::<Vec<_>>()
            .join(" → "),
        None => stuck.iter().map(ResolvedFeature::resolved_path).collect::<Vec<_>>().join(", "),
    };
    FeatureScriptError::CyclicDependency {
        chain,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Color {
    White,
    Gray,
    Black,
}

/// First cycle found by depth-first search, closed by repeating its start.
fn find_cycle(graph: &DiGraph<usize, ()>) -> Option<Vec<NodeIndex>> {
    let mut colors: HashMap<NodeIndex, Color> =
        graph.node_indices().map(|node| (node, Color::White)).collect();
    let mut path = Vec::new();

    for node in graph.node_indices() {
        if colors.get(&node) == Some(&Color::White)
            && let Some(cycle) = visit(graph, node, &mut colors, &mut path)
        {
            return Some(cycle);
        }
    }
    None
}

fn visit(
    graph: &DiGraph<usize, ()>,
    node: NodeIndex,
    colors: &mut HashMap<NodeIndex, Color>,
    path: &mut Vec<NodeIndex>,
) -> Option<Vec<NodeIndex>> {
    colors.insert(node, Color::Gray);
    path.push(node);

    for neighbor in graph.neighbors(node) {
        match colors.get(&neighbor) {
            Some(Color::Gray) => {
                let start = path.iter().position(|n| *n == neighbor)?;
                let mut cycle = path[start..].to_vec();
                cycle.push(neighbor);
                return Some(cycle);
            }
            Some(Color::White) => {
                if let Some(cycle) = visit(graph, neighbor, colors, path) {
                    return Some(cycle);
                }
            }
            _ => {}
        }
    }

    path.pop();
    colors.insert(node, Color::Black);
    None
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;
    use std::sync::Arc;

    use super::*;
    use crate::catalog::{FeatureParameterSpec, FeatureSpec, SpecCatalog};
    use crate::models::ConfigValue;
    use crate::resolver::{Address, IdBinding};

    fn feature(spec: FeatureSpec, path: &str, ids: &[(&str, &str)]) -> ResolvedFeature {
        let catalog = SpecCatalog::default();
        let attributes = BTreeMap::<String, ConfigValue>::new();
        let mut binding = IdBinding::default();
        for (name, value) in ids {
            binding.bind(name, value);
        }
        let (feature, _) = ResolvedFeature::build(
            Arc::new(spec),
            binding,
            path,
            Address::root(),
            &catalog,
            &attributes,
        )
        .unwrap();
        feature
    }

    fn paths(features: &[ResolvedFeature]) -> Vec<&str> {
        features.iter().map(ResolvedFeature::resolved_path).collect()
    }

    fn provider(name: &str, capability: &str) -> ResolvedFeature {
        let spec = FeatureSpec::builder(name).op("add").provides([capability]).build().unwrap();
        feature(spec, name, &[])
    }

    fn consumer(name: &str, capability: &str) -> ResolvedFeature {
        let spec = FeatureSpec::builder(name).op("add").requires([capability]).build().unwrap();
        feature(spec, name, &[])
    }

    #[test]
    fn test_provider_placed_before_requirer() {
        let a = feature(
            FeatureSpec::builder("a")
                .op("add")
                .param(FeatureParameterSpec::id("name"))
                .provides(["cap.$name"])
                .build()
                .unwrap(),
            "a.foo",
            &[("name", "foo")],
        );
        let b = consumer("b", "cap.foo");

        let ordered = DependencyOrderer::order(vec![b, a]).unwrap();
        assert_eq!(paths(&ordered), vec!["a.foo", "b"]);
    }

    #[test]
    fn test_unprovided_capability_does_not_block() {
        let ordered =
            DependencyOrderer::order(vec![consumer("b", "external.cap"), provider("a", "x")])
                .unwrap();
        assert_eq!(paths(&ordered), vec!["b", "a"]);
    }

    #[test]
    fn test_self_provided_capability_does_not_block() {
        let spec = FeatureSpec::builder("self").op("add").provides(["c"]).requires(["c"]).build();
        let ordered = DependencyOrderer::order(vec![feature(spec.unwrap(), "self", &[])]).unwrap();
        assert_eq!(paths(&ordered), vec!["self"]);
    }

    #[test]
    fn test_feature_refs_place_container_first() {
        let child = feature(
            FeatureSpec::builder("subsystem.logging.handler")
                .op("add")
                .refs(["subsystem.logging"])
                .build()
                .unwrap(),
            "subsystem.logging.handler",
            &[],
        );
        let container = feature(
            FeatureSpec::builder("subsystem.logging").op("add").build().unwrap(),
            "subsystem.logging",
            &[],
        );

        let ordered = DependencyOrderer::order(vec![child, container]).unwrap();
        assert_eq!(paths(&ordered), vec!["subsystem.logging", "subsystem.logging.handler"]);
    }

    #[test]
    fn test_stable_for_independent_features() {
        let ordered = DependencyOrderer::order(vec![
            provider("c", "c"),
            provider("a", "a"),
            provider("b", "b"),
        ])
        .unwrap();
        assert_eq!(paths(&ordered), vec!["c", "a", "b"]);
    }

    #[test]
    fn test_capability_cycle_detected() {
        let a = feature(
            FeatureSpec::builder("a").op("add").provides(["x"]).requires(["y"]).build().unwrap(),
            "a",
            &[],
        );
        let b = feature(
            FeatureSpec::builder("b").op("add").provides(["y"]).requires(["x"]).build().unwrap(),
            "b",
            &[],
        );

        let err = DependencyOrderer::order(vec![a, b, provider("free", "z")]).unwrap_err();
        match err {
            FeatureScriptError::CyclicDependency {
                chain,
            } => {
                assert!(chain.contains("a → b") || chain.contains("b → a"), "{chain}");
                assert!(!chain.contains("free"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_reference_cycle_detected() {
        let a = feature(FeatureSpec::builder("a").op("add").refs(["b"]).build().unwrap(), "a", &[]);
        let b = feature(FeatureSpec::builder("b").op("add").refs(["a"]).build().unwrap(), "b", &[]);
        let err = DependencyOrderer::order(vec![a, b]).unwrap_err();
        assert!(err.to_string().starts_with("Circular dependency detected"));
    }
}

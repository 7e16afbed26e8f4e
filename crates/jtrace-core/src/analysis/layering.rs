//! Layering analyzer and layer resolution.

use std::collections::{BTreeMap, HashSet};

use crate::dependency::has_dependency;
use crate::model::{ClassUnit, StructuralModel};
use crate::pattern::Pattern;
use crate::rules::{AllowedDependency, Layer, Rule};
use crate::types::{Location, Violation};

use super::class_violation;

/// Maps class FQNs to layer names.
///
/// Patterns are registered in layer declaration order. When two layers
/// declare the same pattern string the first registration wins. Overlapping
/// but distinct patterns resolve to whichever was registered first; no
/// specificity ordering is applied.
#[derive(Debug)]
pub struct LayerResolver<'r> {
    entries: Vec<(&'r Pattern, &'r str)>,
}

impl<'r> LayerResolver<'r> {
    /// Builds a resolver from layers.
    #[must_use]
    pub fn new(layers: &'r [Layer]) -> Self {
        let mut seen: HashSet<&str> = HashSet::new();
        let mut entries = Vec::new();
        for layer in layers {
            for pattern in &layer.packages {
                if seen.insert(pattern.as_str()) {
                    entries.push((pattern, layer.name.as_str()));
                }
            }
        }
        Self { entries }
    }

    /// Which layer does this class belong to?
    #[must_use]
    pub fn resolve(&self, fqn: &str) -> Option<&'r str> {
        self.entries
            .iter()
            .find(|(pattern, _)| pattern.matches(fqn))
            .map(|(_, layer)| *layer)
    }
}

pub(super) fn analyze(
    rule: &Rule,
    layers: &[Layer],
    allowed: &[AllowedDependency],
    forbid_cycles: bool,
    model: &StructuralModel,
) -> Vec<Violation> {
    let resolver = LayerResolver::new(layers);
    let permitted: HashSet<(&str, &str)> = allowed
        .iter()
        .map(|d| (d.from.as_str(), d.to.as_str()))
        .collect();

    // Classes outside every layer take no part in layering checks.
    let layered: Vec<(&ClassUnit, &str)> = model
        .classes()
        .filter_map(|c| resolver.resolve(c.fqn()).map(|layer| (c, layer)))
        .collect();

    let mut violations = Vec::new();
    for &(from, from_layer) in &layered {
        for &(to, to_layer) in &layered {
            if from.fqn() == to.fqn()
                || permitted.contains(&(from_layer, to_layer))
                || !has_dependency(model, from, to)
            {
                continue;
            }
            violations.push(
                class_violation(
                    rule,
                    from,
                    from.fqn(),
                    format!(
                        "Layering violation: {} ({from_layer}) -> {} ({to_layer}) is not allowed. {}",
                        from.fqn(),
                        to.fqn(),
                        rule.message
                    ),
                )
                .with_suggestion(format!(
                    "Route the call through an allowed layer or allow {from_layer} -> {to_layer}"
                )),
            );
        }
    }

    if forbid_cycles {
        if let Some(cycle) = find_layer_cycle(layers, allowed) {
            violations.push(
                Violation::new(
                    &rule.id,
                    rule.type_name(),
                    rule.severity,
                    Location::new("", 1, &rule.id),
                    format!(
                        "Allowed layer dependencies contain a cycle: {}. {}",
                        cycle.join(" -> "),
                        rule.message
                    ),
                )
                .with_suggestion("Remove one of the allowed dependencies on the cycle"),
            );
        }
    }

    violations
}

/// Depth-first search over the allowed edges. Returns the first cycle found,
/// closed back to its first layer.
///
/// Self edges only permit dependencies inside one layer and are not cycles.
fn find_layer_cycle(layers: &[Layer], allowed: &[AllowedDependency]) -> Option<Vec<String>> {
    let mut graph: BTreeMap<&str, Vec<&str>> = BTreeMap::new();
    for layer in layers {
        graph.entry(layer.name.as_str()).or_default();
    }
    for dep in allowed.iter().filter(|d| d.from != d.to) {
        graph.entry(dep.from.as_str()).or_default().push(dep.to.as_str());
    }

    let mut visited: HashSet<&str> = HashSet::new();
    let mut path: Vec<&str> = Vec::new();

    // Layer order first, then anything only named by an edge.
    let starts: Vec<&str> = layers
        .iter()
        .map(|l| l.name.as_str())
        .chain(graph.keys().copied())
        .collect();
    for start in starts {
        if let Some(cycle) = visit(start, &graph, &mut visited, &mut path) {
            return Some(cycle);
        }
    }
    None
}

fn visit<'g>(
    node: &'g str,
    graph: &BTreeMap<&'g str, Vec<&'g str>>,
    visited: &mut HashSet<&'g str>,
    in_progress: &mut Vec<&'g str>,
) -> Option<Vec<String>> {
    if let Some(pos) = in_progress.iter().position(|&n| n == node) {
        let mut cycle: Vec<String> = in_progress[pos..].iter().map(|s| (*s).to_owned()).collect();
        cycle.push(node.to_owned());
        return Some(cycle);
    }
    if !visited.insert(node) {
        return None;
    }

    in_progress.push(node);
    for &next in graph.get(node).into_iter().flatten() {
        if let Some(cycle) = visit(next, graph, visited, in_progress) {
            return Some(cycle);
        }
    }
    in_progress.pop();
    None
}

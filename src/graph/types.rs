//! Dependency graph types.

use rustc_hash::FxHashMap;
use serde::Serialize;

use crate::extract::DependsOn;
use crate::scanner::ModuleDescriptor;

/// One loadable named unit, after graph-level cleaning: dependencies are
/// deduplicated and stripped of self-references and dangling names.
#[derive(Debug, Clone, Serialize)]
pub struct ComponentDescriptor {
    pub name: String,
    pub depends_on: DependsOn,
    pub module: ModuleDescriptor,
}

/// Directed graph over component names, with its reverse.
///
/// Built fresh from declared dependencies and never mutated once the sort
/// begins; the sorter consumes a working copy of in-degree counts instead.
#[derive(Debug, Default)]
pub struct DependencyGraph {
    nodes: Vec<String>,
    forward: FxHashMap<String, Vec<String>>,
    reverse: FxHashMap<String, Vec<String>>,
}

impl DependencyGraph {
    pub(crate) fn add_node(&mut self, name: String) {
        self.nodes.push(name);
    }

    pub(crate) fn add_edge(&mut self, dependent: &str, prerequisite: &str) {
        self.forward
            .entry(dependent.to_string())
            .or_default()
            .push(prerequisite.to_string());
        self.reverse
            .entry(prerequisite.to_string())
            .or_default()
            .push(dependent.to_string());
    }

    /// All component names, in extraction order.
    pub fn nodes(&self) -> &[String] {
        &self.nodes
    }

    /// Names this component depends on (its prerequisites).
    pub fn dependencies_of(&self, name: &str) -> &[String] {
        self.forward.get(name).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Names that depend on this component.
    pub fn dependents_of(&self, name: &str) -> &[String] {
        self.reverse.get(name).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

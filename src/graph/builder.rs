//! Graph builder - extracted components into a cleaned dependency graph.

use rustc_hash::FxHashMap;

use super::types::{ComponentDescriptor, DependencyGraph};
use crate::diagnostics::{ResolveReport, Warning};
use crate::errors::ResolveError;
use crate::extract::{DependsOn, ExtractedComponent};

/// Graph plus the per-name descriptor lookup the loader and cycle analyzer
/// both need.
#[derive(Debug)]
pub struct BuiltGraph {
    pub graph: DependencyGraph,
    pub components: FxHashMap<String, ComponentDescriptor>,
}

/// Build the dependency graph from every extracted component.
///
/// Dangling references and self-dependencies are warnings with the edge
/// dropped; the same name declared by two different files is fatal.
pub fn build(
    extracted: Vec<ExtractedComponent>,
    report: &mut ResolveReport,
) -> Result<BuiltGraph, ResolveError> {
    // Pass 1: names. A collision across files would make the eventual load
    // order depend on scan order, so it never degrades to a warning.
    let mut defined_in: FxHashMap<&str, &ExtractedComponent> = FxHashMap::default();
    for component in &extracted {
        if let Some(first) = defined_in.get(component.name.as_str()) {
            if first.module.file_path != component.module.file_path {
                return Err(ResolveError::DuplicateComponent {
                    name: component.name.clone(),
                    first: first.module.display_path.clone(),
                    second: component.module.display_path.clone(),
                });
            }
        }
        defined_in.insert(&component.name, component);
    }

    // Pass 2: edges, cleaned.
    let mut graph = DependencyGraph::default();
    let mut components = FxHashMap::default();
    for component in &extracted {
        let mut depends_on = DependsOn::new();
        for dependency in &component.depends_on {
            if dependency == &component.name {
                report.warn(Warning::SelfDependency {
                    component: component.name.clone(),
                    file: component.module.display_path.clone(),
                });
                continue;
            }
            if !defined_in.contains_key(dependency.as_str()) {
                report.warn(Warning::DanglingReference {
                    component: component.name.clone(),
                    dependency: dependency.clone(),
                    file: component.module.display_path.clone(),
                });
                continue;
            }
            if depends_on.contains(dependency) {
                continue;
            }
            depends_on.push(dependency.clone());
        }

        graph.add_node(component.name.clone());
        for dependency in &depends_on {
            graph.add_edge(&component.name, dependency);
        }
        components.insert(
            component.name.clone(),
            ComponentDescriptor {
                name: component.name.clone(),
                depends_on,
                module: component.module.clone(),
            },
        );
    }

    Ok(BuiltGraph { graph, components })
}

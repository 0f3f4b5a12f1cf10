//! Topological sorter - Kahn's algorithm over in-degree counts.

use std::collections::VecDeque;

use rustc_hash::FxHashMap;

use crate::graph::DependencyGraph;

/// Outcome of one sort: either every component was ordered, or the remainder
/// participates in at least one cycle.
#[derive(Debug, PartialEq, Eq)]
pub enum SortOutcome {
    /// Every node ordered; prerequisites strictly precede dependents.
    Complete(Vec<String>),
    /// Partial order plus the stuck node set.
    Stuck {
        ordered: Vec<String>,
        stuck: Vec<String>,
    },
}

/// Compute a load order. The graph is read-only; the sort works on its own
/// in-degree counters. Tie-breaking among simultaneously ready nodes follows
/// node insertion order, so identical input reproduces the identical order.
pub fn sort(graph: &DependencyGraph) -> SortOutcome {
    let mut in_degree: FxHashMap<&str, usize> = FxHashMap::default();
    for node in graph.nodes() {
        in_degree.insert(node, graph.dependencies_of(node).len());
    }

    let mut ready: VecDeque<&str> = graph
        .nodes()
        .iter()
        .filter(|node| in_degree[node.as_str()] == 0)
        .map(String::as_str)
        .collect();

    let mut ordered = Vec::with_capacity(graph.len());
    while let Some(node) = ready.pop_front() {
        ordered.push(node.to_string());
        for dependent in graph.dependents_of(node) {
            if let Some(count) = in_degree.get_mut(dependent.as_str()) {
                *count -= 1;
                if *count == 0 {
                    ready.push_back(dependent.as_str());
                }
            }
        }
    }

    if ordered.len() == graph.len() {
        SortOutcome::Complete(ordered)
    } else {
        let stuck = graph
            .nodes()
            .iter()
            .filter(|node| in_degree[node.as_str()] > 0)
            .cloned()
            .collect();
        SortOutcome::Stuck { ordered, stuck }
    }
}

//! Cycle analyzer - enumerate every elementary cycle in the stuck node set.
//!
//! Only runs after the sorter fails. Depth-first search from every stuck node
//! tracks the current path; revisiting a node already on the path yields the
//! path slice as one elementary cycle. Rotations of the same cycle are
//! deduplicated by normalizing each cycle to start at its lexicographically
//! smallest member.

use rustc_hash::{FxHashMap, FxHashSet};
use serde::Serialize;

use crate::graph::{ComponentDescriptor, DependencyGraph};

/// One edge of a cycle, annotated with the file declaring it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CycleEdge {
    pub dependent: String,
    pub prerequisite: String,
    pub declared_in: String,
}

/// One elementary cycle, rotation-normalized.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Cycle {
    /// Members starting at the lexicographically smallest name.
    pub members: Vec<String>,
    /// Step-by-step edges, closing back to the first member.
    pub edges: Vec<CycleEdge>,
}

/// All distinct cycles found in the stuck node set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Default)]
pub struct CycleReport {
    pub cycles: Vec<Cycle>,
}

impl std::fmt::Display for Cycle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut names = self.members.join(" -> ");
        if let Some(first) = self.members.first() {
            names.push_str(" -> ");
            names.push_str(first);
        }
        writeln!(f, "{names}")?;
        for edge in &self.edges {
            writeln!(
                f,
                "  {} depends on {} (declared in {})",
                edge.dependent, edge.prerequisite, edge.declared_in
            )?;
        }
        Ok(())
    }
}

impl std::fmt::Display for CycleReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(
            f,
            "{} circular dependency chain(s) detected:",
            self.cycles.len()
        )?;
        for (i, cycle) in self.cycles.iter().enumerate() {
            write!(f, "cycle {}: {cycle}", i + 1)?;
        }
        Ok(())
    }
}

/// Enumerate all elementary cycles among the stuck nodes.
pub fn analyze(
    graph: &DependencyGraph,
    stuck: &[String],
    components: &FxHashMap<String, ComponentDescriptor>,
) -> CycleReport {
    let stuck_set: FxHashSet<&str> = stuck.iter().map(String::as_str).collect();

    // Adjacency restricted to the stuck set: edges leaving it cannot be part
    // of any cycle.
    let adjacency: FxHashMap<&str, Vec<&str>> = stuck
        .iter()
        .map(|node| {
            let neighbors = graph
                .dependencies_of(node)
                .iter()
                .map(String::as_str)
                .filter(|dep| stuck_set.contains(dep))
                .collect();
            (node.as_str(), neighbors)
        })
        .collect();

    let mut seen: FxHashSet<Vec<String>> = FxHashSet::default();
    let mut found: Vec<Vec<String>> = Vec::new();
    let mut path: Vec<&str> = Vec::new();
    for start in stuck {
        dfs(start, &adjacency, &mut path, &mut seen, &mut found);
    }

    let cycles = found
        .into_iter()
        .map(|members| {
            let edges = members
                .iter()
                .enumerate()
                .map(|(i, dependent)| {
                    let prerequisite = &members[(i + 1) % members.len()];
                    CycleEdge {
                        dependent: dependent.clone(),
                        prerequisite: prerequisite.clone(),
                        declared_in: components
                            .get(dependent)
                            .map(|c| c.module.display_path.clone())
                            .unwrap_or_else(|| "<unknown>".to_string()),
                    }
                })
                .collect();
            Cycle { members, edges }
        })
        .collect();

    CycleReport { cycles }
}

fn dfs<'a>(
    node: &'a str,
    adjacency: &FxHashMap<&'a str, Vec<&'a str>>,
    path: &mut Vec<&'a str>,
    seen: &mut FxHashSet<Vec<String>>,
    found: &mut Vec<Vec<String>>,
) {
    path.push(node);
    if let Some(neighbors) = adjacency.get(node) {
        for &next in neighbors {
            if let Some(position) = path.iter().position(|&n| n == next) {
                let cycle = normalize(&path[position..]);
                if seen.insert(cycle.clone()) {
                    found.push(cycle);
                }
            } else {
                dfs(next, adjacency, path, seen, found);
            }
        }
    }
    path.pop();
}

/// Rotate a cycle so it starts at its lexicographically smallest member.
fn normalize(members: &[&str]) -> Vec<String> {
    let smallest = members
        .iter()
        .enumerate()
        .min_by_key(|(_, name)| **name)
        .map(|(i, _)| i)
        .unwrap_or(0);
    let mut rotated: Vec<String> = members.iter().map(|s| s.to_string()).collect();
    rotated.rotate_left(smallest);
    rotated
}

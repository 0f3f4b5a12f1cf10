//! Tests for circular-dependency detection and the cycle diagnostic report.

use std::fs;
use std::path::Path;

use keystone::{resolve, ExtractionStrategy, ResolveConfig, ResolveError, Resolver};

fn write_component(dir: &Path, name: &str, deps: &[&str]) {
    let file = format!("{}_component.py", name.to_lowercase());
    let deps_literal = deps
        .iter()
        .map(|d| format!("\"{d}\""))
        .collect::<Vec<_>>()
        .join(", ");
    fs::write(
        dir.join(file),
        format!("class {name}:\n    depends_on = [{deps_literal}]\n"),
    )
    .unwrap();
}

fn config(root: &Path, strategy: ExtractionStrategy) -> ResolveConfig {
    ResolveConfig {
        roots: vec![root.to_path_buf()],
        strategy,
        ..ResolveConfig::default()
    }
}

#[test]
fn test_two_cycle_is_fatal_and_reported() {
    for strategy in [ExtractionStrategy::Static, ExtractionStrategy::Runtime] {
        let dir = tempfile::TempDir::new().unwrap();
        write_component(dir.path(), "A", &["B"]);
        write_component(dir.path(), "B", &["A"]);

        let err = resolve(config(dir.path(), strategy)).unwrap_err();
        let ResolveError::CircularDependency(report) = err else {
            panic!("expected circular dependency error");
        };

        assert_eq!(report.cycles.len(), 1);
        assert_eq!(report.cycles[0].members, vec!["A", "B"]);
    }
}

#[test]
fn test_no_registry_is_produced_on_cycle() {
    let dir = tempfile::TempDir::new().unwrap();
    write_component(dir.path(), "A", &["B"]);
    write_component(dir.path(), "B", &["A"]);

    let mut resolver = Resolver::new(config(dir.path(), ExtractionStrategy::Static));
    assert!(resolver.resolve().is_err());
    assert!(!resolver.registry().is_ready());
    assert!(resolver.registry().is_empty());
}

#[test]
fn test_disjoint_cycles_reported_separately() {
    let dir = tempfile::TempDir::new().unwrap();
    // Two independent cycles mixed among orderable components.
    write_component(dir.path(), "A", &["B"]);
    write_component(dir.path(), "B", &["A"]);
    write_component(dir.path(), "C", &["D"]);
    write_component(dir.path(), "D", &["E"]);
    write_component(dir.path(), "E", &["C"]);
    write_component(dir.path(), "Standalone", &[]);
    write_component(dir.path(), "Leaf", &["Standalone"]);

    let err = resolve(config(dir.path(), ExtractionStrategy::Static)).unwrap_err();
    let ResolveError::CircularDependency(report) = err else {
        panic!("expected circular dependency error");
    };

    assert_eq!(report.cycles.len(), 2);
    let mut memberships: Vec<Vec<String>> =
        report.cycles.iter().map(|c| c.members.clone()).collect();
    memberships.sort();
    assert_eq!(memberships[0], vec!["A", "B"]);
    assert_eq!(memberships[1], vec!["C", "D", "E"]);
}

#[test]
fn test_report_names_the_declaring_files() {
    let dir = tempfile::TempDir::new().unwrap();
    write_component(dir.path(), "A", &["B"]);
    write_component(dir.path(), "B", &["A"]);

    let err = resolve(config(dir.path(), ExtractionStrategy::Static)).unwrap_err();
    let text = err.to_string();

    assert!(text.contains("A depends on B (declared in a_component.py)"));
    assert!(text.contains("B depends on A (declared in b_component.py)"));
}

#[test]
fn test_component_stuck_behind_cycle_is_not_its_own_cycle() {
    let dir = tempfile::TempDir::new().unwrap();
    write_component(dir.path(), "A", &["B"]);
    write_component(dir.path(), "B", &["A"]);
    // Depends on the cycle, so it cannot be ordered, but it is on no cycle.
    write_component(dir.path(), "Downstream", &["A"]);

    let err = resolve(config(dir.path(), ExtractionStrategy::Static)).unwrap_err();
    let ResolveError::CircularDependency(report) = err else {
        panic!("expected circular dependency error");
    };

    assert_eq!(report.cycles.len(), 1);
    assert_eq!(report.cycles[0].members, vec!["A", "B"]);
}

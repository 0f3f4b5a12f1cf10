//! keystone: dependency-ordered component loader
//!
//! Discovers source-defined components scattered across directory trees,
//! extracts the load-order constraints each declares about other components
//! by name, computes a cycle-safe topological load order, and materializes
//! each component into a registry before the next one starts — so a
//! component's construction can resolve its prerequisites by name.
//!
//! Pipeline: Scanner -> Extractor -> Graph Builder -> Topological Sorter ->
//! (Cycle Analyzer on failure) -> Loader/Registrar -> Registry.

pub mod config;
pub mod diagnostics;
pub mod errors;
pub mod extract;
pub mod graph;
pub mod loader;
pub mod order;
pub mod registry;
pub mod resolver;
pub mod runtime;
pub mod scanner;

// Re-exports for convenience
pub use config::{ExtractionStrategy, ResolveConfig};
pub use diagnostics::{ResolveReport, Warning};
pub use errors::{ExtractError, MaterializeError, ResolveError};
pub use extract::{DependencyExtractor, ExtractedComponent, RuntimeExtractor, StaticExtractor};
pub use graph::{ComponentDescriptor, DependencyGraph};
pub use loader::Loader;
pub use order::{Cycle, CycleEdge, CycleReport, SortOutcome};
pub use registry::{Registry, RegistryState};
pub use resolver::{resolve, Resolver};
pub use runtime::{Component, Runtime, Value};
pub use scanner::{ModuleDescriptor, Scanner};

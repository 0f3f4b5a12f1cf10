//! Load ordering - topological sort and cycle diagnostics.

pub mod cycles;
pub mod toposort;

pub use cycles::{analyze, Cycle, CycleEdge, CycleReport};
pub use toposort::{sort, SortOutcome};

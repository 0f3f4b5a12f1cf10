//! Graph builder - dependency graph construction from extracted components.

pub mod builder;
pub mod types;

pub use builder::{build, BuiltGraph};
pub use types::{ComponentDescriptor, DependencyGraph};

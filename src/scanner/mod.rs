//! Source scanner - discovers component definition files under the scan roots.

pub mod ignores;
pub mod types;
pub mod walker;

pub use types::ModuleDescriptor;
pub use walker::Scanner;

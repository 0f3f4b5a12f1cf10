//! Resolution configuration with compiled defaults.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Which dependency extraction strategy to run.
///
/// Both strategies produce the same `name -> declared dependencies` shape, so
/// everything downstream of the extractor is strategy-agnostic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ExtractionStrategy {
    /// Parse the definition file without evaluating it and read the literal
    /// dependency list off the syntax tree.
    #[default]
    Static,
    /// Evaluate the definition file through the component runtime and reflect
    /// the dependency attribute off the live class objects.
    Runtime,
}

/// Configuration for a full resolution run.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ResolveConfig {
    /// Root directories to scan. Missing roots are skipped with a warning.
    pub roots: Vec<PathBuf>,
    /// Glob matched against file names to select definition files.
    pub suffix_pattern: String,
    /// Directory names to prune before recursion (exact or wildcard).
    pub ignore_dirs: Vec<String>,
    /// File name patterns to skip (exact or wildcard).
    pub ignore_files: Vec<String>,
    /// Extraction strategy.
    pub strategy: ExtractionStrategy,
    /// Class attribute holding the declared dependency list.
    pub attribute: String,
    /// Files larger than this are skipped during the scan (bytes).
    pub max_file_size: u64,
}

impl Default for ResolveConfig {
    fn default() -> Self {
        Self {
            roots: vec![PathBuf::from(".")],
            suffix_pattern: "*_component.py".to_string(),
            ignore_dirs: vec![],
            ignore_files: vec![],
            strategy: ExtractionStrategy::default(),
            attribute: "depends_on".to_string(),
            max_file_size: 2 * 1024 * 1024, // 2MB
        }
    }
}

impl ResolveConfig {
    /// Convenience constructor mirroring the host's startup call shape.
    pub fn new(
        roots: Vec<PathBuf>,
        suffix_pattern: impl Into<String>,
        ignore_dirs: Vec<String>,
        ignore_files: Vec<String>,
    ) -> Self {
        Self {
            roots,
            suffix_pattern: suffix_pattern.into(),
            ignore_dirs,
            ignore_files,
            ..Self::default()
        }
    }
}

//! Definition-file walker.
//!
//! Walks every scan root, prunes ignored directories before recursing into
//! them, and collects a deduplicated, deterministically ordered list of
//! [`ModuleDescriptor`]s. A missing root is a warning, never a failure.

use std::fs;
use std::path::{Path, PathBuf};

use globset::{Glob, GlobSet, GlobSetBuilder};
use rustc_hash::FxHashSet;

use super::ignores::IgnoreMatcher;
use super::types::ModuleDescriptor;
use crate::config::ResolveConfig;
use crate::diagnostics::{ResolveReport, Warning};

/// Definition-file scanner.
pub struct Scanner {
    roots: Vec<PathBuf>,
    ignore_dirs: Vec<String>,
    ignore_files: Vec<String>,
    suffix: GlobSet,
    max_file_size: u64,
}

impl Scanner {
    /// Create a scanner from the resolution config.
    pub fn new(config: &ResolveConfig) -> Self {
        let mut builder = GlobSetBuilder::new();
        match Glob::new(&config.suffix_pattern) {
            Ok(glob) => {
                builder.add(glob);
            }
            Err(e) => {
                tracing::warn!(
                    "invalid suffix pattern {:?}: {e}, no files will match",
                    config.suffix_pattern
                );
            }
        }
        let suffix = builder
            .build()
            .unwrap_or_else(|_| GlobSetBuilder::new().build().unwrap());

        Self {
            roots: config.roots.clone(),
            ignore_dirs: config.ignore_dirs.clone(),
            ignore_files: config.ignore_files.clone(),
            suffix,
            max_file_size: config.max_file_size,
        }
    }

    /// Walk all roots and collect descriptors, sorted by logical path.
    pub fn scan(&self, report: &mut ResolveReport) -> Vec<ModuleDescriptor> {
        let mut seen: FxHashSet<PathBuf> = FxHashSet::default();
        let mut modules = Vec::new();

        for root in &self.roots {
            if !root.is_dir() {
                report.warn(Warning::MissingRoot {
                    root: root.display().to_string(),
                });
                continue;
            }
            let matcher = IgnoreMatcher::new(root, &self.ignore_dirs, &self.ignore_files);
            self.walk_dir(root, root, &matcher, &mut seen, &mut modules);
        }

        // Filesystem iteration order is platform-dependent; sort so every
        // downstream stage sees the same input order run to run.
        modules.sort_by(|a, b| a.logical_path.cmp(&b.logical_path));
        modules
    }

    fn walk_dir(
        &self,
        root: &Path,
        dir: &Path,
        matcher: &IgnoreMatcher,
        seen: &mut FxHashSet<PathBuf>,
        out: &mut Vec<ModuleDescriptor>,
    ) {
        let entries = match fs::read_dir(dir) {
            Ok(e) => e,
            Err(_) => return,
        };

        for entry in entries.flatten() {
            let path = entry.path();
            let relative = path.strip_prefix(root).unwrap_or(&path);

            if path.is_dir() {
                // Pruned here, before recursion: ignored trees are never entered.
                if !matcher.is_ignored(relative, true) {
                    self.walk_dir(root, &path, matcher, seen, out);
                }
            } else if path.is_file() {
                if matcher.is_ignored(relative, false) {
                    continue;
                }
                let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
                    continue;
                };
                if !self.suffix.is_match(name) {
                    continue;
                }
                if let Ok(metadata) = fs::metadata(&path) {
                    if metadata.len() > self.max_file_size {
                        tracing::debug!("skipping oversized file {}", path.display());
                        continue;
                    }
                }
                if let Some(descriptor) = make_descriptor(root, &path) {
                    if seen.insert(descriptor.file_path.clone()) {
                        out.push(descriptor);
                    }
                }
            }
        }
    }
}

/// Derive a descriptor from a root and a file inside it.
fn make_descriptor(root: &Path, path: &Path) -> Option<ModuleDescriptor> {
    let relative = path.strip_prefix(root).ok()?;

    let mut parts: Vec<String> = relative
        .parent()
        .map(|p| {
            p.components()
                .map(|c| c.as_os_str().to_string_lossy().to_string())
                .collect()
        })
        .unwrap_or_default();
    parts.push(path.file_stem()?.to_string_lossy().to_string());

    Some(ModuleDescriptor {
        logical_path: parts.join("."),
        display_path: relative.to_string_lossy().replace('\\', "/"),
        file_path: fs::canonicalize(path).unwrap_or_else(|_| path.to_path_buf()),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write(dir: &Path, rel: &str, text: &str) {
        let path = dir.join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, text).unwrap();
    }

    fn scan(config: &ResolveConfig) -> (Vec<ModuleDescriptor>, ResolveReport) {
        let mut report = ResolveReport::default();
        let modules = Scanner::new(config).scan(&mut report);
        (modules, report)
    }

    #[test]
    fn test_finds_suffix_files_and_derives_paths() {
        let dir = tempfile::TempDir::new().unwrap();
        write(dir.path(), "app/billing/invoice_component.py", "");
        write(dir.path(), "app/billing/helpers.py", "");
        write(dir.path(), "core_component.py", "");

        let config = ResolveConfig {
            roots: vec![dir.path().to_path_buf()],
            ..ResolveConfig::default()
        };
        let (modules, report) = scan(&config);

        assert_eq!(modules.len(), 2);
        assert_eq!(modules[0].logical_path, "app.billing.invoice_component");
        assert_eq!(modules[0].display_path, "app/billing/invoice_component.py");
        assert!(modules[0].file_path.is_absolute());
        assert_eq!(modules[1].logical_path, "core_component");
        assert!(report.warnings.is_empty());
    }

    #[test]
    fn test_ignored_dirs_are_pruned() {
        let dir = tempfile::TempDir::new().unwrap();
        write(dir.path(), "app/a_component.py", "");
        write(dir.path(), "__pycache__/b_component.py", "");
        write(dir.path(), "skipme/c_component.py", "");

        let config = ResolveConfig {
            roots: vec![dir.path().to_path_buf()],
            ignore_dirs: vec!["skipme".to_string()],
            ..ResolveConfig::default()
        };
        let (modules, _) = scan(&config);

        assert_eq!(modules.len(), 1);
        assert_eq!(modules[0].logical_path, "app.a_component");
    }

    #[test]
    fn test_missing_root_is_warning_not_failure() {
        let dir = tempfile::TempDir::new().unwrap();
        write(dir.path(), "a_component.py", "");

        let config = ResolveConfig {
            roots: vec![dir.path().to_path_buf(), dir.path().join("nope")],
            ..ResolveConfig::default()
        };
        let (modules, report) = scan(&config);

        assert_eq!(modules.len(), 1);
        assert!(matches!(report.warnings[0], Warning::MissingRoot { .. }));
    }

    #[test]
    fn test_ignore_file_patterns() {
        let dir = tempfile::TempDir::new().unwrap();
        write(dir.path(), "a_component.py", "");
        write(dir.path(), "old_a_component.py", "");

        let config = ResolveConfig {
            roots: vec![dir.path().to_path_buf()],
            ignore_files: vec!["old_*".to_string()],
            ..ResolveConfig::default()
        };
        let (modules, _) = scan(&config);

        assert_eq!(modules.len(), 1);
        assert_eq!(modules[0].logical_path, "a_component");
    }

    #[test]
    fn test_overlapping_roots_deduplicate() {
        let dir = tempfile::TempDir::new().unwrap();
        write(dir.path(), "app/a_component.py", "");

        let config = ResolveConfig {
            roots: vec![dir.path().to_path_buf(), dir.path().join("app")],
            ..ResolveConfig::default()
        };
        let (modules, _) = scan(&config);

        assert_eq!(modules.len(), 1);
    }
}

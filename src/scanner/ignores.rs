//! Ignore patterns for the definition-file scan.
//!
//! Directory patterns are matched before recursion so ignored trees are never
//! descended into. Both exact names and wildcards are supported.

use ignore::gitignore::{Gitignore, GitignoreBuilder};
use std::path::Path;

/// Directories that are never worth descending into.
pub const DEFAULT_IGNORE_DIRS: &[&str] = &[
    "__pycache__",
    ".git",
    ".hg",
    ".svn",
    ".venv",
    "venv",
    ".mypy_cache",
    ".pytest_cache",
    ".tox",
    "node_modules",
    "*.egg-info",
];

/// Compiled ignore patterns for one scan root.
pub struct IgnoreMatcher {
    gitignore: Gitignore,
}

impl IgnoreMatcher {
    /// Build a matcher from the defaults plus the caller's ignore lists.
    pub fn new(root: &Path, ignore_dirs: &[String], ignore_files: &[String]) -> Self {
        let mut builder = GitignoreBuilder::new(root);

        // Trailing slash makes the pattern directory-only.
        for pattern in DEFAULT_IGNORE_DIRS {
            let _ = builder.add_line(None, &format!("{pattern}/"));
        }
        for pattern in ignore_dirs {
            let _ = builder.add_line(None, &format!("{pattern}/"));
        }
        for pattern in ignore_files {
            let _ = builder.add_line(None, pattern);
        }

        Self {
            gitignore: builder
                .build()
                .unwrap_or_else(|_| GitignoreBuilder::new(root).build().unwrap()),
        }
    }

    /// Check if a root-relative path should be ignored.
    pub fn is_ignored(&self, path: &Path, is_dir: bool) -> bool {
        self.gitignore.matched(path, is_dir).is_ignore()
    }
}

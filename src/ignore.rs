//! Discovery exclusion rules
//!
//! Well-known non-source directories are pruned as whole subtrees during
//! file discovery, and the root's `.gitignore` is honored when present.

use ignore::gitignore::{Gitignore, GitignoreBuilder};
use std::path::Path;

/// Directories that never contain indexable sources.
const DEFAULT_PRUNES: &[&str] = &[
    // Version-control metadata
    ".git/",
    ".hg/",
    ".svn/",
    // Language package caches and virtual environments
    "__pycache__/",
    ".mypy_cache/",
    ".pytest_cache/",
    "venv/",
    ".venv/",
    "node_modules/",
    "target/",
    // Build output
    "dist/",
    "build/",
];

pub struct IgnoreFilter {
    inner: Gitignore,
}

impl IgnoreFilter {
    pub fn new(root: &Path, extra_excludes: &[String]) -> Self {
        let mut builder = GitignoreBuilder::new(root);

        builder.add(root.join(".gitignore"));

        for pattern in DEFAULT_PRUNES {
            // Static patterns are known-valid
            builder.add_line(None, pattern).ok();
        }

        for pattern in extra_excludes {
            builder.add_line(None, pattern).ok();
        }

        Self {
            inner: builder.build().unwrap_or_else(|_| Gitignore::empty()),
        }
    }

    pub fn is_ignored(&self, path: &Path, is_dir: bool) -> bool {
        self.inner.matched(path, is_dir).is_ignore()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_prunes() {
        let filter = IgnoreFilter::new(Path::new("/repo"), &[]);
        assert!(filter.is_ignored(Path::new("/repo/.git"), true));
        assert!(filter.is_ignored(Path::new("/repo/node_modules"), true));
        assert!(filter.is_ignored(Path::new("/repo/sub/__pycache__"), true));
        assert!(!filter.is_ignored(Path::new("/repo/src"), true));
        assert!(!filter.is_ignored(Path::new("/repo/src/main.go"), false));
    }

    #[test]
    fn test_extra_excludes() {
        let filter = IgnoreFilter::new(Path::new("/repo"), &["generated/".to_string()]);
        assert!(filter.is_ignored(Path::new("/repo/generated"), true));
    }
}

//! Symbol identity - global, deterministic key for every definition
//!
//! Format: `lang::file::name` or `lang::file::container.name` for symbols
//! qualified by a container (e.g. a method's receiver type).
//!
//! Examples:
//! - `go::pkg/server.go::Handler.ServeHTTP`
//! - `py::app/models.py::User`
//!
//! Two occurrences yield the same identity iff language, file, container,
//! and name all match exactly. This is an intentionally coarse, syntactic
//! identity, not scope- or type-aware.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Normalize a file path for consistent identity keys across platforms:
/// forward slashes, no leading `./`.
///
/// This is the single normalization point shared by identity construction,
/// merge keys, and query-time lookups.
pub fn normalize_path(path: &str) -> String {
    let path = path.replace('\\', "/");
    path.strip_prefix("./").unwrap_or(&path).to_string()
}

/// Global, deterministic identity of one definition.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SymbolId(String);

impl SymbolId {
    /// Build the identity for (language, file, optional container, name).
    pub fn new(lang: &str, file: &str, container: Option<&str>, name: &str) -> Self {
        let file = normalize_path(file);
        match container {
            Some(container) if !container.is_empty() => {
                Self(format!("{lang}::{file}::{container}.{name}"))
            }
            _ => Self(format!("{lang}::{file}::{name}")),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<String> for SymbolId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for SymbolId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl fmt::Display for SymbolId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identity_determinism() {
        let a = SymbolId::new("go", "pkg/server.go", Some("Handler"), "ServeHTTP");
        let b = SymbolId::new("go", "pkg/server.go", Some("Handler"), "ServeHTTP");
        assert_eq!(a, b);
        assert_eq!(a.as_str(), "go::pkg/server.go::Handler.ServeHTTP");
    }

    #[test]
    fn test_identity_without_container() {
        let id = SymbolId::new("py", "app/models.py", None, "User");
        assert_eq!(id.as_str(), "py::app/models.py::User");

        // Empty container is treated as absent
        let id = SymbolId::new("py", "app/models.py", Some(""), "User");
        assert_eq!(id.as_str(), "py::app/models.py::User");
    }

    #[test]
    fn test_path_normalization() {
        assert_eq!(normalize_path("./a/b.go"), "a/b.go");
        assert_eq!(normalize_path("a\\b\\c.ts"), "a/b/c.ts");
        let id = SymbolId::new("ts", "./src\\app.ts", None, "main");
        assert_eq!(id.as_str(), "ts::src/app.ts::main");
    }

    #[test]
    fn test_distinct_files_distinct_identities() {
        let a = SymbolId::new("py", "a.py", None, "foo");
        let b = SymbolId::new("py", "b.py", None, "foo");
        assert_ne!(a, b);
    }
}

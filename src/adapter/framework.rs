//! Core adapter framework
//!
//! Defines the trait all language adapters implement and the ordered
//! registry the engine dispatches through.

use crate::index::{FileIndex, ProjectIndex};
use crate::location::Occurrence;
use crate::symbol_id::SymbolId;
use crate::Result;
use std::path::Path;
use tree_sitter::Tree;

/// Trait for language adapters
///
/// Each language adapter is responsible for:
/// 1. Identifying files it can handle (by extension)
/// 2. Parsing source bytes into a syntax tree
/// 3. Extracting definitions, references, and imports into a [`FileIndex`]
/// 4. Resolving an occurrence to an ordered list of candidate identities
pub trait LanguageAdapter: Send + Sync {
    /// Stable short identifier for the language (`go`, `ts`, `py`, ...)
    fn lang(&self) -> &'static str;

    /// File extensions this adapter handles
    fn extensions(&self) -> &[&str];

    /// Check if this adapter can handle a file. Pure predicate on the
    /// extension; dispatch picks the first matching adapter in
    /// registration order.
    fn can_handle(&self, path: &Path) -> bool {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) => {
                let ext = ext.to_lowercase();
                self.extensions().contains(&ext.as_str())
            }
            None => false,
        }
    }

    /// Build a syntax tree for the file. An error (including a grammar
    /// producing no tree) causes the pipeline to skip the file.
    fn parse(&self, path: &str, src: &[u8]) -> Result<Tree>;

    /// Walk the tree and produce the per-file extraction result.
    fn extract(&self, path: &str, src: &[u8], tree: &Tree) -> Result<FileIndex>;

    /// Resolve an occurrence to an ordered candidate list. Reads the
    /// project index only; never mutates it.
    fn resolve_at(
        &self,
        path: &str,
        src: &[u8],
        occurrence: &Occurrence,
        index: &ProjectIndex,
    ) -> Vec<SymbolId>;
}

/// Ordered registry of language adapters; first `can_handle` match wins.
#[derive(Default)]
pub struct AdapterRegistry {
    adapters: Vec<Box<dyn LanguageAdapter>>,
}

impl AdapterRegistry {
    /// Create a new empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an adapter. Registration order is dispatch priority.
    pub fn register(&mut self, adapter: impl LanguageAdapter + 'static) {
        self.adapters.push(Box::new(adapter));
    }

    /// Find the first adapter that handles a file
    pub fn find_adapter(&self, path: &Path) -> Option<&dyn LanguageAdapter> {
        self.adapters
            .iter()
            .find(|a| a.can_handle(path))
            .map(|a| a.as_ref())
    }

    /// Get all registered adapters
    pub fn adapters(&self) -> &[Box<dyn LanguageAdapter>] {
        &self.adapters
    }
}

/// Create the default registry: Go, TypeScript, JavaScript, Python, Rust.
///
/// This is the one place where a broken adapter must abort construction: a
/// query pack that fails to compile would otherwise silently under-index
/// every file of that language.
pub fn default_registry() -> Result<AdapterRegistry> {
    let mut registry = AdapterRegistry::new();
    registry.register(super::query_adapter::QueryAdapter::go()?);
    registry.register(super::query_adapter::QueryAdapter::typescript()?);
    registry.register(super::query_adapter::QueryAdapter::javascript()?);
    registry.register(super::query_adapter::QueryAdapter::python()?);
    registry.register(super::query_adapter::QueryAdapter::rust()?);
    Ok(registry)
}

#[cfg(test)]
mod tests {
    use super::*;

    struct TestAdapter;

    impl LanguageAdapter for TestAdapter {
        fn lang(&self) -> &'static str {
            "test"
        }
        fn extensions(&self) -> &[&str] {
            &["test"]
        }
        fn parse(&self, _path: &str, _src: &[u8]) -> Result<Tree> {
            Err(crate::Error::Parse("stub".to_string()))
        }
        fn extract(&self, path: &str, _src: &[u8], _tree: &Tree) -> Result<FileIndex> {
            Ok(FileIndex::new("test", path))
        }
        fn resolve_at(
            &self,
            _path: &str,
            _src: &[u8],
            _occurrence: &Occurrence,
            _index: &ProjectIndex,
        ) -> Vec<SymbolId> {
            Vec::new()
        }
    }

    #[test]
    fn test_registry_dispatch() {
        let mut registry = AdapterRegistry::new();
        registry.register(TestAdapter);

        assert!(registry.find_adapter(Path::new("foo.test")).is_some());
        assert!(registry.find_adapter(Path::new("foo.TEST")).is_some());
        assert!(registry.find_adapter(Path::new("foo.other")).is_none());
        assert!(registry.find_adapter(Path::new("noext")).is_none());
    }

    #[test]
    fn test_default_registry_builds() {
        let registry = default_registry().unwrap();
        assert_eq!(registry.adapters().len(), 5);
        assert!(registry.find_adapter(Path::new("a.go")).is_some());
        assert!(registry.find_adapter(Path::new("a.py")).is_some());
        assert!(registry.find_adapter(Path::new("a.ts")).is_some());
        assert!(registry.find_adapter(Path::new("a.js")).is_some());
        assert!(registry.find_adapter(Path::new("a.rs")).is_some());
        assert!(registry.find_adapter(Path::new("a.txt")).is_none());
    }
}

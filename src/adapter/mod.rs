//! Language Adapter Framework
//!
//! Each language provides a Tree-sitter grammar and a `.scm` query pack that
//! maps AST nodes to the capture naming convention the generic extractor
//! understands. The core engine never sees language-specific logic.

pub mod framework;
pub mod query_adapter;

pub use framework::{default_registry, AdapterRegistry, LanguageAdapter};
pub use query_adapter::QueryAdapter;

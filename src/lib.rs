//! # Symdex - Multi-language cross-reference index
//!
//! Symdex builds an in-memory symbol database from a codebase mixing several
//! programming languages and answers "go to definition" queries by cursor
//! position.
//!
//! Symdex provides:
//! - A deterministic global identity scheme for symbols across languages
//! - Tree-sitter based extraction with pluggable language adapters
//! - A concurrent indexing pipeline with a bounded worker pool
//! - Point queries: definition at cursor, references, per-file occurrences

pub mod location;
pub mod symbol_id;
pub mod index;
pub mod adapter;
pub mod engine;
pub mod ignore;
pub mod config;

// Re-exports for convenient access
pub use location::{DefLocation, Occurrence, OccurrenceKind, Position, Range, RefLocation, SymbolKind};
pub use symbol_id::SymbolId;
pub use index::{FileIndex, IndexStats, ProjectIndex};
pub use adapter::{default_registry, AdapterRegistry, LanguageAdapter, QueryAdapter};
pub use engine::{Engine, EngineConfig};

/// Result type alias for Symdex operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for Symdex operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Adapter error: {0}")]
    Adapter(String),

    #[error("no identifier at position")]
    NoIdentifierAtPosition,

    #[error("no adapter for file: {0}")]
    NoAdapterForFile(String),

    #[error("definition not found ({} candidates tried)", candidates.len())]
    DefinitionNotFound { candidates: Vec<SymbolId> },

    #[error("Unknown symbol kind: {0}")]
    UnknownSymbolKind(String),
}

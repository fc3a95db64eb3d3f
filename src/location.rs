//! Source locations - positions, ranges, occurrences, and stored locations
//!
//! Positions are 1-based (line, column) pairs matching source-editor cursor
//! semantics. Ranges are inclusive at both ends.

use crate::{Error, Result, SymbolId};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// A 1-based cursor position.
///
/// The derived `Ord` is lexicographic by (line, col), which is exactly the
/// order used for range containment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Position {
    pub line: u32,
    pub col: u32,
}

impl Position {
    pub fn new(line: u32, col: u32) -> Self {
        Self { line, col }
    }
}

/// A span of source text, inclusive at both ends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Range {
    pub start: Position,
    pub end: Position,
}

impl Range {
    pub fn new(start: Position, end: Position) -> Self {
        Self { start, end }
    }

    /// Containment test: `start <= pos <= end` under lexicographic order.
    pub fn contains(&self, pos: Position) -> bool {
        self.start <= pos && pos <= self.end
    }
}

/// The kind of a stored definition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SymbolKind {
    Func,
    Class,
    Type,
    Var,
    Const,
    Interface,
    Enum,
}

impl SymbolKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            SymbolKind::Func => "func",
            SymbolKind::Class => "class",
            SymbolKind::Type => "type",
            SymbolKind::Var => "var",
            SymbolKind::Const => "const",
            SymbolKind::Interface => "interface",
            SymbolKind::Enum => "enum",
        }
    }

    /// All definition kinds
    pub fn all() -> &'static [SymbolKind] {
        &[
            SymbolKind::Func,
            SymbolKind::Class,
            SymbolKind::Type,
            SymbolKind::Var,
            SymbolKind::Const,
            SymbolKind::Interface,
            SymbolKind::Enum,
        ]
    }
}

impl FromStr for SymbolKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "func" | "function" | "method" | "fn" | "def" => Ok(SymbolKind::Func),
            "class" => Ok(SymbolKind::Class),
            "type" | "struct" => Ok(SymbolKind::Type),
            "var" | "variable" | "let" | "static" => Ok(SymbolKind::Var),
            "const" | "constant" => Ok(SymbolKind::Const),
            "interface" | "trait" => Ok(SymbolKind::Interface),
            "enum" => Ok(SymbolKind::Enum),
            _ => Err(Error::UnknownSymbolKind(s.to_string())),
        }
    }
}

impl std::fmt::Display for SymbolKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Kind tag of one observed identifier appearance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OccurrenceKind {
    Def,
    Ref,
    Import,
}

/// One observed appearance of an identifier in a file.
///
/// Immutable once produced; a file's occurrence list is append-only during
/// extraction and never individually mutated afterward.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Occurrence {
    pub name: String,
    pub kind: OccurrenceKind,
    pub range: Range,
    /// Set only when the extractor already knows the definitive identity,
    /// as for definitions.
    pub symbol: Option<SymbolId>,
}

/// Where a symbol is defined.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DefLocation {
    pub lang: String,
    pub file: String,
    pub range: Range,
    pub name: String,
    pub kind: SymbolKind,
}

/// Where a symbol is referenced.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RefLocation {
    pub lang: String,
    pub file: String,
    pub range: Range,
}

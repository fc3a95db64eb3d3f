//! Query-based Language Adapter
//!
//! One generic adapter implementation covers every supported language: each
//! language contributes a Tree-sitter grammar, an extension list, an
//! embedded `.scm` query pack, and an import-alias derivation policy.
//!
//! Query capture naming convention:
//! - `def.func` / `def.class` / `def.type` / `def.var` / `def.const` /
//!   `def.interface` / `def.enum` → definition name node, kind in the suffix
//! - `def.container` → container qualifying the definition (receiver type,
//!   enclosing class)
//! - `ref.name` → any identifier usage
//! - `import.module` → imported module/path
//! - `import.alias` → explicit local binding introduced by the import

use super::framework::LanguageAdapter;
use crate::index::{FileIndex, ProjectIndex};
use crate::location::{DefLocation, Occurrence, OccurrenceKind, Position, Range, RefLocation, SymbolKind};
use crate::symbol_id::SymbolId;
use crate::{Error, Result};
use std::collections::HashMap;
use tree_sitter::{Language, Node, Parser, Query, QueryCursor, Tree};

/// How a language binds a local name for an import without an explicit
/// alias.
#[derive(Debug, Clone, Copy)]
enum AliasStyle {
    /// Only an explicitly captured alias binds a name (TypeScript, Rust)
    Explicit,
    /// Last path component: `import "net/http"` binds `http` (Go)
    PathBasename,
    /// First dotted segment: `import a.b.c` binds `a` (Python)
    FirstDotSegment,
}

impl AliasStyle {
    fn derive(self, module: &str) -> Option<String> {
        let segment = match self {
            AliasStyle::Explicit => return None,
            AliasStyle::PathBasename => module.rsplit('/').next(),
            AliasStyle::FirstDotSegment => module.split('.').next(),
        };
        segment.filter(|s| !s.is_empty()).map(str::to_string)
    }
}

/// A language adapter driven entirely by a Tree-sitter query pack.
pub struct QueryAdapter {
    lang: &'static str,
    language: Language,
    extensions: &'static [&'static str],
    query: Query,
    alias_style: AliasStyle,
}

impl QueryAdapter {
    fn new(
        lang: &'static str,
        language: Language,
        extensions: &'static [&'static str],
        query_source: &str,
        alias_style: AliasStyle,
    ) -> Result<Self> {
        let query = Query::new(&language, query_source)
            .map_err(|e| Error::Adapter(format!("{lang} query compile error: {e}")))?;
        Ok(Self { lang, language, extensions, query, alias_style })
    }

    /// Go adapter with embedded queries
    pub fn go() -> Result<Self> {
        Self::new(
            "go",
            tree_sitter_go::LANGUAGE.into(),
            &["go"],
            include_str!("../../queries/go.scm"),
            AliasStyle::PathBasename,
        )
    }

    /// TypeScript adapter with embedded queries
    pub fn typescript() -> Result<Self> {
        Self::new(
            "ts",
            tree_sitter_typescript::LANGUAGE_TYPESCRIPT.into(),
            &["ts", "mts", "cts"],
            include_str!("../../queries/typescript.scm"),
            AliasStyle::Explicit,
        )
    }

    /// JavaScript adapter with embedded queries
    pub fn javascript() -> Result<Self> {
        Self::new(
            "js",
            tree_sitter_javascript::LANGUAGE.into(),
            &["js", "mjs", "cjs", "jsx"],
            include_str!("../../queries/javascript.scm"),
            AliasStyle::Explicit,
        )
    }

    /// Python adapter with embedded queries
    pub fn python() -> Result<Self> {
        Self::new(
            "py",
            tree_sitter_python::LANGUAGE.into(),
            &["py", "pyi"],
            include_str!("../../queries/python.scm"),
            AliasStyle::FirstDotSegment,
        )
    }

    /// Rust adapter with embedded queries
    pub fn rust() -> Result<Self> {
        Self::new(
            "rs",
            tree_sitter_rust::LANGUAGE.into(),
            &["rs"],
            include_str!("../../queries/rust.scm"),
            AliasStyle::Explicit,
        )
    }
}

/// Convert a node's 0-based Tree-sitter points to a 1-based range.
fn node_range(node: Node) -> Range {
    let start = node.start_position();
    let end = node.end_position();
    Range::new(
        Position::new(start.row as u32 + 1, start.column as u32 + 1),
        Position::new(end.row as u32 + 1, end.column as u32 + 1),
    )
}

fn node_text<'a>(node: Node, src: &'a [u8]) -> &'a str {
    node.utf8_text(src).unwrap_or("")
}

/// Strip the delimiters module paths carry in source form:
/// `"net/http"` → `net/http`, `'./math.js'` → `./math.js`.
fn trim_module_delimiters(raw: &str) -> &str {
    raw.trim().trim_matches(|c| c == '"' || c == '\'' || c == '`')
}

impl LanguageAdapter for QueryAdapter {
    fn lang(&self) -> &'static str {
        self.lang
    }

    fn extensions(&self) -> &[&str] {
        self.extensions
    }

    fn parse(&self, path: &str, src: &[u8]) -> Result<Tree> {
        let mut parser = Parser::new();
        parser
            .set_language(&self.language)
            .map_err(|e| Error::Adapter(format!("failed to set {} language: {e}", self.lang)))?;
        parser
            .parse(src, None)
            .ok_or_else(|| Error::Parse(format!("{} grammar produced no tree for {path}", self.lang)))
    }

    fn extract(&self, path: &str, src: &[u8], tree: &Tree) -> Result<FileIndex> {
        let mut fi = FileIndex::new(self.lang, path);
        let root = tree.root_node();
        let capture_names = self.query.capture_names();

        let mut cursor = QueryCursor::new();
        let mut matches = cursor.matches(&self.query, root, src);
        while let Some(query_match) = matches.next() {
            let mut captures: HashMap<&str, Node> = HashMap::new();
            for capture in query_match.captures {
                captures.insert(capture_names[capture.index as usize], capture.node);
            }

            // Each pattern carries captures of exactly one family.
            let def = captures.iter().find_map(|(cap, node)| {
                let kind = cap.strip_prefix("def.").filter(|k| *k != "container")?;
                Some((kind.parse::<SymbolKind>().ok()?, *node))
            });
            if let Some((kind, name_node)) = def {
                let name = node_text(name_node, src);
                if name.is_empty() {
                    continue;
                }
                let container = captures.get("def.container").map(|n| node_text(*n, src));
                let range = node_range(name_node);
                let id = SymbolId::new(self.lang, &fi.file, container, name);
                fi.defs.insert(
                    id.clone(),
                    DefLocation {
                        lang: self.lang.to_string(),
                        file: fi.file.clone(),
                        range,
                        name: name.to_string(),
                        kind,
                    },
                );
                fi.occurrences.push(Occurrence {
                    name: name.to_string(),
                    kind: OccurrenceKind::Def,
                    range,
                    symbol: Some(id),
                });
                continue;
            }

            if let Some(module_node) = captures.get("import.module") {
                let module = trim_module_delimiters(node_text(*module_node, src)).to_string();
                if module.is_empty() {
                    continue;
                }
                let alias_node = captures.get("import.alias");
                let alias = alias_node
                    .map(|n| node_text(*n, src).to_string())
                    .filter(|a| !a.is_empty())
                    .or_else(|| self.alias_style.derive(&module));
                let Some(alias) = alias else { continue };
                let range = node_range(*alias_node.unwrap_or(module_node));
                fi.imports.insert(alias.clone(), module);
                fi.occurrences.push(Occurrence {
                    name: alias,
                    kind: OccurrenceKind::Import,
                    range,
                    symbol: None,
                });
                continue;
            }

            if let Some(ref_node) = captures.get("ref.name") {
                let name = node_text(*ref_node, src);
                if !name.is_empty() {
                    fi.occurrences.push(Occurrence {
                        name: name.to_string(),
                        kind: OccurrenceKind::Ref,
                        range: node_range(*ref_node),
                        symbol: None,
                    });
                }
            }
        }

        // Attribute references the file itself can account for: a reference
        // whose name the same file defines belongs to that identity.
        // Cross-file references stay as raw occurrences. The ref query also
        // re-captures definition name nodes, so ranges that coincide with
        // the definition itself are not counted as references.
        let mut attributed: Vec<(SymbolId, RefLocation)> = Vec::new();
        for occurrence in &fi.occurrences {
            if occurrence.kind != OccurrenceKind::Ref {
                continue;
            }
            let id = SymbolId::new(self.lang, &fi.file, None, &occurrence.name);
            match fi.defs.get(&id) {
                Some(def) if def.range != occurrence.range => {
                    attributed.push((
                        id,
                        RefLocation {
                            lang: self.lang.to_string(),
                            file: fi.file.clone(),
                            range: occurrence.range,
                        },
                    ));
                }
                _ => {}
            }
        }
        for (id, loc) in attributed {
            fi.refs.entry(id).or_default().push(loc);
        }

        Ok(fi)
    }

    /// Default resolution policy: a same-file definition with a matching
    /// name wins alone; otherwise every identity sharing the language and
    /// name is a candidate.
    fn resolve_at(
        &self,
        path: &str,
        _src: &[u8],
        occurrence: &Occurrence,
        index: &ProjectIndex,
    ) -> Vec<SymbolId> {
        if let Some(id) = index.local_definition(self.lang, path, &occurrence.name) {
            return vec![id];
        }
        index.lookup_name(self.lang, &occurrence.name)
    }
}

//! Per-file extraction results and the global project index
//!
//! The [`ProjectIndex`] is the single shared mutable resource of the engine.
//! All mutation funnels through the crate-private [`ProjectIndex::merge`]
//! under an exclusive lock; every public query method takes the shared lock
//! and returns a defensive copy, so readers never observe a half-merged file.

use crate::location::{DefLocation, Occurrence, RefLocation};
use crate::symbol_id::{normalize_path, SymbolId};
use std::collections::HashMap;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

/// Normalized output of one adapter invocation on one file.
///
/// Owned exclusively by the invoking worker until merged.
#[derive(Debug, Default)]
pub struct FileIndex {
    /// Stable short language tag (`go`, `ts`, `py`, ...)
    pub lang: String,
    /// Normalized file path
    pub file: String,
    /// Definitions keyed by identity; keys unique per file
    pub defs: HashMap<SymbolId, DefLocation>,
    /// References attributed to an identity during extraction
    pub refs: HashMap<SymbolId, Vec<RefLocation>>,
    /// All raw occurrences in extraction order
    pub occurrences: Vec<Occurrence>,
    /// Import-alias-to-target mapping
    pub imports: HashMap<String, String>,
}

impl FileIndex {
    pub fn new(lang: impl Into<String>, file: impl Into<String>) -> Self {
        Self {
            lang: lang.into(),
            file: normalize_path(&file.into()),
            ..Self::default()
        }
    }
}

#[derive(Debug, Default)]
struct IndexState {
    /// Identity -> definition, last-writer-wins per identity
    defs: HashMap<SymbolId, DefLocation>,
    /// Identity -> accumulated references, never overwritten
    refs: HashMap<SymbolId, Vec<RefLocation>>,
    /// `lang:name` -> identities of current definitions with that name
    name_lookup: HashMap<String, Vec<SymbolId>>,
    /// Normalized file path -> latest occurrence list
    file_occurrences: HashMap<String, Vec<Occurrence>>,
}

/// The global, concurrently-accessed store merging every file's extraction
/// result. Created empty at engine construction; mutated only through
/// `merge`; read by all query operations.
#[derive(Debug, Default)]
pub struct ProjectIndex {
    state: RwLock<IndexState>,
}

fn name_key(lang: &str, name: &str) -> String {
    format!("{lang}:{name}")
}

impl ProjectIndex {
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> RwLockReadGuard<'_, IndexState> {
        // A panicked worker cannot leave the maps half-written: merge builds
        // no intermediate state, so recover from poisoning.
        self.state.read().unwrap_or_else(|e| e.into_inner())
    }

    fn write(&self) -> RwLockWriteGuard<'_, IndexState> {
        self.state.write().unwrap_or_else(|e| e.into_inner())
    }

    /// Atomically fold one file's extraction result into the index.
    ///
    /// Definitions overwrite per identity and the reverse lookup is kept in
    /// sync (deduplicated, so `lang:name` maps to exactly the identities of
    /// current definitions with that name). Reference lists append. The
    /// file's occurrence list is replaced, so re-indexing a file does not
    /// accumulate stale occurrences.
    pub(crate) fn merge(&self, file_index: FileIndex) {
        let mut state = self.write();

        for (id, def) in file_index.defs {
            let key = name_key(&def.lang, &def.name);
            let ids = state.name_lookup.entry(key).or_default();
            if !ids.contains(&id) {
                ids.push(id.clone());
            }
            state.defs.insert(id, def);
        }

        for (id, refs) in file_index.refs {
            state.refs.entry(id).or_default().extend(refs);
        }

        state
            .file_occurrences
            .insert(file_index.file, file_index.occurrences);
    }

    /// Look up the definition stored for an identity.
    pub fn definition(&self, id: &SymbolId) -> Option<DefLocation> {
        self.read().defs.get(id).cloned()
    }

    /// Defensive copy of the full definition table.
    pub fn definitions(&self) -> HashMap<SymbolId, DefLocation> {
        self.read().defs.clone()
    }

    /// Defensive copy of the accumulated references for an identity.
    pub fn references(&self, id: &SymbolId) -> Vec<RefLocation> {
        self.read().refs.get(id).cloned().unwrap_or_default()
    }

    /// Defensive copy of the latest occurrence list for a file.
    pub fn file_occurrences(&self, file: &str) -> Vec<Occurrence> {
        self.read()
            .file_occurrences
            .get(file)
            .cloned()
            .unwrap_or_default()
    }

    /// All identities whose definitions share this language and name.
    pub fn lookup_name(&self, lang: &str, name: &str) -> Vec<SymbolId> {
        self.read()
            .name_lookup
            .get(&name_key(lang, name))
            .cloned()
            .unwrap_or_default()
    }

    /// The identity of a same-file definition with this name, if any.
    ///
    /// File-local shadowing wins over everything else in the default
    /// resolution policy.
    pub fn local_definition(&self, lang: &str, file: &str, name: &str) -> Option<SymbolId> {
        let state = self.read();
        let ids = state.name_lookup.get(&name_key(lang, name))?;
        ids.iter()
            .find(|id| {
                state
                    .defs
                    .get(*id)
                    .is_some_and(|d| d.lang == lang && d.file == file)
            })
            .cloned()
    }

    /// Summary counters over the current index contents.
    pub fn stats(&self) -> IndexStats {
        let state = self.read();
        IndexStats {
            files: state.file_occurrences.len(),
            definitions: state.defs.len(),
            references: state.refs.values().map(Vec::len).sum(),
            occurrences: state.file_occurrences.values().map(Vec::len).sum(),
        }
    }
}

/// Statistics about a project index
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct IndexStats {
    pub files: usize,
    pub definitions: usize,
    pub references: usize,
    pub occurrences: usize,
}

impl std::fmt::Display for IndexStats {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Project Index Statistics:")?;
        writeln!(f, "  Files: {}", self.files)?;
        writeln!(f, "  Definitions: {}", self.definitions)?;
        writeln!(f, "  References: {}", self.references)?;
        write!(f, "  Occurrences: {}", self.occurrences)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::location::{OccurrenceKind, Position, Range, SymbolKind};

    fn range(line: u32) -> Range {
        Range::new(Position::new(line, 1), Position::new(line, 8))
    }

    fn def(lang: &str, file: &str, name: &str, line: u32) -> (SymbolId, DefLocation) {
        let id = SymbolId::new(lang, file, None, name);
        let def = DefLocation {
            lang: lang.to_string(),
            file: file.to_string(),
            range: range(line),
            name: name.to_string(),
            kind: SymbolKind::Func,
        };
        (id, def)
    }

    fn file_with_def(lang: &str, file: &str, name: &str, line: u32) -> FileIndex {
        let mut fi = FileIndex::new(lang, file);
        let (id, d) = def(lang, file, name, line);
        fi.occurrences.push(Occurrence {
            name: name.to_string(),
            kind: OccurrenceKind::Def,
            range: d.range,
            symbol: Some(id.clone()),
        });
        fi.defs.insert(id, d);
        fi
    }

    #[test]
    fn test_idempotent_definition_overwrite() {
        let index = ProjectIndex::new();
        index.merge(file_with_def("go", "a.go", "add", 3));
        index.merge(file_with_def("go", "a.go", "add", 5));

        let defs = index.definitions();
        assert_eq!(defs.len(), 1);
        let id = SymbolId::new("go", "a.go", None, "add");
        assert_eq!(defs[&id].range, range(5));
        // Reverse lookup holds exactly one identity, not two
        assert_eq!(index.lookup_name("go", "add").len(), 1);
    }

    #[test]
    fn test_reference_accumulation_is_additive() {
        let index = ProjectIndex::new();
        let target = SymbolId::new("py", "lib.py", None, "helper");

        let mut a = FileIndex::new("py", "a.py");
        a.refs.insert(
            target.clone(),
            vec![
                RefLocation { lang: "py".into(), file: "a.py".into(), range: range(2) },
                RefLocation { lang: "py".into(), file: "a.py".into(), range: range(7) },
            ],
        );
        let mut b = FileIndex::new("py", "b.py");
        b.refs.insert(
            target.clone(),
            vec![RefLocation { lang: "py".into(), file: "b.py".into(), range: range(4) }],
        );

        index.merge(a);
        index.merge(b);
        assert_eq!(index.references(&target).len(), 3);
    }

    #[test]
    fn test_occurrences_replaced_on_reindex() {
        let index = ProjectIndex::new();
        index.merge(file_with_def("ts", "app.ts", "main", 1));
        index.merge(file_with_def("ts", "app.ts", "main", 1));
        assert_eq!(index.file_occurrences("app.ts").len(), 1);
    }

    #[test]
    fn test_name_lookup_spans_files() {
        let index = ProjectIndex::new();
        index.merge(file_with_def("py", "a.py", "foo", 1));
        index.merge(file_with_def("py", "b.py", "foo", 9));

        let ids = index.lookup_name("py", "foo");
        assert_eq!(ids.len(), 2);
        // Language-scoped: the same name in another language is invisible
        assert!(index.lookup_name("go", "foo").is_empty());
    }

    #[test]
    fn test_local_definition_prefers_matching_file() {
        let index = ProjectIndex::new();
        index.merge(file_with_def("py", "a.py", "foo", 1));
        index.merge(file_with_def("py", "b.py", "foo", 9));

        let local = index.local_definition("py", "b.py", "foo").unwrap();
        assert_eq!(local, SymbolId::new("py", "b.py", None, "foo"));
        assert!(index.local_definition("py", "c.py", "foo").is_none());
    }

    #[test]
    fn test_stats() {
        let index = ProjectIndex::new();
        index.merge(file_with_def("go", "a.go", "add", 3));
        let stats = index.stats();
        assert_eq!(stats.files, 1);
        assert_eq!(stats.definitions, 1);
        assert_eq!(stats.occurrences, 1);
    }
}

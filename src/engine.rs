//! Indexing pipeline and point queries
//!
//! The engine owns the adapter registry and the project index. Indexing
//! runs one discovery thread plus a fixed pool of worker threads; discovery
//! streams file paths into a bounded channel, workers drain it, and every
//! per-file failure skips that file without aborting the run.

use crate::adapter::AdapterRegistry;
use crate::ignore::IgnoreFilter;
use crate::index::{IndexStats, ProjectIndex};
use crate::location::{DefLocation, Occurrence, Position, RefLocation};
use crate::symbol_id::{normalize_path, SymbolId};
use crate::{Error, Result};
use crossbeam::channel::{Receiver, Sender};
use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};

const DEFAULT_WORKERS: usize = 4;
const QUEUE_DEPTH: usize = 512;

/// Tunables for the indexing pipeline.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Fixed size of the worker pool
    pub workers: usize,
    /// Extra gitignore-style patterns pruned during discovery
    pub extra_excludes: Vec<String>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            workers: DEFAULT_WORKERS,
            extra_excludes: Vec::new(),
        }
    }
}

/// The cross-reference engine: holds the project index and exposes
/// indexing and queries.
pub struct Engine {
    index: ProjectIndex,
    registry: AdapterRegistry,
    config: EngineConfig,
}

impl Engine {
    /// Create an engine with the default adapter registry.
    ///
    /// Construction is the only fatal error site: a query pack that fails
    /// to compile would silently under-index every file of that language,
    /// so the failure propagates instead of being swallowed.
    pub fn new() -> Result<Self> {
        Ok(Self::with_registry(crate::adapter::default_registry()?))
    }

    /// Create an engine with a caller-supplied registry.
    pub fn with_registry(registry: AdapterRegistry) -> Self {
        Self::with_config(registry, EngineConfig::default())
    }

    pub fn with_config(registry: AdapterRegistry, config: EngineConfig) -> Self {
        Self {
            index: ProjectIndex::new(),
            registry,
            config,
        }
    }

    pub fn index(&self) -> &ProjectIndex {
        &self.index
    }

    /// Index a single root directory or file.
    pub fn index_root(&self, root: impl AsRef<Path>) -> Result<()> {
        self.index_paths([root.as_ref()])
    }

    /// Index the given files and directories with bounded parallelism.
    ///
    /// Never aborts the whole run on a single file's failure; the final
    /// state of the project index is the only completion signal.
    pub fn index_paths<I, P>(&self, paths: I) -> Result<()>
    where
        I: IntoIterator<Item = P>,
        P: AsRef<Path>,
    {
        let roots: Vec<PathBuf> = paths
            .into_iter()
            .map(|p| p.as_ref().to_path_buf())
            .collect();

        let (tx, rx) = crossbeam::channel::bounded::<PathBuf>(QUEUE_DEPTH);

        std::thread::scope(|scope| {
            let excludes = &self.config.extra_excludes;
            scope.spawn(move || discover(&roots, excludes, tx));

            for _ in 0..self.config.workers.max(1) {
                let rx: Receiver<PathBuf> = rx.clone();
                scope.spawn(move || {
                    for path in rx {
                        self.index_file(&path);
                    }
                });
            }
        });

        let stats = self.index.stats();
        tracing::info!(
            files = stats.files,
            definitions = stats.definitions,
            "indexing complete"
        );
        Ok(())
    }

    /// Parse, extract, and merge one file. Every failure here is
    /// per-file-recoverable: log and skip.
    fn index_file(&self, path: &Path) {
        let file = normalize_path(&path.to_string_lossy());

        let src = match std::fs::read(path) {
            Ok(src) => src,
            Err(e) => {
                tracing::debug!(file = %file, error = %e, "skipping unreadable file");
                return;
            }
        };
        let Some(adapter) = self.registry.find_adapter(path) else {
            tracing::trace!(file = %file, "no adapter, skipping");
            return;
        };
        let tree = match adapter.parse(&file, &src) {
            Ok(tree) => tree,
            Err(e) => {
                tracing::warn!(file = %file, error = %e, "parse failed, skipping");
                return;
            }
        };
        match adapter.extract(&file, &src, &tree) {
            Ok(file_index) => self.index.merge(file_index),
            Err(e) => {
                tracing::warn!(file = %file, error = %e, "extraction failed, skipping");
            }
        }
    }

    /// "Go to definition" for the symbol at a cursor position.
    ///
    /// Returns the definition together with the candidate identities that
    /// were considered. Read-only with respect to the project index and
    /// deterministic given a stable index.
    pub fn find_definition_at(
        &self,
        file: &str,
        line: u32,
        col: u32,
    ) -> Result<(DefLocation, Vec<SymbolId>)> {
        // Lookups must hit the same keys produced at merge time
        let file = normalize_path(file);

        let occurrences = self.index.file_occurrences(&file);
        let position = Position::new(line, col);
        // First containing occurrence in stored (extraction) order wins
        let occurrence = occurrences
            .iter()
            .find(|o| o.range.contains(position))
            .ok_or(Error::NoIdentifierAtPosition)?;

        let adapter = self
            .registry
            .find_adapter(Path::new(&file))
            .ok_or_else(|| Error::NoAdapterForFile(file.clone()))?;

        let src = std::fs::read(&file).unwrap_or_default();
        let candidates = adapter.resolve_at(&file, &src, occurrence, &self.index);

        match candidates.iter().find_map(|id| self.index.definition(id)) {
            Some(def) => Ok((def, candidates)),
            None => Err(Error::DefinitionNotFound { candidates }),
        }
    }

    /// Defensive copy of the accumulated references for an identity.
    pub fn find_references(&self, id: &SymbolId) -> Vec<RefLocation> {
        self.index.references(id)
    }

    /// Defensive copy of the full definition table.
    pub fn definitions(&self) -> HashMap<SymbolId, DefLocation> {
        self.index.definitions()
    }

    /// All definitions sorted by file, then kind, then name.
    pub fn definition_tree(&self) -> Vec<DefLocation> {
        let mut defs: Vec<DefLocation> = self.index.definitions().into_values().collect();
        defs.sort_by(|a, b| {
            a.file
                .cmp(&b.file)
                .then_with(|| a.kind.as_str().cmp(b.kind.as_str()))
                .then_with(|| a.name.cmp(&b.name))
        });
        defs
    }

    /// Defensive copy of a file's occurrence list (diagnostic use).
    pub fn file_occurrences(&self, file: &str) -> Vec<Occurrence> {
        self.index.file_occurrences(&normalize_path(file))
    }

    pub fn stats(&self) -> IndexStats {
        self.index.stats()
    }
}

/// Discovery stage: files are enqueued directly, directories are walked
/// recursively with whole-subtree pruning of non-source directories.
/// Closes the channel when enumeration finishes.
fn discover(roots: &[PathBuf], extra_excludes: &[String], tx: Sender<PathBuf>) {
    let mut seen_dirs: HashSet<PathBuf> = HashSet::new();

    for root in roots {
        let Ok(metadata) = std::fs::metadata(root) else {
            tracing::debug!(root = %root.display(), "cannot stat, skipping");
            continue;
        };

        if metadata.is_file() {
            if tx.send(root.clone()).is_err() {
                return;
            }
            continue;
        }

        if !seen_dirs.insert(root.clone()) {
            continue;
        }

        let filter = IgnoreFilter::new(root, extra_excludes);
        let walker = walkdir::WalkDir::new(root)
            .into_iter()
            .filter_entry(|entry| {
                !(entry.file_type().is_dir() && filter.is_ignored(entry.path(), true))
            });

        for entry in walker.filter_map(|e| e.ok()) {
            if !entry.file_type().is_file() {
                continue;
            }
            if tx.send(entry.into_path()).is_err() {
                return;
            }
        }
    }
    // tx drops here, closing the queue and terminating the workers
}

//! The per-run dependency graph, built with minimal re-resolution.
//!
//! Edges for a file are discovered at most once per run. Files that are
//! provably unchanged reuse their edge list from the prior run's graph
//! verbatim, which is the core incremental speedup: stable files are never
//! re-parsed for dependencies.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use stale_diagnostics::DiagnosticSink;

use crate::error::EngineError;
use crate::hasher::HashIndex;
use crate::resolver::{DependencyResolver, ResolverAdapter};

/// Direct-dependency edges for this run (`current`) and the last recorded
/// run (`prior`).
///
/// `current` is append-only within a run: once a path has an entry it is
/// never revisited, so each file is resolved at most once. The graph may
/// contain cycles and self-edges; consumers must tolerate both.
pub struct GraphStore {
    current: HashMap<PathBuf, Vec<PathBuf>>,
    prior: HashMap<PathBuf, Vec<PathBuf>>,
}

impl GraphStore {
    /// Creates a store seeded with the prior run's graph.
    pub fn new(prior: HashMap<PathBuf, Vec<PathBuf>>) -> Self {
        Self {
            current: HashMap::new(),
            prior,
        }
    }

    /// Ensures the current graph covers everything reachable from `root`.
    ///
    /// For each file not yet processed this run: if its content is unchanged
    /// and the prior graph recorded its edges, those edges are reused
    /// verbatim; otherwise the resolver is consulted. Edge targets are then
    /// processed in turn until the reachable closure is complete.
    ///
    /// Uses an explicit work-stack so pathological dependency depth cannot
    /// overflow the call stack. Idempotent: a root already covered returns
    /// immediately.
    pub fn ensure<R: DependencyResolver>(
        &mut self,
        root: &Path,
        hashes: &mut HashIndex,
        adapter: &mut ResolverAdapter<R>,
        sink: &DiagnosticSink,
    ) -> Result<(), EngineError> {
        let mut pending = vec![root.to_path_buf()];

        while let Some(path) = pending.pop() {
            if self.current.contains_key(&path) {
                continue;
            }

            let edges = if !hashes.file_changed(&path)? {
                match self.prior.get(&path) {
                    Some(prior_edges) => prior_edges.clone(),
                    None => adapter.discover(&path, sink),
                }
            } else {
                adapter.discover(&path, sink)
            };

            for dep in &edges {
                if !self.current.contains_key(dep) {
                    pending.push(dep.clone());
                }
            }
            self.current.insert(path, edges);
        }

        Ok(())
    }

    /// Returns the direct dependencies recorded for `path` this run.
    ///
    /// A path with no entry contributes no edges.
    pub fn direct_deps(&self, path: &Path) -> &[PathBuf] {
        self.current.get(path).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Returns `true` if `path` has an entry in the current graph.
    pub fn contains(&self, path: &Path) -> bool {
        self.current.contains_key(path)
    }

    /// Returns the edges recorded this run.
    pub fn current(&self) -> &HashMap<PathBuf, Vec<PathBuf>> {
        &self.current
    }

    /// Consumes the store, yielding `(current, prior)` for the final merge.
    pub fn into_parts(
        self,
    ) -> (
        HashMap<PathBuf, Vec<PathBuf>>,
        HashMap<PathBuf, Vec<PathBuf>>,
    ) {
        (self.current, self.prior)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resolver::{Resolution, ResolveError};
    use stale_common::ContentHash;
    use std::collections::HashSet;
    use std::fs;

    struct Scripted {
        deps: HashMap<PathBuf, Vec<PathBuf>>,
        fail: HashSet<PathBuf>,
        calls: Vec<PathBuf>,
    }

    impl Scripted {
        fn new() -> Self {
            Self {
                deps: HashMap::new(),
                fail: HashSet::new(),
                calls: Vec::new(),
            }
        }
    }

    impl DependencyResolver for Scripted {
        fn resolve(&mut self, path: &Path) -> Result<Resolution, ResolveError> {
            self.calls.push(path.to_path_buf());
            if self.fail.contains(path) {
                return Err(ResolveError::new(path, "scripted failure"));
            }
            Ok(Resolution::new(
                self.deps.get(path).cloned().unwrap_or_default(),
            ))
        }
    }

    fn write_file(dir: &Path, name: &str, content: &str) -> PathBuf {
        let path = dir.join(name);
        fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn builds_reachable_closure() {
        let dir = tempfile::tempdir().unwrap();
        let a = write_file(dir.path(), "a.py", "a\n");
        let b = write_file(dir.path(), "b.py", "b\n");
        let c = write_file(dir.path(), "c.py", "c\n");

        let mut resolver = Scripted::new();
        resolver.deps.insert(a.clone(), vec![b.clone()]);
        resolver.deps.insert(b.clone(), vec![c.clone()]);

        let mut graph = GraphStore::new(HashMap::new());
        let mut hashes = HashIndex::new(HashMap::new());
        let mut adapter = ResolverAdapter::new(resolver);
        let sink = DiagnosticSink::new();

        graph.ensure(&a, &mut hashes, &mut adapter, &sink).unwrap();

        assert_eq!(graph.direct_deps(&a), &[b.clone()]);
        assert_eq!(graph.direct_deps(&b), &[c.clone()]);
        assert!(graph.direct_deps(&c).is_empty());
    }

    #[test]
    fn ensure_is_idempotent_within_run() {
        let dir = tempfile::tempdir().unwrap();
        let a = write_file(dir.path(), "a.py", "a\n");

        let mut graph = GraphStore::new(HashMap::new());
        let mut hashes = HashIndex::new(HashMap::new());
        let mut adapter = ResolverAdapter::new(Scripted::new());
        let sink = DiagnosticSink::new();

        graph.ensure(&a, &mut hashes, &mut adapter, &sink).unwrap();
        graph.ensure(&a, &mut hashes, &mut adapter, &sink).unwrap();

        // Resolved exactly once despite the second ensure.
        assert_eq!(adapter.resolver().calls.len(), 1);
    }

    #[test]
    fn unchanged_file_reuses_prior_edges() {
        let dir = tempfile::tempdir().unwrap();
        let a = write_file(dir.path(), "a.py", "stable\n");
        let b = write_file(dir.path(), "b.py", "dep\n");

        let mut prior_hashes = HashMap::new();
        prior_hashes.insert(a.clone(), ContentHash::from_bytes(b"stable\n"));
        prior_hashes.insert(b.clone(), ContentHash::from_bytes(b"dep\n"));
        let mut prior_graph = HashMap::new();
        prior_graph.insert(a.clone(), vec![b.clone()]);
        prior_graph.insert(b.clone(), Vec::new());

        let mut graph = GraphStore::new(prior_graph);
        let mut hashes = HashIndex::new(prior_hashes);
        let mut adapter = ResolverAdapter::new(Scripted::new());
        let sink = DiagnosticSink::new();

        graph.ensure(&a, &mut hashes, &mut adapter, &sink).unwrap();

        assert_eq!(graph.direct_deps(&a), &[b.clone()]);
        assert_eq!(adapter.resolver().calls.len(), 0, "stable files skip resolution");
    }

    #[test]
    fn changed_file_is_rediscovered() {
        let dir = tempfile::tempdir().unwrap();
        let a = write_file(dir.path(), "a.py", "new content\n");

        let mut prior_hashes = HashMap::new();
        prior_hashes.insert(a.clone(), ContentHash::from_bytes(b"old content\n"));
        let mut prior_graph = HashMap::new();
        prior_graph.insert(a.clone(), vec![PathBuf::from("/stale/edge.py")]);

        let mut graph = GraphStore::new(prior_graph);
        let mut hashes = HashIndex::new(prior_hashes);
        let mut adapter = ResolverAdapter::new(Scripted::new());
        let sink = DiagnosticSink::new();

        graph.ensure(&a, &mut hashes, &mut adapter, &sink).unwrap();

        // Fresh resolution replaced the stale prior edge list.
        assert!(graph.direct_deps(&a).is_empty());
        assert_eq!(adapter.resolver().calls.len(), 1);
    }

    #[test]
    fn cyclic_graph_terminates() {
        let dir = tempfile::tempdir().unwrap();
        let a = write_file(dir.path(), "a.py", "a\n");
        let b = write_file(dir.path(), "b.py", "b\n");

        let mut resolver = Scripted::new();
        resolver.deps.insert(a.clone(), vec![b.clone()]);
        resolver.deps.insert(b.clone(), vec![a.clone()]);

        let mut graph = GraphStore::new(HashMap::new());
        let mut hashes = HashIndex::new(HashMap::new());
        let mut adapter = ResolverAdapter::new(resolver);
        let sink = DiagnosticSink::new();

        graph.ensure(&a, &mut hashes, &mut adapter, &sink).unwrap();

        assert_eq!(graph.direct_deps(&a), &[b.clone()]);
        assert_eq!(graph.direct_deps(&b), &[a.clone()]);
    }

    #[test]
    fn failed_resolution_leaves_a_leaf() {
        let dir = tempfile::tempdir().unwrap();
        let a = write_file(dir.path(), "a.py", "a\n");
        let broken = write_file(dir.path(), "broken.py", "b\n");

        let mut resolver = Scripted::new();
        resolver.deps.insert(a.clone(), vec![broken.clone()]);
        resolver.fail.insert(broken.clone());

        let mut graph = GraphStore::new(HashMap::new());
        let mut hashes = HashIndex::new(HashMap::new());
        let mut adapter = ResolverAdapter::new(resolver);
        let sink = DiagnosticSink::new();

        graph.ensure(&a, &mut hashes, &mut adapter, &sink).unwrap();

        assert_eq!(graph.direct_deps(&a), &[broken.clone()]);
        assert!(graph.direct_deps(&broken).is_empty());
    }

    #[test]
    fn unreadable_file_propagates() {
        let mut graph = GraphStore::new(HashMap::new());
        let mut hashes = HashIndex::new(HashMap::new());
        let mut adapter = ResolverAdapter::new(Scripted::new());
        let sink = DiagnosticSink::new();

        let result = graph.ensure(
            Path::new("/nonexistent/root.py"),
            &mut hashes,
            &mut adapter,
            &sink,
        );
        assert!(matches!(result, Err(EngineError::Io { .. })));
    }
}

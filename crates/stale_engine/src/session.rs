//! The owning context for one run, from snapshot load to durable write.
//!
//! A [`RunSession`] is the boundary the host test runner talks to: it asks
//! per queried unit whether the unit's tests may be skipped, reports test
//! outcomes back, and finalizes the run exactly once. All mutable engine
//! state lives here; there are no globals.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use stale_config::RunConfig;
use stale_diagnostics::{Diagnostic, DiagnosticSink};

use crate::detector::ChangeDetector;
use crate::error::EngineError;
use crate::graph::GraphStore;
use crate::hasher::HashIndex;
use crate::resolver::{DependencyResolver, ResolverAdapter};
use crate::snapshot::Snapshot;

/// The answer to "should this unit's tests run?".
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    /// Nothing in the unit's dependency closure changed; the caller may skip it.
    Skip,
    /// The unit or something it depends on changed; the caller should run it.
    Run,
    /// The engine abstains (no known source location); the caller decides,
    /// conservatively by running the unit.
    Undetermined,
}

/// One run's worth of change-detection state.
///
/// Construction loads the prior snapshot (fail-safe: a missing or corrupt
/// snapshot is a cold start where everything registers as changed).
/// [`finish`](Self::finish) consumes the session and performs the single
/// durable write; a session that is dropped instead persists nothing, and
/// the next run falls back to whatever was last saved.
pub struct RunSession<R> {
    snapshot_path: PathBuf,
    hashes: HashIndex,
    graph: GraphStore,
    detector: ChangeDetector,
    adapter: ResolverAdapter<R>,
    failed: HashSet<PathBuf>,
    sink: DiagnosticSink,
}

impl<R: DependencyResolver> RunSession<R> {
    /// Opens a session for the configured working directory.
    pub fn new(config: &RunConfig, resolver: R) -> Self {
        let snapshot_path = config.snapshot_path();
        let sink = DiagnosticSink::new();

        let prior = match Snapshot::load(&snapshot_path) {
            Some(snapshot) => snapshot,
            None => {
                sink.emit(
                    Diagnostic::note("no usable snapshot, starting cold")
                        .with_path(&snapshot_path),
                );
                Snapshot::new()
            }
        };

        Self {
            snapshot_path,
            hashes: HashIndex::new(prior.hashes),
            graph: GraphStore::new(prior.graph),
            detector: ChangeDetector::new(),
            adapter: ResolverAdapter::new(resolver),
            failed: HashSet::new(),
            sink,
        }
    }

    /// Decides whether the unit backed by `source` needs to run.
    ///
    /// `None` means the host could not determine a source location for the
    /// unit; the engine abstains with [`Verdict::Undetermined`]. Otherwise
    /// the dependency graph under the path is brought up to date and the
    /// transitive change verdict computed. An unreadable file is a hard
    /// error: it cannot be judged unchanged, so the failure propagates.
    pub fn query(&mut self, source: Option<&Path>) -> Result<Verdict, EngineError> {
        let Some(path) = source else {
            return Ok(Verdict::Undetermined);
        };

        self.graph
            .ensure(path, &mut self.hashes, &mut self.adapter, &self.sink)?;
        let changed = self
            .detector
            .changed(path, &[], &mut self.hashes, &self.graph)?;

        Ok(if changed { Verdict::Run } else { Verdict::Skip })
    }

    /// Records a test outcome for the unit backed by `source`.
    ///
    /// Pass `false` for tests that failed or never completed. Their source
    /// file's hash entry is purged at [`finish`](Self::finish), forcing the
    /// file to register as changed on the next run regardless of content.
    pub fn record_outcome(&mut self, source: &Path, passed: bool) {
        if !passed {
            self.failed.insert(source.to_path_buf());
        }
    }

    /// Finalizes the run: merges this run's findings into the prior state
    /// and writes the snapshot durably.
    ///
    /// The output starts from this run's entries; prior entries are added
    /// only for keys not recomputed this run, so fresher values always win.
    /// Hash entries for failed modules are then removed. Their graph edges
    /// are kept: the next run re-hashes the file, sees it as changed, and
    /// re-resolves.
    pub fn finish(self) -> Result<(), EngineError> {
        let (mut hashes, prior_hashes) = self.hashes.into_parts();
        for (path, hash) in prior_hashes {
            hashes.entry(path).or_insert(hash);
        }

        let (mut graph, prior_graph) = self.graph.into_parts();
        for (path, edges) in prior_graph {
            graph.entry(path).or_insert(edges);
        }

        for module in &self.failed {
            self.sink
                .emit(Diagnostic::note("module had failures, invalidating").with_path(module));
            hashes.remove(module);
        }

        let snapshot = Snapshot { hashes, graph };
        snapshot.save(&self.snapshot_path)
    }

    /// Returns the sink collecting this session's diagnostics.
    pub fn sink(&self) -> &DiagnosticSink {
        &self.sink
    }
}

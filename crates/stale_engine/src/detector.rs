//! The transitive change verdict: memoized, cycle-aware recursion.
//!
//! A file is "changed" if its own content changed, or if anything reachable
//! from it through dependency edges changed. Verdicts are memoized for the
//! whole run, and a call-path ancestor list breaks cycles.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use crate::error::EngineError;
use crate::graph::GraphStore;
use crate::hasher::HashIndex;

/// Run-wide memo of changed/unchanged verdicts.
///
/// A file's verdict is computed once per run even when it is reachable from
/// many queried roots.
pub struct ChangeDetector {
    memo: HashMap<PathBuf, bool>,
}

impl ChangeDetector {
    /// Creates an empty detector.
    pub fn new() -> Self {
        Self {
            memo: HashMap::new(),
        }
    }

    /// Returns whether `path` or anything it transitively depends on changed.
    ///
    /// `ancestors` is the chain of paths currently being resolved above this
    /// call, empty at the top level. A dependency already on the chain is
    /// not recursed into: a cycle member cannot independently force a
    /// "changed" verdict through the cycle edge, and each member still gets
    /// its own verdict when queried from the top.
    ///
    /// Own-change is checked before dependencies so a modified file
    /// short-circuits the graph walk. The first changed dependency settles
    /// the verdict.
    pub fn changed(
        &mut self,
        path: &Path,
        ancestors: &[PathBuf],
        hashes: &mut HashIndex,
        graph: &GraphStore,
    ) -> Result<bool, EngineError> {
        if let Some(&verdict) = self.memo.get(path) {
            return Ok(verdict);
        }

        let verdict = if hashes.file_changed(path)? {
            true
        } else {
            let mut chain = ancestors.to_vec();
            chain.push(path.to_path_buf());

            let mut changed = false;
            for dep in graph.direct_deps(path) {
                if chain.contains(dep) {
                    continue;
                }
                if self.changed(dep, &chain, hashes, graph)? {
                    changed = true;
                    break;
                }
            }
            changed
        };

        self.memo.insert(path.to_path_buf(), verdict);
        Ok(verdict)
    }

    /// Returns the memoized verdict for `path`, if one was computed this run.
    pub fn verdict(&self, path: &Path) -> Option<bool> {
        self.memo.get(path).copied()
    }
}

impl Default for ChangeDetector {
    fn default() -> Self {
        Self::new()
    }
}

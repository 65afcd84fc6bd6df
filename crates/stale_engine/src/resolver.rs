//! The dependency-discovery boundary and its filtering adapter.
//!
//! The engine does not parse source languages itself; an external resolver
//! supplies each file's direct dependencies. Resolvers fail, and they return
//! paths that do not exist. The [`ResolverAdapter`] absorbs both: failing
//! files become leaves, bogus paths are dropped, and every such path is
//! remembered so the resolver is never consulted about it again.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use stale_diagnostics::{Diagnostic, DiagnosticSink};

/// The error a resolver reports when it cannot determine dependencies.
#[derive(Debug, thiserror::Error)]
#[error("dependency resolution failed for {path}: {reason}")]
pub struct ResolveError {
    /// The file the resolver was asked about.
    pub path: PathBuf,
    /// Description of the failure.
    pub reason: String,
}

impl ResolveError {
    /// Creates a new resolution error.
    pub fn new(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            reason: reason.into(),
        }
    }
}

/// A resolver's raw output for one file.
#[derive(Debug, Clone, Default)]
pub struct Resolution {
    /// Direct dependencies in the resolver's order. May contain duplicates,
    /// self-references, and paths that do not exist; the adapter filters.
    pub dependencies: Vec<PathBuf>,
    /// Extra resolver output, preserved for the host's benefit but unused by
    /// the engine.
    pub auxiliary: Vec<String>,
}

impl Resolution {
    /// Creates a resolution with the given dependency list and no auxiliary data.
    pub fn new(dependencies: Vec<PathBuf>) -> Self {
        Self {
            dependencies,
            auxiliary: Vec::new(),
        }
    }
}

/// The external dependency-discovery collaborator.
///
/// Implementations are called at most once per path per run; results for
/// unchanged files are reused from the prior run's graph without consulting
/// the resolver at all.
pub trait DependencyResolver {
    /// Returns the direct dependencies of `path`.
    fn resolve(&mut self, path: &Path) -> Result<Resolution, ResolveError>;
}

/// Wraps a [`DependencyResolver`] and filters its output to existing,
/// non-ignored files.
///
/// The adapter owns the set of ignored paths: files the resolver failed on
/// and paths it returned that do not exist on disk. Membership is
/// write-once; an ignored path never reaches the resolver again and never
/// appears as a dependency edge.
pub struct ResolverAdapter<R> {
    resolver: R,
    ignored: HashSet<PathBuf>,
}

impl<R: DependencyResolver> ResolverAdapter<R> {
    /// Creates an adapter around the given resolver.
    pub fn new(resolver: R) -> Self {
        Self {
            resolver,
            ignored: HashSet::new(),
        }
    }

    /// Returns the valid direct dependencies of `path`.
    ///
    /// Any resolver failure (structural or otherwise) marks `path` ignored
    /// and yields an empty list: a file whose dependencies cannot be
    /// determined is treated as a leaf. It can still be judged by its own
    /// hash; it just contributes no transitive edges.
    ///
    /// Surviving candidates keep the resolver's ordering.
    pub fn discover(&mut self, path: &Path, sink: &DiagnosticSink) -> Vec<PathBuf> {
        if self.ignored.contains(path) {
            return Vec::new();
        }

        let resolution = match self.resolver.resolve(path) {
            Ok(resolution) => resolution,
            Err(err) => {
                self.ignored.insert(path.to_path_buf());
                sink.emit(
                    Diagnostic::warning(format!(
                        "treating file as a leaf, resolver failed: {}",
                        err.reason
                    ))
                    .with_path(path),
                );
                return Vec::new();
            }
        };

        let mut valid = Vec::new();
        for dep in resolution.dependencies {
            if self.ignored.contains(&dep) {
                // previously classified
            } else if !dep.is_file() {
                sink.emit(
                    Diagnostic::note("resolver returned a path that does not exist")
                        .with_path(&dep),
                );
                self.ignored.insert(dep);
            } else {
                valid.push(dep);
            }
        }
        valid
    }

    /// Returns `true` if the path has been marked ignored.
    pub fn is_ignored(&self, path: &Path) -> bool {
        self.ignored.contains(path)
    }

    /// Returns a reference to the wrapped resolver.
    pub fn resolver(&self) -> &R {
        &self.resolver
    }
}

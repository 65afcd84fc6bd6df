//! Incremental change detection for test selection.
//!
//! This crate decides, for a source file participating in a test run, whether
//! that file or anything it transitively depends on has changed since the last
//! recorded run. A host test runner uses the answer to skip tests whose entire
//! dependency closure is provably unchanged.
//!
//! The moving parts, leaf-first:
//!
//! - [`hasher`]: content hashing and the per-run hash index.
//! - [`resolver`]: the external dependency-discovery boundary and the adapter
//!   that filters its output.
//! - [`graph`]: the per-run dependency graph, seeded from the prior run's
//!   edges where files are provably unchanged.
//! - [`detector`]: the memoized, cycle-aware transitive change verdict.
//! - [`snapshot`]: the persisted `{hashes, graph}` state that survives
//!   process restarts.
//! - [`session`]: the owning context tying it all together for one run.

#![warn(missing_docs)]

pub mod detector;
pub mod error;
pub mod graph;
pub mod hasher;
pub mod resolver;
pub mod session;
pub mod snapshot;

pub use detector::ChangeDetector;
pub use error::EngineError;
pub use graph::GraphStore;
pub use hasher::{HashIndex, SourceHasher};
pub use resolver::{DependencyResolver, Resolution, ResolveError, ResolverAdapter};
pub use session::{RunSession, Verdict};
pub use snapshot::Snapshot;

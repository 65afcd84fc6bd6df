//! Error types for engine operations.

use std::path::PathBuf;

/// Errors that can escape the engine to its caller.
///
/// Most problems are absorbed into conservative behavior (a file whose
/// dependencies cannot be resolved is treated as a leaf; a corrupt snapshot
/// is a cold start). What remains fatal is I/O the engine cannot paper over:
/// a file that cannot be read cannot be judged unchanged.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    /// An I/O error occurred while reading a source file or writing the snapshot.
    #[error("I/O error at {path}: {source}")]
    Io {
        /// The path that caused the error.
        path: PathBuf,
        /// The underlying I/O error.
        source: std::io::Error,
    },

    /// The snapshot could not be encoded for writing.
    #[error("failed to encode snapshot: {reason}")]
    Serialization {
        /// Description of the encoding failure.
        reason: String,
    },
}

impl EngineError {
    /// Wraps an I/O error with the path it occurred at.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

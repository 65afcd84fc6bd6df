//! Structured diagnostic messages with severity and an optional subject path.

use crate::severity::Severity;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};

/// A structured diagnostic describing a non-fatal event during a run.
///
/// Unlike compiler diagnostics there are no source spans here; the subject of
/// an event is a whole file, so a diagnostic carries at most one path.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Diagnostic {
    /// The severity level of this diagnostic.
    pub severity: Severity,
    /// The main diagnostic message.
    pub message: String,
    /// The file the event is about, if any.
    pub path: Option<PathBuf>,
}

impl Diagnostic {
    /// Creates a note-level diagnostic.
    pub fn note(message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Note,
            message: message.into(),
            path: None,
        }
    }

    /// Creates a warning-level diagnostic.
    pub fn warning(message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Warning,
            message: message.into(),
            path: None,
        }
    }

    /// Creates an error-level diagnostic.
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Error,
            message: message.into(),
            path: None,
        }
    }

    /// Attaches the subject path to this diagnostic.
    pub fn with_path(mut self, path: impl AsRef<Path>) -> Self {
        self.path = Some(path.as_ref().to_path_buf());
        self
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.path {
            Some(path) => write!(f, "{}: {}: {}", self.severity, path.display(), self.message),
            None => write!(f, "{}: {}", self.severity, self.message),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_note() {
        let diag = Diagnostic::note("starting cold, no usable snapshot");
        assert_eq!(diag.severity, Severity::Note);
        assert!(diag.path.is_none());
    }

    #[test]
    fn with_path_attaches_subject() {
        let diag = Diagnostic::warning("resolver returned a path that does not exist")
            .with_path("/src/ghost.py");
        assert_eq!(diag.path.as_deref(), Some(Path::new("/src/ghost.py")));
    }

    #[test]
    fn display_with_path() {
        let diag = Diagnostic::note("treated as a leaf").with_path("/src/broken.py");
        let s = format!("{diag}");
        assert_eq!(s, "note: /src/broken.py: treated as a leaf");
    }

    #[test]
    fn display_without_path() {
        let diag = Diagnostic::error("snapshot directory is not writable");
        assert_eq!(format!("{diag}"), "error: snapshot directory is not writable");
    }

    #[test]
    fn serde_roundtrip() {
        let diag = Diagnostic::warning("bad path").with_path("/a/b");
        let json = serde_json::to_string(&diag).unwrap();
        let back: Diagnostic = serde_json::from_str(&json).unwrap();
        assert_eq!(back.severity, Severity::Warning);
        assert_eq!(back.message, "bad path");
        assert_eq!(back.path.as_deref(), Some(Path::new("/a/b")));
    }
}

//! The persisted `{hashes, graph}` state that survives process restarts.
//!
//! The snapshot file is a small binary container: a 4-byte little-endian
//! header length, a header with magic bytes, format version, engine version,
//! and a payload checksum, then the encoded hash and graph maps. Reads are
//! fail-safe: any problem at all loads as "no prior state", a cold start
//! where every file registers as changed. Writes go through a temporary
//! sibling plus rename so a crash mid-write cannot corrupt the next run's
//! load.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use stale_common::ContentHash;

use crate::error::EngineError;

/// Magic bytes identifying a stale snapshot file.
const SNAPSHOT_MAGIC: [u8; 4] = *b"STAL";

/// Current snapshot format version. Increment on breaking changes to the
/// header or payload layout.
const SNAPSHOT_FORMAT_VERSION: u32 = 1;

/// Engine version baked into every snapshot for compatibility checks.
const ENGINE_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Header prepended to every snapshot for validation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SnapshotHeader {
    /// Magic bytes: must be `b"STAL"`.
    pub magic: [u8; 4],

    /// Snapshot format version.
    pub format_version: u32,

    /// Engine version that produced this snapshot.
    pub engine_version: String,

    /// Content hash of the payload (for integrity checks).
    pub checksum: ContentHash,
}

/// The logical persisted state: per-file content hashes and dependency edges.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Snapshot {
    /// Content hash of every file as of the run that recorded it.
    pub hashes: HashMap<PathBuf, ContentHash>,

    /// Direct-dependency edges of every file as of the run that recorded them.
    pub graph: HashMap<PathBuf, Vec<PathBuf>>,
}

impl Snapshot {
    /// Creates an empty snapshot.
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads a snapshot, returning `None` on any problem.
    ///
    /// Missing file, truncation, bad magic, format or engine version
    /// mismatch, checksum failure, and undecodable payloads all yield
    /// `None`. The caller treats that as a cold start; it must never crash
    /// the run.
    pub fn load(path: &Path) -> Option<Self> {
        let raw = std::fs::read(path).ok()?;

        if raw.len() < 4 {
            return None;
        }
        let header_len = u32::from_le_bytes(raw[..4].try_into().ok()?) as usize;
        if raw.len() < 4 + header_len {
            return None;
        }

        let header: SnapshotHeader =
            bincode::serde::decode_from_slice(&raw[4..4 + header_len], bincode::config::standard())
                .ok()?
                .0;

        if header.magic != SNAPSHOT_MAGIC {
            return None;
        }
        if header.format_version != SNAPSHOT_FORMAT_VERSION {
            return None;
        }
        if header.engine_version != ENGINE_VERSION {
            return None;
        }

        let payload = &raw[4 + header_len..];
        if ContentHash::from_bytes(payload) != header.checksum {
            return None;
        }

        bincode::serde::decode_from_slice(payload, bincode::config::standard())
            .ok()
            .map(|(snapshot, _)| snapshot)
    }

    /// Writes the snapshot durably, replacing any existing file.
    ///
    /// The encoded bytes are written to a `.tmp` sibling first and renamed
    /// over the target, so a partially-written file never shadows the last
    /// good snapshot.
    pub fn save(&self, path: &Path) -> Result<(), EngineError> {
        let payload = bincode::serde::encode_to_vec(self, bincode::config::standard()).map_err(
            |e| EngineError::Serialization {
                reason: e.to_string(),
            },
        )?;

        let header = SnapshotHeader {
            magic: SNAPSHOT_MAGIC,
            format_version: SNAPSHOT_FORMAT_VERSION,
            engine_version: ENGINE_VERSION.to_string(),
            checksum: ContentHash::from_bytes(&payload),
        };
        let header_bytes = bincode::serde::encode_to_vec(&header, bincode::config::standard())
            .map_err(|e| EngineError::Serialization {
                reason: e.to_string(),
            })?;

        let header_len = header_bytes.len() as u32;
        let mut output = Vec::with_capacity(4 + header_bytes.len() + payload.len());
        output.extend_from_slice(&header_len.to_le_bytes());
        output.extend_from_slice(&header_bytes);
        output.extend_from_slice(&payload);

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).map_err(|e| EngineError::io(parent, e))?;
            }
        }

        let tmp = tmp_sibling(path);
        std::fs::write(&tmp, &output).map_err(|e| EngineError::io(&tmp, e))?;
        std::fs::rename(&tmp, path).map_err(|e| EngineError::io(path, e))
    }
}

/// Returns the temporary sibling path the snapshot is staged at before the
/// final rename. Appends `.tmp` to the full file name so dotfile names like
/// `.stale-cache` stay intact.
fn tmp_sibling(path: &Path) -> PathBuf {
    let mut name = path.as_os_str().to_os_string();
    name.push(".tmp");
    PathBuf::from(name)
}

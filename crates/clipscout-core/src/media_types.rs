// crates/clipscout-core/src/media_types.rs
//
// Types that flow between the clipscout-media worker threads and the caller.
// No ffmpeg, no HTTP — just plain data.

use std::path::{Path, PathBuf};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A video file loaded by the user.
///
/// Identity is the `id`, minted at import time — two imports of bytewise
/// identical content are distinct files and get distinct ids.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct MediaFile {
    pub id:        Uuid,
    pub name:      String,
    pub byte_size: u64,
    pub path:      PathBuf,
}

impl MediaFile {
    /// Build a handle for a file on disk. Display name is the file name
    /// component; byte size is read from fs metadata (0 if unreadable —
    /// the size is informational, not load-bearing).
    pub fn from_path(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let name = path
            .file_name()
            .unwrap_or_default()
            .to_string_lossy()
            .to_string();
        let byte_size = std::fs::metadata(&path).map(|m| m.len()).unwrap_or(0);
        Self { id: Uuid::new_v4(), name, byte_size, path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// Probed container metadata: duration plus video stream dimensions.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct MediaInfo {
    pub duration: f64,
    pub width:    u32,
    pub height:   u32,
}

/// One extracted still image, keyed by its source timestamp.
///
/// Lives only as the product of one extraction batch; the next batch for the
/// same or another file supersedes it.
#[derive(Clone, Debug)]
pub struct Frame {
    pub timestamp: f64,
    pub width:     u32,
    pub height:    u32,
    /// PNG-encoded image bytes.
    pub png:       Vec<u8>,
}

/// The legacy single-file capture: a frame scaled into a 160×90 box with
/// aspect ratio preserved (the longer dimension is shrunk to fit).
#[derive(Clone, Debug)]
pub struct Thumbnail {
    pub width:  u32,
    pub height: u32,
    /// PNG-encoded image bytes.
    pub png:    Vec<u8>,
}

/// Results sent from the MediaWorker background threads to the caller.
pub enum MediaResult {
    Info      { id: Uuid, info: MediaInfo },
    Thumbnail { id: Uuid, thumb: Thumbnail },
    /// One completed extraction batch, in the exact order of `timestamps`.
    ///
    /// Carries the originating file id and timestamp list so the consumer
    /// can discard a batch that no longer matches the current selection —
    /// the pipeline never cancels itself, the consumer drops stale results.
    FrameBatch { id: Uuid, timestamps: Vec<f64>, frames: Vec<Frame> },
    Error     { id: Uuid, msg: String },
}

// crates/clipscout-media/src/error.rs
//
// Decode errors surfaced by the extraction pipeline. One kind aborts one
// whole call — callers never see a partial frame list alongside an error.

use std::path::PathBuf;
use thiserror::Error;

use ffmpeg_the_third as ffmpeg;

#[derive(Debug, Error)]
pub enum DecodeError {
    /// The container could not be opened or a decoder could not be built
    /// for it (corrupt or unsupported source).
    #[error("cannot open {path}: {source}")]
    Open { path: PathBuf, source: ffmpeg::Error },

    #[error("no video stream in {0}")]
    NoVideoStream(PathBuf),

    /// Decode or scale failure while capturing the frame for a timestamp.
    #[error("decode failed at {timestamp:.3}s: {source}")]
    Decode { timestamp: f64, source: ffmpeg::Error },

    /// EOF reached with no decodable frame for this timestamp at all.
    #[error("no frame found at t={timestamp:.3}s")]
    NoFrame { timestamp: f64 },

    #[error("PNG encode failed: {0}")]
    EncodePng(#[from] png::EncodingError),
}

// crates/clipscout-media/src/lib.rs
//
// FFmpeg-backed media capabilities — probing, frame extraction, thumbnail
// capture. No UI dependency; callers talk to the MediaWorker via channels
// or call the synchronous functions directly.
//
// To add a new media capability:
//   1. Create a new module file here
//   2. Add `mod mymodule;` below
//   3. Call it from worker.rs (or expose it directly)

pub mod error;
pub mod extract;
pub mod helpers;
pub mod probe;
pub mod thumbnail;
pub mod worker;

// Re-export the main public API so downstream imports are simple.
pub use error::DecodeError;
pub use extract::{extract_frames, BatchDecoder};
pub use probe::probe_media;
pub use thumbnail::{capture_thumbnail, data_url};
pub use worker::MediaWorker;

pub use clipscout_core::media_types::{Frame, MediaInfo, MediaResult, Thumbnail};

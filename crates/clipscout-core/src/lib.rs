// crates/clipscout-core/src/lib.rs
//
// Pure session state and cross-component plumbing — no ffmpeg, no HTTP,
// no runtime decode handles. Serializable where it makes sense (registry
// snapshots) via serde.

pub mod bus;
pub mod helpers;
pub mod media_types;
pub mod registry;

// Re-export the main public API so downstream imports stay shallow.
pub use bus::{Bus, SeekBus, SeekEvent, Subscription};
pub use media_types::{Frame, MediaFile, MediaInfo, MediaResult, Thumbnail};
pub use registry::{MediaEntry, MediaRegistry, RegistryError};

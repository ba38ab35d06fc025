// crates/clipscout-client/src/lib.rs
//
// HTTP clients for the external detection/transcription service. The
// service is an opaque collaborator: these clients upload a video as
// multipart/form-data, parse the JSON reply, and — by contract — swallow
// every failure into an empty/fallback value at this boundary.

pub mod detect;
pub mod error;
mod http;
pub mod multipart;
pub mod transcribe;

pub use detect::{DetectOptions, DetectionClient};
pub use error::RequestError;
pub use multipart::MultipartBody;
pub use transcribe::{Segment, TranscriptionClient};

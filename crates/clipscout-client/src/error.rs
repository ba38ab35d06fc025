// crates/clipscout-client/src/error.rs

use thiserror::Error;

/// Failures talking to the detection/transcription service.
///
/// These never escape the public client surface uncaught: `detect` and
/// `transcribe` collapse them into empty/fallback values. The `try_*`
/// variants expose them for callers that want the cause.
#[derive(Debug, Error)]
pub enum RequestError {
    #[error("server returned HTTP {0}")]
    Status(u16),

    #[error("request failed: {0}")]
    Transport(ureq::Error),

    #[error("response was not the expected JSON: {0}")]
    BadJson(#[from] serde_json::Error),

    #[error("cannot read upload file: {0}")]
    Io(#[from] std::io::Error),
}

impl RequestError {
    /// Split ureq's error space into our kinds: a non-2xx status is
    /// its own condition, everything else is transport.
    pub(crate) fn from_ureq(e: ureq::Error) -> Self {
        match e {
            ureq::Error::StatusCode(code) => RequestError::Status(code),
            other => RequestError::Transport(other),
        }
    }
}

// crates/clipscout-client/src/transcribe.rs
//
// Client for the /transcribe endpoint. Failure collapses to a single
// synthetic segment so the presentation layer always has something to show.

use std::path::Path;

use serde::Deserialize;
use ureq::Agent;

use crate::error::RequestError;
use crate::http::{agent, endpoint_url, post_multipart};
use crate::multipart::MultipartBody;

/// One transcription unit with its time range.
#[derive(Clone, Debug, Deserialize, PartialEq)]
pub struct Segment {
    pub text:  String,
    pub start: f64,
    pub end:   f64,
}

impl Segment {
    /// The placeholder shown when transcription fails for any reason.
    pub fn fallback() -> Self {
        Self {
            text:  "Transcription could not be generated".into(),
            start: 0.0,
            end:   0.0,
        }
    }
}

pub struct TranscriptionClient {
    agent:    Agent,
    base_url: String,
}

impl TranscriptionClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self { agent: agent(), base_url: base_url.into() }
    }

    /// Transcribe the video at `path`. On any failure returns the single
    /// fallback segment instead of an error.
    pub fn transcribe(&self, path: &Path) -> Vec<Segment> {
        match self.try_transcribe(path) {
            Ok(segments) => segments,
            Err(e) => {
                eprintln!("[transcribe] {}: {e} — returning fallback segment", path.display());
                vec![Segment::fallback()]
            }
        }
    }

    pub fn try_transcribe(&self, path: &Path) -> Result<Vec<Segment>, RequestError> {
        let mut body = MultipartBody::new();
        body.add_file("video", path)?;

        let url = endpoint_url(&self.base_url, "transcribe");
        let text = post_multipart(&self.agent, &url, body)?;
        parse_segments(&text)
    }
}

fn parse_segments(body: &str) -> Result<Vec<Segment>, RequestError> {
    #[derive(Deserialize)]
    struct TranscribeResponse {
        #[serde(default)]
        segments: Vec<Segment>,
    }
    Ok(serde_json::from_str::<TranscribeResponse>(body)?.segments)
}

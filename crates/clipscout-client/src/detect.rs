// crates/clipscout-client/src/detect.rs
//
// Client for the /detect endpoint: video + text prompt + sampling
// parameters in, a list of timestamps of interest out.

use std::path::Path;

use serde::Deserialize;
use ureq::Agent;

use crate::error::RequestError;
use crate::http::{agent, endpoint_url, post_multipart};
use crate::multipart::MultipartBody;

/// Sampling parameters forwarded to the detection service.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DetectOptions {
    /// Sample one frame every this many seconds.
    pub every_n_seconds: f64,
    /// Upper bound on sampled frames per request.
    pub max_frames: u32,
}

impl Default for DetectOptions {
    fn default() -> Self {
        Self { every_n_seconds: 1.0, max_frames: 20 }
    }
}

pub struct DetectionClient {
    agent:    Agent,
    base_url: String,
}

impl DetectionClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self { agent: agent(), base_url: base_url.into() }
    }

    /// Detect moments matching `description` in the video at `path`.
    ///
    /// Failure policy: any transport error, non-2xx status or non-JSON body
    /// is logged and collapsed into an empty timestamp list — callers never
    /// see a network exception from here. Use `try_detect` for the cause.
    pub fn detect(&self, path: &Path, description: &str, opts: DetectOptions) -> Vec<f64> {
        match self.try_detect(path, description, opts) {
            Ok(timestamps) => {
                eprintln!(
                    "[detect] {} timestamps ← {}",
                    timestamps.len(),
                    path.display()
                );
                timestamps
            }
            Err(e) => {
                eprintln!("[detect] {}: {e} — returning no timestamps", path.display());
                Vec::new()
            }
        }
    }

    pub fn try_detect(
        &self,
        path: &Path,
        description: &str,
        opts: DetectOptions,
    ) -> Result<Vec<f64>, RequestError> {
        let mut body = MultipartBody::new();
        body.add_file("video", path)?;
        body.add_text("description", description);
        body.add_text("every_n_seconds", &opts.every_n_seconds.to_string());
        body.add_text("max_frames", &opts.max_frames.to_string());

        let url = endpoint_url(&self.base_url, "detect");
        let text = post_multipart(&self.agent, &url, body)?;
        parse_timestamps(&text)
    }
}

fn parse_timestamps(body: &str) -> Result<Vec<f64>, RequestError> {
    #[derive(Deserialize)]
    struct DetectResponse {
        timestamps: Vec<f64>,
    }
    Ok(serde_json::from_str::<DetectResponse>(body)?.timestamps)
}

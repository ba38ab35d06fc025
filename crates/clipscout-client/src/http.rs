// crates/clipscout-client/src/http.rs
//
// Shared agent construction and the one POST shape both clients use.

use std::time::Duration;

use ureq::Agent;

use crate::error::RequestError;
use crate::multipart::MultipartBody;

/// Agent with explicit timeouts. Uploads of long videos plus server-side
/// sampling can take a while, so the global timeout is generous; connect
/// failures should surface fast.
pub(crate) fn agent() -> Agent {
    Agent::config_builder()
        .timeout_connect(Some(Duration::from_secs(5)))
        .timeout_global(Some(Duration::from_secs(300)))
        .build()
        .new_agent()
}

/// POST a multipart body and return the response text. Non-2xx statuses
/// and transport failures both surface as RequestError.
pub(crate) fn post_multipart(
    agent: &Agent,
    url: &str,
    body: MultipartBody,
) -> Result<String, RequestError> {
    let content_type = body.content_type();
    let payload = body.finish();

    let mut resp = agent
        .post(url)
        .header("Content-Type", &content_type)
        .send(&payload[..])
        .map_err(RequestError::from_ureq)?;

    resp.body_mut()
        .read_to_string()
        .map_err(RequestError::from_ureq)
}

/// `{base}/{endpoint}` with duplicate-slash protection for configured URLs.
pub(crate) fn endpoint_url(base: &str, endpoint: &str) -> String {
    format!("{}/{}", base.trim_end_matches('/'), endpoint)
}

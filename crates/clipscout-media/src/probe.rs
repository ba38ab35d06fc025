// crates/clipscout-media/src/probe.rs
//
// In-process FFmpeg probing: duration plus video stream dimensions.

use std::path::Path;

use ffmpeg_the_third as ffmpeg;
use ffmpeg::format::input;
use ffmpeg::media::Type;

use clipscout_core::media_types::MediaInfo;

use crate::error::DecodeError;

/// Probe container duration and video dimensions in one open.
///
/// Duration comes from the container; when the container reports none we
/// fall back to the video stream's own duration (some MP4 remuxes only
/// carry the latter). Files without a video stream are rejected — this
/// registry holds videos only.
pub fn probe_media(path: &Path) -> Result<MediaInfo, DecodeError> {
    let ictx = input(path).map_err(|source| DecodeError::Open {
        path: path.to_path_buf(),
        source,
    })?;

    let stream = ictx
        .streams()
        .best(Type::Video)
        .ok_or_else(|| DecodeError::NoVideoStream(path.to_path_buf()))?;

    let (width, height) = unsafe {
        let p = stream.parameters().as_ptr();
        ((*p).width as u32, (*p).height as u32)
    };

    let mut duration = ictx.duration() as f64 / ffmpeg::ffi::AV_TIME_BASE as f64;
    if duration <= 0.0 {
        let tb = stream.time_base();
        duration =
            stream.duration() as f64 * tb.numerator() as f64 / tb.denominator() as f64;
    }
    let duration = duration.max(0.0);

    eprintln!(
        "[media] probed {width}x{height}, {duration:.2}s ← {}",
        path.display()
    );
    Ok(MediaInfo { duration, width, height })
}

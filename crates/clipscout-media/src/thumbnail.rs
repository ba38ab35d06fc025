// crates/clipscout-media/src/thumbnail.rs
//
// Legacy single-file thumbnail capture: one frame at a given offset, scaled
// into a fixed 160×90 box with aspect ratio preserved, exposed as PNG bytes
// and as a data: URL. Distinct from the batch pipeline in extract.rs, which
// always captures at native resolution.

use std::path::Path;

use base64::Engine;

use clipscout_core::media_types::Thumbnail;

use crate::error::DecodeError;
use crate::extract::{encode_png, BatchDecoder};

pub const THUMB_W: u32 = 160;
pub const THUMB_H: u32 = 90;

/// Scale `(src_w, src_h)` to fit the 160×90 box without distortion: the
/// longer dimension shrinks until the source aspect fits.
pub fn fit_box(src_w: u32, src_h: u32) -> (u32, u32) {
    let aspect = src_w.max(1) as f64 / src_h.max(1) as f64;
    let box_aspect = THUMB_W as f64 / THUMB_H as f64;

    if aspect > box_aspect {
        // Wider than the box: full width, reduced height.
        (THUMB_W, ((THUMB_W as f64 / aspect).round() as u32).max(1))
    } else {
        // Taller than (or equal to) the box: full height, reduced width.
        (((THUMB_H as f64 * aspect).round() as u32).max(1), THUMB_H)
    }
}

/// Capture the frame at `ts` seconds as a box-fitted PNG thumbnail.
pub fn capture_thumbnail(path: &Path, ts: f64) -> Result<Thumbnail, DecodeError> {
    let mut dec = BatchDecoder::open_scaled(path, fit_box)?;
    let rgb = dec.frame_at(ts)?;
    let png = encode_png(&rgb, dec.out_w, dec.out_h)?;
    Ok(Thumbnail { width: dec.out_w, height: dec.out_h, png })
}

/// Render a thumbnail as a `data:image/png;base64,…` URL for direct
/// embedding in an image element.
pub fn data_url(thumb: &Thumbnail) -> String {
    let encoded = base64::engine::general_purpose::STANDARD.encode(&thumb.png);
    format!("data:image/png;base64,{encoded}")
}

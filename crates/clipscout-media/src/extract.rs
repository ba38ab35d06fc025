// crates/clipscout-media/src/extract.rs
//
// BatchDecoder: stateful per-file decoder reused across a whole batch.
// extract_frames: the seek-and-capture loop — one still per timestamp,
// strictly in input order, all-or-nothing.

use std::io::Cursor;
use std::path::{Path, PathBuf};

use ffmpeg_the_third as ffmpeg;
use ffmpeg::format::{input, Pixel};
use ffmpeg::media::Type;
use ffmpeg::software::scaling::{context::Context as SwsContext, flag::Flags};

use clipscout_core::media_types::Frame;

use crate::error::DecodeError;
use crate::helpers::pixels::destripe;

// ── Stateful per-file decoder ─────────────────────────────────────────────────

pub struct BatchDecoder {
    path:      PathBuf,
    ictx:      ffmpeg::format::context::Input,
    decoder:   ffmpeg::decoder::video::Video,
    video_idx: usize,
    tb_num:    i32,
    tb_den:    i32,
    /// Output dimensions — native source size unless opened scaled.
    pub out_w: u32,
    pub out_h: u32,
    scaler:    SwsContext,
    /// True once any packet has been consumed; a later capture at t=0
    /// must rewind explicitly instead of relying on the fresh-open position.
    dirty:     bool,
}

impl BatchDecoder {
    /// Open `path` with output sized to the video's native pixel dimensions.
    pub fn open(path: &Path) -> Result<Self, DecodeError> {
        Self::open_inner(path, |w, h| (w, h))
    }

    /// Open `path` with output sized by `fit(native_w, native_h)`.
    pub fn open_scaled(
        path: &Path,
        fit: impl FnOnce(u32, u32) -> (u32, u32),
    ) -> Result<Self, DecodeError> {
        Self::open_inner(path, fit)
    }

    fn open_inner(
        path: &Path,
        fit: impl FnOnce(u32, u32) -> (u32, u32),
    ) -> Result<Self, DecodeError> {
        let open_err = |source| DecodeError::Open { path: path.to_path_buf(), source };

        let ictx = input(path).map_err(open_err)?;
        let video_idx = ictx
            .streams()
            .best(Type::Video)
            .ok_or_else(|| DecodeError::NoVideoStream(path.to_path_buf()))?
            .index();

        let (tb_num, tb_den, raw_w, raw_h) = {
            let stream = ictx.stream(video_idx).expect("best stream index is valid");
            let tb = stream.time_base();
            let (w, h) = unsafe {
                let p = stream.parameters().as_ptr();
                ((*p).width as u32, (*p).height as u32)
            };
            (tb.numerator(), tb.denominator(), w, h)
        };

        // Second context for decoder params (Parameters borrows from ictx).
        let ictx2   = input(path).map_err(open_err)?;
        let stream2 = ictx2.stream(video_idx).expect("stream index valid on re-open");
        let dec_ctx = ffmpeg::codec::context::Context::from_parameters(stream2.parameters())
            .map_err(open_err)?;
        let decoder = dec_ctx.decoder().video().map_err(open_err)?;

        let (out_w, out_h) = fit(raw_w.max(1), raw_h.max(1));

        let scaler = SwsContext::get(
            decoder.format(), decoder.width(), decoder.height(),
            Pixel::RGB24, out_w, out_h, Flags::BILINEAR,
        )
        .map_err(open_err)?;

        Ok(Self {
            path: path.to_path_buf(),
            ictx, decoder, video_idx, tb_num, tb_den, out_w, out_h, scaler,
            dirty: false,
        })
    }

    fn ts_to_pts(&self, t: f64) -> i64 {
        (t * self.tb_den as f64 / self.tb_num as f64) as i64
    }

    /// Position the demuxer for a capture at `ts` seconds.
    ///
    /// Seeks land on the keyframe at or before the target (`..=target`);
    /// the PTS filter in `frame_at` discards the pre-roll. Seeking forward
    /// instead would start past any mid-GOP target and the requested
    /// instant would never decode.
    ///
    /// Failures are soft: on error we keep decoding from wherever the
    /// demuxer sits and the PTS filter still converges on the target,
    /// just slower. Nothing to recover for a rewind that fails — the log
    /// line is the signal.
    fn reposition(&mut self, ts: f64) {
        let target = if ts > 0.0 {
            (ts * ffmpeg::ffi::AV_TIME_BASE as f64) as i64
        } else if self.dirty {
            // A reused context must rewind by hand; a fresh one already
            // sits at the start, and avformat rejects max_ts=0 seeks on
            // some platforms before anything was read.
            0
        } else {
            return;
        };
        if let Err(e) = self.ictx.seek(target, ..=target) {
            eprintln!(
                "[media] seek to {ts:.3}s failed for {}: {e} — decoding forward instead",
                self.path.display()
            );
        }
    }

    /// Capture the frame at `ts` seconds: seek, flush, then decode forward
    /// until a frame lands at or past the target PTS. Returns destriped
    /// RGB24 pixels at the output size.
    ///
    /// Backward-keyframe seeks land before the target; the PTS filter skips
    /// the pre-roll. At EOF the last decoded frame stands in for a target
    /// past the end of the stream (requesting the final instant of a clip).
    pub fn frame_at(&mut self, ts: f64) -> Result<Vec<u8>, DecodeError> {
        self.reposition(ts);
        self.decoder.flush();
        self.dirty = true;

        let target_pts = self.ts_to_pts(ts);
        let mut last_good: Option<Vec<u8>> = None;

        for (stream, packet) in self.ictx.packets().flatten() {
            if stream.index() != self.video_idx {
                continue;
            }
            self.decoder
                .send_packet(&packet)
                .map_err(|source| DecodeError::Decode { timestamp: ts, source })?;

            let mut decoded = ffmpeg::util::frame::video::Video::empty();
            while self.decoder.receive_frame(&mut decoded).is_ok() {
                let mut out = ffmpeg::util::frame::video::Video::empty();
                self.scaler
                    .run(&decoded, &mut out)
                    .map_err(|source| DecodeError::Decode { timestamp: ts, source })?;

                let data = destripe(
                    out.data(0), out.stride(0),
                    self.out_w as usize, self.out_h as usize, 3,
                );
                // Pre-roll from the keyframe-aligned seek: keep decoding.
                // Tolerance of 2 pts units absorbs rounding in ts_to_pts.
                if let Some(pts) = decoded.pts() {
                    if pts + 2 < target_pts {
                        last_good = Some(data);
                        continue;
                    }
                }
                return Ok(data);
            }
        }

        last_good.ok_or(DecodeError::NoFrame { timestamp: ts })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

// ── Batch extraction ──────────────────────────────────────────────────────────

/// Extract one still per timestamp, in input order, at the video's native
/// dimensions, PNG-encoded.
///
/// An empty `timestamps` yields an empty result without opening the file.
/// Any failure aborts the whole call — partial results are discarded. The
/// seek/capture steps never overlap: each iteration completes before the
/// next seek is issued, so there is exactly one in-flight seek at a time.
/// All decode resources are scoped to this call and released on return.
pub fn extract_frames(path: &Path, timestamps: &[f64]) -> Result<Vec<Frame>, DecodeError> {
    if timestamps.is_empty() {
        return Ok(Vec::new());
    }

    let mut dec = BatchDecoder::open(path)?;
    let mut frames = Vec::with_capacity(timestamps.len());
    for &ts in timestamps {
        let rgb = dec.frame_at(ts)?;
        let png = encode_png(&rgb, dec.out_w, dec.out_h)?;
        frames.push(Frame { timestamp: ts, width: dec.out_w, height: dec.out_h, png });
    }
    Ok(frames)
}

/// Encode destriped RGB24 pixels as an in-memory PNG.
pub(crate) fn encode_png(rgb: &[u8], width: u32, height: u32) -> Result<Vec<u8>, DecodeError> {
    let mut out = Cursor::new(Vec::new());
    {
        let mut encoder = png::Encoder::new(&mut out, width, height);
        encoder.set_color(png::ColorType::Rgb);
        encoder.set_depth(png::BitDepth::Eight);
        let mut writer = encoder.write_header()?;
        writer.write_image_data(rgb)?;
    }
    Ok(out.into_inner())
}

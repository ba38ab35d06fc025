// crates/clipscout-media/src/helpers/pixels.rs
//
// Pixel-buffer utilities shared by extraction, probing and thumbnails.

/// Copy only the visible pixels of a scaled frame, dropping the per-row
/// stride padding ffmpeg aligns rows with. `bpp` is bytes per pixel
/// (3 for RGB24, 4 for RGBA).
pub fn destripe(raw: &[u8], stride: usize, width: usize, height: usize, bpp: usize) -> Vec<u8> {
    let row_bytes = width * bpp;
    (0..height)
        .flat_map(|row| &raw[row * stride..row * stride + row_bytes])
        .copied()
        .collect()
}

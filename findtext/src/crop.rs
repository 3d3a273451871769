use image::GrayImage;
use image::imageops;

/// Extract a rectangular sub-buffer without touching the source.
///
/// Omitted bounds default to the corresponding full-extent edge. Every bound
/// is clamped to the buffer's actual extent, and an inverted range collapses
/// to zero size, so out-of-range requests never fail: deep detection
/// legitimately asks for bounds outside the image when a line sits at the
/// very top or bottom edge.
pub fn crop(
    buffer: &GrayImage,
    x_start: Option<i64>,
    x_end: Option<i64>,
    y_start: Option<i64>,
    y_end: Option<i64>,
) -> GrayImage {
    let (x0, x1) = clamp_axis(x_start, x_end, buffer.width());
    let (y0, y1) = clamp_axis(y_start, y_end, buffer.height());
    imageops::crop_imm(buffer, x0, y0, x1 - x0, y1 - y0).to_image()
}

/// Full-width horizontal strip between two vertical bounds, clamped the same
/// way as [`crop`].
pub fn strip(buffer: &GrayImage, y_start: i64, y_end: i64) -> GrayImage {
    crop(buffer, None, None, Some(y_start), Some(y_end))
}

fn clamp_axis(start: Option<i64>, end: Option<i64>, extent: u32) -> (u32, u32) {
    let extent = i64::from(extent);
    let lo = start.unwrap_or(0).clamp(0, extent) as u32;
    let hi = end.unwrap_or(extent).clamp(0, extent) as u32;
    (lo, hi.max(lo))
}

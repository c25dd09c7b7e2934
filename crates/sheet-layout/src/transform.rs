//! Image transform step
//!
//! Resamples a source image into the cell bounding box with a high-quality
//! filter and re-encodes it as lossless PNG. CPU-bound; the engine runs it
//! inside `tokio::task::spawn_blocking`.

use std::io::Cursor;

use image::{ImageFormat, imageops::FilterType};
use tracing::trace;

/// Resize `bytes` to fit inside `target_width` x `target_height` pixels,
/// preserving aspect ratio, and re-encode as PNG.
///
/// Unless `allow_upscale` is set, the bounding box is clamped to the source
/// resolution so images are never enlarged past their native pixels.
pub fn resize_to_cell(
    bytes: &[u8],
    target_width: u32,
    target_height: u32,
    allow_upscale: bool,
) -> std::result::Result<Vec<u8>, image::ImageError> {
    let source = image::load_from_memory(bytes)?;

    let (box_width, box_height) = if allow_upscale {
        (target_width, target_height)
    } else {
        (
            target_width.min(source.width()),
            target_height.min(source.height()),
        )
    };

    let resized = source.resize(box_width.max(1), box_height.max(1), FilterType::Lanczos3);
    trace!(
        source_width = source.width(),
        source_height = source.height(),
        width = resized.width(),
        height = resized.height(),
        "resampled image"
    );

    // Flatten to RGB; print documents carry no alpha channel.
    let flattened = image::DynamicImage::ImageRgb8(resized.to_rgb8());
    let mut out = Vec::new();
    flattened.write_to(&mut Cursor::new(&mut out), ImageFormat::Png)?;
    Ok(out)
}

//! Sequential layout engine
//!
//! Images are processed strictly in input order: the per-image transform is
//! awaited before the cursor advances, so page and row bookkeeping always
//! reflects exactly one image at a time. Cancelling the returned future stops
//! all further sink interaction; partial documents are never returned.

use tracing::{error, info};

use crate::geometry::GridGeometry;
use crate::options::SheetOptions;
use crate::pdf::PdfSink;
use crate::progress::{ProgressEvent, ProgressSender};
use crate::sink::DocumentSink;
use crate::transform;
use crate::types::{ImageAsset, Result, SheetError};

/// Place `images` onto grid pages and serialize the document through `sink`.
///
/// Fails with `SheetError::NoImages` before any sink interaction when the
/// input is empty. Any per-image failure aborts the whole run with the
/// offending index; there is no retry and no partial output.
pub async fn layout_images<S: DocumentSink>(
    images: Vec<ImageAsset>,
    geometry: &GridGeometry,
    allow_upscale: bool,
    mut sink: S,
    progress: Option<&ProgressSender>,
) -> Result<Vec<u8>> {
    if images.is_empty() {
        return Err(SheetError::NoImages);
    }

    let total = images.len();
    let cells_per_page = geometry.cells_per_page();
    let target_width = geometry.cell_width_pt.round() as u32;
    let target_height = geometry.cell_height_pt.round() as u32;

    let mut page = sink.add_page(geometry.page_width_pt, geometry.page_height_pt)?;

    for (index, asset) in images.into_iter().enumerate() {
        if index > 0 && index % cells_per_page == 0 {
            page = sink.add_page(geometry.page_width_pt, geometry.page_height_pt)?;
        }

        let ImageAsset { name, bytes } = asset;
        let byte_size = bytes.len();
        let png = tokio::task::spawn_blocking(move || {
            transform::resize_to_cell(&bytes, target_width, target_height, allow_upscale)
        })
        .await?
        .map_err(|source| {
            error!(index, name = %name, bytes = byte_size, "image transform failed: {source}");
            SheetError::ImageProcessing {
                index,
                name,
                source,
            }
        })?;

        let image = sink.embed(&png)?;
        let placement = geometry.placement(index);
        sink.draw(
            page,
            image,
            placement.x,
            placement.y,
            placement.width,
            placement.height,
        )?;

        if let Some(progress) = progress {
            progress.send(ProgressEvent::placed(index + 1, total));
        }
    }

    let bytes = sink.finish()?;
    if let Some(progress) = progress {
        progress.send(ProgressEvent::finished(total));
    }
    info!(
        images = total,
        pages = geometry.page_count(total),
        bytes = bytes.len(),
        "sheet layout complete"
    );
    Ok(bytes)
}

/// Compute the geometry for `options`, lay `images` out through a [`PdfSink`],
/// and return the finished PDF bytes.
pub async fn generate_sheet_pdf(
    images: Vec<ImageAsset>,
    options: &SheetOptions,
    progress: Option<&ProgressSender>,
) -> Result<Vec<u8>> {
    let geometry = GridGeometry::compute(options)?;
    layout_images(
        images,
        &geometry,
        options.allow_upscale,
        PdfSink::new(),
        progress,
    )
    .await
}

//! Document sink abstraction
//!
//! The layout engine never touches PDF structure directly; it drives a
//! [`DocumentSink`] that materializes pages and embedded images into a final
//! byte sequence. [`crate::PdfSink`] is the lopdf-backed implementation; tests
//! substitute a recording sink.

use crate::types::Result;

/// Handle to a page created by [`DocumentSink::add_page`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PageRef(pub usize);

/// Handle to an image registered by [`DocumentSink::embed`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ImageRef(pub usize);

pub trait DocumentSink {
    /// Append a new page with the given dimensions in points.
    fn add_page(&mut self, width_pt: f32, height_pt: f32) -> Result<PageRef>;

    /// Register an encoded PNG image with the document.
    fn embed(&mut self, png: &[u8]) -> Result<ImageRef>;

    /// Draw an embedded image on a page at an absolute bottom-left position,
    /// stretched to `width` x `height` points.
    fn draw(
        &mut self,
        page: PageRef,
        image: ImageRef,
        x: f32,
        y: f32,
        width: f32,
        height: f32,
    ) -> Result<()>;

    /// Serialize the finished document.
    fn finish(self) -> Result<Vec<u8>>
    where
        Self: Sized;
}

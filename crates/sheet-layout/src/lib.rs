pub mod constants;
mod engine;
mod geometry;
mod options;
mod pdf;
mod progress;
mod sink;
mod transform;
mod types;

pub use engine::{generate_sheet_pdf, layout_images};
pub use geometry::{GridGeometry, Placement};
pub use options::SheetOptions;
pub use pdf::PdfSink;
pub use progress::{ProgressEvent, ProgressSender};
pub use sink::{DocumentSink, ImageRef, PageRef};
pub use transform::resize_to_cell;
pub use types::*;

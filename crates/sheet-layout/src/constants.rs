//! Shared constants for sheet layout
//!
//! This module centralizes the unit conversions and the canonical layout
//! constants used throughout the crate.

// =============================================================================
// Unit Conversion
// =============================================================================

/// Centimeters per inch
pub const CM_PER_INCH: f32 = 2.54;

/// Millimeters per inch
pub const MM_PER_INCH: f32 = 25.4;

/// Convert inches to points at the given resolution (1 inch = dpi points)
#[inline]
pub fn in_to_pt(inches: f32, dpi: u32) -> f32 {
    inches * dpi as f32
}

/// Convert centimeters to points at the given resolution
#[inline]
pub fn cm_to_pt(cm: f32, dpi: u32) -> f32 {
    cm / CM_PER_INCH * dpi as f32
}

/// Convert millimeters to points at the given resolution
#[inline]
pub fn mm_to_pt(mm: f32, dpi: u32) -> f32 {
    mm / MM_PER_INCH * dpi as f32
}

// =============================================================================
// Canonical Layout Constants
// =============================================================================

/// Default output resolution (print quality)
pub const DEFAULT_DPI: u32 = 300;

/// Default sheet width in inches (19" x 13" print sheet)
pub const DEFAULT_PAGE_WIDTH_IN: f32 = 19.0;

/// Default sheet height in inches
pub const DEFAULT_PAGE_HEIGHT_IN: f32 = 13.0;

/// Default cell width in centimeters
pub const DEFAULT_CELL_WIDTH_CM: f32 = 6.35;

/// Default cell height in centimeters
pub const DEFAULT_CELL_HEIGHT_CM: f32 = 8.8;

/// Default gap between adjacent cells in millimeters
pub const DEFAULT_SPACING_MM: f32 = 0.4;

/// Default number of cells per row
pub const DEFAULT_COLUMNS_PER_PAGE: usize = 7;

/// Default number of rows per sheet
pub const DEFAULT_ROWS_PER_PAGE: usize = 3;

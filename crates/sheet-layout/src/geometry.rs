//! Grid geometry calculation
//!
//! This module derives the point-unit geometry of the sheet grid from the
//! physical configuration, and computes the deterministic placement of each
//! image: page index, column, row, and bottom-left coordinates.

use tracing::debug;

use crate::constants::{cm_to_pt, in_to_pt, mm_to_pt};
use crate::options::SheetOptions;
use crate::types::Result;

/// One placement instruction: where image `i` lands, in input order.
/// Coordinates are in points with a bottom-left origin.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Placement {
    pub page_index: usize,
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

/// All derived quantities of the grid, in points. Pure function of
/// [`SheetOptions`]; computed once and shared by every page of a run.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GridGeometry {
    pub page_width_pt: f32,
    pub page_height_pt: f32,
    pub cell_width_pt: f32,
    pub cell_height_pt: f32,
    pub spacing_pt: f32,
    /// Horizontal margin centering the grid; negative when the grid is
    /// wider than the page (degenerate but valid).
    pub margin_x: f32,
    /// Vertical margin centering the grid
    pub margin_y: f32,
    pub columns_per_page: usize,
    pub rows_per_page: usize,
}

impl GridGeometry {
    /// Derive the grid geometry from the physical configuration.
    ///
    /// Fails with `SheetError::Config` when a dimension is not positive or a
    /// grid count is zero.
    pub fn compute(options: &SheetOptions) -> Result<Self> {
        options.validate()?;

        let dpi = options.dpi;
        let page_width_pt = in_to_pt(options.page_width_in, dpi);
        let page_height_pt = in_to_pt(options.page_height_in, dpi);
        let cell_width_pt = cm_to_pt(options.cell_width_cm, dpi);
        let cell_height_pt = cm_to_pt(options.cell_height_cm, dpi);
        let spacing_pt = mm_to_pt(options.spacing_mm, dpi);

        let cols = options.columns_per_page;
        let rows = options.rows_per_page;

        let grid_width_pt = cols as f32 * cell_width_pt + (cols - 1) as f32 * spacing_pt;
        let grid_height_pt = rows as f32 * cell_height_pt + (rows - 1) as f32 * spacing_pt;

        let margin_x = (page_width_pt - grid_width_pt) / 2.0;
        let margin_y = (page_height_pt - grid_height_pt) / 2.0;

        debug!(
            cell_width_pt,
            cell_height_pt, spacing_pt, margin_x, margin_y, "computed grid geometry"
        );

        Ok(Self {
            page_width_pt,
            page_height_pt,
            cell_width_pt,
            cell_height_pt,
            spacing_pt,
            margin_x,
            margin_y,
            columns_per_page: cols,
            rows_per_page: rows,
        })
    }

    /// Number of cells on one page
    pub fn cells_per_page(&self) -> usize {
        self.columns_per_page * self.rows_per_page
    }

    /// Number of pages needed for `image_count` images
    pub fn page_count(&self, image_count: usize) -> usize {
        image_count.div_ceil(self.cells_per_page())
    }

    /// Placement of the image at `index` (0-based, input order).
    ///
    /// Column and row are recomputed from the index on every call, so the x
    /// cursor returns to exactly `margin_x` at each row wrap with no
    /// accumulated floating point drift.
    pub fn placement(&self, index: usize) -> Placement {
        let cells = self.cells_per_page();
        let page_index = index / cells;
        let slot = index % cells;
        let col = slot % self.columns_per_page;
        let row = slot / self.columns_per_page;

        let x = self.margin_x + col as f32 * (self.cell_width_pt + self.spacing_pt);
        let y = self.page_height_pt
            - self.margin_y
            - self.cell_height_pt
            - row as f32 * (self.cell_height_pt + self.spacing_pt);

        Placement {
            page_index,
            x,
            y,
            width: self.cell_width_pt,
            height: self.cell_height_pt,
        }
    }

    /// Placements for `count` images, in input order
    pub fn placements(&self, count: usize) -> impl Iterator<Item = Placement> + '_ {
        (0..count).map(|index| self.placement(index))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn canonical() -> GridGeometry {
        GridGeometry::compute(&SheetOptions::default()).unwrap()
    }

    #[test]
    fn test_canonical_geometry() {
        // Golden numbers for the 300 DPI, 19x13in, 6.35x8.8cm, 0.4mm, 7x3 sheet
        let geometry = canonical();
        assert!((geometry.cell_width_pt - 749.6).abs() < 0.5);
        assert!((geometry.cell_height_pt - 1039.4).abs() < 0.5);
        assert!((geometry.spacing_pt - 4.72).abs() < 0.5);
        assert_eq!(geometry.page_width_pt, 5700.0);
        assert_eq!(geometry.page_height_pt, 3900.0);
        assert!(geometry.margin_x > 0.0);
        assert!(geometry.margin_y > 0.0);
    }

    #[test]
    fn test_page_count() {
        let geometry = canonical();
        assert_eq!(geometry.cells_per_page(), 21);
        assert_eq!(geometry.page_count(1), 1);
        assert_eq!(geometry.page_count(21), 1);
        assert_eq!(geometry.page_count(22), 2);
        assert_eq!(geometry.page_count(42), 2);
        assert_eq!(geometry.page_count(43), 3);
    }

    #[test]
    fn test_full_page_placements() {
        // 21 images on a 7x3 grid: one page, last row fully populated
        let geometry = canonical();
        let placements: Vec<_> = geometry.placements(21).collect();
        assert_eq!(placements.len(), 21);
        assert!(placements.iter().all(|p| p.page_index == 0));

        // First cell sits at the top-left of the centered grid
        let first = placements[0];
        assert_eq!(first.x, geometry.margin_x);
        let top_row_y = geometry.page_height_pt - geometry.margin_y - geometry.cell_height_pt;
        assert_eq!(first.y, top_row_y);

        // Last cell is at column 6, row 2
        let last = placements[20];
        let expected_x =
            geometry.margin_x + 6.0 * (geometry.cell_width_pt + geometry.spacing_pt);
        assert!((last.x - expected_x).abs() < 1e-3);
        let expected_y = top_row_y - 2.0 * (geometry.cell_height_pt + geometry.spacing_pt);
        assert!((last.y - expected_y).abs() < 1e-3);
    }

    #[test]
    fn test_page_break_placement() {
        // Image 22 opens a second page at the top-left cell
        let geometry = canonical();
        let overflow = geometry.placement(21);
        assert_eq!(overflow.page_index, 1);
        assert_eq!(overflow.x, geometry.margin_x);
        let top_row_y = geometry.page_height_pt - geometry.margin_y - geometry.cell_height_pt;
        assert_eq!(overflow.y, top_row_y);
    }

    #[test]
    fn test_row_wrap_resets_x_exactly() {
        let geometry = canonical();
        for index in 0..63 {
            let placement = geometry.placement(index);
            if index % geometry.columns_per_page == 0 {
                assert_eq!(placement.x, geometry.margin_x, "index {}", index);
            }
        }
    }

    #[test]
    fn test_margins_identical_across_pages() {
        let geometry = canonical();
        let page0 = geometry.placement(0);
        let page1 = geometry.placement(21);
        let page2 = geometry.placement(42);
        assert_eq!(page0.x, page1.x);
        assert_eq!(page1.x, page2.x);
        assert_eq!(page0.y, page1.y);
        assert_eq!(page1.y, page2.y);
    }

    #[test]
    fn test_oversized_grid_gets_negative_margins() {
        // Grid wider than the page: placements still compute, margins go negative
        let options = SheetOptions {
            page_width_in: 4.0,
            page_height_in: 3.0,
            ..Default::default()
        };
        let geometry = GridGeometry::compute(&options).unwrap();
        assert!(geometry.margin_x < 0.0);
        assert!(geometry.margin_y < 0.0);
        let first = geometry.placement(0);
        assert_eq!(first.x, geometry.margin_x);
    }

    #[test]
    fn test_invalid_options_rejected() {
        for options in [
            SheetOptions {
                dpi: 0,
                ..Default::default()
            },
            SheetOptions {
                page_width_in: 0.0,
                ..Default::default()
            },
            SheetOptions {
                cell_height_cm: -1.0,
                ..Default::default()
            },
            SheetOptions {
                columns_per_page: 0,
                ..Default::default()
            },
            SheetOptions {
                rows_per_page: 0,
                ..Default::default()
            },
        ] {
            assert!(GridGeometry::compute(&options).is_err());
        }
    }
}

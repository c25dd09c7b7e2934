use crate::constants::*;
use crate::types::{Result, SheetError};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Sheet layout configuration.
///
/// All physical dimensions are given in the units a print operator would use:
/// the page in inches, the cells in centimeters, the gap in millimeters.
/// Everything is converted to points at `dpi` when the geometry is computed.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SheetOptions {
    /// Output resolution; also the point-per-inch scale of the document
    pub dpi: u32,
    pub page_width_in: f32,
    pub page_height_in: f32,
    pub cell_width_cm: f32,
    pub cell_height_cm: f32,
    /// Uniform gap between adjacent cells
    pub spacing_mm: f32,
    pub columns_per_page: usize,
    pub rows_per_page: usize,
    /// Enlarge images past their source resolution to fill the cell.
    /// Off by default: small sources keep their native size inside the cell box.
    pub allow_upscale: bool,
}

impl Default for SheetOptions {
    fn default() -> Self {
        Self {
            dpi: DEFAULT_DPI,
            page_width_in: DEFAULT_PAGE_WIDTH_IN,
            page_height_in: DEFAULT_PAGE_HEIGHT_IN,
            cell_width_cm: DEFAULT_CELL_WIDTH_CM,
            cell_height_cm: DEFAULT_CELL_HEIGHT_CM,
            spacing_mm: DEFAULT_SPACING_MM,
            columns_per_page: DEFAULT_COLUMNS_PER_PAGE,
            rows_per_page: DEFAULT_ROWS_PER_PAGE,
            allow_upscale: false,
        }
    }
}

impl SheetOptions {
    /// Load options from JSON file
    #[cfg(feature = "serde")]
    pub async fn load(path: impl AsRef<std::path::Path>) -> Result<Self> {
        let bytes = tokio::fs::read(path).await?;
        let options = serde_json::from_slice(&bytes)
            .map_err(|e| SheetError::Config(format!("Failed to parse options: {}", e)))?;
        Ok(options)
    }

    /// Save options to JSON file
    #[cfg(feature = "serde")]
    pub async fn save(&self, path: impl AsRef<std::path::Path>) -> Result<()> {
        let json = serde_json::to_string_pretty(self)
            .map_err(|e| SheetError::Config(format!("Failed to serialize options: {}", e)))?;
        tokio::fs::write(path, json).await?;
        Ok(())
    }

    /// Validate the options.
    ///
    /// A grid larger than the page is deliberately NOT rejected here; it
    /// produces negative centering margins and out-of-page placements, which
    /// is a degenerate but well-defined layout.
    pub fn validate(&self) -> Result<()> {
        if self.dpi == 0 {
            return Err(SheetError::Config("dpi must be at least 1".to_string()));
        }
        for (label, value) in [
            ("page_width_in", self.page_width_in),
            ("page_height_in", self.page_height_in),
            ("cell_width_cm", self.cell_width_cm),
            ("cell_height_cm", self.cell_height_cm),
        ] {
            if !(value > 0.0) {
                return Err(SheetError::Config(format!(
                    "{} must be positive, got {}",
                    label, value
                )));
            }
        }
        if !(self.spacing_mm >= 0.0) {
            return Err(SheetError::Config(format!(
                "spacing_mm must not be negative, got {}",
                self.spacing_mm
            )));
        }
        if self.columns_per_page < 1 || self.rows_per_page < 1 {
            return Err(SheetError::Config(format!(
                "grid must be at least 1x1, got {}x{}",
                self.columns_per_page, self.rows_per_page
            )));
        }
        Ok(())
    }
}

//! Grid geometry calculation
//!
//! Computes the fixed grid of product cells on a content page. The geometry
//! is computed once per job and reused for every content page.

use crate::types::{CatalogError, Result};

use super::{Cell, GridPosition};

/// Inputs of the grid calculation, all lengths in millimetres
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GridSpec {
    pub page_width_mm: f32,
    pub page_height_mm: f32,
    pub margin_mm: f32,
    /// Height of the header band above the first row
    pub header_height_mm: f32,
    pub columns: usize,
    pub rows: usize,
    /// Gap between neighbouring cells, both directions
    pub gap_mm: f32,
}

/// Computed grid of a content page
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GridGeometry {
    pub columns: usize,
    pub rows: usize,
    pub margin: f32,
    pub header_height: f32,
    pub gap: f32,
    pub usable_width: f32,
    pub usable_height: f32,
    pub cell_width: f32,
    pub cell_height: f32,
}

// =============================================================================
// Grid Creation
// =============================================================================

/// Compute the cell dimensions for a page.
///
/// Fails with [`CatalogError::InvalidGeometry`] when the grid has no rows or
/// columns, or when margins, header and gaps leave no room for the cells.
pub fn compute_grid(spec: &GridSpec) -> Result<GridGeometry> {
    if spec.columns == 0 || spec.rows == 0 {
        return Err(CatalogError::InvalidGeometry(format!(
            "grid needs at least one row and one column, got {}x{}",
            spec.columns, spec.rows
        )));
    }

    let usable_width = spec.page_width_mm - 2.0 * spec.margin_mm;
    let usable_height = spec.page_height_mm - 2.0 * spec.margin_mm;

    let cell_width =
        (usable_width - spec.gap_mm * (spec.columns - 1) as f32) / spec.columns as f32;
    let cell_height = (usable_height
        - spec.header_height_mm
        - spec.gap_mm * (spec.rows - 1) as f32)
        / spec.rows as f32;

    if !(cell_width.is_finite() && cell_width > 0.0) {
        return Err(CatalogError::InvalidGeometry(format!(
            "cell width {:.2}mm is not positive; margins or gaps too large for a {:.1}mm wide page",
            cell_width, spec.page_width_mm
        )));
    }
    if !(cell_height.is_finite() && cell_height > 0.0) {
        return Err(CatalogError::InvalidGeometry(format!(
            "cell height {:.2}mm is not positive; margins, header or gaps too large for a {:.1}mm tall page",
            cell_height, spec.page_height_mm
        )));
    }

    Ok(GridGeometry {
        columns: spec.columns,
        rows: spec.rows,
        margin: spec.margin_mm,
        header_height: spec.header_height_mm,
        gap: spec.gap_mm,
        usable_width,
        usable_height,
        cell_width,
        cell_height,
    })
}

// =============================================================================
// Cell Calculations
// =============================================================================

impl GridGeometry {
    /// Number of cells on one content page
    pub fn capacity(&self) -> usize {
        self.columns * self.rows
    }

    /// Row-major grid position of the `index`-th cell on a page
    pub fn position(&self, index: usize) -> GridPosition {
        GridPosition::new(index / self.columns, index % self.columns)
    }

    /// Top-left corner of the `index`-th cell on a page (row-major)
    pub fn cell_origin(&self, index: usize) -> (f32, f32) {
        let pos = self.position(index);
        let x = self.margin + pos.col as f32 * (self.cell_width + self.gap);
        let y = self.margin
            + self.header_height
            + pos.row as f32 * (self.cell_height + self.gap);
        (x, y)
    }

    pub fn cell(&self, index: usize) -> Cell {
        let (x, y) = self.cell_origin(index);
        Cell::new(x, y, self.cell_width, self.cell_height)
    }
}

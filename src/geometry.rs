//! Coordinate math for horizontally chained panels.
//!
//! A frame is made of `panel_count` identical panels laid out left to right.
//! The frame is addressed by a logical `(row, column)` pair where columns run
//! across every panel, but the pixel storage is panel-major: all pixels of
//! panel 0 (row-major), then all pixels of panel 1 and so on. This is the
//! order in which chained matrix drivers expect their data, one panel
//! bitmap after another.
//!
//! ```text
//!  column:   0 .. 7 | 8 .. 15            storage index:   0 .. 7 | 64 .. 71
//!  row 0:  [panel 0]|[panel 1]           row 0:          [ 0.. 7]|[64 ..71]
//!  row 1:  [panel 0]|[panel 1]           row 1:          [ 8..15]|[72 ..79]
//! ```
//!
//! Vertical stacking of panels is not supported.

use crate::Error;

/// Computes the number of pixels needed to back a chain of panels.
///
/// # Arguments
///
/// * `cols` - Number of columns per panel
/// * `rows` - Number of rows per panel
/// * `panels` - Number of panels chained horizontally
///
/// # Returns
///
/// Length of the pixel buffer for that geometry
#[must_use]
pub const fn compute_pixel_count(cols: usize, rows: usize, panels: usize) -> usize {
    cols * rows * panels
}

/// Immutable description of a chain of identical panels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PanelGeometry {
    columns_per_panel: usize,
    rows_per_panel: usize,
    panel_count: usize,
}

impl PanelGeometry {
    /// Describe `panel_count` panels of `columns_per_panel` × `rows_per_panel`.
    ///
    /// A panel count below 1 is clamped to 1.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidGeometry`] if either dimension is negative.
    pub fn new(
        columns_per_panel: i32,
        rows_per_panel: i32,
        panel_count: i32,
    ) -> Result<Self, Error> {
        if columns_per_panel < 0 || rows_per_panel < 0 {
            return Err(Error::InvalidGeometry);
        }
        Ok(Self {
            columns_per_panel: columns_per_panel as usize,
            rows_per_panel: rows_per_panel as usize,
            panel_count: panel_count.max(1) as usize,
        })
    }

    /// Geometry of `panel_count` chained 8×8 matrices.
    #[must_use]
    pub fn grid8x8(panel_count: usize) -> Self {
        Self {
            columns_per_panel: 8,
            rows_per_panel: 8,
            panel_count: panel_count.max(1),
        }
    }

    /// Number of columns in one panel
    #[inline]
    #[must_use]
    pub const fn columns_per_panel(&self) -> usize {
        self.columns_per_panel
    }

    /// Number of rows in one panel
    #[inline]
    #[must_use]
    pub const fn rows_per_panel(&self) -> usize {
        self.rows_per_panel
    }

    /// Number of chained panels
    #[inline]
    #[must_use]
    pub const fn panel_count(&self) -> usize {
        self.panel_count
    }

    /// Number of pixels in one panel
    #[inline]
    #[must_use]
    pub const fn pixels_per_panel(&self) -> usize {
        self.columns_per_panel * self.rows_per_panel
    }

    /// Number of columns across the whole chain
    #[inline]
    #[must_use]
    pub const fn columns_per_frame(&self) -> usize {
        self.columns_per_panel * self.panel_count
    }

    /// Number of rows in the frame. Panels only chain horizontally, so this is
    /// the panel height.
    #[inline]
    #[must_use]
    pub const fn rows_per_frame(&self) -> usize {
        self.rows_per_panel
    }

    /// Length of the pixel buffer backing this geometry
    #[inline]
    #[must_use]
    pub const fn pixel_count(&self) -> usize {
        compute_pixel_count(self.columns_per_panel, self.rows_per_panel, self.panel_count)
    }

    /// `true` when a zero dimension leaves no addressable pixel.
    #[inline]
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.pixel_count() == 0
    }

    /// Resolve a logical `(row, column)` to a buffer index.
    ///
    /// The column wraps modulo [`columns_per_frame`](Self::columns_per_frame)
    /// and the row wraps modulo [`rows_per_panel`](Self::rows_per_panel), so
    /// every non-negative pair lands on exactly one pixel.
    ///
    /// Returns `None` for a negative row or column and for an empty geometry;
    /// callers treat `None` as "do nothing".
    #[must_use]
    pub fn resolve(&self, row: i32, column: i32) -> Option<usize> {
        if row < 0 || column < 0 || self.is_empty() {
            return None;
        }
        let row = row as usize % self.rows_per_panel;
        let column = column as usize % self.columns_per_frame();
        Some(self.index(row, column))
    }

    /// Buffer index of an in-range `(row, column)`.
    #[inline]
    pub(crate) fn index(&self, row: usize, column: usize) -> usize {
        let panel = column / self.columns_per_panel;
        row * self.columns_per_panel
            + column % self.columns_per_panel
            + panel * self.pixels_per_panel()
    }
}

#[cfg(test)]
mod tests {
    extern crate std;

    use std::collections::HashSet;

    use super::*;

    #[test]
    fn test_compute_pixel_count() {
        assert_eq!(compute_pixel_count(8, 8, 1), 64);
        assert_eq!(compute_pixel_count(8, 8, 4), 256);
        assert_eq!(compute_pixel_count(5, 7, 3), 105);
        assert_eq!(compute_pixel_count(0, 8, 2), 0);
    }

    #[test]
    fn test_derived_values() {
        let g = PanelGeometry::new(8, 8, 2).unwrap();
        assert_eq!(g.pixels_per_panel(), 64);
        assert_eq!(g.columns_per_frame(), 16);
        assert_eq!(g.rows_per_frame(), 8);
        assert_eq!(g.pixel_count(), 128);
        assert!(!g.is_empty());
    }

    #[test]
    fn test_negative_dimensions_are_rejected() {
        assert_eq!(PanelGeometry::new(-1, 8, 1), Err(Error::InvalidGeometry));
        assert_eq!(PanelGeometry::new(8, -8, 1), Err(Error::InvalidGeometry));
    }

    #[test]
    fn test_panel_count_is_clamped() {
        assert_eq!(PanelGeometry::new(8, 8, 0).unwrap().panel_count(), 1);
        assert_eq!(PanelGeometry::new(8, 8, -3).unwrap().panel_count(), 1);
        assert_eq!(PanelGeometry::grid8x8(0).panel_count(), 1);
    }

    #[test]
    fn test_resolve_first_panel() {
        let g = PanelGeometry::new(8, 8, 2).unwrap();
        assert_eq!(g.resolve(0, 0), Some(0));
        assert_eq!(g.resolve(0, 7), Some(7));
        assert_eq!(g.resolve(1, 0), Some(8));
        assert_eq!(g.resolve(7, 7), Some(63));
    }

    #[test]
    fn test_resolve_crosses_into_second_panel() {
        let g = PanelGeometry::new(8, 8, 2).unwrap();
        assert_eq!(g.resolve(0, 8), Some(64));
        assert_eq!(g.resolve(0, 15), Some(71));
        assert_eq!(g.resolve(1, 8), Some(72));
        assert_eq!(g.resolve(7, 15), Some(127));
    }

    #[test]
    fn test_resolve_wraps_rows_and_columns() {
        let g = PanelGeometry::new(8, 8, 2).unwrap();
        assert_eq!(g.resolve(0, 16), g.resolve(0, 0));
        assert_eq!(g.resolve(8, 3), g.resolve(0, 3));
        assert_eq!(g.resolve(9, 17), g.resolve(1, 1));
    }

    #[test]
    fn test_resolve_negative_is_none() {
        let g = PanelGeometry::new(8, 8, 2).unwrap();
        assert_eq!(g.resolve(-1, 0), None);
        assert_eq!(g.resolve(0, -1), None);
    }

    #[test]
    fn test_resolve_empty_geometry_is_none() {
        let g = PanelGeometry::new(0, 8, 2).unwrap();
        assert!(g.is_empty());
        assert_eq!(g.resolve(0, 0), None);
        let g = PanelGeometry::new(8, 0, 2).unwrap();
        assert_eq!(g.resolve(3, 3), None);
    }

    #[test]
    fn test_resolve_is_a_bijection_over_the_frame() {
        for (cols, rows, panels) in [(8, 8, 1), (8, 8, 3), (5, 7, 2), (1, 4, 4), (16, 1, 2)] {
            let g = PanelGeometry::new(cols, rows, panels).unwrap();
            let mut seen = HashSet::new();
            for row in 0..g.rows_per_frame() as i32 {
                for column in 0..g.columns_per_frame() as i32 {
                    let index = g.resolve(row, column).unwrap();
                    assert!(index < g.pixel_count());
                    assert!(seen.insert(index), "duplicate index {index}");
                }
            }
            assert_eq!(seen.len(), g.pixel_count());
        }
    }

    #[test]
    fn test_uneven_panels() {
        // 5 wide, 3 tall, 2 panels: 15 pixels per panel
        let g = PanelGeometry::new(5, 3, 2).unwrap();
        assert_eq!(g.resolve(0, 5), Some(15));
        assert_eq!(g.resolve(2, 4), Some(14));
        assert_eq!(g.resolve(2, 9), Some(29));
    }
}

//! Frame primitives for chained LED panels.
//!
//! A [`Frame`] binds a [`PanelGeometry`] to a [`PixelBuffer`] of matching
//! length and provides every mutation used to build and animate an image:
//! solid and palette fills, per-pixel sets, swaps, circular shifts of the
//! whole buffer, panel-aware row/column rolls and lossy shifts, and simple
//! line and box drawing.
//!
//! # Index policy
//! Every entry point that takes a signed index treats a negative value as a
//! request to do nothing. Indices that are too large wrap modulo the relevant
//! dimension where the operation is defined in terms of wrapping, and are
//! dropped otherwise. No operation panics on a bad index.
//!
//! # Rolls and shifts
//! A *roll* is circular: the value leaving one edge re-enters at the other, so
//! repeated rolls animate without losing data. A *shift* is lossy: the value
//! leaving one edge is discarded and black is injected at the other edge, which
//! is what literal scrolling needs.
//!
//! # Example
//! ```rust
//! use embedded_graphics::pixelcolor::RgbColor;
//! use ledmatrix_framebuffer::{Color, Frame, PanelGeometry};
//!
//! let geometry = PanelGeometry::new(8, 8, 2).unwrap();
//! let mut frame = Frame::new(geometry);
//!
//! frame.set_in_panel(0, 1, Color::WHITE);
//! assert_eq!(frame.pixel(64), Some(Color::WHITE));
//!
//! frame.roll_right();
//! assert_eq!(frame.pixel(65), Some(Color::WHITE));
//! ```

use core::convert::Infallible;

use embedded_graphics::draw_target::DrawTarget;
use embedded_graphics::pixelcolor::RgbColor;
use embedded_graphics::prelude::{OriginDimensions, Point, Size};
use embedded_graphics::Pixel;

use crate::{Color, Error, PanelGeometry, PixelBuffer};

/// A pixel buffer bound to the geometry of the panels it is shown on.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct Frame {
    geometry: PanelGeometry,
    buffer: PixelBuffer,
}

impl Frame {
    /// Create an all-black frame for `geometry`.
    #[must_use]
    pub fn new(geometry: PanelGeometry) -> Self {
        Self {
            geometry,
            buffer: PixelBuffer::new(geometry.pixel_count()),
        }
    }

    /// Bind an existing buffer to `geometry`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidGeometry`] if the buffer length differs from
    /// [`PanelGeometry::pixel_count`].
    pub fn bind(geometry: PanelGeometry, buffer: PixelBuffer) -> Result<Self, Error> {
        if buffer.len() != geometry.pixel_count() {
            return Err(Error::InvalidGeometry);
        }
        Ok(Self { geometry, buffer })
    }

    /// Geometry this frame is laid out for
    #[inline]
    #[must_use]
    pub fn geometry(&self) -> &PanelGeometry {
        &self.geometry
    }

    /// The backing pixel buffer
    #[inline]
    #[must_use]
    pub fn buffer(&self) -> &PixelBuffer {
        &self.buffer
    }

    /// Give the buffer back, dropping the geometry binding.
    #[must_use]
    pub fn into_buffer(self) -> PixelBuffer {
        self.buffer
    }

    /// Pixels in storage (panel-major) order
    #[inline]
    #[must_use]
    pub fn pixels(&self) -> &[Color] {
        self.buffer.as_slice()
    }

    /// Number of pixels in the frame
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    /// `true` when the geometry has no pixels
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    /// Pixel at buffer `index`.
    #[inline]
    #[must_use]
    pub fn pixel(&self, index: usize) -> Option<Color> {
        self.buffer.get(index)
    }

    /// Pixel at logical `(row, column)`, with the wrapping of
    /// [`PanelGeometry::resolve`].
    #[must_use]
    pub fn point(&self, row: i32, column: i32) -> Option<Color> {
        self.geometry
            .resolve(row, column)
            .and_then(|index| self.buffer.get(index))
    }

    // ------------------------------------------------------------------
    // Fills
    // ------------------------------------------------------------------

    /// Set every pixel to black.
    pub fn clear(&mut self) {
        self.fill(Color::BLACK);
    }

    /// Fill the entire frame with one color.
    pub fn fill(&mut self, color: Color) {
        self.buffer.fill(color);
    }

    /// Fill the entire frame from a rolling palette: pixel `i` gets
    /// `palette[i % palette.len()]`. An empty palette does nothing.
    pub fn fill_palette(&mut self, palette: &[Color]) {
        let len = self.len();
        self.fill_palette_run(0, len, palette);
    }

    /// Fill `repeat` consecutive pixels from `start`, wrapping past the end of
    /// the buffer.
    pub fn fill_from(&mut self, start: i32, repeat: i32, color: Color) {
        if start < 0 || repeat < 0 || self.is_empty() {
            return;
        }
        let len = self.len();
        let pixels = self.buffer.as_mut_slice();
        for r in 0..repeat as usize {
            pixels[(start as usize + r) % len] = color;
        }
    }

    /// Like [`fill_from`](Self::fill_from), with the color taken from a
    /// rolling palette indexed by the unwrapped position.
    pub fn fill_from_palette(&mut self, start: i32, repeat: i32, palette: &[Color]) {
        if start < 0 || repeat < 0 {
            return;
        }
        self.fill_palette_run(start as usize, repeat as usize, palette);
    }

    fn fill_palette_run(&mut self, start: usize, repeat: usize, palette: &[Color]) {
        if palette.is_empty() || self.is_empty() {
            return;
        }
        let len = self.len();
        let pixels = self.buffer.as_mut_slice();
        for position in start..start + repeat {
            pixels[position % len] = palette[position % palette.len()];
        }
    }

    /// Fill the frame with contiguous blocks, one per palette entry.
    ///
    /// Each block is `len / palette.len()` pixels; the remainder is handed out
    /// one pixel each to the leading blocks. An empty palette clears the frame
    /// and a palette at least as long as the frame is laid down cycled, one
    /// color per pixel.
    pub fn fill_blocks(&mut self, palette: &[Color]) {
        if palette.is_empty() {
            self.clear();
            return;
        }
        let len = self.len();
        if palette.len() >= len {
            self.fill_palette_run(0, len, palette);
            return;
        }
        let base = len / palette.len();
        let leftovers = len % palette.len();
        let pixels = self.buffer.as_mut_slice();
        let mut at = 0;
        for (i, &color) in palette.iter().enumerate() {
            let size = base + usize::from(i < leftovers);
            pixels[at..at + size].fill(color);
            at += size;
        }
    }

    // ------------------------------------------------------------------
    // Single pixel sets
    // ------------------------------------------------------------------

    /// Set the pixel at a flat frame `position`.
    ///
    /// The position is read row-major across the whole chain, so position 8 of
    /// a two-panel 8×8 frame is the first pixel of the second panel, not the
    /// second row of the first panel.
    pub fn set(&mut self, position: i32, color: Color) {
        if position < 0 || self.is_empty() {
            return;
        }
        let columns = self.geometry.columns_per_frame();
        let row = (position as usize / columns) % self.geometry.rows_per_panel();
        let column = position as usize % columns;
        let index = self.geometry.index(row, column);
        self.buffer.set(index, color);
    }

    /// Set pixel `position` of `panel`, counting row-major within the panel.
    /// A result outside the buffer does nothing.
    pub fn set_in_panel(&mut self, position: i32, panel: i32, color: Color) {
        let index = i64::from(panel) * self.geometry.pixels_per_panel() as i64
            + i64::from(position);
        if index < 0 || index >= self.len() as i64 {
            return;
        }
        self.buffer.set(index as usize, color);
    }

    /// Set the pixel at logical `(row, column)`.
    pub fn set_point(&mut self, row: i32, column: i32, color: Color) {
        if let Some(index) = self.geometry.resolve(row, column) {
            self.buffer.set(index, color);
        }
    }

    /// Set a pixel addressed by an embedded-graphics point (`x` = column,
    /// `y` = row). Points off the canvas are clipped rather than wrapped.
    pub fn set_pixel(&mut self, p: Point, color: Color) {
        if p.x < 0 || p.y < 0 {
            return;
        }
        let (column, row) = (p.x as usize, p.y as usize);
        if column >= self.geometry.columns_per_frame() || row >= self.geometry.rows_per_frame() {
            return;
        }
        let index = self.geometry.index(row, column);
        self.buffer.set(index, color);
    }

    /// Set each listed buffer index to `color`, skipping indices outside the
    /// buffer.
    pub fn set_positions(&mut self, positions: &[i32], color: Color) {
        for &position in positions {
            if position >= 0 {
                self.buffer.set(position as usize, color);
            }
        }
    }

    /// Set each listed buffer index from a rolling palette; the `n`th listed
    /// index gets `palette[n % palette.len()]`. An empty palette does nothing.
    pub fn set_positions_from_palette(&mut self, positions: &[i32], palette: &[Color]) {
        if palette.is_empty() {
            return;
        }
        for (n, &position) in positions.iter().enumerate() {
            if position >= 0 {
                self.buffer.set(position as usize, palette[n % palette.len()]);
            }
        }
    }

    // ------------------------------------------------------------------
    // Whole-buffer moves
    // ------------------------------------------------------------------

    /// Exchange two pixels; both indices wrap modulo the buffer length.
    pub fn swap(&mut self, first: i32, second: i32) {
        if first < 0 || second < 0 || self.is_empty() {
            return;
        }
        let len = self.len();
        self.buffer
            .as_mut_slice()
            .swap(first as usize % len, second as usize % len);
    }

    /// Swap `index` with the pixel `step` places ahead of it, wrapping past the
    /// end. An `index` outside the buffer does nothing.
    pub fn rotate_one(&mut self, index: i32, step: i32) {
        if index < 0 || step < 0 || index as usize >= self.len() {
            return;
        }
        let len = self.len();
        let target = (index as usize + step as usize) % len;
        self.buffer.as_mut_slice().swap(index as usize, target);
    }

    /// Circularly rotate the whole buffer. Positive `amount` moves pixels
    /// toward higher indices, negative toward lower; the magnitude wraps modulo
    /// the buffer length.
    pub fn shift(&mut self, amount: i32) {
        if amount == 0 || self.is_empty() {
            return;
        }
        let len = self.len();
        let block = amount.unsigned_abs() as usize % len;
        let pixels = self.buffer.as_mut_slice();
        if amount > 0 {
            pixels.rotate_right(block);
        } else {
            pixels.rotate_left(block);
        }
    }

    /// Circularly rotate the buffer `amount` places toward higher indices.
    pub fn shift_forward(&mut self, amount: i32) {
        if amount < 0 {
            return;
        }
        self.shift(amount);
    }

    /// Circularly rotate the buffer `amount` places toward lower indices.
    pub fn shift_back(&mut self, amount: i32) {
        if amount < 0 {
            return;
        }
        self.shift(-amount);
    }

    // ------------------------------------------------------------------
    // Panel aware rolls (circular)
    // ------------------------------------------------------------------

    /// Roll one row right by a column across all panels; the rightmost pixel
    /// of the last panel re-enters at column 0.
    pub fn roll_row_right(&mut self, row: i32) {
        if row < 0 || self.is_empty() {
            return;
        }
        self.roll_row(row as usize % self.geometry.rows_per_panel(), true);
    }

    /// Roll one row left by a column across all panels.
    pub fn roll_row_left(&mut self, row: i32) {
        if row < 0 || self.is_empty() {
            return;
        }
        self.roll_row(row as usize % self.geometry.rows_per_panel(), false);
    }

    /// Roll one column down by a row; the bottom pixel re-enters at the top.
    pub fn roll_column_down(&mut self, column: i32) {
        if column < 0 || self.is_empty() {
            return;
        }
        self.roll_column(column as usize % self.geometry.columns_per_frame(), true);
    }

    /// Roll one column up by a row.
    pub fn roll_column_up(&mut self, column: i32) {
        if column < 0 || self.is_empty() {
            return;
        }
        self.roll_column(column as usize % self.geometry.columns_per_frame(), false);
    }

    /// Roll every row right.
    pub fn roll_right(&mut self) {
        for row in 0..self.geometry.rows_per_frame() {
            self.roll_row(row, true);
        }
    }

    /// Roll every row left.
    pub fn roll_left(&mut self) {
        for row in 0..self.geometry.rows_per_frame() {
            self.roll_row(row, false);
        }
    }

    /// Roll every column down.
    pub fn roll_down(&mut self) {
        for column in 0..self.geometry.columns_per_frame() {
            self.roll_column(column, true);
        }
    }

    /// Roll every column up.
    pub fn roll_up(&mut self) {
        for column in 0..self.geometry.columns_per_frame() {
            self.roll_column(column, false);
        }
    }

    fn roll_row(&mut self, row: usize, right: bool) {
        let geometry = self.geometry;
        let columns = geometry.columns_per_frame();
        if columns == 0 {
            return;
        }
        let pixels = self.buffer.as_mut_slice();
        if right {
            let wrapped = pixels[geometry.index(row, columns - 1)];
            for column in (1..columns).rev() {
                pixels[geometry.index(row, column)] = pixels[geometry.index(row, column - 1)];
            }
            pixels[geometry.index(row, 0)] = wrapped;
        } else {
            let wrapped = pixels[geometry.index(row, 0)];
            for column in 1..columns {
                pixels[geometry.index(row, column - 1)] = pixels[geometry.index(row, column)];
            }
            pixels[geometry.index(row, columns - 1)] = wrapped;
        }
    }

    fn roll_column(&mut self, column: usize, down: bool) {
        let geometry = self.geometry;
        let rows = geometry.rows_per_frame();
        if rows == 0 {
            return;
        }
        let pixels = self.buffer.as_mut_slice();
        if down {
            let wrapped = pixels[geometry.index(rows - 1, column)];
            for row in (1..rows).rev() {
                pixels[geometry.index(row, column)] = pixels[geometry.index(row - 1, column)];
            }
            pixels[geometry.index(0, column)] = wrapped;
        } else {
            let wrapped = pixels[geometry.index(0, column)];
            for row in 1..rows {
                pixels[geometry.index(row - 1, column)] = pixels[geometry.index(row, column)];
            }
            pixels[geometry.index(rows - 1, column)] = wrapped;
        }
    }

    // ------------------------------------------------------------------
    // Panel aware shifts (lossy)
    // ------------------------------------------------------------------

    /// Shift one row right by a column across all panels. The rightmost pixel
    /// is discarded and column 0 becomes black.
    pub fn shift_row_right(&mut self, row: i32) {
        if row < 0 || self.is_empty() {
            return;
        }
        self.shift_row(row as usize % self.geometry.rows_per_panel(), true);
    }

    /// Shift one row left by a column across all panels. The leftmost pixel is
    /// discarded and the last column of the last panel becomes black.
    pub fn shift_row_left(&mut self, row: i32) {
        if row < 0 || self.is_empty() {
            return;
        }
        self.shift_row(row as usize % self.geometry.rows_per_panel(), false);
    }

    /// Shift every row right.
    pub fn shift_right(&mut self) {
        for row in 0..self.geometry.rows_per_frame() {
            self.shift_row(row, true);
        }
    }

    /// Shift every row left.
    pub fn shift_left(&mut self) {
        for row in 0..self.geometry.rows_per_frame() {
            self.shift_row(row, false);
        }
    }

    fn shift_row(&mut self, row: usize, right: bool) {
        let geometry = self.geometry;
        let columns = geometry.columns_per_frame();
        if columns == 0 {
            return;
        }
        let pixels = self.buffer.as_mut_slice();
        if right {
            for column in (1..columns).rev() {
                pixels[geometry.index(row, column)] = pixels[geometry.index(row, column - 1)];
            }
            pixels[geometry.index(row, 0)] = Color::BLACK;
        } else {
            for column in 1..columns {
                pixels[geometry.index(row, column - 1)] = pixels[geometry.index(row, column)];
            }
            pixels[geometry.index(row, columns - 1)] = Color::BLACK;
        }
    }

    // ------------------------------------------------------------------
    // Lines and shapes
    // ------------------------------------------------------------------

    /// Draw an inclusive run of columns on one row. The ends are swapped if
    /// given in reverse, and columns past the frame wrap.
    pub fn draw_line(&mut self, row: i32, start_column: i32, end_column: i32, color: Color) {
        if row < 0 || start_column < 0 || end_column < 0 || self.is_empty() {
            return;
        }
        let (start, end) = if start_column > end_column {
            (end_column, start_column)
        } else {
            (start_column, end_column)
        };
        for column in start..=end {
            self.set_point(row, column, color);
        }
    }

    /// Draw a full row across every panel.
    pub fn draw_row(&mut self, row: i32, color: Color) {
        if row < 0 || self.is_empty() {
            return;
        }
        for start in self.row_starts(row as usize) {
            let end = start + self.geometry.columns_per_panel();
            self.buffer.as_mut_slice()[start..end].fill(color);
        }
    }

    /// Draw a full row across every panel from a rolling palette indexed by
    /// buffer position. An empty palette does nothing.
    pub fn draw_row_palette(&mut self, row: i32, palette: &[Color]) {
        if row < 0 || palette.is_empty() || self.is_empty() {
            return;
        }
        for start in self.row_starts(row as usize) {
            let end = start + self.geometry.columns_per_panel();
            let pixels = self.buffer.as_mut_slice();
            for (index, pixel) in pixels.iter_mut().enumerate().take(end).skip(start) {
                *pixel = palette[index % palette.len()];
            }
        }
    }

    // Buffer index of the first pixel of `row` in each panel.
    fn row_starts(&self, row: usize) -> impl Iterator<Item = usize> {
        let geometry = self.geometry;
        let row = row % geometry.rows_per_panel();
        (0..geometry.panel_count())
            .map(move |panel| panel * geometry.pixels_per_panel() + row * geometry.columns_per_panel())
    }

    /// Draw a full column, top to bottom.
    pub fn draw_column(&mut self, column: i32, color: Color) {
        if column < 0 || self.is_empty() {
            return;
        }
        let column = column as usize % self.geometry.columns_per_frame();
        for row in 0..self.geometry.rows_per_frame() {
            let index = self.geometry.index(row, column);
            self.buffer.set(index, color);
        }
    }

    /// Draw a full column with row `r` colored `palette[r % palette.len()]`.
    /// An empty palette does nothing.
    pub fn draw_column_palette(&mut self, column: i32, palette: &[Color]) {
        if column < 0 || palette.is_empty() || self.is_empty() {
            return;
        }
        let column = column as usize % self.geometry.columns_per_frame();
        for row in 0..self.geometry.rows_per_frame() {
            let index = self.geometry.index(row, column);
            self.buffer.set(index, palette[row % palette.len()]);
        }
    }

    /// Draw the outline of a box `width` columns wide and `depth` rows deep.
    ///
    /// Both horizontal edges end at column `start_row + width - 1` rather than
    /// `start_column + width - 1`; the two agree only when the box starts on
    /// the diagonal. Existing displays depend on this, so it is kept. All four
    /// sides are drawn in `color`.
    pub fn draw_box(
        &mut self,
        start_row: i32,
        start_column: i32,
        width: i32,
        depth: i32,
        color: Color,
    ) {
        if start_row < 0 || start_column < 0 || width <= 0 || depth <= 0 {
            return;
        }
        let edge_end = start_row.saturating_add(width - 1);
        let bottom_row = start_row.saturating_add(depth - 1);
        let right_column = start_column.saturating_add(width - 1);

        self.draw_line(start_row, start_column, edge_end, color);
        self.draw_line(bottom_row, start_column, edge_end, color);
        for d in 1..depth - 1 {
            let row = start_row.saturating_add(d);
            self.set_point(row, start_column, color);
            self.set_point(row, right_column, color);
        }
    }

    /// Paint a glyph into one panel. `columns` holds one byte per column with
    /// bit `r` lighting row `r`; lit bits take `color` and unlit bits are set
    /// to black. An out-of-range panel does nothing.
    pub fn draw_bitmap(&mut self, columns: &[u8], color: Color, panel: i32) {
        if panel < 0 || panel as usize >= self.geometry.panel_count() {
            return;
        }
        let per_panel = self.geometry.columns_per_panel();
        let rows = self.geometry.rows_per_panel().min(8);
        for (column, &bits) in columns.iter().enumerate().take(per_panel) {
            for row in 0..rows {
                let lit = bits & (1 << row) != 0;
                let position = (row * per_panel + column) as i32;
                self.set_in_panel(position, panel, if lit { color } else { Color::BLACK });
            }
        }
    }
}

impl OriginDimensions for Frame {
    fn size(&self) -> Size {
        Size::new(
            self.geometry.columns_per_frame() as u32,
            self.geometry.rows_per_frame() as u32,
        )
    }
}

impl DrawTarget for Frame {
    type Color = Color;

    type Error = Infallible;

    fn draw_iter<I>(&mut self, pixels: I) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        for Pixel(point, color) in pixels {
            self.set_pixel(point, color);
        }
        Ok(())
    }

    fn clear(&mut self, color: Self::Color) -> Result<(), Self::Error> {
        self.fill(color);
        Ok(())
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for Frame {
    fn format(&self, f: defmt::Formatter) {
        defmt::write!(
            f,
            "Frame<{}x{} x{}>",
            self.geometry.columns_per_panel(),
            self.geometry.rows_per_panel(),
            self.geometry.panel_count()
        );
        defmt::write!(f, " pixels: {}", self.len());
    }
}

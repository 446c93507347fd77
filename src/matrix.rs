//! A frame paired with the driver that shows it.
//!
//! [`LedMatrix`] is the thin adapter between drawing and hardware: all pixel
//! work happens on the owned [`Frame`] (reachable through
//! [`frame_mut`](LedMatrix::frame_mut)), and [`draw`](LedMatrix::draw) hands
//! the whole frame to the [`Drawable`] driver. The text and animation helpers
//! are built from frame operations plus draws and blocking delays.
//!
//! Animations that can take a while accept a [`Cancel`] that is polled only
//! between steps, after a delay has elapsed, so the frame is never left
//! half-updated.
//!
//! ```rust
//! use embedded_graphics::pixelcolor::RgbColor;
//! use ledmatrix_framebuffer::{Color, Drawable, Frame, LedMatrix};
//!
//! struct Null;
//!
//! impl Drawable for Null {
//!     type Error = ();
//!     fn panel_count(&self) -> usize {
//!         2
//!     }
//!     fn write(&mut self, _frame: &Frame) -> Result<(), ()> {
//!         Ok(())
//!     }
//! }
//!
//! let mut matrix = LedMatrix::new(Null);
//! assert_eq!(matrix.frame().geometry().columns_per_frame(), 16);
//! matrix.frame_mut().draw_row(0, Color::RED);
//! matrix.draw().unwrap();
//! ```

use embedded_graphics::pixelcolor::RgbColor;
use embedded_hal::delay::DelayNs;

use crate::driver::Drawable;
use crate::font::Font;
use crate::scroll::{blank_like, Blink, BlinkPhase, Cancel, ScrollEngine, ScrollState};
use crate::{Color, Error, Frame, PanelGeometry, ScrollDirection, ScrollOutcome};

/// A [`Frame`] sized for a driver's panels, plus the driver.
#[derive(Debug)]
pub struct LedMatrix<D> {
    frame: Frame,
    driver: D,
}

impl<D: Drawable> LedMatrix<D> {
    /// Matrix of 8×8 panels, as many as the driver has.
    pub fn new(driver: D) -> Self {
        let geometry = PanelGeometry::grid8x8(driver.panel_count());
        Self {
            frame: Frame::new(geometry),
            driver,
        }
    }

    /// Matrix with an explicit panel geometry.
    ///
    /// # Errors
    ///
    /// Returns [`Error::PanelCountMismatch`] if `geometry` doesn't have the
    /// driver's panel count.
    pub fn with_geometry(driver: D, geometry: PanelGeometry) -> Result<Self, Error> {
        let expected = driver.panel_count();
        if geometry.panel_count() != expected {
            return Err(Error::PanelCountMismatch {
                expected,
                found: geometry.panel_count(),
            });
        }
        Ok(Self {
            frame: Frame::new(geometry),
            driver,
        })
    }

    /// The frame being drawn
    pub fn frame(&self) -> &Frame {
        &self.frame
    }

    /// Mutable access to the frame. Nothing reaches the panels until
    /// [`draw`](Self::draw).
    pub fn frame_mut(&mut self) -> &mut Frame {
        &mut self.frame
    }

    /// The driver
    pub fn driver(&self) -> &D {
        &self.driver
    }

    /// Mutable access to the driver, e.g. for brightness.
    pub fn driver_mut(&mut self) -> &mut D {
        &mut self.driver
    }

    /// Split into frame and driver.
    pub fn into_parts(self) -> (Frame, D) {
        (self.frame, self.driver)
    }

    /// Send the frame to the panels.
    ///
    /// # Errors
    ///
    /// Passes the driver's error through.
    pub fn draw(&mut self) -> Result<(), D::Error> {
        self.driver.write(&self.frame)
    }

    /// Paint the glyph for `ch` into `panel`. Lit bits get `color`, unlit bits
    /// inside the glyph are cleared.
    pub fn draw_letter<F: Font>(&mut self, font: &F, ch: char, color: Color, panel: i32) {
        self.frame.draw_bitmap(font.glyph(ch), color, panel);
    }

    /// Show `text` one character at a time in `panel`, drawing after each and
    /// then waiting `delay_ms`. Colors cycle through `palette`; characters
    /// without a glyph are skipped. An empty palette does nothing.
    ///
    /// # Errors
    ///
    /// Passes the driver's error through.
    pub fn draw_string<F: Font>(
        &mut self,
        font: &F,
        text: &str,
        palette: &[Color],
        delay_ms: u32,
        panel: i32,
        delay: &mut impl DelayNs,
    ) -> Result<(), D::Error> {
        if palette.is_empty() {
            return Ok(());
        }
        let glyphs = text.chars().map(move |ch| font.glyph(ch)).filter(|g| !g.is_empty());
        for (glyph, &color) in glyphs.zip(palette.iter().cycle()) {
            self.frame.draw_bitmap(glyph, color, panel);
            self.draw()?;
            delay.delay_ms(delay_ms);
        }
        Ok(())
    }

    /// Scroll one glyph in from `direction`.
    ///
    /// Each time a column enters, the frame is drawn and `delay_ms` elapses,
    /// then `cancel` is polled. With `delay_ms == 0` nothing is drawn and the
    /// scroll only updates the frame.
    ///
    /// # Errors
    ///
    /// Passes the driver's error through.
    pub fn scroll_glyph(
        &mut self,
        glyph: &[u8],
        direction: ScrollDirection,
        color: Color,
        delay_ms: u32,
        delay: &mut impl DelayNs,
        cancel: &mut impl Cancel,
    ) -> Result<ScrollOutcome, D::Error> {
        let mut engine = ScrollEngine::new(glyph, direction, color);
        loop {
            match engine.advance(&mut self.frame) {
                ScrollState::EmittingColumn => {
                    if delay_ms > 0 {
                        self.draw()?;
                        delay.delay_ms(delay_ms);
                    }
                    if cancel.is_cancelled() {
                        return Ok(ScrollOutcome::Cancelled);
                    }
                }
                ScrollState::Idle | ScrollState::ShiftingEdge => {}
                ScrollState::Done => return Ok(ScrollOutcome::Completed),
            }
        }
    }

    /// Scroll the glyph for `ch` in from `direction`. A character without a
    /// glyph completes immediately.
    ///
    /// # Errors
    ///
    /// Passes the driver's error through.
    #[allow(clippy::too_many_arguments)]
    pub fn scroll_character<F: Font>(
        &mut self,
        font: &F,
        ch: char,
        direction: ScrollDirection,
        color: Color,
        delay_ms: u32,
        delay: &mut impl DelayNs,
        cancel: &mut impl Cancel,
    ) -> Result<ScrollOutcome, D::Error> {
        self.scroll_glyph(font.glyph(ch), direction, color, delay_ms, delay, cancel)
    }

    /// Scroll `text` in from `direction`, one character after another.
    ///
    /// Entering from the right, characters go in reading order; from the left
    /// they go last character first, so the text reads correctly once it has
    /// arrived. Each character takes the next `palette` color; characters
    /// without a glyph are skipped. An empty palette does nothing.
    ///
    /// # Errors
    ///
    /// Passes the driver's error through.
    #[allow(clippy::too_many_arguments)]
    pub fn scroll_string<F: Font>(
        &mut self,
        font: &F,
        text: &str,
        direction: ScrollDirection,
        palette: &[Color],
        delay_ms: u32,
        delay: &mut impl DelayNs,
        cancel: &mut impl Cancel,
    ) -> Result<ScrollOutcome, D::Error> {
        if palette.is_empty() {
            return Ok(ScrollOutcome::Completed);
        }
        let mut forward = text.chars();
        let mut backward = text.chars().rev();
        let chars: &mut dyn Iterator<Item = char> = match direction {
            ScrollDirection::FromRight => &mut forward,
            ScrollDirection::FromLeft => &mut backward,
        };
        let glyphs = chars.map(move |ch| font.glyph(ch)).filter(|g| !g.is_empty());
        for (glyph, &color) in glyphs.zip(palette.iter().cycle()) {
            let outcome = self.scroll_glyph(glyph, direction, color, delay_ms, delay, cancel)?;
            if outcome == ScrollOutcome::Cancelled {
                return Ok(outcome);
            }
        }
        Ok(ScrollOutcome::Completed)
    }

    /// Walk a single `color` pixel around the whole buffer on `background`,
    /// `cycles` full laps, drawing after every one-place circular shift.
    ///
    /// # Errors
    ///
    /// Passes the driver's error through.
    pub fn spin(
        &mut self,
        color: Color,
        background: Color,
        cycles: usize,
        step_delay_ms: u32,
        delay: &mut impl DelayNs,
    ) -> Result<(), D::Error> {
        self.frame.fill(background);
        self.frame.set_positions(&[0], color);
        self.draw()?;
        for _ in 0..cycles {
            for _ in 0..self.frame.len() {
                self.frame.shift(1);
                self.draw()?;
                delay.delay_ms(step_delay_ms);
            }
        }
        Ok(())
    }

    /// Blink the panels `repeat` times: wait, show a blank frame, wait, show
    /// the frame again.
    ///
    /// The frame itself is never modified. `cancel` is polled after each
    /// change; if it fires while the blank frame is up the content is
    /// restored before returning.
    ///
    /// # Errors
    ///
    /// Passes the driver's error through.
    pub fn blink(
        &mut self,
        delay_ms: u32,
        repeat: usize,
        delay: &mut impl DelayNs,
        cancel: &mut impl Cancel,
    ) -> Result<ScrollOutcome, D::Error> {
        let blank = blank_like(&self.frame);
        for phase in Blink::new(repeat) {
            delay.delay_ms(delay_ms);
            match phase {
                BlinkPhase::Blank => self.driver.write(&blank)?,
                BlinkPhase::Content => self.draw()?,
            }
            if cancel.is_cancelled() {
                if phase == BlinkPhase::Blank {
                    self.draw()?;
                }
                return Ok(ScrollOutcome::Cancelled);
            }
        }
        Ok(ScrollOutcome::Completed)
    }
}

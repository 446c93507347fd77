//! Bit-plane encoding for 8×8 matrix driver chips.
//!
//! Matrix driver chips don't take colors, they take one bit per LED. A
//! [`BitPlane`] packs one 8×8 panel into a `u64`: bit `i` is pixel `i` of the
//! panel in row-major order, so byte `b` of the word is row `b`.
//!
//! ```text
//!  byte 7 | row 7 | bits 63..56
//!  ...
//!  byte 1 | row 1 | bits 15..8
//!  byte 0 | row 0 | bits  7..0    (bit 0 = column 0)
//! ```
//!
//! Monochrome chips get one plane per panel from [`pack_monochrome`]. Bi-color
//! chips get a green and a red plane per panel from [`pack_dual_color`]; yellow
//! is both LEDs at once.
//!
//! Panels are rarely mounted the way the frame is drawn. An [`Orientation`]
//! describes the per-panel bitmap transform (quarter turns then an optional
//! horizontal flip) and, independently, whether the chain is wired so that the
//! last logical panel must be transmitted first.

use alloc::vec::Vec;

use embedded_graphics::pixelcolor::RgbColor;

use crate::{Color, Error, Frame};

/// Number of pixels a single bit-plane can hold.
pub const PLANE_PIXELS: usize = 64;

/// One color channel of one 8×8 panel.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(transparent)]
pub struct BitPlane(pub u64);

impl BitPlane {
    /// A plane with every pixel off
    pub const EMPTY: Self = Self(0);

    /// Build a plane from its eight row bytes, row 0 first.
    #[must_use]
    pub const fn from_rows(rows: [u8; 8]) -> Self {
        Self(u64::from_le_bytes(rows))
    }

    /// The eight row bytes, row 0 first.
    #[must_use]
    pub const fn rows(self) -> [u8; 8] {
        self.0.to_le_bytes()
    }

    /// Row byte `b` (0..8); bit `k` of the result is column `k`.
    #[inline]
    #[must_use]
    pub const fn row(self, b: usize) -> u8 {
        (self.0 >> ((b & 7) * 8)) as u8
    }

    /// Is pixel `i` lit? Indices past 63 are never lit.
    #[inline]
    #[must_use]
    pub const fn is_set(self, i: usize) -> bool {
        i < PLANE_PIXELS && self.0 & (1 << i) != 0
    }

    /// Light pixel `i`. Indices past 63 are ignored.
    #[inline]
    pub fn set(&mut self, i: usize) {
        if i < PLANE_PIXELS {
            self.0 |= 1 << i;
        }
    }

    /// Rotate the 8×8 bit matrix a quarter turn anticlockwise.
    ///
    /// Bit `k` of row `b` becomes bit `b` of row `7 - k`. Four rotations give
    /// back the original plane.
    #[must_use]
    pub fn rotate_anticlockwise(self) -> Self {
        let mut output = 0u64;
        for (b, row) in self.rows().into_iter().enumerate() {
            for k in 0..8 {
                if row & (1 << k) != 0 {
                    output |= 1 << ((7 - k) * 8 + b);
                }
            }
        }
        Self(output)
    }

    /// Reverse the order of the eight row bytes. Self-inverse.
    #[inline]
    #[must_use]
    pub const fn flip_horizontal(self) -> Self {
        Self(self.0.swap_bytes())
    }
}

impl From<u64> for BitPlane {
    fn from(value: u64) -> Self {
        Self(value)
    }
}

impl From<BitPlane> for u64 {
    fn from(plane: BitPlane) -> Self {
        plane.0
    }
}

/// The four states of a bi-color (red/green) LED.
///
/// Classification is exact: only pure green, pure red and pure yellow light
/// anything. Every other color is [`BiColor::Off`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum BiColor {
    /// Neither LED
    Off,
    /// Green LED only
    Green,
    /// Red LED only
    Red,
    /// Both LEDs
    Yellow,
}

impl BiColor {
    /// Classify a frame color.
    #[must_use]
    pub fn from_color(color: Color) -> Self {
        match (color.r(), color.g(), color.b()) {
            (0, 0xff, 0) => Self::Green,
            (0xff, 0, 0) => Self::Red,
            (0xff, 0xff, 0) => Self::Yellow,
            _ => Self::Off,
        }
    }

    /// Does this state light the green LED?
    #[must_use]
    pub const fn green(self) -> bool {
        matches!(self, Self::Green | Self::Yellow)
    }

    /// Does this state light the red LED?
    #[must_use]
    pub const fn red(self) -> bool {
        matches!(self, Self::Red | Self::Yellow)
    }
}

/// Pack each panel into one plane: a pixel is on when any RGB channel is
/// non-zero.
///
/// Only the first 64 pixels of each panel fit in a plane; the rest are
/// ignored.
#[must_use]
pub fn pack_monochrome(frame: &Frame) -> Vec<BitPlane> {
    panels(frame)
        .map(|pixels| {
            let mut plane = BitPlane::EMPTY;
            for (i, &color) in pixels.iter().enumerate().take(PLANE_PIXELS) {
                if color != Color::BLACK {
                    plane.set(i);
                }
            }
            plane
        })
        .collect()
}

/// Pack each panel into a green and a red plane, returned as
/// `(green, red)`. See [`BiColor`] for the classification.
#[must_use]
pub fn pack_dual_color(frame: &Frame) -> (Vec<BitPlane>, Vec<BitPlane>) {
    panels(frame)
        .map(|pixels| {
            let mut green = BitPlane::EMPTY;
            let mut red = BitPlane::EMPTY;
            for (i, &color) in pixels.iter().enumerate().take(PLANE_PIXELS) {
                let state = BiColor::from_color(color);
                if state.green() {
                    green.set(i);
                }
                if state.red() {
                    red.set(i);
                }
            }
            (green, red)
        })
        .unzip()
}

fn panels(frame: &Frame) -> impl Iterator<Item = &[Color]> {
    let geometry = frame.geometry();
    let per_panel = geometry.pixels_per_panel();
    let pixels = frame.pixels();
    (0..geometry.panel_count()).map(move |panel| &pixels[panel * per_panel..(panel + 1) * per_panel])
}

/// Number of anticlockwise quarter turns applied to each panel bitmap.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Rotation {
    /// As drawn
    #[default]
    None = 0,
    /// 90° anticlockwise
    D90 = 1,
    /// 180°
    D180 = 2,
    /// 270° anticlockwise (90° clockwise)
    D270 = 3,
}

impl Rotation {
    /// Number of quarter turns
    #[must_use]
    pub const fn quarter_turns(self) -> usize {
        self as usize
    }
}

/// Physical mounting of a chain of panels.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Orientation {
    /// Quarter turns applied to every panel bitmap
    pub rotation: Rotation,
    /// Reverse the row bytes after rotating
    pub flip_horizontal: bool,
    /// Transmit the last logical panel first
    pub reverse_panels: bool,
}

impl Orientation {
    /// Apply the per-panel transform: rotation first, then the optional flip.
    #[must_use]
    pub fn apply(&self, plane: BitPlane) -> BitPlane {
        let mut plane = plane;
        for _ in 0..self.rotation.quarter_turns() {
            plane = plane.rotate_anticlockwise();
        }
        if self.flip_horizontal {
            plane = plane.flip_horizontal();
        }
        plane
    }

    /// Transform every plane and put them in transmission order.
    #[must_use]
    pub fn orient(&self, planes: Vec<BitPlane>) -> Vec<BitPlane> {
        let mut planes: Vec<BitPlane> = planes.into_iter().map(|p| self.apply(p)).collect();
        if self.reverse_panels {
            planes.reverse();
        }
        planes
    }
}

/// Frame-to-wire codec configured for one chain of panels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct BitPlaneCodec {
    panel_count: usize,
    orientation: Orientation,
}

impl BitPlaneCodec {
    /// Codec for `panel_count` panels mounted as `orientation`.
    #[must_use]
    pub const fn new(panel_count: usize, orientation: Orientation) -> Self {
        Self {
            panel_count,
            orientation,
        }
    }

    /// Number of panels the codec expects
    #[must_use]
    pub const fn panel_count(&self) -> usize {
        self.panel_count
    }

    /// Mounting applied on encode
    #[must_use]
    pub const fn orientation(&self) -> Orientation {
        self.orientation
    }

    /// Pack and orient one plane per panel, in transmission order.
    ///
    /// # Errors
    ///
    /// Returns [`Error::PanelCountMismatch`] if the frame has a different
    /// number of panels than the codec.
    pub fn encode_monochrome(&self, frame: &Frame) -> Result<Vec<BitPlane>, Error> {
        self.check(frame)?;
        Ok(self.orientation.orient(pack_monochrome(frame)))
    }

    /// Pack and orient `(green, red)` planes per panel, in transmission order.
    ///
    /// # Errors
    ///
    /// Returns [`Error::PanelCountMismatch`] if the frame has a different
    /// number of panels than the codec.
    pub fn encode_dual_color(
        &self,
        frame: &Frame,
    ) -> Result<(Vec<BitPlane>, Vec<BitPlane>), Error> {
        self.check(frame)?;
        let (green, red) = pack_dual_color(frame);
        Ok((self.orientation.orient(green), self.orientation.orient(red)))
    }

    fn check(&self, frame: &Frame) -> Result<(), Error> {
        let found = frame.geometry().panel_count();
        if found != self.panel_count {
            #[cfg(feature = "log")]
            log::warn!(
                "codec expects {} panels, frame has {}",
                self.panel_count,
                found
            );
            return Err(Error::PanelCountMismatch {
                expected: self.panel_count,
                found,
            });
        }
        Ok(())
    }
}

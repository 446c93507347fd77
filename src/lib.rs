//! Framebuffer and bit-plane codec for chained 8×8 LED matrix panels.
//!
//! ## How LED Matrix Driver Chips Work
//!
//! Small LED matrix modules are not framebuffers with a color per pixel. Each
//! 8×8 panel sits behind a driver chip that multiplexes the rows itself and
//! only stores **one bit per LED** in a handful of registers.
//!
//! ### MAX7219 / MAX7221 (monochrome, SPI)
//! - Eight *digit* registers hold one row each; bit `k` of a row byte lights
//!   column `k` once BCD decoding is switched off.
//! - The chip is a 16-bit shift register. Chaining modules joins the shift
//!   registers, so one chip-select frame carries one word per chip and the
//!   first word clocked in ends up in the chip furthest down the chain.
//! - Control registers set scan limit, decode mode, shutdown, display test and
//!   a 16-level intensity.
//!
//! ### HT16K33 bi-color backpacks (red/green, I²C)
//! - Each backpack has its own controller and address.
//! - Display RAM holds a green and a red byte per row; lighting both gives
//!   yellow, so a panel shows exactly four states.
//! - The controller blinks in hardware (2 Hz, 1 Hz, 0.5 Hz) and dims in 16
//!   steps.
//!
//! ### Implications for software
//! - A frame is drawn in full color and converted right before it is sent:
//!   monochrome panels light any non-black pixel, bi-color panels classify
//!   pure green, red and yellow and leave everything else dark.
//! - Modules are often mounted rotated, mirrored, or chained right to left,
//!   so the conversion applies a per-panel transform and may reverse the panel
//!   order.
//! - Nothing refreshes by itself from a buffer in RAM; the driver writes
//!   whenever the application asks it to.
//!
//! ## Crate Layout
//!
//! 1. **Geometry and storage** ([`geometry`], [`buffer`], [`frame`])
//!    - [`PanelGeometry`] describes `columns × rows` panels chained
//!      horizontally and maps `(row, column)` to a flat index.
//!    - [`Frame`] binds a geometry to a [`PixelBuffer`] and provides fills,
//!      shifts, panel-aware rolls and simple drawing. It is also an
//!      `embedded-graphics` [`DrawTarget`](embedded_graphics::draw_target::DrawTarget).
//!
//! 2. **Encoding** ([`bitplane`])
//!    - [`BitPlaneCodec`] packs each panel of a frame into 64-bit
//!      [`BitPlane`]s and applies an [`Orientation`].
//!
//! 3. **Hardware** ([`interface`], [`driver`], [`matrix`])
//!    - [`driver::Max7219`] and [`driver::Ht16k33`] implement [`Drawable`]
//!      over an `embedded-hal` SPI or I²C bus.
//!    - [`LedMatrix`] owns a frame and a driver and adds text and animation
//!      helpers on top of [`font`] and [`scroll`].
//!
//! Negative indices are a request to do nothing throughout: every operation
//! that takes a signed index checks it first and returns without touching the
//! buffer.
//!
//! ## Multiple Panels
//! Panels chain left to right. Row `r` of the whole frame is row `r` of every
//! panel, and frame column `c` is column `c % columns_per_panel` of panel
//! `c / columns_per_panel`. Storage is panel-major, so each panel's pixels are
//! contiguous and a codec can slice them out directly:
//!
//! ```rust
//! use embedded_graphics::pixelcolor::RgbColor;
//! use ledmatrix_framebuffer::{BitPlaneCodec, Color, Frame, Orientation, PanelGeometry};
//!
//! let mut frame = Frame::new(PanelGeometry::grid8x8(2));
//! frame.set_point(0, 8, Color::WHITE);
//! assert_eq!(frame.pixel(64), Some(Color::WHITE));
//!
//! let codec = BitPlaneCodec::new(2, Orientation::default());
//! let planes = codec.encode_monochrome(&frame).unwrap();
//! assert_eq!(planes[1].row(0), 0x01);
//! ```
//!
//! ## Available Feature Flags
//!
//! ### `defmt` Feature
//! Implements `defmt::Format` for the public types so they can be emitted with
//! the `defmt` logging framework. No functional changes; purely adds trait
//! impls.
//!
//! ```toml
//! [dependencies]
//! ledmatrix-framebuffer = { version = "0.1.0", features = ["defmt"] }
//! ```
//!
//! ### `log` Feature
//! Emits `log` records from the drivers: `debug` on initialisation and
//! brightness, blink and power changes, `warn` when a frame with the wrong
//! panel count is handed to a codec.
//!
//! ```toml
//! [dependencies]
//! ledmatrix-framebuffer = { version = "0.1.0", features = ["log"] }
//! ```
#![no_std]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::cast_possible_wrap)]

extern crate alloc;

use embedded_graphics::pixelcolor::Rgb888;

pub mod bitplane;
pub mod buffer;
pub mod driver;
pub mod error;
pub mod font;
pub mod frame;
pub mod geometry;
pub mod interface;
pub mod matrix;
pub mod scroll;

pub use bitplane::{BiColor, BitPlane, BitPlaneCodec, Orientation, Rotation};
pub use buffer::PixelBuffer;
pub use driver::Drawable;
pub use error::Error;
pub use font::{Font, TableFont};
pub use frame::Frame;
pub use geometry::{compute_pixel_count, PanelGeometry};
pub use interface::{DisplayInterface, I2cInterface, SpiInterface};
pub use matrix::LedMatrix;
pub use scroll::{
    Blink, BlinkPhase, Cancel, NeverCancel, ScrollDirection, ScrollEngine, ScrollOutcome,
    ScrollState,
};

/// Color type used in the framebuffer
pub type Color = Rgb888;

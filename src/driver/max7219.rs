//! MAX7219 / MAX7221 driver for daisy-chained monochrome 8×8 panels.
//!
//! The chips are shift registers: every chip-select frame carries one 16-bit
//! word per chip, and the word clocked in first ends up in the chip furthest
//! down the chain. Writing a register on every panel therefore takes a single
//! SPI write of `2 * panel_count` bytes.
//!
//! ```text
//!  15      12 11      8 7             0
//! ┌──────────┬─────────┬───────────────┐
//! │ ignored  │ address │     data      │   sent MSB first
//! └──────────┴─────────┴───────────────┘
//! ```
//!
//! Rows go out through the eight digit registers with decode mode off, so each
//! row byte of a [`BitPlane`](crate::BitPlane) lands on the panel unchanged.

use alloc::vec;
use alloc::vec::Vec;

use bitfield::bitfield;

use super::Drawable;
use crate::interface::DisplayInterface;
use crate::{BitPlaneCodec, Error, Frame, Orientation, Rotation};

/// Highest value the intensity register accepts
pub const MAX_BRIGHTNESS: u8 = 15;

/// Intensity written by [`Max7219::init`] unless changed first
pub const DEFAULT_BRIGHTNESS: u8 = 2;

/// Mounting of a typical FC-16 style module: panels upright, wired so the
/// last logical panel is first in the chain.
pub const CHAIN_ORIENTATION: Orientation = Orientation {
    rotation: Rotation::None,
    flip_horizontal: false,
    reverse_panels: true,
};

/// MAX7219 register addresses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
#[allow(missing_docs)]
pub enum Register {
    /// Row 0 segments
    Digit0 = 0x01,
    Digit1 = 0x02,
    Digit2 = 0x03,
    Digit3 = 0x04,
    Digit4 = 0x05,
    Digit5 = 0x06,
    Digit6 = 0x07,
    /// Row 7 segments
    Digit7 = 0x08,
    /// BCD decode per digit, zero for raw segments
    DecodeMode = 0x09,
    /// PWM brightness, `0..=15`
    Intensity = 0x0A,
    /// Number of digits scanned minus one
    ScanLimit = 0x0B,
    /// Zero shuts the display down
    Shutdown = 0x0C,
    /// Non-zero lights every LED
    DisplayTest = 0x0F,
}

impl Register {
    const DIGITS: [Self; 8] = [
        Self::Digit0,
        Self::Digit1,
        Self::Digit2,
        Self::Digit3,
        Self::Digit4,
        Self::Digit5,
        Self::Digit6,
        Self::Digit7,
    ];

    /// Wire address
    #[must_use]
    pub const fn addr(self) -> u8 {
        self as u8
    }
}

bitfield! {
    /// One 16-bit serial word for a single chip in the chain.
    ///
    /// - Bits 11-8: Register address
    /// - Bits 7-0: Register data
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
    #[repr(transparent)]
    struct RegisterWord(u16);
    u8, _, set_address: 11, 8;
    u8, _, set_data: 7, 0;
}

impl RegisterWord {
    /// Word writing `data` to `register`.
    #[must_use]
    pub fn new(register: Register, data: u8) -> Self {
        let mut word = Self(0);
        word.set_address(register.addr());
        word.set_data(data);
        word
    }

    /// Bytes in transmission order
    #[must_use]
    pub fn to_bytes(self) -> [u8; 2] {
        self.0.to_be_bytes()
    }
}

/// Driver for a chain of MAX7219 panels behind one chip select.
#[derive(Debug)]
pub struct Max7219<DI> {
    interface: DI,
    codec: BitPlaneCodec,
    brightness: u8,
    // one chain-wide message, two bytes per panel
    message: Vec<u8>,
}

impl<DI: DisplayInterface> Max7219<DI> {
    /// Driver for `panel_count` chained panels mounted as `orientation`.
    ///
    /// Nothing is sent until [`init`](Self::init).
    /// A `panel_count` of zero is taken as one.
    pub fn new(interface: DI, panel_count: usize, orientation: Orientation) -> Self {
        let panel_count = panel_count.max(1);
        Self {
            interface,
            codec: BitPlaneCodec::new(panel_count, orientation),
            brightness: DEFAULT_BRIGHTNESS,
            message: vec![0; panel_count * 2],
        }
    }

    /// Power-on sequence: scan all eight digits, raw (non-decoded) data,
    /// leave shutdown, display test off, then intensity.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Interface`] if the bus fails.
    pub fn init(&mut self) -> Result<(), Error<DI::Error>> {
        #[cfg(feature = "log")]
        log::debug!(
            "max7219: init {} panels, brightness {}",
            self.codec.panel_count(),
            self.brightness
        );
        self.broadcast(RegisterWord::new(Register::ScanLimit, 0x07))?;
        self.broadcast(RegisterWord::new(Register::DecodeMode, 0x00))?;
        self.broadcast(RegisterWord::new(Register::Shutdown, 0x01))?;
        self.broadcast(RegisterWord::new(Register::DisplayTest, 0x00))?;
        self.broadcast(RegisterWord::new(Register::Intensity, self.brightness))
    }

    /// Set the intensity of every panel. Levels above [`MAX_BRIGHTNESS`] are
    /// ignored.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Interface`] if the bus fails.
    pub fn set_brightness(&mut self, level: u8) -> Result<(), Error<DI::Error>> {
        if level > MAX_BRIGHTNESS {
            return Ok(());
        }
        #[cfg(feature = "log")]
        log::debug!("max7219: brightness {}", level);
        self.brightness = level;
        self.broadcast(RegisterWord::new(Register::Intensity, level))
    }

    /// Current intensity setting
    pub fn brightness(&self) -> u8 {
        self.brightness
    }

    /// Leave (`true`) or enter (`false`) shutdown on every panel.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Interface`] if the bus fails.
    pub fn set_display_on(&mut self, on: bool) -> Result<(), Error<DI::Error>> {
        #[cfg(feature = "log")]
        log::debug!("max7219: display {}", if on { "on" } else { "off" });
        self.broadcast(RegisterWord::new(Register::Shutdown, u8::from(on)))
    }

    /// Codec used to encode frames
    pub fn codec(&self) -> &BitPlaneCodec {
        &self.codec
    }

    /// Give the interface back.
    pub fn release(self) -> DI {
        self.interface
    }

    fn broadcast(&mut self, word: RegisterWord) -> Result<(), Error<DI::Error>> {
        let bytes = word.to_bytes();
        for slot in self.message.chunks_exact_mut(2) {
            slot.copy_from_slice(&bytes);
        }
        self.interface.send(&self.message).map_err(Error::Interface)
    }
}

impl<DI: DisplayInterface> Drawable for Max7219<DI> {
    type Error = Error<DI::Error>;

    fn panel_count(&self) -> usize {
        self.codec.panel_count()
    }

    fn write(&mut self, frame: &Frame) -> Result<(), Self::Error> {
        let planes = self.codec.encode_monochrome(frame).map_err(|e| e.widen::<DI::Error>())?;
        for (row, register) in Register::DIGITS.iter().enumerate() {
            for (slot, plane) in self.message.chunks_exact_mut(2).zip(&planes) {
                slot.copy_from_slice(&RegisterWord::new(*register, plane.row(row)).to_bytes());
            }
            self.interface.send(&self.message).map_err(Error::Interface)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    extern crate std;

    use std::vec;

    use embedded_graphics::pixelcolor::RgbColor;

    use super::*;
    use crate::interface::test_spy::{BusFault, FailingInterface, TestSpyInterface};
    use crate::{Color, PanelGeometry};

    #[test]
    fn test_register_word_layout() {
        let word = RegisterWord::new(Register::Intensity, 0x0f);
        assert_eq!(word.0, 0x0a0f);
        assert_eq!(word.to_bytes(), [0x0a, 0x0f]);
        // data never spills into the address nibble
        assert_eq!(RegisterWord::new(Register::Digit7, 0xff).0, 0x08ff);
    }

    #[test]
    fn test_digit_registers() {
        for (row, register) in Register::DIGITS.iter().enumerate() {
            assert_eq!(usize::from(register.addr()), row + 1);
        }
    }

    #[test]
    fn test_zero_panels_treated_as_one() {
        let driver = Max7219::new(TestSpyInterface::new(), 0, CHAIN_ORIENTATION);
        assert_eq!(driver.panel_count(), 1);
        let mut matrix = crate::LedMatrix::new(driver);
        matrix.frame_mut().set(0, Color::WHITE);
        matrix.draw().unwrap();
        let spy = matrix.into_parts().1.release();
        assert_eq!(spy.sent.len(), 8);
        assert_eq!(spy.sent[0], vec![0x01, 0x01]);
    }

    #[test]
    fn test_init_sequence_broadcasts() {
        let mut driver = Max7219::new(TestSpyInterface::new(), 2, CHAIN_ORIENTATION);
        driver.init().unwrap();
        let spy = driver.release();
        assert_eq!(
            spy.sent,
            vec![
                vec![0x0b, 0x07, 0x0b, 0x07],
                vec![0x09, 0x00, 0x09, 0x00],
                vec![0x0c, 0x01, 0x0c, 0x01],
                vec![0x0f, 0x00, 0x0f, 0x00],
                vec![0x0a, 0x02, 0x0a, 0x02],
            ]
        );
    }

    #[test]
    fn test_brightness_range() {
        let mut driver = Max7219::new(TestSpyInterface::new(), 1, CHAIN_ORIENTATION);
        driver.set_brightness(15).unwrap();
        driver.set_brightness(16).unwrap();
        assert_eq!(driver.brightness(), 15);
        let spy = driver.release();
        assert_eq!(spy.sent, vec![vec![0x0a, 0x0f]]);
    }

    #[test]
    fn test_display_on_off() {
        let mut driver = Max7219::new(TestSpyInterface::new(), 1, CHAIN_ORIENTATION);
        driver.set_display_on(false).unwrap();
        driver.set_display_on(true).unwrap();
        let spy = driver.release();
        assert_eq!(spy.sent, vec![vec![0x0c, 0x00], vec![0x0c, 0x01]]);
    }

    #[test]
    fn test_write_one_message_per_row_reversed_chain() {
        let mut frame = Frame::new(PanelGeometry::grid8x8(2));
        // panel 0, row 0, column 0
        frame.set_point(0, 0, Color::WHITE);
        // panel 1, row 7, column 15 (panel column 7)
        frame.set_point(7, 15, Color::RED);

        let mut driver = Max7219::new(TestSpyInterface::new(), 2, CHAIN_ORIENTATION);
        driver.write(&frame).unwrap();
        let spy = driver.release();

        assert_eq!(spy.sent.len(), 8);
        // panel 1 is clocked first
        assert_eq!(spy.sent[0], vec![0x01, 0x00, 0x01, 0x01]);
        for row in 1..7 {
            let digit = row as u8 + 1;
            assert_eq!(spy.sent[row], vec![digit, 0x00, digit, 0x00]);
        }
        assert_eq!(spy.sent[7], vec![0x08, 0x80, 0x08, 0x00]);
    }

    #[test]
    fn test_write_unreversed_chain() {
        let mut frame = Frame::new(PanelGeometry::grid8x8(2));
        frame.set_point(0, 0, Color::WHITE);
        let mut driver = Max7219::new(TestSpyInterface::new(), 2, Orientation::default());
        driver.write(&frame).unwrap();
        assert_eq!(driver.release().sent[0], vec![0x01, 0x01, 0x01, 0x00]);
    }

    #[test]
    fn test_write_rejects_wrong_panel_count() {
        let frame = Frame::new(PanelGeometry::grid8x8(3));
        let mut driver = Max7219::new(TestSpyInterface::new(), 2, CHAIN_ORIENTATION);
        assert_eq!(
            driver.write(&frame),
            Err(Error::PanelCountMismatch {
                expected: 2,
                found: 3
            })
        );
        assert!(driver.release().sent.is_empty());
    }

    #[test]
    fn test_bus_error_propagates() {
        let frame = Frame::new(PanelGeometry::grid8x8(1));
        let failing = FailingInterface {
            allowed: 3,
            ..Default::default()
        };
        let mut driver = Max7219::new(failing, 1, CHAIN_ORIENTATION);
        assert_eq!(driver.write(&frame), Err(Error::Interface(BusFault)));
        // stopped at the first failure
        assert_eq!(driver.release().attempts, 4);
    }
}

//! HT16K33 driver for bi-color (red/green) 8×8 backpacks.
//!
//! Every backpack has its own controller and I²C address, so the driver holds
//! one [`DisplayInterface`] per panel, in logical panel order. Each panel's
//! display RAM is written in one transaction: the RAM address `0x00` followed
//! by a green and a red byte per row.
//!
//! ```text
//!  [0x00, g0, r0, g1, r1, g2, r2, ... g7, r7]    17 bytes
//! ```
//!
//! Yellow pixels light both bytes.

use alloc::vec::Vec;

use bitfield::bitfield;

use super::Drawable;
use crate::interface::DisplayInterface;
use crate::{BitPlaneCodec, Error, Frame, Orientation, Rotation};

/// Highest dimming level
pub const MAX_BRIGHTNESS: u8 = 15;

/// Bytes in one display RAM write, address byte included
pub const RAM_IMAGE_LEN: usize = 17;

const OSCILLATOR_ON: u8 = 0x21;
const DIMMING: u8 = 0xE0;
const RAM_ADDRESS: u8 = 0x00;

/// Hardware blink rates.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum BlinkRate {
    /// Steady
    #[default]
    Off = 0,
    /// 2 Hz
    Fast = 1,
    /// 1 Hz
    Medium = 2,
    /// 0.5 Hz
    Slow = 3,
}

bitfield! {
    /// Display setup command.
    ///
    /// - Bit 7: Command marker, always set
    /// - Bits 2-1: Blink rate
    /// - Bit 0: Display on
    #[derive(Clone, Copy, PartialEq, Eq)]
    #[repr(transparent)]
    struct DisplaySetup(u8);
    impl Debug;
    pub on, set_on: 0;
    pub u8, blink, set_blink: 2, 1;
}

impl DisplaySetup {
    fn new(on: bool, blink: BlinkRate) -> Self {
        let mut setup = Self(0x80);
        setup.set_on(on);
        setup.set_blink(blink as u8);
        setup
    }
}

/// Lay out one panel's green and red planes as a display RAM write.
#[must_use]
pub fn ram_image(green: crate::BitPlane, red: crate::BitPlane) -> [u8; RAM_IMAGE_LEN] {
    let mut image = [0u8; RAM_IMAGE_LEN];
    image[0] = RAM_ADDRESS;
    for (row, pair) in image[1..].chunks_exact_mut(2).enumerate() {
        pair[0] = green.row(row);
        pair[1] = red.row(row);
    }
    image
}

/// Driver for a set of HT16K33 bi-color panels, one controller each.
#[derive(Debug)]
pub struct Ht16k33<DI> {
    panels: Vec<DI>,
    codec: BitPlaneCodec,
    brightness: u8,
    blink: BlinkRate,
    on: bool,
}

impl<DI: DisplayInterface> Ht16k33<DI> {
    /// Driver for one panel per interface, each bitmap turned `rotation`
    /// quarter turns anticlockwise before it is sent.
    ///
    /// Nothing is sent until [`init`](Self::init).
    pub fn new(panels: Vec<DI>, rotation: Rotation) -> Self {
        let orientation = Orientation {
            rotation,
            ..Orientation::default()
        };
        Self {
            codec: BitPlaneCodec::new(panels.len(), orientation),
            panels,
            brightness: 0,
            blink: BlinkRate::Off,
            on: true,
        }
    }

    /// Start the oscillator on every panel, then apply the display setup and
    /// dimming level.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Interface`] if the bus fails.
    pub fn init(&mut self) -> Result<(), Error<DI::Error>> {
        #[cfg(feature = "log")]
        log::debug!("ht16k33: init {} panels", self.panels.len());
        self.each(&[OSCILLATOR_ON])?;
        self.send_setup()?;
        self.each(&[DIMMING | self.brightness])
    }

    /// Set the dimming level of every panel. Levels above [`MAX_BRIGHTNESS`]
    /// are ignored.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Interface`] if the bus fails.
    pub fn set_brightness(&mut self, level: u8) -> Result<(), Error<DI::Error>> {
        if level > MAX_BRIGHTNESS {
            return Ok(());
        }
        #[cfg(feature = "log")]
        log::debug!("ht16k33: brightness {}", level);
        self.brightness = level;
        self.each(&[DIMMING | level])
    }

    /// Current dimming level
    pub fn brightness(&self) -> u8 {
        self.brightness
    }

    /// Set the hardware blink rate.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Interface`] if the bus fails.
    pub fn set_blink_rate(&mut self, rate: BlinkRate) -> Result<(), Error<DI::Error>> {
        #[cfg(feature = "log")]
        log::debug!("ht16k33: blink rate {}", rate as u8);
        self.blink = rate;
        self.send_setup()
    }

    /// Turn every panel's display on or off. Display RAM is kept.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Interface`] if the bus fails.
    pub fn set_display_on(&mut self, on: bool) -> Result<(), Error<DI::Error>> {
        #[cfg(feature = "log")]
        log::debug!("ht16k33: display {}", if on { "on" } else { "off" });
        self.on = on;
        self.send_setup()
    }

    /// Give the interfaces back.
    pub fn release(self) -> Vec<DI> {
        self.panels
    }

    fn send_setup(&mut self) -> Result<(), Error<DI::Error>> {
        let setup = DisplaySetup::new(self.on, self.blink);
        self.each(&[setup.0])
    }

    fn each(&mut self, bytes: &[u8]) -> Result<(), Error<DI::Error>> {
        for panel in &mut self.panels {
            panel.send(bytes).map_err(Error::Interface)?;
        }
        Ok(())
    }
}

impl<DI: DisplayInterface> Drawable for Ht16k33<DI> {
    type Error = Error<DI::Error>;

    fn panel_count(&self) -> usize {
        self.panels.len()
    }

    fn write(&mut self, frame: &Frame) -> Result<(), Self::Error> {
        let (green, red) = self
            .codec
            .encode_dual_color(frame)
            .map_err(|e| e.widen::<DI::Error>())?;
        for ((panel, &g), &r) in self.panels.iter_mut().zip(&green).zip(&red) {
            panel.send(&ram_image(g, r)).map_err(Error::Interface)?;
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
    use crate::{BitPlane, Color, PanelGeometry};

    fn spies(n: usize) -> Vec<TestSpyInterface> {
        (0..n).map(|_| TestSpyInterface::new()).collect()
    }

    #[test]
    fn test_display_setup_bits() {
        assert_eq!(DisplaySetup::new(true, BlinkRate::Off).0, 0x81);
        assert_eq!(DisplaySetup::new(false, BlinkRate::Off).0, 0x80);
        assert_eq!(DisplaySetup::new(true, BlinkRate::Fast).0, 0x83);
        assert_eq!(DisplaySetup::new(true, BlinkRate::Slow).0, 0x87);
    }

    #[test]
    fn test_init_each_panel() {
        let mut driver = Ht16k33::new(spies(2), Rotation::None);
        driver.init().unwrap();
        for spy in driver.release() {
            assert_eq!(spy.sent, vec![vec![0x21], vec![0x81], vec![0xe0]]);
        }
    }

    #[test]
    fn test_controls() {
        let mut driver = Ht16k33::new(spies(1), Rotation::None);
        driver.set_brightness(9).unwrap();
        driver.set_brightness(16).unwrap();
        driver.set_blink_rate(BlinkRate::Medium).unwrap();
        driver.set_display_on(false).unwrap();
        assert_eq!(driver.brightness(), 9);
        let panels = driver.release();
        assert_eq!(panels[0].sent, vec![vec![0xe9], vec![0x85], vec![0x84]]);
    }

    #[test]
    fn test_ram_image_layout() {
        let green = BitPlane::from_rows([1, 2, 3, 4, 5, 6, 7, 8]);
        let red = BitPlane::from_rows([0x10, 0x20, 0x30, 0x40, 0x50, 0x60, 0x70, 0x80]);
        assert_eq!(
            ram_image(green, red),
            [0x00, 1, 0x10, 2, 0x20, 3, 0x30, 4, 0x40, 5, 0x50, 6, 0x60, 7, 0x70, 8, 0x80]
        );
    }

    #[test]
    fn test_write_per_panel_colors() {
        let mut frame = Frame::new(PanelGeometry::grid8x8(2));
        frame.set_point(0, 0, Color::GREEN);
        frame.set_point(1, 1, Color::RED);
        frame.set_point(2, 10, Color::YELLOW);
        // not one of the three panel colors
        frame.set_point(3, 3, Color::WHITE);

        let mut driver = Ht16k33::new(spies(2), Rotation::None);
        driver.write(&frame).unwrap();
        let panels = driver.release();

        let first = &panels[0].sent;
        assert_eq!(first.len(), 1);
        assert_eq!(first[0].len(), RAM_IMAGE_LEN);
        assert_eq!(&first[0][..5], &[0x00, 0x01, 0x00, 0x00, 0x02]);
        assert!(first[0][5..].iter().all(|&b| b == 0));

        let second = &panels[1].sent[0];
        // row 2, panel column 2, both colors
        assert_eq!(second[5], 0x04);
        assert_eq!(second[6], 0x04);
    }

    #[test]
    fn test_write_applies_rotation() {
        let mut frame = Frame::new(PanelGeometry::grid8x8(1));
        frame.set_point(0, 7, Color::GREEN);
        let mut driver = Ht16k33::new(spies(1), Rotation::D90);
        driver.write(&frame).unwrap();

        let mut plane = BitPlane::EMPTY;
        plane.set(7);
        let expected = ram_image(plane.rotate_anticlockwise(), BitPlane::EMPTY);
        let panels = driver.release();
        assert_eq!(panels[0].sent[0], expected.to_vec());
    }

    #[test]
    fn test_write_rejects_wrong_panel_count() {
        let frame = Frame::new(PanelGeometry::grid8x8(1));
        let mut driver = Ht16k33::new(spies(2), Rotation::None);
        assert_eq!(
            driver.write(&frame),
            Err(Error::PanelCountMismatch {
                expected: 2,
                found: 1
            })
        );
    }

    #[test]
    fn test_bus_error_propagates() {
        let mut driver = Ht16k33::new(vec![FailingInterface::default()], Rotation::None);
        assert_eq!(driver.init(), Err(Error::Interface(BusFault)));
    }
}

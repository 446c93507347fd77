//! Byte transport between a driver and its chip.
//!
//! Drivers only ever send whole command or data messages, so the seam is a
//! single `send`. [`SpiInterface`] wraps an `embedded-hal` SPI device (chip
//! select handled by the device), [`I2cInterface`] an I²C bus plus the chip's
//! 7-bit address.

use embedded_hal::i2c::{I2c, SevenBitAddress};
use embedded_hal::spi::SpiDevice;

/// A write-only link to one display controller (or one daisy chain of them).
pub trait DisplayInterface {
    /// Error reported by the underlying bus
    type Error: core::fmt::Debug;

    /// Send `bytes` as one bus transaction.
    ///
    /// # Errors
    ///
    /// Returns the bus error unchanged.
    fn send(&mut self, bytes: &[u8]) -> Result<(), Self::Error>;
}

impl<DI: DisplayInterface + ?Sized> DisplayInterface for &mut DI {
    type Error = DI::Error;

    fn send(&mut self, bytes: &[u8]) -> Result<(), Self::Error> {
        (**self).send(bytes)
    }
}

/// SPI transport. Each `send` is one chip-select frame, which is what latches
/// a daisy chain of shift-register style chips.
#[derive(Debug)]
pub struct SpiInterface<SPI> {
    spi: SPI,
}

impl<SPI: SpiDevice> SpiInterface<SPI> {
    /// Wrap an SPI device.
    pub fn new(spi: SPI) -> Self {
        Self { spi }
    }

    /// Give the SPI device back.
    pub fn release(self) -> SPI {
        self.spi
    }
}

impl<SPI: SpiDevice> DisplayInterface for SpiInterface<SPI> {
    type Error = SPI::Error;

    fn send(&mut self, bytes: &[u8]) -> Result<(), Self::Error> {
        self.spi.write(bytes)
    }
}

/// I²C transport addressing a single chip.
#[derive(Debug)]
pub struct I2cInterface<I2C> {
    i2c: I2C,
    address: SevenBitAddress,
}

impl<I2C: I2c> I2cInterface<I2C> {
    /// Wrap an I²C bus; every `send` goes to `address`.
    pub fn new(i2c: I2C, address: SevenBitAddress) -> Self {
        Self { i2c, address }
    }

    /// Chip address
    pub fn address(&self) -> SevenBitAddress {
        self.address
    }

    /// Give the bus back.
    pub fn release(self) -> I2C {
        self.i2c
    }
}

impl<I2C: I2c> DisplayInterface for I2cInterface<I2C> {
    type Error = I2C::Error;

    fn send(&mut self, bytes: &[u8]) -> Result<(), Self::Error> {
        self.i2c.write(self.address, bytes)
    }
}


#[cfg(test)]
mod tests {
    extern crate std;

    use alloc::vec;
    use alloc::vec::Vec;
    use core::convert::Infallible;

    use embedded_hal::i2c;
    use embedded_hal::spi;

    use super::*;

    #[derive(Default)]
    struct SpiSpy {
        writes: Vec<Vec<u8>>,
    }

    impl spi::ErrorType for SpiSpy {
        type Error = Infallible;
    }

    impl SpiDevice for SpiSpy {
        fn transaction(
            &mut self,
            operations: &mut [spi::Operation<'_, u8>],
        ) -> Result<(), Infallible> {
            for op in operations.iter() {
                if let spi::Operation::Write(bytes) = op {
                    self.writes.push(bytes.to_vec());
                }
            }
            Ok(())
        }
    }

    #[derive(Default)]
    struct I2cSpy {
        writes: Vec<(u8, Vec<u8>)>,
    }

    impl i2c::ErrorType for I2cSpy {
        type Error = Infallible;
    }

    impl I2c for I2cSpy {
        fn transaction(
            &mut self,
            address: u8,
            operations: &mut [i2c::Operation<'_>],
        ) -> Result<(), Infallible> {
            for op in operations.iter() {
                if let i2c::Operation::Write(bytes) = op {
                    self.writes.push((address, bytes.to_vec()));
                }
            }
            Ok(())
        }
    }

    #[test]
    fn test_spi_sends_one_write() {
        let mut interface = SpiInterface::new(SpiSpy::default());
        interface.send(&[0x0c, 0x01, 0x0c, 0x01]).unwrap();
        interface.send(&[0x0a, 0x08]).unwrap();
        let spi = interface.release();
        assert_eq!(spi.writes, vec![vec![0x0c, 0x01, 0x0c, 0x01], vec![0x0a, 0x08]]);
    }

    #[test]
    fn test_i2c_sends_to_address() {
        let mut interface = I2cInterface::new(I2cSpy::default(), 0x70);
        assert_eq!(interface.address(), 0x70);
        interface.send(&[0x21]).unwrap();
        let i2c = interface.release();
        assert_eq!(i2c.writes, vec![(0x70, vec![0x21])]);
    }

    #[test]
    fn test_mut_ref_forwards() {
        fn push<DI: DisplayInterface>(mut interface: DI) {
            interface.send(&[1, 2]).unwrap();
        }
        let mut spy = test_spy::TestSpyInterface::new();
        push(&mut spy);
        assert_eq!(spy.sent, vec![vec![1, 2]]);
    }

    #[test]
    fn test_failing_interface() {
        let mut failing = test_spy::FailingInterface {
            allowed: 1,
            ..Default::default()
        };
        assert!(failing.send(&[0]).is_ok());
        assert_eq!(failing.send(&[0]), Err(test_spy::BusFault));
    }
}

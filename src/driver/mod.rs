//! Chip drivers and the capability the matrix adapter draws through.
//!
//! Each chip family implements [`Drawable`] on its own; there is no shared
//! base driver. A driver owns its bus collaborator and a
//! [`BitPlaneCodec`](crate::BitPlaneCodec) configured for how its panels are
//! mounted, and turns a [`Frame`] into whatever that chip's display RAM wants.

pub mod ht16k33;
pub mod max7219;

use crate::Frame;

pub use ht16k33::{BlinkRate, Ht16k33};
pub use max7219::Max7219;

/// Something that can put a whole frame on physical panels.
pub trait Drawable {
    /// Error returned when the frame can't be sent
    type Error;

    /// Number of chained panels the driver was configured for
    fn panel_count(&self) -> usize;

    /// Encode and transmit `frame`.
    ///
    /// # Errors
    ///
    /// Drivers report a frame with the wrong panel count and pass bus errors
    /// through.
    fn write(&mut self, frame: &Frame) -> Result<(), Self::Error>;
}

impl<D: Drawable + ?Sized> Drawable for &mut D {
    type Error = D::Error;

    fn panel_count(&self) -> usize {
        (**self).panel_count()
    }

    fn write(&mut self, frame: &Frame) -> Result<(), Self::Error> {
        (**self).write(frame)
    }
}

//! Fixed-length pixel storage.

use alloc::vec;
use alloc::vec::Vec;

use embedded_graphics::pixelcolor::RgbColor;

use crate::Color;

/// Flat array of pixels whose length is fixed at construction.
///
/// Nothing in the public API can grow or shrink the buffer, so an index that
/// is valid once stays valid for the life of the buffer.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct PixelBuffer {
    pixels: Vec<Color>,
}

impl PixelBuffer {
    /// Create a buffer of `len` black pixels.
    #[must_use]
    pub fn new(len: usize) -> Self {
        Self {
            pixels: vec![Color::BLACK; len],
        }
    }

    /// Number of pixels
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.pixels.len()
    }

    /// `true` for a zero-length buffer
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pixels.is_empty()
    }

    /// Pixel at `index`, or `None` past the end.
    #[inline]
    #[must_use]
    pub fn get(&self, index: usize) -> Option<Color> {
        self.pixels.get(index).copied()
    }

    /// Store `color` at `index`. An index past the end is dropped.
    #[inline]
    pub fn set(&mut self, index: usize, color: Color) {
        if let Some(pixel) = self.pixels.get_mut(index) {
            *pixel = color;
        }
    }

    /// Set every pixel to `color`.
    pub fn fill(&mut self, color: Color) {
        self.pixels.fill(color);
    }

    /// Read-only view of the pixels
    #[inline]
    #[must_use]
    pub fn as_slice(&self) -> &[Color] {
        &self.pixels
    }

    /// Iterate over the pixels in storage order.
    pub fn iter(&self) -> core::slice::Iter<'_, Color> {
        self.pixels.iter()
    }

    // Mutable access stays inside the crate so the length can't change.
    #[inline]
    pub(crate) fn as_mut_slice(&mut self) -> &mut [Color] {
        &mut self.pixels
    }
}

impl<'a> IntoIterator for &'a PixelBuffer {
    type Item = &'a Color;
    type IntoIter = core::slice::Iter<'a, Color>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[cfg(test)]
mod tests {
    extern crate std;

    use super::*;

    #[test]
    fn test_new_is_black() {
        let buffer = PixelBuffer::new(16);
        assert_eq!(buffer.len(), 16);
        assert!(buffer.iter().all(|&c| c == Color::BLACK));
    }

    #[test]
    fn test_empty_buffer() {
        let buffer = PixelBuffer::new(0);
        assert!(buffer.is_empty());
        assert_eq!(buffer.get(0), None);
    }

    #[test]
    fn test_set_and_get() {
        let mut buffer = PixelBuffer::new(4);
        buffer.set(2, Color::RED);
        assert_eq!(buffer.get(2), Some(Color::RED));
        assert_eq!(buffer.get(1), Some(Color::BLACK));
    }

    #[test]
    fn test_set_past_end_is_dropped() {
        let mut buffer = PixelBuffer::new(4);
        buffer.set(4, Color::RED);
        buffer.set(usize::MAX, Color::RED);
        assert_eq!(buffer.len(), 4);
        assert!(buffer.iter().all(|&c| c == Color::BLACK));
    }

    #[test]
    fn test_fill() {
        let mut buffer = PixelBuffer::new(5);
        buffer.fill(Color::GREEN);
        assert!(buffer.as_slice().iter().all(|&c| c == Color::GREEN));
        assert_eq!(buffer.len(), 5);
    }
}

//! Glyph lookup used by text drawing and scrolling.
//!
//! Glyph tables are data supplied by the application. A glyph is a sequence of
//! column bytes, leftmost column first, where bit `r` lights row `r`:
//!
//! ```text
//!  'L'  [0xff, 0x80, 0x80, 0x80]    row 0  #...
//!                                   ...    #...
//!                                   row 7  ####
//! ```

/// Source of column bitmaps for characters.
pub trait Font {
    /// Column bitmaps for `ch`. Characters the font doesn't cover return an
    /// empty slice.
    fn glyph(&self, ch: char) -> &[u8];
}

impl<F: Font + ?Sized> Font for &F {
    fn glyph(&self, ch: char) -> &[u8] {
        (**self).glyph(ch)
    }
}

/// A font backed by a table of fixed-width glyphs for a contiguous range of
/// characters starting at `first`.
#[derive(Debug, Clone, Copy)]
pub struct TableFont<'a, const WIDTH: usize> {
    first: char,
    glyphs: &'a [[u8; WIDTH]],
}

impl<'a, const WIDTH: usize> TableFont<'a, WIDTH> {
    /// Glyph `i` of `glyphs` is the bitmap for the character `first + i`.
    #[must_use]
    pub const fn new(first: char, glyphs: &'a [[u8; WIDTH]]) -> Self {
        Self { first, glyphs }
    }
}

impl<const WIDTH: usize> Font for TableFont<'_, WIDTH> {
    fn glyph(&self, ch: char) -> &[u8] {
        let Some(offset) = (ch as u32).checked_sub(self.first as u32) else {
            return &[];
        };
        self.glyphs
            .get(offset as usize)
            .map_or(&[][..], |glyph| &glyph[..])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const GLYPHS: [[u8; 3]; 3] = [[0x01, 0x02, 0x03], [0x04, 0x05, 0x06], [0x07, 0x08, 0x09]];

    #[test]
    fn test_table_font_lookup() {
        let font = TableFont::new('a', &GLYPHS);
        assert_eq!(font.glyph('a'), &[0x01, 0x02, 0x03]);
        assert_eq!(font.glyph('c'), &[0x07, 0x08, 0x09]);
    }

    #[test]
    fn test_table_font_unsupported_is_empty() {
        let font = TableFont::new('a', &GLYPHS);
        assert!(font.glyph('d').is_empty());
        assert!(font.glyph('A').is_empty());
        assert!((&font).glyph('\u{1F600}').is_empty());
    }
}

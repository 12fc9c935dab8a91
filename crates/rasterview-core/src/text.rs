//! Bitmap text on top of the `font8x8` glyphs, and text metrics.
//!
//! Value text, tooltips and annotations all go through this font so the
//! legibility test and the drawn glyphs always agree on sizes.

use font8x8::{UnicodeFonts, BASIC_FONTS};
use serde::{Deserialize, Serialize};

use crate::consts::TEXT_LINE_PADDING;
use crate::geometry::Size;

/// Rows per glyph cell at scale 1.
pub const GLYPH_HEIGHT: usize = 8;
/// Blank columns between two glyphs at scale 1.
pub const GLYPH_SPACING: usize = 1;
/// Advance of a glyph with no ink, such as space.
const BLANK_WIDTH: usize = 4;

/// Row bitmaps for `ch` (bit 0 is the leftmost column). Characters the
/// basic set lacks render as `?`.
pub(crate) fn glyph(ch: char) -> [u8; 8] {
    BASIC_FONTS
        .get(ch)
        .or_else(|| BASIC_FONTS.get('?'))
        .unwrap_or([0; 8])
}

/// Columns up to and including the rightmost inked one.
pub(crate) fn glyph_width(rows: &[u8; 8]) -> usize {
    let ink = rows.iter().fold(0u8, |acc, r| acc | r);
    if ink == 0 {
        BLANK_WIDTH
    } else {
        8 - ink.leading_zeros() as usize
    }
}

/// Font descriptor: integer pixel scale and stroke thickness.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FontSpec {
    pub scale: u32,
    pub thickness: u32,
}

impl FontSpec {
    pub const fn new(scale: u32, thickness: u32) -> Self {
        Self { scale, thickness }
    }

    pub(crate) fn scale(&self) -> usize {
        self.scale.max(1) as usize
    }

    pub(crate) fn extra_stroke(&self) -> usize {
        self.thickness.max(1) as usize - 1
    }

    /// Height of the glyph ink, without line padding.
    pub fn glyph_height(&self) -> usize {
        GLYPH_HEIGHT * self.scale() + self.extra_stroke()
    }
}

impl Default for FontSpec {
    fn default() -> Self {
        Self::new(1, 1)
    }
}

/// Size of a single line of text, including the padding line below it.
pub fn text_size(text: &str, font: FontSpec) -> Size {
    let height = font.glyph_height() + TEXT_LINE_PADDING;
    let chars = text.chars().count();
    if chars == 0 {
        return Size::new(0, height);
    }
    let columns: usize = text.chars().map(|ch| glyph_width(&glyph(ch))).sum::<usize>()
        + GLYPH_SPACING * (chars - 1);
    Size::new(columns * font.scale() + font.extra_stroke(), height)
}

/// Size of a block of lines stacked with `gap` pixels between them. Width
/// comes from the widest line.
pub fn block_size<S: AsRef<str>>(lines: &[S], font: FontSpec, gap: usize) -> Size {
    let n = lines.len();
    if n == 0 {
        return Size::default();
    }
    let width = lines
        .iter()
        .map(|l| text_size(l.as_ref(), font).width)
        .max()
        .unwrap_or(0);
    let line_height = font.glyph_height() + TEXT_LINE_PADDING;
    Size::new(width, line_height * n + gap * (n - 1))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_size_scales_with_font() {
        let one = text_size("12", FontSpec::new(1, 1));
        assert_eq!(one.height, 11);
        let two = text_size("12", FontSpec::new(2, 1));
        assert_eq!(two, Size::new(one.width * 2, 19));
        let thick = text_size("12", FontSpec::new(1, 2));
        assert_eq!(thick, Size::new(one.width + 1, 12));
    }

    #[test]
    fn test_glyphs_spaced_by_ink_width() {
        let font = FontSpec::default();
        let w1 = text_size("1", font).width;
        let w2 = text_size("2", font).width;
        assert_eq!(text_size("12", font).width, w1 + GLYPH_SPACING + w2);
        // Digits leave the last two columns of the 8x8 cell blank.
        assert_eq!(w1, 6);
        assert_eq!(text_size(" ", font).width, BLANK_WIDTH);
    }

    #[test]
    fn test_block_size_uses_widest_line() {
        let font = FontSpec::new(1, 1);
        let size = block_size(&["1", "123", "12"], font, 4);
        assert_eq!(size, Size::new(text_size("123", font).width, 3 * 11 + 2 * 4));
    }

    #[test]
    fn test_block_size_empty() {
        let lines: [&str; 0] = [];
        assert_eq!(block_size(&lines, FontSpec::default(), 4), Size::default());
    }

    #[test]
    fn test_unknown_char_falls_back() {
        assert_eq!(glyph('\u{e9}'), glyph('?'));
        assert_ne!(glyph('0'), [0; 8]);
        assert_eq!(glyph(' '), [0; 8]);
    }
}

//! Clipped drawing primitives over a band of RGB8 rows.
//!
//! A [`Canvas`] always takes absolute window coordinates. When a buffer is
//! split into row bands for parallel drawing, every band clips to its own
//! rows, so the same drawing call can be issued from each band without
//! overlapping writes.

use crate::consts::COLOR_CHANNELS;
use crate::geometry::{Rect, Rgb, PIXEL_COORD_MARGIN};
use crate::text::{glyph, glyph_width, text_size, FontSpec, GLYPH_HEIGHT, GLYPH_SPACING};

pub struct Canvas<'a> {
    data: &'a mut [u8],
    width: usize,
    top: usize,
    rows: usize,
}

impl<'a> Canvas<'a> {
    pub(crate) fn new(data: &'a mut [u8], width: usize, top: usize, rows: usize) -> Self {
        debug_assert_eq!(data.len(), width * rows * COLOR_CHANNELS);
        Self {
            data,
            width,
            top,
            rows,
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    /// First window row covered by this canvas.
    pub fn top(&self) -> usize {
        self.top
    }

    /// One past the last window row covered by this canvas.
    pub fn bottom(&self) -> usize {
        self.top + self.rows
    }

    /// Split into consecutive bands. `cuts` are absolute row indices; they
    /// are clamped to this canvas and must be non-decreasing.
    pub fn into_bands(self, cuts: &[usize]) -> Vec<Canvas<'a>> {
        let stride = self.width * COLOR_CHANNELS;
        let mut bands = Vec::with_capacity(cuts.len() + 1);
        let mut rest = self.data;
        let mut top = self.top;
        for &cut in cuts {
            let cut = cut.clamp(top, self.top + self.rows);
            let (head, tail) = std::mem::take(&mut rest).split_at_mut((cut - top) * stride);
            bands.push(Canvas::new(head, self.width, top, cut - top));
            rest = tail;
            top = cut;
        }
        let rows = self.top + self.rows - top;
        bands.push(Canvas::new(rest, self.width, top, rows));
        bands
    }

    /// Mutable bytes of an absolute window row, if it belongs to this band.
    pub fn row_mut(&mut self, y: usize) -> Option<&mut [u8]> {
        if y < self.top || y >= self.bottom() {
            return None;
        }
        let stride = self.width * COLOR_CHANNELS;
        let start = (y - self.top) * stride;
        Some(&mut self.data[start..start + stride])
    }

    fn offset(&self, x: i32, y: i32) -> Option<usize> {
        if x < 0 || y < self.top as i32 || x >= self.width as i32 || y >= self.bottom() as i32 {
            return None;
        }
        Some(((y as usize - self.top) * self.width + x as usize) * COLOR_CHANNELS)
    }

    pub fn put_pixel(&mut self, x: i32, y: i32, color: Rgb) {
        if let Some(i) = self.offset(x, y) {
            self.data[i..i + COLOR_CHANNELS].copy_from_slice(&color);
        }
    }

    pub fn get_pixel(&self, x: i32, y: i32) -> Option<Rgb> {
        self.offset(x, y)
            .map(|i| [self.data[i], self.data[i + 1], self.data[i + 2]])
    }

    pub fn fill_rect(&mut self, rect: Rect, color: Rgb) {
        let y0 = rect.y.max(self.top as i32);
        let y1 = rect.bottom().min(self.bottom() as i32);
        let x0 = rect.x.max(0);
        let x1 = rect.right().min(self.width as i32);
        if x0 >= x1 {
            return;
        }
        for y in y0..y1 {
            if let Some(row) = self.row_mut(y as usize) {
                for px in row[x0 as usize * COLOR_CHANNELS..x1 as usize * COLOR_CHANNELS]
                    .chunks_exact_mut(COLOR_CHANNELS)
                {
                    px.copy_from_slice(&color);
                }
            }
        }
    }

    /// `dst = dst * keep + color * (1 - keep)` over the clipped rectangle.
    pub fn blend_rect(&mut self, rect: Rect, color: Rgb, keep: f32) {
        let keep = keep.clamp(0.0, 1.0);
        let y0 = rect.y.max(self.top as i32);
        let y1 = rect.bottom().min(self.bottom() as i32);
        let x0 = rect.x.max(0);
        let x1 = rect.right().min(self.width as i32);
        if x0 >= x1 {
            return;
        }
        for y in y0..y1 {
            if let Some(row) = self.row_mut(y as usize) {
                for px in row[x0 as usize * COLOR_CHANNELS..x1 as usize * COLOR_CHANNELS]
                    .chunks_exact_mut(COLOR_CHANNELS)
                {
                    for (d, &c) in px.iter_mut().zip(color.iter()) {
                        *d = (*d as f32 * keep + c as f32 * (1.0 - keep)).round() as u8;
                    }
                }
            }
        }
    }

    /// Bresenham line; `thickness` widens it across the major axis.
    pub fn line(&mut self, x0: i32, y0: i32, x1: i32, y1: i32, color: Rgb, thickness: u32) {
        let t = thickness.max(1) as i32;
        let (lo, hi) = (-(t - 1) / 2, t / 2);
        if x0 == x1 {
            self.fill_rect(
                Rect::from_corners(
                    x0.saturating_add(lo),
                    y0.min(y1),
                    x0.saturating_add(hi + 1),
                    y0.max(y1).saturating_add(1),
                ),
                color,
            );
            return;
        }
        if y0 == y1 {
            self.fill_rect(
                Rect::from_corners(
                    x0.min(x1),
                    y0.saturating_add(lo),
                    x0.max(x1).saturating_add(1),
                    y0.saturating_add(hi + 1),
                ),
                color,
            );
            return;
        }
        // Diagonals are stepped pixel by pixel; keep the endpoints near the canvas.
        let limit = |v: i32, extent: usize| {
            let margin = PIXEL_COORD_MARGIN as i32;
            v.clamp(-margin, extent as i32 + margin)
        };
        let (x0, x1) = (limit(x0, self.width), limit(x1, self.width));
        let (y0, y1) = (limit(y0, self.bottom()), limit(y1, self.bottom()));
        let dx = (x1 - x0).abs();
        let dy = -(y1 - y0).abs();
        let sx = if x0 < x1 { 1 } else { -1 };
        let sy = if y0 < y1 { 1 } else { -1 };
        let steep = -dy > dx;
        let (mut x, mut y, mut err) = (x0, y0, dx + dy);
        loop {
            for k in lo..=hi {
                if steep {
                    self.put_pixel(x + k, y, color);
                } else {
                    self.put_pixel(x, y + k, color);
                }
            }
            if x == x1 && y == y1 {
                break;
            }
            let e2 = 2 * err;
            if e2 >= dy {
                err += dy;
                x += sx;
            }
            if e2 <= dx {
                err += dx;
                y += sy;
            }
        }
    }

    /// Rectangle outline whose edges run through `rect`'s corners (inclusive
    /// of the right/bottom coordinates).
    pub fn rect_outline(&mut self, rect: Rect, color: Rgb, thickness: u32) {
        let (l, t, r, b) = (rect.x, rect.y, rect.right(), rect.bottom());
        self.line(l, t, r, t, color, thickness);
        self.line(l, b, r, b, color, thickness);
        self.line(l, t, l, b, color, thickness);
        self.line(r, t, r, b, color, thickness);
    }

    /// Draw one line of text with its top-left corner at `(x, y)`.
    pub fn draw_text(&mut self, x: i32, y: i32, text: &str, font: FontSpec, color: Rgb) {
        let scale = font.scale() as i32;
        let stroke = font.extra_stroke() as i32;
        let text_bottom = y.saturating_add(GLYPH_HEIGHT as i32 * scale + stroke);
        if text_bottom < self.top as i32 || y >= self.bottom() as i32 || x >= self.width as i32 {
            return;
        }
        let mut cx = x;
        for ch in text.chars() {
            let rows = glyph(ch);
            let width = glyph_width(&rows);
            for (row, bits) in rows.iter().enumerate() {
                for col in 0..width {
                    if bits & (1 << col) == 0 {
                        continue;
                    }
                    let px = cx.saturating_add(col as i32 * scale);
                    let py = y.saturating_add(row as i32 * scale);
                    for sy in 0..scale {
                        for sx in 0..scale + stroke {
                            self.put_pixel(px.saturating_add(sx), py.saturating_add(sy), color);
                        }
                    }
                }
            }
            cx = cx.saturating_add((width + GLYPH_SPACING) as i32 * scale);
        }
    }

    /// Draw lines stacked top to bottom, each centered within the widest.
    pub fn draw_text_block<S: AsRef<str>>(
        &mut self,
        x: i32,
        y: i32,
        lines: &[S],
        font: FontSpec,
        gap: usize,
        color: Rgb,
    ) {
        let sizes: Vec<_> = lines.iter().map(|l| text_size(l.as_ref(), font)).collect();
        let block_width = sizes.iter().map(|s| s.width).max().unwrap_or(0) as i32;
        let mut ly = y;
        for (line, size) in lines.iter().zip(&sizes) {
            let lx = x + (block_width - size.width as i32) / 2;
            self.draw_text(lx, ly, line.as_ref(), font, color);
            ly += (size.height + gap) as i32;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::buffer::ColorBuffer;
    use crate::geometry::Size;

    #[test]
    fn test_bands_clip_to_their_rows() {
        let mut buf = ColorBuffer::new(Size::new(4, 6));
        {
            let bands = buf.canvas().into_bands(&[2, 4]);
            assert_eq!(bands.len(), 3);
            for mut band in bands {
                band.fill_rect(Rect::new(0, 0, 4, 6), [band.top() as u8 + 1, 0, 0]);
            }
        }
        assert_eq!(buf.pixel(0, 0), [1, 0, 0]);
        assert_eq!(buf.pixel(3, 3), [3, 0, 0]);
        assert_eq!(buf.pixel(2, 5), [5, 0, 0]);
    }

    #[test]
    fn test_line_clipped_outside() {
        let mut buf = ColorBuffer::new(Size::new(5, 5));
        buf.canvas().line(-10, 2, 20, 2, [9, 9, 9], 1);
        for x in 0..5 {
            assert_eq!(buf.pixel(x, 2), [9, 9, 9]);
        }
        assert_eq!(buf.pixel(0, 1), [0, 0, 0]);
    }

    #[test]
    fn test_lines_at_i32_extremes() {
        let mut buf = ColorBuffer::new(Size::new(5, 5));
        let mut canvas = buf.canvas();
        canvas.line(i32::MAX, 0, i32::MAX, 4, [1, 1, 1], 3);
        canvas.line(i32::MIN, 2, i32::MAX, 2, [9, 9, 9], 1);
        canvas.line(i32::MIN, i32::MIN, i32::MAX, i32::MAX, [5, 5, 5], 1);
        canvas.draw_text(i32::MAX, i32::MAX, "8", FontSpec::new(3, 2), [7, 7, 7]);
        assert_eq!(buf.pixel(4, 2), [9, 9, 9]);
        assert_eq!(
            Rect::from_corners(i32::MIN, 0, i32::MAX, 1).width,
            i32::MAX
        );
    }

    #[test]
    fn test_draw_text_sets_ink() {
        let mut buf = ColorBuffer::new(Size::new(12, 10));
        buf.canvas().draw_text(0, 0, "1", FontSpec::default(), [255, 255, 255]);
        let ink = (0..10)
            .flat_map(|y| (0..12).map(move |x| (x, y)))
            .filter(|&(x, y)| buf.pixel(x, y) == [255, 255, 255])
            .count();
        assert!(ink > 0);
    }
}

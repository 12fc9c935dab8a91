use serde::{Deserialize, Serialize};

/// An RGB8 color triple.
pub type Rgb = [u8; 3];

/// Pixel coordinates are kept within this distance outside the area they
/// are drawn into.
pub const PIXEL_COORD_MARGIN: f32 = 1_048_576.0;

/// Round `v` to a pixel coordinate for an axis of `extent` pixels, clamped
/// to `[-PIXEL_COORD_MARGIN, extent + PIXEL_COORD_MARGIN]`. NaN maps to 0.
pub fn pixel_coord(v: f32, extent: usize) -> i32 {
    if v.is_nan() {
        return 0;
    }
    v.round()
        .clamp(-PIXEL_COORD_MARGIN, extent as f32 + PIXEL_COORD_MARGIN) as i32
}

/// Width/height pair in pixels or cells.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Size {
    pub width: usize,
    pub height: usize,
}

impl Size {
    pub const fn new(width: usize, height: usize) -> Self {
        Self { width, height }
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    pub fn area(&self) -> usize {
        self.width * self.height
    }

    /// Pixel count, or `None` when it does not fit in `usize`.
    pub fn checked_area(&self) -> Option<usize> {
        self.width.checked_mul(self.height)
    }

    /// Non-empty, and neither side above `max_side`.
    pub fn is_valid_window(&self, max_side: usize) -> bool {
        !self.is_empty() && self.width <= max_side && self.height <= max_side
    }

    /// Scale both sides, truncating toward zero.
    pub fn scaled(&self, factor: f32) -> Self {
        Self {
            width: (self.width as f32 * factor) as usize,
            height: (self.height as f32 * factor) as usize,
        }
    }
}

/// A point in either window pixel space or source array space.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct PointF {
    pub x: f32,
    pub y: f32,
}

impl PointF {
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    pub fn offset(&self, dx: f32, dy: f32) -> Self {
        Self::new(self.x + dx, self.y + dy)
    }
}

impl std::ops::Sub for PointF {
    type Output = PointF;

    fn sub(self, rhs: PointF) -> PointF {
        PointF::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl std::ops::Add for PointF {
    type Output = PointF;

    fn add(self, rhs: PointF) -> PointF {
        PointF::new(self.x + rhs.x, self.y + rhs.y)
    }
}

/// Integer rectangle in window pixel space. May extend past any buffer.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

/// Amount clipped off each side of a [`Rect`] by [`Rect::clip_to`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Padding {
    pub top: i32,
    pub bottom: i32,
    pub left: i32,
    pub right: i32,
}

impl Rect {
    pub const fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn from_corners(x0: i32, y0: i32, x1: i32, y1: i32) -> Self {
        let span = |a: i32, b: i32| a.abs_diff(b).min(i32::MAX as u32) as i32;
        Self::new(x0.min(x1), y0.min(y1), span(x0, x1), span(y0, y1))
    }

    pub fn right(&self) -> i32 {
        self.x.saturating_add(self.width)
    }

    pub fn bottom(&self) -> i32 {
        self.y.saturating_add(self.height)
    }

    pub fn is_empty(&self) -> bool {
        self.width <= 0 || self.height <= 0
    }

    /// Clip against a `bounds`-sized area anchored at the origin, returning
    /// the visible part and how much was cut from each side.
    pub fn clip_to(&self, bounds: Size) -> (Rect, Padding) {
        let mut rect = *self;
        let mut pad = Padding::default();
        if rect.x < 0 {
            rect.width = rect.width.saturating_add(rect.x);
            pad.left = rect.x.saturating_neg();
            rect.x = 0;
        }
        if rect.y < 0 {
            rect.height = rect.height.saturating_add(rect.y);
            pad.top = rect.y.saturating_neg();
            rect.y = 0;
        }
        let (bw, bh) = (bounds.width as i32, bounds.height as i32);
        if rect.right() > bw {
            pad.right = rect.right() - bw;
            rect.width = bw - rect.x;
        }
        if rect.bottom() > bh {
            pad.bottom = rect.bottom() - bh;
            rect.height = bh - rect.y;
        }
        rect.width = rect.width.max(0);
        rect.height = rect.height.max(0);
        (rect, pad)
    }

    /// True when the rectangle lies strictly inside `bounds`, away from the
    /// top and left edges.
    pub fn fits_inside(&self, bounds: Size) -> bool {
        self.x > 0
            && self.y > 0
            && self.right() <= bounds.width as i32
            && self.bottom() <= bounds.height as i32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clip_top_padding_uses_vertical_overhang() {
        let (rect, pad) = Rect::new(5, -3, 10, 8).clip_to(Size::new(100, 100));
        assert_eq!(rect, Rect::new(5, 0, 10, 5));
        assert_eq!(pad.top, 3);
        assert_eq!(pad.left, 0);
    }

    #[test]
    fn test_clip_right_and_bottom() {
        let (rect, pad) = Rect::new(95, 97, 10, 8).clip_to(Size::new(100, 100));
        assert_eq!(rect, Rect::new(95, 97, 5, 3));
        assert_eq!(pad.right, 5);
        assert_eq!(pad.bottom, 5);
    }

    #[test]
    fn test_fits_inside_requires_positive_origin() {
        assert!(Rect::new(1, 1, 10, 10).fits_inside(Size::new(11, 11)));
        assert!(!Rect::new(0, 1, 10, 10).fits_inside(Size::new(20, 20)));
        assert!(!Rect::new(5, 5, 10, 10).fits_inside(Size::new(14, 20)));
    }
}

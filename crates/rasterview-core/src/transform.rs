//! Mapping between window pixel space and source array space.
//!
//! Everything here is pure math over a [`Roi`]: the source-space rectangle
//! shown in the window. The ROI is `scale * source size`, enlarged along the
//! axis that under-fills the window so both share one aspect ratio.

use crate::geometry::{pixel_coord, PointF, Size};

/// Source-space rectangle visible inside a window.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Roi {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Roi {
    /// Aspect-corrected ROI centered on `center`.
    pub fn compute(center: PointF, scale: f32, source: Size, window: Size) -> Self {
        let (src_w, src_h) = (source.width as f32, source.height as f32);
        let (win_w, win_h) = (window.width as f32, window.height as f32);
        let fit_w = win_w / src_w;
        let fit_h = win_h / src_h;

        let mut width = scale * src_w;
        let mut height = scale * src_h;
        if fit_w > fit_h {
            width *= fit_w / fit_h;
        } else {
            height *= fit_h / fit_w;
        }
        Self {
            x: center.x - width / 2.0,
            y: center.y - height / 2.0,
            width,
            height,
        }
    }

    pub fn center(&self) -> PointF {
        PointF::new(self.x + self.width / 2.0, self.y + self.height / 2.0)
    }
}

/// View transform for one window: ROI plus the sizes it was derived from.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ViewTransform {
    roi: Roi,
    source: Size,
    window: Size,
}

impl ViewTransform {
    pub fn new(center: PointF, scale: f32, source: Size, window: Size) -> Self {
        Self {
            roi: Roi::compute(center, scale, source, window),
            source,
            window,
        }
    }

    pub fn roi(&self) -> Roi {
        self.roi
    }

    pub fn source_size(&self) -> Size {
        self.source
    }

    pub fn window_size(&self) -> Size {
        self.window
    }

    /// Source cells per window pixel along x and y.
    pub fn step(&self) -> (f32, f32) {
        (
            self.roi.width / self.window.width as f32,
            self.roi.height / self.window.height as f32,
        )
    }

    /// Window pixels per source cell along x and y.
    pub fn cell_pitch(&self) -> (f32, f32) {
        (
            self.window.width as f32 / self.roi.width,
            self.window.height as f32 / self.roi.height,
        )
    }

    pub fn to_source(&self, window: PointF) -> PointF {
        let (sx, sy) = self.step();
        PointF::new(self.roi.x + window.x * sx, self.roi.y + window.y * sy)
    }

    pub fn to_window(&self, source: PointF) -> PointF {
        let (px, py) = self.cell_pitch();
        PointF::new((source.x - self.roi.x) * px, (source.y - self.roi.y) * py)
    }

    pub fn x_to_window(&self, source_x: f32) -> f32 {
        (source_x - self.roi.x) * self.cell_pitch().0
    }

    pub fn y_to_window(&self, source_y: f32) -> f32 {
        (source_y - self.roi.y) * self.cell_pitch().1
    }

    /// Window pixel column of a source x, clamped near the window.
    pub fn x_to_pixel(&self, source_x: f32) -> i32 {
        pixel_coord(self.x_to_window(source_x), self.window.width)
    }

    /// Window pixel row of a source y, clamped near the window.
    pub fn y_to_pixel(&self, source_y: f32) -> i32 {
        pixel_coord(self.y_to_window(source_y), self.window.height)
    }

    /// True when the ROI has a finite, non-zero extent and a finite pixel
    /// pitch, so both directions of the mapping are usable.
    pub fn is_finite(&self) -> bool {
        let roi = self.roi;
        let (px, py) = self.cell_pitch();
        [roi.x, roi.y, roi.width, roi.height, px, py]
            .iter()
            .all(|v| v.is_finite())
            && roi.width > 0.0
            && roi.height > 0.0
    }

    /// Source column sampled by window column `x` (floor rule, unclipped).
    pub fn source_column(&self, x: usize) -> i64 {
        (self.roi.x + self.step().0 * x as f32).floor() as i64
    }

    /// Source row sampled by window row `y` (floor rule, unclipped).
    pub fn source_row(&self, y: usize) -> i64 {
        (self.roi.y + self.step().1 * y as f32).floor() as i64
    }

    /// Source cell under a window position, if it lies inside the source.
    pub fn source_cell(&self, window: PointF) -> Option<(usize, usize)> {
        let p = self.to_source(window);
        let (x, y) = (p.x.floor(), p.y.floor());
        if x < 0.0 || y < 0.0 || x >= self.source.width as f32 || y >= self.source.height as f32 {
            return None;
        }
        Some((x as usize, y as usize))
    }

    /// Window-space rounded bounds of the whole source: (left, top, right,
    /// bottom), clamped like [`x_to_pixel`](Self::x_to_pixel).
    pub fn source_bounds_in_window(&self) -> (i32, i32, i32, i32) {
        (
            self.x_to_pixel(0.0),
            self.y_to_pixel(0.0),
            self.x_to_pixel(self.source.width as f32),
            self.y_to_pixel(self.source.height as f32),
        )
    }
}

//! Grid/value overlay, source outline and caller annotations.

use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::buffer::{ColorBuffer, NumericBuffer};
use crate::config::{OverlayConfig, RenderContext};
use crate::geometry::{PointF, Rect, Rgb, Size};
use crate::text::{block_size, text_size, FontSpec};
use crate::transform::ViewTransform;

/// Caller-supplied text drawn on top of a window.
///
/// The text's baseline-left point is `anchor + font_offset * text size +
/// window_offset * window size`. With the default `font_offset` of `(0, 1)`
/// an anchor of `(0, 0)` puts the text in the top-left corner.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Annotation {
    pub text: String,
    pub font: FontSpec,
    pub color: Rgb,
    pub anchor: (i32, i32),
    pub font_offset: PointF,
    pub window_offset: PointF,
}

impl Default for Annotation {
    fn default() -> Self {
        Self {
            text: String::new(),
            font: FontSpec::new(1, 2),
            color: [255, 255, 255],
            anchor: (0, 0),
            font_offset: PointF::new(0.0, 1.0),
            window_offset: PointF::new(0.0, 0.0),
        }
    }
}

impl Annotation {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Self::default()
        }
    }

    pub fn at(mut self, x: i32, y: i32) -> Self {
        self.anchor = (x, y);
        self
    }

    pub fn with_color(mut self, color: Rgb) -> Self {
        self.color = color;
        self
    }

    pub fn with_window_offset(mut self, x: f32, y: f32) -> Self {
        self.window_offset = PointF::new(x, y);
        self
    }

    /// Top-left corner of the rendered text in a window of `window` size.
    pub fn placement(&self, window: Size) -> (i32, i32) {
        let size = text_size(&self.text, self.font);
        let x = self.anchor.0
            + (self.font_offset.x * size.width as f32 + self.window_offset.x * window.width as f32)
                .round() as i32;
        let baseline = self.anchor.1
            + (self.font_offset.y * size.height as f32
                + self.window_offset.y * window.height as f32)
                .round() as i32;
        (x, baseline - size.height as i32)
    }
}

/// Largest value block the buffer can produce: min and max formatted for
/// every channel, plus the configured margin.
pub fn reference_legibility(raw: &NumericBuffer, config: &OverlayConfig) -> Size {
    let (lo, hi) = raw.min_max().unwrap_or((0.0, 0.0));
    let channels = raw.channels().max(1);
    let measure = |v: f64| {
        let line = raw.format_scalar(v, config.float_precision);
        let lines = vec![line; channels];
        block_size(&lines, config.value_font, config.line_gap)
    };
    let (a, b) = (measure(lo), measure(hi));
    Size::new(
        a.width.max(b.width) + config.legibility_margin,
        a.height.max(b.height) + config.legibility_margin,
    )
}

/// Overlay mode is on when the legibility block fits inside one cell.
pub fn is_overlay_mode(legibility: Size, transform: &ViewTransform) -> bool {
    let (px, py) = transform.cell_pitch();
    legibility.width as f32 <= px && legibility.height as f32 <= py
}

/// Source cell range (columns, rows) touched by the ROI, padded by one cell.
pub fn visible_cells(transform: &ViewTransform) -> (std::ops::Range<usize>, std::ops::Range<usize>) {
    let roi = transform.roi();
    let src = transform.source_size();
    let clamp = |v: f32, limit: usize| (v as i64).clamp(0, limit as i64) as usize;
    let x0 = clamp(roi.x - 1.0, src.width);
    let x1 = clamp(roi.x + roi.width + 2.0, src.width);
    let y0 = clamp(roi.y - 1.0, src.height);
    let y1 = clamp(roi.y + roi.height + 2.0, src.height);
    (x0..x1.max(x0), y0..y1.max(y0))
}

/// Grid lines at every integer source coordinate in the visible range.
pub fn draw_grid(visible: &mut ColorBuffer, transform: &ViewTransform, config: &OverlayConfig) {
    let (cols, rows) = visible_cells(transform);
    let (left, top, right, bottom) = transform.source_bounds_in_window();
    let mut canvas = visible.canvas();
    for i in cols.start..=cols.end {
        let x = transform.x_to_pixel(i as f32);
        canvas.line(x, top, x, bottom, config.grid_color, config.grid_thickness);
    }
    for i in rows.start..=rows.end {
        let y = transform.y_to_pixel(i as f32);
        canvas.line(left, y, right, y, config.grid_color, config.grid_thickness);
    }
}

/// Text color with enough contrast against a cell's color.
pub fn contrast_color(background: Rgb, threshold: u32) -> Rgb {
    let sum: u32 = background.iter().map(|&c| c as u32).sum();
    if sum > threshold * 3 {
        [0, 0, 0]
    } else {
        [255, 255, 255]
    }
}

/// Per-cell value text, centered in each visible cell. Source rows are split
/// into one group per worker; each group draws into the window rows its
/// cells occupy.
pub fn draw_values(
    ctx: &RenderContext,
    visible: &mut ColorBuffer,
    color: &ColorBuffer,
    raw: &NumericBuffer,
    transform: &ViewTransform,
) {
    let config = &ctx.config().overlay;
    let (cols, rows) = visible_cells(transform);
    if cols.is_empty() || rows.is_empty() {
        return;
    }
    let per_band = rows.len().div_ceil(ctx.workers()).max(1);
    let groups: Vec<_> = rows
        .clone()
        .step_by(per_band)
        .map(|start| start..(start + per_band).min(rows.end))
        .collect();
    let window_h = transform.window_size().height;
    let cuts: Vec<usize> = groups
        .iter()
        .skip(1)
        .map(|g| {
            let y = transform.y_to_window(g.start as f32).round();
            (y.max(0.0) as usize).min(window_h)
        })
        .collect();

    let bands = visible.canvas().into_bands(&cuts);
    ctx.pool().install(|| {
        bands
            .into_par_iter()
            .zip(groups.into_par_iter())
            .for_each(|(mut band, group)| {
                for y in group {
                    let cy = transform.y_to_pixel(y as f32 + 0.5);
                    for x in cols.clone() {
                        let lines = raw.cell_text(x, y, config.float_precision);
                        let block = block_size(&lines, config.value_font, config.line_gap);
                        let cx = transform.x_to_pixel(x as f32 + 0.5);
                        let ink = contrast_color(color.pixel(x, y), config.luminance_threshold);
                        band.draw_text_block(
                            cx - block.width as i32 / 2,
                            cy - block.height as i32 / 2,
                            &lines,
                            config.value_font,
                            config.line_gap,
                            ink,
                        );
                    }
                }
            });
    });
}

/// One rectangle around the source extent, one pixel outside it.
pub fn draw_source_outline(visible: &mut ColorBuffer, transform: &ViewTransform, config: &OverlayConfig) {
    let (left, top, right, bottom) = transform.source_bounds_in_window();
    visible.canvas().rect_outline(
        Rect::from_corners(
            left.saturating_sub(1),
            top.saturating_sub(1),
            right.saturating_add(1),
            bottom.saturating_add(1),
        ),
        config.grid_color,
        config.grid_thickness,
    );
}

pub fn draw_annotations(visible: &mut ColorBuffer, annotations: &[Annotation]) {
    let window = visible.size();
    let mut canvas = visible.canvas();
    for a in annotations {
        let (x, y) = a.placement(window);
        canvas.draw_text(x, y, &a.text, a.font, a.color);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_contrast_color_threshold() {
        assert_eq!(contrast_color([128, 128, 128], 127), [0, 0, 0]);
        assert_eq!(contrast_color([127, 127, 127], 127), [255, 255, 255]);
        assert_eq!(contrast_color([255, 0, 0], 127), [255, 255, 255]);
    }

    #[test]
    fn test_annotation_default_placement_is_top_left() {
        let a = Annotation::new("Demo");
        assert_eq!(a.placement(Size::new(100, 100)), (0, 0));
    }

    #[test]
    fn test_annotation_window_offset() {
        let a = Annotation::new("x").with_window_offset(0.5, 0.5);
        assert_eq!(a.placement(Size::new(100, 80)), (50, 40));
    }
}

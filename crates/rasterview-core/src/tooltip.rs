use crate::buffer::{ColorBuffer, NumericBuffer};
use crate::config::{OverlayConfig, TooltipConfig};
use crate::geometry::{PointF, Rect, Size};
use crate::text::block_size;
use crate::transform::ViewTransform;

/// Box placement for a `block`-sized readout near `cursor`: offset up and to
/// the right, pushed back inside the window where possible.
pub fn tooltip_rect(cursor: PointF, block: Size, window: Size, offset: i32) -> Rect {
    let (w, h) = (block.width as i32, block.height as i32);
    let x = (cursor.x as i32 + offset).min(window.width as i32 - w - offset);
    let baseline = (cursor.y as i32 - offset).max(h + offset);
    Rect::new(x, baseline - h, w, h)
}

/// Copy `visible` into `out` and, when the cursor is over a source cell and
/// per-cell values are not already shown, draw a half-transparent readout.
/// Returns whether a readout was drawn.
#[allow(clippy::too_many_arguments)]
pub fn render_tooltip(
    visible: &ColorBuffer,
    out: &mut ColorBuffer,
    raw: &NumericBuffer,
    transform: &ViewTransform,
    overlay_mode: bool,
    cursor: Option<PointF>,
    tooltip: &TooltipConfig,
    overlay: &OverlayConfig,
) -> bool {
    out.clone_from(visible);
    let Some(cursor) = cursor else {
        return false;
    };
    let window = visible.size();
    let inside_window = cursor.x >= 0.0
        && cursor.y >= 0.0
        && cursor.x < window.width as f32
        && cursor.y < window.height as f32;
    if !inside_window || overlay_mode {
        return false;
    }
    let Some((x, y)) = transform.source_cell(cursor) else {
        return false;
    };

    let lines = raw.cell_text(x, y, overlay.float_precision);
    let block = block_size(&lines, tooltip.font, overlay.line_gap);
    if block.is_empty() {
        return false;
    }
    let rect = tooltip_rect(cursor, block, window, tooltip.cursor_offset);
    let (visible_part, pad) = rect.clip_to(window);
    let mut canvas = out.canvas();
    canvas.blend_rect(visible_part, [0, 0, 0], tooltip.background_alpha);
    canvas.draw_text_block(
        visible_part.x - pad.left,
        visible_part.y - pad.top,
        &lines,
        tooltip.font,
        overlay.line_gap,
        tooltip.color,
    );
    true
}

use crate::blit::resize_nearest;
use crate::buffer::ColorBuffer;
use crate::config::RenderContext;
use crate::consts::COLOR_CHANNELS;
use crate::geometry::{pixel_coord, Rect, Size};
use crate::transform::Roi;

/// Thumbnail rectangle in the top-right corner, long side = `config.size`.
pub fn minimap_rect(source: Size, window: Size, long_side: usize, margin: usize) -> Rect {
    let (w, h) = if source.width > source.height {
        (long_side, long_side * source.height / source.width)
    } else {
        (long_side * source.width / source.height, long_side)
    };
    Rect::new(
        window.width as i32 - w as i32 - margin as i32,
        margin as i32,
        w as i32,
        h as i32,
    )
}

/// Draw the whole source as a thumbnail with the current ROI highlighted.
/// Returns false (drawing nothing) when the thumbnail would not fit.
pub fn draw_minimap(ctx: &RenderContext, visible: &mut ColorBuffer, color: &ColorBuffer, roi: &Roi) -> bool {
    let config = &ctx.config().minimap;
    let window = visible.size();
    let rect = minimap_rect(color.size(), window, config.size, config.margin);
    if rect.is_empty() || !rect.fits_inside(window) {
        return false;
    }

    let mut thumb = ColorBuffer::new(Size::new(rect.width as usize, rect.height as usize));
    resize_nearest(ctx.pool(), ctx.workers(), color, &mut thumb);

    let fx = thumb.width() as f32 / color.width() as f32;
    let fy = thumb.height() as f32 / color.height() as f32;
    let (tw, th) = (thumb.width(), thumb.height());
    let highlight = Rect::new(
        pixel_coord(roi.x * fx, tw),
        pixel_coord(roi.y * fy, th),
        pixel_coord((roi.width * fx).ceil(), tw),
        pixel_coord((roi.height * fy).ceil(), th),
    );
    // Outside the ROI the thumbnail is blended with black, inside with the
    // highlight color.
    let keep = config.blend;
    let original = thumb.clone();
    let full = Rect::new(0, 0, thumb.width() as i32, thumb.height() as i32);
    thumb.canvas().blend_rect(full, [0, 0, 0], keep);
    let (inside, _) = highlight.clip_to(thumb.size());
    for y in inside.y..inside.bottom() {
        for x in inside.x..inside.right() {
            let (x, y) = (x as usize, y as usize);
            let src = original.pixel(x, y);
            let mixed = std::array::from_fn(|c| {
                (src[c] as f32 * keep + config.highlight_color[c] as f32 * (1.0 - keep)).round() as u8
            });
            thumb.set_pixel(x, y, mixed);
        }
    }

    let stride = thumb.width() * COLOR_CHANNELS;
    let mut canvas = visible.canvas();
    for (row, line) in thumb.as_raw().chunks_exact(stride).enumerate() {
        if let Some(dst) = canvas.row_mut(rect.y as usize + row) {
            let start = rect.x as usize * COLOR_CHANNELS;
            dst[start..start + stride].copy_from_slice(line);
        }
    }
    canvas.rect_outline(rect, config.outline_color, config.outline_thickness);
    true
}

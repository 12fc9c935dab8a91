//! Pointer state machine: pan by dragging, zoom on the wheel ladder,
//! double-click reset and right-click minimap toggle.

use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::cache::{DisplayCache, DragState};
use crate::config::ZoomConfig;
use crate::geometry::{PointF, Size};
use crate::transform::ViewTransform;

/// Raw pointer input in window pixel coordinates.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub enum PointerEvent {
    Move { pos: PointF },
    LeftDown { pos: PointF },
    LeftUp { pos: PointF },
    DoubleClick { pos: PointF },
    RightDown { pos: PointF },
    /// Positive `delta` zooms in.
    Wheel { pos: PointF, delta: f32 },
}

impl PointerEvent {
    pub fn position(&self) -> PointF {
        match *self {
            PointerEvent::Move { pos }
            | PointerEvent::LeftDown { pos }
            | PointerEvent::LeftUp { pos }
            | PointerEvent::DoubleClick { pos }
            | PointerEvent::RightDown { pos }
            | PointerEvent::Wheel { pos, .. } => pos,
        }
    }
}

/// Apply one event to `cache`. Returns true when the view was re-rendered.
pub fn apply(cache: &mut DisplayCache, event: PointerEvent) -> bool {
    match event {
        PointerEvent::LeftDown { pos } => {
            let view = cache.view();
            cache.set_drag(DragState {
                dragging: true,
                anchor_source: cache.transform().to_source(pos),
                anchor_center: view.center,
            });
            trace!(window = cache.name(), ?pos, "Drag started");
            false
        }
        PointerEvent::Move { pos } => {
            let drag = cache.drag();
            if !drag.dragging {
                return false;
            }
            let view = cache.view();
            let center = pan_center(&drag, pos, view.scale, cache.source_size(), view.window_size);
            cache.set_view(center, view.scale);
            true
        }
        PointerEvent::LeftUp { .. } => {
            let mut drag = cache.drag();
            drag.dragging = false;
            cache.set_drag(drag);
            trace!(window = cache.name(), "Drag finished");
            false
        }
        PointerEvent::DoubleClick { .. } => {
            cache.reset_view();
            true
        }
        PointerEvent::RightDown { .. } => {
            cache.toggle_minimap();
            true
        }
        PointerEvent::Wheel { pos, delta } => {
            if cache.drag().dragging || delta == 0.0 {
                return false;
            }
            let view = cache.view();
            let zoom = &cache.context().config().zoom;
            let scale = next_scale(zoom, cache.source_size(), view.scale, delta > 0.0);
            if scale == view.scale {
                return false;
            }
            let center = zoom_center(cache, pos, scale);
            trace!(window = cache.name(), from = view.scale, to = scale, "Zoom");
            cache.set_view(center, scale);
            true
        }
    }
}

/// Center that puts the drag anchor back under `pos` at the current scale.
pub fn pan_center(drag: &DragState, pos: PointF, scale: f32, source: Size, window: Size) -> PointF {
    let from_start = ViewTransform::new(drag.anchor_center, scale, source, window);
    drag.anchor_center - (from_start.to_source(pos) - drag.anchor_source)
}

/// Center that keeps the source point under `pos` fixed when switching to `scale`.
fn zoom_center(cache: &DisplayCache, pos: PointF, scale: f32) -> PointF {
    let view = cache.view();
    let before = cache.transform().to_source(pos);
    let after = ViewTransform::new(view.center, scale, cache.source_size(), view.window_size).to_source(pos);
    view.center - (after - before)
}

/// Step the visible width (in source cells) along the ladder. The first
/// threshold below the current width sets the step size; the result never
/// drops under that threshold nor grows past the zoom-out limit.
pub fn next_scale(zoom: &ZoomConfig, source: Size, scale: f32, zoom_in: bool) -> f32 {
    let Some(&last) = zoom.ladder.last() else {
        return scale;
    };
    let source_w = source.width.max(1) as f32;
    let current = (source_w * scale).round() as i64;
    let threshold = zoom
        .ladder
        .iter()
        .copied()
        .find(|&t| current > t as i64)
        .unwrap_or(last)
        .max(1) as i64;

    let stepped = if zoom_in {
        current - threshold
    } else {
        current + threshold
    };
    let top = zoom.ladder.first().copied().unwrap_or(last) as f32;
    let limit = (source_w.max(top) * zoom.zoom_out_limit).max(threshold as f32);
    let width = (stepped.max(threshold) as f32).min(limit);
    width / source_w
}

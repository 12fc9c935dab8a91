//! Per-window display state and the render pipeline that turns it into
//! pixels.
//!
//! A [`DisplayCache`] is rebuilt on every update. View state survives a
//! rebuild only through an explicit [`CacheSeed`]: the session reads the
//! seed out of the previous cache (when the source size is unchanged) and
//! hands it to [`DisplayCache::new`].

use std::time::Instant;

use tracing::{debug, trace};

use crate::blit::blit;
use crate::buffer::{ColorBuffer, NumericBuffer};
use crate::config::RenderContext;
use crate::consts::MAX_WINDOW_SIDE;
use crate::error::{Result, ViewerError};
use crate::geometry::{PointF, Size};
use crate::minimap::draw_minimap;
use crate::overlay::{
    draw_annotations, draw_grid, draw_source_outline, draw_values, is_overlay_mode,
    reference_legibility, Annotation,
};
use crate::tooltip::render_tooltip;
use crate::transform::ViewTransform;

/// Center (source space), scale and window size of one window.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ViewState {
    pub center: PointF,
    pub scale: f32,
    pub window_size: Size,
}

impl ViewState {
    /// Whole source visible, centered.
    pub fn full_view(source: Size, window_size: Size) -> Self {
        Self {
            center: PointF::new(source.width as f32 / 2.0, source.height as f32 / 2.0),
            scale: 1.0,
            window_size,
        }
    }

    pub fn transform(&self, source: Size) -> ViewTransform {
        ViewTransform::new(self.center, self.scale, source, self.window_size)
    }
}

/// Pan gesture in progress: where it started in source space and the
/// center at that moment.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct DragState {
    pub dragging: bool,
    pub anchor_source: PointF,
    pub anchor_center: PointF,
}

/// Everything a rebuilt cache inherits from its predecessor.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CacheSeed {
    pub view: ViewState,
    pub tooltip: Option<PointF>,
    pub minimap: bool,
    pub drag: DragState,
}

impl CacheSeed {
    pub fn full_view(source: Size, window_size: Size) -> Self {
        Self {
            view: ViewState::full_view(source, window_size),
            tooltip: None,
            minimap: false,
            drag: DragState::default(),
        }
    }
}

pub struct DisplayCache {
    name: String,
    color: ColorBuffer,
    raw: NumericBuffer,
    annotations: Vec<Annotation>,
    view: ViewState,
    transform: ViewTransform,
    legibility: Size,
    overlay_mode: bool,
    visible: ColorBuffer,
    tooltip_buffer: ColorBuffer,
    tooltip: Option<PointF>,
    minimap: bool,
    drag: DragState,
    generation: u64,
    ctx: RenderContext,
}

impl DisplayCache {
    /// Validate the buffers, adopt `seed` and render once.
    pub fn new(
        name: impl Into<String>,
        color: ColorBuffer,
        raw: NumericBuffer,
        annotations: Vec<Annotation>,
        seed: CacheSeed,
        generation: u64,
        ctx: RenderContext,
    ) -> Result<Self> {
        let source = color.size();
        if source.is_empty() {
            return Err(ViewerError::EmptyBuffer {
                width: source.width,
                height: source.height,
            });
        }
        if raw.size() != source {
            return Err(ViewerError::DimensionMismatch {
                raw: raw.size(),
                color: source,
            });
        }
        let window = seed.view.window_size;
        if !window.is_valid_window(MAX_WINDOW_SIDE) {
            return Err(ViewerError::InvalidWindowSize {
                width: window.width,
                height: window.height,
            });
        }

        let mut view = seed.view;
        if !usable_view(view.center, view.scale, source, window) {
            view = ViewState::full_view(source, window);
        }
        let legibility = reference_legibility(&raw, &ctx.config().overlay);
        let mut cache = Self {
            name: name.into(),
            transform: view.transform(source),
            color,
            raw,
            annotations,
            view,
            legibility,
            overlay_mode: false,
            visible: ColorBuffer::new(window),
            tooltip_buffer: ColorBuffer::new(window),
            tooltip: seed.tooltip,
            minimap: seed.minimap,
            drag: seed.drag,
            generation,
            ctx,
        };
        cache.render();
        Ok(cache)
    }

    /// State to carry into the next cache for this window.
    pub fn seed(&self) -> CacheSeed {
        CacheSeed {
            view: self.view,
            tooltip: self.tooltip,
            minimap: self.minimap,
            drag: self.drag,
        }
    }

    /// Full re-render: blit, overlay or outline, annotations, minimap and tooltip.
    pub fn render(&mut self) {
        let started = Instant::now();
        let source = self.color.size();
        self.transform = self.view.transform(source);
        if self.visible.size() != self.view.window_size {
            self.visible = ColorBuffer::new(self.view.window_size);
        } else {
            self.visible.clear();
        }

        blit(
            self.ctx.pool(),
            self.ctx.workers(),
            &self.color,
            &self.transform.roi(),
            &mut self.visible,
        );

        let overlay = &self.ctx.config().overlay;
        self.overlay_mode = is_overlay_mode(self.legibility, &self.transform);
        if self.overlay_mode {
            draw_grid(&mut self.visible, &self.transform, overlay);
            draw_values(&self.ctx, &mut self.visible, &self.color, &self.raw, &self.transform);
        } else {
            draw_source_outline(&mut self.visible, &self.transform, overlay);
        }
        draw_annotations(&mut self.visible, &self.annotations);
        if self.minimap {
            draw_minimap(&self.ctx, &mut self.visible, &self.color, &self.transform.roi());
        }
        self.refresh_tooltip();

        trace!(
            window = %self.name,
            overlay = self.overlay_mode,
            elapsed_us = started.elapsed().as_micros() as u64,
            "Rendered window"
        );
    }

    fn refresh_tooltip(&mut self) {
        render_tooltip(
            &self.visible,
            &mut self.tooltip_buffer,
            &self.raw,
            &self.transform,
            self.overlay_mode,
            self.tooltip,
            &self.ctx.config().tooltip,
            &self.ctx.config().overlay,
        );
    }

    /// Move the view. Ignored when the resulting transform would not be
    /// finite (non-positive scale, or one so extreme the ROI degenerates).
    pub fn set_view(&mut self, center: PointF, scale: f32) {
        if !usable_view(center, scale, self.color.size(), self.view.window_size) {
            return;
        }
        self.view.center = center;
        self.view.scale = scale;
        self.render();
    }

    pub fn reset_view(&mut self) {
        debug!(window = %self.name, "Resetting view");
        self.view = ViewState::full_view(self.color.size(), self.view.window_size);
        self.render();
    }

    /// Adopt a new window size. Invalid or unchanged sizes are ignored.
    /// Returns whether a re-render happened.
    pub fn set_window_size(&mut self, size: Size) -> bool {
        if !size.is_valid_window(MAX_WINDOW_SIDE) || size == self.view.window_size {
            return false;
        }
        self.view.window_size = size;
        self.render();
        true
    }

    pub fn set_minimap(&mut self, enabled: bool) {
        if self.minimap != enabled {
            self.minimap = enabled;
            self.render();
        }
    }

    pub fn toggle_minimap(&mut self) {
        self.set_minimap(!self.minimap);
    }

    /// Move (or clear) the hover readout; only the tooltip buffer is redrawn.
    pub fn set_tooltip(&mut self, location: Option<PointF>) {
        self.tooltip = location;
        self.refresh_tooltip();
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn source_size(&self) -> Size {
        self.color.size()
    }

    pub fn view(&self) -> ViewState {
        self.view
    }

    pub fn transform(&self) -> &ViewTransform {
        &self.transform
    }

    pub fn drag(&self) -> DragState {
        self.drag
    }

    pub fn set_drag(&mut self, drag: DragState) {
        self.drag = drag;
    }

    pub fn tooltip_location(&self) -> Option<PointF> {
        self.tooltip
    }

    pub fn minimap_enabled(&self) -> bool {
        self.minimap
    }

    pub fn overlay_mode(&self) -> bool {
        self.overlay_mode
    }

    pub fn legibility(&self) -> Size {
        self.legibility
    }

    pub fn color(&self) -> &ColorBuffer {
        &self.color
    }

    pub fn raw(&self) -> &NumericBuffer {
        &self.raw
    }

    pub fn annotations(&self) -> &[Annotation] {
        &self.annotations
    }

    pub fn visible(&self) -> &ColorBuffer {
        &self.visible
    }

    /// The visible buffer plus the hover readout, if any. This is what gets
    /// shown in the native window.
    pub fn tooltip_buffer(&self) -> &ColorBuffer {
        &self.tooltip_buffer
    }

    pub fn context(&self) -> &RenderContext {
        &self.ctx
    }
}

fn usable_view(center: PointF, scale: f32, source: Size, window: Size) -> bool {
    center.x.is_finite()
        && center.y.is_finite()
        && scale.is_finite()
        && scale > 0.0
        && ViewTransform::new(center, scale, source, window).is_finite()
}

impl std::fmt::Debug for DisplayCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DisplayCache")
            .field("name", &self.name)
            .field("source", &self.color.size())
            .field("view", &self.view)
            .field("overlay_mode", &self.overlay_mode)
            .field("minimap", &self.minimap)
            .field("generation", &self.generation)
            .finish_non_exhaustive()
    }
}

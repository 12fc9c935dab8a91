mod common;

use rasterview_core::cache::{CacheSeed, DisplayCache, DragState, ViewState};
use rasterview_core::colorize;
use rasterview_core::config::MinimapConfig;
use rasterview_core::{ColorBuffer, ElementType, NumericBuffer, PointF, Size, ViewerError};

use common::{context, ramp_cache, ramp_i32};

// ---------------------------------------------------------------------------
// Construction and validation
// ---------------------------------------------------------------------------

#[test]
fn test_new_cache_starts_at_full_view() {
    let cache = ramp_cache(Size::new(160, 120), Size::new(320, 480));
    let view = cache.view();
    assert_eq!(view.center, PointF::new(80.0, 60.0));
    assert_eq!(view.scale, 1.0);
    assert_eq!(view.window_size, Size::new(320, 480));
    assert_eq!(cache.visible().size(), Size::new(320, 480));
    assert_eq!(cache.tooltip_buffer().size(), Size::new(320, 480));
    assert!(!cache.minimap_enabled());
}

#[test]
fn test_dimension_mismatch_rejected() {
    let color = ColorBuffer::new(Size::new(10, 10));
    let raw = ramp_i32(10, 9);
    let err = DisplayCache::new(
        "bad",
        color,
        raw,
        Vec::new(),
        CacheSeed::full_view(Size::new(10, 10), Size::new(20, 20)),
        0,
        context(),
    )
    .unwrap_err();
    assert!(matches!(err, ViewerError::DimensionMismatch { .. }), "got {err:?}");
}

#[test]
fn test_empty_source_rejected() {
    let color = ColorBuffer::new(Size::new(0, 10));
    let raw = NumericBuffer::zeros(Size::new(0, 10), 1, ElementType::U8);
    let err = DisplayCache::new(
        "empty",
        color,
        raw,
        Vec::new(),
        CacheSeed::full_view(Size::new(0, 10), Size::new(20, 20)),
        0,
        context(),
    )
    .unwrap_err();
    assert!(matches!(err, ViewerError::EmptyBuffer { .. }));
}

#[test]
fn test_zero_window_rejected() {
    let raw = ramp_i32(4, 4);
    let color = colorize::gray(&raw).unwrap();
    let err = DisplayCache::new(
        "zero",
        color,
        raw,
        Vec::new(),
        CacheSeed::full_view(Size::new(4, 4), Size::new(0, 5)),
        0,
        context(),
    )
    .unwrap_err();
    assert!(matches!(err, ViewerError::InvalidWindowSize { width: 0, height: 5 }));
}

// ---------------------------------------------------------------------------
// Seeds
// ---------------------------------------------------------------------------

#[test]
fn test_seed_round_trip_preserves_state() {
    let mut first = ramp_cache(Size::new(160, 120), Size::new(320, 480));
    first.set_view(PointF::new(30.0, 40.0), 0.25);
    first.set_minimap(true);
    first.set_tooltip(Some(PointF::new(5.0, 6.0)));
    first.set_drag(DragState {
        dragging: true,
        anchor_source: PointF::new(1.0, 2.0),
        anchor_center: PointF::new(30.0, 40.0),
    });
    let seed = first.seed();

    let raw = ramp_i32(160, 120);
    let second = DisplayCache::new(
        "test",
        colorize::jet(&raw).unwrap(),
        raw,
        Vec::new(),
        seed,
        1,
        context(),
    )
    .unwrap();
    assert_eq!(second.seed(), seed);
    assert_eq!(second.generation(), 1);
}

#[test]
fn test_invalid_seed_scale_falls_back() {
    let raw = ramp_i32(8, 8);
    let mut seed = CacheSeed::full_view(Size::new(8, 8), Size::new(16, 16));
    seed.view.scale = 0.0;
    let cache = DisplayCache::new("s", colorize::gray(&raw).unwrap(), raw, Vec::new(), seed, 0, context()).unwrap();
    assert_eq!(cache.view().scale, 1.0);
}

#[test]
fn test_full_view_seed() {
    let seed = CacheSeed::full_view(Size::new(9, 4), Size::new(30, 30));
    assert_eq!(
        seed.view,
        ViewState {
            center: PointF::new(4.5, 2.0),
            scale: 1.0,
            window_size: Size::new(30, 30),
        }
    );
    assert_eq!(seed.tooltip, None);
    assert!(!seed.minimap);
    assert!(!seed.drag.dragging);
}

// ---------------------------------------------------------------------------
// View changes
// ---------------------------------------------------------------------------

#[test]
fn test_set_view_ignores_non_positive_scale() {
    let mut cache = ramp_cache(Size::new(20, 20), Size::new(40, 40));
    cache.set_view(PointF::new(3.0, 3.0), -1.0);
    assert_eq!(cache.view().scale, 1.0);
    assert_eq!(cache.view().center, PointF::new(10.0, 10.0));
}

#[test]
fn test_reset_view_restores_full_view() {
    let mut cache = ramp_cache(Size::new(20, 20), Size::new(40, 40));
    let full = cache.visible().clone();
    cache.set_view(PointF::new(3.0, 3.0), 0.3);
    assert_ne!(cache.visible(), &full);
    cache.reset_view();
    assert_eq!(cache.view().center, PointF::new(10.0, 10.0));
    assert_eq!(cache.view().scale, 1.0);
    assert_eq!(cache.visible(), &full);
}

#[test]
fn test_window_size_change_resizes_buffers() {
    let mut cache = ramp_cache(Size::new(20, 20), Size::new(40, 40));
    assert!(cache.set_window_size(Size::new(64, 32)));
    assert_eq!(cache.visible().size(), Size::new(64, 32));
    assert_eq!(cache.tooltip_buffer().size(), Size::new(64, 32));
    assert!(!cache.set_window_size(Size::new(64, 32)));
    assert!(!cache.set_window_size(Size::new(0, 32)));
    assert_eq!(cache.view().window_size, Size::new(64, 32));
}

#[test]
fn test_set_view_ignores_degenerate_transform() {
    let mut cache = ramp_cache(Size::new(20, 20), Size::new(40, 40));
    cache.set_view(PointF::new(f32::NAN, 3.0), 0.5);
    cache.set_view(PointF::new(3.0, 3.0), f32::INFINITY);
    cache.set_view(PointF::new(3.0, 3.0), 1e-45);
    assert_eq!(cache.view().scale, 1.0);
    assert_eq!(cache.view().center, PointF::new(10.0, 10.0));
}

// ---------------------------------------------------------------------------
// Extreme scales
// ---------------------------------------------------------------------------

fn assert_uniform_interior(cache: &DisplayCache, margin: usize) {
    let size = cache.visible().size();
    let reference = cache.visible().pixel(size.width / 2 + 7, size.height / 2 + 9);
    for y in (margin..size.height - margin).step_by(13) {
        for x in (margin..size.width - margin).step_by(11) {
            assert_eq!(cache.visible().pixel(x, y), reference, "pixel ({x}, {y})");
        }
    }
}

#[test]
fn test_tiny_scale_renders_single_cell() {
    let mut cache = ramp_cache(Size::new(160, 120), Size::new(320, 480));
    cache.set_view(PointF::new(80.0, 60.0), 1e-8);
    assert_eq!(cache.view().scale, 1e-8);
    assert!(cache.overlay_mode());
    assert!(cache.transform().is_finite());
    // One cell covers the whole window; its grid lines and value text land
    // on the window edges or far outside it.
    assert_uniform_interior(&cache, 4);
}

#[test]
fn test_huge_scale_renders_source_as_a_speck() {
    let mut cache = ramp_cache(Size::new(160, 120), Size::new(320, 480));
    cache.set_view(PointF::new(80.0, 60.0), 1e8);
    assert_eq!(cache.view().scale, 1e8);
    assert!(!cache.overlay_mode());
    assert_eq!(cache.visible().pixel(0, 0), [0, 0, 0]);
    assert_eq!(cache.visible().pixel(319, 479), [0, 0, 0]);
}

#[test]
fn test_extreme_scales_in_non_square_window() {
    let mut cache = ramp_cache(Size::new(160, 120), Size::new(320, 100));
    cache.set_minimap(true);
    cache.set_tooltip(Some(PointF::new(150.0, 50.0)));
    for scale in [1e-12f32, 1e-8, 1e-4, 1e4, 1e8, 1e12] {
        for center in [PointF::new(80.0, 60.0), PointF::new(-500.0, 1e6), PointF::new(159.9, 0.1)] {
            cache.set_view(center, scale);
            assert_eq!(cache.view().scale, scale);
            assert_eq!(cache.visible().size(), Size::new(320, 100));
            let roi = cache.transform().roi();
            assert!(roi.width > 0.0 && roi.height > 0.0, "scale {scale}: {roi:?}");
        }
    }
}

#[test]
fn test_pan_and_zoom_from_extreme_scale() {
    use rasterview_core::interaction::{apply, PointerEvent};

    let mut cache = ramp_cache(Size::new(160, 120), Size::new(320, 480));
    cache.set_view(PointF::new(80.0, 60.0), 1e-8);
    apply(&mut cache, PointerEvent::LeftDown { pos: PointF::new(10.0, 10.0) });
    apply(&mut cache, PointerEvent::Move { pos: PointF::new(300.0, 470.0) });
    apply(&mut cache, PointerEvent::LeftUp { pos: PointF::new(300.0, 470.0) });
    apply(&mut cache, PointerEvent::Wheel { pos: PointF::new(5.0, 5.0), delta: -1.0 });
    assert!(cache.view().scale > 1e-8);
    assert!(cache.transform().is_finite());
}

// ---------------------------------------------------------------------------
// Minimap
// ---------------------------------------------------------------------------

#[test]
fn test_minimap_outline_drawn_when_enabled() {
    let mut cache = ramp_cache(Size::new(160, 120), Size::new(320, 480));
    let outline = MinimapConfig::default().outline_color;
    // Thumbnail is 200 x 150 at (110, 10); the area above the source is black.
    assert_eq!(cache.visible().pixel(150, 10), [0, 0, 0]);
    cache.toggle_minimap();
    assert!(cache.minimap_enabled());
    assert_eq!(cache.visible().pixel(150, 10), outline);
    assert_eq!(cache.visible().pixel(110, 100), outline);
    cache.toggle_minimap();
    assert_eq!(cache.visible().pixel(150, 10), [0, 0, 0]);
}

#[test]
fn test_minimap_skipped_when_it_does_not_fit() {
    let mut cache = ramp_cache(Size::new(160, 120), Size::new(150, 150));
    let before = cache.visible().clone();
    cache.set_minimap(true);
    assert!(cache.minimap_enabled());
    assert_eq!(cache.visible(), &before);
}

#[test]
fn test_per_cell_text_tracks_new_buffer() {
    // Same size, different values: the overlay shows the new values.
    let source = Size::new(4, 4);
    let mut seed = CacheSeed::full_view(source, Size::new(200, 200));
    seed.view.scale = 1.0;
    let a = NumericBuffer::filled(source, 1, ElementType::U8, 1.0);
    let b = NumericBuffer::filled(source, 1, ElementType::U8, 7.0);
    let color = ColorBuffer::new(source);
    let first = DisplayCache::new("t", color.clone(), a, Vec::new(), seed, 0, context()).unwrap();
    let second = DisplayCache::new("t", color, b, Vec::new(), seed, 1, context()).unwrap();
    assert!(first.overlay_mode() && second.overlay_mode());
    assert_ne!(first.visible(), second.visible());
}

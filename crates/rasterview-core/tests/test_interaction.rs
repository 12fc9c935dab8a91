mod common;

use approx::assert_abs_diff_eq;

use rasterview_core::interaction::{apply, PointerEvent};
use rasterview_core::{PointF, Size};

use common::ramp_cache;

fn p(x: f32, y: f32) -> PointF {
    PointF::new(x, y)
}

// ---------------------------------------------------------------------------
// Drag to pan
// ---------------------------------------------------------------------------

#[test]
fn test_drag_keeps_grabbed_point_under_cursor() {
    let pairs = [
        (p(10.0, 10.0), p(200.0, 150.0)),
        (p(300.0, 50.0), p(5.0, 470.0)),
        (p(160.0, 240.0), p(160.0, 240.0)),
        (p(0.0, 479.0), p(319.0, 0.0)),
    ];
    for scale in [1.0f32, 0.3, 0.05] {
        for &(a, b) in &pairs {
            let mut cache = ramp_cache(Size::new(160, 120), Size::new(320, 480));
            cache.set_view(p(70.0, 55.0), scale);
            let grabbed = cache.transform().to_source(a);

            apply(&mut cache, PointerEvent::LeftDown { pos: a });
            assert!(cache.drag().dragging);
            apply(&mut cache, PointerEvent::Move { pos: b });

            let landed = cache.transform().to_window(grabbed);
            assert!((landed.x - b.x).abs() <= 1.0, "scale {scale}: {a:?} -> {b:?}, got {landed:?}");
            assert!((landed.y - b.y).abs() <= 1.0, "scale {scale}: {a:?} -> {b:?}, got {landed:?}");
            assert_eq!(cache.view().scale, scale);
        }
    }
}

#[test]
fn test_drag_in_steps_matches_single_move() {
    let mut stepped = ramp_cache(Size::new(160, 120), Size::new(320, 240));
    let mut direct = ramp_cache(Size::new(160, 120), Size::new(320, 240));
    for cache in [&mut stepped, &mut direct] {
        apply(cache, PointerEvent::LeftDown { pos: p(100.0, 100.0) });
    }
    for x in [110.0, 130.0, 170.0] {
        apply(&mut stepped, PointerEvent::Move { pos: p(x, 120.0) });
    }
    apply(&mut direct, PointerEvent::Move { pos: p(170.0, 120.0) });
    assert_abs_diff_eq!(stepped.view().center.x, direct.view().center.x, epsilon = 1e-4);
    assert_abs_diff_eq!(stepped.view().center.y, direct.view().center.y, epsilon = 1e-4);
}

#[test]
fn test_move_without_drag_does_not_pan() {
    let mut cache = ramp_cache(Size::new(160, 120), Size::new(320, 240));
    let center = cache.view().center;
    assert!(!apply(&mut cache, PointerEvent::Move { pos: p(50.0, 50.0) }));
    assert_eq!(cache.view().center, center);

    apply(&mut cache, PointerEvent::LeftDown { pos: p(100.0, 100.0) });
    apply(&mut cache, PointerEvent::LeftUp { pos: p(100.0, 100.0) });
    assert!(!cache.drag().dragging);
    apply(&mut cache, PointerEvent::Move { pos: p(10.0, 10.0) });
    assert_eq!(cache.view().center, center);
}

// ---------------------------------------------------------------------------
// Wheel zoom
// ---------------------------------------------------------------------------

#[test]
fn test_wheel_zoom_keeps_point_under_cursor() {
    let mut cache = ramp_cache(Size::new(160, 120), Size::new(320, 240));
    let cursor = p(250.0, 60.0);
    for _ in 0..6 {
        let before = cache.transform().to_source(cursor);
        assert!(apply(&mut cache, PointerEvent::Wheel { pos: cursor, delta: 1.0 }));
        let after = cache.transform().to_source(cursor);
        assert_abs_diff_eq!(before.x, after.x, epsilon = 1e-3);
        assert_abs_diff_eq!(before.y, after.y, epsilon = 1e-3);
    }
    assert!(cache.view().scale < 1.0);
}

#[test]
fn test_wheel_direction() {
    let mut cache = ramp_cache(Size::new(160, 120), Size::new(320, 240));
    apply(&mut cache, PointerEvent::Wheel { pos: p(160.0, 120.0), delta: 1.0 });
    assert_abs_diff_eq!(cache.view().scale, 100.0 / 160.0, epsilon = 1e-5);
    apply(&mut cache, PointerEvent::Wheel { pos: p(160.0, 120.0), delta: -1.0 });
    // 100 visible cells: the next threshold below is 34.
    assert_abs_diff_eq!(cache.view().scale, 134.0 / 160.0, epsilon = 1e-5);
}

#[test]
fn test_wheel_ignored_while_dragging() {
    let mut cache = ramp_cache(Size::new(160, 120), Size::new(320, 240));
    apply(&mut cache, PointerEvent::LeftDown { pos: p(10.0, 10.0) });
    assert!(!apply(&mut cache, PointerEvent::Wheel { pos: p(10.0, 10.0), delta: 1.0 }));
    assert_eq!(cache.view().scale, 1.0);
}

#[test]
fn test_wheel_clamps_at_ladder_bottom() {
    let mut cache = ramp_cache(Size::new(160, 120), Size::new(320, 240));
    for _ in 0..50 {
        apply(&mut cache, PointerEvent::Wheel { pos: p(160.0, 120.0), delta: 1.0 });
    }
    assert_abs_diff_eq!(cache.view().scale, 2.0 / 160.0, epsilon = 1e-6);
    assert!(!apply(&mut cache, PointerEvent::Wheel { pos: p(160.0, 120.0), delta: 1.0 }));
    assert!(cache.overlay_mode());
}

// ---------------------------------------------------------------------------
// Buttons
// ---------------------------------------------------------------------------

#[test]
fn test_double_click_resets_view() {
    let mut cache = ramp_cache(Size::new(160, 120), Size::new(320, 240));
    cache.set_view(p(12.0, 34.0), 0.2);
    apply(&mut cache, PointerEvent::LeftDown { pos: p(10.0, 10.0) });
    apply(&mut cache, PointerEvent::DoubleClick { pos: p(10.0, 10.0) });
    assert_eq!(cache.view().center, p(80.0, 60.0));
    assert_eq!(cache.view().scale, 1.0);
}

#[test]
fn test_right_button_toggles_minimap() {
    let mut cache = ramp_cache(Size::new(160, 120), Size::new(320, 240));
    apply(&mut cache, PointerEvent::RightDown { pos: p(0.0, 0.0) });
    assert!(cache.minimap_enabled());
    apply(&mut cache, PointerEvent::RightDown { pos: p(0.0, 0.0) });
    assert!(!cache.minimap_enabled());
}

#[test]
fn test_event_position() {
    let e = PointerEvent::Wheel { pos: p(3.0, 4.0), delta: -2.0 };
    assert_eq!(e.position(), p(3.0, 4.0));
}

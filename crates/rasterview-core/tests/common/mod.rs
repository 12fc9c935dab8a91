#![allow(dead_code)]

use rasterview_core::cache::{CacheSeed, DisplayCache};
use rasterview_core::colorize;
use rasterview_core::{
    ColorBuffer, MemoryBackend, NumericBuffer, RenderContext, Size, ViewerConfig, ViewerSession,
};

/// Render context with default config.
pub fn context() -> RenderContext {
    RenderContext::new(ViewerConfig::default()).expect("worker pool")
}

pub fn context_with_workers(workers: usize) -> RenderContext {
    let mut config = ViewerConfig::default();
    config.render.workers = workers;
    RenderContext::new(config).expect("worker pool")
}

/// Single-channel i32 ramp: element (x, y) = y * width + x.
pub fn ramp_i32(width: usize, height: usize) -> NumericBuffer {
    NumericBuffer::ramp::<i32>(Size::new(width, height), 0.0, 1.0)
}

/// Color buffer whose pixel (x, y) holds (x, y, 0), for checking which
/// source cell a window pixel sampled. Limited to 256x256.
pub fn coordinate_image(width: usize, height: usize) -> ColorBuffer {
    let mut img = ColorBuffer::new(Size::new(width, height));
    for y in 0..height {
        for x in 0..width {
            img.set_pixel(x, y, [x as u8, y as u8, 0]);
        }
    }
    img
}

/// Cache showing a gray-mapped i32 ramp at full view.
pub fn ramp_cache(source: Size, window: Size) -> DisplayCache {
    let raw = ramp_i32(source.width, source.height);
    let color = colorize::gray(&raw).expect("gray");
    DisplayCache::new(
        "test",
        color,
        raw,
        Vec::new(),
        CacheSeed::full_view(source, window),
        0,
        context(),
    )
    .expect("cache")
}

pub fn memory_session() -> ViewerSession<MemoryBackend> {
    ViewerSession::new(MemoryBackend::new(), ViewerConfig::default()).expect("session")
}

/// Push a gray ramp of `source` size into `name`.
pub fn push_ramp(session: &ViewerSession<MemoryBackend>, name: &str, source: Size, window: Size) {
    let raw = ramp_i32(source.width, source.height);
    let color = colorize::gray(&raw).expect("gray");
    session
        .update(name, window, color, Some(raw), Vec::new())
        .expect("update");
}

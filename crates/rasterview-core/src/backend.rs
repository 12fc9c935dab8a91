//! Boundary to the native windowing layer.
//!
//! [`WindowBackend`] is what the session drives during its refresh pass.
//! [`MemoryBackend`] keeps everything in memory so sessions can run without
//! a display.

use std::collections::BTreeMap;
use std::sync::Arc;

use crate::buffer::ColorBuffer;
use crate::geometry::Size;
use crate::interaction::PointerEvent;

/// Handler installed on a window; invoked by the backend for every pointer
/// event delivered to it.
pub type EventCallback = Arc<dyn Fn(PointerEvent) + Send + Sync>;

/// Named native windows. Implementations must not invoke an event callback
/// while the session is inside one of these methods.
pub trait WindowBackend: Send + 'static {
    /// Open the window if needed (also re-opening a user-closed one) and set
    /// its size.
    fn create_or_resize(&mut self, name: &str, size: Size);

    fn destroy(&mut self, name: &str);

    /// Show `image` in the window.
    fn blit(&mut self, name: &str, image: &ColorBuffer);

    fn set_event_callback(&mut self, name: &str, callback: EventCallback);

    /// False for unknown windows and for windows the user has closed.
    fn is_visible(&self, name: &str) -> bool;

    /// Current size of the window's drawable area, if it is open.
    fn display_size(&self, name: &str) -> Option<Size>;
}

#[derive(Default)]
struct MemoryWindow {
    size: Size,
    visible: bool,
    frame: Option<ColorBuffer>,
    blits: usize,
    callback: Option<EventCallback>,
}

/// Headless backend recording every call.
#[derive(Default)]
pub struct MemoryBackend {
    windows: BTreeMap<String, MemoryWindow>,
    created: Vec<String>,
    destroyed: Vec<String>,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Names of every window currently known, open or user-closed.
    pub fn window_names(&self) -> Vec<String> {
        self.windows.keys().cloned().collect()
    }

    /// Windows in the order they were first opened (or re-opened).
    pub fn created(&self) -> &[String] {
        &self.created
    }

    /// Windows in the order they were destroyed.
    pub fn destroyed(&self) -> &[String] {
        &self.destroyed
    }

    /// Last image shown in `name`.
    pub fn frame(&self, name: &str) -> Option<&ColorBuffer> {
        self.windows.get(name).and_then(|w| w.frame.as_ref())
    }

    pub fn blit_count(&self, name: &str) -> usize {
        self.windows.get(name).map_or(0, |w| w.blits)
    }

    /// Installed handler, for delivering events from a test. Call it after
    /// releasing any borrow of the backend.
    pub fn callback(&self, name: &str) -> Option<EventCallback> {
        self.windows.get(name).and_then(|w| w.callback.clone())
    }

    /// Simulate the user closing the window.
    pub fn close_by_user(&mut self, name: &str) {
        if let Some(w) = self.windows.get_mut(name) {
            w.visible = false;
        }
    }

    /// Simulate the user resizing the window.
    pub fn resize_by_user(&mut self, name: &str, size: Size) {
        if let Some(w) = self.windows.get_mut(name) {
            w.size = size;
        }
    }
}

impl WindowBackend for MemoryBackend {
    fn create_or_resize(&mut self, name: &str, size: Size) {
        let window = self.windows.entry(name.to_string()).or_default();
        if !window.visible {
            window.visible = true;
            self.created.push(name.to_string());
        }
        window.size = size;
    }

    fn destroy(&mut self, name: &str) {
        if self.windows.remove(name).is_some() {
            self.destroyed.push(name.to_string());
        }
    }

    fn blit(&mut self, name: &str, image: &ColorBuffer) {
        if let Some(w) = self.windows.get_mut(name) {
            w.frame = Some(image.clone());
            w.blits += 1;
        }
    }

    fn set_event_callback(&mut self, name: &str, callback: EventCallback) {
        if let Some(w) = self.windows.get_mut(name) {
            w.callback = Some(callback);
        }
    }

    fn is_visible(&self, name: &str) -> bool {
        self.windows.get(name).is_some_and(|w| w.visible)
    }

    fn display_size(&self, name: &str) -> Option<Size> {
        self.windows
            .get(name)
            .filter(|w| w.visible)
            .map(|w| w.size)
    }
}

impl std::fmt::Debug for MemoryBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MemoryBackend")
            .field("windows", &self.windows.keys().collect::<Vec<_>>())
            .field("destroyed", &self.destroyed)
            .finish()
    }
}

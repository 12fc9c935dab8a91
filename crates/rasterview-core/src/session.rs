//! Registry of named windows and the per-frame refresh pass.
//!
//! Callers push content with [`ViewerSession::update`] for any subset of
//! windows and then call [`ViewerSession::refresh`] once per tick. Windows
//! not updated since the previous refresh are closed.

use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};

use tracing::{debug, info};

use crate::backend::{EventCallback, WindowBackend};
use crate::buffer::{ColorBuffer, ElementType, NumericBuffer};
use crate::cache::{CacheSeed, DisplayCache};
use crate::config::{RenderContext, ViewerConfig};
use crate::consts::MAX_WINDOW_SIDE;
use crate::error::{Result, ViewerError};
use crate::geometry::Size;
use crate::interaction::{self, PointerEvent};
use crate::overlay::Annotation;

#[derive(Default)]
struct Registry {
    caches: HashMap<String, DisplayCache>,
    frame: u64,
    /// Every name that has had a native window, used to tell "never opened"
    /// apart from "closed by the user".
    shown: HashSet<String>,
}

struct SessionCore<B: WindowBackend> {
    registry: Mutex<Registry>,
    backend: Mutex<B>,
    ctx: RenderContext,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

impl<B: WindowBackend> SessionCore<B> {
    /// Lock order is always registry, then backend.
    fn handle_pointer(&self, name: &str, event: PointerEvent) {
        let mut registry = lock(&self.registry);
        let Some(cache) = registry.caches.get_mut(name) else {
            return;
        };
        interaction::apply(cache, event);

        let mut backend = lock(&self.backend);
        if let Some(size) = backend.display_size(name) {
            cache.set_window_size(size);
        }
        let pos = event.position();
        for (other, cache) in registry.caches.iter_mut() {
            if !backend.is_visible(other) {
                continue;
            }
            let target = other == name;
            let location = target.then_some(pos);
            let moved = cache.tooltip_location() != location;
            if moved {
                cache.set_tooltip(location);
            }
            // The target may have re-rendered for the event itself.
            if moved || target {
                backend.blit(other, cache.tooltip_buffer());
            }
        }
    }
}

impl<B: WindowBackend> Drop for SessionCore<B> {
    fn drop(&mut self) {
        let registry = self.registry.get_mut().unwrap_or_else(PoisonError::into_inner);
        let backend = self.backend.get_mut().unwrap_or_else(PoisonError::into_inner);
        for name in registry.caches.keys() {
            backend.destroy(name);
        }
        registry.caches.clear();
    }
}

/// Shared handle to a set of named viewer windows.
pub struct ViewerSession<B: WindowBackend> {
    core: Arc<SessionCore<B>>,
}

impl<B: WindowBackend> ViewerSession<B> {
    pub fn new(backend: B, config: ViewerConfig) -> Result<Self> {
        let ctx = RenderContext::new(config)?;
        info!(workers = ctx.workers(), "Viewer session started");
        Ok(Self {
            core: Arc::new(SessionCore {
                registry: Mutex::new(Registry::default()),
                backend: Mutex::new(backend),
                ctx,
            }),
        })
    }

    pub fn context(&self) -> &RenderContext {
        &self.core.ctx
    }

    /// Push new content for `name`. A raw buffer of `None` stands in as a
    /// zero-filled single-channel u8 buffer. When the source size matches
    /// the previous content, the view (center, scale, window size as
    /// currently displayed, minimap, drag) carries over and `window_size` is
    /// ignored.
    pub fn update(
        &self,
        name: &str,
        window_size: Size,
        color: ColorBuffer,
        raw: Option<NumericBuffer>,
        annotations: Vec<Annotation>,
    ) -> Result<()> {
        let raw = raw.unwrap_or_else(|| NumericBuffer::zeros(color.size(), 1, ElementType::U8));
        let mut registry = lock(&self.core.registry);
        let frame = registry.frame;

        let seed = match registry.caches.get(name) {
            Some(prev) if prev.source_size() == color.size() => {
                let mut seed = prev.seed();
                let displayed = lock(&self.core.backend).display_size(name);
                if let Some(size) = displayed.filter(|s| s.is_valid_window(MAX_WINDOW_SIDE)) {
                    seed.view.window_size = size;
                }
                debug!(window = name, scale = seed.view.scale, "Carrying view state forward");
                seed
            }
            prev => {
                debug!(
                    window = name,
                    source = ?color.size(),
                    replaced = prev.is_some(),
                    "Creating display cache"
                );
                CacheSeed::full_view(color.size(), window_size)
            }
        };

        let cache = DisplayCache::new(
            name,
            color,
            raw,
            annotations,
            seed,
            frame,
            self.core.ctx.clone(),
        )?;
        registry.caches.insert(name.to_string(), cache);
        Ok(())
    }

    /// [`update`](Self::update) with the window sized to the source.
    pub fn update_native(
        &self,
        name: &str,
        color: ColorBuffer,
        raw: Option<NumericBuffer>,
        annotations: Vec<Annotation>,
    ) -> Result<()> {
        let size = color.size();
        self.update(name, size, color, raw, annotations)
    }

    /// [`update`](Self::update) with the window sized to the source times
    /// `factor`. The factor must be finite and positive.
    pub fn update_scaled(
        &self,
        name: &str,
        factor: f32,
        color: ColorBuffer,
        raw: Option<NumericBuffer>,
        annotations: Vec<Annotation>,
    ) -> Result<()> {
        let size = color.size().scaled(factor);
        if !(factor.is_finite() && factor > 0.0) || !size.is_valid_window(MAX_WINDOW_SIDE) {
            return Err(ViewerError::InvalidWindowSize {
                width: size.width,
                height: size.height,
            });
        }
        self.update(name, size, color, raw, annotations)
    }

    /// Show every window updated this frame, close the rest, and advance the
    /// frame counter. User-closed windows stay closed unless `reopen_closed`.
    pub fn refresh(&self, reopen_closed: bool) {
        let mut registry = lock(&self.core.registry);
        let mut backend = lock(&self.core.backend);
        let frame = registry.frame;
        let Registry { caches, shown, .. } = &mut *registry;

        caches.retain(|name, cache| {
            let user_closed = shown.contains(name) && !backend.is_visible(name);
            if cache.generation() == frame {
                if reopen_closed || !user_closed {
                    if shown.insert(name.clone()) {
                        info!(window = %name, size = ?cache.view().window_size, "Opening window");
                    }
                    backend.create_or_resize(name, cache.view().window_size);
                    backend.blit(name, cache.tooltip_buffer());
                    backend.set_event_callback(name, self.callback_for(name));
                }
                true
            } else {
                if reopen_closed || !user_closed {
                    shown.remove(name);
                }
                info!(window = %name, generation = cache.generation(), "Closing stale window");
                backend.destroy(name);
                false
            }
        });
        registry.frame += 1;
    }

    fn callback_for(&self, name: &str) -> EventCallback {
        let core: Weak<SessionCore<B>> = Arc::downgrade(&self.core);
        let name = name.to_string();
        Arc::new(move |event| {
            if let Some(core) = core.upgrade() {
                core.handle_pointer(&name, event);
            }
        })
    }

    /// Deliver a pointer event to `name` as its installed callback would.
    pub fn handle_pointer(&self, name: &str, event: PointerEvent) {
        self.core.handle_pointer(name, event);
    }

    /// True when the window was shown once and the user has since closed it.
    pub fn is_closed(&self, name: &str) -> bool {
        let registry = lock(&self.core.registry);
        let backend = lock(&self.core.backend);
        registry.shown.contains(name) && !backend.is_visible(name)
    }

    pub fn list_visible(&self) -> Vec<String> {
        let registry = lock(&self.core.registry);
        let backend = lock(&self.core.backend);
        let mut names: Vec<String> = registry
            .caches
            .keys()
            .filter(|name| backend.is_visible(name))
            .cloned()
            .collect();
        names.sort();
        names
    }

    pub fn destroy(&self, name: &str) {
        let mut registry = lock(&self.core.registry);
        let mut backend = lock(&self.core.backend);
        registry.caches.remove(name);
        registry.shown.remove(name);
        backend.destroy(name);
    }

    pub fn destroy_all(&self) {
        let mut registry = lock(&self.core.registry);
        let mut backend = lock(&self.core.backend);
        for name in registry.caches.keys() {
            backend.destroy(name);
        }
        info!(windows = registry.caches.len(), "Destroyed all windows");
        registry.caches.clear();
        registry.shown.clear();
    }

    /// Frame counter; advanced by every refresh.
    pub fn frame(&self) -> u64 {
        lock(&self.core.registry).frame
    }

    pub fn contains(&self, name: &str) -> bool {
        lock(&self.core.registry).caches.contains_key(name)
    }

    /// Read access to one window's cache.
    pub fn inspect<R>(&self, name: &str, f: impl FnOnce(&DisplayCache) -> R) -> Option<R> {
        lock(&self.core.registry).caches.get(name).map(f)
    }

    /// Run `f` with the backend locked. `f` must not call back into this
    /// session (including through an event callback): every session method
    /// locks the registry before the backend, and calling one from here would
    /// take them in the opposite order. Callbacks obtained here must be
    /// invoked after `f` returns.
    pub fn with_backend<R>(&self, f: impl FnOnce(&mut B) -> R) -> R {
        f(&mut lock(&self.core.backend))
    }
}

impl<B: WindowBackend> std::fmt::Debug for ViewerSession<B> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let registry = lock(&self.core.registry);
        f.debug_struct("ViewerSession")
            .field("frame", &registry.frame)
            .field("windows", &registry.caches.keys().collect::<Vec<_>>())
            .finish()
    }
}

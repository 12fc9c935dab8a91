//! Window backend drawing each named window as an egui immediate viewport.

use std::collections::BTreeMap;

use rasterview_core::{ColorBuffer, EventCallback, PointF, PointerEvent, Size, WindowBackend};

#[derive(Default)]
struct EguiWindow {
    size: Size,
    display: Option<Size>,
    pending: Option<egui::ColorImage>,
    texture: Option<egui::TextureHandle>,
    callback: Option<EventCallback>,
    open: bool,
}

/// Pointer events collected while drawing, delivered once the backend is
/// no longer borrowed.
pub type PendingEvents = Vec<(EventCallback, PointerEvent)>;

#[derive(Default)]
pub struct EguiBackend {
    windows: BTreeMap<String, EguiWindow>,
}

impl EguiBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Draw every open window and gather the pointer input it received.
    pub fn show(&mut self, ctx: &egui::Context) -> PendingEvents {
        let mut events = PendingEvents::new();
        for (name, window) in self.windows.iter_mut().filter(|(_, w)| w.open) {
            let builder = egui::ViewportBuilder::default()
                .with_title(name.as_str())
                .with_inner_size([window.size.width as f32, window.size.height as f32]);
            ctx.show_viewport_immediate(egui::ViewportId::from_hash_of(name), builder, |ctx, _class| {
                show_window(ctx, name, window, &mut events);
                if ctx.input(|i| i.viewport().close_requested()) {
                    window.open = false;
                }
            });
        }
        events
    }
}

fn show_window(ctx: &egui::Context, name: &str, window: &mut EguiWindow, events: &mut PendingEvents) {
    if let Some(image) = window.pending.take() {
        match &mut window.texture {
            Some(texture) => texture.set(image, egui::TextureOptions::NEAREST),
            None => {
                window.texture = Some(ctx.load_texture(name, image, egui::TextureOptions::NEAREST));
            }
        }
    }

    egui::CentralPanel::default()
        .frame(egui::Frame::NONE.fill(egui::Color32::BLACK))
        .show(ctx, |ui| {
            let rect = ui.max_rect();
            window.display = Some(Size::new(
                rect.width().round() as usize,
                rect.height().round() as usize,
            ));
            let response = ui.allocate_rect(rect, egui::Sense::click_and_drag());

            if let Some(texture) = &window.texture {
                let [w, h] = texture.size();
                let img_rect = egui::Rect::from_min_size(rect.min, egui::vec2(w as f32, h as f32));
                ui.painter().image(
                    texture.id(),
                    img_rect,
                    egui::Rect::from_min_max(egui::pos2(0.0, 0.0), egui::pos2(1.0, 1.0)),
                    egui::Color32::WHITE,
                );
            }

            if let Some(callback) = &window.callback {
                for event in pointer_events(ui, &response, rect) {
                    events.push((callback.clone(), event));
                }
            }
        });
}

/// Translate this frame's egui input into window-pixel pointer events.
fn pointer_events(ui: &egui::Ui, response: &egui::Response, rect: egui::Rect) -> Vec<PointerEvent> {
    let mut out = Vec::new();
    ui.input(|i| {
        let Some(latest) = i.pointer.latest_pos() else {
            return;
        };
        let pos = PointF::new(latest.x - rect.min.x, latest.y - rect.min.y);
        let hovered = response.hovered();

        if hovered && i.pointer.delta() != egui::Vec2::ZERO {
            out.push(PointerEvent::Move { pos });
        }
        if hovered && i.pointer.button_double_clicked(egui::PointerButton::Primary) {
            out.push(PointerEvent::DoubleClick { pos });
        } else if hovered && i.pointer.primary_pressed() {
            out.push(PointerEvent::LeftDown { pos });
        }
        if i.pointer.primary_released() {
            out.push(PointerEvent::LeftUp { pos });
        }
        if hovered && i.pointer.secondary_pressed() {
            out.push(PointerEvent::RightDown { pos });
        }
        let scroll = i.raw_scroll_delta.y;
        if hovered && scroll != 0.0 {
            out.push(PointerEvent::Wheel { pos, delta: scroll });
        }
    });
    out
}

impl WindowBackend for EguiBackend {
    fn create_or_resize(&mut self, name: &str, size: Size) {
        let window = self.windows.entry(name.to_string()).or_default();
        if !window.open {
            window.open = true;
            window.display = None;
        }
        window.size = size;
    }

    fn destroy(&mut self, name: &str) {
        self.windows.remove(name);
    }

    fn blit(&mut self, name: &str, image: &ColorBuffer) {
        if let Some(window) = self.windows.get_mut(name) {
            window.pending = Some(egui::ColorImage::from_rgb(
                [image.width(), image.height()],
                image.as_raw(),
            ));
        }
    }

    fn set_event_callback(&mut self, name: &str, callback: EventCallback) {
        if let Some(window) = self.windows.get_mut(name) {
            window.callback = Some(callback);
        }
    }

    fn is_visible(&self, name: &str) -> bool {
        self.windows.get(name).is_some_and(|w| w.open)
    }

    fn display_size(&self, name: &str) -> Option<Size> {
        self.windows
            .get(name)
            .filter(|w| w.open)
            .and_then(|w| w.display)
            .filter(|s| !s.is_empty())
    }
}

use std::time::{Duration, Instant};

use rasterview_core::ViewerSession;
use tracing::{error, info};

use crate::backend::EguiBackend;
use crate::demo::DemoScene;

pub struct DemoApp {
    session: ViewerSession<EguiBackend>,
    scene: DemoScene,
    reopen: bool,
    interval: Duration,
    started: Instant,
    last_push: Option<Instant>,
}

impl DemoApp {
    pub fn new(session: ViewerSession<EguiBackend>, reopen: bool, fps: u32) -> Self {
        Self {
            session,
            scene: DemoScene::new(),
            reopen,
            interval: Duration::from_secs_f32(1.0 / fps as f32),
            started: Instant::now(),
            last_push: None,
        }
    }

    /// Push new content and run the refresh pass, at most once per interval.
    fn tick(&mut self) {
        let due = self
            .last_push
            .map_or(true, |last| last.elapsed() >= self.interval);
        if !due {
            return;
        }
        self.last_push = Some(Instant::now());
        let t = self.started.elapsed().as_secs_f32();
        if let Err(e) = self.scene.push(&self.session, t) {
            error!("Demo update failed: {e:#}");
        }
        self.session.refresh(self.reopen);
    }
}

impl eframe::App for DemoApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.tick();

        let events = self.session.with_backend(|backend| backend.show(ctx));
        for (callback, event) in events {
            callback(event);
        }

        if !self.reopen && self.scene.finished(&self.session) {
            info!("Demo window closed, exiting");
            ctx.send_viewport_cmd(egui::ViewportCommand::Close);
        }

        egui::CentralPanel::default().show(ctx, |ui| {
            ui.heading("rasterview");
            ui.label("Drag to pan, wheel to zoom, double-click to reset, right-click for the minimap.");
            ui.separator();
            for name in self.session.list_visible() {
                ui.label(name);
            }
        });

        ctx.request_repaint_after(self.interval);
    }
}

impl Drop for DemoApp {
    fn drop(&mut self) {
        self.session.destroy_all();
    }
}

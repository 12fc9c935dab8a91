mod app;
mod backend;
mod demo;

use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use rasterview_core::{ViewerConfig, ViewerSession};
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::backend::EguiBackend;

#[derive(Parser)]
#[command(name = "rasterview-demo", about = "Interactive raster inspector demo")]
#[command(version)]
struct Cli {
    /// Viewer config (TOML); defaults are used when omitted
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Re-open demo windows after the user closes them
    #[arg(long)]
    reopen: bool,

    /// Demo update rate
    #[arg(long, default_value_t = 20)]
    fps: u32,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let config = match &cli.config {
        Some(path) => {
            info!(path = %path.display(), "Loading viewer config");
            ViewerConfig::load(path)?
        }
        None => ViewerConfig::default(),
    };
    let session = ViewerSession::new(EguiBackend::new(), config)?;

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([360.0, 220.0])
            .with_title("rasterview"),
        ..Default::default()
    };

    let fps = cli.fps.max(1);
    let reopen = cli.reopen;
    eframe::run_native(
        "rasterview",
        options,
        Box::new(move |_cc| Ok(Box::new(app::DemoApp::new(session, reopen, fps)))),
    )
    .map_err(|e| anyhow::anyhow!("event loop failed: {e}"))
}

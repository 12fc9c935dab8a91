use std::path::Path;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::consts::{
    DEFAULT_FLOAT_PRECISION, DEFAULT_RENDER_WORKERS, DEFAULT_ZOOM_LADDER, DEFAULT_ZOOM_OUT_LIMIT,
    LEGIBILITY_MARGIN, LUMINANCE_THRESHOLD, MINIMAP_MARGIN, MINIMAP_SIZE, MULTI_LINE_GAP,
    TOOLTIP_CURSOR_OFFSET,
};
use crate::error::{Result, ViewerError};
use crate::geometry::Rgb;
use crate::text::FontSpec;

/// All tunables of the viewer, loadable from TOML.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ViewerConfig {
    #[serde(default)]
    pub render: RenderConfig,
    #[serde(default)]
    pub overlay: OverlayConfig,
    #[serde(default)]
    pub tooltip: TooltipConfig,
    #[serde(default)]
    pub minimap: MinimapConfig,
    #[serde(default)]
    pub zoom: ZoomConfig,
}

impl ViewerConfig {
    pub fn from_toml_str(text: &str) -> Result<Self> {
        toml::from_str(text).map_err(|e| ViewerError::Config(e.to_string()))
    }

    pub fn to_toml_string(&self) -> Result<String> {
        toml::to_string_pretty(self).map_err(|e| ViewerError::Config(e.to_string()))
    }

    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_toml_str(&text)
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    /// Number of row bands (and pool threads) per render pass.
    pub workers: usize,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            workers: DEFAULT_RENDER_WORKERS,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OverlayConfig {
    pub value_font: FontSpec,
    pub grid_color: Rgb,
    pub grid_thickness: u32,
    pub float_precision: usize,
    pub line_gap: usize,
    pub legibility_margin: usize,
    pub luminance_threshold: u32,
}

impl Default for OverlayConfig {
    fn default() -> Self {
        Self {
            value_font: FontSpec::new(1, 1),
            grid_color: [200, 200, 200],
            grid_thickness: 1,
            float_precision: DEFAULT_FLOAT_PRECISION,
            line_gap: MULTI_LINE_GAP,
            legibility_margin: LEGIBILITY_MARGIN,
            luminance_threshold: LUMINANCE_THRESHOLD,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TooltipConfig {
    pub font: FontSpec,
    pub color: Rgb,
    pub cursor_offset: i32,
    /// Weight kept from the underlying pixels inside the box.
    pub background_alpha: f32,
}

impl Default for TooltipConfig {
    fn default() -> Self {
        Self {
            font: FontSpec::new(2, 1),
            color: [255, 255, 255],
            cursor_offset: TOOLTIP_CURSOR_OFFSET,
            background_alpha: 0.5,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MinimapConfig {
    pub size: usize,
    pub margin: usize,
    pub outline_color: Rgb,
    pub outline_thickness: u32,
    pub highlight_color: Rgb,
    /// Weight of the thumbnail in the ROI blend (the highlight gets the rest).
    pub blend: f32,
}

impl Default for MinimapConfig {
    fn default() -> Self {
        Self {
            size: MINIMAP_SIZE,
            margin: MINIMAP_MARGIN,
            outline_color: [255, 255, 255],
            outline_thickness: 2,
            highlight_color: [255, 255, 255],
            blend: 0.5,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ZoomConfig {
    /// Descending visible-width thresholds in source cells.
    pub ladder: Vec<u32>,
    pub zoom_out_limit: f32,
}

impl Default for ZoomConfig {
    fn default() -> Self {
        Self {
            ladder: DEFAULT_ZOOM_LADDER.to_vec(),
            zoom_out_limit: DEFAULT_ZOOM_OUT_LIMIT,
        }
    }
}

/// Config plus the worker pool every render pass fans out on.
#[derive(Clone)]
pub struct RenderContext {
    config: Arc<ViewerConfig>,
    pool: Arc<rayon::ThreadPool>,
}

impl RenderContext {
    pub fn new(config: ViewerConfig) -> Result<Self> {
        let workers = config.render.workers.max(1);
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(workers)
            .thread_name(|i| format!("rasterview-render-{i}"))
            .build()?;
        Ok(Self {
            config: Arc::new(config),
            pool: Arc::new(pool),
        })
    }

    pub fn config(&self) -> &ViewerConfig {
        &self.config
    }

    pub fn pool(&self) -> &rayon::ThreadPool {
        &self.pool
    }

    pub fn workers(&self) -> usize {
        self.config.render.workers.max(1)
    }
}

impl std::fmt::Debug for RenderContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RenderContext")
            .field("workers", &self.workers())
            .finish_non_exhaustive()
    }
}

/// Bytes per pixel of a color buffer (R, G, B).
pub const COLOR_CHANNELS: usize = 3;

/// Default size of the render worker pool.
pub const DEFAULT_RENDER_WORKERS: usize = 4;

/// Largest accepted window side, in pixels.
pub const MAX_WINDOW_SIDE: usize = 32_768;

/// Visible-width ladder (in source cells) stepped through by the wheel.
pub const DEFAULT_ZOOM_LADDER: [u32; 4] = [100, 34, 12, 2];

/// Zoom-out stops at `max(source width, ladder top) * factor` visible cells.
pub const DEFAULT_ZOOM_OUT_LIMIT: f32 = 4.0;

/// Decimal places for floating-point value text.
pub const DEFAULT_FLOAT_PRECISION: usize = 6;

/// Vertical gap between per-channel lines of a value block.
pub const MULTI_LINE_GAP: usize = 4;

/// Extra room added around the reference legibility block.
pub const LEGIBILITY_MARGIN: usize = 4;

/// Per-channel luminance threshold; cells brighter than this get dark text.
pub const LUMINANCE_THRESHOLD: u32 = 127;

/// Padding below each rendered text line, part of its measured height.
pub const TEXT_LINE_PADDING: usize = 3;

/// Offset of the tooltip box from the cursor, in window pixels.
pub const TOOLTIP_CURSOR_OFFSET: i32 = 2;

/// Long side of the minimap thumbnail.
pub const MINIMAP_SIZE: usize = 200;

/// Distance of the minimap from the top-right window corner.
pub const MINIMAP_MARGIN: usize = 10;

/// Balance applied by [`crate::colorize::gray_u16`] when none is given.
pub const DEFAULT_GRAY_U16_BALANCE: i16 = 400;

/// Default pseudo range for [`crate::colorize::dist_u16`].
pub const DEFAULT_DIST_U16_RANGE: (u16, u16) = (0, 4000);

/// Minimum pixel count (h*w) to use row-level Rayon parallelism in colorizers.
pub const PARALLEL_PIXEL_THRESHOLD: usize = 65_536;

pub mod backend;
pub mod blit;
pub mod buffer;
pub mod cache;
pub mod colorize;
pub mod config;
pub mod consts;
pub mod draw;
pub mod error;
pub mod geometry;
pub mod interaction;
pub mod minimap;
pub mod overlay;
pub mod session;
pub mod text;
pub mod tooltip;
pub mod transform;

pub use backend::{EventCallback, MemoryBackend, WindowBackend};
pub use buffer::{ColorBuffer, Element, ElementType, NumericBuffer};
pub use cache::{CacheSeed, DisplayCache, DragState, ViewState};
pub use config::{RenderContext, ViewerConfig};
pub use error::{Result, ViewerError};
pub use geometry::{PointF, Rect, Rgb, Size};
pub use interaction::PointerEvent;
pub use overlay::Annotation;
pub use session::ViewerSession;
pub use text::FontSpec;

use thiserror::Error;

use crate::buffer::ElementType;
use crate::geometry::Size;

#[derive(Error, Debug)]
pub enum ViewerError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Color buffer must have 3 u8 channels, got {0}")]
    ColorChannels(usize),

    #[error("Numeric buffer is {raw:?} but color buffer is {color:?}")]
    DimensionMismatch { raw: Size, color: Size },

    #[error("Element type mismatch: buffer holds {actual:?}, requested {requested:?}")]
    ElementTypeMismatch {
        actual: ElementType,
        requested: ElementType,
    },

    #[error("Empty buffer: {width}x{height}")]
    EmptyBuffer { width: usize, height: usize },

    #[error("Invalid window size: {width}x{height}")]
    InvalidWindowSize { width: usize, height: usize },

    #[error("Operation requires a single-channel buffer, got {0} channels")]
    UnsupportedChannels(usize),

    #[error("Raw data length {len} does not fit shape {shape:?}")]
    Shape { len: usize, shape: [usize; 3] },

    #[error("Worker pool error: {0}")]
    WorkerPool(#[from] rayon::ThreadPoolBuildError),

    #[error("Config error: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, ViewerError>;

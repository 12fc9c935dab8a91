use ndarray::{Array2, Array3, ArrayView3, Axis};
use num_traits::{NumCast, ToPrimitive, Zero};
use serde::{Deserialize, Serialize};

use crate::consts::COLOR_CHANNELS;
use crate::draw::Canvas;
use crate::error::{Result, ViewerError};
use crate::geometry::{Rgb, Size};

/// Element type tag of a [`NumericBuffer`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ElementType {
    U8,
    I8,
    U16,
    I16,
    I32,
    F32,
    F64,
}

impl ElementType {
    pub fn is_float(self) -> bool {
        matches!(self, ElementType::F32 | ElementType::F64)
    }
}

impl std::fmt::Display for ElementType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            ElementType::U8 => "u8",
            ElementType::I8 => "i8",
            ElementType::U16 => "u16",
            ElementType::I16 => "i16",
            ElementType::I32 => "i32",
            ElementType::F32 => "f32",
            ElementType::F64 => "f64",
        };
        f.write_str(name)
    }
}

/// Scalar types a [`NumericBuffer`] can hold.
pub trait Element:
    Copy + Send + Sync + Zero + NumCast + ToPrimitive + PartialOrd + std::fmt::Display + 'static
{
    const TYPE: ElementType;

    fn wrap(data: Array3<Self>) -> NumericBuffer;

    fn view(buffer: &NumericBuffer) -> Option<ArrayView3<'_, Self>>;

    /// Text shown for a single value in overlays and tooltips.
    fn format(self, precision: usize) -> String {
        if Self::TYPE.is_float() {
            format!("{:.*}", precision, self.to_f64().unwrap_or(f64::NAN))
        } else {
            self.to_string()
        }
    }
}

macro_rules! impl_element {
    ($t:ty, $variant:ident) => {
        impl Element for $t {
            const TYPE: ElementType = ElementType::$variant;

            fn wrap(data: Array3<Self>) -> NumericBuffer {
                NumericBuffer::$variant(data)
            }

            fn view(buffer: &NumericBuffer) -> Option<ArrayView3<'_, Self>> {
                match buffer {
                    NumericBuffer::$variant(a) => Some(a.view()),
                    _ => None,
                }
            }
        }
    };
}

impl_element!(u8, U8);
impl_element!(i8, I8);
impl_element!(u16, U16);
impl_element!(i16, I16);
impl_element!(i32, I32);
impl_element!(f32, F32);
impl_element!(f64, F64);

/// Source-of-truth raster: shape = (height, width, channels), row-major.
#[derive(Clone, Debug, PartialEq)]
pub enum NumericBuffer {
    U8(Array3<u8>),
    I8(Array3<i8>),
    U16(Array3<u16>),
    I16(Array3<i16>),
    I32(Array3<i32>),
    F32(Array3<f32>),
    F64(Array3<f64>),
}

macro_rules! with_array {
    ($buf:expr, $a:ident => $body:expr) => {
        match $buf {
            NumericBuffer::U8($a) => $body,
            NumericBuffer::I8($a) => $body,
            NumericBuffer::U16($a) => $body,
            NumericBuffer::I16($a) => $body,
            NumericBuffer::I32($a) => $body,
            NumericBuffer::F32($a) => $body,
            NumericBuffer::F64($a) => $body,
        }
    };
}

fn cast_or_zero<T: Element>(v: f64) -> T {
    <T as NumCast>::from(v).unwrap_or_else(T::zero)
}

fn filled_array<T: Element>(size: Size, channels: usize, fill: f64) -> NumericBuffer {
    T::wrap(Array3::from_elem(
        (size.height, size.width, channels),
        cast_or_zero::<T>(fill),
    ))
}

impl NumericBuffer {
    pub fn from_array<T: Element>(data: Array3<T>) -> Self {
        T::wrap(data)
    }

    /// Wrap a single-channel plane.
    pub fn from_plane<T: Element>(data: Array2<T>) -> Self {
        T::wrap(data.insert_axis(Axis(2)))
    }

    /// Build from row-major interleaved values.
    pub fn from_vec<T: Element>(size: Size, channels: usize, values: Vec<T>) -> Result<Self> {
        let shape = [size.height, size.width, channels];
        let len = values.len();
        let data = Array3::from_shape_vec((size.height, size.width, channels), values)
            .map_err(|_| ViewerError::Shape { len, shape })?;
        Ok(T::wrap(data))
    }

    pub fn zeros(size: Size, channels: usize, ty: ElementType) -> Self {
        Self::filled(size, channels, ty, 0.0)
    }

    /// Create a buffer of the given type with every element set to `fill`
    /// (saturating to zero when `fill` is not representable).
    pub fn filled(size: Size, channels: usize, ty: ElementType, fill: f64) -> Self {
        match ty {
            ElementType::U8 => filled_array::<u8>(size, channels, fill),
            ElementType::I8 => filled_array::<i8>(size, channels, fill),
            ElementType::U16 => filled_array::<u16>(size, channels, fill),
            ElementType::I16 => filled_array::<i16>(size, channels, fill),
            ElementType::I32 => filled_array::<i32>(size, channels, fill),
            ElementType::F32 => filled_array::<f32>(size, channels, fill),
            ElementType::F64 => filled_array::<f64>(size, channels, fill),
        }
    }

    /// Single-channel buffer where element `i` (row-major) is `start + step * i`.
    pub fn ramp<T: Element>(size: Size, start: f64, step: f64) -> Self {
        let data = Array2::from_shape_fn((size.height, size.width), |(row, col)| {
            cast_or_zero::<T>(start + step * (row * size.width + col) as f64)
        });
        Self::from_plane(data)
    }

    pub fn element_type(&self) -> ElementType {
        match self {
            NumericBuffer::U8(_) => ElementType::U8,
            NumericBuffer::I8(_) => ElementType::I8,
            NumericBuffer::U16(_) => ElementType::U16,
            NumericBuffer::I16(_) => ElementType::I16,
            NumericBuffer::I32(_) => ElementType::I32,
            NumericBuffer::F32(_) => ElementType::F32,
            NumericBuffer::F64(_) => ElementType::F64,
        }
    }

    pub fn size(&self) -> Size {
        let (h, w, _) = with_array!(self, a => a.dim());
        Size::new(w, h)
    }

    pub fn channels(&self) -> usize {
        with_array!(self, a => a.dim().2)
    }

    /// Typed view with a runtime element-type check.
    pub fn typed<T: Element>(&self) -> Result<ArrayView3<'_, T>> {
        T::view(self).ok_or(ViewerError::ElementTypeMismatch {
            actual: self.element_type(),
            requested: T::TYPE,
        })
    }

    pub fn value(&self, x: usize, y: usize, channel: usize) -> f64 {
        with_array!(self, a => a[[y, x, channel]].to_f64().unwrap_or(f64::NAN))
    }

    /// Global minimum and maximum over every channel, ignoring NaN.
    pub fn min_max(&self) -> Option<(f64, f64)> {
        with_array!(self, a => a.iter().fold(None, |acc: Option<(f64, f64)>, v| {
            let v = v.to_f64().unwrap_or(f64::NAN);
            if v.is_nan() {
                return acc;
            }
            Some(match acc {
                Some((lo, hi)) => (lo.min(v), hi.max(v)),
                None => (v, v),
            })
        }))
    }

    /// One formatted value per channel at cell `(x, y)`.
    pub fn cell_text(&self, x: usize, y: usize, precision: usize) -> Vec<String> {
        with_array!(self, a => (0..a.dim().2)
            .map(|c| a[[y, x, c]].format(precision))
            .collect())
    }

    /// Format an arbitrary value the way this buffer's element type is shown.
    pub fn format_scalar(&self, value: f64, precision: usize) -> String {
        if self.element_type().is_float() {
            format!("{:.*}", precision, value)
        } else {
            (value as i64).to_string()
        }
    }
}

/// RGB8 raster, row-major, 3 bytes per pixel.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ColorBuffer {
    size: Size,
    pixels: Vec<u8>,
}

impl ColorBuffer {
    /// Black buffer.
    pub fn new(size: Size) -> Self {
        Self {
            size,
            pixels: vec![0; size.area() * COLOR_CHANNELS],
        }
    }

    pub fn filled(size: Size, color: Rgb) -> Self {
        let mut buf = Self::new(size);
        buf.fill(color);
        buf
    }

    /// Accepts shape (height, width, 3) only.
    pub fn from_array(data: &Array3<u8>) -> Result<Self> {
        let (h, w, c) = data.dim();
        if c != COLOR_CHANNELS {
            return Err(ViewerError::ColorChannels(c));
        }
        Ok(Self {
            size: Size::new(w, h),
            pixels: data.iter().copied().collect(),
        })
    }

    pub fn from_raw(size: Size, pixels: Vec<u8>) -> Result<Self> {
        if pixels.len() != size.area() * COLOR_CHANNELS {
            return Err(ViewerError::Shape {
                len: pixels.len(),
                shape: [size.height, size.width, COLOR_CHANNELS],
            });
        }
        Ok(Self { size, pixels })
    }

    /// Replicate an 8-bit plane into all three channels.
    pub fn from_gray(data: &Array2<u8>) -> Self {
        let (h, w) = data.dim();
        let pixels = data.iter().flat_map(|&v| [v, v, v]).collect();
        Self {
            size: Size::new(w, h),
            pixels,
        }
    }

    pub fn size(&self) -> Size {
        self.size
    }

    pub fn width(&self) -> usize {
        self.size.width
    }

    pub fn height(&self) -> usize {
        self.size.height
    }

    pub fn as_raw(&self) -> &[u8] {
        &self.pixels
    }

    pub fn as_raw_mut(&mut self) -> &mut [u8] {
        &mut self.pixels
    }

    pub fn into_raw(self) -> Vec<u8> {
        self.pixels
    }

    pub fn to_array(&self) -> Array3<u8> {
        Array3::from_shape_fn((self.size.height, self.size.width, COLOR_CHANNELS), |(y, x, c)| {
            self.pixels[(y * self.size.width + x) * COLOR_CHANNELS + c]
        })
    }

    pub fn pixel(&self, x: usize, y: usize) -> Rgb {
        let i = (y * self.size.width + x) * COLOR_CHANNELS;
        [self.pixels[i], self.pixels[i + 1], self.pixels[i + 2]]
    }

    pub fn set_pixel(&mut self, x: usize, y: usize, color: Rgb) {
        let i = (y * self.size.width + x) * COLOR_CHANNELS;
        self.pixels[i..i + COLOR_CHANNELS].copy_from_slice(&color);
    }

    pub fn row(&self, y: usize) -> &[u8] {
        let stride = self.size.width * COLOR_CHANNELS;
        &self.pixels[y * stride..(y + 1) * stride]
    }

    pub fn fill(&mut self, color: Rgb) {
        for px in self.pixels.chunks_exact_mut(COLOR_CHANNELS) {
            px.copy_from_slice(&color);
        }
    }

    pub fn clear(&mut self) {
        self.pixels.fill(0);
    }

    /// Drawing surface covering the whole buffer.
    pub fn canvas(&mut self) -> Canvas<'_> {
        Canvas::new(&mut self.pixels, self.size.width, 0, self.size.height)
    }
}

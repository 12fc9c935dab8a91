//! Turning numeric buffers into color buffers for display, and tiling
//! several buffers into one.

use ndarray::{s, Array3};
use rayon::prelude::*;

use crate::buffer::{ColorBuffer, Element, ElementType, NumericBuffer};
use crate::consts::{COLOR_CHANNELS, PARALLEL_PIXEL_THRESHOLD};
use crate::error::{Result, ViewerError};
use crate::geometry::{Rect, Rgb, Size};

fn require_single_channel(buf: &NumericBuffer) -> Result<()> {
    match buf.channels() {
        1 => Ok(()),
        c => Err(ViewerError::UnsupportedChannels(c)),
    }
}

/// Map every element through `f` into an RGB pixel, in parallel for large
/// buffers.
fn map_pixels<T: Element>(buf: &NumericBuffer, f: impl Fn(T) -> Rgb + Sync) -> Result<ColorBuffer> {
    let view = buf.typed::<T>()?;
    let size = buf.size();
    let plane = view.slice(s![.., .., 0]);
    let mut out = ColorBuffer::new(size);
    let stride = size.width * COLOR_CHANNELS;
    if stride == 0 {
        return Ok(out);
    }
    let fill_row = |(y, row): (usize, &mut [u8])| {
        for (x, px) in row.chunks_exact_mut(COLOR_CHANNELS).enumerate() {
            px.copy_from_slice(&f(plane[[y, x]]));
        }
    };
    if size.area() >= PARALLEL_PIXEL_THRESHOLD {
        out.as_raw_mut()
            .par_chunks_mut(stride)
            .enumerate()
            .for_each(fill_row);
    } else {
        out.as_raw_mut().chunks_mut(stride).enumerate().for_each(fill_row);
    }
    Ok(out)
}

/// Min-max stretch of a single-channel buffer into 0..=255.
fn stretched(buf: &NumericBuffer) -> Result<Vec<u8>> {
    require_single_channel(buf)?;
    let size = buf.size();
    let (lo, hi) = buf.min_max().unwrap_or((0.0, 0.0));
    let range = hi - lo;
    let mut out = Vec::with_capacity(size.area());
    for y in 0..size.height {
        for x in 0..size.width {
            let v = buf.value(x, y, 0);
            let level = if range > 0.0 && !v.is_nan() {
                ((v - lo) / range * 255.0).round()
            } else {
                0.0
            };
            out.push(level.clamp(0.0, 255.0) as u8);
        }
    }
    Ok(out)
}

/// Grayscale with a min-max stretch. u8 buffers are shown as-is.
pub fn gray(buf: &NumericBuffer) -> Result<ColorBuffer> {
    require_single_channel(buf)?;
    let levels: Vec<u8> = match buf.element_type() {
        ElementType::U8 => buf.typed::<u8>()?.iter().copied().collect(),
        _ => stretched(buf)?,
    };
    ColorBuffer::from_raw(buf.size(), levels.iter().flat_map(|&v| [v, v, v]).collect())
}

/// JET colormap of a min-max stretched buffer. u8 buffers are not stretched.
pub fn jet(buf: &NumericBuffer) -> Result<ColorBuffer> {
    require_single_channel(buf)?;
    let levels: Vec<u8> = match buf.element_type() {
        ElementType::U8 => buf.typed::<u8>()?.iter().copied().collect(),
        _ => stretched(buf)?,
    };
    ColorBuffer::from_raw(buf.size(), levels.iter().flat_map(|&v| jet_color(v)).collect())
}

/// JET colormap entry: dark blue at 0 through cyan, yellow to dark red at 255.
pub fn jet_color(level: u8) -> Rgb {
    let t = level as f32 / 255.0;
    let channel = |offset: f32| ((1.5 - (4.0 * t - offset).abs()).clamp(0.0, 1.0) * 255.0).round() as u8;
    [channel(3.0), channel(2.0), channel(1.0)]
}

/// Mean-balanced grayscale for 16-bit intensity data. `balance` in
/// `[-1024, 1024]` goes from darkest to brightest; values at or above twice
/// the balanced mean saturate to white.
pub fn gray_u16(buf: &NumericBuffer, balance: i16) -> Result<ColorBuffer> {
    require_single_channel(buf)?;
    let view = buf.typed::<u16>()?;
    let count = view.len().max(1) as f64;
    let mean = (view.iter().map(|&v| v as f64).sum::<f64>() / count) as i32;
    let v_balance = balance as i32 - 640;
    let v_mean: u32 = if mean <= v_balance {
        1
    } else {
        (mean - v_balance) as u32
    };
    let twice = v_mean * 2;
    map_pixels::<u16>(buf, |v| {
        let level = if (v as u32) < twice {
            (128 * v as u32 / v_mean).min(255) as u8
        } else {
            255
        };
        [level; 3]
    })
}

/// Distance-to-color lookup for 16-bit range data. Values strictly inside
/// `(min, max)` get a JET color (near = red when `max >= min`, reversed
/// otherwise); everything else is black.
pub fn dist_u16(buf: &NumericBuffer, pseudo_min: u16, pseudo_max: u16) -> Result<ColorBuffer> {
    require_single_channel(buf)?;
    let reversed = pseudo_max < pseudo_min;
    let table: Vec<Rgb> = (0..=255u8)
        .map(|i| jet_color(if reversed { i } else { 255 - i }))
        .collect();
    let lo = pseudo_min.min(pseudo_max) as u32;
    let hi = pseudo_min.max(pseudo_max) as u32;
    let diff = (hi - lo).max(1);
    map_pixels::<u16>(buf, |v| {
        let v = v as u32;
        if lo < v && v < hi {
            table[(255 * (v - lo) / diff) as usize]
        } else {
            [0, 0, 0]
        }
    })
}

/// Cell size and per-input placement for a grid of `cols` columns. Each
/// input is scaled (nearest neighbor, aspect kept) to fit the largest
/// input and centered in its cell.
fn grid_layout(sizes: &[Size], cols: usize) -> (Size, Vec<Rect>) {
    let cols = cols.clamp(1, sizes.len().max(1));
    let cell = sizes.iter().fold(Size::default(), |acc, s| {
        Size::new(acc.width.max(s.width), acc.height.max(s.height))
    });
    let rows = sizes.len().div_ceil(cols);
    let total = Size::new(cell.width * cols, cell.height * rows);
    let placements = sizes
        .iter()
        .enumerate()
        .map(|(i, s)| {
            if s.is_empty() {
                return Rect::default();
            }
            let f = (cell.width as f64 / s.width as f64).min(cell.height as f64 / s.height as f64);
            let w = ((s.width as f64 * f).round() as usize).min(cell.width);
            let h = ((s.height as f64 * f).round() as usize).min(cell.height);
            let x = (i % cols) * cell.width + (cell.width - w) / 2;
            let y = (i / cols) * cell.height + (cell.height - h) / 2;
            Rect::new(x as i32, y as i32, w as i32, h as i32)
        })
        .collect();
    (total, placements)
}

/// Source index for destination index `d` of a `dst`-long axis resampled
/// from a `src`-long one.
fn nearest(d: usize, dst: usize, src: usize) -> usize {
    ((d * src) / dst.max(1)).min(src.saturating_sub(1))
}

/// Tile color buffers row by row into a grid of `cols` columns.
pub fn grid_concat(images: &[ColorBuffer], cols: usize) -> ColorBuffer {
    let sizes: Vec<Size> = images.iter().map(ColorBuffer::size).collect();
    let (total, placements) = grid_layout(&sizes, cols);
    let mut out = ColorBuffer::new(total);
    for (img, place) in images.iter().zip(&placements) {
        let (w, h) = (place.width as usize, place.height as usize);
        for dy in 0..h {
            let sy = nearest(dy, h, img.height());
            for dx in 0..w {
                let sx = nearest(dx, w, img.width());
                out.set_pixel(place.x as usize + dx, place.y as usize + dy, img.pixel(sx, sy));
            }
        }
    }
    out
}

pub fn vconcat(images: &[ColorBuffer]) -> ColorBuffer {
    grid_concat(images, 1)
}

pub fn hconcat(images: &[ColorBuffer]) -> ColorBuffer {
    grid_concat(images, images.len())
}

fn grid_concat_typed<T: Element>(buffers: &[NumericBuffer], cols: usize) -> Result<NumericBuffer> {
    let channels = buffers.first().map_or(1, NumericBuffer::channels);
    if let Some(odd) = buffers.iter().find(|b| b.channels() != channels) {
        return Err(ViewerError::UnsupportedChannels(odd.channels()));
    }
    let sizes: Vec<Size> = buffers.iter().map(NumericBuffer::size).collect();
    let (total, placements) = grid_layout(&sizes, cols);
    let mut out = Array3::<T>::zeros((total.height, total.width, channels));
    for (buf, place) in buffers.iter().zip(&placements) {
        let view = buf.typed::<T>()?;
        let size = buf.size();
        let (w, h) = (place.width as usize, place.height as usize);
        for dy in 0..h {
            let sy = nearest(dy, h, size.height);
            for dx in 0..w {
                let sx = nearest(dx, w, size.width);
                for c in 0..channels {
                    out[[place.y as usize + dy, place.x as usize + dx, c]] = view[[sy, sx, c]];
                }
            }
        }
    }
    Ok(NumericBuffer::from_array(out))
}

/// Tile numeric buffers the same way [`grid_concat`] tiles color buffers,
/// so values line up with their colorized counterpart. All inputs must
/// share element type and channel count.
pub fn grid_concat_numeric(buffers: &[NumericBuffer], cols: usize) -> Result<NumericBuffer> {
    let Some(first) = buffers.first() else {
        return Ok(NumericBuffer::zeros(Size::default(), 1, ElementType::U8));
    };
    match first.element_type() {
        ElementType::U8 => grid_concat_typed::<u8>(buffers, cols),
        ElementType::I8 => grid_concat_typed::<i8>(buffers, cols),
        ElementType::U16 => grid_concat_typed::<u16>(buffers, cols),
        ElementType::I16 => grid_concat_typed::<i16>(buffers, cols),
        ElementType::I32 => grid_concat_typed::<i32>(buffers, cols),
        ElementType::F32 => grid_concat_typed::<f32>(buffers, cols),
        ElementType::F64 => grid_concat_typed::<f64>(buffers, cols),
    }
}

pub fn vconcat_numeric(buffers: &[NumericBuffer]) -> Result<NumericBuffer> {
    grid_concat_numeric(buffers, 1)
}

pub fn hconcat_numeric(buffers: &[NumericBuffer]) -> Result<NumericBuffer> {
    grid_concat_numeric(buffers, buffers.len())
}

//! Nearest-neighbor resampling of a color buffer into a window-sized buffer.
//!
//! Offsets for every window column and row are computed once per render;
//! the covered row range is then split into one band per worker and each
//! band copies its pixels independently.

use std::ops::Range;

use rayon::prelude::*;
use tracing::trace;

use crate::buffer::ColorBuffer;
use crate::consts::COLOR_CHANNELS;
use crate::transform::Roi;

/// Source index per destination index along one axis, restricted to the
/// destination range whose samples fall inside the source.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SampleTable {
    /// Destination indices that map inside `[0, limit)`.
    pub valid: Range<usize>,
    /// Source index for each destination index in `valid` (offset by `valid.start`).
    pub source: Vec<usize>,
}

impl SampleTable {
    /// `source[i] = floor(origin + step * i)` for `i` in `0..count`, clipped
    /// to `[0, limit)`. The mapping is monotonic, so the valid part is a
    /// single contiguous range.
    pub fn build(origin: f32, step: f32, count: usize, limit: usize) -> Self {
        let mut start = 0;
        let mut end = 0;
        let mut source = Vec::new();
        while end < count {
            let idx = (origin + step * end as f32).floor() as i64;
            if idx < 0 {
                start += 1;
            } else if idx >= limit as i64 {
                break;
            } else {
                source.push(idx as usize);
            }
            end += 1;
        }
        Self {
            valid: start..end.max(start),
            source,
        }
    }

    pub fn get(&self, dst: usize) -> Option<usize> {
        if self.valid.contains(&dst) {
            Some(self.source[dst - self.valid.start])
        } else {
            None
        }
    }
}

/// Fill `dst` with `src` sampled over `roi`. Pixels mapping outside the
/// source are left untouched; callers clear `dst` first.
pub fn blit(pool: &rayon::ThreadPool, workers: usize, src: &ColorBuffer, roi: &Roi, dst: &mut ColorBuffer) {
    let (dst_w, dst_h) = (dst.width(), dst.height());
    if dst_w == 0 || dst_h == 0 || src.width() == 0 || src.height() == 0 {
        return;
    }
    let cols = SampleTable::build(roi.x, roi.width / dst_w as f32, dst_w, src.width());
    let rows = SampleTable::build(roi.y, roi.height / dst_h as f32, dst_h, src.height());
    if cols.valid.is_empty() || rows.valid.is_empty() {
        return;
    }

    let stride = dst_w * COLOR_CHANNELS;
    let src_stride = src.width() * COLOR_CHANNELS;
    let band_rows = rows.valid.len().div_ceil(workers.max(1)).max(1);
    let src_raw = src.as_raw();
    let covered = &mut dst.as_raw_mut()[rows.valid.start * stride..rows.valid.end * stride];

    trace!(
        bands = rows.valid.len().div_ceil(band_rows),
        cols = cols.valid.len(),
        rows = rows.valid.len(),
        "Blitting visible region"
    );

    pool.install(|| {
        covered
            .par_chunks_mut(band_rows * stride)
            .enumerate()
            .for_each(|(band, chunk)| {
                let first = band * band_rows;
                for (i, dst_row) in chunk.chunks_exact_mut(stride).enumerate() {
                    let src_row = rows.source[first + i];
                    let src_line = &src_raw[src_row * src_stride..(src_row + 1) * src_stride];
                    let out = &mut dst_row
                        [cols.valid.start * COLOR_CHANNELS..cols.valid.end * COLOR_CHANNELS];
                    for (px, &sx) in out.chunks_exact_mut(COLOR_CHANNELS).zip(&cols.source) {
                        let s = sx * COLOR_CHANNELS;
                        px.copy_from_slice(&src_line[s..s + COLOR_CHANNELS]);
                    }
                }
            });
    });
}

/// Nearest-neighbor resize of an entire buffer.
pub fn resize_nearest(pool: &rayon::ThreadPool, workers: usize, src: &ColorBuffer, dst: &mut ColorBuffer) {
    let roi = Roi {
        x: 0.0,
        y: 0.0,
        width: src.width() as f32,
        height: src.height() as f32,
    };
    blit(pool, workers, src, &roi, dst);
}

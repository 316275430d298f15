//! Local window statistics over square neighborhoods clipped to the image.
//!
//! [`SummedAreaTable`] answers any window in O(1) after one pass over the
//! plane; [`naive_window_stats`] walks the window directly. Both accumulate
//! exact integer sums, so they return identical statistics.

use histothresh_core::Plane;

use crate::ThresholdError;

/// Default side length of the adaptive threshold window.
pub const DEFAULT_WINDOW_SIZE: usize = 15;

/// Validated odd window side length.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct WindowSize(usize);

impl WindowSize {
    pub fn new(size: usize) -> Result<Self, ThresholdError> {
        if size == 0 || size % 2 == 0 {
            return Err(ThresholdError::InvalidWindowSize { size });
        }
        Ok(Self(size))
    }

    #[inline]
    pub fn get(self) -> usize {
        self.0
    }

    /// `floor(size / 2)`.
    #[inline]
    pub fn half(self) -> usize {
        self.0 / 2
    }
}

impl Default for WindowSize {
    fn default() -> Self {
        Self(DEFAULT_WINDOW_SIZE)
    }
}

/// Pixel count, sum and sum of squares of one window.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct WindowStats {
    pub count: u64,
    pub sum: u64,
    pub sum_sq: u64,
}

impl WindowStats {
    /// Mean and population standard deviation.
    ///
    /// Variance uses `(sum_sq - sum * mean) / count`, clamped at zero.
    pub fn mean_std(&self) -> Option<(f64, f64)> {
        if self.count == 0 {
            return None;
        }
        let n = self.count as f64;
        let sum = self.sum as f64;
        let mean = sum / n;
        let variance = ((self.sum_sq as f64 - sum * mean) / n).max(0.0);
        Some((mean, variance.sqrt()))
    }
}

/// Inclusive window bounds `[x0, x1] x [y0, y1]` around `(x, y)`, clipped.
#[inline]
fn window_bounds(
    width: usize,
    height: usize,
    x: usize,
    y: usize,
    half: usize,
) -> (usize, usize, usize, usize) {
    (
        x.saturating_sub(half),
        (x + half).min(width - 1),
        y.saturating_sub(half),
        (y + half).min(height - 1),
    )
}

/// Reference implementation walking every offset in `[-half, half]^2`.
pub fn naive_window_stats(gray: &Plane, x: usize, y: usize, half: usize) -> WindowStats {
    let mut stats = WindowStats::default();
    let half = half as isize;
    for dy in -half..=half {
        for dx in -half..=half {
            if let Some(v) = gray.get_clipped(x as isize + dx, y as isize + dy) {
                let v = v as u64;
                stats.count += 1;
                stats.sum += v;
                stats.sum_sq += v * v;
            }
        }
    }
    stats
}

/// 2D prefix sums of samples and squared samples.
///
/// Stored with one row and column of zero padding, so entry `(x, y)` holds
/// the totals of the rectangle `[0, x) x [0, y)`.
#[derive(Clone, Debug)]
pub struct SummedAreaTable {
    width: usize,
    height: usize,
    sum: Vec<u64>,
    sum_sq: Vec<u64>,
}

impl SummedAreaTable {
    pub fn new(gray: &Plane) -> Self {
        let width = gray.width();
        let height = gray.height();
        let stride = width + 1;
        let mut sum = vec![0u64; stride * (height + 1)];
        let mut sum_sq = vec![0u64; stride * (height + 1)];

        for (y, row) in gray.rows().enumerate() {
            let mut row_sum = 0u64;
            let mut row_sq = 0u64;
            for (x, &v) in row.iter().enumerate() {
                let v = v as u64;
                row_sum += v;
                row_sq += v * v;
                let idx = (y + 1) * stride + x + 1;
                sum[idx] = sum[idx - stride] + row_sum;
                sum_sq[idx] = sum_sq[idx - stride] + row_sq;
            }
        }

        Self {
            width,
            height,
            sum,
            sum_sq,
        }
    }

    #[inline]
    fn rect(table: &[u64], stride: usize, x0: usize, x1: usize, y0: usize, y1: usize) -> u64 {
        // Inclusive pixel bounds map to padded corners (x0, y0) and (x1 + 1, y1 + 1).
        let a = table[y0 * stride + x0];
        let b = table[y0 * stride + x1 + 1];
        let c = table[(y1 + 1) * stride + x0];
        let d = table[(y1 + 1) * stride + x1 + 1];
        d + a - b - c
    }

    /// Statistics of the clipped window of half-width `half` centered on `(x, y)`.
    pub fn window(&self, x: usize, y: usize, half: usize) -> WindowStats {
        if self.width == 0 || self.height == 0 {
            return WindowStats::default();
        }
        let (x0, x1, y0, y1) = window_bounds(self.width, self.height, x, y, half);
        let stride = self.width + 1;
        WindowStats {
            count: ((x1 - x0 + 1) * (y1 - y0 + 1)) as u64,
            sum: Self::rect(&self.sum, stride, x0, x1, y0, y1),
            sum_sq: Self::rect(&self.sum_sq, stride, x0, x1, y0, y1),
        }
    }
}

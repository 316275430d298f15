//! Band thresholds: double threshold and double threshold with hysteresis.

use histothresh_core::{Plane, BACKGROUND, FOREGROUND};

#[cfg(feature = "tracing")]
use tracing::instrument;

use crate::rows::fill_rows;

/// Tri-level label for pixels in `[t_low, t_high)` before propagation.
pub const WEAK: u8 = 128;
/// Tri-level label for pixels at or above `t_high`.
pub const STRONG: u8 = FOREGROUND;

/// `255` where `t_low <= gray <= t_high`, else `0`.
///
/// An inverted band (`t_low > t_high`) selects nothing.
pub fn threshold_double(gray: &Plane, t_low: i32, t_high: i32) -> Plane {
    gray.map(|v| {
        let v = v as i32;
        if t_low <= v && v <= t_high {
            FOREGROUND
        } else {
            BACKGROUND
        }
    })
}

/// First hysteresis pass: label pixels strong (255), weak (128) or background (0).
pub fn classify_hysteresis(gray: &Plane, t_low: i32, t_high: i32) -> Plane {
    gray.map(|v| {
        let v = v as i32;
        if v >= t_high {
            STRONG
        } else if v >= t_low {
            WEAK
        } else {
            BACKGROUND
        }
    })
}

/// Second hysteresis pass over a complete tri-level labeling.
///
/// A weak pixel becomes strong when any of its 8 neighbors (clipped at the
/// border) is strong in `labels`; every other weak pixel becomes background.
/// Decisions read only `labels`, never pixels promoted in this pass, so one
/// call is one propagation step and not a flood fill.
pub fn propagate_hysteresis(labels: &Plane) -> Plane {
    let width = labels.width();
    let mut out = Plane::new(width, labels.height());
    fill_rows(&mut out, |y, row| {
        for (x, dst) in row.iter_mut().enumerate() {
            *dst = match labels.get(x, y) {
                STRONG => STRONG,
                WEAK if has_strong_neighbor(labels, x, y) => STRONG,
                _ => BACKGROUND,
            };
        }
    });
    out
}

fn has_strong_neighbor(labels: &Plane, x: usize, y: usize) -> bool {
    let (x, y) = (x as isize, y as isize);
    (-1..=1).any(|dy| {
        (-1..=1).any(|dx| {
            (dx != 0 || dy != 0) && labels.get_clipped(x + dx, y + dy) == Some(STRONG)
        })
    })
}

/// Double threshold with one hysteresis step; output contains only 0 and 255.
#[cfg_attr(
    feature = "tracing",
    instrument(level = "info", skip(gray), fields(width = gray.width(), height = gray.height()))
)]
pub fn threshold_double_hysteresis(gray: &Plane, t_low: i32, t_high: i32) -> Plane {
    let labels = classify_hysteresis(gray, t_low, t_high);
    propagate_hysteresis(&labels)
}

//! Single-cut thresholds: manual, bimodal valley and Otsu.
//!
//! Global methods map `gray >= t` to foreground.

use histothresh_core::{build_histogram, ChannelHistogram, Plane, BACKGROUND, FOREGROUND};
use log::{debug, warn};
use serde::{Deserialize, Serialize};

#[cfg(feature = "tracing")]
use tracing::instrument;

use crate::ThresholdError;

/// Cut used when the histogram shows fewer than two peaks.
pub const BIMODAL_FALLBACK_THRESHOLD: u8 = 128;

/// `255` where `gray >= t`, else `0`.
///
/// `t <= 0` selects every pixel, `t > 255` none.
pub fn threshold_manual(gray: &Plane, t: i32) -> Plane {
    gray.map(|v| {
        if v as i32 >= t {
            FOREGROUND
        } else {
            BACKGROUND
        }
    })
}

/// Outcome of the bimodal-valley rule.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum BimodalSelection {
    /// Midpoint of the first two peaks in ascending value order.
    Valley {
        first_peak: u8,
        second_peak: u8,
        threshold: u8,
    },
    /// Fewer than two peaks; [`BIMODAL_FALLBACK_THRESHOLD`] is used.
    Fallback { peaks: usize },
}

impl BimodalSelection {
    pub fn threshold(&self) -> u8 {
        match *self {
            BimodalSelection::Valley { threshold, .. } => threshold,
            BimodalSelection::Fallback { .. } => BIMODAL_FALLBACK_THRESHOLD,
        }
    }
}

/// Strict local maxima over bins `1..=254`, ascending.
pub fn histogram_peaks(hist: &ChannelHistogram) -> Vec<u8> {
    hist.bins()
        .windows(3)
        .enumerate()
        .filter(|(_, w)| w[1] > w[0] && w[1] > w[2])
        .map(|(i, _)| (i + 1) as u8)
        .collect()
}

/// Pick the cut halfway between the first two histogram peaks.
///
/// Peaks are taken in index order, not by height, so a small early bump
/// wins over a dominant later mode. That is a known limitation kept for
/// compatibility with existing outputs.
pub fn select_bimodal_valley(hist: &ChannelHistogram) -> BimodalSelection {
    let peaks = histogram_peaks(hist);
    match peaks.as_slice() {
        [first, second, ..] => {
            let threshold = ((*first as u16 + *second as u16) / 2) as u8;
            debug!("bimodal valley: peaks {first} and {second}, threshold {threshold}");
            BimodalSelection::Valley {
                first_peak: *first,
                second_peak: *second,
                threshold,
            }
        }
        _ => {
            warn!(
                "bimodal valley found {} peak(s), falling back to {BIMODAL_FALLBACK_THRESHOLD}",
                peaks.len()
            );
            BimodalSelection::Fallback { peaks: peaks.len() }
        }
    }
}

#[cfg_attr(
    feature = "tracing",
    instrument(level = "info", skip(gray), fields(width = gray.width(), height = gray.height()))
)]
pub fn threshold_bimodal_valley(gray: &Plane) -> Result<Plane, ThresholdError> {
    let hist = build_histogram(gray)?;
    let selection = select_bimodal_valley(&hist);
    Ok(threshold_manual(gray, selection.threshold() as i32))
}

/// Otsu split found by maximizing between-class variance.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct OtsuSelection {
    /// Highest value of the background class, `None` for a single-valued image.
    pub last_background: Option<u8>,
    /// Cut applied with `gray >= threshold`; one above `last_background`.
    pub threshold: u8,
    pub between_class_variance: f64,
}

/// Scan `t = 0..=255`, keeping the first `t` with the largest
/// `wB * wF * (meanB - meanF)^2`.
pub fn select_otsu(hist: &ChannelHistogram) -> OtsuSelection {
    let total = hist.total() as f64;
    let sum_total = hist.weighted_sum() as f64;

    let mut w_b = 0f64;
    let mut sum_b = 0f64;
    let mut best_var = 0f64;
    let mut best_t: Option<u8> = None;

    for (t, &count) in hist.bins().iter().enumerate() {
        let count = count as f64;
        w_b += count;
        if w_b == 0.0 {
            continue;
        }
        let w_f = total - w_b;
        if w_f == 0.0 {
            break;
        }

        sum_b += t as f64 * count;
        let m_b = sum_b / w_b;
        let m_f = (sum_total - sum_b) / w_f;
        let between = w_b * w_f * (m_b - m_f) * (m_b - m_f);
        if between > best_var {
            best_var = between;
            best_t = Some(t as u8);
        }
    }

    // Foreground is non-empty at every accepted `t`, so `t < 255`.
    let threshold = best_t.map_or(0, |t| t.saturating_add(1));
    debug!("otsu: background <= {best_t:?}, threshold {threshold}, variance {best_var:.1}");
    OtsuSelection {
        last_background: best_t,
        threshold,
        between_class_variance: best_var,
    }
}

/// Binarize at the Otsu split.
///
/// Pixels equal to the winning scan value go to background, unlike a literal
/// `threshold_manual(gray, t)`; the cut is [`OtsuSelection::threshold`].
#[cfg_attr(
    feature = "tracing",
    instrument(level = "info", skip(gray), fields(width = gray.width(), height = gray.height()))
)]
pub fn threshold_otsu(gray: &Plane) -> Result<Plane, ThresholdError> {
    let hist = build_histogram(gray)?;
    let selection = select_otsu(&hist);
    Ok(threshold_manual(gray, selection.threshold as i32))
}

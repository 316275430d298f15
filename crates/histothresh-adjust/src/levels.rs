//! Range operations: clamp, normalize, histogram stretch.

use histothresh_core::to_sample;
use log::debug;

/// `v' = min(max(v, low), high)`.
///
/// With `low > high` every sample becomes `high`.
pub(crate) fn clamp_samples(samples: &mut [u8], low: u8, high: u8) {
    for v in samples {
        // `Ord::clamp` panics on inverted bounds.
        *v = (*v).max(low).min(high);
    }
}

/// Linear rescale of the observed `[min, max]` onto `[new_min, new_max]`.
///
/// Returns `false` and leaves the samples untouched for a flat channel.
pub(crate) fn normalize_samples(samples: &mut [u8], new_min: i32, new_max: i32) -> bool {
    let Some((old_min, old_max)) = min_max(samples) else {
        return false;
    };
    if old_min == old_max {
        debug!("flat channel at {old_min}, normalize skipped");
        return false;
    }

    let span = new_max as f64 - new_min as f64;
    let old_span = old_max as f64 - old_min as f64;
    let mut lut = [0u8; 256];
    for (v, out) in lut.iter_mut().enumerate() {
        // Multiply before dividing so exact halves stay exact.
        *out = to_sample((v as f64 - old_min as f64) * span / old_span + new_min as f64);
    }
    for v in samples {
        *v = lut[*v as usize];
    }
    true
}

fn min_max(samples: &[u8]) -> Option<(u8, u8)> {
    let mut iter = samples.iter().copied();
    let first = iter.next()?;
    Some(iter.fold((first, first), |(lo, hi), v| (lo.min(v), hi.max(v))))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clamp_limits_range() {
        let mut s = [0u8, 50, 100, 200, 255];
        clamp_samples(&mut s, 40, 180);
        assert_eq!(s, [40, 50, 100, 180, 180]);
    }

    #[test]
    fn clamp_with_inverted_bounds_collapses_to_high() {
        let mut s = [0u8, 128, 255];
        clamp_samples(&mut s, 200, 100);
        assert_eq!(s, [100, 100, 100]);
    }

    #[test]
    fn normalize_spreads_to_full_range() {
        let mut s = [50u8, 100, 150];
        assert!(normalize_samples(&mut s, 0, 255));
        // (100-50)*255/100 = 127.5 rounds up
        assert_eq!(s, [0, 128, 255]);
    }

    #[test]
    fn normalize_flat_channel_is_noop() {
        let mut s = [77u8; 6];
        assert!(!normalize_samples(&mut s, 0, 255));
        assert_eq!(s, [77; 6]);
    }

    #[test]
    fn normalize_targets_outside_sample_range_saturate() {
        let mut s = [0u8, 255];
        assert!(normalize_samples(&mut s, -100, 400));
        assert_eq!(s, [0, 255]);
    }
}

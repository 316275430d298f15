//! Sliding-window adaptive thresholds: Niblack, Sauvola, Wolf–Jolion.
//!
//! Each pixel is compared against a threshold derived from the mean and
//! population standard deviation of the clipped window around it. Unlike the
//! global methods, the comparison is strict: `gray > t` is foreground.

use histothresh_core::{Plane, BACKGROUND, FOREGROUND};
use log::debug;
use serde::{Deserialize, Serialize};

#[cfg(feature = "tracing")]
use tracing::instrument;

use crate::rows::try_fill_rows;
use crate::window::{SummedAreaTable, WindowSize, DEFAULT_WINDOW_SIZE};
use crate::ThresholdError;

/// Normalizer of the `std` term in the Wolf–Jolion formula.
const WOLF_STD_NORMALIZER: f64 = 128.0;

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NiblackParams {
    /// Odd window side length.
    pub window_size: usize,
    pub k: f64,
}

impl Default for NiblackParams {
    fn default() -> Self {
        Self {
            window_size: DEFAULT_WINDOW_SIZE,
            k: -0.2,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SauvolaParams {
    pub window_size: usize,
    pub k: f64,
    /// Dynamic range of the standard deviation; must be positive.
    pub r: f64,
}

impl Default for SauvolaParams {
    fn default() -> Self {
        Self {
            window_size: DEFAULT_WINDOW_SIZE,
            k: 0.5,
            r: 128.0,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WolfJolionParams {
    pub window_size: usize,
    pub k: f64,
}

impl Default for WolfJolionParams {
    fn default() -> Self {
        Self {
            window_size: DEFAULT_WINDOW_SIZE,
            k: 0.5,
        }
    }
}

fn finite(name: &'static str, value: f64) -> Result<f64, ThresholdError> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(ThresholdError::InvalidParameter { name, value })
    }
}

/// Binarize `gray` with a per-pixel threshold `rule(mean, std)`.
///
/// Window statistics come from a summed-area table, so the cost per pixel
/// does not depend on `window_size`.
pub fn adaptive_threshold<F>(
    gray: &Plane,
    window_size: usize,
    rule: F,
) -> Result<Plane, ThresholdError>
where
    F: Fn(f64, f64) -> f64 + Sync + Send,
{
    let window = WindowSize::new(window_size)?;
    gray.ensure_non_empty()?;

    let half = window.half();
    let table = SummedAreaTable::new(gray);
    let mut out = Plane::new(gray.width(), gray.height());
    try_fill_rows(&mut out, |y, row| {
        for (x, dst) in row.iter_mut().enumerate() {
            let (mean, std) = table
                .window(x, y, half)
                .mean_std()
                .ok_or(ThresholdError::EmptyWindow { x, y })?;
            let t = rule(mean, std);
            *dst = if gray.get(x, y) as f64 > t {
                FOREGROUND
            } else {
                BACKGROUND
            };
        }
        Ok::<(), ThresholdError>(())
    })?;
    Ok(out)
}

/// Niblack: `t = mean + k * std`.
#[cfg_attr(
    feature = "tracing",
    instrument(level = "info", skip(gray), fields(width = gray.width(), height = gray.height()))
)]
pub fn threshold_niblack(gray: &Plane, params: &NiblackParams) -> Result<Plane, ThresholdError> {
    let k = finite("k", params.k)?;
    debug!("niblack: window {} k {k}", params.window_size);
    adaptive_threshold(gray, params.window_size, move |mean, std| mean + k * std)
}

/// Sauvola: `t = mean * (1 + k * (std / r - 1))`.
#[cfg_attr(
    feature = "tracing",
    instrument(level = "info", skip(gray), fields(width = gray.width(), height = gray.height()))
)]
pub fn threshold_sauvola(gray: &Plane, params: &SauvolaParams) -> Result<Plane, ThresholdError> {
    let k = finite("k", params.k)?;
    let r = finite("r", params.r)?;
    if r <= 0.0 {
        return Err(ThresholdError::InvalidParameter { name: "r", value: r });
    }
    debug!("sauvola: window {} k {k} r {r}", params.window_size);
    adaptive_threshold(gray, params.window_size, move |mean, std| {
        mean * (1.0 + k * (std / r - 1.0))
    })
}

/// Wolf–Jolion: `t = (1 - k) * mean + k * min_gray + k * (std / 128 - 1)`,
/// with `min_gray` the darkest sample of the whole image.
#[cfg_attr(
    feature = "tracing",
    instrument(level = "info", skip(gray), fields(width = gray.width(), height = gray.height()))
)]
pub fn threshold_wolf_jolion(
    gray: &Plane,
    params: &WolfJolionParams,
) -> Result<Plane, ThresholdError> {
    let k = finite("k", params.k)?;
    let (min_gray, _) = gray.min_max().ok_or(histothresh_core::ImageError::EmptyImage {
        width: gray.width(),
        height: gray.height(),
    })?;
    let min_gray = min_gray as f64;
    debug!(
        "wolf-jolion: window {} k {k} min gray {min_gray}",
        params.window_size
    );
    adaptive_threshold(gray, params.window_size, move |mean, std| {
        (1.0 - k) * mean + k * min_gray + k * (std / WOLF_STD_NORMALIZER - 1.0)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::window::naive_window_stats;

    fn textured(width: usize, height: usize) -> Plane {
        let data = (0..width * height)
            .map(|i| {
                let (x, y) = (i % width, i / width);
                let base = if (x / 4 + y / 3) % 2 == 0 { 60 } else { 190 };
                (base + (x * 7 + y * 13) % 40) as u8
            })
            .collect();
        Plane::from_raw(width, height, data).unwrap()
    }

    /// Per-pixel loop over naive windows, for cross-checking.
    fn naive_threshold(gray: &Plane, window_size: usize, rule: impl Fn(f64, f64) -> f64) -> Plane {
        let half = window_size / 2;
        let mut out = Plane::new(gray.width(), gray.height());
        for y in 0..gray.height() {
            for x in 0..gray.width() {
                let (mean, std) = naive_window_stats(gray, x, y, half).mean_std().unwrap();
                let v = if gray.get(x, y) as f64 > rule(mean, std) {
                    255
                } else {
                    0
                };
                out.set(x, y, v);
            }
        }
        out
    }

    #[test]
    fn even_or_zero_window_is_rejected() {
        let gray = Plane::filled(4, 4, 10);
        for size in [0, 2, 14] {
            let params = NiblackParams {
                window_size: size,
                ..Default::default()
            };
            assert_eq!(
                threshold_niblack(&gray, &params),
                Err(ThresholdError::InvalidWindowSize { size })
            );
        }
    }

    #[test]
    fn empty_image_is_rejected() {
        let gray = Plane::new(0, 0);
        assert!(matches!(
            threshold_sauvola(&gray, &SauvolaParams::default()),
            Err(ThresholdError::Image(_))
        ));
        assert!(threshold_wolf_jolion(&gray, &WolfJolionParams::default()).is_err());
    }

    #[test]
    fn sauvola_range_must_be_positive() {
        let gray = Plane::filled(2, 2, 10);
        let params = SauvolaParams {
            r: 0.0,
            ..Default::default()
        };
        assert!(matches!(
            threshold_sauvola(&gray, &params),
            Err(ThresholdError::InvalidParameter { name: "r", .. })
        ));
        let params = SauvolaParams {
            r: -64.0,
            ..Default::default()
        };
        assert_eq!(
            threshold_sauvola(&gray, &params),
            Err(ThresholdError::InvalidParameter {
                name: "r",
                value: -64.0
            })
        );
        let params = SauvolaParams {
            k: f64::NAN,
            ..Default::default()
        };
        assert!(threshold_sauvola(&gray, &params).is_err());
    }

    #[test]
    fn constant_image_gives_uniform_masks() {
        for value in [0u8, 1, 77, 255] {
            let gray = Plane::filled(9, 7, value);
            let niblack = threshold_niblack(&gray, &NiblackParams::default()).unwrap();
            let sauvola = threshold_sauvola(&gray, &SauvolaParams::default()).unwrap();
            let wolf = threshold_wolf_jolion(&gray, &WolfJolionParams::default()).unwrap();

            // std = 0: Niblack t = v, never strictly exceeded.
            assert!(niblack.as_raw().iter().all(|&v| v == 0));
            // Sauvola t = v / 2: exceeded for any non-zero v.
            let expected = if value > 0 { 255 } else { 0 };
            assert!(sauvola.as_raw().iter().all(|&v| v == expected), "v={value}");
            // Wolf t = v - k.
            assert!(wolf.as_raw().iter().all(|&v| v == 255));
        }
    }

    #[test]
    fn summed_area_path_matches_naive_windows() {
        let gray = textured(23, 17);
        let (k, r) = (0.34, 128.0);
        let fast = threshold_sauvola(
            &gray,
            &SauvolaParams {
                window_size: 7,
                k,
                r,
            },
        )
        .unwrap();
        let slow = naive_threshold(&gray, 7, |mean, std| mean * (1.0 + k * (std / r - 1.0)));
        assert_eq!(fast, slow);

        let fast = threshold_niblack(&gray, &NiblackParams::default()).unwrap();
        let slow = naive_threshold(&gray, 15, |mean, std| mean - 0.2 * std);
        assert_eq!(fast, slow);
    }

    #[test]
    fn niblack_picks_bright_pixels_in_dark_surround() {
        let mut gray = Plane::filled(5, 5, 20);
        gray.set(2, 2, 220);
        let out = threshold_niblack(
            &gray,
            &NiblackParams {
                window_size: 3,
                k: -0.2,
            },
        )
        .unwrap();
        assert_eq!(out.get(2, 2), 255);
        // Neighbors sit below their window mean.
        assert_eq!(out.get(1, 2), 0);
        assert_eq!(out.get(0, 0), 0);
    }

    #[test]
    fn comparison_is_strict() {
        // Window covers the whole 1x2 image: mean 100, std 0 with equal samples.
        let gray = Plane::filled(2, 1, 100);
        let out = adaptive_threshold(&gray, 3, |mean, _| mean).unwrap();
        assert!(out.as_raw().iter().all(|&v| v == 0));
        let out = adaptive_threshold(&gray, 3, |mean, _| mean - 1e-9).unwrap();
        assert!(out.as_raw().iter().all(|&v| v == 255));
    }

    #[test]
    fn wolf_uses_global_minimum() {
        // Left half is darker than anything in the right window.
        let gray = Plane::from_raw(6, 1, vec![0, 0, 0, 200, 210, 220]).unwrap();
        let out = threshold_wolf_jolion(
            &gray,
            &WolfJolionParams {
                window_size: 3,
                k: 0.5,
            },
        )
        .unwrap();
        // x=5: window {210,220}: mean 215, std 5 -> t = 107.5 + 0 + 0.5*(5/128 - 1) < 220.
        assert_eq!(out.get(5, 0), 255);
        // x=0: window {0,0} -> t = -0.5, 0 > -0.5.
        assert_eq!(out.get(0, 0), 255);
    }

    #[test]
    fn params_deserialize_with_defaults() {
        let p: SauvolaParams = serde_json::from_str(r#"{"k": 0.2}"#).unwrap();
        assert_eq!(p.window_size, 15);
        assert_eq!(p.r, 128.0);
        assert_eq!(p.k, 0.2);
    }
}

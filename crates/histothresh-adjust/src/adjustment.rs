use histothresh_core::{Plane, Raster};
use serde::{Deserialize, Serialize};

#[cfg(feature = "tracing")]
use tracing::instrument;

use crate::levels::{clamp_samples, normalize_samples};
use crate::tone::{add_constant_samples, brighten_samples, contrast_samples, BrightenMode};

/// Errors returned for unusable transform parameters.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum AdjustError {
    #[error("{name} must be finite (got {value})")]
    NonFinite { name: &'static str, value: f64 },
}

fn default_new_max() -> i32 {
    255
}

/// A per-pixel remap applied identically to every channel.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Adjustment {
    Clamp {
        low: u8,
        high: u8,
    },
    Normalize {
        #[serde(default)]
        new_min: i32,
        #[serde(default = "default_new_max")]
        new_max: i32,
    },
    AddConstant {
        k: i32,
    },
    BrightenWithRange {
        b: f64,
        #[serde(default)]
        mode: BrightenMode,
    },
    Contrast {
        alpha: f64,
    },
    /// Same remap as [`Adjustment::Normalize`] onto `[low, high]`.
    StretchHistogram {
        low: i32,
        high: i32,
    },
}

impl Adjustment {
    pub fn validate(&self) -> Result<(), AdjustError> {
        let (name, value) = match *self {
            Adjustment::BrightenWithRange { b, .. } => ("b", b),
            Adjustment::Contrast { alpha } => ("alpha", alpha),
            _ => return Ok(()),
        };
        if !value.is_finite() {
            return Err(AdjustError::NonFinite { name, value });
        }
        Ok(())
    }

    fn apply_samples(&self, samples: &mut [u8]) {
        match *self {
            Adjustment::Clamp { low, high } => clamp_samples(samples, low, high),
            Adjustment::Normalize { new_min, new_max } => {
                normalize_samples(samples, new_min, new_max);
            }
            Adjustment::StretchHistogram { low, high } => {
                normalize_samples(samples, low, high);
            }
            Adjustment::AddConstant { k } => add_constant_samples(samples, k),
            Adjustment::BrightenWithRange { b, mode } => brighten_samples(samples, b, mode),
            Adjustment::Contrast { alpha } => contrast_samples(samples, alpha),
        }
    }

    /// Transform one plane in place.
    pub fn apply_plane(&self, plane: &mut Plane) -> Result<(), AdjustError> {
        self.validate()?;
        self.apply_samples(plane.as_raw_mut());
        Ok(())
    }

    /// Transform all three channels in place; normalize uses each channel's own extrema.
    #[cfg_attr(
        feature = "tracing",
        instrument(level = "debug", skip(raster), fields(width = raster.width(), height = raster.height()))
    )]
    pub fn apply_raster(&self, raster: &mut Raster) -> Result<(), AdjustError> {
        self.validate()?;
        for samples in raster.channels_mut() {
            self.apply_samples(samples);
        }
        Ok(())
    }
}

pub fn clamp(raster: &mut Raster, low: u8, high: u8) {
    for samples in raster.channels_mut() {
        clamp_samples(samples, low, high);
    }
}

/// Rescale every channel from its observed extrema onto `[new_min, new_max]`.
///
/// Flat channels are left unchanged.
pub fn normalize(raster: &mut Raster, new_min: i32, new_max: i32) {
    for samples in raster.channels_mut() {
        normalize_samples(samples, new_min, new_max);
    }
}

pub fn stretch_histogram(raster: &mut Raster, low: i32, high: i32) {
    normalize(raster, low, high);
}

pub fn add_constant(raster: &mut Raster, k: i32) {
    for samples in raster.channels_mut() {
        add_constant_samples(samples, k);
    }
}

pub fn brighten_with_range(
    raster: &mut Raster,
    b: f64,
    mode: BrightenMode,
) -> Result<(), AdjustError> {
    Adjustment::BrightenWithRange { b, mode }.apply_raster(raster)
}

pub fn adjust_contrast(raster: &mut Raster, alpha: f64) -> Result<(), AdjustError> {
    Adjustment::Contrast { alpha }.apply_raster(raster)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raster(r: Vec<u8>, g: Vec<u8>, b: Vec<u8>) -> Raster {
        let w = r.len();
        Raster::from_planes(
            Plane::from_raw(w, 1, r).unwrap(),
            Plane::from_raw(w, 1, g).unwrap(),
            Plane::from_raw(w, 1, b).unwrap(),
        )
        .unwrap()
    }

    #[test]
    fn clamp_is_idempotent() {
        let mut once = raster(vec![0, 90, 255], vec![3, 4, 5], vec![250, 100, 20]);
        clamp(&mut once, 10, 200);
        let mut twice = once.clone();
        clamp(&mut twice, 10, 200);
        assert_eq!(once, twice);
        assert_eq!(once.red().as_raw(), &[10, 90, 200]);
    }

    #[test]
    fn normalize_uses_per_channel_extrema() {
        let mut img = raster(vec![10, 20], vec![0, 255], vec![40, 40]);
        normalize(&mut img, 0, 255);
        assert_eq!(img.red().as_raw(), &[0, 255]);
        assert_eq!(img.green().as_raw(), &[0, 255]);
        // Flat channel untouched.
        assert_eq!(img.blue().as_raw(), &[40, 40]);
    }

    #[test]
    fn normalize_on_exact_span_is_noop() {
        let original = raster(vec![20, 77, 180], vec![20, 120, 180], vec![180, 20, 21]);
        let mut img = original.clone();
        normalize(&mut img, 20, 180);
        assert_eq!(img, original);
    }

    #[test]
    fn stretch_matches_normalize() {
        let base = raster(vec![5, 60, 90], vec![1, 2, 3], vec![100, 0, 50]);
        let mut a = base.clone();
        let mut b = base;
        stretch_histogram(&mut a, 30, 220);
        normalize(&mut b, 30, 220);
        assert_eq!(a, b);
    }

    #[test]
    fn non_finite_factor_is_rejected() {
        let mut img = raster(vec![1], vec![2], vec![3]);
        let err = adjust_contrast(&mut img, f64::NAN).unwrap_err();
        assert!(matches!(err, AdjustError::NonFinite { name: "alpha", .. }));
        assert!(brighten_with_range(&mut img, f64::INFINITY, BrightenMode::Upper).is_err());
        assert_eq!(img.red().as_raw(), &[1]);
    }

    #[test]
    fn adjustment_applies_to_single_plane() {
        let mut p = Plane::from_raw(3, 1, vec![0, 100, 250]).unwrap();
        Adjustment::AddConstant { k: 10 }.apply_plane(&mut p).unwrap();
        assert_eq!(p.as_raw(), &[10, 110, 255]);
    }

    #[test]
    fn adjustments_deserialize_with_defaults() {
        let adj: Adjustment = serde_json::from_str(r#"{"op": "normalize"}"#).unwrap();
        assert_eq!(
            adj,
            Adjustment::Normalize {
                new_min: 0,
                new_max: 255
            }
        );
        let adj: Adjustment =
            serde_json::from_str(r#"{"op": "brighten_with_range", "b": 40}"#).unwrap();
        assert_eq!(
            adj,
            Adjustment::BrightenWithRange {
                b: 40.0,
                mode: BrightenMode::Upper
            }
        );
    }
}

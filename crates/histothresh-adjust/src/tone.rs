//! Brightness and contrast remaps.

use std::str::FromStr;

use histothresh_core::to_sample;
use serde::{Deserialize, Serialize};

/// Which end of the range [`brighten_with_range`](crate::brighten_with_range) pins.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BrightenMode {
    /// Map `[0, 255]` onto `[b, 255]`.
    #[default]
    Upper,
    /// Map `[0, 255]` onto `[0, 255 - b]`.
    Lower,
}

impl FromStr for BrightenMode {
    type Err = std::convert::Infallible;

    /// `"upper"` selects [`BrightenMode::Upper`]; any other string is `Lower`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(if s == "upper" {
            BrightenMode::Upper
        } else {
            BrightenMode::Lower
        })
    }
}

pub(crate) fn add_constant_samples(samples: &mut [u8], k: i32) {
    for v in samples {
        *v = (*v as i32).saturating_add(k).clamp(0, 255) as u8;
    }
}

pub(crate) fn brighten_samples(samples: &mut [u8], b: f64, mode: BrightenMode) {
    let gain = (255.0 - b) / 255.0;
    let offset = match mode {
        BrightenMode::Upper => b,
        BrightenMode::Lower => 0.0,
    };
    remap(samples, |v| gain * v + offset);
}

pub(crate) fn contrast_samples(samples: &mut [u8], alpha: f64) {
    remap(samples, |v| alpha * (v - 128.0) + 128.0);
}

/// Apply a real-valued curve through a 256-entry lookup table.
fn remap(samples: &mut [u8], curve: impl Fn(f64) -> f64) {
    let mut lut = [0u8; 256];
    for (v, out) in lut.iter_mut().enumerate() {
        *out = to_sample(curve(v as f64));
    }
    for v in samples {
        *v = lut[*v as usize];
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn add_constant_saturates_both_ways() {
        let mut s = [0u8, 10, 250];
        add_constant_samples(&mut s, 10);
        assert_eq!(s, [10, 20, 255]);
        add_constant_samples(&mut s, -15);
        assert_eq!(s, [0, 5, 240]);
    }

    #[test]
    fn brighten_upper_pins_top() {
        let mut s = [0u8, 255];
        brighten_samples(&mut s, 55.0, BrightenMode::Upper);
        assert_eq!(s, [55, 255]);
    }

    #[test]
    fn brighten_lower_pins_bottom() {
        let mut s = [0u8, 255];
        brighten_samples(&mut s, 55.0, BrightenMode::Lower);
        assert_eq!(s, [0, 200]);
    }

    #[test]
    fn mode_parsing_defaults_to_lower() {
        assert_eq!("upper".parse::<BrightenMode>(), Ok(BrightenMode::Upper));
        assert_eq!("lower".parse::<BrightenMode>(), Ok(BrightenMode::Lower));
        assert_eq!("sideways".parse::<BrightenMode>(), Ok(BrightenMode::Lower));
    }

    #[test]
    fn contrast_pivots_at_128() {
        let mut s = [0u8, 100, 128, 200, 255];
        contrast_samples(&mut s, 2.0);
        assert_eq!(s, [0, 72, 128, 255, 255]);

        let mut s = [0u8, 255];
        contrast_samples(&mut s, 0.5);
        // 0.5*(0-128)+128 = 64, 0.5*127+128 = 191.5
        assert_eq!(s, [64, 192]);
    }
}
